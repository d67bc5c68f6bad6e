//! Type-safe handles for the entities owned by a [`Device`][crate::device::Device].
//!
//! Handles are indices into the device's storage, stamped with the
//! [`DeviceId`] of the device that issued them. They are cheap to copy and
//! carry no data of their own: names, types and initial values are looked up
//! through the device.
use std::fmt;

/// Identifies one [`Device`][crate::device::Device] for the lifetime of the process.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DeviceId(u32);

impl DeviceId {
    pub(crate) const fn new(id: u32) -> Self {
        DeviceId(id)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dev{}", self.0)
    }
}

/// A finite-state machine type, i.e. a named, ordered set of states.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Fsm {
    device: DeviceId,
    index: u32,
}

impl Fsm {
    pub(crate) const fn new(device: DeviceId, index: u32) -> Self {
        Fsm { device, index }
    }

    /// Returns the device that declared this FSM.
    pub const fn device(self) -> DeviceId {
        self.device
    }

    /// Returns the position of this FSM in declaration order.
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for Fsm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.fsm{}", self.device, self.index)
    }
}

/// An opaque member of an [`Fsm`].
///
/// States intentionally do not implement [`PartialEq`]: comparing a state to
/// another state is never a guard. Conditions on states are built with
/// [`Device::var_eq`][crate::device::Device::var_eq] and
/// [`Device::var_ne`][crate::device::Device::var_ne] instead.
///
/// ```compile_fail
/// use arbiter::device::Device;
///
/// let device = Device::new("d");
/// let b = device.declare_fsm("bool").unwrap();
/// let f = device.declare_state(b, "false").unwrap();
/// let t = device.declare_state(b, "true").unwrap();
/// let _ = f == t;
/// ```
///
/// When the identity of two handles matters (e.g. in a backend), use [`State::is`].
#[derive(Debug, Copy, Clone)]
pub struct State {
    fsm: Fsm,
    index: u32,
}

impl State {
    pub(crate) const fn new(fsm: Fsm, index: u32) -> Self {
        State { fsm, index }
    }

    /// Returns the FSM this state belongs to.
    pub const fn fsm(self) -> Fsm {
        self.fsm
    }

    /// Returns the canonical position of this state within its FSM.
    pub const fn index(self) -> usize {
        self.index as usize
    }

    pub const fn device(self) -> DeviceId {
        self.fsm.device
    }

    /// Identity check: `true` iff both handles denote the same declared state.
    pub fn is(self, other: State) -> bool {
        self.fsm == other.fsm && self.index == other.index
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.s{}", self.fsm, self.index)
    }
}

/// A typed modeling variable.
///
/// Variables are ordered by declaration; this order is also the order in
/// which nested case-splits are built by the predicate algebra.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var {
    device: DeviceId,
    index: u32,
}

impl Var {
    pub(crate) const fn new(device: DeviceId, index: u32) -> Self {
        Var { device, index }
    }

    pub const fn device(self) -> DeviceId {
        self.device
    }

    /// Returns the stable index of the variable (declaration order, from 0).
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.index)
    }
}

/// A named transition with an optional precondition and a list of assignments.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Message {
    device: DeviceId,
    index: u32,
}

impl Message {
    pub(crate) const fn new(device: DeviceId, index: u32) -> Self {
        Message { device, index }
    }

    pub const fn device(self) -> DeviceId {
        self.device
    }

    /// Returns the position of this message in declaration order.
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg{}", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_identity() {
        let dev = DeviceId::new(0);
        let a = Fsm::new(dev, 0);
        let b = Fsm::new(dev, 1);

        assert!(State::new(a, 0).is(State::new(a, 0)));
        assert!(!State::new(a, 0).is(State::new(a, 1)));
        assert!(!State::new(a, 0).is(State::new(b, 0)));
    }

    #[test]
    fn test_identity_includes_device() {
        let a = Fsm::new(DeviceId::new(0), 0);
        let b = Fsm::new(DeviceId::new(1), 0);
        assert_ne!(a, b);
        assert!(!State::new(a, 0).is(State::new(b, 0)));
        assert_ne!(Var::new(DeviceId::new(0), 0), Var::new(DeviceId::new(1), 0));
        assert_eq!(b.to_string(), "dev1.fsm0");
    }

    #[test]
    fn test_var_order() {
        let v0 = Var::new(DeviceId::new(0), 0);
        let v1 = Var::new(DeviceId::new(0), 1);
        assert!(v0 < v1);
        assert_eq!(v1.index(), 1);
        assert_eq!(v1.to_string(), "v1");
    }
}
