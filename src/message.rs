//! Messages, assignment targets and scopes.
//!
//! Assignments are not made on a message directly. A message is entered as a
//! scope on its device, making it the active [`Target`]; every
//! [`Device::assign`] made while the scope is alive is routed to it. The
//! [`Scope`] guard pops the target when dropped, so the device is always
//! un-scoped again, even when an error is propagated out of the scope with `?`.

use std::collections::HashSet;

use log::{debug, warn};

use crate::device::Device;
use crate::error::{Error, Result};
use crate::reference::Pred;
use crate::types::{Message, State, Var};

/// Ordered assignments of one target, at most one per variable.
#[derive(Debug, Clone, Default)]
pub struct Assignments {
    entries: Vec<(Var, State)>,
    assigned: HashSet<Var>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `var := state`. Returns `false` (and changes nothing) if `var`
    /// was already assigned.
    pub fn insert(&mut self, var: Var, state: State) -> bool {
        if !self.assigned.insert(var) {
            return false;
        }
        self.entries.push((var, state));
        true
    }

    pub fn contains(&self, var: Var) -> bool {
        self.assigned.contains(&var)
    }

    pub fn entries(&self) -> &[(Var, State)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MessageData {
    pub(crate) name: String,
    pub(crate) pre: Option<Pred>,
    pub(crate) assignments: Assignments,
}

impl MessageData {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pre: None,
            assignments: Assignments::new(),
        }
    }
}

/// A destination for scoped assignments.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Target {
    Message(Message),
}

impl From<Message> for Target {
    fn from(msg: Message) -> Self {
        Target::Message(msg)
    }
}

/// An active target on a device. Dropping the scope exits it.
#[must_use = "the scope is exited as soon as it is dropped"]
pub struct Scope<'a> {
    device: &'a Device,
    target: Target,
}

impl Scope<'_> {
    pub fn target(&self) -> Target {
        self.target
    }

    /// Same as [`Device::assign`].
    pub fn assign(&self, var: Var, state: State) -> Result<()> {
        self.device.assign(var, state)
    }

    /// Exits the scope explicitly.
    pub fn exit(self) {}
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.device.exit_scope(self.target);
    }
}

impl Device {
    pub fn message_name(&self, msg: Message) -> String {
        self.messages.borrow()[msg.index()].name.clone()
    }

    /// Sets the guard of `msg`. A second call replaces the first.
    pub fn set_precondition(&self, msg: Message, pred: Pred) -> Result<()> {
        self.check_message(msg)?;
        self.messages.borrow_mut()[msg.index()].pre = Some(pred);
        Ok(())
    }

    /// The guard of `msg`; `None` means the message is always enabled.
    pub fn precondition(&self, msg: Message) -> Option<Pred> {
        self.messages.borrow()[msg.index()].pre
    }

    pub fn assignments(&self, msg: Message) -> Vec<(Var, State)> {
        self.messages.borrow()[msg.index()].assignments.entries().to_vec()
    }

    /// Makes `target` the active target until the returned scope is dropped.
    pub fn enter_scope(&self, target: impl Into<Target>) -> Scope<'_> {
        let target = target.into();
        debug!("{}: enter {:?}", self.name(), target);
        self.targets.borrow_mut().push(target);
        Scope { device: self, target }
    }

    /// Removes `target` from the active stack. Called by [`Scope`] on drop.
    ///
    /// A scope dropped while an inner one is still alive removes its own entry,
    /// so the inner target stays active.
    fn exit_scope(&self, target: Target) {
        let mut targets = self.targets.borrow_mut();
        match targets.iter().rposition(|&t| t == target) {
            Some(i) if i + 1 == targets.len() => {
                targets.pop();
                debug!("{}: exit {:?}", self.name(), target);
            }
            Some(i) => {
                targets.remove(i);
                warn!("{}: scope for {:?} exited before {:?}", self.name(), target, targets[i..].to_vec());
            }
            None => warn!("{}: scope for {:?} is not active", self.name(), target),
        }
    }

    /// Runs `f` with `target` active. The scope is exited however `f` returns.
    pub fn scoped<R>(&self, target: impl Into<Target>, f: impl FnOnce(&Scope<'_>) -> R) -> R {
        let scope = self.enter_scope(target);
        f(&scope)
    }

    /// The innermost active target.
    pub fn active_target(&self) -> Result<Target> {
        self.targets.borrow().last().copied().ok_or(Error::NoActiveScope)
    }

    pub fn has_active_target(&self) -> bool {
        !self.targets.borrow().is_empty()
    }

    /// Records `var := state` on the active target.
    pub fn assign(&self, var: Var, state: State) -> Result<()> {
        let target = self.active_target()?;
        self.receive_assignment(target, var, state)
    }

    fn receive_assignment(&self, target: Target, var: Var, state: State) -> Result<()> {
        self.check_var(var)?;
        self.validate(self.var_type(var), state)?;
        match target {
            Target::Message(msg) => {
                self.check_message(msg)?;
                let mut messages = self.messages.borrow_mut();
                let data = &mut messages[msg.index()];
                if !data.assignments.insert(var, state) {
                    return Err(Error::DuplicateAssignment {
                        var: self.var_canonical_name(var),
                        target: data.name.clone(),
                    });
                }
                debug!("{}: {} << {}", data.name, var, state);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::types::Fsm;

    fn setup() -> (Device, Fsm, State, State, Var) {
        let device = Device::new("d");
        let b = device.declare_fsm("bool").unwrap();
        let f = device.declare_state(b, "false").unwrap();
        let t = device.declare_state(b, "true").unwrap();
        let x = device.declare_var("x", b, f).unwrap();
        (device, b, f, t, x)
    }

    #[test]
    fn test_assignments_record() {
        let (device, _, f, _, x) = setup();
        let mut a = Assignments::new();
        let s = device.states(device.var_type(x))[1];
        assert!(a.insert(x, s));
        assert!(!a.insert(x, f));
        assert!(!a.insert(x, s));
        assert!(a.contains(x));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_assign_in_scope() {
        let (device, _, _, t, x) = setup();
        let msg = device.declare_message("go").unwrap();

        let scope = device.enter_scope(msg);
        assert_eq!(device.active_target(), Ok(Target::Message(msg)));
        scope.assign(x, t).unwrap();
        scope.exit();
        assert_eq!(device.active_target(), Err(Error::NoActiveScope));

        let assignments = device.assignments(msg);
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].0, x);
        assert!(assignments[0].1.is(t));
    }

    #[test]
    fn test_assign_without_scope() {
        let (device, _, _, t, x) = setup();
        assert_eq!(device.assign(x, t).unwrap_err(), Error::NoActiveScope);
    }

    #[test]
    fn test_duplicate_assignment() {
        let (device, _, f, t, x) = setup();
        let msg = device.declare_message("go").unwrap();

        let res = device.scoped(msg, |scope| {
            scope.assign(x, t)?;
            scope.assign(x, f)
        });
        assert_eq!(
            res.unwrap_err(),
            Error::DuplicateAssignment {
                var: "d.x".to_string(),
                target: "go".to_string(),
            }
        );
        // The first assignment stays, and the scope was exited.
        assert_eq!(device.assignments(msg).len(), 1);
        assert!(device.assignments(msg)[0].1.is(t));
        assert!(!device.has_active_target());
    }

    #[test]
    fn test_same_var_in_two_messages() {
        let (device, _, f, t, x) = setup();
        let on = device.declare_message("on").unwrap();
        let off = device.declare_message("off").unwrap();

        device.scoped(on, |scope| scope.assign(x, t)).unwrap();
        device.scoped(off, |scope| scope.assign(x, f)).unwrap();

        assert!(device.assignments(on)[0].1.is(t));
        assert!(device.assignments(off)[0].1.is(f));
    }

    #[test]
    fn test_assign_wrong_type() {
        let (device, _, _, _, x) = setup();
        let color = device.declare_fsm("color").unwrap();
        let red = device.declare_state(color, "red").unwrap();
        let msg = device.declare_message("go").unwrap();

        let res = device.scoped(msg, |scope| scope.assign(x, red));
        assert!(matches!(res, Err(Error::TypeMismatch { .. })));
        assert!(device.assignments(msg).is_empty());
    }

    #[test]
    fn test_nested_scopes() {
        let (device, _, f, t, x) = setup();
        let outer = device.declare_message("outer").unwrap();
        let inner = device.declare_message("inner").unwrap();

        device
            .scoped(outer, |_| {
                device.scoped(inner, |scope| scope.assign(x, t))?;
                assert_eq!(device.active_target(), Ok(Target::Message(outer)));
                device.assign(x, f)
            })
            .unwrap();

        assert!(device.assignments(inner)[0].1.is(t));
        assert!(device.assignments(outer)[0].1.is(f));
        assert!(!device.has_active_target());
    }

    #[test]
    fn test_scope_exits_on_panic() {
        let (device, _, _, t, x) = setup();
        let msg = device.declare_message("go").unwrap();

        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            device.scoped(msg, |scope| {
                scope.assign(x, t).unwrap();
                panic!("model script failed");
            })
        }));
        assert!(res.is_err());
        assert!(!device.has_active_target());
    }

    #[test]
    fn test_precondition_last_write_wins() {
        let (device, _, f, t, x) = setup();
        let msg = device.declare_message("go").unwrap();
        assert_eq!(device.precondition(msg), None);

        let is_f = device.var_eq(x, f).unwrap();
        let is_t = device.var_eq(x, t).unwrap();
        device.set_precondition(msg, is_f).unwrap();
        device.set_precondition(msg, is_t).unwrap();
        assert_eq!(device.precondition(msg), Some(is_t));
    }

    #[test]
    fn test_out_of_order_exit() {
        let (device, _, _, t, x) = setup();
        let outer = device.declare_message("outer").unwrap();
        let inner = device.declare_message("inner").unwrap();

        let outer_scope = device.enter_scope(outer);
        let inner_scope = device.enter_scope(inner);
        drop(outer_scope);

        // The inner scope is still the active one.
        assert_eq!(device.active_target(), Ok(Target::Message(inner)));
        inner_scope.assign(x, t).unwrap();
        assert_eq!(device.assignments(inner).len(), 1);
        assert!(device.assignments(outer).is_empty());

        drop(inner_scope);
        assert!(!device.has_active_target());
    }

    #[test]
    fn test_foreign_handles() {
        let (device, _, _, t, x) = setup();
        let (other, _, _, t2, x2) = setup();
        let msg = device.declare_message("go").unwrap();
        let msg2 = other.declare_message("go").unwrap();

        assert!(matches!(device.set_precondition(msg2, Pred::TRUE), Err(Error::ForeignHandle { .. })));
        assert_eq!(other.precondition(msg2), None);

        device.scoped(msg, |scope| {
            assert!(matches!(scope.assign(x2, t), Err(Error::ForeignHandle { .. })));
            assert!(matches!(scope.assign(x, t2), Err(Error::TypeMismatch { .. })));
        });
        assert!(device.assignments(msg).is_empty());

        device.scoped(msg2, |scope| {
            assert!(matches!(scope.assign(x, t), Err(Error::ForeignHandle { .. })));
        });
        assert!(other.assignments(msg2).is_empty());
    }
}
