//! The device: root namespace and manager of a model.
//!
//! Everything in a model goes through a [`Device`]. It owns
//!
//! - a single namespace shared by the device itself, its FSM types, variables and messages,
//! - the ordered registries of those entities,
//! - the [`PredicateCache`] all predicates live in,
//! - the stack of active assignment targets (see [`Scope`][crate::message::Scope]).
//!
//! Handles ([`Fsm`], [`State`][crate::types::State], [`Var`], [`Message`]) are
//! stamped with the [`DeviceId`] of the device that issued them. Declarations,
//! predicate builders and assignments reject a handle from another device with
//! an error; plain accessors such as [`Device::var_name`] panic on one.
//!
//! # Example
//!
//! ```
//! use arbiter::device::Device;
//!
//! # fn main() -> arbiter::error::Result<()> {
//! let mutex = Device::new("mutex");
//! let b = mutex.declare_fsm("bool")?;
//! let states = mutex.declare_states(b, ["false", "true"])?;
//! let (f, t) = (states[0], states[1]);
//! let is_locked = mutex.declare_var("is_locked", b, f)?;
//!
//! let lock = mutex.declare_message("lock")?;
//! mutex.scoped(lock, |scope| scope.assign(is_locked, t))?;
//!
//! let unlock = mutex.declare_message("unlock")?;
//! mutex.set_precondition(unlock, mutex.var_eq(is_locked, t)?)?;
//! mutex.scoped(unlock, |scope| scope.assign(is_locked, f))?;
//!
//! assert_eq!(mutex.precondition(lock), None);
//! assert_eq!(
//!     mutex.describe(mutex.precondition(unlock).unwrap()),
//!     "mutex.is_locked => (false, true)"
//! );
//! # Ok(())
//! # }
//! ```

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU32, Ordering};

use log::debug;

use crate::cache::PredicateCache;
use crate::error::{Error, Result};
use crate::fsm::FsmData;
use crate::message::{MessageData, Target};
use crate::node::PredNode;
use crate::reference::Pred;
use crate::types::{DeviceId, Fsm, Message, Var};
use crate::var::VarData;

/// What a name in the device namespace refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Entity {
    Device,
    Fsm(Fsm),
    Var(Var),
    Message(Message),
}

static NEXT_DEVICE_ID: AtomicU32 = AtomicU32::new(0);

pub struct Device {
    id: DeviceId,
    name: String,
    names: RefCell<HashMap<String, Entity>>,
    pub(crate) fsms: RefCell<Vec<FsmData>>,
    pub(crate) vars: RefCell<Vec<VarData>>,
    pub(crate) messages: RefCell<Vec<MessageData>>,
    pub(crate) cache: RefCell<PredicateCache>,
    pub(crate) targets: RefCell<Vec<Target>>,
}

impl Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("fsms", &self.fsms.borrow().len())
            .field("vars", &self.vars.borrow().len())
            .field("messages", &self.messages.borrow().len())
            .field("cache", &*self.cache.borrow())
            .finish()
    }
}

impl Device {
    /// Creates an empty device. Its own name is reserved in its namespace.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut names = HashMap::new();
        names.insert(name.clone(), Entity::Device);
        Self {
            id: DeviceId::new(NEXT_DEVICE_ID.fetch_add(1, Ordering::Relaxed)),
            name,
            names: RefCell::new(names),
            fsms: RefCell::new(Vec::new()),
            vars: RefCell::new(Vec::new()),
            messages: RefCell::new(Vec::new()),
            cache: RefCell::new(PredicateCache::new()),
            targets: RefCell::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Returns what `name` refers to in this device, if anything.
    pub fn lookup(&self, name: &str) -> Option<Entity> {
        self.names.borrow().get(name).copied()
    }

    /// Claims `name` in the namespace, failing if it is already taken.
    pub(crate) fn reserve(&self, name: &str, entity: impl FnOnce() -> Entity) -> Result<()> {
        match self.names.borrow_mut().entry(name.to_string()) {
            Entry::Occupied(_) => Err(Error::DuplicateName { name: name.to_string() }),
            Entry::Vacant(slot) => {
                let entity = entity();
                debug!("{}: declare {:?} `{}`", self.name, entity, name);
                slot.insert(entity);
                Ok(())
            }
        }
    }

    /// Declares a new FSM type with no states.
    pub fn declare_fsm(&self, name: &str) -> Result<Fsm> {
        let fsm = Fsm::new(self.id, self.fsms.borrow().len() as u32);
        self.reserve(name, || Entity::Fsm(fsm))?;
        self.fsms.borrow_mut().push(FsmData::new(name));
        Ok(fsm)
    }

    /// Declares a new message with no precondition and no assignments.
    pub fn declare_message(&self, name: &str) -> Result<Message> {
        let msg = Message::new(self.id, self.messages.borrow().len() as u32);
        self.reserve(name, || Entity::Message(msg))?;
        self.messages.borrow_mut().push(MessageData::new(name));
        Ok(msg)
    }

    /// All FSM types, in declaration order.
    pub fn fsms(&self) -> Vec<Fsm> {
        (0..self.fsms.borrow().len() as u32).map(|i| Fsm::new(self.id, i)).collect()
    }

    /// All variables, in declaration (= index) order.
    pub fn vars(&self) -> Vec<Var> {
        (0..self.vars.borrow().len() as u32).map(|i| Var::new(self.id, i)).collect()
    }

    /// All messages, in declaration order.
    pub fn messages(&self) -> Vec<Message> {
        (0..self.messages.borrow().len() as u32).map(|i| Message::new(self.id, i)).collect()
    }

    pub fn owns_fsm(&self, fsm: Fsm) -> bool {
        fsm.device() == self.id && fsm.index() < self.fsms.borrow().len()
    }

    pub fn owns_var(&self, var: Var) -> bool {
        var.device() == self.id && var.index() < self.vars.borrow().len()
    }

    pub fn owns_message(&self, msg: Message) -> bool {
        msg.device() == self.id && msg.index() < self.messages.borrow().len()
    }

    pub(crate) fn check_fsm(&self, fsm: Fsm) -> Result<()> {
        self.check_owned(self.owns_fsm(fsm), || format!("fsm {}", fsm))
    }

    pub(crate) fn check_var(&self, var: Var) -> Result<()> {
        self.check_owned(self.owns_var(var), || format!("variable {}.{}", var.device(), var))
    }

    pub(crate) fn check_message(&self, msg: Message) -> Result<()> {
        self.check_owned(self.owns_message(msg), || format!("message {}.{}", msg.device(), msg))
    }

    fn check_owned(&self, owned: bool, handle: impl FnOnce() -> String) -> Result<()> {
        if owned {
            Ok(())
        } else {
            Err(Error::ForeignHandle {
                handle: handle(),
                device: self.name.clone(),
            })
        }
    }

    pub fn fsm_by_name(&self, name: &str) -> Option<Fsm> {
        match self.lookup(name)? {
            Entity::Fsm(fsm) => Some(fsm),
            _ => None,
        }
    }

    pub fn var_by_name(&self, name: &str) -> Option<Var> {
        match self.lookup(name)? {
            Entity::Var(var) => Some(var),
            _ => None,
        }
    }

    pub fn message_by_name(&self, name: &str) -> Option<Message> {
        match self.lookup(name)? {
            Entity::Message(msg) => Some(msg),
            _ => None,
        }
    }
}

// Predicates
impl Device {
    pub fn cache(&self) -> std::cell::Ref<'_, PredicateCache> {
        self.cache.borrow()
    }

    pub fn constant(&self, value: bool) -> Pred {
        self.cache.borrow().constant(value)
    }

    /// Builds the canonical case-split on `var`.
    ///
    /// `children` must have one entry per state of the variable's type, in state order.
    pub fn case_split(&self, var: Var, children: &[Pred]) -> Result<Pred> {
        self.check_var(var)?;
        let expected = self.num_states(self.var_type(var));
        if children.len() != expected {
            return Err(Error::ChildCount {
                var: self.var_canonical_name(var),
                expected,
                actual: children.len(),
            });
        }
        Ok(self.cache.borrow_mut().case_split(var, children))
    }

    pub fn apply_and(&self, a: Pred, b: Pred) -> Pred {
        self.cache.borrow_mut().apply_and(a, b)
    }

    pub fn apply_or(&self, a: Pred, b: Pred) -> Pred {
        self.cache.borrow_mut().apply_or(a, b)
    }

    pub fn apply_not(&self, a: Pred) -> Pred {
        self.cache.borrow_mut().apply_not(a)
    }

    /// Structural equality of two predicates.
    pub fn pred_equals(&self, a: Pred, b: Pred) -> bool {
        self.cache.borrow().equals(a, b)
    }

    /// Structural hash of a predicate, consistent with [`pred_equals`][Self::pred_equals].
    pub fn pred_hash(&self, pred: Pred) -> u64 {
        self.cache.borrow().hash(pred)
    }

    /// Renders a predicate as text: `true`/`false` for constants,
    /// `<device.var> => (c0, c1, ...)` for case-splits.
    pub fn describe(&self, pred: Pred) -> String {
        let cache = self.cache.borrow();
        let mut out = String::new();
        self.describe_into(&cache, pred, &mut out);
        out
    }

    fn describe_into(&self, cache: &PredicateCache, pred: Pred, out: &mut String) {
        match cache.node(pred) {
            PredNode::Const(value) => out.push_str(if *value { "true" } else { "false" }),
            PredNode::CaseSplit { variable, children } => {
                out.push_str(&self.var_canonical_name(*variable));
                out.push_str(" => (");
                for (i, &child) in children.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.describe_into(cache, child, out);
                }
                out.push(')');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_device_name_is_reserved() {
        let device = Device::new("test");
        assert_eq!(device.lookup("test"), Some(Entity::Device));
        assert_eq!(
            device.declare_fsm("test"),
            Err(Error::DuplicateName { name: "test".to_string() })
        );
    }

    #[test]
    fn test_single_namespace() {
        let device = Device::new("test");
        let b = device.declare_fsm("bool").unwrap();
        let f = device.declare_state(b, "false").unwrap();

        assert!(matches!(device.declare_fsm("bool"), Err(Error::DuplicateName { .. })));
        assert!(matches!(device.declare_message("bool"), Err(Error::DuplicateName { .. })));
        assert!(matches!(device.declare_var("bool", b, f), Err(Error::DuplicateName { .. })));

        let x = device.declare_var("x", b, f).unwrap();
        assert!(matches!(device.declare_fsm("x"), Err(Error::DuplicateName { .. })));
        assert!(matches!(device.declare_message("x"), Err(Error::DuplicateName { .. })));

        let m = device.declare_message("m").unwrap();
        assert!(matches!(device.declare_var("m", b, f), Err(Error::DuplicateName { .. })));

        assert_eq!(device.fsm_by_name("bool"), Some(b));
        assert_eq!(device.var_by_name("x"), Some(x));
        assert_eq!(device.message_by_name("m"), Some(m));
        assert_eq!(device.var_by_name("m"), None);
        assert_eq!(device.lookup("nope"), None);
    }

    #[test]
    fn test_failed_declaration_registers_nothing() {
        let device = Device::new("test");
        device.declare_fsm("a").unwrap();
        assert!(device.declare_fsm("a").is_err());
        assert_eq!(device.fsms().len(), 1);
        assert!(device.declare_message("a").is_err());
        assert!(device.messages().is_empty());
    }

    #[test]
    fn test_names_are_per_device() {
        let one = Device::new("one");
        let two = Device::new("two");
        assert!(one.declare_fsm("bool").is_ok());
        assert!(two.declare_fsm("bool").is_ok());
        assert!(one.declare_message("go").is_ok());
        assert!(two.declare_message("go").is_ok());
    }

    #[test]
    fn test_case_split_arity() {
        let device = Device::new("test");
        let b = device.declare_fsm("bool").unwrap();
        let f = device.declare_state(b, "false").unwrap();
        device.declare_state(b, "true").unwrap();
        let x = device.declare_var("x", b, f).unwrap();

        let err = device.case_split(x, &[Pred::TRUE]).unwrap_err();
        assert_eq!(
            err,
            Error::ChildCount {
                var: "test.x".to_string(),
                expected: 2,
                actual: 1,
            }
        );

        let p = device.case_split(x, &[Pred::TRUE, Pred::FALSE]).unwrap();
        assert_eq!(p, device.var_eq(x, f).unwrap());
    }

    #[test]
    fn test_ids_are_distinct() {
        let one = Device::new("same");
        let two = Device::new("same");
        assert_ne!(one.id(), two.id());

        let a = one.declare_fsm("bool").unwrap();
        let b = two.declare_fsm("bool").unwrap();
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(one.owns_fsm(a));
        assert!(!one.owns_fsm(b));
        assert_eq!(two.fsms(), vec![b]);
    }

    #[test]
    fn test_case_split_foreign_var() {
        let one = Device::new("one");
        let two = Device::new("two");
        for device in [&one, &two] {
            let b = device.declare_fsm("bool").unwrap();
            let f = device.declare_state(b, "false").unwrap();
            device.declare_state(b, "true").unwrap();
            device.declare_var("x", b, f).unwrap();
        }
        let x2 = two.var_by_name("x").unwrap();

        assert!(matches!(
            one.case_split(x2, &[Pred::TRUE, Pred::FALSE]),
            Err(Error::ForeignHandle { .. })
        ));
        // Nothing was allocated.
        assert_eq!(one.cache().len(), 2);
    }

    #[test]
    fn test_describe() {
        let device = Device::new("d");
        let color = device.declare_fsm("color").unwrap();
        let states = device.declare_states(color, ["red", "green", "blue"]).unwrap();
        let c = device.declare_var("c", color, states[0]).unwrap();

        assert_eq!(device.describe(device.constant(true)), "true");
        assert_eq!(device.describe(device.constant(false)), "false");

        let p = device.var_ne(c, states[1]).unwrap();
        assert_eq!(device.describe(p), "d.c => (true, false, true)");
    }
}
