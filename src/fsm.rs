use std::collections::HashMap;

use log::debug;

use crate::device::Device;
use crate::error::{Error, Result};
use crate::types::{Fsm, State};

#[derive(Debug, Clone)]
pub(crate) struct FsmData {
    pub(crate) name: String,
    /// State names in canonical order.
    pub(crate) states: Vec<String>,
    lookup: HashMap<String, u32>,
    /// Set once a variable is declared with this type. The state list is frozen from then on.
    pub(crate) in_use: bool,
}

impl FsmData {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            states: Vec::new(),
            lookup: HashMap::new(),
            in_use: false,
        }
    }
}

impl Device {
    /// Appends a state to `fsm`. State names are local to their FSM.
    ///
    /// Fails with [`FsmInUse`][Error::FsmInUse] once a variable of type `fsm`
    /// exists: every case-split on such a variable has one child per state.
    pub fn declare_state(&self, fsm: Fsm, name: &str) -> Result<State> {
        self.check_fsm(fsm)?;
        let mut fsms = self.fsms.borrow_mut();
        let data = &mut fsms[fsm.index()];
        if data.in_use {
            return Err(Error::FsmInUse {
                fsm: format!("{}.{}", self.name(), data.name),
            });
        }
        if data.lookup.contains_key(name) {
            return Err(Error::DuplicateName {
                name: format!("{}.{}.{}", self.name(), data.name, name),
            });
        }
        let index = data.states.len() as u32;
        data.states.push(name.to_string());
        data.lookup.insert(name.to_string(), index);
        debug!("{}.{}: declare state `{}`", self.name(), data.name, name);
        Ok(State::new(fsm, index))
    }

    /// Declares several states at once, in order.
    pub fn declare_states<'a>(&self, fsm: Fsm, names: impl IntoIterator<Item = &'a str>) -> Result<Vec<State>> {
        names.into_iter().map(|name| self.declare_state(fsm, name)).collect()
    }

    /// Checks that `state` is a declared state of `fsm`, both issued by this device.
    pub fn validate(&self, fsm: Fsm, state: State) -> Result<()> {
        if state.fsm() == fsm && self.owns_state(state) {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                state: self.state_label(state),
                expected: self.fsm_label(fsm),
            })
        }
    }

    pub fn owns_state(&self, state: State) -> bool {
        self.owns_fsm(state.fsm()) && state.index() < self.num_states(state.fsm())
    }

    /// Canonical name of `fsm`, or its handle if another device issued it.
    fn fsm_label(&self, fsm: Fsm) -> String {
        if self.owns_fsm(fsm) {
            self.fsm_canonical_name(fsm)
        } else {
            fsm.to_string()
        }
    }

    fn state_label(&self, state: State) -> String {
        if self.owns_state(state) {
            self.state_canonical_name(state)
        } else {
            state.to_string()
        }
    }

    /// The states of `fsm`, in canonical order.
    pub fn states(&self, fsm: Fsm) -> Vec<State> {
        (0..self.num_states(fsm) as u32).map(|i| State::new(fsm, i)).collect()
    }

    pub fn num_states(&self, fsm: Fsm) -> usize {
        self.fsms.borrow()[fsm.index()].states.len()
    }

    pub fn state_by_name(&self, fsm: Fsm, name: &str) -> Option<State> {
        let fsms = self.fsms.borrow();
        fsms[fsm.index()].lookup.get(name).map(|&i| State::new(fsm, i))
    }

    pub fn fsm_name(&self, fsm: Fsm) -> String {
        self.fsms.borrow()[fsm.index()].name.clone()
    }

    pub fn state_name(&self, state: State) -> String {
        self.fsms.borrow()[state.fsm().index()].states[state.index()].clone()
    }

    /// `device.fsm`
    pub fn fsm_canonical_name(&self, fsm: Fsm) -> String {
        format!("{}.{}", self.name(), self.fsm_name(fsm))
    }

    /// `device.fsm.state`
    pub fn state_canonical_name(&self, state: State) -> String {
        format!("{}.{}", self.fsm_canonical_name(state.fsm()), self.state_name(state))
    }
}
