use crate::device::{Device, Entity};
use crate::error::{Error, Result};
use crate::reference::Pred;
use crate::types::{Fsm, State, Var};

#[derive(Debug, Clone)]
pub(crate) struct VarData {
    pub(crate) name: String,
    pub(crate) fsm: Fsm,
    pub(crate) initial: State,
}

impl Device {
    /// Declares a variable of type `fsm` starting in `initial`.
    ///
    /// Variables are indexed from 0 in declaration order. The states of `fsm`
    /// are frozen from then on.
    pub fn declare_var(&self, name: &str, fsm: Fsm, initial: State) -> Result<Var> {
        let var = Var::new(self.id(), self.vars.borrow().len() as u32);
        if self.lookup(name).is_some() {
            return Err(Error::DuplicateName { name: name.to_string() });
        }
        self.validate(fsm, initial)?;
        self.reserve(name, || Entity::Var(var))?;
        self.fsms.borrow_mut()[fsm.index()].in_use = true;
        self.vars.borrow_mut().push(VarData {
            name: name.to_string(),
            fsm,
            initial,
        });
        Ok(var)
    }

    pub fn var_name(&self, var: Var) -> String {
        self.vars.borrow()[var.index()].name.clone()
    }

    pub fn var_type(&self, var: Var) -> Fsm {
        self.vars.borrow()[var.index()].fsm
    }

    pub fn var_initial(&self, var: Var) -> State {
        self.vars.borrow()[var.index()].initial
    }

    /// `device.var`
    pub fn var_canonical_name(&self, var: Var) -> String {
        format!("{}.{}", self.name(), self.var_name(var))
    }

    /// Predicate "`var` is in `state`".
    pub fn var_eq(&self, var: Var, state: State) -> Result<Pred> {
        self.var_compare(var, state, true)
    }

    /// Predicate "`var` is not in `state`".
    pub fn var_ne(&self, var: Var, state: State) -> Result<Pred> {
        self.var_compare(var, state, false)
    }

    fn var_compare(&self, var: Var, state: State, equal: bool) -> Result<Pred> {
        self.check_var(var)?;
        let fsm = self.var_type(var);
        self.validate(fsm, state)?;

        let mut cache = self.cache.borrow_mut();
        let children: Vec<Pred> = self
            .states(fsm)
            .into_iter()
            .map(|s| cache.constant(s.is(state) == equal))
            .collect();
        Ok(cache.case_split(var, &children))
    }
}
