//! Model construction errors.

use thiserror::Error;

/// Errors raised while declaring a model.
///
/// Every error is fatal for the model being built: fix the declaration and rebuild.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("name `{name}` is already declared")]
    DuplicateName { name: String },

    #[error("state `{state}` is not a state of `{expected}`")]
    TypeMismatch { state: String, expected: String },

    #[error("variable `{var}` is already assigned in `{target}`")]
    DuplicateAssignment { var: String, target: String },

    #[error("fsm `{fsm}` already types a variable and cannot get new states")]
    FsmInUse { fsm: String },

    #[error("{handle} was not declared by device `{device}`")]
    ForeignHandle { handle: String, device: String },

    #[error("no active assignment scope")]
    NoActiveScope,

    #[error("case-split on `{var}` needs {expected} children, got {actual}")]
    ChildCount {
        var: String,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
