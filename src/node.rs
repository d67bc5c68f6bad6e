use crate::reference::Pred;
use crate::types::Var;

/// A stored predicate node.
///
/// A case-split reads the current state of `variable` and continues with
/// the child at that state's position. `children` has exactly one entry per
/// state of the variable's FSM, in canonical state order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PredNode {
    Const(bool),
    CaseSplit { variable: Var, children: Box<[Pred]> },
}

impl PredNode {
    pub fn variable(&self) -> Option<Var> {
        match self {
            PredNode::Const(_) => None,
            PredNode::CaseSplit { variable, .. } => Some(*variable),
        }
    }

    pub fn children(&self) -> &[Pred] {
        match self {
            PredNode::Const(_) => &[],
            PredNode::CaseSplit { children, .. } => children,
        }
    }
}
