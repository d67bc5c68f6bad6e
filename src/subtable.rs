//! Per-variable unique table for case-split nodes.
//!
//! The [`PredicateCache`][crate::cache::PredicateCache] keeps one subtable per
//! variable. All nodes in a subtable split on that variable, so the key is the
//! child sequence alone:
//!
//! ```text
//! subtables[0] → Subtable for v0: (c0, c1, ...) → node
//! subtables[1] → Subtable for v1: (c0, c1, c2, ...) → node
//! ...
//! ```
//!
//! A lookup hit means a structurally equal node already exists and its
//! reference is returned instead of allocating a new one.

use std::collections::HashMap;

use crate::reference::Pred;

#[derive(Debug, Clone, Default)]
pub struct Subtable {
    /// Map from the child sequence to the canonical node.
    nodes: HashMap<Box<[Pred]>, Pred>,
}

impl Subtable {
    /// Create a new empty subtable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a node by its children.
    pub fn find(&self, children: &[Pred]) -> Option<Pred> {
        self.nodes.get(children).copied()
    }

    /// Insert a node into the subtable.
    pub fn insert(&mut self, children: Box<[Pred]>, node: Pred) {
        self.nodes.insert(children, node);
    }

    /// Get the number of nodes in this subtable.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the subtable is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtable_basic() {
        let mut st = Subtable::new();
        let children = [Pred::FALSE, Pred::TRUE];

        assert!(st.find(&children).is_none());

        st.insert(Box::new(children), Pred::new(2));
        assert_eq!(st.find(&children), Some(Pred::new(2)));
        assert_eq!(st.find(&[Pred::TRUE, Pred::FALSE]), None);
        assert_eq!(st.len(), 1);
    }

    #[test]
    fn test_subtable_multiple_nodes() {
        let mut st = Subtable::new();

        st.insert(Box::new([Pred::FALSE, Pred::TRUE]), Pred::new(2));
        st.insert(Box::new([Pred::TRUE, Pred::FALSE]), Pred::new(3));
        st.insert(Box::new([Pred::TRUE, Pred::FALSE, Pred::FALSE]), Pred::new(4));

        assert_eq!(st.len(), 3);
        assert_eq!(st.find(&[Pred::TRUE, Pred::FALSE]), Some(Pred::new(3)));
        assert_eq!(st.find(&[Pred::TRUE, Pred::FALSE, Pred::FALSE]), Some(Pred::new(4)));
        assert_eq!(st.find(&[Pred::FALSE, Pred::FALSE]), None);
    }
}
