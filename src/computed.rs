//! Computed table: memoization of predicate operations.
//!
//! Backed by [HashMap], so there are no collisions and results are never
//! evicted. Keys of commutative operations are normalized so that `a & b` and
//! `b & a` share an entry.

use std::cmp::{max, min};
use std::collections::HashMap;

use crate::reference::Pred;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OpKey {
    And(Pred, Pred),
    Or(Pred, Pred),
    Not(Pred),
}

impl OpKey {
    pub fn and(a: Pred, b: Pred) -> Self {
        OpKey::And(min(a, b), max(a, b))
    }

    pub fn or(a: Pred, b: Pred) -> Self {
        OpKey::Or(min(a, b), max(a, b))
    }
}

#[derive(Debug, Default)]
pub struct ComputedTable {
    map: HashMap<OpKey, Pred>,
    hits: usize,
    misses: usize,
}

impl ComputedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Looks up a memoized result.
    pub fn get(&mut self, key: &OpKey) -> Option<Pred> {
        match self.map.get(key) {
            Some(&res) => {
                self.hits += 1;
                Some(res)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: OpKey, value: Pred) {
        self.map.insert(key, value);
    }
}
