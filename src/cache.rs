//! Predicate storage and canonicalization.
//!
//! [`PredicateCache`] is the only place where predicate nodes are created.
//! It hands out the two constant singletons and hash-conses case-split nodes
//! through per-variable [`Subtable`]s, so that structurally equal predicates
//! are always the same [`Pred`]. The boolean operators are memoized in a
//! [`ComputedTable`].
//!
//! The cache does not know the FSM types of variables. Arity checks against a
//! variable's type happen in [`Device::case_split`][crate::device::Device::case_split].

use log::debug;

use crate::computed::{ComputedTable, OpKey};
use crate::node::PredNode;
use crate::reference::Pred;
use crate::subtable::Subtable;
use crate::types::Var;
use crate::utils::{pairing_seq, MyHash};

pub struct PredicateCache {
    /// Node storage. Index 0 = FALSE, index 1 = TRUE.
    nodes: Vec<PredNode>,
    /// Structural hash of each stored node.
    hashes: Vec<u64>,
    /// Unique tables, indexed by variable index.
    subtables: Vec<Subtable>,
    computed: ComputedTable,
}

impl Default for PredicateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PredicateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredicateCache")
            .field("nodes", &self.nodes.len())
            .field("computed", &self.computed.len())
            .field("hits", &self.computed.hits())
            .field("misses", &self.computed.misses())
            .finish()
    }
}

impl PredicateCache {
    pub fn new() -> Self {
        let nodes = vec![PredNode::Const(false), PredNode::Const(true)];
        let hashes = vec![MyHash::hash(&false), MyHash::hash(&true)];
        Self {
            nodes,
            hashes,
            subtables: Vec::new(),
            computed: ComputedTable::new(),
        }
    }

    /// Number of stored nodes, including both constants.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the two constants are allocated up front.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Computed-table hits.
    pub fn hits(&self) -> usize {
        self.computed.hits()
    }

    /// Computed-table misses.
    pub fn misses(&self) -> usize {
        self.computed.misses()
    }

    pub fn node(&self, pred: Pred) -> &PredNode {
        &self.nodes[pred.index()]
    }

    pub fn const_value(&self, pred: Pred) -> Option<bool> {
        match self.node(pred) {
            PredNode::Const(value) => Some(*value),
            PredNode::CaseSplit { .. } => None,
        }
    }

    pub fn variable(&self, pred: Pred) -> Option<Var> {
        self.node(pred).variable()
    }

    pub fn children(&self, pred: Pred) -> &[Pred] {
        self.node(pred).children()
    }

    /// Returns one of the two constant singletons.
    pub fn constant(&self, value: bool) -> Pred {
        Pred::constant(value)
    }

    /// Returns the canonical case-split on `variable` with the given children.
    ///
    /// If a structurally equal node already exists, its reference is returned.
    pub fn case_split(&mut self, variable: Var, children: &[Pred]) -> Pred {
        let v = variable.index();
        if self.subtables.len() <= v {
            self.subtables.resize_with(v + 1, Subtable::new);
        }

        if let Some(existing) = self.subtables[v].find(children) {
            debug!("case_split({}, {:?}) -> {} (existing)", variable, children, existing);
            return existing;
        }

        let hash = pairing_seq(
            MyHash::hash(&variable),
            children.iter().map(|c| self.hashes[c.index()]),
        );
        let pred = Pred::new(self.nodes.len() as u32);
        let children: Box<[Pred]> = children.into();
        self.nodes.push(PredNode::CaseSplit {
            variable,
            children: children.clone(),
        });
        self.hashes.push(hash);
        self.subtables[v].insert(children, pred);
        debug!("case_split({}, ..) -> {} (new)", variable, pred);
        pred
    }

    /// Structural equality.
    ///
    /// Two case-splits are equal iff they split on the same variable and all
    /// corresponding children are equal. With hash-consing this coincides
    /// with reference equality; the full comparison is kept as the contract.
    pub fn equals(&self, a: Pred, b: Pred) -> bool {
        if a == b {
            return true;
        }
        match (self.node(a), self.node(b)) {
            (PredNode::Const(x), PredNode::Const(y)) => x == y,
            (
                PredNode::CaseSplit {
                    variable: va,
                    children: ca,
                },
                PredNode::CaseSplit {
                    variable: vb,
                    children: cb,
                },
            ) => va == vb && ca.len() == cb.len() && ca.iter().zip(cb.iter()).all(|(&x, &y)| self.equals(x, y)),
            _ => false,
        }
    }

    /// Structural hash, consistent with [`equals`][Self::equals].
    ///
    /// Constants hash as their boolean value.
    pub fn hash(&self, pred: Pred) -> u64 {
        self.hashes[pred.index()]
    }

    pub fn apply_not(&mut self, a: Pred) -> Pred {
        debug!("apply_not(a = {})", a);

        if a.is_const() {
            return Pred::constant(a.is_false());
        }

        let key = OpKey::Not(a);
        if let Some(res) = self.computed.get(&key) {
            debug!("cache: not({}) -> {}", a, res);
            return res;
        }

        let Some(variable) = self.variable(a) else {
            unreachable!("non-constant predicate {} must be a case-split", a)
        };
        let children: Vec<Pred> = self.children(a).to_vec();
        let children: Vec<Pred> = children.into_iter().map(|c| self.apply_not(c)).collect();
        let res = self.case_split(variable, &children);

        self.computed.insert(key, res);
        res
    }

    pub fn apply_and(&mut self, a: Pred, b: Pred) -> Pred {
        debug!("apply_and(a = {}, b = {})", a, b);

        // Constant folding:
        //   0 & B => 0,  A & 0 => 0
        //   1 & B => B,  A & 1 => A
        //   A & A => A
        if a.is_false() || b.is_false() {
            return Pred::FALSE;
        }
        if a.is_true() {
            return b;
        }
        if b.is_true() {
            return a;
        }
        if a == b {
            return a;
        }

        let key = OpKey::and(a, b);
        if let Some(res) = self.computed.get(&key) {
            debug!("cache: and({}, {}) -> {}", a, b, res);
            return res;
        }
        let res = self.apply_binary(a, b, Self::apply_and);
        self.computed.insert(key, res);
        res
    }

    pub fn apply_or(&mut self, a: Pred, b: Pred) -> Pred {
        debug!("apply_or(a = {}, b = {})", a, b);

        // Constant folding:
        //   1 | B => 1,  A | 1 => 1
        //   0 | B => B,  A | 0 => A
        //   A | A => A
        if a.is_true() || b.is_true() {
            return Pred::TRUE;
        }
        if a.is_false() {
            return b;
        }
        if b.is_false() {
            return a;
        }
        if a == b {
            return a;
        }

        let key = OpKey::or(a, b);
        if let Some(res) = self.computed.get(&key) {
            debug!("cache: or({}, {}) -> {}", a, b, res);
            return res;
        }
        let res = self.apply_binary(a, b, Self::apply_or);
        self.computed.insert(key, res);
        res
    }

    /// Shannon-style expansion of a binary operation over two case-splits.
    ///
    /// Splits on the earlier-declared of the two top variables. When both split
    /// on the same variable, children are combined pairwise; otherwise the other
    /// operand is pushed down into every child of the split.
    fn apply_binary(&mut self, a: Pred, b: Pred, op: fn(&mut Self, Pred, Pred) -> Pred) -> Pred {
        let (Some(va), Some(vb)) = (self.variable(a), self.variable(b)) else {
            unreachable!("both operands {} and {} must be case-splits", a, b)
        };

        let (top, children) = if va == vb {
            let ca = self.children(a).to_vec();
            let cb = self.children(b).to_vec();
            assert_eq!(ca.len(), cb.len(), "case-splits on {} have different arity", va);
            let children = ca.into_iter().zip(cb).map(|(x, y)| op(self, x, y)).collect::<Vec<_>>();
            (va, children)
        } else if va < vb {
            let ca = self.children(a).to_vec();
            (va, ca.into_iter().map(|x| op(self, x, b)).collect::<Vec<_>>())
        } else {
            let cb = self.children(b).to_vec();
            (vb, cb.into_iter().map(|y| op(self, a, y)).collect::<Vec<_>>())
        };

        self.case_split(top, &children)
    }
}
