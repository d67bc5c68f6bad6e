use std::collections::HashMap;

use log::debug;
use num_bigint::BigUint;

use crate::cache::PredicateCache;
use crate::device::Device;
use crate::error::Result;
use crate::node::PredNode;
use crate::reference::Pred;
use crate::types::{Message, State};

impl Device {
    /// The initial state of every variable, indexed by [`Var::index`][crate::types::Var::index].
    pub fn initial_valuation(&self) -> Vec<State> {
        self.vars.borrow().iter().map(|v| v.initial).collect()
    }

    /// Evaluates `pred` with every variable in the state given by `valuation`.
    ///
    /// Fails with [`TypeMismatch`][crate::error::Error::TypeMismatch] if a
    /// variable that the predicate reads is given a state of another type.
    ///
    /// # Panics
    ///
    /// Panics if `valuation` does not have one entry per variable.
    pub fn holds(&self, pred: Pred, valuation: &[State]) -> Result<bool> {
        assert_eq!(
            valuation.len(),
            self.vars.borrow().len(),
            "Valuation must assign every variable"
        );

        let cache = self.cache.borrow();
        let mut current = pred;
        loop {
            match cache.node(current) {
                PredNode::Const(value) => return Ok(*value),
                PredNode::CaseSplit { variable, children } => {
                    let state = valuation[variable.index()];
                    self.validate(self.var_type(*variable), state)?;
                    current = children[state.index()];
                }
            }
        }
    }

    /// Whether `msg` may fire in `valuation`. Messages without a precondition are always enabled.
    pub fn is_enabled(&self, msg: Message, valuation: &[State]) -> Result<bool> {
        self.check_message(msg)?;
        match self.precondition(msg) {
            None => Ok(true),
            Some(pre) => self.holds(pre, valuation),
        }
    }

    /// Counts the valuations of all device variables that satisfy `pred`.
    pub fn sat_count(&self, pred: Pred) -> BigUint {
        let sizes: Vec<usize> = self
            .vars
            .borrow()
            .iter()
            .map(|v| self.num_states(v.fsm))
            .collect();
        let cache = self.cache.borrow();
        SatCounter::new(&cache, sizes).count(pred)
    }
}

/// Memoized model counting over a [`PredicateCache`].
///
/// `count(p)` is the number of full valuations satisfying `p`. For a split on
/// `v` whose child does not read `v` again, the child's share is
/// `count(child) / |v|`, like the `(low + high) >> 1` step of a BDD count.
/// A child that reads `v` again (a hand-built, out-of-order tree) is counted
/// by walking its paths with `v` fixed.
struct SatCounter<'a> {
    cache: &'a PredicateCache,
    sizes: Vec<usize>,
    max: BigUint,
    lowest: HashMap<Pred, Option<usize>>,
    counts: HashMap<Pred, BigUint>,
}

impl<'a> SatCounter<'a> {
    fn new(cache: &'a PredicateCache, sizes: Vec<usize>) -> Self {
        let max = sizes.iter().map(|&size| BigUint::from(size)).product();
        Self {
            cache,
            sizes,
            max,
            lowest: HashMap::new(),
            counts: HashMap::new(),
        }
    }

    /// Smallest variable index read anywhere in `pred`.
    fn lowest(&mut self, pred: Pred) -> Option<usize> {
        let cache = self.cache;
        let PredNode::CaseSplit { variable, children } = cache.node(pred) else {
            return None;
        };
        if let Some(&res) = self.lowest.get(&pred) {
            return res;
        }
        let mut res = variable.index();
        for &child in children.iter() {
            if let Some(low) = self.lowest(child) {
                res = res.min(low);
            }
        }
        self.lowest.insert(pred, Some(res));
        Some(res)
    }

    fn count(&mut self, pred: Pred) -> BigUint {
        let cache = self.cache;
        let (variable, children) = match cache.node(pred) {
            PredNode::Const(false) => return BigUint::ZERO,
            PredNode::Const(true) => return self.max.clone(),
            PredNode::CaseSplit { variable, children } => (*variable, children),
        };
        if let Some(count) = self.counts.get(&pred) {
            return count.clone();
        }

        let v = variable.index();
        let size = BigUint::from(self.sizes[v]);
        let mut total = BigUint::ZERO;
        for (i, &child) in children.iter().enumerate() {
            if self.lowest(child).map_or(true, |low| low > v) {
                total += self.count(child) / &size;
            } else {
                let mut fixed: Vec<Option<usize>> = vec![None; self.sizes.len()];
                fixed[v] = Some(i);
                total += self.count_fixed(child, &mut fixed);
            }
        }
        debug!("sat_count({}) = {}", pred, total);
        self.counts.insert(pred, total.clone());
        total
    }

    // Counts the valuations of the variables not in `fixed`, reading fixed
    // variables from the path instead of splitting on them again.
    fn count_fixed(&self, pred: Pred, fixed: &mut [Option<usize>]) -> BigUint {
        match self.cache.node(pred) {
            PredNode::Const(false) => BigUint::ZERO,
            PredNode::Const(true) => self
                .sizes
                .iter()
                .zip(fixed.iter())
                .filter(|(_, f)| f.is_none())
                .map(|(&size, _)| BigUint::from(size))
                .product(),
            PredNode::CaseSplit { variable, children } => {
                let v = variable.index();
                if let Some(i) = fixed[v] {
                    return self.count_fixed(children[i], fixed);
                }
                let mut total = BigUint::ZERO;
                for (i, &child) in children.iter().enumerate() {
                    fixed[v] = Some(i);
                    total += self.count_fixed(child, fixed);
                }
                fixed[v] = None;
                total
            }
        }
    }
}
