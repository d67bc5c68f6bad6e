use std::fmt::{Display, Formatter};

/// A reference to a canonical predicate node stored in a
/// [`PredicateCache`][crate::cache::PredicateCache].
///
/// Since the cache hash-conses every node, two references are equal iff the
/// predicates they denote are structurally equal.
///
/// # Terminal Values
///
/// - `Pred::FALSE` (⊥) — the constant false predicate
/// - `Pred::TRUE` (⊤) — the constant true predicate
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Pred(u32);

impl Pred {
    /// The constant false predicate.
    pub const FALSE: Pred = Pred(0);

    /// The constant true predicate.
    pub const TRUE: Pred = Pred(1);

    pub(crate) const fn new(index: u32) -> Self {
        Pred(index)
    }

    /// Returns one of the two constant predicates.
    pub const fn constant(value: bool) -> Self {
        if value {
            Pred::TRUE
        } else {
            Pred::FALSE
        }
    }

    /// Returns the index for storage access.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns true if this is one of the two constants.
    pub const fn is_const(self) -> bool {
        self.0 <= 1
    }

    pub const fn is_false(self) -> bool {
        self.0 == 0
    }

    pub const fn is_true(self) -> bool {
        self.0 == 1
    }
}

impl Display for Pred {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            0 => write!(f, "⊥"),
            1 => write!(f, "⊤"),
            _ => write!(f, "#{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(Pred::constant(false), Pred::FALSE);
        assert_eq!(Pred::constant(true), Pred::TRUE);
        assert_ne!(Pred::FALSE, Pred::TRUE);
        assert!(Pred::FALSE.is_const() && Pred::FALSE.is_false());
        assert!(Pred::TRUE.is_const() && Pred::TRUE.is_true());
        assert!(!Pred::new(2).is_const());
    }

    #[test]
    fn test_display() {
        assert_eq!(Pred::FALSE.to_string(), "⊥");
        assert_eq!(Pred::TRUE.to_string(), "⊤");
        assert_eq!(Pred::new(7).to_string(), "#7");
    }
}
