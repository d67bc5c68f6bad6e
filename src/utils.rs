use crate::reference::Pred;
use crate::types::Var;

/// [Szudzik pairing function][szudzik-pairing].
///
/// ```text
/// (a, b) -> if (a<b) then (b^2 + a) else (a^2 + a + b)
/// ```
///
/// Arithmetic wraps, so large inputs degrade into an ordinary hash instead of overflowing.
///
/// [szudzik-pairing]: http://szudzik.com/ElegantPairing.pdf
pub fn pairing_szudzik(a: u64, b: u64) -> u64 {
    if a < b {
        b.wrapping_mul(b).wrapping_add(a)
    } else {
        a.wrapping_mul(a).wrapping_add(a).wrapping_add(b)
    }
}

/// [Pairing function][pairing] for two `u64` values.
///
/// [pairing]: https://en.wikipedia.org/wiki/Pairing_function
pub fn pairing2(a: u64, b: u64) -> u64 {
    pairing_szudzik(a, b)
}

/// Left fold of [`pairing2`] over a sequence, starting from `seed`.
pub fn pairing_seq(seed: u64, values: impl IntoIterator<Item = u64>) -> u64 {
    values.into_iter().fold(seed, pairing2)
}

pub trait MyHash {
    /// Perfect (for small inputs) hash function.
    fn hash(&self) -> u64;
}

impl MyHash for bool {
    fn hash(&self) -> u64 {
        *self as u64
    }
}

impl MyHash for Var {
    fn hash(&self) -> u64 {
        self.index() as u64
    }
}

impl MyHash for Pred {
    fn hash(&self) -> u64 {
        self.index() as u64
    }
}
