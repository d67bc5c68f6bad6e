//! Operator sugar for building guards.
//!
//! `a & b`, `a | b` and `!a` on [`Pred`]s build lazy expression values, which
//! are turned into canonical predicates by [`Device::eval`]:
//!
//! ```
//! use arbiter::device::Device;
//!
//! let device = Device::new("d");
//! let b = device.declare_fsm("bool").unwrap();
//! let states = device.declare_states(b, ["false", "true"]).unwrap();
//! let x = device.declare_var("x", b, states[0]).unwrap();
//! let y = device.declare_var("y", b, states[0]).unwrap();
//!
//! let x_on = device.var_eq(x, states[1]).unwrap();
//! let y_on = device.var_eq(y, states[1]).unwrap();
//! let exactly_one = device.eval((x_on & !y_on) | (!x_on & y_on));
//! assert_eq!(device.sat_count(exactly_one), 2u32.into());
//! ```

use std::ops::{BitAnd, BitOr, Not};

use crate::device::Device;
use crate::reference::Pred;

#[derive(Debug, Copy, Clone)]
pub struct AndOp<F, G> {
    f: F,
    g: G,
}

#[derive(Debug, Copy, Clone)]
pub struct OrOp<F, G> {
    f: F,
    g: G,
}

#[derive(Debug, Copy, Clone)]
pub struct NotOp<F> {
    f: F,
}

pub trait Eval {
    fn eval(&self, device: &Device) -> Pred;
}

impl Device {
    pub fn eval(&self, value: impl Eval) -> Pred {
        value.eval(self)
    }
}

impl Eval for Pred {
    fn eval(&self, _device: &Device) -> Pred {
        *self
    }
}

impl<F: Eval, G: Eval> Eval for AndOp<F, G> {
    fn eval(&self, device: &Device) -> Pred {
        let f = self.f.eval(device);
        let g = self.g.eval(device);
        device.apply_and(f, g)
    }
}

impl<F: Eval, G: Eval> Eval for OrOp<F, G> {
    fn eval(&self, device: &Device) -> Pred {
        let f = self.f.eval(device);
        let g = self.g.eval(device);
        device.apply_or(f, g)
    }
}

impl<F: Eval> Eval for NotOp<F> {
    fn eval(&self, device: &Device) -> Pred {
        let f = self.f.eval(device);
        device.apply_not(f)
    }
}

macro_rules! impl_ops {
    ($([$($g:ident),*] $t:ty;)*) => {$(
        impl<$($g: Eval,)* R: Eval> BitAnd<R> for $t {
            type Output = AndOp<$t, R>;

            fn bitand(self, rhs: R) -> Self::Output {
                AndOp { f: self, g: rhs }
            }
        }

        impl<$($g: Eval,)* R: Eval> BitOr<R> for $t {
            type Output = OrOp<$t, R>;

            fn bitor(self, rhs: R) -> Self::Output {
                OrOp { f: self, g: rhs }
            }
        }

        impl<$($g: Eval),*> Not for $t {
            type Output = NotOp<$t>;

            fn not(self) -> Self::Output {
                NotOp { f: self }
            }
        }
    )*};
}

impl_ops! {
    [] Pred;
    [F, G] AndOp<F, G>;
    [F, G] OrOp<F, G>;
    [F] NotOp<F>;
}
