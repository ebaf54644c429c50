use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use crate::array::{Array, ArrayRead, ArrayWrite};
use crate::buffer::Storage;
use crate::error::Result;
use crate::types::Numeric;
use crate::view::ViewMut;

/// In-place elementwise arithmetic for anything writable.
///
/// Operands of the `try_*` forms must have exactly the same shape as
/// `self`; equal size alone is rejected.
pub trait InplaceArithmetic<T: Numeric>: ArrayWrite<T> {
    fn add_scalar(&mut self, rhs: T) {
        self.for_each_mut(|a| *a += rhs);
    }

    fn sub_scalar(&mut self, rhs: T) {
        self.for_each_mut(|a| *a -= rhs);
    }

    fn mul_scalar(&mut self, rhs: T) {
        self.for_each_mut(|a| *a *= rhs);
    }

    fn div_scalar(&mut self, rhs: T) {
        self.for_each_mut(|a| *a /= rhs);
    }

    fn try_add_assign<R: ArrayRead<T> + ?Sized>(&mut self, rhs: &R) -> Result<()> {
        self.zip_apply(rhs, |a, &b| *a += b)
    }

    fn try_sub_assign<R: ArrayRead<T> + ?Sized>(&mut self, rhs: &R) -> Result<()> {
        self.zip_apply(rhs, |a, &b| *a -= b)
    }

    fn try_mul_assign<R: ArrayRead<T> + ?Sized>(&mut self, rhs: &R) -> Result<()> {
        self.zip_apply(rhs, |a, &b| *a *= b)
    }

    fn try_div_assign<R: ArrayRead<T> + ?Sized>(&mut self, rhs: &R) -> Result<()> {
        self.zip_apply(rhs, |a, &b| *a /= b)
    }
}

impl<T: Numeric, A: ArrayWrite<T>> InplaceArithmetic<T> for A {}

/* ---------- scalar operators ---------- */

macro_rules! impl_scalar_assign {
    ($($trait:ident :: $method:ident => $op:tt),* $(,)?) => {
        $(
            impl<T: Numeric, S: Storage<T>> $trait<T> for Array<T, S> {
                fn $method(&mut self, rhs: T) {
                    self.for_each_mut(|a| *a $op rhs);
                }
            }

            impl<T: Numeric> $trait<T> for ViewMut<'_, T> {
                fn $method(&mut self, rhs: T) {
                    self.for_each_mut(|a| *a $op rhs);
                }
            }
        )*
    };
}

impl_scalar_assign! {
    AddAssign::add_assign => +=,
    SubAssign::sub_assign => -=,
    MulAssign::mul_assign => *=,
    DivAssign::div_assign => /=,
}

/* ---------- binary operations ---------- */

macro_rules! impl_binary {
    ($($(#[$doc:meta])* $name:ident => $inplace:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name<T, L, R>(lhs: &L, rhs: &R) -> Result<Array<T>>
            where
                T: Numeric,
                L: ArrayRead<T> + ?Sized,
                R: ArrayRead<T> + ?Sized,
            {
                let mut out = lhs.to_array()?;
                out.$inplace(rhs)?;
                Ok(out)
            }
        )*
    };
}

impl_binary! {
    /// Elementwise `lhs + rhs` into a new array.
    add => try_add_assign,
    sub => try_sub_assign,
    mul => try_mul_assign,
    /// Elementwise `lhs / rhs`; integer division by zero panics as it does
    /// for the scalar types.
    div => try_div_assign,
}

/* ========================= Tests ========================= */
