use num::Zero;

use crate::array::{ArrayRead, ArrayWrite};
use crate::types::Numeric;

/* ========================= reductions ========================= */

/// Sum of all elements, accumulated in `T::Sum` so that small integer
/// types do not overflow.
pub fn sum<T, A>(a: &A) -> T::Sum
where
    T: Numeric,
    A: ArrayRead<T> + ?Sized,
{
    a.elements()
        .fold(<T::Sum as Zero>::zero(), |acc, &x| acc + x.widen())
}

/// Smallest element, or `None` if `a` is empty.
pub fn min<T, A>(a: &A) -> Option<T>
where
    T: Copy + PartialOrd,
    A: ArrayRead<T> + ?Sized,
{
    a.elements()
        .copied()
        .reduce(|m, v| if v < m { v } else { m })
}

/// Largest element, or `None` if `a` is empty.
pub fn max<T, A>(a: &A) -> Option<T>
where
    T: Copy + PartialOrd,
    A: ArrayRead<T> + ?Sized,
{
    a.elements()
        .copied()
        .reduce(|m, v| if v > m { v } else { m })
}

/// `(min, max)` in a single pass.
pub fn min_max<T, A>(a: &A) -> Option<(T, T)>
where
    T: Copy + PartialOrd,
    A: ArrayRead<T> + ?Sized,
{
    let mut it = a.elements().copied();
    let first = it.next()?;
    Some(it.fold((first, first), |(lo, hi), v| {
        (if v < lo { v } else { lo }, if v > hi { v } else { hi })
    }))
}

/* ========================= clipping ========================= */

/// Values `<= minth` become `minth`, values `>= maxth` become `maxth`.
pub fn clip<T, A>(a: &mut A, minth: T, maxth: T)
where
    T: Copy + PartialOrd,
    A: ArrayWrite<T> + ?Sized,
{
    clip_with(a, minth, maxth, minth, maxth)
}

/// Values `<= minth` become `minval`; afterwards values `>= maxth` become
/// `maxval`.
pub fn clip_with<T, A>(a: &mut A, minth: T, maxth: T, minval: T, maxval: T)
where
    T: Copy + PartialOrd,
    A: ArrayWrite<T> + ?Sized,
{
    a.for_each_mut(|v| {
        if *v <= minth {
            *v = minval;
        }
        if *v >= maxth {
            *v = maxval;
        }
    });
}

pub fn min_clip<T, A>(a: &mut A, threshold: T)
where
    T: Copy + PartialOrd,
    A: ArrayWrite<T> + ?Sized,
{
    min_clip_with(a, threshold, threshold)
}

/// Values `<= threshold` become `value`.
pub fn min_clip_with<T, A>(a: &mut A, threshold: T, value: T)
where
    T: Copy + PartialOrd,
    A: ArrayWrite<T> + ?Sized,
{
    a.for_each_mut(|v| {
        if *v <= threshold {
            *v = value;
        }
    });
}

pub fn max_clip<T, A>(a: &mut A, threshold: T)
where
    T: Copy + PartialOrd,
    A: ArrayWrite<T> + ?Sized,
{
    max_clip_with(a, threshold, threshold)
}

/// Values `>= threshold` become `value`.
pub fn max_clip_with<T, A>(a: &mut A, threshold: T, value: T)
where
    T: Copy + PartialOrd,
    A: ArrayWrite<T> + ?Sized,
{
    a.for_each_mut(|v| {
        if *v >= threshold {
            *v = value;
        }
    });
}

/* ========================= Tests ========================= */
