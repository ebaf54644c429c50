use std::fmt;
use std::marker::PhantomData;

use crate::shape::{Extents, Shape};

/// Extents fixed at definition time.
///
/// Implement this with [`static_shape!`](crate::static_shape!) rather than
/// by hand, so strides and size are derived by the same rule as [`Shape`].
pub trait StaticExtents: 'static {
    const EXTENTS: &'static [usize];
    const STRIDES: &'static [usize];
    const SIZE: usize;
}

const fn mul(a: usize, b: usize) -> usize {
    match a.checked_mul(b) {
        Some(p) => p,
        None => panic!("static shape element count overflows usize"),
    }
}

/// C-order strides of `extents`, usable in constant context.
///
/// # Panics
///
/// Panics if a stride overflows `usize`. In a constant this is a compile
/// error.
pub const fn c_strides<const R: usize>(extents: [usize; R]) -> [usize; R] {
    let mut strides = [1; R];
    let mut d = R;
    while d > 1 {
        d -= 1;
        strides[d - 1] = mul(strides[d], extents[d]);
    }
    strides
}

/// Element count of `extents`; 0 for rank 0 as with [`Shape`].
///
/// # Panics
///
/// Panics under the same condition as [`Shape::new`].
pub const fn c_size<const R: usize>(extents: [usize; R]) -> usize {
    if R == 0 {
        return 0;
    }
    let mut prod = 1;
    let mut i = R;
    while i > 0 {
        i -= 1;
        prod = mul(prod, extents[i]);
    }
    prod
}

/// Declare a zero-sized type implementing [`StaticExtents`].
///
/// ```
/// use detarray::static_shape;
/// use detarray::static_shape::StaticShape;
/// use detarray::shape::Extents;
///
/// static_shape!(pub Frame = [2, 3]);
///
/// let s = StaticShape::<Frame>::new();
/// assert_eq!(s.strides(), &[3, 1]);
/// assert_eq!(s.size(), 6);
/// ```
#[macro_export]
macro_rules! static_shape {
    ($vis:vis $name:ident = [$($e:expr),* $(,)?]) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        $vis struct $name;

        impl $crate::static_shape::StaticExtents for $name {
            const EXTENTS: &'static [usize] = &[$($e),*];
            const STRIDES: &'static [usize] = &$crate::static_shape::c_strides([$($e),*]);
            const SIZE: usize = $crate::static_shape::c_size([$($e),*]);
        }
    };
}

/// Zero-sized shape whose extents are the constants of `E`.
pub struct StaticShape<E: StaticExtents> {
    _marker: PhantomData<E>,
}

impl<E: StaticExtents> StaticShape<E> {
    pub const fn new() -> Self {
        Self { _marker: PhantomData }
    }

    pub const fn rank(&self) -> usize {
        E::EXTENTS.len()
    }

    /// Convert to a runtime shape.
    pub fn to_shape(&self) -> Shape {
        Shape::new(E::EXTENTS.to_vec())
    }
}

impl<E: StaticExtents> Extents for StaticShape<E> {
    #[inline(always)]
    fn extents(&self) -> &[usize] {
        E::EXTENTS
    }

    #[inline(always)]
    fn strides(&self) -> &[usize] {
        E::STRIDES
    }

    #[inline(always)]
    fn size(&self) -> usize {
        E::SIZE
    }
}

impl<E: StaticExtents> Default for StaticShape<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: StaticExtents> Clone for StaticShape<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: StaticExtents> Copy for StaticShape<E> {}

impl<E: StaticExtents> fmt::Debug for StaticShape<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StaticShape").field(&E::EXTENTS).finish()
    }
}

impl<E: StaticExtents> PartialEq<Shape> for StaticShape<E> {
    fn eq(&self, other: &Shape) -> bool {
        E::EXTENTS == other.extents()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::ArrayError;
    use crate::index_map::{index, offset};

    static_shape!(Frame = [2, 3]);
    static_shape!(Cube = [3, 4, 5]);
    static_shape!(Scalar = []);
    static_shape!(Detector = [5, 7, 2, 3]);

    #[test]
    fn constants_are_derived() {
        assert_eq!(Frame::STRIDES, &[3, 1]);
        assert_eq!(Frame::SIZE, 6);
        assert_eq!(Cube::STRIDES, &[20, 5, 1]);
        assert_eq!(Cube::SIZE, 60);
        assert_eq!(StaticShape::<Cube>::new().rank(), 3);
    }

    #[test]
    fn rank_zero_matches_dynamic_convention() {
        let s = StaticShape::<Scalar>::new();
        assert_eq!(s.size(), 0);
        assert_eq!(s.size(), Shape::default().size());
        let empty: [usize; 0] = [];
        assert_eq!(
            offset(&s, &empty),
            Err(ArrayError::OffsetOutOfRange { offset: 0, size: 0 })
        );
    }

    #[test]
    fn concrete_2x3() {
        let s = StaticShape::<Frame>::new();
        assert_eq!(offset(&s, &[1usize, 2]), Ok(5));
        assert_eq!(index(&s, 5), Ok(vec![1, 2]));
        assert_eq!(
            offset(&s, &[2usize, 0]),
            Err(ArrayError::IndexOutOfRange { dim: 0, index: 2, extent: 2 })
        );
    }

    #[test]
    fn const_layout_checks_overflow() {
        assert_eq!(c_strides([0, 4, 3]), [12, 3, 1]);
        assert_eq!(c_size([0, 4, 3]), 0);
        let big = std::hint::black_box(1usize << (usize::BITS / 2));
        assert!(std::panic::catch_unwind(|| c_size([big, big])).is_err());
        assert!(std::panic::catch_unwind(|| c_strides([2, big, big])).is_err());
    }

    #[test]
    fn to_shape_equals() {
        let s = StaticShape::<Cube>::new();
        let d = s.to_shape();
        assert!(s == d);
        assert_eq!(d.strides(), s.strides());
    }

    #[test]
    fn dynamic_static_equivalence_exhaustive() {
        let s = StaticShape::<Detector>::new();
        let d = s.to_shape();
        for off in 0..d.size() {
            let a = index(&s, off).unwrap();
            let b = index(&d, off).unwrap();
            assert_eq!(a, b);
            assert_eq!(offset(&s, &a), offset(&d, &b));
        }
        assert_eq!(index(&s, d.size()), index(&d, d.size()));
    }

    proptest! {
        #[test]
        fn prop_dynamic_static_agree(i in 0usize..5, j in 0usize..7, k in 0usize..2, l in 0usize..3) {
            let s = StaticShape::<Detector>::new();
            let d = s.to_shape();
            let idx = [i, j, k, l];
            prop_assert_eq!(offset(&s, &idx), offset(&d, &idx));
        }
    }
}
