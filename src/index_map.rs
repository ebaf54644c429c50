use crate::error::{ArrayError, Result};
use crate::shape::Extents;

/// Integer types accepted as multi-index components.
///
/// Signed values below zero are never wrapped: they are reported as
/// out of range.
pub trait IndexValue: Copy {
    /// The value as an unsigned index, or `None` if it is negative or
    /// does not fit in `usize`.
    fn to_index(self) -> Option<usize>;

    /// Lossless value used in diagnostics.
    fn to_i128(self) -> i128;
}

macro_rules! impl_index_value {
    ($($t:ty),*) => {
        $(
            impl IndexValue for $t {
                #[inline(always)]
                fn to_index(self) -> Option<usize> {
                    usize::try_from(self).ok()
                }

                fn to_i128(self) -> i128 {
                    self as i128
                }
            }
        )*
    };
}

impl_index_value!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Ordering policy: decides strides and the offset <-> multi-index mapping.
pub trait IndexPolicy {
    /// Fill `strides` from `extents` and return the product of all
    /// extents. Both slices have the same length.
    ///
    /// Returns `None` if a stride or the product overflows `usize`; the
    /// contents of `strides` are then unspecified.
    fn make_strides(extents: &[usize], strides: &mut [usize]) -> Option<usize>;

    /// Linear offset of `index` within `shape`.
    fn offset<S, I>(shape: &S, index: &[I]) -> Result<usize>
    where
        S: Extents + ?Sized,
        I: IndexValue;

    /// Write the multi-index of `offset` into `out`.
    fn index_into<S>(shape: &S, offset: usize, out: &mut [usize]) -> Result<()>
    where
        S: Extents + ?Sized;
}

/// C-order: the last index varies fastest.
pub struct RowMajor;

impl IndexPolicy for RowMajor {
    fn make_strides(extents: &[usize], strides: &mut [usize]) -> Option<usize> {
        let mut acc: usize = 1;
        for i in (0..extents.len()).rev() {
            strides[i] = acc;
            acc = acc.checked_mul(extents[i])?;
        }
        Some(acc)
    }

    fn offset<S, I>(shape: &S, index: &[I]) -> Result<usize>
    where
        S: Extents + ?Sized,
        I: IndexValue,
    {
        if index.len() != shape.rank() {
            return Err(ArrayError::RankMismatch {
                expected: shape.rank(),
                got: index.len(),
            });
        }
        if shape.rank() == 0 {
            return Err(ArrayError::OffsetOutOfRange { offset: 0, size: 0 });
        }

        let mut offset = 0;
        for (dim, ((&i, &extent), &stride)) in index
            .iter()
            .zip(shape.extents())
            .zip(shape.strides())
            .enumerate()
        {
            match i.to_index() {
                Some(i) if i < extent => offset += i * stride,
                _ => {
                    return Err(ArrayError::IndexOutOfRange {
                        dim,
                        index: i.to_i128(),
                        extent,
                    })
                }
            }
        }
        Ok(offset)
    }

    fn index_into<S>(shape: &S, offset: usize, out: &mut [usize]) -> Result<()>
    where
        S: Extents + ?Sized,
    {
        if out.len() != shape.rank() {
            return Err(ArrayError::RankMismatch {
                expected: shape.rank(),
                got: out.len(),
            });
        }
        if offset >= shape.size() {
            return Err(ArrayError::OffsetOutOfRange {
                offset,
                size: shape.size(),
            });
        }

        let mut rest = offset;
        for (slot, &stride) in out.iter_mut().zip(shape.strides()) {
            *slot = rest / stride;
            rest %= stride;
        }
        Ok(())
    }
}

/// Checked C-order offset of `index` within `shape`.
pub fn offset<S, I>(shape: &S, index: &[I]) -> Result<usize>
where
    S: Extents + ?Sized,
    I: IndexValue,
{
    RowMajor::offset(shape, index)
}

/// Checked inverse of [`offset`].
pub fn index<S>(shape: &S, offset: usize) -> Result<Vec<usize>>
where
    S: Extents + ?Sized,
{
    let mut out = vec![0; shape.rank()];
    RowMajor::index_into(shape, offset, &mut out)?;
    Ok(out)
}

/// Non-allocating form of [`index`].
pub fn index_into<S>(shape: &S, offset: usize, out: &mut [usize]) -> Result<()>
where
    S: Extents + ?Sized,
{
    RowMajor::index_into(shape, offset, out)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::shape::Shape;
    use crate::strategy::shape_and_index;

    #[test]
    fn offset_and_index_2x3() {
        let s = Shape::new(vec![2, 3]);
        assert_eq!(offset(&s, &[1usize, 2]), Ok(5));
        assert_eq!(index(&s, 5), Ok(vec![1, 2]));
        assert_eq!(offset(&s, &[0u8, 0]), Ok(0));
    }

    #[test]
    fn row_major_roundtrip() {
        let s = Shape::new(vec![3, 4, 5]);
        for i in 0..s.size() {
            let crd = index(&s, i).unwrap();
            assert_eq!(offset(&s, &crd), Ok(i));
        }
    }

    #[test]
    fn offset_range_error_names_dimension() {
        let s = Shape::new(vec![2, 3]);
        assert_eq!(
            offset(&s, &[1usize, 3]),
            Err(ArrayError::IndexOutOfRange { dim: 1, index: 3, extent: 3 })
        );
    }

    #[test]
    fn offset_rank_mismatch() {
        let s = Shape::new(vec![2, 3]);
        assert_eq!(
            offset(&s, &[1usize]),
            Err(ArrayError::RankMismatch { expected: 2, got: 1 })
        );
    }

    #[test]
    fn negative_index_is_out_of_range() {
        let s = Shape::new(vec![2, 3]);
        assert_eq!(
            offset(&s, &[-1i32, 0]),
            Err(ArrayError::IndexOutOfRange { dim: 0, index: -1, extent: 2 })
        );
        assert_eq!(offset(&s, &[1i64, 1]), Ok(4));
    }

    #[test]
    fn index_beyond_size() {
        let s = Shape::new(vec![2, 3]);
        assert_eq!(
            index(&s, 6),
            Err(ArrayError::OffsetOutOfRange { offset: 6, size: 6 })
        );
    }

    #[test]
    fn rank_zero_maps_nothing() {
        let s = Shape::default();
        let empty: [usize; 0] = [];
        assert_eq!(
            offset(&s, &empty),
            Err(ArrayError::OffsetOutOfRange { offset: 0, size: 0 })
        );
        assert!(index(&s, 0).is_err());
    }

    #[test]
    fn make_strides_reports_overflow() {
        let mut strides = [0; 3];
        assert_eq!(RowMajor::make_strides(&[4, 0, 3], &mut strides), Some(0));
        assert_eq!(strides, [0, 3, 1]);
        assert_eq!(
            RowMajor::make_strides(&[2, 1 << 32, 1 << 32], &mut strides),
            None
        );
        let mut strides = [0; 2];
        assert_eq!(RowMajor::make_strides(&[usize::MAX, 1], &mut strides), Some(usize::MAX));
    }

    #[test]
    fn stride_monotonicity() {
        let s = Shape::new(vec![2, 3, 4, 5]);
        let st = s.strides();
        assert_eq!(st[st.len() - 1], 1);
        for d in 0..st.len() - 1 {
            assert!(st[d] > st[d + 1]);
        }
    }

    proptest! {
        #[test]
        fn prop_roundtrip((shape, idx) in shape_and_index(4, 6)) {
            let off = offset(&shape, &idx).unwrap();
            prop_assert!(off < shape.size());
            prop_assert_eq!(index(&shape, off).unwrap(), idx);
        }

        #[test]
        fn prop_size_after_set_extent(
            (shape, _) in shape_and_index(4, 6),
            new_extent in 1usize..7,
        ) {
            let mut shape = shape;
            let dim = shape.rank() - 1;
            shape.set_extent(dim, new_extent).unwrap();
            prop_assert_eq!(shape.size(), shape.extents().iter().product::<usize>());
            for off in 0..shape.size() {
                let idx = index(&shape, off).unwrap();
                prop_assert_eq!(offset(&shape, &idx).unwrap(), off);
            }
        }
    }
}
