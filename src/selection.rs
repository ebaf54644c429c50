use std::ops::{Range, RangeFull};

use crate::error::{ArrayError, Result};
use crate::index_map::{index, offset, IndexValue};
use crate::shape::{Extents, Shape};
use crate::slice::Slice;

/// Choice made along one source dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Fix the dimension at one index; it does not appear in the result.
    Index(usize),
    /// Keep the dimension, restricted to a slice.
    Slice(Slice),
    /// Unit-stride range, validated when the selection is built.
    Range(Range<usize>),
    /// Keep the whole dimension.
    All,
}

impl From<usize> for Selector {
    fn from(i: usize) -> Self {
        Selector::Index(i)
    }
}

impl From<Slice> for Selector {
    fn from(s: Slice) -> Self {
        Selector::Slice(s)
    }
}

impl From<Range<usize>> for Selector {
    fn from(r: Range<usize>) -> Self {
        Selector::Range(r)
    }
}

impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self {
        Selector::All
    }
}

/// Build a `Vec<Selector>` from indices, ranges, slices and `..`.
///
/// ```
/// use detarray::sel;
/// use detarray::selection::Selector;
/// let s = sel![1, 0..3, ..];
/// assert_eq!(s[0], Selector::Index(1));
/// assert_eq!(s[2], Selector::All);
/// ```
#[macro_export]
macro_rules! sel {
    ($($s:expr),* $(,)?) => {
        vec![$($crate::selection::Selector::from($s)),*]
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DimSelection {
    Fixed(usize),
    Kept(Slice),
}

/// Validated per-dimension selection over a source shape.
///
/// Maps the effective (possibly reduced-rank) index space back to linear
/// offsets of the source storage. The mapping is affine, so each
/// translation costs O(rank) and nothing is enumerated up front.
///
/// A selection that fixes every dimension has rank 0 and therefore size 0;
/// the single element it names is available from
/// [`element_offset`](Selection::element_offset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    source: Shape,
    dims: Vec<DimSelection>,
    shape: Shape,
    base: usize,
    strides: Vec<usize>,
}

impl Selection {
    pub fn new<S: Extents + ?Sized>(source: &S, selectors: &[Selector]) -> Result<Self> {
        if selectors.len() != source.rank() {
            return Err(ArrayError::RankMismatch {
                expected: source.rank(),
                got: selectors.len(),
            });
        }

        let mut dims = Vec::with_capacity(selectors.len());
        for (dim, (selector, &extent)) in selectors.iter().zip(source.extents()).enumerate() {
            let out_of_range = |selector: String| ArrayError::SelectorOutOfRange {
                dim,
                selector,
                extent,
            };
            let d = match selector {
                Selector::Index(i) => {
                    if *i >= extent {
                        return Err(out_of_range(i.to_string()));
                    }
                    DimSelection::Fixed(*i)
                }
                Selector::Slice(s) => DimSelection::Kept(*s),
                Selector::Range(r) => DimSelection::Kept(Slice::new(r.start, r.end)?),
                Selector::All => DimSelection::Kept(Slice::new(0, extent)?),
            };
            if let DimSelection::Kept(s) = d {
                if s.last() > extent {
                    return Err(out_of_range(s.to_string()));
                }
            }
            dims.push(d);
        }

        Ok(Self::from_dims(Shape::from(source.extents()), dims))
    }

    fn from_dims(source: Shape, dims: Vec<DimSelection>) -> Self {
        let mut base = 0;
        let mut extents = Vec::new();
        let mut strides = Vec::new();
        for (d, &stride) in dims.iter().zip(source.strides()) {
            match d {
                DimSelection::Fixed(i) => base += i * stride,
                DimSelection::Kept(s) => {
                    base += s.first() * stride;
                    extents.push(s.len());
                    strides.push(s.stride() * stride);
                }
            }
        }

        Self {
            source,
            dims,
            shape: Shape::new(extents),
            base,
            strides,
        }
    }

    /// Shape of the selected region.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn source_shape(&self) -> &Shape {
        &self.source
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn size(&self) -> usize {
        self.shape.size()
    }

    /// Source offset of the one element named by a selection that fixes
    /// every dimension.
    ///
    /// `None` for a rank-0 source, which holds no elements.
    pub fn element_offset(&self) -> Option<usize> {
        (self.shape.rank() == 0 && self.source.size() > 0).then_some(self.base)
    }

    /// Multi-index into the source for effective index `idx`.
    pub fn source_index<I: IndexValue>(&self, idx: &[I]) -> Result<Vec<usize>> {
        let effective = index(&self.shape, offset(&self.shape, idx)?)?;

        let mut kept = effective.iter();
        Ok(self
            .dims
            .iter()
            .map(|d| match d {
                DimSelection::Fixed(i) => *i,
                DimSelection::Kept(s) => kept.next().map_or(s.first(), |&j| s.at(j)),
            })
            .collect())
    }

    /// Checked source offset for effective index `index`.
    pub fn source_offset<I: IndexValue>(&self, index: &[I]) -> Result<usize> {
        let linear = offset(&self.shape, index)?;
        Ok(self.linear_to_source(linear))
    }

    /// Source offset without range checks. `index` must be valid for
    /// [`shape`](Selection::shape).
    #[inline]
    pub fn source_offset_unchecked(&self, index: &[usize]) -> usize {
        debug_assert_eq!(index.len(), self.strides.len());
        self.base
            + index
                .iter()
                .zip(&self.strides)
                .map(|(j, s)| j * s)
                .sum::<usize>()
    }

    /// Source offset of the `linear`-th element of the selection in C-order.
    pub fn source_offset_linear(&self, linear: usize) -> Result<usize> {
        if linear >= self.shape.size() {
            return Err(ArrayError::OffsetOutOfRange {
                offset: linear,
                size: self.shape.size(),
            });
        }
        Ok(self.linear_to_source(linear))
    }

    /// `linear` must be below the selection's size.
    fn linear_to_source(&self, linear: usize) -> usize {
        let mut rest = linear;
        let mut off = self.base;
        for (&st, &s) in self.shape.strides().iter().zip(&self.strides) {
            off += (rest / st) * s;
            rest %= st;
        }
        off
    }

    /// Select again within this selection's shape. The result maps straight
    /// onto the original source.
    pub fn compose(&self, selectors: &[Selector]) -> Result<Self> {
        let inner = Selection::new(&self.shape, selectors)?;

        let mut inner_dims = inner.dims.iter();
        let dims = self
            .dims
            .iter()
            .map(|d| {
                let outer = match d {
                    DimSelection::Fixed(i) => return Ok(DimSelection::Fixed(*i)),
                    DimSelection::Kept(outer) => outer,
                };
                match inner_dims.next() {
                    Some(DimSelection::Fixed(j)) => Ok(DimSelection::Fixed(outer.at(*j))),
                    Some(DimSelection::Kept(s)) => {
                        let first = outer.at(s.first());
                        let last = outer.at(s.first() + (s.len() - 1) * s.stride()) + 1;
                        let stride = if s.len() == 1 { 1 } else { outer.stride() * s.stride() };
                        Slice::with_stride(first, last, stride).map(DimSelection::Kept)
                    }
                    None => Err(ArrayError::RankMismatch {
                        expected: self.rank(),
                        got: inner.dims.len(),
                    }),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_dims(self.source.clone(), dims))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::index_map::index;
    use crate::iter::IndexIter;
    use crate::strategy::shape_and_selectors;

    fn strided(first: usize, last: usize, stride: usize) -> Selector {
        Selector::Slice(Slice::with_stride(first, last, stride).unwrap())
    }

    #[test]
    fn strided_5x4() {
        let source = Shape::new(vec![5, 4]);
        let sel = Selection::new(&source, &[strided(0, 5, 2), strided(0, 4, 3)]).unwrap();
        assert_eq!(sel.shape(), &Shape::new(vec![3, 2]));
        assert_eq!(sel.source_index(&[1, 1]), Ok(vec![2, 3]));
        assert_eq!(sel.source_offset(&[1, 1]), Ok(11));
    }

    #[test]
    fn fixed_index_collapses() {
        let source = Shape::new(vec![4, 5, 6]);
        let sel = Selection::new(&source, &sel![2, .., 1..4]).unwrap();
        assert_eq!(sel.shape(), &Shape::new(vec![5, 3]));
        assert_eq!(sel.source_index(&[4, 0]), Ok(vec![2, 4, 1]));
        assert_eq!(sel.source_offset(&[4, 0]), offset(&source, &[2usize, 4, 1]));
    }

    #[test]
    fn all_fixed_is_rank_zero() {
        let source = Shape::new(vec![3, 3]);
        let sel = Selection::new(&source, &sel![1, 2]).unwrap();
        assert_eq!(sel.rank(), 0);
        assert_eq!(sel.size(), 0);
        assert_eq!(sel.element_offset(), Some(5));

        let kept = Selection::new(&source, &sel![1, ..]).unwrap();
        assert_eq!(kept.element_offset(), None);
    }

    #[test]
    fn rank_zero_source_has_no_element() {
        let sel = Selection::new(&Shape::default(), &[]).unwrap();
        assert_eq!(sel.rank(), 0);
        assert_eq!(sel.element_offset(), None);
    }

    #[test]
    fn signed_effective_indices() {
        let source = Shape::new(vec![4, 5, 6]);
        let sel = Selection::new(&source, &sel![2, .., 1..4]).unwrap();
        assert_eq!(sel.source_offset(&[4i64, 0]), sel.source_offset(&[4usize, 0]));
        assert_eq!(sel.source_index(&[4i8, 2]), Ok(vec![2, 4, 3]));
        assert_eq!(
            sel.source_offset(&[0i32, -1]),
            Err(ArrayError::IndexOutOfRange { dim: 1, index: -1, extent: 3 })
        );
        assert!(sel.source_index(&[-3i16, 0]).is_err());
    }

    #[test]
    fn selector_count_mismatch() {
        let source = Shape::new(vec![3, 3]);
        assert_eq!(
            Selection::new(&source, &sel![1]),
            Err(ArrayError::RankMismatch { expected: 2, got: 1 })
        );
    }

    #[test]
    fn out_of_range_index() {
        let source = Shape::new(vec![3, 3]);
        assert_eq!(
            Selection::new(&source, &sel![0, 3]),
            Err(ArrayError::SelectorOutOfRange {
                dim: 1,
                selector: "3".to_string(),
                extent: 3
            })
        );
    }

    #[test]
    fn out_of_range_slice() {
        let source = Shape::new(vec![3, 3]);
        assert_eq!(
            Selection::new(&source, &sel![.., 1..4]),
            Err(ArrayError::SelectorOutOfRange {
                dim: 1,
                selector: "1:4".to_string(),
                extent: 3
            })
        );
    }

    #[test]
    fn malformed_range() {
        let source = Shape::new(vec![3, 0]);
        assert_eq!(
            Selection::new(&source, &sel![2..2, 0]),
            Err(ArrayError::MalformedSlice { first: 2, last: 2, stride: 1 })
        );
        assert!(matches!(
            Selection::new(&source, &sel![.., ..]),
            Err(ArrayError::MalformedSlice { .. })
        ));
    }

    #[test]
    fn effective_index_checked() {
        let source = Shape::new(vec![5, 4]);
        let sel = Selection::new(&source, &[strided(0, 5, 2), strided(0, 4, 3)]).unwrap();
        assert_eq!(
            sel.source_offset(&[3, 0]),
            Err(ArrayError::IndexOutOfRange { dim: 0, index: 3, extent: 3 })
        );
        assert!(sel.source_index(&[0]).is_err());
    }

    #[test]
    fn linear_matches_multi_index() {
        let source = Shape::new(vec![6, 5, 4]);
        let sel = Selection::new(&source, &[strided(1, 6, 2), Selector::Index(3), strided(0, 4, 2)])
            .unwrap();
        for (k, idx) in IndexIter::new(sel.shape()).enumerate() {
            assert_eq!(sel.source_offset_linear(k), sel.source_offset(&idx));
        }
        assert!(sel.source_offset_linear(sel.size()).is_err());
    }

    #[test]
    fn compose_maps_to_source() {
        let source = Shape::new(vec![10, 8]);
        let outer = Selection::new(&source, &[strided(1, 10, 2), Selector::Range(2..8)]).unwrap();
        assert_eq!(outer.shape(), &Shape::new(vec![5, 6]));

        let inner = outer.compose(&[strided(1, 5, 2), Selector::Index(4)]).unwrap();
        assert_eq!(inner.shape(), &Shape::new(vec![2]));
        // outer rows 1 and 3 are source rows 3 and 7; outer column 4 is source column 6
        assert_eq!(inner.source_index(&[0]), Ok(vec![3, 6]));
        assert_eq!(inner.source_index(&[1]), Ok(vec![7, 6]));
    }

    #[test]
    fn compose_single_element_slice() {
        let source = Shape::new(vec![10]);
        let outer = Selection::new(&source, &[strided(0, 10, 3)]).unwrap();
        let inner = outer.compose(&[strided(2, 3, 1)]).unwrap();
        assert_eq!(inner.shape(), &Shape::new(vec![1]));
        assert_eq!(inner.source_offset(&[0]), Ok(6));
    }

    proptest! {
        #[test]
        fn prop_rank_reduction((source, selectors) in shape_and_selectors(4, 6)) {
            let sel = Selection::new(&source, &selectors).unwrap();
            let kept: Vec<usize> = selectors
                .iter()
                .filter_map(|s| match s {
                    Selector::Slice(s) => Some(s.len()),
                    _ => None,
                })
                .collect();
            prop_assert_eq!(sel.rank(), kept.len());
            prop_assert_eq!(sel.shape().extents(), &kept[..]);
        }

        #[test]
        fn prop_affine_equals_reconstruction((source, selectors) in shape_and_selectors(4, 6)) {
            let sel = Selection::new(&source, &selectors).unwrap();
            for idx in IndexIter::new(sel.shape()) {
                let src = sel.source_index(&idx).unwrap();
                let off = sel.source_offset(&idx).unwrap();
                prop_assert_eq!(offset(&source, &src).unwrap(), off);
                prop_assert_eq!(index(&source, off).unwrap(), src);
            }
        }
    }
}
