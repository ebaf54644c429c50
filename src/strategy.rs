//! Property-based generators for shapes, multi-indices and selections.
//!
//! Only included in test builds.

use proptest::prelude::*;

use crate::selection::Selector;
use crate::shape::Shape;
use crate::slice::Slice;

/// A non-empty shape of rank `1..=max_rank`, every extent in
/// `1..=max_extent`.
pub fn gen_shape(max_rank: usize, max_extent: usize) -> BoxedStrategy<Shape> {
    prop::collection::vec(1..=max_extent, 1..=max_rank)
        .prop_map(Shape::new)
        .boxed()
}

/// A shape together with one valid multi-index into it.
pub fn shape_and_index(
    max_rank: usize,
    max_extent: usize,
) -> BoxedStrategy<(Shape, Vec<usize>)> {
    gen_shape(max_rank, max_extent)
        .prop_flat_map(|shape| {
            let idx: Vec<_> = shape.as_slice().iter().map(|&e| 0..e).collect();
            (Just(shape), idx)
        })
        .boxed()
}

/// A valid selector for a dimension of extent `extent`: either a fixed
/// index or a non-empty strided slice contained in `[0, extent)`.
pub fn gen_selector(extent: usize) -> BoxedStrategy<Selector> {
    let fixed = (0..extent).prop_map(Selector::Index);
    let sliced = (0..extent).prop_flat_map(move |first| {
        (first + 1..=extent).prop_flat_map(move |last| {
            (1..=last - first).prop_map(move |stride| {
                Selector::Slice(Slice::with_stride(first, last, stride).unwrap())
            })
        })
    });
    prop_oneof![fixed, sliced].boxed()
}

/// A shape together with a full, valid list of selectors for it.
pub fn shape_and_selectors(
    max_rank: usize,
    max_extent: usize,
) -> BoxedStrategy<(Shape, Vec<Selector>)> {
    gen_shape(max_rank, max_extent)
        .prop_flat_map(|shape| {
            let selectors: Vec<_> = shape.as_slice().iter().map(|&e| gen_selector(e)).collect();
            (Just(shape), selectors)
        })
        .boxed()
}
