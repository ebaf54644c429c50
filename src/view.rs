use crate::array::{ArrayRead, ArrayWrite};
use crate::error::Result;
use crate::index_map::IndexValue;
use crate::iter::advance;
use crate::selection::{Selection, Selector};
use crate::shape::{Extents, Shape};

/* ========================= View ========================= */

/// Read-only window onto an array's storage, described by a [`Selection`].
///
/// A view borrows its source, so it can never outlive it and the source
/// cannot be reshaped or reallocated while the view exists. Every access
/// goes through the selection's offset translation.
#[derive(Debug, Clone)]
pub struct View<'a, T> {
    data: &'a [T],
    selection: Selection,
}

/// Mutable window onto an array's storage. Writes go through to the source.
///
/// Holding one excludes every other view of the same array, so overlapping
/// writes cannot happen through safe code.
#[derive(Debug)]
pub struct ViewMut<'a, T> {
    data: &'a mut [T],
    selection: Selection,
}

impl<'a, T> View<'a, T> {
    pub(crate) fn new(data: &'a [T], selection: Selection) -> Self {
        debug_assert_eq!(data.len(), selection.source_shape().size());
        Self { data, selection }
    }

    pub fn shape(&self) -> &Shape {
        self.selection.shape()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Checked element access by effective multi-index.
    pub fn at<I: IndexValue>(&self, index: &[I]) -> Result<&'a T> {
        let off = self.selection.source_offset(index)?;
        Ok(&self.data[off])
    }

    /// The single element of a view that fixes every dimension.
    pub fn element(&self) -> Option<&'a T> {
        self.selection.element_offset().and_then(|off| self.data.get(off))
    }

    /// Narrow this view further; the result borrows the same source.
    pub fn view(&self, selectors: &[Selector]) -> Result<View<'a, T>> {
        Ok(View {
            data: self.data,
            selection: self.selection.compose(selectors)?,
        })
    }

    pub fn iter(&self) -> ViewIter<'_, T> {
        ViewIter::new(self.data, &self.selection)
    }
}

impl<'a, T> ViewMut<'a, T> {
    pub(crate) fn new(data: &'a mut [T], selection: Selection) -> Self {
        debug_assert_eq!(data.len(), selection.source_shape().size());
        Self { data, selection }
    }

    pub fn shape(&self) -> &Shape {
        self.selection.shape()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn at<I: IndexValue>(&self, index: &[I]) -> Result<&T> {
        let off = self.selection.source_offset(index)?;
        Ok(&self.data[off])
    }

    pub fn at_mut<I: IndexValue>(&mut self, index: &[I]) -> Result<&mut T> {
        let off = self.selection.source_offset(index)?;
        Ok(&mut self.data[off])
    }

    pub fn element_mut(&mut self) -> Option<&mut T> {
        self.selection.element_offset().and_then(|off| self.data.get_mut(off))
    }

    /// Read-only view of the same region.
    pub fn as_view(&self) -> View<'_, T> {
        View {
            data: &*self.data,
            selection: self.selection.clone(),
        }
    }

    /// Narrow this view further, reborrowing the source.
    pub fn view_mut(&mut self, selectors: &[Selector]) -> Result<ViewMut<'_, T>> {
        Ok(ViewMut {
            selection: self.selection.compose(selectors)?,
            data: &mut *self.data,
        })
    }

    pub fn iter(&self) -> ViewIter<'_, T> {
        ViewIter::new(&*self.data, &self.selection)
    }
}

/* ========================= iteration ========================= */

/// Visits a view's elements in C-order of the view's shape.
pub struct ViewIter<'b, T> {
    data: &'b [T],
    selection: &'b Selection,
    current: Vec<usize>,
    remaining: usize,
}

impl<'b, T> ViewIter<'b, T> {
    fn new(data: &'b [T], selection: &'b Selection) -> Self {
        Self {
            data,
            selection,
            current: vec![0; selection.rank()],
            remaining: selection.size(),
        }
    }
}

impl<'b, T> Iterator for ViewIter<'b, T> {
    type Item = &'b T;

    fn next(&mut self) -> Option<&'b T> {
        if self.remaining == 0 {
            return None;
        }
        let off = self.selection.source_offset_unchecked(&self.current);
        advance(&mut self.current, self.selection.shape().extents());
        self.remaining -= 1;
        Some(&self.data[off])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for ViewIter<'_, T> {}

impl<'a, T> ArrayRead<T> for View<'a, T> {
    type Elements<'b> = ViewIter<'b, T> where Self: 'b, T: 'b;

    fn shape(&self) -> &Shape {
        self.selection.shape()
    }

    fn elements(&self) -> ViewIter<'_, T> {
        self.iter()
    }
}

impl<'a, T> ArrayRead<T> for ViewMut<'a, T> {
    type Elements<'b> = ViewIter<'b, T> where Self: 'b, T: 'b;

    fn shape(&self) -> &Shape {
        self.selection.shape()
    }

    fn elements(&self) -> ViewIter<'_, T> {
        self.iter()
    }
}

impl<'a, T> ArrayWrite<T> for ViewMut<'a, T> {
    fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        let extents = self.selection.shape().extents();
        let mut current = vec![0; extents.len()];
        for _ in 0..self.selection.size() {
            let off = self.selection.source_offset_unchecked(&current);
            f(&mut self.data[off]);
            advance(&mut current, extents);
        }
    }
}

/* ========================= Tests ========================= */
