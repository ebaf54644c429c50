use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::buffer::{DBuffer, Storage};
use crate::error::{ArrayError, Result};
use crate::index_map::{offset, IndexValue};
use crate::selection::{Selection, Selector};
use crate::shape::{Extents, Shape};
use crate::view::{View, ViewMut};

/* ========================= access traits ========================= */

/// Read access shared by arrays and views.
pub trait ArrayRead<T> {
    type Elements<'a>: Iterator<Item = &'a T>
    where
        Self: 'a,
        T: 'a;

    fn shape(&self) -> &Shape;

    /// All elements in C-order of [`shape`](ArrayRead::shape).
    fn elements(&self) -> Self::Elements<'_>;

    fn size(&self) -> usize {
        self.shape().size()
    }

    fn rank(&self) -> usize {
        self.shape().rank()
    }

    /// Copy the elements into a fresh, contiguous array.
    fn to_array(&self) -> Result<Array<T>>
    where
        T: Clone,
    {
        Array::from_vec(self.shape().clone(), self.elements().cloned().collect())
    }
}

/// Write access shared by arrays and mutable views.
pub trait ArrayWrite<T>: ArrayRead<T> {
    /// Visit every element mutably in C-order.
    fn for_each_mut(&mut self, f: impl FnMut(&mut T));

    /// Combine each element with the element at the same position of `rhs`.
    /// Shapes must be identical, not merely of equal size.
    fn zip_apply<R>(&mut self, rhs: &R, mut f: impl FnMut(&mut T, &T)) -> Result<()>
    where
        R: ArrayRead<T> + ?Sized,
    {
        if self.shape() != rhs.shape() {
            return Err(ArrayError::ShapeMismatch {
                expected: self.shape().clone(),
                got: rhs.shape().clone(),
            });
        }
        let mut others = rhs.elements();
        self.for_each_mut(|a| {
            if let Some(b) = others.next() {
                f(a, b)
            }
        });
        Ok(())
    }

    fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.for_each_mut(|a| *a = value.clone());
    }

    /// Overwrite with the elements of a same-shape `src`.
    fn assign<R>(&mut self, src: &R) -> Result<()>
    where
        R: ArrayRead<T> + ?Sized,
        T: Clone,
    {
        self.zip_apply(src, |a, b| *a = b.clone())
    }
}

/* ========================= Array ========================= */

/// Shape coupled with storage whose size always equals the shape's size.
///
/// Storage order is C-order and contiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct Array<T, S = DBuffer<T>> {
    shape: Shape,
    data: S,
    _marker: PhantomData<T>,
}

impl<T, S: Storage<T>> Array<T, S> {
    /// Allocate default-valued elements for `shape`.
    pub fn new(shape: impl Into<Shape>) -> Result<Self>
    where
        T: Default + Clone,
    {
        let shape = shape.into();
        let data = S::allocate(shape.size())?;
        Ok(Self { shape, data, _marker: PhantomData })
    }

    /// Adopt an existing buffer; its size must equal the shape's size.
    pub fn from_buffer(shape: impl Into<Shape>, data: S) -> Result<Self> {
        let shape = shape.into();
        if data.size() != shape.size() {
            return Err(ArrayError::SizeMismatch {
                expected: shape.size(),
                got: data.size(),
            });
        }
        Ok(Self { shape, data, _marker: PhantomData })
    }

    pub fn from_vec(shape: impl Into<Shape>, data: Vec<T>) -> Result<Self> {
        Self::from_buffer(shape, S::from_vec(data))
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn size(&self) -> usize {
        self.shape.size()
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn storage(&self) -> &S {
        &self.data
    }

    pub fn into_storage(self) -> S {
        self.data
    }

    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data.as_mut_slice()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Reinterpret the storage under a shape of the same size.
    pub fn reshape(&mut self, shape: impl Into<Shape>) -> Result<()> {
        let shape = shape.into();
        if shape.size() != self.size() {
            return Err(ArrayError::SizeMismatch {
                expected: self.size(),
                got: shape.size(),
            });
        }
        tracing::debug!(from = %self.shape, to = %shape, "reshape");
        self.shape = shape;
        Ok(())
    }

    /// Checked element access by multi-index.
    pub fn at<I: IndexValue>(&self, index: &[I]) -> Result<&T> {
        let off = offset(&self.shape, index)?;
        Ok(&self.as_slice()[off])
    }

    pub fn at_mut<I: IndexValue>(&mut self, index: &[I]) -> Result<&mut T> {
        let off = offset(&self.shape, index)?;
        Ok(&mut self.as_mut_slice()[off])
    }

    /// Element at linear `offset` without any bounds check.
    ///
    /// # Safety
    /// `offset` must be less than [`size`](Array::size).
    pub unsafe fn get_unchecked(&self, offset: usize) -> &T {
        &*self.data.as_ptr().add(offset)
    }

    /// # Safety
    /// `offset` must be less than [`size`](Array::size).
    pub unsafe fn get_unchecked_mut(&mut self, offset: usize) -> &mut T {
        &mut *self.data.as_mut_ptr().add(offset)
    }

    /// Borrow a region of this array without copying.
    pub fn view(&self, selectors: &[Selector]) -> Result<View<'_, T>> {
        let selection = Selection::new(&self.shape, selectors)?;
        tracing::debug!(source = %self.shape, view = %selection.shape(), "view");
        Ok(View::new(self.as_slice(), selection))
    }

    /// Mutably borrow a region of this array; writes go to this storage.
    pub fn view_mut(&mut self, selectors: &[Selector]) -> Result<ViewMut<'_, T>> {
        let selection = Selection::new(&self.shape, selectors)?;
        tracing::debug!(source = %self.shape, view = %selection.shape(), "view_mut");
        Ok(ViewMut::new(self.as_mut_slice(), selection))
    }
}

/// Unchecked linear access: panics when `offset >= size()`.
impl<T, S: Storage<T>> Index<usize> for Array<T, S> {
    type Output = T;

    fn index(&self, offset: usize) -> &T {
        &self.as_slice()[offset]
    }
}

impl<T, S: Storage<T>> IndexMut<usize> for Array<T, S> {
    fn index_mut(&mut self, offset: usize) -> &mut T {
        &mut self.as_mut_slice()[offset]
    }
}

impl<T, S: Storage<T>> ArrayRead<T> for Array<T, S> {
    type Elements<'a> = std::slice::Iter<'a, T> where Self: 'a, T: 'a;

    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn elements(&self) -> Self::Elements<'_> {
        self.as_slice().iter()
    }
}

impl<T, S: Storage<T>> ArrayWrite<T> for Array<T, S> {
    fn for_each_mut(&mut self, f: impl FnMut(&mut T)) {
        self.as_mut_slice().iter_mut().for_each(f);
    }
}

/* ========================= Tests ========================= */
