use std::sync::Arc;

use crate::error::{ArrayError, Result};

/// Contiguous typed element storage.
///
/// After `allocate(n)`, `size() == n`.
pub trait Storage<T>: Sized {
    /// Allocate `n` default-valued elements.
    fn allocate(n: usize) -> Result<Self>
    where
        T: Default + Clone;

    fn from_vec(data: Vec<T>) -> Self;

    fn as_slice(&self) -> &[T];

    fn as_mut_slice(&mut self) -> &mut [T];

    fn size(&self) -> usize {
        self.as_slice().len()
    }

    fn as_ptr(&self) -> *const T {
        self.as_slice().as_ptr()
    }

    fn as_mut_ptr(&mut self) -> *mut T {
        self.as_mut_slice().as_mut_ptr()
    }
}

fn try_alloc<T: Default + Clone>(n: usize) -> Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(n)
        .map_err(|_| ArrayError::AllocationFailed { requested: n })?;
    data.resize(n, T::default());
    tracing::debug!(elements = n, "allocated buffer");
    Ok(data)
}

/// Exclusively owned storage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DBuffer<T> {
    data: Vec<T>,
}

impl<T> DBuffer<T> {
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T> Storage<T> for DBuffer<T> {
    fn allocate(n: usize) -> Result<Self>
    where
        T: Default + Clone,
    {
        Ok(Self { data: try_alloc(n)? })
    }

    fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

/// Reference-counted storage; the memory lives until the last holder is
/// dropped. Mutation detaches the holder from the others (copy-on-write),
/// so no holder observes another's writes.
#[derive(Debug, PartialEq, Default)]
pub struct SharedBuffer<T> {
    data: Arc<Vec<T>>,
}

impl<T> SharedBuffer<T> {
    /// True if `self` and `other` currently alias the same memory.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.data)
    }
}

impl<T> Clone for SharedBuffer<T> {
    fn clone(&self) -> Self {
        Self { data: Arc::clone(&self.data) }
    }
}

impl<T: Clone> Storage<T> for SharedBuffer<T> {
    fn allocate(n: usize) -> Result<Self>
    where
        T: Default,
    {
        Ok(Self { data: Arc::new(try_alloc(n)?) })
    }

    fn from_vec(data: Vec<T>) -> Self {
        Self { data: Arc::new(data) }
    }

    fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }
}
