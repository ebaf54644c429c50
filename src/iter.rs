use crate::shape::Extents;

/// Step `current` to the next multi-index in C-order.
///
/// Returns `false` once every index has been visited; `current` is then
/// reset to all zeros.
#[inline]
pub fn advance(current: &mut [usize], extents: &[usize]) -> bool {
    for i in (0..current.len()).rev() {
        current[i] += 1;
        if current[i] < extents[i] {
            return true;
        }
        current[i] = 0;
    }
    false
}

/// Enumerates all multi-indices of a shape, last index fastest.
pub struct IndexIter {
    extents: Vec<usize>,
    current: Vec<usize>,
    done: bool,
}

impl IndexIter {
    pub fn new<S: Extents + ?Sized>(shape: &S) -> Self {
        Self {
            extents: shape.extents().to_vec(),
            current: vec![0; shape.rank()],
            done: shape.size() == 0,
        }
    }
}

impl Iterator for IndexIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current.clone();
        self.done = !advance(&mut self.current, &self.extents);
        Some(result)
    }
}
