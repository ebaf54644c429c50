use std::ops::Range;

use crate::error::{ArrayError, Result};

/// Splits `[0, size)` into `parts` contiguous, disjoint intervals.
///
/// Every interval holds `size / parts` or `size / parts + 1` elements; the
/// first `size % parts` intervals get the extra one. When `size < parts`
/// the trailing intervals are empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeDistributor {
    size: usize,
    parts: usize,
}

impl RangeDistributor {
    pub fn new(parts: usize, size: usize) -> Result<Self> {
        if parts == 0 {
            return Err(ArrayError::EmptyDistribution);
        }
        Ok(Self { size, parts })
    }

    pub fn parts(&self) -> usize {
        self.parts
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The `i`-th interval, or `None` if `i >= parts`.
    pub fn get(&self, i: usize) -> Option<Range<usize>> {
        if i >= self.parts {
            return None;
        }
        let base = self.size / self.parts;
        let extra = self.size % self.parts;
        let start = i * base + i.min(extra);
        let len = base + usize::from(i < extra);
        Some(start..start + len)
    }

    pub fn iter(&self) -> RangeIter {
        RangeIter { dist: *self, next: 0 }
    }
}

impl IntoIterator for RangeDistributor {
    type Item = Range<usize>;
    type IntoIter = RangeIter;

    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

impl IntoIterator for &RangeDistributor {
    type Item = Range<usize>;
    type IntoIter = RangeIter;

    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

pub struct RangeIter {
    dist: RangeDistributor,
    next: usize,
}

impl Iterator for RangeIter {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        let r = self.dist.get(self.next)?;
        self.next += 1;
        Some(r)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.dist.parts - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for RangeIter {}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn extra_elements_go_first() {
        let d = RangeDistributor::new(3, 10).unwrap();
        let parts: Vec<_> = d.iter().collect();
        assert_eq!(parts, vec![0..4, 4..7, 7..10]);
    }

    #[test]
    fn even_split() {
        let d = RangeDistributor::new(4, 8).unwrap();
        assert!(d.iter().all(|r| r.len() == 2));
        assert_eq!(d.get(3), Some(6..8));
        assert_eq!(d.get(4), None);
    }

    #[test]
    fn more_parts_than_elements() {
        let d = RangeDistributor::new(5, 2).unwrap();
        let parts: Vec<_> = d.into_iter().collect();
        assert_eq!(parts, vec![0..1, 1..2, 2..2, 2..2, 2..2]);
    }

    #[test]
    fn zero_parts_rejected() {
        assert_eq!(RangeDistributor::new(0, 10), Err(ArrayError::EmptyDistribution));
    }

    proptest! {
        #[test]
        fn prop_disjoint_cover(parts in 1usize..64, size in 0usize..10_000) {
            let d = RangeDistributor::new(parts, size).unwrap();
            prop_assert_eq!(d.iter().len(), parts);
            let base = size / parts;
            let mut expected_start = 0;
            for r in &d {
                // contiguous: each interval starts where the previous ended
                prop_assert_eq!(r.start, expected_start);
                prop_assert!(r.len() == base || r.len() == base + 1);
                expected_start = r.end;
            }
            prop_assert_eq!(expected_start, size);
        }
    }
}
