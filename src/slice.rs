use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{ArrayError, Result};

/// Half-open strided range `[first, last)` over one dimension.
///
/// Empty slices are not representable: construction requires
/// `first < last` and `stride <= last - first`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSlice")]
pub struct Slice {
    first: usize,
    last: usize,
    stride: usize,
}

#[derive(Deserialize)]
struct RawSlice {
    first: usize,
    last: usize,
    stride: usize,
}

impl TryFrom<RawSlice> for Slice {
    type Error = ArrayError;

    fn try_from(raw: RawSlice) -> Result<Self> {
        Slice::with_stride(raw.first, raw.last, raw.stride)
    }
}

impl Slice {
    /// Unit-stride slice `[first, last)`.
    pub fn new(first: usize, last: usize) -> Result<Self> {
        Self::with_stride(first, last, 1)
    }

    pub fn with_stride(first: usize, last: usize, stride: usize) -> Result<Self> {
        if first >= last || stride == 0 || stride > last - first {
            return Err(ArrayError::MalformedSlice { first, last, stride });
        }
        Ok(Self { first, last, stride })
    }

    /// The single element `[i, i + 1)`.
    pub fn single(i: usize) -> Result<Self> {
        let last = i
            .checked_add(1)
            .ok_or(ArrayError::MalformedSlice { first: i, last: i, stride: 1 })?;
        Self::new(i, last)
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn last(&self) -> usize {
        self.last
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// `last - first`
    pub fn span(&self) -> usize {
        self.last - self.first
    }

    /// Number of selected elements, `ceil(span / stride)`.
    pub fn len(&self) -> usize {
        self.span().div_ceil(self.stride)
    }

    /// Position in the dimension of the `k`-th selected element.
    #[inline(always)]
    pub fn at(&self, k: usize) -> usize {
        self.first + k * self.stride
    }

    pub fn iter(&self) -> std::iter::StepBy<Range<usize>> {
        (self.first..self.last).step_by(self.stride)
    }
}

impl TryFrom<Range<usize>> for Slice {
    type Error = ArrayError;

    fn try_from(r: Range<usize>) -> Result<Self> {
        Slice::new(r.start, r.end)
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.first, self.last)?;
        if self.stride != 1 {
            write!(f, ":{}", self.stride)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_count_rounds_up() {
        assert_eq!(Slice::with_stride(0, 5, 2).unwrap().len(), 3);
        assert_eq!(Slice::with_stride(0, 4, 3).unwrap().len(), 2);
        assert_eq!(Slice::with_stride(1, 7, 3).unwrap().len(), 2);
        assert_eq!(Slice::new(3, 4).unwrap().len(), 1);
    }

    #[test]
    fn empty_span_fails() {
        assert_eq!(
            Slice::new(5, 5),
            Err(ArrayError::MalformedSlice { first: 5, last: 5, stride: 1 })
        );
        assert!(Slice::new(6, 5).is_err());
    }

    #[test]
    fn over_stride_fails() {
        assert!(Slice::with_stride(0, 3, 4).is_err());
        assert!(Slice::with_stride(0, 3, 0).is_err());
        assert!(Slice::with_stride(0, 3, 3).is_ok());
    }

    #[test]
    fn iter_matches_at() {
        let s = Slice::with_stride(2, 11, 4).unwrap();
        let v: Vec<usize> = s.iter().collect();
        assert_eq!(v, vec![2, 6, 10]);
        assert_eq!(v.len(), s.len());
        for (k, &x) in v.iter().enumerate() {
            assert_eq!(s.at(k), x);
        }
    }

    #[test]
    fn single_and_range() {
        let s = Slice::single(4).unwrap();
        assert_eq!((s.first(), s.last(), s.len()), (4, 5, 1));
        assert!(Slice::single(usize::MAX).is_err());
        assert_eq!(Slice::try_from(1..3), Slice::new(1, 3));
    }

    #[test]
    fn display() {
        assert_eq!(Slice::new(1, 4).unwrap().to_string(), "1:4");
        assert_eq!(Slice::with_stride(0, 10, 3).unwrap().to_string(), "0:10:3");
    }

    #[test]
    fn serde_validates() {
        let s = Slice::with_stride(0, 5, 2).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(serde_json::from_str::<Slice>(&json).unwrap(), s);
        let bad = r#"{"first":5,"last":5,"stride":1}"#;
        assert!(serde_json::from_str::<Slice>(bad).is_err());
    }
}
