use crate::shape::Shape;
use crate::types::TypeId;

/// The type of error for shape, index and array operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ArrayError {
    #[error("index {index} out of range for dimension {dim} with extent {extent}")]
    IndexOutOfRange { dim: usize, index: i128, extent: usize },

    #[error("offset {offset} out of range for size {size}")]
    OffsetOutOfRange { offset: usize, size: usize },

    #[error("dimension {dim} out of range for rank {rank}")]
    DimensionOutOfRange { dim: usize, rank: usize },

    #[error("rank mismatch: expected {expected}, got {got}")]
    RankMismatch { expected: usize, got: usize },

    #[error("size mismatch: expected {expected}, got {got}")]
    SizeMismatch { expected: usize, got: usize },

    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: Shape, got: Shape },

    #[error("element count of extents {extents:?} overflows usize")]
    SizeOverflow { extents: Vec<usize> },

    #[error("allocation of {requested} elements failed")]
    AllocationFailed { requested: usize },

    #[error("malformed slice {first}:{last}:{stride}")]
    MalformedSlice { first: usize, last: usize, stride: usize },

    #[error("selector {selector} out of range for dimension {dim} with extent {extent}")]
    SelectorOutOfRange { dim: usize, selector: String, extent: usize },

    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: TypeId, got: TypeId },

    #[error("unknown type name {name:?}")]
    UnknownType { name: String },

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: String, value: String },

    #[error("image {index} out of range, reader holds {count}")]
    ImageOutOfRange { index: usize, count: usize },

    #[error("cannot distribute a range over zero intervals")]
    EmptyDistribution,
}

pub type Result<T> = std::result::Result<T, ArrayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_bound() {
        let e = ArrayError::IndexOutOfRange { dim: 1, index: -2, extent: 3 };
        assert_eq!(
            e.to_string(),
            "index -2 out of range for dimension 1 with extent 3"
        );

        let e = ArrayError::SizeMismatch { expected: 6, got: 5 };
        assert_eq!(e.to_string(), "size mismatch: expected 6, got 5");
    }

    #[test]
    fn shape_mismatch_prints_both_shapes() {
        let e = ArrayError::ShapeMismatch {
            expected: Shape::new(vec![2, 3]),
            got: Shape::new(vec![3, 2]),
        };
        assert_eq!(e.to_string(), "shape mismatch: expected (2,3), got (3,2)");
    }
}
