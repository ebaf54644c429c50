use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ArrayError, Result};
use crate::index_map::{IndexPolicy, RowMajor};

/// Read access to the extents of a shape, shared by [`Shape`] and
/// [`StaticShape`](crate::static_shape::StaticShape).
///
/// Strides and size are derived from the extents under C-order. A rank-0
/// shape has size 0: it describes an unallocated array, not a scalar.
pub trait Extents {
    /// Number of elements along each dimension.
    fn extents(&self) -> &[usize];

    /// Linear storage elements skipped per step along each dimension.
    fn strides(&self) -> &[usize];

    /// Total number of elements.
    fn size(&self) -> usize;

    /// Number of dimensions.
    fn rank(&self) -> usize {
        self.extents().len()
    }

    /// Extent of dimension `dim`.
    fn extent(&self, dim: usize) -> Result<usize> {
        self.extents()
            .get(dim)
            .copied()
            .ok_or(ArrayError::DimensionOutOfRange { dim, rank: self.rank() })
    }
}

/// Runtime shape: ordered per-dimension extents with cached C-order strides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawExtents", into = "Vec<usize>")]
pub struct Shape {
    extents: Vec<usize>,
    strides: Vec<usize>,
    size: usize,
}

/// Extent list as it appears on the wire, validated into a [`Shape`].
#[derive(Deserialize)]
#[serde(transparent)]
struct RawExtents(Vec<usize>);

impl TryFrom<RawExtents> for Shape {
    type Error = ArrayError;

    fn try_from(raw: RawExtents) -> Result<Self> {
        Shape::try_new(raw.0)
    }
}

/// C-order strides of `extents` plus the element count, or `SizeOverflow`.
fn layout(extents: &[usize], strides: &mut [usize]) -> Result<usize> {
    match RowMajor::make_strides(extents, strides) {
        Some(_) if extents.is_empty() => Ok(0),
        Some(size) => Ok(size),
        None => Err(ArrayError::SizeOverflow {
            extents: extents.to_vec(),
        }),
    }
}

impl Shape {
    /// # Panics
    ///
    /// Panics if the element count overflows `usize`. Use
    /// [`Shape::try_new`] for extents that are not known to fit.
    pub fn new(extents: Vec<usize>) -> Self {
        match Self::try_new(extents) {
            Ok(shape) => shape,
            Err(err) => panic!("{err}"),
        }
    }

    /// Checked constructor: fails with `SizeOverflow` if a stride or the
    /// element count does not fit in `usize`.
    pub fn try_new(extents: Vec<usize>) -> Result<Self> {
        let mut strides = vec![0; extents.len()];
        let size = layout(&extents, &mut strides)?;
        Ok(Self {
            extents,
            strides,
            size,
        })
    }

    /// A shape of rank `rank` with every extent set to 1.
    pub fn with_rank(rank: usize) -> Self {
        Self::new(vec![1; rank])
    }

    /// Resize to `rank` dimensions. Existing extents are kept up to
    /// `min(old, rank)`, new ones default to 1.
    ///
    /// On allocation failure or size overflow the shape is left untouched.
    pub fn set_rank(&mut self, rank: usize) -> Result<()> {
        let mut extents = Vec::new();
        let mut strides = Vec::new();
        extents
            .try_reserve_exact(rank)
            .and_then(|_| strides.try_reserve_exact(rank))
            .map_err(|_| ArrayError::AllocationFailed { requested: rank })?;

        let keep = rank.min(self.rank());
        extents.extend_from_slice(&self.extents[..keep]);
        extents.resize(rank, 1);
        strides.resize(rank, 0);
        let size = layout(&extents, &mut strides)?;

        self.extents = extents;
        self.strides = strides;
        self.size = size;
        Ok(())
    }

    /// Set the extent of dimension `dim` and recompute strides and size.
    ///
    /// Fails with `SizeOverflow`, leaving the shape untouched, if the new
    /// element count does not fit in `usize`.
    pub fn set_extent(&mut self, dim: usize, value: usize) -> Result<()> {
        let rank = self.rank();
        let slot = self
            .extents
            .get_mut(dim)
            .ok_or(ArrayError::DimensionOutOfRange { dim, rank })?;
        let old = std::mem::replace(slot, value);
        match layout(&self.extents, &mut self.strides) {
            Ok(size) => {
                self.size = size;
                Ok(())
            }
            Err(err) => {
                self.extents[dim] = old;
                // The previous extents were valid, so this cannot fail.
                let _ = layout(&self.extents, &mut self.strides);
                Err(err)
            }
        }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.extents
    }
}

impl Extents for Shape {
    fn extents(&self) -> &[usize] {
        &self.extents
    }

    fn strides(&self) -> &[usize] {
        &self.strides
    }

    fn size(&self) -> usize {
        self.size
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.extents == other.extents
    }
}

impl Eq for Shape {}

impl From<Vec<usize>> for Shape {
    fn from(extents: Vec<usize>) -> Self {
        Shape::new(extents)
    }
}

impl From<&[usize]> for Shape {
    fn from(extents: &[usize]) -> Self {
        Shape::new(extents.to_vec())
    }
}

impl<const R: usize> From<[usize; R]> for Shape {
    fn from(extents: [usize; R]) -> Self {
        Shape::new(extents.to_vec())
    }
}

impl From<Shape> for Vec<usize> {
    fn from(shape: Shape) -> Self {
        shape.extents
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, e) in self.extents.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{e}")?;
        }
        write!(f, ")")
    }
}
