use crate::array::Array;
use crate::dyn_array::{DynArray, DynElement};
use crate::error::{ArrayError, Result};
use crate::shape::{Extents, Shape};
use crate::types::{Endian, TypeId};

/// What a reader knows about one image before decoding it.
///
/// Channels are interleaved: a pixel's channel values are adjacent in the
/// raw data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub shape: Shape,
    pub type_id: TypeId,
    pub channels: usize,
}

impl ImageInfo {
    /// Single-channel image.
    pub fn new(shape: impl Into<Shape>, type_id: TypeId) -> Self {
        Self {
            shape: shape.into(),
            type_id,
            channels: 1,
        }
    }

    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    /// Shape of the decoded array. More than one channel adds a trailing
    /// dimension of extent `channels`.
    pub fn array_shape(&self) -> Result<Shape> {
        if self.channels == 1 {
            return Ok(self.shape.clone());
        }
        let mut extents = self.shape.extents().to_vec();
        extents.push(self.channels);
        Shape::try_new(extents)
    }

    /// Bytes of raw element data over all channels.
    pub fn byte_size(&self) -> Result<usize> {
        let elements = self.array_shape()?.size();
        elements
            .checked_mul(self.type_id.width())
            .ok_or_else(|| ArrayError::SizeOverflow {
                extents: self.shape.extents().to_vec(),
            })
    }
}

/// Source of images in some file format.
///
/// Implementations discover each image's shape and element type from their
/// format's headers and hand back the decoded data as a [`DynArray`].
pub trait ImageReader {
    fn image_count(&self) -> usize;

    fn info(&self, i: usize) -> Result<ImageInfo>;

    fn read(&mut self, i: usize) -> Result<DynArray>;

    /// `read` followed by a checked conversion to `Array<T>`.
    fn read_as<T: DynElement>(&mut self, i: usize) -> Result<Array<T>>
    where
        Self: Sized,
    {
        self.read(i)?.try_into_array()
    }
}

fn check_image(i: usize, count: usize) -> Result<()> {
    if i >= count {
        return Err(ArrayError::ImageOutOfRange { index: i, count });
    }
    Ok(())
}

/// Headerless images held in memory: the caller supplies each image's
/// [`ImageInfo`] together with its raw bytes.
#[derive(Debug, Clone, Default)]
pub struct RawReader {
    images: Vec<(ImageInfo, Vec<u8>)>,
    endian: Endian,
}

impl RawReader {
    pub fn new(endian: Endian) -> Self {
        Self {
            images: Vec::new(),
            endian,
        }
    }

    /// Append an image; `bytes` must hold exactly [`ImageInfo::byte_size`]
    /// bytes.
    pub fn push(&mut self, info: ImageInfo, bytes: Vec<u8>) -> Result<()> {
        let expected = info.byte_size()?;
        if bytes.len() != expected {
            return Err(ArrayError::SizeMismatch {
                expected,
                got: bytes.len(),
            });
        }
        tracing::debug!(
            shape = %info.shape,
            type_id = %info.type_id,
            channels = info.channels,
            "raw image added"
        );
        self.images.push((info, bytes));
        Ok(())
    }
}

impl ImageReader for RawReader {
    fn image_count(&self) -> usize {
        self.images.len()
    }

    fn info(&self, i: usize) -> Result<ImageInfo> {
        check_image(i, self.images.len())?;
        Ok(self.images[i].0.clone())
    }

    fn read(&mut self, i: usize) -> Result<DynArray> {
        check_image(i, self.images.len())?;
        let (info, bytes) = &self.images[i];
        DynArray::from_bytes(info.type_id, info.array_shape()?, bytes, self.endian)
    }
}
