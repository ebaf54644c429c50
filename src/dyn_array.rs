use num::Complex;

use crate::array::Array;
use crate::error::{ArrayError, Result};
use crate::shape::{Extents, Shape};
use crate::types::{Element, Endian, TypeId};

/// An array whose element type is only known at runtime.
///
/// One variant per [`TypeId`]; conversions back to a typed `Array<T>` are
/// checked against the stored id.
#[derive(Debug, Clone, PartialEq)]
pub enum DynArray {
    UInt8(Array<u8>),
    Int8(Array<i8>),
    UInt16(Array<u16>),
    Int16(Array<i16>),
    UInt32(Array<u32>),
    Int32(Array<i32>),
    UInt64(Array<u64>),
    Int64(Array<i64>),
    Float32(Array<f32>),
    Float64(Array<f64>),
    Complex32(Array<Complex<f32>>),
    Complex64(Array<Complex<f64>>),
    Bool(Array<bool>),
}

/// Element types that have a [`DynArray`] variant.
pub trait DynElement: Element {
    fn wrap(a: Array<Self>) -> DynArray;

    fn peek(d: &DynArray) -> Option<&Array<Self>>;

    fn take(d: DynArray) -> std::result::Result<Array<Self>, DynArray>;
}

macro_rules! dyn_elements {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl DynElement for $t {
                fn wrap(a: Array<Self>) -> DynArray {
                    DynArray::$variant(a)
                }

                fn peek(d: &DynArray) -> Option<&Array<Self>> {
                    match d {
                        DynArray::$variant(a) => Some(a),
                        _ => None,
                    }
                }

                fn take(d: DynArray) -> std::result::Result<Array<Self>, DynArray> {
                    match d {
                        DynArray::$variant(a) => Ok(a),
                        other => Err(other),
                    }
                }
            }
        )*

        impl DynArray {
            /// Default-valued array of the given element type.
            pub fn new(type_id: TypeId, shape: impl Into<Shape>) -> Result<Self> {
                let shape = shape.into();
                match type_id {
                    $(TypeId::$variant => Ok(DynArray::$variant(Array::<$t>::new(shape)?)),)*
                }
            }

            /// Decode `bytes` as elements of `type_id` laid out in C-order.
            pub fn from_bytes(
                type_id: TypeId,
                shape: impl Into<Shape>,
                bytes: &[u8],
                endian: Endian,
            ) -> Result<Self> {
                let shape = shape.into();
                match type_id {
                    $(TypeId::$variant => decode::<$t>(shape, bytes, endian),)*
                }
            }
        }
    };
}

dyn_elements! {
    u8 => UInt8,
    i8 => Int8,
    u16 => UInt16,
    i16 => Int16,
    u32 => UInt32,
    i32 => Int32,
    u64 => UInt64,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    Complex<f32> => Complex32,
    Complex<f64> => Complex64,
    bool => Bool,
}

fn decode<T: DynElement>(shape: Shape, bytes: &[u8], endian: Endian) -> Result<DynArray> {
    let width = T::TYPE_ID.width();
    let expected = shape
        .size()
        .checked_mul(width)
        .ok_or_else(|| ArrayError::SizeOverflow {
            extents: shape.extents().to_vec(),
        })?;
    if bytes.len() != expected {
        return Err(ArrayError::SizeMismatch {
            expected,
            got: bytes.len(),
        });
    }
    let data = bytes
        .chunks_exact(width)
        .map(|c| T::from_bytes(c, endian))
        .collect();
    Ok(T::wrap(Array::from_vec(shape, data)?))
}

macro_rules! dispatch {
    ($self:expr, $a:ident => $body:expr) => {
        match $self {
            DynArray::UInt8($a) => $body,
            DynArray::Int8($a) => $body,
            DynArray::UInt16($a) => $body,
            DynArray::Int16($a) => $body,
            DynArray::UInt32($a) => $body,
            DynArray::Int32($a) => $body,
            DynArray::UInt64($a) => $body,
            DynArray::Int64($a) => $body,
            DynArray::Float32($a) => $body,
            DynArray::Float64($a) => $body,
            DynArray::Complex32($a) => $body,
            DynArray::Complex64($a) => $body,
            DynArray::Bool($a) => $body,
        }
    };
}

impl DynArray {
    pub fn type_id(&self) -> TypeId {
        fn id<T: Element>(_: &Array<T>) -> TypeId {
            T::TYPE_ID
        }
        dispatch!(self, a => id(a))
    }

    pub fn shape(&self) -> &Shape {
        dispatch!(self, a => a.shape())
    }

    pub fn size(&self) -> usize {
        self.shape().size()
    }

    pub fn downcast_ref<T: DynElement>(&self) -> Option<&Array<T>> {
        T::peek(self)
    }

    pub fn try_into_array<T: DynElement>(self) -> Result<Array<T>> {
        T::take(self).map_err(|d| ArrayError::TypeMismatch {
            expected: T::TYPE_ID,
            got: d.type_id(),
        })
    }
}

impl<T: DynElement> From<Array<T>> for DynArray {
    fn from(a: Array<T>) -> Self {
        T::wrap(a)
    }
}
