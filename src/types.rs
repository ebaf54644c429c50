use std::collections::HashMap;
use std::fmt;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};
use std::str::FromStr;
use std::sync::LazyLock;

use num::Complex;
use serde::{Deserialize, Serialize};

use crate::error::ArrayError;

/// Identifies the element type of a type-erased array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeId {
    UInt8,
    Int8,
    UInt16,
    Int16,
    UInt32,
    Int32,
    UInt64,
    Int64,
    Float32,
    Float64,
    Complex32,
    Complex64,
    Bool,
}

/// Coarse classification of a [`TypeId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Integer,
    Float,
    Complex,
    Bool,
}

struct TypeInfo {
    id: TypeId,
    name: &'static str,
    class: TypeClass,
    width: usize,
}

const TYPES: [TypeInfo; 13] = [
    TypeInfo { id: TypeId::UInt8, name: "uint8", class: TypeClass::Integer, width: 1 },
    TypeInfo { id: TypeId::Int8, name: "int8", class: TypeClass::Integer, width: 1 },
    TypeInfo { id: TypeId::UInt16, name: "uint16", class: TypeClass::Integer, width: 2 },
    TypeInfo { id: TypeId::Int16, name: "int16", class: TypeClass::Integer, width: 2 },
    TypeInfo { id: TypeId::UInt32, name: "uint32", class: TypeClass::Integer, width: 4 },
    TypeInfo { id: TypeId::Int32, name: "int32", class: TypeClass::Integer, width: 4 },
    TypeInfo { id: TypeId::UInt64, name: "uint64", class: TypeClass::Integer, width: 8 },
    TypeInfo { id: TypeId::Int64, name: "int64", class: TypeClass::Integer, width: 8 },
    TypeInfo { id: TypeId::Float32, name: "float32", class: TypeClass::Float, width: 4 },
    TypeInfo { id: TypeId::Float64, name: "float64", class: TypeClass::Float, width: 8 },
    TypeInfo { id: TypeId::Complex32, name: "complex32", class: TypeClass::Complex, width: 8 },
    TypeInfo { id: TypeId::Complex64, name: "complex64", class: TypeClass::Complex, width: 16 },
    TypeInfo { id: TypeId::Bool, name: "bool", class: TypeClass::Bool, width: 1 },
];

/// Name -> id lookup, built on first use and never modified.
static BY_NAME: LazyLock<HashMap<&'static str, TypeId>> =
    LazyLock::new(|| TYPES.iter().map(|t| (t.name, t.id)).collect());

impl TypeId {
    pub const ALL: [TypeId; 13] = [
        TypeId::UInt8,
        TypeId::Int8,
        TypeId::UInt16,
        TypeId::Int16,
        TypeId::UInt32,
        TypeId::Int32,
        TypeId::UInt64,
        TypeId::Int64,
        TypeId::Float32,
        TypeId::Float64,
        TypeId::Complex32,
        TypeId::Complex64,
        TypeId::Bool,
    ];

    fn info(self) -> &'static TypeInfo {
        // TYPES is declared in discriminant order
        &TYPES[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn class(self) -> TypeClass {
        self.info().class
    }

    /// Size of one element in bytes.
    pub fn width(self) -> usize {
        self.info().width
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeId {
    type Err = ArrayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BY_NAME
            .get(s)
            .copied()
            .ok_or_else(|| ArrayError::UnknownType { name: s.to_string() })
    }
}

/// Byte order of raw element data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

/// A type that can be stored in an array and named by a [`TypeId`].
pub trait Element: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    const TYPE_ID: TypeId;

    /// Decode one element from exactly `TYPE_ID.width()` bytes.
    fn from_bytes(bytes: &[u8], endian: Endian) -> Self;
}

/// Element types that support in-place arithmetic.
pub trait Numeric:
    Element + num::Num + AddAssign + SubAssign + MulAssign + DivAssign
{
    /// Accumulator wide enough to sum many elements without overflow.
    type Sum: Numeric;

    fn widen(self) -> Self::Sum;
}

macro_rules! impl_primitive {
    ($($t:ty => $id:ident, $sum:ty);* $(;)?) => {
        $(
            impl Element for $t {
                const TYPE_ID: TypeId = TypeId::$id;

                fn from_bytes(bytes: &[u8], endian: Endian) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(bytes);
                    match endian {
                        Endian::Little => <$t>::from_le_bytes(raw),
                        Endian::Big => <$t>::from_be_bytes(raw),
                    }
                }
            }

            impl Numeric for $t {
                type Sum = $sum;

                #[inline(always)]
                fn widen(self) -> $sum {
                    self as $sum
                }
            }
        )*
    };
}

impl_primitive! {
    u8 => UInt8, u64;
    i8 => Int8, i64;
    u16 => UInt16, u64;
    i16 => Int16, i64;
    u32 => UInt32, u64;
    i32 => Int32, i64;
    u64 => UInt64, u64;
    i64 => Int64, i64;
    f32 => Float32, f64;
    f64 => Float64, f64;
}

impl Element for Complex<f32> {
    const TYPE_ID: TypeId = TypeId::Complex32;

    fn from_bytes(bytes: &[u8], endian: Endian) -> Self {
        let (re, im) = bytes.split_at(4);
        Complex::new(f32::from_bytes(re, endian), f32::from_bytes(im, endian))
    }
}

impl Numeric for Complex<f32> {
    type Sum = Complex<f64>;

    fn widen(self) -> Complex<f64> {
        Complex::new(self.re as f64, self.im as f64)
    }
}

impl Element for Complex<f64> {
    const TYPE_ID: TypeId = TypeId::Complex64;

    fn from_bytes(bytes: &[u8], endian: Endian) -> Self {
        let (re, im) = bytes.split_at(8);
        Complex::new(f64::from_bytes(re, endian), f64::from_bytes(im, endian))
    }
}

impl Numeric for Complex<f64> {
    type Sum = Complex<f64>;

    fn widen(self) -> Complex<f64> {
        self
    }
}

impl Element for bool {
    const TYPE_ID: TypeId = TypeId::Bool;

    fn from_bytes(bytes: &[u8], _: Endian) -> Self {
        bytes[0] != 0
    }
}
