pub mod error;
pub mod types;
pub mod shape;
pub mod static_shape;
pub mod index_map;
pub mod iter;
pub mod slice;
pub mod selection;
pub mod buffer;
pub mod array;
pub mod view;

pub mod ops;
pub mod arithmetic;
pub mod range_distributor;
pub mod parallel;
pub mod config;
pub mod dyn_array;
pub mod io;

#[cfg(test)]
mod strategy;

pub use array::{Array, ArrayRead, ArrayWrite};
pub use arithmetic::InplaceArithmetic;
pub use buffer::{DBuffer, SharedBuffer, Storage};
pub use dyn_array::DynArray;
pub use error::{ArrayError, Result};
pub use selection::{Selection, Selector};
pub use shape::{Extents, Shape};
pub use slice::Slice;
pub use static_shape::StaticShape;
pub use types::{Element, Numeric, TypeId};
pub use view::{View, ViewMut};
