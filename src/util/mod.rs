//! Leaf types shared by every layer: storage types, element layouts,
//! errors, bounds and tolerance comparison.

mod data_type;
mod error;
mod math;
mod pod;

pub use data_type::DataType;
pub use error::{Error, Result, StoreError};
pub use math::{equal_with_abs_error, BBox3d, DMat4, DVec3};
pub use pod::{Bool, PlainOldDataType};
