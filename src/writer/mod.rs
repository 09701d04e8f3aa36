//! Writer implementation.
//!
//! - [`OProperty`] - in-memory property tree, the default property store
//! - [`OTypedProperty`] - typed slot handles schemas write through
//! - [`OObject`] / [`OArchive`] - object tree and archive
//! - [`schema`] - schema writers ([`OXformSchema`], [`OXform`])
//! - [`dump`] - JSON dump of written data

mod archive;
mod object;
mod property;
mod typed;

pub mod dump;
pub mod schema;

pub use archive::OArchive;
pub use object::OObject;
pub use property::{OProperty, OPropertyData, SampleStore};
pub use typed::{OTypedProperty, SlotKind, SlotValue};

pub use schema::{OXform, OXformSchema, XformSchemaConfig, XFORM_DELTA_TOLERANCE};

#[cfg(test)]
mod tests;
