//! Abstract writer trait for compound properties.
//!
//! A schema writes into exactly one compound. The compound hands out
//! [`PropertyId`] handles when children are created; every later write
//! goes through the compound with that handle, so a schema can keep its
//! handles while the compound stays exclusively borrowed per call.

use crate::util::Result;
use super::PropertyHeader;

/// Handle to a child property inside a compound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(usize);

impl PropertyId {
    /// Create a handle from a child index.
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Child index this handle refers to.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Writer interface for a compound property holding time-sampled children.
///
/// Samples are append-only. Implementations must reject a second property
/// with the same name and a repeat on a property without samples.
pub trait CompoundPropertyWriter: Send {
    /// Create a child property. Fails if the name is already taken.
    fn create_property(&mut self, header: PropertyHeader) -> Result<PropertyId>;

    /// Header of a child property.
    fn property_header(&self, id: PropertyId) -> Result<&PropertyHeader>;

    /// Look up a child by name.
    fn property_id(&self, name: &str) -> Option<PropertyId>;

    /// Check whether a child with this name exists.
    fn has_property(&self, name: &str) -> bool {
        self.property_id(name).is_some()
    }

    /// Append a scalar sample. `data` must be exactly one element of the
    /// declared data type.
    fn write_sample(&mut self, id: PropertyId, data: &[u8]) -> Result<()>;

    /// Append an array sample. `data` must hold a whole number of elements.
    fn write_array_sample(&mut self, id: PropertyId, data: &[u8]) -> Result<()>;

    /// Append a sample logically equal to the previous one without
    /// resending its data.
    fn set_from_previous_sample(&mut self, id: PropertyId) -> Result<()>;

    /// Number of samples written to a child so far.
    fn num_samples(&self, id: PropertyId) -> Result<usize>;

    /// Append a scalar sample from a POD value.
    fn write_sample_typed<T: bytemuck::Pod>(&mut self, id: PropertyId, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        self.write_sample(id, bytemuck::bytes_of(value))
    }

    /// Append an array sample from a POD slice.
    fn write_array_sample_typed<T: bytemuck::Pod>(
        &mut self,
        id: PropertyId,
        values: &[T],
    ) -> Result<()>
    where
        Self: Sized,
    {
        self.write_array_sample(id, bytemuck::cast_slice(values))
    }
}
