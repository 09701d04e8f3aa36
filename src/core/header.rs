//! Property headers.
//!
//! A header names a property and declares its shape before any sample
//! is written: scalar or array, POD type and extent, time sampling.

use crate::util::DataType;
use super::MetaData;

/// Declared shape of one property.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyHeader {
    pub name: String,
    pub property_type: PropertyType,
    /// Element layout; [`DataType::UNKNOWN`] for compounds.
    pub data_type: DataType,
    /// Index into the archive's time sampling list.
    pub time_sampling_index: u32,
    pub meta_data: MetaData,
}

impl PropertyHeader {
    fn new(name: impl Into<String>, property_type: PropertyType, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            property_type,
            data_type,
            time_sampling_index: 0,
            meta_data: MetaData::new(),
        }
    }

    /// One element of `data_type` per sample.
    pub fn scalar(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(name, PropertyType::Scalar, data_type)
    }

    /// Any number of `data_type` elements per sample.
    pub fn array(name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(name, PropertyType::Array, data_type)
    }

    pub fn compound(name: impl Into<String>) -> Self {
        Self::new(name, PropertyType::Compound, DataType::UNKNOWN)
    }

    pub fn with_time_sampling(self, time_sampling_index: u32) -> Self {
        Self { time_sampling_index, ..self }
    }

    pub fn with_meta_data(self, meta_data: MetaData) -> Self {
        Self { meta_data, ..self }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.property_type, PropertyType::Scalar)
    }

    pub fn is_array(&self) -> bool {
        matches!(self.property_type, PropertyType::Array)
    }

    pub fn is_compound(&self) -> bool {
        matches!(self.property_type, PropertyType::Compound)
    }
}

/// Kind of property.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PropertyType {
    #[default]
    Scalar,
    Array,
    /// Holds child properties, no samples of its own.
    Compound,
}

impl PropertyType {
    /// Lower-case name used in dumps.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Array => "array",
            Self::Compound => "compound",
        }
    }
}
