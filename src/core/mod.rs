//! Core layer - abstract traits and fundamental types.
//!
//! This module provides:
//! - [`TimeSampling`] - Time sampling for animated properties
//! - [`MetaData`] - Key-value metadata storage
//! - [`PropertyHeader`] - Declared shape of a property
//! - [`CompoundPropertyWriter`] - The property store contract schemas write through

mod time_sampling;
mod metadata;
mod header;
mod traits;

pub use time_sampling::{Chrono, TimeSampling, TimeSamplingType};
pub use metadata::MetaData;
pub use header::{PropertyHeader, PropertyType};
pub use traits::{CompoundPropertyWriter, PropertyId};
