//! # Alembic Xform writer
//!
//! Write-path encoder for the Alembic (.abc) Xform schema: turns a stream of
//! transform samples into the time-sampled properties of an `.xform`
//! compound, detecting constant channels and constant identity along the way.
//!
//! Original Alembic format and C++ library developed by Sony Pictures Imageworks
//! and Industrial Light & Magic. All rights to the original belong to the authors.
//! This is an independent Rust implementation aiming to match the original
//! property layout.
//!
//! ## Modules
//!
//! - [`util`] - Basic types (POD, DataType, errors, bounds)
//! - [`core`] - Property headers, metadata, time sampling, store trait
//! - [`geom`] - Xform ops and samples
//! - [`writer`] - Property store, Xform schema writer, archive, JSON dump
//!
//! ## Example
//!
//! ```
//! use alembic_xform::prelude::*;
//!
//! let mut xform = OXform::new("spinner")?;
//! let mut sample = XformSample::default();
//! for frame in 0..24 {
//!     sample.set_y_rotation(frame as f64 * 15.0)?;
//!     xform.set(&mut sample)?;
//! }
//! assert_eq!(xform.schema().animated_channels(), vec![0]);
//!
//! let archive = OArchive::new("demo");
//! archive.add_object(xform.build())?;
//! # Ok::<(), alembic_xform::Error>(())
//! ```

pub mod util;
pub mod core;
pub mod geom;
pub mod writer;

// Re-export commonly used types
pub use util::{DataType, PlainOldDataType, Error, Result, StoreError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{
        BBox3d, DMat4, DVec3, DataType, Error, PlainOldDataType, Result, StoreError,
    };
    pub use crate::core::{CompoundPropertyWriter, MetaData, PropertyHeader, TimeSampling};
    pub use crate::geom::*;
    pub use crate::writer::{OArchive, OObject, OProperty, OXform, OXformSchema, XformSchemaConfig};
}
