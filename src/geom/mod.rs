//! Geometry schema value types.
//!
//! - [`XformOp`] / [`XformOpType`] - typed transform operations
//! - [`XformSample`] - one time step of a transform stack

mod xform_op;
mod xform;

pub use xform_op::{MatrixHint, RotateHint, ScaleHint, TranslateHint, XformOp, XformOpType};
pub use xform::{OpEncodings, XformSample, XFORM_SCHEMA};
