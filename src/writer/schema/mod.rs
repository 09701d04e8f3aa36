//! Schema writers built on top of the property store.
//!
//! Each schema owns one compound property and encodes its samples into
//! typed children of that compound.

pub mod xform;

pub use xform::{
    OXform, OXformSchema, XformSchemaConfig, XFORM_DELTA_TOLERANCE,
    ANIM_CHANNELS_PROPERTY, CHILD_BOUNDS_PROPERTY, INHERITS_PROPERTY,
    NOT_CONSTANT_IDENTITY_PROPERTY, OPS_PROPERTY, VALS_PROPERTY,
};
