//! Xform (transform) sample model.
//!
//! An [`XformSample`] is the value a caller hands to the schema writer for
//! one time step: an ordered stack of [`XformOp`]s plus node-level flags.
//! After the first commit the writer freezes the sample's topology, so the
//! caller can keep re-using the same sample and only update values.

use smallvec::SmallVec;

use crate::util::{BBox3d, DMat4, DVec3, Error, Result};
use super::{RotateHint, XformOp, XformOpType};

/// Xform schema identifier.
pub const XFORM_SCHEMA: &str = "AbcGeom_Xform_v3";

/// Encoded operation bytes of a sample, in stack order.
pub type OpEncodings = SmallVec<[u8; 8]>;

/// Transform sample with decomposed operations.
#[derive(Clone, Debug)]
pub struct XformSample {
    ops: Vec<XformOp>,
    inherits: bool,
    child_bounds: BBox3d,
    topology_frozen: bool,
    /// Next op updated by `add_op` once the topology is frozen.
    op_cursor: usize,
}

impl Default for XformSample {
    fn default() -> Self {
        Self {
            ops: Vec::new(),
            inherits: true,
            child_bounds: BBox3d::EMPTY,
            topology_frozen: false,
            op_cursor: 0,
        }
    }
}

impl XformSample {
    /// Create identity xform (no ops, inheriting).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from an op stack.
    pub fn from_ops(ops: Vec<XformOp>, inherits: bool) -> Self {
        Self { ops, inherits, ..Self::default() }
    }

    /// Append an operation and return its index.
    ///
    /// Once the topology is frozen this updates the op at the cycling
    /// cursor instead; the op type there must match.
    pub fn add_op(&mut self, op: XformOp) -> Result<usize> {
        if !self.topology_frozen {
            self.ops.push(op);
            return Ok(self.ops.len() - 1);
        }

        if self.ops.is_empty() {
            return Err(Error::topology("no ops", op.op_type().name()));
        }

        let index = self.op_cursor;
        let current = self.ops[index].op_type();
        if current != op.op_type() {
            return Err(Error::topology(
                format!("{} at op {}", current.name(), index),
                op.op_type().name(),
            ));
        }
        self.ops[index] = op;
        self.op_cursor = (index + 1) % self.ops.len();
        Ok(index)
    }

    pub fn op(&self, index: usize) -> Option<&XformOp> {
        self.ops.get(index)
    }

    /// Mutable access to an op's values. Op type and count stay fixed.
    pub fn op_mut(&mut self, index: usize) -> Option<&mut XformOp> {
        self.ops.get_mut(index)
    }

    pub fn ops(&self) -> &[XformOp] {
        &self.ops
    }

    pub fn num_ops(&self) -> usize {
        self.ops.len()
    }

    /// Total channels across all ops.
    pub fn num_op_channels(&self) -> usize {
        self.ops.iter().map(XformOp::num_channels).sum()
    }

    /// Encoded op bytes; this is both the topology signature and the
    /// literal `.ops` sample.
    pub fn op_encodings(&self) -> OpEncodings {
        self.ops.iter().map(XformOp::encoding).collect()
    }

    /// Per-op channel counts in stack order.
    pub fn channel_counts(&self) -> SmallVec<[usize; 8]> {
        self.ops.iter().map(XformOp::num_channels).collect()
    }

    pub fn inherits_xforms(&self) -> bool {
        self.inherits
    }

    pub fn set_inherits_xforms(&mut self, inherits: bool) {
        self.inherits = inherits;
    }

    /// Bounds of all children; [`BBox3d::EMPTY`] when not supplied.
    pub fn child_bounds(&self) -> BBox3d {
        self.child_bounds
    }

    pub fn set_child_bounds(&mut self, bounds: BBox3d) {
        self.child_bounds = bounds;
    }

    /// Freeze the op stack. Called by the writer on first commit.
    pub fn freeze_topology(&mut self) {
        self.topology_frozen = true;
        self.op_cursor = 0;
    }

    pub fn is_topology_frozen(&self) -> bool {
        self.topology_frozen
    }

    /// Back to an unfrozen identity sample.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_translation(&mut self, t: DVec3) -> Result<usize> {
        self.add_op(XformOp::translate(t.x, t.y, t.z))
    }

    pub fn set_scale(&mut self, s: DVec3) -> Result<usize> {
        self.add_op(XformOp::scale(s.x, s.y, s.z))
    }

    /// Axis/angle rotation, angle in degrees.
    pub fn set_rotation(&mut self, axis: DVec3, angle_degrees: f64) -> Result<usize> {
        self.add_op(XformOp::rotate(axis.to_array(), angle_degrees))
    }

    pub fn set_x_rotation(&mut self, angle_degrees: f64) -> Result<usize> {
        self.add_op(XformOp::rotate_x(angle_degrees).with_hint(RotateHint::Rotate as u8))
    }

    pub fn set_y_rotation(&mut self, angle_degrees: f64) -> Result<usize> {
        self.add_op(XformOp::rotate_y(angle_degrees).with_hint(RotateHint::Rotate as u8))
    }

    pub fn set_z_rotation(&mut self, angle_degrees: f64) -> Result<usize> {
        self.add_op(XformOp::rotate_z(angle_degrees).with_hint(RotateHint::Rotate as u8))
    }

    /// Add a matrix op. Stored row-major like the file format.
    pub fn set_matrix(&mut self, m: DMat4) -> Result<usize> {
        // row-vector convention: transposed glam matrix, so the
        // column-major array is already the row-major file layout
        self.add_op(XformOp::matrix(m.to_cols_array()))
    }

    /// Compose the op stack into a single matrix.
    pub fn matrix(&self) -> DMat4 {
        let mut result = DMat4::IDENTITY;

        for op in &self.ops {
            let v = op.values();
            let m = match op.op_type() {
                XformOpType::Scale => DMat4::from_scale(DVec3::new(v[0], v[1], v[2])),
                XformOpType::Translate => DMat4::from_translation(DVec3::new(v[0], v[1], v[2])),
                XformOpType::RotateX => DMat4::from_rotation_x(v[0].to_radians()),
                XformOpType::RotateY => DMat4::from_rotation_y(v[0].to_radians()),
                XformOpType::RotateZ => DMat4::from_rotation_z(v[0].to_radians()),
                XformOpType::Rotate => {
                    let axis = DVec3::new(v[0], v[1], v[2]).normalize_or_zero();
                    if axis.length_squared() > 0.0 {
                        DMat4::from_axis_angle(axis, v[3].to_radians())
                    } else {
                        DMat4::IDENTITY
                    }
                }
                XformOpType::Matrix => {
                    let mut cols = [0.0; 16];
                    cols.copy_from_slice(v);
                    DMat4::from_cols_array(&cols)
                }
            };
            // Alembic composes row vectors left to right; column vectors flip it
            result *= m;
        }

        result
    }
}
