//! Math re-exports and the bounding box used for child bounds.

pub use glam::{DMat4, DVec3};

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// 3D bounding box with double precision.
#[derive(Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct BBox3d {
    pub min: DVec3,
    pub max: DVec3,
}

impl BBox3d {
    /// Empty bounding box (inverted, will expand on first point).
    pub const EMPTY: Self = Self {
        min: DVec3::splat(f64::INFINITY),
        max: DVec3::splat(f64::NEG_INFINITY),
    };

    /// Create a new bounding box from min and max points.
    #[inline]
    pub const fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Check if this box is empty (inverted on any axis).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Check if this box encloses a non-zero volume.
    ///
    /// Only boxes with volume are written as child bounds; a default
    /// (empty) box or a flat box means "no bounds supplied".
    #[inline]
    pub fn has_volume(&self) -> bool {
        self.max.cmpgt(self.min).all()
    }

    /// Expand this box to include a point.
    #[inline]
    pub fn expand_by_point(&mut self, p: DVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Min/max flattened the way `.childBnds` stores it.
    #[inline]
    pub fn to_array(&self) -> [f64; 6] {
        let (min, max) = (self.min.to_array(), self.max.to_array());
        [min[0], min[1], min[2], max[0], max[1], max[2]]
    }
}

impl Default for BBox3d {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for BBox3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox3d({:?} - {:?})", self.min, self.max)
    }
}

/// Absolute-tolerance float comparison, symmetric in its arguments.
#[inline]
pub fn equal_with_abs_error(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}
