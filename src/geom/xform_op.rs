//! Transform operations.
//!
//! An operation is one typed step of a transform stack. Its type fixes
//! how many channels it has and what the identity value of each channel
//! is; the hint is a tag for DCC round-tripping (pivots, shear) that does
//! not change the math but is part of the persisted encoding.

use crate::util::{equal_with_abs_error, Error, Result};

/// Transform operation type.
///
/// Discriminants are the upper nibble of the persisted `.ops` byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum XformOpType {
    Scale = 0,
    Translate = 1,
    /// Axis (x, y, z) + angle in degrees.
    Rotate = 2,
    /// 4x4 matrix, row-major.
    Matrix = 3,
    RotateX = 4,
    RotateY = 5,
    RotateZ = 6,
}

impl XformOpType {
    /// Decode the type nibble.
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Scale),
            1 => Some(Self::Translate),
            2 => Some(Self::Rotate),
            3 => Some(Self::Matrix),
            4 => Some(Self::RotateX),
            5 => Some(Self::RotateY),
            6 => Some(Self::RotateZ),
            _ => None,
        }
    }

    /// Number of double channels an operation of this type carries.
    pub const fn num_channels(self) -> usize {
        match self {
            Self::Scale | Self::Translate => 3,
            Self::Rotate => 4,
            Self::Matrix => 16,
            Self::RotateX | Self::RotateY | Self::RotateZ => 1,
        }
    }

    /// Identity value of one channel.
    pub const fn default_channel_value(self, index: usize) -> f64 {
        match self {
            Self::Scale => 1.0,
            Self::Matrix => match index {
                0 | 5 | 10 | 15 => 1.0,
                _ => 0.0,
            },
            Self::Translate | Self::Rotate | Self::RotateX | Self::RotateY | Self::RotateZ => 0.0,
        }
    }

    /// Largest valid hint for this type.
    const fn max_hint(self) -> u8 {
        match self {
            Self::Scale => ScaleHint::Scale as u8,
            Self::Translate => TranslateHint::RotatePivotTranslation as u8,
            Self::Rotate | Self::RotateX | Self::RotateY | Self::RotateZ => {
                RotateHint::RotateOrientation as u8
            }
            Self::Matrix => MatrixHint::MayaShear as u8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Scale => "scale",
            Self::Translate => "translate",
            Self::Rotate => "rotate",
            Self::Matrix => "matrix",
            Self::RotateX => "rotateX",
            Self::RotateY => "rotateY",
            Self::RotateZ => "rotateZ",
        }
    }
}

/// Hints for scale operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ScaleHint {
    Scale = 0,
}

/// Hints for translate operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TranslateHint {
    Translate = 0,
    ScalePivotPoint = 1,
    ScalePivotTranslation = 2,
    RotatePivotPoint = 3,
    RotatePivotTranslation = 4,
}

/// Hints for rotate operations (all rotate types).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RotateHint {
    Rotate = 0,
    RotateOrientation = 1,
}

/// Hints for matrix operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MatrixHint {
    Matrix = 0,
    MayaShear = 1,
}

/// A single transform operation.
#[derive(Clone, Debug, PartialEq)]
pub struct XformOp {
    op_type: XformOpType,
    hint: u8,
    values: Vec<f64>,
}

impl XformOp {
    /// Create an operation holding its identity values.
    ///
    /// A hint outside the range valid for `op_type` is replaced by 0.
    pub fn new(op_type: XformOpType, hint: u8) -> Self {
        let values = (0..op_type.num_channels())
            .map(|i| op_type.default_channel_value(i))
            .collect();
        let mut op = Self { op_type, hint: 0, values };
        op.set_hint(hint);
        op
    }

    /// Create an operation with explicit channel values.
    pub fn with_values(op_type: XformOpType, hint: u8, values: &[f64]) -> Result<Self> {
        let mut op = Self::new(op_type, hint);
        op.set_values(values)?;
        Ok(op)
    }

    /// Decode an operation from its `.ops` byte. Values are identity.
    pub fn from_encoding(code: u8) -> Option<Self> {
        XformOpType::from_u8(code >> 4).map(|t| Self::new(t, code & 0xF))
    }

    /// Create a scale operation.
    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        Self { op_type: XformOpType::Scale, hint: 0, values: vec![x, y, z] }
    }

    /// Create a translate operation.
    pub fn translate(x: f64, y: f64, z: f64) -> Self {
        Self { op_type: XformOpType::Translate, hint: 0, values: vec![x, y, z] }
    }

    /// Create an axis/angle rotation (angle in degrees).
    pub fn rotate(axis: [f64; 3], angle: f64) -> Self {
        Self {
            op_type: XformOpType::Rotate,
            hint: 0,
            values: vec![axis[0], axis[1], axis[2], angle],
        }
    }

    /// Create a rotation around X axis (angle in degrees).
    pub fn rotate_x(angle: f64) -> Self {
        Self { op_type: XformOpType::RotateX, hint: 0, values: vec![angle] }
    }

    /// Create a rotation around Y axis (angle in degrees).
    pub fn rotate_y(angle: f64) -> Self {
        Self { op_type: XformOpType::RotateY, hint: 0, values: vec![angle] }
    }

    /// Create a rotation around Z axis (angle in degrees).
    pub fn rotate_z(angle: f64) -> Self {
        Self { op_type: XformOpType::RotateZ, hint: 0, values: vec![angle] }
    }

    /// Create a 4x4 matrix operation (row-major).
    pub fn matrix(m: [f64; 16]) -> Self {
        Self { op_type: XformOpType::Matrix, hint: 0, values: m.to_vec() }
    }

    /// Builder form of [`XformOp::set_hint`].
    pub fn with_hint(mut self, hint: u8) -> Self {
        self.set_hint(hint);
        self
    }

    pub fn op_type(&self) -> XformOpType {
        self.op_type
    }

    pub fn hint(&self) -> u8 {
        self.hint
    }

    /// Set the hint; an out-of-range hint becomes 0.
    pub fn set_hint(&mut self, hint: u8) {
        self.hint = if hint > self.op_type.max_hint() { 0 } else { hint };
    }

    /// Persisted byte: `(type << 4) | (hint & 0xF)`.
    pub fn encoding(&self) -> u8 {
        ((self.op_type as u8) << 4) | (self.hint & 0xF)
    }

    pub fn num_channels(&self) -> usize {
        self.values.len()
    }

    /// Current channel values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Current value of one channel. Panics if `index` is out of range.
    pub fn channel_value(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Set one channel. Panics if `index` is out of range.
    pub fn set_channel_value(&mut self, index: usize, value: f64) {
        self.values[index] = value;
    }

    /// Replace all channel values; the count must match the op type.
    pub fn set_values(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.values.len() {
            return Err(Error::topology(
                format!("{} channels for {}", self.values.len(), self.op_type.name()),
                format!("{} channels", values.len()),
            ));
        }
        self.values.copy_from_slice(values);
        Ok(())
    }

    /// Identity value of one channel.
    pub fn default_channel_value(&self, index: usize) -> f64 {
        self.op_type.default_channel_value(index)
    }

    /// True when every channel is within `tolerance` of its identity value.
    pub fn is_identity(&self, tolerance: f64) -> bool {
        self.values
            .iter()
            .enumerate()
            .all(|(i, &v)| equal_with_abs_error(v, self.default_channel_value(i), tolerance))
    }
}
