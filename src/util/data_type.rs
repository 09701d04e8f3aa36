//! Element layout of a property: POD type times extent.

use super::PlainOldDataType;
use std::fmt;

/// How one element of a sample is laid out.
///
/// `.vals` of a node with a single translate op is `float64_t[3]`; `.ops`
/// of a three-op stack is `uint8_t[3]`. The extent is a single byte in the
/// file format, so wider stacks need array properties instead.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DataType {
    pub pod: PlainOldDataType,
    pub extent: u8,
}

impl DataType {
    pub const UNKNOWN: Self = Self::new(PlainOldDataType::Unknown, 0);
    pub const BOOL: Self = Self::scalar(PlainOldDataType::Boolean);
    pub const UINT8: Self = Self::scalar(PlainOldDataType::Uint8);
    pub const UINT32: Self = Self::scalar(PlainOldDataType::Uint32);
    pub const FLOAT64: Self = Self::scalar(PlainOldDataType::Float64);
    /// min xyz then max xyz
    pub const BOX3D: Self = Self::new(PlainOldDataType::Float64, 6);

    #[inline]
    pub const fn new(pod: PlainOldDataType, extent: u8) -> Self {
        Self { pod, extent }
    }

    #[inline]
    pub const fn scalar(pod: PlainOldDataType) -> Self {
        Self::new(pod, 1)
    }

    /// `width` elements of `pod` packed into one element, if the width
    /// fits the one-byte extent.
    pub fn fixed(pod: PlainOldDataType, width: usize) -> Option<Self> {
        match u8::try_from(width) {
            Ok(extent) if extent > 0 => Some(Self::new(pod, extent)),
            _ => None,
        }
    }

    /// Bytes per element.
    #[inline]
    pub const fn num_bytes(&self) -> usize {
        self.pod.num_bytes() * self.extent as usize
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.num_bytes() > 0
    }
}

impl fmt::Debug for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.extent {
            1 => write!(f, "{}", self.pod),
            n => write!(f, "{}[{}]", self.pod, n),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
