//! Plain Old Data types written by the Xform schema.

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Element storage type of a property.
///
/// Only the types the Xform schema emits are listed. Discriminants are the
/// Alembic file-format codes so headers stay interchangeable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PlainOldDataType {
    /// `.inherits` and `isNotConstantIdentity`; one byte, 0 or 1
    Boolean = 0,
    /// `.ops` encodings
    Uint8 = 1,
    /// `.animChans` channel indices
    Uint32 = 5,
    /// `.vals` and `.childBnds`
    Float64 = 11,
    /// Compound properties carry no element type
    #[default]
    Unknown = 127,
}

impl PlainOldDataType {
    /// Bytes per element; 0 for [`PlainOldDataType::Unknown`].
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Boolean | Self::Uint8 => 1,
            Self::Uint32 => 4,
            Self::Float64 => 8,
            Self::Unknown => 0,
        }
    }

    /// Alembic type name (`float64_t`, ...).
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "bool_t",
            Self::Uint8 => "uint8_t",
            Self::Uint32 => "uint32_t",
            Self::Float64 => "float64_t",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for PlainOldDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One-byte boolean as stored in bool properties.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Bool(u8);

impl Bool {
    pub const TRUE: Self = Self(1);
    pub const FALSE: Self = Self(0);

    #[inline]
    pub const fn new(v: bool) -> Self {
        if v { Self::TRUE } else { Self::FALSE }
    }

    #[inline]
    pub const fn get(self) -> bool {
        self.0 != 0
    }
}

impl From<bool> for Bool {
    #[inline]
    fn from(v: bool) -> Self {
        Self::new(v)
    }
}

impl fmt::Debug for Bool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.get(), f)
    }
}
