//! Typed time-sampled slots.
//!
//! Schemas never write raw bytes themselves. Each child property they own
//! is an [`OTypedProperty`] of one [`SlotKind`], written with a matching
//! [`SlotValue`] or repeated with `set_from_previous`.

use crate::core::{CompoundPropertyWriter, MetaData, PropertyHeader, PropertyId};
use crate::util::{BBox3d, Bool, DataType, PlainOldDataType, Result, StoreError};

/// Kinds of slot a schema can own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    /// Single bool per sample.
    Bool,
    /// Six doubles per sample (min xyz, max xyz).
    Box3d,
    /// Variable-length uint32 list per sample.
    Uint32Array,
    /// Fixed-width byte sequence per sample.
    Bytes,
    /// Fixed-width double sequence per sample.
    Doubles,
}

impl SlotKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Box3d => "box3d",
            Self::Uint32Array => "uint32[]",
            Self::Bytes => "uint8[n]",
            Self::Doubles => "float64[n]",
        }
    }
}

/// A value written into a slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SlotValue<'a> {
    Bool(bool),
    Box3d(&'a BBox3d),
    Uint32s(&'a [u32]),
    Bytes(&'a [u8]),
    Doubles(&'a [f64]),
}

impl SlotValue<'_> {
    pub const fn kind(&self) -> SlotKind {
        match self {
            Self::Bool(_) => SlotKind::Bool,
            Self::Box3d(_) => SlotKind::Box3d,
            Self::Uint32s(_) => SlotKind::Uint32Array,
            Self::Bytes(_) => SlotKind::Bytes,
            Self::Doubles(_) => SlotKind::Doubles,
        }
    }
}

/// Handle to one typed child property of a compound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OTypedProperty {
    id: PropertyId,
    kind: SlotKind,
    /// Stored as an array property rather than a fixed-extent scalar.
    array: bool,
}

impl OTypedProperty {
    /// Create a bool slot.
    pub fn create_bool<C: CompoundPropertyWriter>(
        compound: &mut C,
        name: &str,
        ts_index: u32,
    ) -> Result<Self> {
        let header = PropertyHeader::scalar(name, DataType::BOOL).with_time_sampling(ts_index);
        Self::create(compound, header, SlotKind::Bool)
    }

    /// Create a box slot (`interpretation=box`).
    pub fn create_box3d<C: CompoundPropertyWriter>(
        compound: &mut C,
        name: &str,
        ts_index: u32,
    ) -> Result<Self> {
        let header = PropertyHeader::scalar(name, DataType::BOX3D)
            .with_time_sampling(ts_index)
            .with_meta_data(MetaData::new().with(MetaData::INTERPRETATION_KEY, "box"));
        Self::create(compound, header, SlotKind::Box3d)
    }

    /// Create a variable-length uint32 list slot.
    pub fn create_uint32_array<C: CompoundPropertyWriter>(
        compound: &mut C,
        name: &str,
        ts_index: u32,
    ) -> Result<Self> {
        let header = PropertyHeader::array(name, DataType::UINT32).with_time_sampling(ts_index);
        Self::create(compound, header, SlotKind::Uint32Array)
    }

    /// Create a fixed-width byte slot of `width` elements.
    pub fn create_bytes<C: CompoundPropertyWriter>(
        compound: &mut C,
        name: &str,
        ts_index: u32,
        width: usize,
    ) -> Result<Self> {
        let pod = PlainOldDataType::Uint8;
        Self::create_fixed(compound, name, ts_index, width, pod, SlotKind::Bytes)
    }

    /// Create a fixed-width double slot of `width` elements.
    pub fn create_doubles<C: CompoundPropertyWriter>(
        compound: &mut C,
        name: &str,
        ts_index: u32,
        width: usize,
    ) -> Result<Self> {
        let pod = PlainOldDataType::Float64;
        Self::create_fixed(compound, name, ts_index, width, pod, SlotKind::Doubles)
    }

    /// Widths that fit the one-byte extent become scalars, wider ones
    /// fall back to array properties of single elements.
    fn create_fixed<C: CompoundPropertyWriter>(
        compound: &mut C,
        name: &str,
        ts_index: u32,
        width: usize,
        pod: PlainOldDataType,
        kind: SlotKind,
    ) -> Result<Self> {
        let header = match DataType::fixed(pod, width) {
            Some(data_type) => PropertyHeader::scalar(name, data_type),
            None => PropertyHeader::array(name, DataType::scalar(pod)),
        };
        Self::create(compound, header.with_time_sampling(ts_index), kind)
    }

    fn create<C: CompoundPropertyWriter>(
        compound: &mut C,
        header: PropertyHeader,
        kind: SlotKind,
    ) -> Result<Self> {
        let array = header.is_array();
        let id = compound.create_property(header)?;
        Ok(Self { id, kind, array })
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    /// True when backed by an array property.
    pub fn is_array(&self) -> bool {
        self.array
    }

    /// Append a sample.
    pub fn set<C: CompoundPropertyWriter>(
        &self,
        compound: &mut C,
        value: SlotValue<'_>,
    ) -> Result<()> {
        if value.kind() != self.kind {
            let name = compound.property_header(self.id)?.name.clone();
            return Err(StoreError::TypeMismatch {
                name,
                expected: self.kind.name().to_string(),
                actual: value.kind().name().to_string(),
            }
            .into());
        }

        let bytes: &[u8] = match value {
            SlotValue::Bool(v) => {
                return compound.write_sample(self.id, bytemuck::bytes_of(&Bool::new(v)));
            }
            SlotValue::Box3d(b) => return compound.write_sample(self.id, bytemuck::bytes_of(b)),
            SlotValue::Uint32s(v) => {
                return compound.write_array_sample(self.id, bytemuck::cast_slice(v));
            }
            SlotValue::Bytes(v) => v,
            SlotValue::Doubles(v) => bytemuck::cast_slice(v),
        };
        if self.array {
            compound.write_array_sample(self.id, bytes)
        } else {
            compound.write_sample(self.id, bytes)
        }
    }

    /// Append a repeat of the previous sample.
    pub fn set_from_previous<C: CompoundPropertyWriter>(&self, compound: &mut C) -> Result<()> {
        compound.set_from_previous_sample(self.id)
    }

    /// Number of samples written so far.
    pub fn num_samples<C: CompoundPropertyWriter>(&self, compound: &C) -> Result<usize> {
        compound.num_samples(self.id)
    }
}
