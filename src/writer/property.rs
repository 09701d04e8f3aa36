//! In-memory property store.
//!
//! [`OProperty`] is a property tree node: scalar and array properties hold
//! time samples, compounds hold child properties and implement
//! [`CompoundPropertyWriter`] so schemas can write into them.
//!
//! Consecutive equal samples share one stored blob, whether they arrive
//! as a fresh write with identical bytes or as an explicit repeat.

use crate::core::{CompoundPropertyWriter, MetaData, PropertyHeader, PropertyId, PropertyType};
use crate::util::{DataType, Result, StoreError};

/// Time samples of one scalar or array property.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleStore {
    /// Distinct consecutive sample payloads.
    blobs: Vec<Vec<u8>>,
    /// Per sample index into `blobs`.
    refs: Vec<u32>,
}

impl SampleStore {
    /// Number of samples, repeats included.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Number of payloads actually stored.
    pub fn num_unique(&self) -> usize {
        self.blobs.len()
    }

    /// Bytes of one sample.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let blob = *self.refs.get(index)? as usize;
        self.blobs.get(blob).map(Vec::as_slice)
    }

    /// Append a sample; returns true if it equals the previous one.
    fn push(&mut self, data: &[u8]) -> bool {
        if self.blobs.last().is_some_and(|prev| prev.as_slice() == data) {
            self.refs.push((self.blobs.len() - 1) as u32);
            return true;
        }
        self.blobs.push(data.to_vec());
        self.refs.push((self.blobs.len() - 1) as u32);
        false
    }

    /// Append a reference to the previous sample.
    fn repeat(&mut self) -> bool {
        match self.refs.last() {
            Some(&last) => {
                self.refs.push(last);
                true
            }
            None => false,
        }
    }
}

/// Property data variants.
#[derive(Clone, Debug, PartialEq)]
pub enum OPropertyData {
    /// Scalar property samples.
    Scalar(SampleStore),
    /// Array property samples.
    Array(SampleStore),
    /// Compound property children.
    Compound(Vec<OProperty>),
}

/// Property for writing.
#[derive(Clone, Debug, PartialEq)]
pub struct OProperty {
    /// Name, type, data type, time sampling and metadata.
    pub header: PropertyHeader,
    /// Property data.
    pub data: OPropertyData,
    /// First sample index whose value differs from its predecessor.
    pub first_changed_index: u32,
    /// Last sample index whose value differs from its predecessor.
    pub last_changed_index: u32,
}

impl OProperty {
    /// Create a property from a header.
    pub fn from_header(header: PropertyHeader) -> Self {
        let data = match header.property_type {
            PropertyType::Scalar => OPropertyData::Scalar(SampleStore::default()),
            PropertyType::Array => OPropertyData::Array(SampleStore::default()),
            PropertyType::Compound => OPropertyData::Compound(Vec::new()),
        };
        Self {
            header,
            data,
            first_changed_index: 0,
            last_changed_index: 0,
        }
    }

    /// Create a scalar property.
    pub fn scalar(name: &str, data_type: DataType) -> Self {
        Self::from_header(PropertyHeader::scalar(name, data_type))
    }

    /// Create an array property.
    pub fn array(name: &str, data_type: DataType) -> Self {
        Self::from_header(PropertyHeader::array(name, data_type))
    }

    /// Create a compound property.
    pub fn compound(name: &str) -> Self {
        Self::from_header(PropertyHeader::compound(name))
    }

    /// Set metadata.
    pub fn with_meta_data(mut self, md: MetaData) -> Self {
        self.header.meta_data = md;
        self
    }

    /// Set time sampling index.
    pub fn with_time_sampling(mut self, index: u32) -> Self {
        self.header.time_sampling_index = index;
        self
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Sample storage for scalar and array properties.
    pub fn samples(&self) -> Option<&SampleStore> {
        match &self.data {
            OPropertyData::Scalar(s) | OPropertyData::Array(s) => Some(s),
            OPropertyData::Compound(_) => None,
        }
    }

    /// Get number of samples (0 for compounds).
    pub fn num_samples(&self) -> usize {
        self.samples().map_or(0, SampleStore::len)
    }

    /// Bytes of one sample.
    pub fn sample(&self, index: usize) -> Option<&[u8]> {
        self.samples()?.get(index)
    }

    /// One sample decoded as POD elements.
    pub fn sample_typed<T: bytemuck::Pod>(&self, index: usize) -> Option<Vec<T>> {
        let bytes = self.sample(index)?;
        if bytes.len() % std::mem::size_of::<T>() != 0 {
            return None;
        }
        Some(bytemuck::pod_collect_to_vec(bytes))
    }

    /// True when every sample equals the first one.
    pub fn is_constant(&self) -> bool {
        self.samples().map_or(true, |s| s.num_unique() <= 1)
    }

    /// Child properties of a compound (empty otherwise).
    pub fn children(&self) -> &[OProperty] {
        match &self.data {
            OPropertyData::Compound(children) => children,
            _ => &[],
        }
    }

    /// Child property by name.
    pub fn child(&self, name: &str) -> Option<&OProperty> {
        self.children().iter().find(|p| p.name() == name)
    }

    /// Add a child property (compounds only).
    pub fn add_child(&mut self, prop: OProperty) -> Result<PropertyId> {
        let parent = self.header.name.clone();
        let OPropertyData::Compound(children) = &mut self.data else {
            return Err(StoreError::NotCompound(parent).into());
        };
        if children.iter().any(|p| p.header.name == prop.header.name) {
            return Err(StoreError::DuplicateProperty(prop.header.name).into());
        }
        children.push(prop);
        Ok(PropertyId::new(children.len() - 1))
    }

    fn child_mut(&mut self, id: PropertyId) -> Result<&mut OProperty> {
        let parent = self.header.name.clone();
        match &mut self.data {
            OPropertyData::Compound(children) => children.get_mut(id.index()).ok_or_else(|| {
                StoreError::PropertyNotFound(format!("{parent}#{}", id.index())).into()
            }),
            _ => Err(StoreError::NotCompound(parent).into()),
        }
    }

    fn child_ref(&self, id: PropertyId) -> Result<&OProperty> {
        match &self.data {
            OPropertyData::Compound(children) => children.get(id.index()).ok_or_else(|| {
                StoreError::PropertyNotFound(format!("{}#{}", self.header.name, id.index())).into()
            }),
            _ => Err(StoreError::NotCompound(self.header.name.clone()).into()),
        }
    }

    fn type_mismatch(&self, expected: PropertyType) -> StoreError {
        StoreError::TypeMismatch {
            name: self.header.name.clone(),
            expected: expected.name().to_string(),
            actual: self.header.property_type.name().to_string(),
        }
    }

    /// Append a sample and update the changed-index range.
    fn push_sample(&mut self, data: &[u8]) {
        let sample_index = self.num_samples() as u32;
        let is_same = match &mut self.data {
            OPropertyData::Scalar(s) | OPropertyData::Array(s) => s.push(data),
            OPropertyData::Compound(_) => return,
        };
        if sample_index > 0 && !is_same {
            if self.first_changed_index == 0 {
                self.first_changed_index = sample_index;
            }
            self.last_changed_index = sample_index;
        }
    }

    /// Append a scalar sample after checking its size.
    pub fn add_scalar_sample(&mut self, data: &[u8]) -> Result<()> {
        if !self.header.is_scalar() {
            return Err(self.type_mismatch(PropertyType::Scalar).into());
        }
        let expected = self.header.data_type.num_bytes();
        if data.len() != expected {
            return Err(StoreError::SampleSize {
                name: self.header.name.clone(),
                expected,
                actual: data.len(),
            }
            .into());
        }
        self.push_sample(data);
        Ok(())
    }

    /// Append an array sample after checking it holds whole elements.
    pub fn add_array_sample(&mut self, data: &[u8]) -> Result<()> {
        if !self.header.is_array() {
            return Err(self.type_mismatch(PropertyType::Array).into());
        }
        let elem = self.header.data_type.num_bytes();
        if elem == 0 || data.len() % elem != 0 {
            return Err(StoreError::SampleSize {
                name: self.header.name.clone(),
                expected: elem * (data.len() / elem.max(1)),
                actual: data.len(),
            }
            .into());
        }
        self.push_sample(data);
        Ok(())
    }

    /// Append a repeat of the previous sample.
    pub fn repeat_previous_sample(&mut self) -> Result<()> {
        let repeated = match &mut self.data {
            OPropertyData::Scalar(s) | OPropertyData::Array(s) => s.repeat(),
            OPropertyData::Compound(_) => {
                return Err(self.type_mismatch(PropertyType::Scalar).into());
            }
        };
        if !repeated {
            return Err(StoreError::NoPreviousSample(self.header.name.clone()).into());
        }
        Ok(())
    }

    /// Visit this property and all nested children, depth first.
    pub fn walk(&self, f: &mut impl FnMut(&OProperty)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }
}

impl CompoundPropertyWriter for OProperty {
    fn create_property(&mut self, header: PropertyHeader) -> Result<PropertyId> {
        self.add_child(OProperty::from_header(header))
    }

    fn property_header(&self, id: PropertyId) -> Result<&PropertyHeader> {
        Ok(&self.child_ref(id)?.header)
    }

    fn property_id(&self, name: &str) -> Option<PropertyId> {
        self.children()
            .iter()
            .position(|p| p.name() == name)
            .map(PropertyId::new)
    }

    fn write_sample(&mut self, id: PropertyId, data: &[u8]) -> Result<()> {
        self.child_mut(id)?.add_scalar_sample(data)
    }

    fn write_array_sample(&mut self, id: PropertyId, data: &[u8]) -> Result<()> {
        self.child_mut(id)?.add_array_sample(data)
    }

    fn set_from_previous_sample(&mut self, id: PropertyId) -> Result<()> {
        self.child_mut(id)?.repeat_previous_sample()
    }

    fn num_samples(&self, id: PropertyId) -> Result<usize> {
        Ok(self.child_ref(id)?.num_samples())
    }
}
