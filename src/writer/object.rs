//! Object tree.
//!
//! Objects are plain data: schema writers fill one in when they finish
//! (see [`super::OXform::build`]) and the archive collects them.

use crate::core::MetaData;

use super::property::OProperty;

/// A finished node of the object hierarchy.
#[derive(Clone, Debug, Default)]
pub struct OObject {
    pub name: String,
    /// `schema` / `schemaObjTitle` for schema objects.
    pub meta_data: MetaData,
    pub children: Vec<OObject>,
    /// Top-level properties; schema objects hold a single compound.
    pub properties: Vec<OProperty>,
}

impl OObject {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_owned(), ..Default::default() }
    }

    pub fn with_meta_data(self, meta_data: MetaData) -> Self {
        Self { meta_data, ..self }
    }

    pub fn add_child(&mut self, child: OObject) {
        self.children.push(child);
    }

    pub fn add_property(&mut self, prop: OProperty) {
        self.properties.push(prop);
    }

    pub fn property(&self, name: &str) -> Option<&OProperty> {
        self.properties.iter().find(|p| p.name() == name)
    }

    pub fn child(&self, name: &str) -> Option<&OObject> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Depth-first visit of every property in this subtree, nested
    /// compound children included.
    pub fn walk_properties(&self, f: &mut impl FnMut(&OProperty)) {
        for prop in &self.properties {
            prop.walk(f);
        }
        for child in &self.children {
            child.walk_properties(f);
        }
    }
}
