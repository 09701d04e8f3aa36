//! Object and property metadata.
//!
//! An ordered string map. Schemas tag their compound and object with
//! `schema=AbcGeom_Xform_v3`; bounds properties carry `interpretation=box`.

use smallvec::SmallVec;
use std::fmt;

/// Ordered key-value metadata; insertion order is kept for serialization.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MetaData {
    entries: SmallVec<[(String, String); 4]>,
}

impl MetaData {
    pub const SCHEMA_KEY: &'static str = "schema";
    pub const SCHEMA_OBJ_TITLE_KEY: &'static str = "schemaObjTitle";
    pub const INTERPRETATION_KEY: &'static str = "interpretation";

    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`. Overwriting keeps the original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`MetaData::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.iter().find_map(|(k, v)| (k == key).then_some(v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Alembic text form: `k=v;k2=v2`, with `\`, `;` and `=` escaped.
    pub fn serialize(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", escape(k), escape(v)))
            .collect::<Vec<_>>()
            .join(";")
    }

    pub fn schema(&self) -> Option<&str> {
        self.get(Self::SCHEMA_KEY)
    }

    pub fn interpretation(&self) -> Option<&str> {
        self.get(Self::INTERPRETATION_KEY)
    }

    pub fn matches_schema(&self, title: &str) -> bool {
        self.schema() == Some(title)
    }
}

impl fmt::Debug for MetaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | ';' | '=') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
