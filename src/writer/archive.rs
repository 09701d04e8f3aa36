//! Archive: the time sampling registry and the finished object tree.
//!
//! Schemas are written independently (one writer per node, possibly on
//! different threads) and their objects are handed to the archive when
//! done. The archive is `Sync`; adding objects and time samplings takes
//! short internal locks.

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::core::TimeSampling;
use crate::util::{Result, StoreError};

use super::object::OObject;
use super::property::OProperty;

/// In-memory archive.
pub struct OArchive {
    name: String,
    time_samplings: RwLock<Vec<TimeSampling>>,
    objects: Mutex<Vec<OObject>>,
}

impl OArchive {
    /// Create an archive; time sampling 0 is identity.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            time_samplings: RwLock::new(vec![TimeSampling::IDENTITY]),
            objects: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a time sampling, reusing an equal one if present.
    pub fn add_time_sampling(&self, ts: TimeSampling) -> u32 {
        let mut samplings = self.time_samplings.write();
        if let Some(index) = samplings.iter().position(|t| *t == ts) {
            return index as u32;
        }
        samplings.push(ts);
        (samplings.len() - 1) as u32
    }

    pub fn num_time_samplings(&self) -> usize {
        self.time_samplings.read().len()
    }

    pub fn time_sampling(&self, index: u32) -> Option<TimeSampling> {
        self.time_samplings.read().get(index as usize).cloned()
    }

    /// Add a finished top-level object.
    ///
    /// Every property must reference a registered time sampling.
    pub fn add_object(&self, object: OObject) -> Result<()> {
        let count = self.num_time_samplings();
        let mut unknown = None;
        object.walk_properties(&mut |prop: &OProperty| {
            if unknown.is_none() && prop.header.time_sampling_index as usize >= count {
                unknown = Some(StoreError::UnknownTimeSampling {
                    name: prop.name().to_string(),
                    index: prop.header.time_sampling_index,
                    count,
                });
            }
        });
        if let Some(err) = unknown {
            return Err(err.into());
        }

        debug!(object = %object.name, "object added to archive");
        self.objects.lock().push(object);
        Ok(())
    }

    pub fn num_objects(&self) -> usize {
        self.objects.lock().len()
    }

    /// Largest sample count among properties using a time sampling.
    pub fn max_num_samples_for_time_sampling(&self, index: u32) -> Option<usize> {
        if index as usize >= self.num_time_samplings() {
            return None;
        }
        let mut max = 0;
        for object in self.objects.lock().iter() {
            object.walk_properties(&mut |prop: &OProperty| {
                if prop.header.time_sampling_index == index {
                    max = max.max(prop.num_samples());
                }
            });
        }
        Some(max)
    }

    /// Finish the archive into a root object holding every added object,
    /// sorted by name, plus the time sampling list.
    pub fn into_root(self) -> (OObject, Vec<TimeSampling>) {
        let mut root = OObject::new("");
        let mut objects = self.objects.into_inner();
        objects.sort_by(|a, b| a.name.cmp(&b.name));
        root.children = objects;
        (root, self.time_samplings.into_inner())
    }
}
