//! JSON dump of written objects.
//!
//! Decodes every stored sample by its POD type so a written archive can be
//! inspected or diffed without a reader.

use std::path::Path;

use serde_json::{json, Value};

use crate::core::TimeSampling;
use crate::core::TimeSamplingType;
use crate::util::{PlainOldDataType, Result};

use super::object::OObject;
use super::property::{OProperty, OPropertyData};

/// Decode one sample's bytes into a JSON array of numbers/bools.
fn decode_sample(pod: PlainOldDataType, bytes: &[u8]) -> Value {
    let values: Vec<Value> = match pod {
        PlainOldDataType::Boolean => bytes.iter().map(|&b| Value::Bool(b != 0)).collect(),
        PlainOldDataType::Uint8 => bytes.iter().map(|&b| json!(b)).collect(),
        PlainOldDataType::Uint32 => bytemuck::pod_collect_to_vec::<u8, u32>(bytes)
            .into_iter()
            .map(|v| json!(v))
            .collect(),
        PlainOldDataType::Float64 => bytemuck::pod_collect_to_vec::<u8, f64>(bytes)
            .into_iter()
            .map(|v| json!(v))
            .collect(),
        _ => bytes.iter().map(|&b| json!(b)).collect(),
    };
    Value::Array(values)
}

/// JSON for one property (recursing into compounds).
pub fn property_to_json(prop: &OProperty) -> Value {
    let header = &prop.header;
    let mut out = json!({
        "name": header.name,
        "type": header.property_type.name(),
        "metadata": header.meta_data.serialize(),
    });

    match &prop.data {
        OPropertyData::Compound(children) => {
            out["properties"] = Value::Array(children.iter().map(property_to_json).collect());
        }
        OPropertyData::Scalar(store) | OPropertyData::Array(store) => {
            let samples: Vec<Value> = (0..store.len())
                .filter_map(|i| store.get(i))
                .map(|bytes| decode_sample(header.data_type.pod, bytes))
                .collect();
            out["dataType"] = json!(header.data_type.to_string());
            out["timeSampling"] = json!(header.time_sampling_index);
            out["numSamples"] = json!(store.len());
            out["numUniqueSamples"] = json!(store.num_unique());
            out["firstChangedIndex"] = json!(prop.first_changed_index);
            out["lastChangedIndex"] = json!(prop.last_changed_index);
            out["samples"] = Value::Array(samples);
        }
    }
    out
}

/// JSON for an object and its subtree.
pub fn object_to_json(object: &OObject) -> Value {
    json!({
        "name": object.name,
        "metadata": object.meta_data.serialize(),
        "properties": object.properties.iter().map(property_to_json).collect::<Vec<_>>(),
        "children": object.children.iter().map(object_to_json).collect::<Vec<_>>(),
    })
}

fn time_sampling_to_json(ts: &TimeSampling) -> Value {
    match &ts.sampling_type {
        TimeSamplingType::Identity => json!({ "type": "identity" }),
        TimeSamplingType::Uniform { time_per_cycle, start_time } => json!({
            "type": "uniform",
            "timePerCycle": time_per_cycle,
            "startTime": start_time,
        }),
        TimeSamplingType::Acyclic { times } => json!({ "type": "acyclic", "times": times }),
    }
}

/// JSON for a finished archive root plus its time samplings.
pub fn archive_to_json(root: &OObject, time_samplings: &[TimeSampling]) -> Value {
    json!({
        "timeSamplings": time_samplings.iter().map(time_sampling_to_json).collect::<Vec<_>>(),
        "root": object_to_json(root),
    })
}

/// Write a pretty-printed archive dump to `path`.
pub fn write_json(
    path: impl AsRef<Path>,
    root: &OObject,
    time_samplings: &[TimeSampling],
) -> Result<()> {
    let text = serde_json::to_string_pretty(&archive_to_json(root, time_samplings))?;
    std::fs::write(path, text)?;
    Ok(())
}
