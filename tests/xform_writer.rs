//! Integration tests for the Xform writer: archive assembly, concurrent
//! node writing and the JSON dump.

use alembic_xform::prelude::*;
use alembic_xform::writer::dump;
use alembic_xform::writer::schema::{
    ANIM_CHANNELS_PROPERTY, CHILD_BOUNDS_PROPERTY, INHERITS_PROPERTY,
    NOT_CONSTANT_IDENTITY_PROPERTY, OPS_PROPERTY, VALS_PROPERTY,
};
use rayon::prelude::*;
use tempfile::NamedTempFile;

/// A node translating along x by `speed` per frame.
fn write_mover(name: &str, speed: f64, frames: usize, ts: u32) -> Result<OObject> {
    let config = XformSchemaConfig::default().with_time_sampling(ts);
    let mut xform = OXform::with_config(name, config)?;
    let mut sample = XformSample::default();
    for frame in 0..frames {
        sample.set_translation(DVec3::new(speed * frame as f64, 1.0, 0.0))?;
        sample.set_scale(DVec3::ONE)?;
        xform.set(&mut sample)?;
    }
    Ok(xform.build())
}

fn xform_property<'a>(object: &'a OObject, name: &str) -> &'a OProperty {
    object
        .property(".xform")
        .and_then(|c| c.child(name))
        .unwrap_or_else(|| panic!("missing {name} on {}", object.name))
}

#[test]
fn test_concurrent_nodes_into_archive() {
    let archive = OArchive::new("scene");
    let ts = archive.add_time_sampling(TimeSampling::uniform(1.0 / 24.0, 0.0));

    let objects: Vec<OObject> = (0..8)
        .into_par_iter()
        .map(|i| write_mover(&format!("node{i}"), i as f64, 10, ts))
        .collect::<Result<_>>()
        .expect("nodes written");
    for object in objects {
        archive.add_object(object).expect("object accepted");
    }

    assert_eq!(archive.num_objects(), 8);
    assert_eq!(archive.max_num_samples_for_time_sampling(ts), Some(10));

    let (root, samplings) = archive.into_root();
    assert_eq!(samplings.len(), 2);
    let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["node0", "node1", "node2", "node3", "node4", "node5", "node6", "node7"]);

    // node0 never moves: only y sits away from its default
    let still = root.child("node0").unwrap();
    let anim: Vec<u32> = xform_property(still, ANIM_CHANNELS_PROPERTY).sample_typed(9).unwrap();
    assert!(anim.is_empty());
    assert!(xform_property(still, VALS_PROPERTY).is_constant());

    let moving = root.child("node3").unwrap();
    let anim: Vec<u32> = xform_property(moving, ANIM_CHANNELS_PROPERTY).sample_typed(9).unwrap();
    assert_eq!(anim, vec![0]);
    let vals: Vec<f64> = xform_property(moving, VALS_PROPERTY).sample_typed(9).unwrap();
    assert_eq!(vals, vec![27.0, 1.0, 0.0, 1.0, 1.0, 1.0]);
    assert_eq!(xform_property(moving, OPS_PROPERTY).sample(0), Some(&[0x10u8, 0x00][..]));

    // y = 1.0 breaks identity on every node from the first sample
    for node in &root.children {
        let marker = xform_property(node, NOT_CONSTANT_IDENTITY_PROPERTY);
        assert_eq!(marker.num_samples(), 10);
    }
}

#[test]
fn test_sample_counts_stay_aligned() -> Result<()> {
    let mut xform = OXform::new("held")?;
    let mut sample = XformSample::default();
    sample.set_child_bounds(BBox3d::new(DVec3::ZERO, DVec3::ONE));
    sample.set_z_rotation(0.0)?;
    xform.set(&mut sample)?;

    for frame in 1..12 {
        if frame % 3 == 0 {
            xform.set_from_previous()?;
        } else {
            sample.set_z_rotation(frame as f64)?;
            xform.set(&mut sample)?;
        }
    }
    assert_eq!(xform.schema().num_samples(), 12);

    let object = xform.build();
    for name in [
        INHERITS_PROPERTY,
        OPS_PROPERTY,
        VALS_PROPERTY,
        ANIM_CHANNELS_PROPERTY,
        CHILD_BOUNDS_PROPERTY,
    ] {
        assert_eq!(xform_property(&object, name).num_samples(), 12, "{name}");
    }
    // the marker starts at the first non-identity sample
    assert_eq!(xform_property(&object, NOT_CONSTANT_IDENTITY_PROPERTY).num_samples(), 11);
    Ok(())
}

#[test]
fn test_topology_error_leaves_node_usable() -> Result<()> {
    let mut xform = OXform::new("strict")?;
    let mut sample = XformSample::default();
    sample.set_translation(DVec3::X)?;
    xform.set(&mut sample)?;

    let mut other = XformSample::default();
    other.set_scale(DVec3::ONE)?;
    let err = xform.set(&mut other).unwrap_err();
    assert!(matches!(err, Error::TopologyMismatch { .. }));
    assert!(err.to_string().contains("topology"));

    sample.set_translation(DVec3::Y)?;
    xform.set(&mut sample)?;
    assert_eq!(xform.schema().num_samples(), 2);
    assert_eq!(xform.schema().animated_channels(), vec![0, 1]);
    Ok(())
}

#[test]
fn test_json_dump_to_file() -> Result<()> {
    let archive = OArchive::new("dump");
    let ts = archive.add_time_sampling(TimeSampling::uniform(0.5, 1.0));
    archive.add_object(write_mover("mover", 2.0, 3, ts)?)?;

    let mut held = OXform::new("held")?;
    let mut sample = XformSample::identity();
    sample.set_inherits_xforms(false);
    held.set(&mut sample)?;
    held.set_from_previous()?;
    archive.add_object(held.build())?;

    let (root, samplings) = archive.into_root();
    let temp = NamedTempFile::new()?;
    dump::write_json(temp.path(), &root, &samplings)?;

    let text = std::fs::read_to_string(temp.path())?;
    let json: serde_json::Value = serde_json::from_str(&text)?;

    assert_eq!(json["timeSamplings"][1]["type"], "uniform");
    assert_eq!(json["timeSamplings"][1]["timePerCycle"], 0.5);

    let held = &json["root"]["children"][0];
    assert_eq!(held["name"], "held");
    let props = held["properties"][0]["properties"].as_array().unwrap();
    let inherits = props.iter().find(|p| p["name"] == ".inherits").unwrap();
    assert_eq!(inherits["numSamples"], 2);
    assert_eq!(inherits["numUniqueSamples"], 1);
    assert_eq!(inherits["samples"][1], serde_json::json!([false]));
    assert!(props.iter().all(|p| p["name"] != ".ops"));

    let mover = &json["root"]["children"][1];
    assert_eq!(mover["metadata"], "schema=AbcGeom_Xform_v3;schemaObjTitle=AbcGeom_Xform_v3:.xform");
    let props = mover["properties"][0]["properties"].as_array().unwrap();
    let vals = props.iter().find(|p| p["name"] == ".vals").unwrap();
    assert_eq!(vals["dataType"], "float64_t[6]");
    assert_eq!(vals["timeSampling"], 1);
    assert_eq!(vals["samples"][2], serde_json::json!([4.0, 1.0, 0.0, 1.0, 1.0, 1.0]));
    Ok(())
}

#[test]
fn test_unknown_time_sampling_rejected_by_archive() -> Result<()> {
    let archive = OArchive::new("scene");
    let node = write_mover("orphan", 1.0, 2, 4)?;
    let err = archive.add_object(node).unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::UnknownTimeSampling { index: 4, .. })));
    Ok(())
}
