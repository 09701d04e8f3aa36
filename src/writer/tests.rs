use super::*;
use super::schema::*;
use crate::core::CompoundPropertyWriter;
use crate::geom::{TranslateHint, XformOp, XformOpType, XformSample};
use crate::util::{BBox3d, DVec3, Error, Result};

fn schema() -> OXformSchema {
    OXformSchema::new(OProperty::compound(".xform"), XformSchemaConfig::default()).unwrap()
}

fn translate(x: f64, y: f64, z: f64) -> XformSample {
    XformSample::from_ops(vec![XformOp::translate(x, y, z)], true)
}

fn child<'a>(schema: &'a OXformSchema, name: &str) -> &'a OProperty {
    schema.compound().child(name).unwrap()
}

fn anim_chans(schema: &OXformSchema, index: usize) -> Vec<u32> {
    child(schema, ANIM_CHANNELS_PROPERTY).sample_typed(index).unwrap()
}

#[test]
fn test_init_creates_unsized_slots() {
    let s = schema();
    let c = s.compound();
    assert!(c.has_property(CHILD_BOUNDS_PROPERTY));
    assert!(c.has_property(INHERITS_PROPERTY));
    assert!(c.has_property(ANIM_CHANNELS_PROPERTY));
    assert!(!c.has_property(OPS_PROPERTY));
    assert!(!c.has_property(VALS_PROPERTY));
    assert!(!c.has_property(NOT_CONSTANT_IDENTITY_PROPERTY));
    assert!(c.children().iter().all(|p| p.num_samples() == 0));
    assert!(s.is_identity());
    assert_eq!((s.num_ops(), s.num_channels(), s.num_samples()), (0, 0, 0));
}

#[test]
fn test_constant_identity() -> Result<()> {
    let mut s = schema();
    s.set(&mut translate(0.0, 0.0, 0.0))?;

    assert!(s.is_identity());
    assert!(!s.has_not_constant_identity());
    assert!(!s.compound().has_property(NOT_CONSTANT_IDENTITY_PROPERTY));
    assert_eq!(anim_chans(&s, 0), Vec::<u32>::new());

    let ops = child(&s, OPS_PROPERTY);
    assert_eq!(ops.header.data_type.extent, 1);
    assert_eq!(ops.sample(0), Some(&[0x10u8][..]));
    let vals = child(&s, VALS_PROPERTY);
    assert_eq!(vals.header.data_type.extent, 3);
    assert_eq!(vals.sample_typed::<f64>(0).unwrap(), vec![0.0, 0.0, 0.0]);
    Ok(())
}

#[test]
fn test_translate_sequence() -> Result<()> {
    let mut s = schema();
    s.set(&mut translate(0.0, 0.0, 0.0))?;

    s.set(&mut translate(1.0, 0.0, 0.0))?;
    assert!(!s.is_identity());
    assert!(s.has_not_constant_identity());
    let marker = child(&s, NOT_CONSTANT_IDENTITY_PROPERTY);
    assert_eq!(marker.num_samples(), 1);
    assert_eq!(marker.sample(0), Some(&[1u8][..]));
    // channel 0 moved away from the first sample
    assert_eq!(s.static_channels(), &[false, true, true]);
    assert_eq!(anim_chans(&s, 1), vec![0]);

    s.set(&mut translate(2.0, 0.0, 0.0))?;
    assert_eq!(s.static_channels(), &[false, true, true]);
    assert_eq!(anim_chans(&s, 2), vec![0]);
    assert_eq!(child(&s, VALS_PROPERTY).sample_typed::<f64>(2).unwrap(), vec![2.0, 0.0, 0.0]);
    Ok(())
}

#[test]
fn test_topology_mismatch_added_op() -> Result<()> {
    let mut s = schema();
    s.set(&mut translate(0.0, 0.0, 0.0))?;

    let mut bigger = XformSample::from_ops(
        vec![XformOp::translate(0.0, 0.0, 0.0), XformOp::rotate([0.0, 1.0, 0.0], 30.0)],
        true,
    );
    let err = s.set(&mut bigger).unwrap_err();
    assert!(matches!(err, Error::TopologyMismatch { .. }));

    // nothing was written by the rejected call
    assert_eq!(s.num_samples(), 1);
    assert!(s.compound().children().iter().all(|p| p.num_samples() <= 1));
    Ok(())
}

#[test]
fn test_topology_mismatch_kind_and_hint() -> Result<()> {
    let mut s = schema();
    s.set(&mut translate(0.0, 0.0, 0.0))?;

    let mut scaled = XformSample::from_ops(vec![XformOp::scale(1.0, 1.0, 1.0)], true);
    assert!(matches!(s.set(&mut scaled), Err(Error::TopologyMismatch { .. })));

    let pivot = XformOp::translate(0.0, 0.0, 0.0).with_hint(TranslateHint::RotatePivotPoint as u8);
    let mut hinted = XformSample::from_ops(vec![pivot], true);
    assert!(matches!(s.set(&mut hinted), Err(Error::TopologyMismatch { .. })));

    let mut empty = XformSample::identity();
    assert!(matches!(s.set(&mut empty), Err(Error::TopologyMismatch { .. })));
    Ok(())
}

#[test]
fn test_topology_mismatch_ignores_values() -> Result<()> {
    let mut s = schema();
    s.set(&mut translate(5.0, 5.0, 5.0))?;
    let mut rot = XformSample::from_ops(vec![XformOp::rotate_x(0.0)], true);
    assert!(s.set(&mut rot).is_err());
    // same kinds, wildly different values: fine
    s.set(&mut translate(-1e9, 1e9, 0.0))?;
    Ok(())
}

#[test]
fn test_set_freezes_caller_sample() -> Result<()> {
    let mut s = schema();
    let mut sample = translate(0.0, 0.0, 0.0);
    s.set(&mut sample)?;
    assert!(sample.is_topology_frozen());

    // reuse the same sample: add_op now updates in place
    sample.set_translation(DVec3::new(3.0, 0.0, 0.0))?;
    s.set(&mut sample)?;
    assert_eq!(sample.num_ops(), 1);
    assert_eq!(child(&s, VALS_PROPERTY).sample_typed::<f64>(1).unwrap(), vec![3.0, 0.0, 0.0]);
    Ok(())
}

#[test]
fn test_set_from_previous_before_set() {
    let mut s = schema();
    let err = s.set_from_previous().unwrap_err();
    assert!(matches!(err, Error::Uninitialized(_)));
    assert_eq!(s.num_samples(), 0);
}

#[test]
fn test_set_from_previous_repeats_everything() -> Result<()> {
    let mut s = schema();
    let mut sample = translate(0.0, 0.0, 0.0);
    sample.set_child_bounds(BBox3d::new(DVec3::splat(-1.0), DVec3::splat(1.0)));
    s.set(&mut sample)?;
    s.set(&mut translate(4.0, 0.0, 0.0))?;

    let before_static = s.static_channels().to_vec();
    s.set_from_previous()?;
    s.set_from_previous()?;

    assert_eq!(s.num_samples(), 4);
    assert_eq!(s.static_channels(), before_static.as_slice());
    assert!(!s.is_identity());

    for name in [
        INHERITS_PROPERTY,
        OPS_PROPERTY,
        VALS_PROPERTY,
        ANIM_CHANNELS_PROPERTY,
        CHILD_BOUNDS_PROPERTY,
    ] {
        assert_eq!(child(&s, name).num_samples(), 4, "{name}");
    }
    let vals = child(&s, VALS_PROPERTY);
    assert_eq!(vals.sample_typed::<f64>(3).unwrap(), vec![4.0, 0.0, 0.0]);
    // repeats are stored by reference
    assert_eq!(vals.samples().unwrap().num_unique(), 2);

    let marker = child(&s, NOT_CONSTANT_IDENTITY_PROPERTY);
    assert_eq!(marker.num_samples(), 3);
    assert!((0..3).all(|i| marker.sample(i) == Some(&[1u8][..])));
    Ok(())
}

#[test]
fn test_marker_is_one_shot() -> Result<()> {
    let mut s = schema();
    s.set(&mut translate(0.0, 0.0, 0.0))?;
    s.set(&mut translate(0.0, 0.0, 0.0))?;
    assert!(!s.compound().has_property(NOT_CONSTANT_IDENTITY_PROPERTY));

    s.set(&mut translate(0.0, 2.0, 0.0))?;
    // back to identity values: the marker stays and keeps saying true
    s.set(&mut translate(0.0, 0.0, 0.0))?;
    s.set(&mut translate(0.0, 0.0, 0.0))?;

    assert!(!s.is_identity());
    let marker = child(&s, NOT_CONSTANT_IDENTITY_PROPERTY);
    assert_eq!(marker.num_samples(), 3);
    assert!((0..3).all(|i| marker.sample(i) == Some(&[1u8][..])));
    let markers = s
        .compound()
        .children()
        .iter()
        .filter(|p| p.name() == NOT_CONSTANT_IDENTITY_PROPERTY)
        .count();
    assert_eq!(markers, 1);
    Ok(())
}

#[test]
fn test_static_flags_never_revert() -> Result<()> {
    let mut s = schema();
    let values = [0.0, 1.0, 0.0, 0.0, 0.0];
    let mut expected_any_moved = false;
    for (n, &x) in values.iter().enumerate() {
        s.set(&mut translate(x, 7.0, 0.0))?;
        expected_any_moved |= x != values[0];
        assert_eq!(s.static_channels()[0], !expected_any_moved, "after sample {n}");
        assert_eq!(anim_chans(&s, n), if expected_any_moved { vec![0] } else { vec![] });
    }
    // y never moved from 7.0, z never moved from 0.0
    assert!(s.static_channels()[1]);
    assert!(s.static_channels()[2]);
    // y sat at 7.0, never at its default
    assert!(!s.is_identity());
    Ok(())
}

#[test]
fn test_anim_chans_ascending_across_ops() -> Result<()> {
    let mut s = schema();
    let ops = |t: f64, r: f64, sc: f64| {
        XformSample::from_ops(
            vec![
                XformOp::translate(t, 0.0, 0.0),
                XformOp::rotate([0.0, 1.0, 0.0], r),
                XformOp::scale(1.0, 1.0, sc),
            ],
            true,
        )
    };
    s.set(&mut ops(0.0, 0.0, 1.0))?;
    s.set(&mut ops(0.0, 0.0, 2.0))?;
    assert_eq!(anim_chans(&s, 1), vec![9]);
    s.set(&mut ops(1.0, 15.0, 2.0))?;
    // translate x = 0, rotate angle = 3 + 3, scale z = 3 + 4 + 2
    assert_eq!(anim_chans(&s, 2), vec![0, 6, 9]);
    assert_eq!(s.num_channels(), 10);
    assert_eq!(child(&s, OPS_PROPERTY).sample(2), Some(&[0x10u8, 0x20, 0x00][..]));
    Ok(())
}

#[test]
fn test_anim_chans_rewritten_every_sample() -> Result<()> {
    let mut s = schema();
    s.set(&mut translate(0.0, 0.0, 0.0))?;
    s.set(&mut translate(1.0, 0.0, 0.0))?;
    s.set(&mut translate(1.0, 0.0, 0.0))?;
    let anim = child(&s, ANIM_CHANNELS_PROPERTY);
    assert_eq!(anim.num_samples(), 3);
    assert_eq!(anim.samples().unwrap().num_unique(), 2);
    // .ops carries a sample per step even though it never changes
    let ops = child(&s, OPS_PROPERTY);
    assert_eq!(ops.num_samples(), 3);
    assert!(ops.is_constant());
    Ok(())
}

#[test]
fn test_tolerance_absorbs_drift() -> Result<()> {
    let mut s = schema();
    s.set(&mut translate(0.0, 0.0, 0.0))?;
    s.set(&mut translate(1e-13, -1e-13, 0.0))?;
    assert!(s.is_identity());
    assert_eq!(s.animated_channels(), Vec::<u32>::new());

    let mut loose = OXformSchema::new(
        OProperty::compound(".xform"),
        XformSchemaConfig::default().with_tolerance(0.5),
    )?;
    loose.set(&mut translate(0.0, 0.0, 0.0))?;
    loose.set(&mut translate(0.4, 0.0, 0.0))?;
    assert!(loose.is_identity());
    loose.set(&mut translate(0.6, 0.0, 0.0))?;
    assert!(!loose.is_identity());
    assert_eq!(loose.animated_channels(), vec![0]);

    let mut strict = OXformSchema::new(
        OProperty::compound(".xform"),
        XformSchemaConfig::default().with_tolerance(0.0),
    )?;
    strict.set(&mut translate(0.0, 0.0, 0.0))?;
    strict.set(&mut translate(1e-13, 0.0, 0.0))?;
    assert!(!strict.is_identity());
    Ok(())
}

#[test]
fn test_invalid_tolerance_rejected() {
    for bad in [-1.0, f64::NAN, f64::INFINITY] {
        let res = OXformSchema::new(
            OProperty::compound(".xform"),
            XformSchemaConfig::default().with_tolerance(bad),
        );
        assert!(matches!(res, Err(Error::InvalidConfig(_))));
    }
}

#[test]
fn test_identity_uses_op_defaults() -> Result<()> {
    let mut s = schema();
    let mut sample = XformSample::from_ops(
        vec![
            XformOp::scale(1.0, 1.0, 1.0),
            XformOp::new(XformOpType::Matrix, 0),
            XformOp::rotate_z(0.0),
        ],
        false,
    );
    s.set(&mut sample)?;
    assert!(s.is_identity());
    assert_eq!(child(&s, INHERITS_PROPERTY).sample(0), Some(&[0u8][..]));

    let mut zero_scale = XformSample::from_ops(
        vec![
            XformOp::scale(0.0, 1.0, 1.0),
            XformOp::new(XformOpType::Matrix, 0),
            XformOp::rotate_z(0.0),
        ],
        false,
    );
    s.set(&mut zero_scale)?;
    assert!(!s.is_identity());
    Ok(())
}

#[test]
fn test_no_ops_sample() -> Result<()> {
    let mut s = schema();
    s.set(&mut XformSample::identity())?;
    s.set(&mut XformSample::identity())?;
    s.set_from_previous()?;

    assert_eq!(s.num_samples(), 3);
    assert_eq!(s.num_ops(), 0);
    assert!(!s.compound().has_property(OPS_PROPERTY));
    assert!(!s.compound().has_property(VALS_PROPERTY));
    assert_eq!(child(&s, INHERITS_PROPERTY).num_samples(), 3);
    assert_eq!(child(&s, ANIM_CHANNELS_PROPERTY).num_samples(), 0);
    assert!(s.is_identity());

    let mut one_op = translate(0.0, 0.0, 0.0);
    assert!(matches!(s.set(&mut one_op), Err(Error::TopologyMismatch { .. })));
    Ok(())
}

#[test]
fn test_child_bounds_only_once_supplied() -> Result<()> {
    let mut s = schema();
    s.set(&mut translate(0.0, 0.0, 0.0))?;
    assert_eq!(child(&s, CHILD_BOUNDS_PROPERTY).num_samples(), 0);

    let bounds = BBox3d::new(DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0));
    let mut with_bounds = translate(0.0, 0.0, 0.0);
    with_bounds.set_child_bounds(bounds);
    s.set(&mut with_bounds)?;
    s.set(&mut translate(0.0, 0.0, 0.0))?;

    let bnds = child(&s, CHILD_BOUNDS_PROPERTY);
    assert_eq!(bnds.num_samples(), 2);
    assert_eq!(bnds.sample_typed::<f64>(1).unwrap(), bounds.to_array().to_vec());
    assert_eq!(bnds.header.meta_data.interpretation(), Some("box"));
    Ok(())
}

#[test]
fn test_time_sampling_indices() -> Result<()> {
    let config = XformSchemaConfig::default()
        .with_time_sampling(2)
        .with_child_bounds_time_sampling(3);
    let mut s = OXformSchema::new(OProperty::compound(".xform"), config)?;
    s.set(&mut translate(1.0, 0.0, 0.0))?;

    for name in [
        INHERITS_PROPERTY,
        OPS_PROPERTY,
        VALS_PROPERTY,
        ANIM_CHANNELS_PROPERTY,
        NOT_CONSTANT_IDENTITY_PROPERTY,
    ] {
        assert_eq!(child(&s, name).header.time_sampling_index, 2, "{name}");
    }
    assert_eq!(child(&s, CHILD_BOUNDS_PROPERTY).header.time_sampling_index, 3);
    assert_eq!(s.time_sampling_index(), 2);
    Ok(())
}

#[test]
fn test_wide_matrix_stack_uses_array_vals() -> Result<()> {
    let mut s = schema();
    let ops: Vec<XformOp> = (0..17).map(|_| XformOp::new(XformOpType::Matrix, 0)).collect();
    let mut sample = XformSample::from_ops(ops, true);
    s.set(&mut sample)?;
    assert_eq!(s.num_channels(), 272);

    let vals = child(&s, VALS_PROPERTY);
    assert!(vals.header.is_array());
    assert_eq!(vals.sample_typed::<f64>(0).unwrap().len(), 272);
    let ops = child(&s, OPS_PROPERTY);
    assert!(ops.header.is_scalar());
    assert_eq!(ops.header.data_type.extent, 17);

    s.set_from_previous()?;
    assert_eq!(child(&s, VALS_PROPERTY).num_samples(), 2);
    Ok(())
}

#[test]
fn test_oxform_build() -> Result<()> {
    let mut xform = OXform::new("spinner")?;
    let mut sample = XformSample::default();
    sample.set_y_rotation(0.0)?;
    xform.set(&mut sample)?;
    sample.set_y_rotation(90.0)?;
    xform.set(&mut sample)?;
    xform.add_child(OObject::new("geo"));

    let obj = xform.build();
    assert_eq!(obj.meta_data.schema(), Some("AbcGeom_Xform_v3"));
    assert_eq!(obj.meta_data.get("schemaObjTitle"), Some("AbcGeom_Xform_v3:.xform"));
    assert!(obj.child("geo").is_some());

    let compound = obj.property(".xform").unwrap();
    assert!(compound.header.meta_data.matches_schema("AbcGeom_Xform_v3"));
    let vals = compound.child(VALS_PROPERTY).unwrap();
    assert_eq!(vals.sample_typed::<f64>(1).unwrap(), vec![90.0]);
    Ok(())
}
