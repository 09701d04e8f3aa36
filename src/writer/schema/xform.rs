//! Xform schema writer.
//!
//! [`OXformSchema`] turns a stream of [`XformSample`]s into the time-sampled
//! children of one `.xform` compound:
//!
//! | property                | type            | written                              |
//! |-------------------------|-----------------|--------------------------------------|
//! | `.inherits`             | bool            | every sample                         |
//! | `.ops`                  | uint8[numOps]   | every sample, constant after first   |
//! | `.vals`                 | float64[numChans] | every sample                       |
//! | `.animChans`            | uint32[]        | every sample                         |
//! | `.childBnds`            | box3d           | once bounds are supplied             |
//! | `isNotConstantIdentity` | bool            | from the first non-identity sample   |
//!
//! The op stack of the first sample is frozen; later samples must match it.
//! Channel constancy and identity are tracked monotonically: once a channel
//! has moved, or the transform has left identity, that is never undone.

use tracing::{debug, trace};

use crate::core::{CompoundPropertyWriter, MetaData, PropertyId};
use crate::geom::{OpEncodings, XformSample, XFORM_SCHEMA};
use crate::util::{equal_with_abs_error, Error, Result};

use super::super::object::OObject;
use super::super::property::OProperty;
use super::super::typed::{OTypedProperty, SlotValue};

/// Default absolute tolerance for channel comparisons.
pub const XFORM_DELTA_TOLERANCE: f64 = 1.0e-12;

pub const OPS_PROPERTY: &str = ".ops";
pub const VALS_PROPERTY: &str = ".vals";
pub const INHERITS_PROPERTY: &str = ".inherits";
pub const CHILD_BOUNDS_PROPERTY: &str = ".childBnds";
pub const ANIM_CHANNELS_PROPERTY: &str = ".animChans";
pub const NOT_CONSTANT_IDENTITY_PROPERTY: &str = "isNotConstantIdentity";

/// Construction-time settings of an Xform schema.
#[derive(Clone, Debug, PartialEq)]
pub struct XformSchemaConfig {
    /// Time sampling of every animated property.
    pub time_sampling_index: u32,
    /// Time sampling of `.childBnds`; defaults to `time_sampling_index`.
    pub child_bounds_time_sampling_index: Option<u32>,
    /// Absolute tolerance used for constancy and identity checks.
    pub tolerance: f64,
}

impl Default for XformSchemaConfig {
    fn default() -> Self {
        Self {
            time_sampling_index: 0,
            child_bounds_time_sampling_index: None,
            tolerance: XFORM_DELTA_TOLERANCE,
        }
    }
}

impl XformSchemaConfig {
    pub fn with_time_sampling(mut self, index: u32) -> Self {
        self.time_sampling_index = index;
        self
    }

    pub fn with_child_bounds_time_sampling(mut self, index: u32) -> Self {
        self.child_bounds_time_sampling_index = Some(index);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Reject tolerances that would make every comparison meaningless.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    fn child_bounds_ts(&self) -> u32 {
        self.child_bounds_time_sampling_index
            .unwrap_or(self.time_sampling_index)
    }
}

/// Shape and values of the first committed sample.
#[derive(Clone, Debug)]
struct Prototype {
    encodings: OpEncodings,
    values: Vec<f64>,
}

/// Xform schema writer over any compound property store.
pub struct OXformSchema<C: CompoundPropertyWriter = OProperty> {
    compound: C,
    config: XformSchemaConfig,

    inherits: OTypedProperty,
    child_bounds: OTypedProperty,
    anim_channels: OTypedProperty,
    ops: Option<OTypedProperty>,
    vals: Option<OTypedProperty>,
    not_constant_identity: Option<OTypedProperty>,

    proto: Option<Prototype>,
    static_chans: Vec<bool>,
    is_identity: bool,
    num_samples: usize,
}

impl<C: CompoundPropertyWriter> OXformSchema<C> {
    /// Initialise the schema inside `compound`.
    ///
    /// Creates `.childBnds`, `.inherits` and `.animChans` without samples.
    /// `.ops` and `.vals` are sized by the first sample.
    pub fn new(mut compound: C, config: XformSchemaConfig) -> Result<Self> {
        config.validate()?;
        let ts = config.time_sampling_index;

        let child_bounds = OTypedProperty::create_box3d(
            &mut compound,
            CHILD_BOUNDS_PROPERTY,
            config.child_bounds_ts(),
        )?;
        let inherits = OTypedProperty::create_bool(&mut compound, INHERITS_PROPERTY, ts)?;
        let anim_channels =
            OTypedProperty::create_uint32_array(&mut compound, ANIM_CHANNELS_PROPERTY, ts)?;

        debug!(ts, tolerance = config.tolerance, "xform schema initialised");

        Ok(Self {
            compound,
            config,
            inherits,
            child_bounds,
            anim_channels,
            ops: None,
            vals: None,
            not_constant_identity: None,
            proto: None,
            static_chans: Vec::new(),
            is_identity: true,
            num_samples: 0,
        })
    }

    /// Commit one sample.
    ///
    /// The first call freezes the sample's topology. Later calls fail with
    /// [`Error::TopologyMismatch`] before anything is written if the op
    /// stack differs.
    pub fn set(&mut self, sample: &mut XformSample) -> Result<()> {
        if let Some(proto) = &self.proto {
            check_topology(proto, sample)?;
        } else {
            self.freeze_prototype(sample)?;
        }

        let bounds = sample.child_bounds();
        if bounds.has_volume() {
            self.child_bounds.set(&mut self.compound, SlotValue::Box3d(&bounds))?;
        } else if self.child_bounds.num_samples(&self.compound)? > 0 {
            // keep .childBnds aligned with its siblings once it exists
            self.child_bounds.set_from_previous(&mut self.compound)?;
        }

        self.inherits.set(&mut self.compound, SlotValue::Bool(sample.inherits_xforms()))?;

        let (Some(ops), Some(proto)) = (self.ops, self.proto.as_ref()) else {
            self.num_samples += 1;
            trace!(sample = self.num_samples, "xform sample without ops");
            return Ok(());
        };

        let tolerance = self.config.tolerance;
        let mut chanvals = Vec::with_capacity(proto.values.len());
        for op in sample.ops() {
            for (j, &value) in op.values().iter().enumerate() {
                let i = chanvals.len();
                self.static_chans[i] =
                    self.static_chans[i] && equal_with_abs_error(value, proto.values[i], tolerance);
                let default = op.default_channel_value(j);
                self.is_identity =
                    self.is_identity && equal_with_abs_error(value, default, tolerance);
                chanvals.push(value);
            }
        }

        let anim_chans = self.animated_channels();
        self.anim_channels.set(&mut self.compound, SlotValue::Uint32s(&anim_chans))?;

        if let Some(vals) = self.vals {
            vals.set(&mut self.compound, SlotValue::Doubles(&chanvals))?;
        }
        ops.set(&mut self.compound, SlotValue::Bytes(&proto.encodings))?;

        match self.not_constant_identity {
            Some(marker) => marker.set(&mut self.compound, SlotValue::Bool(true))?,
            None if !self.is_identity => {
                let marker = OTypedProperty::create_bool(
                    &mut self.compound,
                    NOT_CONSTANT_IDENTITY_PROPERTY,
                    self.config.time_sampling_index,
                )?;
                marker.set(&mut self.compound, SlotValue::Bool(true))?;
                self.not_constant_identity = Some(marker);
                debug!(sample = self.num_samples, "xform left identity");
            }
            None => {}
        }

        self.num_samples += 1;
        trace!(
            sample = self.num_samples,
            animated = anim_chans.len(),
            identity = self.is_identity,
            "xform sample committed"
        );
        Ok(())
    }

    /// Repeat the last committed sample on every existing property.
    ///
    /// Tracking state is untouched since no new values were observed.
    pub fn set_from_previous(&mut self) -> Result<()> {
        if self.num_samples == 0 {
            return Err(Error::uninitialized(
                "set_from_previous called before any sample was set",
            ));
        }

        self.inherits.set_from_previous(&mut self.compound)?;
        if let Some(ops) = self.ops {
            ops.set_from_previous(&mut self.compound)?;
        }
        if let Some(vals) = self.vals {
            vals.set_from_previous(&mut self.compound)?;
        }
        if self.anim_channels.num_samples(&self.compound)? > 0 {
            self.anim_channels.set_from_previous(&mut self.compound)?;
        }
        if self.child_bounds.num_samples(&self.compound)? > 0 {
            self.child_bounds.set_from_previous(&mut self.compound)?;
        }
        if let Some(marker) = self.not_constant_identity {
            marker.set_from_previous(&mut self.compound)?;
        }

        self.num_samples += 1;
        trace!(sample = self.num_samples, "xform sample repeated");
        Ok(())
    }

    fn freeze_prototype(&mut self, sample: &mut XformSample) -> Result<()> {
        sample.freeze_topology();

        let encodings = sample.op_encodings();
        let values: Vec<f64> = sample
            .ops()
            .iter()
            .flat_map(|op| op.values().iter().copied())
            .collect();
        let ts = self.config.time_sampling_index;

        if !encodings.is_empty() {
            self.ops = Some(OTypedProperty::create_bytes(
                &mut self.compound,
                OPS_PROPERTY,
                ts,
                encodings.len(),
            )?);
        }
        if !values.is_empty() {
            self.vals = Some(OTypedProperty::create_doubles(
                &mut self.compound,
                VALS_PROPERTY,
                ts,
                values.len(),
            )?);
        }

        debug!(
            ops = encodings.len(),
            channels = values.len(),
            "xform topology frozen"
        );

        self.static_chans = vec![true; values.len()];
        self.proto = Some(Prototype {
            encodings,
            values,
        });
        Ok(())
    }

    /// Ascending indices of channels that have moved so far.
    pub fn animated_channels(&self) -> Vec<u32> {
        self.static_chans
            .iter()
            .enumerate()
            .filter(|&(_, &is_static)| !is_static)
            .map(|(i, _)| i as u32)
            .collect()
    }

    /// Per-channel constancy flags.
    pub fn static_channels(&self) -> &[bool] {
        &self.static_chans
    }

    /// True while every channel of every sample sat at its default.
    pub fn is_identity(&self) -> bool {
        self.is_identity
    }

    /// True once `isNotConstantIdentity` has been created.
    pub fn has_not_constant_identity(&self) -> bool {
        self.not_constant_identity.is_some()
    }

    /// Samples committed so far, repeats included.
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Frozen op count (0 before the first sample).
    pub fn num_ops(&self) -> usize {
        self.proto.as_ref().map_or(0, |p| p.encodings.len())
    }

    /// Frozen channel count (0 before the first sample).
    pub fn num_channels(&self) -> usize {
        self.static_chans.len()
    }

    /// Frozen op encodings, once the first sample is in.
    pub fn op_encodings(&self) -> Option<&[u8]> {
        self.proto.as_ref().map(|p| p.encodings.as_slice())
    }

    pub fn config(&self) -> &XformSchemaConfig {
        &self.config
    }

    pub fn tolerance(&self) -> f64 {
        self.config.tolerance
    }

    pub fn time_sampling_index(&self) -> u32 {
        self.config.time_sampling_index
    }

    /// Handle of a schema property inside the compound, if created.
    pub fn property_id(&self, name: &str) -> Option<PropertyId> {
        self.compound.property_id(name)
    }

    /// The compound being written.
    pub fn compound(&self) -> &C {
        &self.compound
    }

    /// Finish writing and hand the compound back.
    pub fn into_inner(self) -> C {
        self.compound
    }
}

/// Channel counts follow from the op kinds, so the encodings are enough.
fn check_topology(proto: &Prototype, sample: &XformSample) -> Result<()> {
    let encodings = sample.op_encodings();
    if encodings != proto.encodings {
        return Err(Error::topology(
            format!("ops {:02x?}", proto.encodings.as_slice()),
            format!("ops {:02x?}", encodings.as_slice()),
        ));
    }
    Ok(())
}

/// Xform object writer: an object named `name` holding one `.xform` schema.
pub struct OXform {
    name: String,
    schema: OXformSchema<OProperty>,
    children: Vec<OObject>,
}

impl OXform {
    /// Create new Xform with default settings.
    pub fn new(name: &str) -> Result<Self> {
        Self::with_config(name, XformSchemaConfig::default())
    }

    /// Create new Xform.
    pub fn with_config(name: &str, config: XformSchemaConfig) -> Result<Self> {
        let compound = OProperty::compound(".xform")
            .with_meta_data(MetaData::new().with(MetaData::SCHEMA_KEY, XFORM_SCHEMA));
        Ok(Self {
            name: name.to_string(),
            schema: OXformSchema::new(compound, config)?,
            children: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &OXformSchema<OProperty> {
        &self.schema
    }

    pub fn schema_mut(&mut self) -> &mut OXformSchema<OProperty> {
        &mut self.schema
    }

    /// Commit one sample.
    pub fn set(&mut self, sample: &mut XformSample) -> Result<()> {
        self.schema.set(sample)
    }

    /// Repeat the last sample.
    pub fn set_from_previous(&mut self) -> Result<()> {
        self.schema.set_from_previous()
    }

    /// Add child object.
    pub fn add_child(&mut self, child: OObject) {
        self.children.push(child);
    }

    /// Build the object.
    pub fn build(self) -> OObject {
        let meta = MetaData::new()
            .with(MetaData::SCHEMA_KEY, XFORM_SCHEMA)
            .with(MetaData::SCHEMA_OBJ_TITLE_KEY, format!("{XFORM_SCHEMA}:.xform"));
        let mut object = OObject::new(&self.name).with_meta_data(meta);
        object.properties.push(self.schema.into_inner());
        object.children = self.children;
        object
    }
}
