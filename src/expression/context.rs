use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::expression::address::{FrameAddr, PathAddr};
use crate::foundation::core::{AffineFrame, PathShape};

/// Current value of one named control parameter.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ControlValue {
    Scalar(f64),
    Point([f64; 2]),
    /// RGBA in `0..=1`.
    Color([f64; 4]),
    Checkbox(bool),
}

impl ControlValue {
    /// Scalar view; checkboxes read as `1`/`0` like the host does.
    pub fn scalar(self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Checkbox(b) => Some(if b { 1.0 } else { 0.0 }),
            Self::Point(_) | Self::Color(_) => None,
        }
    }

    pub fn component(self, i: usize) -> Option<f64> {
        match self {
            Self::Point(p) => p.get(i).copied(),
            Self::Color(c) => c.get(i).copied(),
            Self::Scalar(_) | Self::Checkbox(_) => None,
        }
    }
}

/// Read access to the live control store.
pub trait ControlParameters {
    fn get(&self, name: &str) -> Option<ControlValue>;
}

impl ControlParameters for BTreeMap<String, ControlValue> {
    fn get(&self, name: &str) -> Option<ControlValue> {
        BTreeMap::get(self, name).copied()
    }
}

/// Read access to live path data and transform frames.
pub trait SourceGeometry {
    fn path(&self, addr: &PathAddr) -> Option<Cow<'_, PathShape>>;
    fn frame(&self, addr: &FrameAddr) -> Option<AffineFrame>;
}

/// Geometry source with nothing in it, for formulas that only read controls.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoGeometry;

impl SourceGeometry for NoGeometry {
    fn path(&self, _addr: &PathAddr) -> Option<Cow<'_, PathShape>> {
        None
    }

    fn frame(&self, _addr: &FrameAddr) -> Option<AffineFrame> {
        None
    }
}

/// Everything a formula may read during one evaluation.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    pub controls: &'a dyn ControlParameters,
    pub geometry: &'a dyn SourceGeometry,
}

impl<'a> EvalContext<'a> {
    pub fn new(controls: &'a dyn ControlParameters, geometry: &'a dyn SourceGeometry) -> Self {
        Self { controls, geometry }
    }
}
