//! The control layer: one flat namespace of named parameters.

use crate::animation::keyframes::Keyframes;
use crate::config::Profile;
use crate::expression::context::{ControlParameters, ControlValue};
use crate::foundation::error::{AnatomyError, AnatomyResult};

/// Parameter names as they appear on the control layer.
pub mod names {
    pub const SHOW_ANCHORS: &str = "Show Anchors";
    pub const SHOW_HANDLES: &str = "Show Handles";
    pub const SHOW_OUTLINES: &str = "Show Outlines";
    pub const SHOW_GRID: &str = "Show Grid";
    pub const SHOW_LABELS: &str = "Show Labels";

    pub const ANCHOR_SIZE: &str = "Anchor Size";
    pub const HANDLE_SIZE: &str = "Handle Size";
    pub const ANCHOR_ROUNDNESS: &str = "Anchor Roundness";
    pub const HANDLE_ROUNDNESS: &str = "Handle Roundness";
    pub const OUTLINE_WIDTH: &str = "Outline Width";
    pub const LABEL_SIZE: &str = "Label Size";
    pub const LABEL_SCALE: &str = "Label Scale";

    pub const ANCHOR_COLOR: &str = "Anchor Color";
    pub const HANDLE_COLOR: &str = "Handle Color";
    pub const OUTLINE_COLOR: &str = "Outline Color";
    pub const GRID_COLOR: &str = "Grid Color";
    pub const LABEL_COLOR: &str = "Label Color";

    pub const GRID_OPACITY: &str = "Grid Opacity";
    pub const GLOBAL_OPACITY: &str = "Global Opacity";

    pub const TIMELINE: &str = "Timeline";
    pub const STAGGER: &str = "Stagger";
    pub const EASING: &str = "Easing";

    pub const GRID_DRAW: &str = "Grid Draw";
    pub const OUTLINE_DRAW: &str = "Outline Draw";
    pub const ANCHOR_POP: &str = "Anchor Pop";
    pub const HANDLE_POP: &str = "Handle Pop";
    pub const LABEL_POP: &str = "Label Pop";

    pub const CIRCUMCIRCLE_OPACITY: &str = "Circumcircle Opacity";
    pub const TANGENT_LENGTH: &str = "Tangent Length";
    pub const CONTOUR_COUNT: &str = "Contour Count";
    pub const CONTOUR_SPACING: &str = "Contour Spacing";
    pub const BISECTOR_LENGTH: &str = "Bisector Length";
    pub const GRID_ELEMENTS_OPACITY: &str = "Grid Elements Opacity";

    pub const ANCHORS_OFFSET: &str = "Anchors Offset";
    pub const HANDLES_OFFSET: &str = "Handles Offset";
    pub const OUTLINES_OFFSET: &str = "Outlines Offset";
    pub const LABELS_OFFSET: &str = "Labels Offset";
    pub const GRID_OFFSET: &str = "Grid Offset";

    /// Per-category reveal overrides; 100 defers to the timeline.
    pub const OVERRIDES: [&str; 5] = [GRID_DRAW, OUTLINE_DRAW, ANCHOR_POP, HANDLE_POP, LABEL_POP];
}

use names::*;

/// One named parameter with its static value and optional animation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlParam {
    pub name: String,
    pub value: ControlValue,
    #[serde(default, skip_serializing_if = "Keyframes::is_empty")]
    pub keyframes: Keyframes,
}

impl ControlParam {
    pub fn new(name: impl Into<String>, value: ControlValue) -> Self {
        Self {
            name: name.into(),
            value,
            keyframes: Keyframes::default(),
        }
    }

    /// Value at `time`; keyframes only drive scalar parameters.
    pub fn value_at(&self, time: f64) -> ControlValue {
        match (self.value, self.keyframes.sample(time)) {
            (ControlValue::Scalar(_), Some(v)) => ControlValue::Scalar(v),
            (v, _) => v,
        }
    }
}

const WHITE: ControlValue = ControlValue::Color([1.0, 1.0, 1.0, 1.0]);

/// The generated control layer's parameter list.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlLayer {
    pub params: Vec<ControlParam>,
}

impl ControlLayer {
    /// Parameters with their initial values for `profile`, in control-layer order.
    pub fn with_defaults(profile: Profile) -> Self {
        let mut params = Vec::new();
        let mut push = |name: &str, value: ControlValue| params.push(ControlParam::new(name, value));

        for name in [SHOW_ANCHORS, SHOW_HANDLES, SHOW_OUTLINES, SHOW_GRID, SHOW_LABELS] {
            push(name, ControlValue::Checkbox(true));
        }
        for (name, v) in [
            (ANCHOR_SIZE, 12.0),
            (HANDLE_SIZE, 8.0),
            (ANCHOR_ROUNDNESS, 0.0),
            (HANDLE_ROUNDNESS, 0.0),
            (OUTLINE_WIDTH, 3.0),
            (LABEL_SIZE, 11.0),
            (LABEL_SCALE, 100.0),
        ] {
            push(name, ControlValue::Scalar(v));
        }
        for name in [ANCHOR_COLOR, HANDLE_COLOR, OUTLINE_COLOR, GRID_COLOR, LABEL_COLOR] {
            push(name, WHITE);
        }
        let grid_opacity = match profile {
            Profile::Minimal => 40.0,
            Profile::Extended => 8.0,
        };
        push(GRID_OPACITY, ControlValue::Scalar(grid_opacity));
        push(GLOBAL_OPACITY, ControlValue::Scalar(100.0));
        push(TIMELINE, ControlValue::Scalar(100.0));
        push(STAGGER, ControlValue::Scalar(0.0));
        push(EASING, ControlValue::Scalar(50.0));
        for name in OVERRIDES {
            push(name, ControlValue::Scalar(100.0));
        }
        if profile.has_constructions() {
            for (name, v) in [
                (CIRCUMCIRCLE_OPACITY, 30.0),
                (TANGENT_LENGTH, 200.0),
                (CONTOUR_COUNT, 3.0),
                (CONTOUR_SPACING, 8.0),
                (BISECTOR_LENGTH, 120.0),
                (GRID_ELEMENTS_OPACITY, 100.0),
            ] {
                push(name, ControlValue::Scalar(v));
            }
        }
        for name in [
            ANCHORS_OFFSET,
            HANDLES_OFFSET,
            OUTLINES_OFFSET,
            LABELS_OFFSET,
            GRID_OFFSET,
        ] {
            push(name, ControlValue::Point([0.0, 0.0]));
        }
        Self { params }
    }

    pub fn param(&self, name: &str) -> Option<&ControlParam> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn param_mut(&mut self, name: &str) -> AnatomyResult<&mut ControlParam> {
        self.params
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| AnatomyError::user_input(format!("control '{name}' not found")))
    }

    /// Replace a scalar parameter's static value.
    pub fn set_scalar(&mut self, name: &str, value: f64) -> AnatomyResult<()> {
        let p = self.param_mut(name)?;
        match p.value {
            ControlValue::Scalar(_) => {
                p.value = ControlValue::Scalar(value);
                Ok(())
            }
            other => Err(AnatomyError::user_input(format!(
                "control '{name}' is not a slider ({other:?})"
            ))),
        }
    }

    pub fn value_at(&self, name: &str, time: f64) -> Option<ControlValue> {
        self.param(name).map(|p| p.value_at(time))
    }

    /// Read-only view sampled at `time`.
    pub fn at(&self, time: f64) -> TimedControls<'_> {
        TimedControls { layer: self, time }
    }
}

/// Control values as seen by formulas at one composition time.
#[derive(Clone, Copy, Debug)]
pub struct TimedControls<'a> {
    layer: &'a ControlLayer,
    time: f64,
}

impl ControlParameters for TimedControls<'_> {
    fn get(&self, name: &str) -> Option<ControlValue> {
        self.layer.value_at(name, self.time)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/control.rs"]
mod tests;
