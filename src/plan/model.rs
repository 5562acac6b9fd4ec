//! The generated scene: layers, elements and the bindings on their properties.

use std::collections::BTreeMap;

use crate::choreography::{Category, RevealKind, StaggerSlot};
use crate::expression::context::EvalContext;
use crate::expression::eval::Value;
use crate::expression::formula::Formula;
use crate::foundation::error::AnatomyResult;
use crate::plan::identity::ElementId;
use crate::scene::control::ControlLayer;

/// What drives one property: a fixed value or a live formula.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "binding", rename_all = "snake_case")]
pub enum Binding {
    Static { value: Value },
    Formula { formula: Formula },
}

impl Binding {
    pub fn scalar(v: f64) -> Self {
        Self::Static {
            value: Value::Scalar(v),
        }
    }

    pub fn vector(x: f64, y: f64) -> Self {
        Self::Static {
            value: Value::Vector([x, y]),
        }
    }

    pub fn formula(formula: Formula) -> Self {
        Self::Formula { formula }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, Self::Formula { .. })
    }

    pub fn as_formula(&self) -> Option<&Formula> {
        match self {
            Self::Formula { formula } => Some(formula),
            Self::Static { .. } => None,
        }
    }

    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> AnatomyResult<Value> {
        match self {
            Self::Static { value } => Ok(value.clone()),
            Self::Formula { formula } => formula.evaluate(ctx),
        }
    }
}

/// Addressable property of an element.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Group (or text layer) position.
    Position,
    /// Group (or text layer) scale, percent per axis.
    Scale,
    /// Group opacity, percent.
    Opacity,
    /// Path geometry.
    Path,
    /// Rect or ellipse size.
    Size,
    Roundness,
    /// Trim-path end, percent.
    TrimEnd,
    /// Offset-path amount.
    Offset,
    /// Source text.
    Text,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Position => "position",
            Self::Scale => "scale",
            Self::Opacity => "opacity",
            Self::Path => "path",
            Self::Size => "size",
            Self::Roundness => "roundness",
            Self::TrimEnd => "trim_end",
            Self::Offset => "offset",
            Self::Text => "text",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "position" => Self::Position,
            "scale" => Self::Scale,
            "opacity" => Self::Opacity,
            "path" => Self::Path,
            "size" => Self::Size,
            "roundness" => Self::Roundness,
            "trim_end" => Self::TrimEnd,
            "offset" => Self::Offset,
            "text" => Self::Text,
            other => return Err(format!("unknown slot '{other}'")),
        })
    }
}

/// Colour source for fills and strokes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "paint", rename_all = "snake_case")]
pub enum Paint {
    /// Read a colour control live.
    Control { name: String },
    /// RGBA in `0..=1`.
    Constant { rgba: [f64; 4] },
}

impl Paint {
    pub fn control(name: &str) -> Self {
        Self::Control {
            name: name.to_string(),
        }
    }

    pub const WHITE: Self = Self::Constant {
        rgba: [1.0, 1.0, 1.0, 1.0],
    };
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stroke {
    pub paint: Paint,
    pub width: Binding,
    /// Dash then gap length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<[f64; 2]>,
}

impl Stroke {
    pub fn solid(paint: Paint, width: f64) -> Self {
        Self {
            paint,
            width: Binding::scalar(width),
            dash: None,
        }
    }

    pub fn dashed(paint: Paint, width: f64, dash: f64, gap: f64) -> Self {
        Self {
            paint,
            width: Binding::scalar(width),
            dash: Some([dash, gap]),
        }
    }
}

/// Offset-path join style; only miter is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    Miter,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Paint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_join: Option<LineJoin>,
}

/// Host primitive an element is drawn with.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ElementKind {
    Rect,
    Ellipse,
    Path,
    Text { font: String, font_size: f64 },
}

/// Where an element sits in its category's reveal.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Reveal {
    pub category: Category,
    pub slot: StaggerSlot,
    pub kind: RevealKind,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub bindings: BTreeMap<Slot, Binding>,
    #[serde(default)]
    pub style: Style,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reveal: Option<Reveal>,
}

impl Element {
    pub fn new(id: ElementId, kind: ElementKind) -> Self {
        Self {
            id,
            kind,
            bindings: BTreeMap::new(),
            style: Style::default(),
            reveal: None,
        }
    }

    pub fn name(&self) -> String {
        self.id.name()
    }

    pub fn bind(mut self, slot: Slot, binding: Binding) -> Self {
        self.bindings.insert(slot, binding);
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn binding(&self, slot: Slot) -> Option<&Binding> {
        self.bindings.get(&slot)
    }

    /// Bind the reveal formula to `target` and remember the reveal slot.
    pub fn revealed(mut self, target: Slot, reveal: Reveal) -> Self {
        let formula = crate::choreography::reveal_formula(reveal.category, reveal.slot, reveal.kind);
        self.bindings.insert(target, Binding::formula(formula));
        self.reveal = Some(reveal);
        self
    }
}

/// Which generated layer this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerRole {
    Grid,
    Circumcircles,
    Tangents,
    Triangulation,
    Contours,
    Bisectors,
    Outlines,
    Handles,
    HandleLines,
    Anchors,
    Label,
}

/// Generated shape or text layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeneratedLayer {
    pub name: String,
    pub role: LayerRole,
    pub opacity: Binding,
    pub position: Binding,
    pub elements: Vec<Element>,
}

impl GeneratedLayer {
    pub fn new(name: impl Into<String>, role: LayerRole, opacity: Binding) -> Self {
        Self {
            name: name.into(),
            role,
            opacity,
            position: Binding::vector(0.0, 0.0),
            elements: Vec::new(),
        }
    }

    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name() == name)
    }

    pub fn element_by_id(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_by_id_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }
}

/// Everything one build emits, in stacking order (first is bottom-most).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenePlan {
    pub controls: ControlLayer,
    pub layers: Vec<GeneratedLayer>,
}

impl ScenePlan {
    pub fn layer(&self, name: &str) -> Option<&GeneratedLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn layer_names(&self) -> Vec<String> {
        self.layers.iter().map(|l| l.name.clone()).collect()
    }

    pub fn element_count(&self) -> usize {
        self.layers.iter().map(|l| l.elements.len()).sum()
    }
}
