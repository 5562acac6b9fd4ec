//! The host document as the core sees it: an ordered layer stack plus the current time.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::expression::address::{FrameAddr, PathAddr};
use crate::expression::context::{EvalContext, SourceGeometry};
use crate::expression::eval::Value;
use crate::foundation::core::{AffineFrame, PathShape};
use crate::foundation::error::{AnatomyError, AnatomyResult};
use crate::geometry::contour::offset_polygon;
use crate::plan::identity::{self, ElementId};
use crate::plan::model::{Binding, Element, GeneratedLayer, Slot};
use crate::scene::control::ControlLayer;
use crate::source::model::{Content, SourceLayer, ensure_unique_names};

/// One entry of the layer stack.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    Source(SourceLayer),
    /// The generated control layer; always named [`identity::CONTROL_LAYER`].
    Control(ControlLayer),
    Generated(GeneratedLayer),
    /// A nested composition holding its own stack.
    Precomp { name: String, layers: Vec<Layer> },
}

impl Layer {
    pub fn name(&self) -> &str {
        match self {
            Self::Source(l) => &l.name,
            Self::Control(_) => identity::CONTROL_LAYER,
            Self::Generated(l) => &l.name,
            Self::Precomp { name, .. } => name,
        }
    }

    pub fn is_generated(&self) -> bool {
        identity::is_generated_layer(self.name())
    }
}

/// Layer stack in stacking order (first is bottom-most) and the composition time in seconds.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Document {
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl Document {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { time: 0.0, layers }
    }

    pub fn from_reader<R: std::io::Read>(r: R) -> AnatomyResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| AnatomyError::serde(format!("parse document JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> AnatomyResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .map_err(|e| AnatomyError::serde(format!("open document '{}': {e}", path.display())))?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_writer<W: Write>(&self, w: W) -> AnatomyResult<()> {
        serde_json::to_writer_pretty(w, self)
            .map_err(|e| AnatomyError::serde(format!("write document JSON: {e}")))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> AnatomyResult<()> {
        let path = path.as_ref();
        let f = File::create(path).map_err(|e| {
            AnatomyError::serde(format!("create document '{}': {e}", path.display()))
        })?;
        let mut w = BufWriter::new(f);
        self.to_writer(&mut w)?;
        w.flush()
            .map_err(|e| AnatomyError::serde(format!("flush document '{}': {e}", path.display())))
    }

    pub fn validate(&self) -> AnatomyResult<()> {
        if !self.time.is_finite() {
            return Err(AnatomyError::validation("document time must be finite"));
        }
        validate_stack(&self.layers, "document")
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    pub fn source_layer(&self, name: &str) -> Option<&SourceLayer> {
        self.layers.iter().find_map(|l| match l {
            Layer::Source(s) if s.name == name => Some(s),
            _ => None,
        })
    }

    /// The control layer of the live overlay.
    pub fn control_layer(&self) -> Option<&ControlLayer> {
        self.overlay().iter().find_map(|l| match l {
            Layer::Control(c) => Some(c),
            _ => None,
        })
    }

    pub fn control_layer_mut(&mut self) -> Option<&mut ControlLayer> {
        self.overlay_mut()?.iter_mut().find_map(|l| match l {
            Layer::Control(c) => Some(c),
            _ => None,
        })
    }

    /// Generated layer `name` of the live overlay.
    pub fn generated(&self, name: &str) -> Option<&GeneratedLayer> {
        self.overlay().iter().find_map(|l| match l {
            Layer::Generated(g) if g.name == name => Some(g),
            _ => None,
        })
    }

    pub fn generated_mut(&mut self, name: &str) -> Option<&mut GeneratedLayer> {
        self.overlay_mut()?.iter_mut().find_map(|l| match l {
            Layer::Generated(g) if g.name == name => Some(g),
            _ => None,
        })
    }

    /// Every generated layer of the live overlay, in stacking order.
    pub fn generated_layers(&self) -> Vec<&GeneratedLayer> {
        self.overlay()
            .iter()
            .filter_map(|l| match l {
                Layer::Generated(g) => Some(g),
                _ => None,
            })
            .collect()
    }

    pub fn generated_layers_mut(&mut self) -> Vec<&mut GeneratedLayer> {
        let Some(stack) = self.overlay_mut() else {
            return Vec::new();
        };
        stack
            .iter_mut()
            .filter_map(|l| match l {
                Layer::Generated(g) => Some(g),
                _ => None,
            })
            .collect()
    }

    /// Stack holding the live overlay.
    ///
    /// That is the top level when it has a control layer, otherwise the shallowest precomp that
    /// does. Overlays left inside a precomp by an earlier build are ignored once a newer build
    /// sits at the top level.
    fn overlay(&self) -> &[Layer] {
        match overlay_path(&self.layers) {
            Some(path) => stack_at(&self.layers, &path).unwrap_or(&self.layers),
            None => &self.layers,
        }
    }

    fn overlay_mut(&mut self) -> Option<&mut Vec<Layer>> {
        let path = overlay_path(&self.layers).unwrap_or_default();
        stack_at_mut(&mut self.layers, &path)
    }

    /// Drop every top-level `PP_` layer; returns how many went.
    pub fn remove_generated(&mut self) -> usize {
        let before = self.layers.len();
        self.layers.retain(|l| !l.is_generated());
        before - self.layers.len()
    }

    /// Evaluate one element binding at the document time.
    ///
    /// Contour paths come back already offset by the element's offset amount.
    pub fn evaluate(&self, layer: &str, element: &str, slot: Slot) -> AnatomyResult<Value> {
        let g = self
            .generated(layer)
            .ok_or_else(|| AnatomyError::evaluation(format!("no generated layer '{layer}'")))?;
        let e = g.element(element).ok_or_else(|| {
            AnatomyError::evaluation(format!("no element '{element}' in layer '{layer}'"))
        })?;
        self.evaluate_element(e, slot)
    }

    /// Evaluate a layer-level binding (opacity or position).
    pub fn evaluate_layer(&self, layer: &str, slot: Slot) -> AnatomyResult<Value> {
        let g = self
            .generated(layer)
            .ok_or_else(|| AnatomyError::evaluation(format!("no generated layer '{layer}'")))?;
        let binding = match slot {
            Slot::Opacity => &g.opacity,
            Slot::Position => &g.position,
            other => {
                return Err(AnatomyError::evaluation(format!(
                    "layers have no '{other}' property"
                )));
            }
        };
        self.with_context(|ctx| binding.evaluate(ctx))
    }

    pub(crate) fn evaluate_element(&self, e: &Element, slot: Slot) -> AnatomyResult<Value> {
        let binding = e.binding(slot).ok_or_else(|| {
            AnatomyError::evaluation(format!("element '{}' has no '{slot}' property", e.name()))
        })?;
        self.with_context(|ctx| {
            let value = binding.evaluate(ctx)?;
            match (e.id, slot, value) {
                (ElementId::Contour { .. }, Slot::Path, Value::Path(shape)) => {
                    let amount = match e.binding(Slot::Offset) {
                        Some(b) => b.evaluate(ctx)?.as_scalar().unwrap_or(0.0),
                        None => 0.0,
                    };
                    let offset = offset_polygon(&shape.vertices, amount);
                    Ok(Value::Path(PathShape::polygon(offset, shape.closed)))
                }
                (_, _, value) => Ok(value),
            }
        })
    }

    fn with_context<T>(
        &self,
        f: impl FnOnce(&EvalContext<'_>) -> AnatomyResult<T>,
    ) -> AnatomyResult<T> {
        let controls = self
            .control_layer()
            .ok_or_else(|| AnatomyError::evaluation("document has no control layer"))?;
        let timed = controls.at(self.time);
        f(&EvalContext::new(&timed, self))
    }
}

fn validate_stack(layers: &[Layer], owner: &str) -> AnatomyResult<()> {
    let mut seen = HashSet::new();
    for l in layers {
        if !seen.insert(l.name()) {
            return Err(AnatomyError::validation(format!(
                "{owner}: duplicate layer name '{}'",
                l.name()
            )));
        }
        match l {
            Layer::Source(s) => validate_contents(&s.contents, &s.name)?,
            Layer::Control(c) => {
                for p in &c.params {
                    p.keyframes.validate().map_err(|e| {
                        AnatomyError::validation(format!("control '{}': {e}", p.name))
                    })?;
                }
            }
            Layer::Generated(_) => {}
            Layer::Precomp { name, layers } => validate_stack(layers, name)?,
        }
    }
    Ok(())
}

fn validate_contents(contents: &[Content], layer: &str) -> AnatomyResult<()> {
    ensure_unique_names(contents, layer)?;
    for c in contents {
        match c {
            Content::Group { name, contents, .. } => {
                validate_contents(contents, &format!("{layer}/{name}"))?
            }
            Content::Path { name, shape } => shape
                .validate()
                .map_err(|e| AnatomyError::validation(format!("{layer}/{name}: {e}")))?,
            Content::Other { .. } => {}
        }
    }
    Ok(())
}

/// Precomp indices leading to the shallowest stack that holds a control layer.
fn overlay_path(layers: &[Layer]) -> Option<Vec<usize>> {
    if layers.iter().any(|l| matches!(l, Layer::Control(_))) {
        return Some(Vec::new());
    }
    let mut best: Option<Vec<usize>> = None;
    for (i, l) in layers.iter().enumerate() {
        let Layer::Precomp { layers, .. } = l else {
            continue;
        };
        if let Some(mut inner) = overlay_path(layers) {
            inner.insert(0, i);
            if best.as_ref().is_none_or(|b| inner.len() < b.len()) {
                best = Some(inner);
            }
        }
    }
    best
}

fn stack_at<'a>(layers: &'a [Layer], path: &[usize]) -> Option<&'a [Layer]> {
    match path.split_first() {
        None => Some(layers),
        Some((&i, rest)) => match layers.get(i)? {
            Layer::Precomp { layers, .. } => stack_at(layers, rest),
            _ => None,
        },
    }
}

fn stack_at_mut<'a>(layers: &'a mut Vec<Layer>, path: &[usize]) -> Option<&'a mut Vec<Layer>> {
    match path.split_first() {
        None => Some(layers),
        Some((&i, rest)) => match layers.get_mut(i)? {
            Layer::Precomp { layers, .. } => stack_at_mut(layers, rest),
            _ => None,
        },
    }
}

/// Follow `groups` (outermost first) down a content tree.
fn descend<'a>(
    mut contents: &'a [Content],
    groups: &[String],
) -> Option<(&'a [Content], AffineFrame)> {
    let mut frame = AffineFrame::identity();
    for g in groups {
        let (inner, transform) = contents.iter().find_map(|c| match c {
            Content::Group {
                name,
                transform,
                contents,
            } if name == g => Some((contents.as_slice(), *transform)),
            _ => None,
        })?;
        contents = inner;
        frame = transform;
    }
    Some((contents, frame))
}

/// Live reads against the document: source paths and frames, and frozen generated paths.
impl SourceGeometry for Document {
    fn path(&self, addr: &PathAddr) -> Option<Cow<'_, PathShape>> {
        match addr {
            PathAddr::Source {
                layer,
                groups,
                path,
            } => {
                let source = self.source_layer(layer)?;
                let (contents, _) = descend(&source.contents, groups)?;
                contents.iter().find_map(|c| match c {
                    Content::Path { name, shape } if name == path => Some(Cow::Borrowed(shape)),
                    _ => None,
                })
            }
            PathAddr::Generated { layer, group } => {
                let element = self.generated(layer)?.element(group)?;
                match element.binding(Slot::Path)? {
                    Binding::Static {
                        value: Value::Path(shape),
                    } => Some(Cow::Borrowed(shape)),
                    _ => None,
                }
            }
        }
    }

    fn frame(&self, addr: &FrameAddr) -> Option<AffineFrame> {
        match addr {
            FrameAddr::Layer { layer } => self.source_layer(layer).map(|l| l.transform),
            FrameAddr::Group { layer, groups } => {
                if groups.is_empty() {
                    return None;
                }
                let source = self.source_layer(layer)?;
                descend(&source.contents, groups).map(|(_, frame)| frame)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
