//! Freeze the outlines and relink every dependent to them.
//!
//! After a bake the outline paths are plain static data the user can edit; anchors, handles,
//! labels, grid lines and construction geometry follow the edited outline instead of the source
//! layer. Dependents are rebuilt from their [`ElementId`], never from their formula text.

use std::collections::BTreeMap;

use crate::config::BuildOptions;
use crate::expression::address::PathAddr;
use crate::expression::eval::Value;
use crate::foundation::core::{PathShape, Point};
use crate::foundation::error::{AnatomyError, AnatomyResult};
use crate::geometry::grid::GridExtents;
use crate::plan::formulas::{GeometryParams, VertexSource, geometry_bindings};
use crate::plan::identity::{self, ElementId};
use crate::plan::model::{Binding, Slot};
use crate::scene::document::Document;
use crate::scene::transaction::transact;

/// A dependent that could not be relinked.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SkippedDependent {
    pub layer: String,
    pub element: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct BakeReport {
    /// Outline elements whose path is now static.
    pub frozen: Vec<String>,
    /// Dependents now reading the frozen outlines.
    pub relinked: Vec<String>,
    pub skipped: Vec<SkippedDependent>,
}

impl BakeReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// [`bake_with`] using the default label offset.
pub fn bake(doc: &mut Document) -> AnatomyResult<BakeReport> {
    bake_with(doc, &BuildOptions::default())
}

/// Freeze every outline at the document time and relink dependents to the frozen copies.
///
/// A missing outline or control layer aborts before anything changes. A dependent whose outline
/// is gone or too short is left as it was and reported in [`BakeReport::skipped`].
#[tracing::instrument(skip(doc, options))]
pub fn bake_with(doc: &mut Document, options: &BuildOptions) -> AnatomyResult<BakeReport> {
    if doc.generated(identity::OUTLINE_LAYER).is_none() {
        return Err(AnatomyError::bake(format!(
            "{} not found; build first",
            identity::OUTLINE_LAYER
        )));
    }
    if doc.control_layer().is_none() {
        return Err(AnatomyError::bake(format!(
            "{} not found",
            identity::CONTROL_LAYER
        )));
    }

    let report = transact(doc, |doc| {
        let frozen = freeze_outlines(doc)?;
        let points: Vec<Point> = frozen
            .values()
            .flat_map(|s| s.vertices.iter().copied())
            .collect();
        let extents = GridExtents::from_points(&points)
            .ok_or_else(|| AnatomyError::bake("frozen outlines have no vertices"))?;
        let params = GeometryParams {
            extents,
            label_offset_y: options.label_offset_y,
        };
        let sources: BTreeMap<usize, VertexSource<'_>> = frozen
            .iter()
            .map(|(&path, shape)| {
                let src = VertexSource::Frozen {
                    addr: PathAddr::Generated {
                        layer: identity::OUTLINE_LAYER.to_string(),
                        group: ElementId::Outline { path }.name(),
                    },
                    len: shape.len(),
                    closed: shape.closed,
                };
                (path, src)
            })
            .collect();

        let mut report = BakeReport {
            frozen: frozen
                .keys()
                .map(|&path| ElementId::Outline { path }.name())
                .collect(),
            ..BakeReport::default()
        };
        for layer in doc.generated_layers_mut() {
            if layer.name == identity::OUTLINE_LAYER {
                continue;
            }
            for e in &mut layer.elements {
                let Some(path) = e.id.path() else {
                    continue;
                };
                let skip = |reason: String| SkippedDependent {
                    layer: layer.name.clone(),
                    element: e.name(),
                    reason,
                };
                let Some(src) = sources.get(&path) else {
                    report
                        .skipped
                        .push(skip(format!("no frozen outline for path {path}")));
                    continue;
                };
                if let Some(v) = e.id.vertices().into_iter().find(|&v| v >= src.len()) {
                    report.skipped.push(skip(format!(
                        "vertex {v} is past the frozen outline's {} vertices",
                        src.len()
                    )));
                    continue;
                }
                for (slot, binding) in geometry_bindings(e.id, src, &params) {
                    e.bindings.insert(slot, binding);
                }
                report.relinked.push(e.name());
            }
        }
        Ok(report)
    })?;

    for s in &report.skipped {
        tracing::warn!(
            layer = %s.layer,
            element = %s.element,
            reason = %s.reason,
            "skipped dependent"
        );
    }
    tracing::info!(
        frozen = report.frozen.len(),
        relinked = report.relinked.len(),
        skipped = report.skipped.len(),
        "baked outlines"
    );
    Ok(report)
}

/// Evaluate each outline path, store it as static data and pin the outline layer at the origin.
fn freeze_outlines(doc: &mut Document) -> AnatomyResult<BTreeMap<usize, PathShape>> {
    let outlines = doc
        .generated(identity::OUTLINE_LAYER)
        .ok_or_else(|| AnatomyError::bake(format!("{} not found", identity::OUTLINE_LAYER)))?;
    let mut frozen = BTreeMap::new();
    for e in &outlines.elements {
        let ElementId::Outline { path } = e.id else {
            continue;
        };
        let value = doc.evaluate_element(e, Slot::Path).map_err(|err| err.at(e.name()))?;
        let Value::Path(shape) = value else {
            return Err(AnatomyError::bake(format!(
                "outline '{}' did not evaluate to a path",
                e.name()
            )));
        };
        frozen.insert(path, shape);
    }
    if frozen.is_empty() {
        return Err(AnatomyError::bake(format!(
            "no paths found on {}",
            identity::OUTLINE_LAYER
        )));
    }

    let layer = doc
        .generated_mut(identity::OUTLINE_LAYER)
        .ok_or_else(|| AnatomyError::bake(format!("{} not found", identity::OUTLINE_LAYER)))?;
    layer.position = Binding::vector(0.0, 0.0);
    for (&path, shape) in &frozen {
        if let Some(e) = layer.element_by_id_mut(ElementId::Outline { path }) {
            e.bindings.insert(
                Slot::Path,
                Binding::Static {
                    value: Value::Path(shape.clone()),
                },
            );
        }
    }
    Ok(frozen)
}

#[cfg(test)]
#[path = "../../tests/unit/ops/bake.rs"]
mod tests;
