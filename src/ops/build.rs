use crate::config::BuildOptions;
use crate::foundation::error::{AnatomyError, AnatomyResult};
use crate::plan::emit::plan_scene;
use crate::scene::document::{Document, Layer};
use crate::scene::transaction::transact;
use crate::source::discover::discover_paths;

/// Asks the user whether to go ahead with an expensive build.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BuildReport {
    pub source: String,
    pub paths: usize,
    pub vertices: usize,
    /// Generated layers from an earlier build that were replaced.
    pub removed: usize,
    /// Control layer first, then every generated layer bottom-up.
    pub layers: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BuildOutcome {
    Built(BuildReport),
    /// The vertex-count warning was declined; nothing changed.
    Declined,
}

impl BuildOutcome {
    pub fn report(&self) -> Option<&BuildReport> {
        match self {
            Self::Built(r) => Some(r),
            Self::Declined => None,
        }
    }
}

/// Replace any previous build with annotations for `source_layer`.
#[tracing::instrument(skip(doc, options, confirm), fields(profile = ?options.profile))]
pub fn build(
    doc: &mut Document,
    source_layer: &str,
    options: &BuildOptions,
    confirm: &dyn Confirm,
) -> AnatomyResult<BuildOutcome> {
    let source = doc.source_layer(source_layer).ok_or_else(|| {
        AnatomyError::user_input(format!("source layer '{source_layer}' not found"))
    })?;
    let snapshot = discover_paths(Some(source))?;
    if snapshot.is_empty() {
        return Err(AnatomyError::empty_source(format!(
            "no paths found in '{source_layer}'"
        )));
    }

    let vertices = snapshot.total_vertices();
    if vertices > options.vertex_warning_threshold {
        tracing::warn!(
            vertices,
            threshold = options.vertex_warning_threshold,
            "vertex count above warning threshold"
        );
        let message =
            format!("{vertices} vertices found. Expressions may slow playback. Continue?");
        if !confirm.confirm(&message) {
            tracing::info!("build declined");
            return Ok(BuildOutcome::Declined);
        }
    }

    let plan = plan_scene(&snapshot, options)?;
    let report = transact(doc, |doc| {
        let removed = doc.remove_generated();
        let mut layers = vec![Layer::Control(plan.controls)];
        layers.extend(plan.layers.into_iter().map(Layer::Generated));
        let names = layers.iter().map(|l| l.name().to_string()).collect();
        doc.layers.extend(layers);
        doc.validate()?;
        Ok(BuildReport {
            source: source_layer.to_string(),
            paths: snapshot.paths.len(),
            vertices,
            removed,
            layers: names,
        })
    })?;

    tracing::info!(
        paths = report.paths,
        vertices = report.vertices,
        layers = report.layers.len(),
        "built annotations"
    );
    Ok(BuildOutcome::Built(report))
}

#[cfg(test)]
#[path = "../../tests/unit/ops/build.rs"]
mod tests;
