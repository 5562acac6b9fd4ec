use crate::foundation::error::{AnatomyError, AnatomyResult};
use crate::scene::document::{Document, Layer};

/// Remove every generated layer; returns how many were removed.
#[tracing::instrument(skip(doc))]
pub fn cleanup(doc: &mut Document) -> usize {
    let removed = doc.remove_generated();
    tracing::info!(removed, "removed generated layers");
    removed
}

/// Move every generated layer into one precomp named `name`.
///
/// The precomp takes the place of the top-most generated layer. Returns how many layers moved.
#[tracing::instrument(skip(doc))]
pub fn precompose(doc: &mut Document, name: &str) -> AnatomyResult<usize> {
    if name.trim().is_empty() {
        return Err(AnatomyError::user_input("precomp name is empty"));
    }
    if doc.layer(name).is_some() {
        return Err(AnatomyError::user_input(format!(
            "a layer named '{name}' already exists"
        )));
    }
    let Some(top) = doc.layers.iter().rposition(Layer::is_generated) else {
        return Err(AnatomyError::user_input("nothing to precompose"));
    };

    let (moved, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut doc.layers)
        .into_iter()
        .enumerate()
        .partition(|(_, l)| l.is_generated());
    let at = kept.iter().filter(|(i, _)| *i < top).count();
    let moved: Vec<Layer> = moved.into_iter().map(|(_, l)| l).collect();
    let count = moved.len();

    doc.layers = kept.into_iter().map(|(_, l)| l).collect();
    doc.layers.insert(
        at,
        Layer::Precomp {
            name: name.to_string(),
            layers: moved,
        },
    );
    tracing::info!(count, precomp = name, "precomposed generated layers");
    Ok(count)
}

#[cfg(test)]
#[path = "../../tests/unit/ops/layers.rs"]
mod tests;
