use std::collections::HashSet;

use crate::foundation::core::{AffineFrame, PathShape};
use crate::foundation::error::{AnatomyError, AnatomyResult};

/// A host layer whose shape contents are annotated.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SourceLayer {
    pub name: String,
    #[serde(default)]
    pub transform: AffineFrame,
    #[serde(default)]
    pub contents: Vec<Content>,
}

/// Node of a shape-content tree.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Group {
        name: String,
        #[serde(default)]
        transform: AffineFrame,
        #[serde(default)]
        contents: Vec<Content>,
    },
    Path {
        name: String,
        shape: PathShape,
    },
    /// Fills, strokes, modifiers: anything that carries no geometry of its own.
    Other { name: String },
}

impl Content {
    pub fn name(&self) -> &str {
        match self {
            Self::Group { name, .. } | Self::Path { name, .. } | Self::Other { name } => name,
        }
    }

    pub fn group(name: impl Into<String>, transform: AffineFrame, contents: Vec<Content>) -> Self {
        Self::Group {
            name: name.into(),
            transform,
            contents,
        }
    }

    pub fn path(name: impl Into<String>, shape: PathShape) -> Self {
        Self::Path {
            name: name.into(),
            shape,
        }
    }
}

/// Groups and paths are addressed by name, so siblings of those kinds must not share one.
pub(crate) fn ensure_unique_names(contents: &[Content], parent: &str) -> AnatomyResult<()> {
    let mut seen = HashSet::new();
    for c in contents {
        if matches!(c, Content::Other { .. }) {
            continue;
        }
        if !seen.insert(c.name()) {
            return Err(AnatomyError::validation(format!(
                "{parent}: duplicate content name '{}'",
                c.name()
            )));
        }
    }
    Ok(())
}
