//! Structural addresses of live data inside the host document.

/// Address of a path whose vertex data a formula reads.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathAddr {
    /// A path inside a source layer, reached through `groups` (outermost first).
    Source {
        layer: String,
        groups: Vec<String>,
        path: String,
    },
    /// A frozen path owned by a generated element (the baked outline group).
    Generated { layer: String, group: String },
}

impl PathAddr {
    pub fn layer(&self) -> &str {
        match self {
            Self::Source { layer, .. } | Self::Generated { layer, .. } => layer,
        }
    }
}

impl std::fmt::Display for PathAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source {
                layer,
                groups,
                path,
            } => {
                write!(f, "{layer}")?;
                for g in groups {
                    write!(f, "/{g}")?;
                }
                write!(f, "/{path}")
            }
            Self::Generated { layer, group } => write!(f, "{layer}/{group}"),
        }
    }
}

/// Address of a transform frame: a group inside a layer, or the layer itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameAddr {
    /// Group transform reached through `groups` (outermost first, the group itself last).
    Group { layer: String, groups: Vec<String> },
    /// Layer transform.
    Layer { layer: String },
}

impl std::fmt::Display for FrameAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Group { layer, groups } => write!(f, "{layer}/{}", groups.join("/")),
            Self::Layer { layer } => write!(f, "{layer}"),
        }
    }
}
