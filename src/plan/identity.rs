//! Layer names and element identities.
//!
//! Every generated element carries an [`ElementId`]; its textual name is a one-way encoding used
//! by the host. Bake goes back from names to identities with [`ElementId::parse`].

use std::fmt;
use std::str::FromStr;

use smallvec::{SmallVec, smallvec};

use crate::choreography::Category;
use crate::foundation::core::TangentSide;

/// Prefix shared by every generated layer.
pub const LAYER_PREFIX: &str = "PP_";
pub const CONTROL_LAYER: &str = "PP_Control";
pub const GRID_LAYER: &str = "PP_Grid";
pub const CIRCUMCIRCLE_LAYER: &str = "PP_Circumcircles";
pub const TANGENT_LAYER: &str = "PP_Tangents";
pub const TRIANGULATION_LAYER: &str = "PP_Triangulation";
pub const CONTOUR_LAYER: &str = "PP_OffsetContours";
pub const BISECTOR_LAYER: &str = "PP_Bisectors";
pub const OUTLINE_LAYER: &str = "PP_Outlines";
pub const HANDLE_LAYER: &str = "PP_Handles";
pub const HANDLE_LINE_LAYER: &str = "PP_HandleLines";
pub const ANCHOR_LAYER: &str = "PP_Anchors";
pub const LABEL_LAYER_PREFIX: &str = "PP_Label_";
/// Default name of the precomp that collects generated layers.
pub const PRECOMP_NAME: &str = "Path Plugin Visuals";

pub fn is_generated_layer(name: &str) -> bool {
    name.starts_with(LAYER_PREFIX)
}

/// Structured identity of one generated element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    Anchor { path: usize, vertex: usize },
    HandleDot { path: usize, vertex: usize, side: TangentSide },
    HandleLine { path: usize, vertex: usize, side: TangentSide },
    Outline { path: usize },
    Label { path: usize, vertex: usize },
    GridVertical { path: usize, vertex: usize },
    GridHorizontal { path: usize, vertex: usize },
    DiagonalGuide { index: usize },
    Circumcircle { path: usize, i: usize, j: usize, k: usize },
    Tangent { path: usize, vertex: usize, side: TangentSide },
    Diagonal { path: usize, a: usize, b: usize },
    Contour { path: usize, level: usize },
    Bisector { path: usize, a: usize, b: usize },
}

impl ElementId {
    pub fn category(self) -> Category {
        match self {
            Self::Anchor { .. } => Category::Anchor,
            Self::HandleDot { .. } | Self::HandleLine { .. } => Category::Handle,
            Self::Outline { .. } => Category::Outline,
            Self::Label { .. } => Category::Label,
            Self::GridVertical { .. } | Self::GridHorizontal { .. } | Self::DiagonalGuide { .. } => {
                Category::Grid
            }
            Self::Circumcircle { .. } => Category::Circumcircle,
            Self::Tangent { .. } => Category::Tangent,
            Self::Diagonal { .. } => Category::Triangulation,
            Self::Contour { .. } => Category::Contour,
            Self::Bisector { .. } => Category::Bisector,
        }
    }

    /// Source path the element derives from; diagonal guides belong to no single path.
    pub fn path(self) -> Option<usize> {
        match self {
            Self::Anchor { path, .. }
            | Self::HandleDot { path, .. }
            | Self::HandleLine { path, .. }
            | Self::Outline { path }
            | Self::Label { path, .. }
            | Self::GridVertical { path, .. }
            | Self::GridHorizontal { path, .. }
            | Self::Circumcircle { path, .. }
            | Self::Tangent { path, .. }
            | Self::Diagonal { path, .. }
            | Self::Contour { path, .. }
            | Self::Bisector { path, .. } => Some(path),
            Self::DiagonalGuide { .. } => None,
        }
    }

    /// Source vertex indices the element reads, for range checks against a frozen path.
    pub fn vertices(self) -> SmallVec<[usize; 3]> {
        match self {
            Self::Anchor { vertex, .. }
            | Self::HandleDot { vertex, .. }
            | Self::HandleLine { vertex, .. }
            | Self::Label { vertex, .. }
            | Self::GridVertical { vertex, .. }
            | Self::GridHorizontal { vertex, .. }
            | Self::Tangent { vertex, .. } => smallvec![vertex],
            Self::Circumcircle { i, j, k, .. } => smallvec![i, j, k],
            Self::Diagonal { a, b, .. } | Self::Bisector { a, b, .. } => smallvec![a, b],
            Self::Outline { .. } | Self::Contour { .. } | Self::DiagonalGuide { .. } => {
                SmallVec::new()
            }
        }
    }

    pub fn name(self) -> String {
        self.to_string()
    }

    pub fn parse(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Anchor { path, vertex } => write!(f, "A{path}_{vertex}"),
            Self::HandleDot { path, vertex, side } => write!(f, "H{}{path}_{vertex}", side.tag()),
            Self::HandleLine { path, vertex, side } => write!(f, "L{}{path}_{vertex}", side.tag()),
            Self::Outline { path } => write!(f, "O{path}"),
            Self::Label { path, vertex } => write!(f, "{LABEL_LAYER_PREFIX}{path}_{vertex}"),
            Self::GridVertical { path, vertex } => write!(f, "VL_{path}_{vertex}"),
            Self::GridHorizontal { path, vertex } => write!(f, "HL_{path}_{vertex}"),
            Self::DiagonalGuide { index } => write!(f, "DL{index}"),
            Self::Circumcircle { path, i, j, k } => write!(f, "CC_{path}_{i}_{j}_{k}"),
            Self::Tangent { path, vertex, side } => write!(f, "T{}_{path}_{vertex}", side.tag()),
            Self::Diagonal { path, a, b } => write!(f, "DG_{path}_{a}_{b}"),
            Self::Contour { path, level } => write!(f, "OC_{path}_{level}"),
            Self::Bisector { path, a, b } => write!(f, "PB_{path}_{a}_{b}"),
        }
    }
}

/// Name did not decode to an [`ElementId`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized element name '{0}'")]
pub struct ParseElementIdError(pub String);

fn side_of(tag: char) -> Option<TangentSide> {
    match tag {
        'I' => Some(TangentSide::In),
        'O' => Some(TangentSide::Out),
        _ => None,
    }
}

/// Exactly `N` underscore-separated indices.
fn indices<const N: usize>(s: &str) -> Option<[usize; N]> {
    let mut out = [0usize; N];
    let mut parts = s.split('_');
    for slot in &mut out {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|c| c.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }
    parts.next().is_none().then_some(out)
}

impl FromStr for ElementId {
    type Err = ParseElementIdError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let err = || ParseElementIdError(name.to_string());
        let parsed = if let Some(rest) = name.strip_prefix(LABEL_LAYER_PREFIX) {
            indices::<2>(rest).map(|[path, vertex]| Self::Label { path, vertex })
        } else if let Some(rest) = name.strip_prefix("VL_") {
            indices::<2>(rest).map(|[path, vertex]| Self::GridVertical { path, vertex })
        } else if let Some(rest) = name.strip_prefix("HL_") {
            indices::<2>(rest).map(|[path, vertex]| Self::GridHorizontal { path, vertex })
        } else if let Some(rest) = name.strip_prefix("CC_") {
            indices::<4>(rest).map(|[path, i, j, k]| Self::Circumcircle { path, i, j, k })
        } else if let Some(rest) = name.strip_prefix("DG_") {
            indices::<3>(rest).map(|[path, a, b]| Self::Diagonal { path, a, b })
        } else if let Some(rest) = name.strip_prefix("OC_") {
            indices::<2>(rest).map(|[path, level]| Self::Contour { path, level })
        } else if let Some(rest) = name.strip_prefix("PB_") {
            indices::<3>(rest).map(|[path, a, b]| Self::Bisector { path, a, b })
        } else if let Some(rest) = name.strip_prefix("DL") {
            indices::<1>(rest).map(|[index]| Self::DiagonalGuide { index })
        } else {
            let mut chars = name.chars();
            let first = chars.next();
            let second = chars.next();
            match (first, second) {
                (Some('A'), _) => {
                    indices::<2>(&name[1..]).map(|[path, vertex]| Self::Anchor { path, vertex })
                }
                (Some('O'), _) => indices::<1>(&name[1..]).map(|[path]| Self::Outline { path }),
                (Some(kind @ ('H' | 'L')), Some(tag)) => side_of(tag).and_then(|side| {
                    indices::<2>(&name[2..]).map(|[path, vertex]| match kind {
                        'H' => Self::HandleDot { path, vertex, side },
                        _ => Self::HandleLine { path, vertex, side },
                    })
                }),
                (Some('T'), Some(tag)) => side_of(tag).and_then(|side| {
                    name[2..]
                        .strip_prefix('_')
                        .and_then(indices::<2>)
                        .map(|[path, vertex]| Self::Tangent { path, vertex, side })
                }),
                _ => None,
            }
        };
        parsed.ok_or_else(err)
    }
}

impl serde::Serialize for ElementId {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ElementId {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let name = String::deserialize(d)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/identity.rs"]
mod tests;
