use std::borrow::Cow;

use smallvec::SmallVec;

use crate::expression::address::{FrameAddr, PathAddr};
use crate::expression::context::SourceGeometry;
use crate::foundation::core::{AffineFrame, PathShape, Point, TangentSide, Vec2};
use crate::foundation::error::{AnatomyError, AnatomyResult};
use crate::source::model::{Content, SourceLayer, ensure_unique_names};
use crate::transform::affine::{self, FrameArena, FrameId};

/// One discovered leaf path and where it sits in the content tree.
#[derive(Clone, Debug, PartialEq)]
pub struct PathDescriptor {
    /// Discovery order; the stable path index used in element names.
    pub index: usize,
    pub name: String,
    pub address: PathAddr,
    pub shape: PathShape,
    /// Enclosing groups, innermost first.
    pub ancestors: SmallVec<[FrameId; 4]>,
    /// Layer frame.
    pub owner: FrameId,
}

/// Immutable snapshot of one source layer's paths, used for a single generation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceSnapshot {
    pub layer: String,
    pub frames: FrameArena,
    pub paths: Vec<PathDescriptor>,
}

impl SourceSnapshot {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn total_vertices(&self) -> usize {
        self.paths.iter().map(|p| p.shape.len()).sum()
    }

    /// Numeric frames for `path`: ancestors innermost first, then the owner.
    pub fn chain(&self, path: &PathDescriptor) -> (Vec<AffineFrame>, AffineFrame) {
        let owner = self
            .frames
            .get(path.owner)
            .map(|e| e.frame)
            .unwrap_or_default();
        (self.frames.frames(&path.ancestors), owner)
    }

    /// Live frame addresses for `path`: ancestors innermost first, then the owner.
    pub fn chain_addrs<'a>(&'a self, path: &'a PathDescriptor) -> (Vec<&'a FrameAddr>, FrameAddr) {
        let groups = self.frames.entries(&path.ancestors).map(|e| &e.addr).collect();
        let owner = self
            .frames
            .get(path.owner)
            .map(|e| e.addr.clone())
            .unwrap_or_else(|| FrameAddr::Layer {
                layer: self.layer.clone(),
            });
        (groups, owner)
    }

    pub fn world_vertex(&self, path: &PathDescriptor, i: usize) -> Point {
        let (chain, owner) = self.chain(path);
        affine::to_world(path.shape.vertices[i], &chain, owner)
    }

    pub fn world_vertices(&self, path: &PathDescriptor) -> Vec<Point> {
        let (chain, owner) = self.chain(path);
        path.shape
            .vertices
            .iter()
            .map(|p| affine::to_world(*p, &chain, owner))
            .collect()
    }

    pub fn world_tangent(&self, path: &PathDescriptor, i: usize, side: TangentSide) -> Vec2 {
        let (chain, owner) = self.chain(path);
        affine::vector_to_world(path.shape.tangent(i, side), &chain, owner)
    }

    /// World positions of every vertex of every path, in discovery order.
    pub fn all_world_vertices(&self) -> Vec<Point> {
        self.paths
            .iter()
            .flat_map(|p| self.world_vertices(p))
            .collect()
    }
}

/// The snapshot answers live reads with the values it captured.
impl SourceGeometry for SourceSnapshot {
    fn path(&self, addr: &PathAddr) -> Option<Cow<'_, PathShape>> {
        self.paths
            .iter()
            .find(|p| &p.address == addr)
            .map(|p| Cow::Borrowed(&p.shape))
    }

    fn frame(&self, addr: &FrameAddr) -> Option<AffineFrame> {
        self.frames.find(addr).map(|e| e.frame)
    }
}

struct Walker<'a> {
    layer: &'a str,
    frames: FrameArena,
    paths: Vec<PathDescriptor>,
    owner: FrameId,
}

impl Walker<'_> {
    fn walk(
        &mut self,
        contents: &[Content],
        names: &mut Vec<String>,
        ancestors: &mut SmallVec<[FrameId; 4]>,
    ) -> AnatomyResult<()> {
        let mut parent = self.layer.to_string();
        for n in names.iter() {
            parent.push('/');
            parent.push_str(n);
        }
        ensure_unique_names(contents, &parent)?;
        for c in contents {
            match c {
                Content::Group {
                    name,
                    transform,
                    contents,
                } => {
                    names.push(name.clone());
                    let id = self.frames.push(
                        FrameAddr::Group {
                            layer: self.layer.to_string(),
                            groups: names.clone(),
                        },
                        *transform,
                    );
                    // Innermost first.
                    ancestors.insert(0, id);
                    self.walk(contents, names, ancestors)?;
                    ancestors.remove(0);
                    names.pop();
                }
                Content::Path { name, shape } => {
                    shape.validate().map_err(|e| {
                        AnatomyError::validation(format!("{}/{name}: {e}", self.layer))
                    })?;
                    self.paths.push(PathDescriptor {
                        index: self.paths.len(),
                        name: name.clone(),
                        address: PathAddr::Source {
                            layer: self.layer.to_string(),
                            groups: names.clone(),
                            path: name.clone(),
                        },
                        shape: shape.clone(),
                        ancestors: ancestors.clone(),
                        owner: self.owner,
                    });
                }
                Content::Other { .. } => {}
            }
        }
        Ok(())
    }
}

/// Enumerate every leaf path of `layer` depth-first, pre-order.
///
/// An absent layer or one without contents yields an empty snapshot.
pub fn discover_paths(layer: Option<&SourceLayer>) -> AnatomyResult<SourceSnapshot> {
    let Some(layer) = layer else {
        return Ok(SourceSnapshot::default());
    };

    let mut frames = FrameArena::new();
    let owner = frames.push(
        FrameAddr::Layer {
            layer: layer.name.clone(),
        },
        layer.transform,
    );
    let mut w = Walker {
        layer: &layer.name,
        frames,
        paths: Vec::new(),
        owner,
    };
    w.walk(&layer.contents, &mut Vec::new(), &mut SmallVec::new())?;

    tracing::debug!(
        layer = %layer.name,
        paths = w.paths.len(),
        frames = w.frames.len(),
        "discovered source paths"
    );

    Ok(SourceSnapshot {
        layer: layer.name.clone(),
        frames: w.frames,
        paths: w.paths,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/source/discover.rs"]
mod tests;
