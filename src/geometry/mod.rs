//! Static constructions computed once per generation pass from world-space snapshots.

pub(crate) mod bisector;
pub(crate) mod circle;
pub(crate) mod contour;
pub(crate) mod delaunay;
pub(crate) mod grid;
pub(crate) mod tangent;

use crate::foundation::core::{PathShape, Point, Vec2};
use crate::source::discover::{PathDescriptor, SourceSnapshot};

/// One path with vertices and handles mapped into display space.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldPath {
    pub index: usize,
    pub points: Vec<Point>,
    pub in_tangents: Vec<Vec2>,
    pub out_tangents: Vec<Vec2>,
    /// Handles as authored, before any frame is applied.
    pub local_in: Vec<Vec2>,
    pub local_out: Vec<Vec2>,
    pub closed: bool,
}

impl WorldPath {
    pub fn from_descriptor(snapshot: &SourceSnapshot, path: &PathDescriptor) -> Self {
        let (chain, owner) = snapshot.chain(path);
        let shape = &path.shape;
        let map_vec = |v: &Vec2| crate::transform::affine::vector_to_world(*v, &chain, owner);
        Self {
            index: path.index,
            points: shape
                .vertices
                .iter()
                .map(|p| crate::transform::affine::to_world(*p, &chain, owner))
                .collect(),
            in_tangents: shape.in_tangents.iter().map(map_vec).collect(),
            out_tangents: shape.out_tangents.iter().map(map_vec).collect(),
            local_in: shape.in_tangents.clone(),
            local_out: shape.out_tangents.clone(),
            closed: shape.closed,
        }
    }

    /// A shape that is already in display space (a frozen outline).
    pub fn from_world_shape(index: usize, shape: &PathShape) -> Self {
        Self {
            index,
            points: shape.vertices.clone(),
            in_tangents: shape.in_tangents.clone(),
            out_tangents: shape.out_tangents.clone(),
            local_in: shape.in_tangents.clone(),
            local_out: shape.out_tangents.clone(),
            closed: shape.closed,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        let n = self.points.len();
        if n < 2 {
            0
        } else if self.closed {
            n
        } else {
            n - 1
        }
    }
}

/// World paths for every path in `snapshot`, in discovery order.
pub fn world_paths(snapshot: &SourceSnapshot) -> Vec<WorldPath> {
    snapshot
        .paths
        .iter()
        .map(|p| WorldPath::from_descriptor(snapshot, p))
        .collect()
}
