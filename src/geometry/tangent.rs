use crate::foundation::core::{Point, TangentSide};
use crate::foundation::math::{DIRECTION_EPS, length};
use crate::geometry::WorldPath;

/// Most tangent rays kept across all paths.
pub const TANGENT_CAP: usize = 12;
/// Handles at or below this length get no ray.
pub const MIN_TANGENT_MAGNITUDE: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TangentPick {
    pub path: usize,
    pub vertex: usize,
    pub side: TangentSide,
    /// Handle length as authored.
    pub magnitude: f64,
}

/// Longest handles across all paths, out-handle before in-handle per vertex.
pub fn select_tangents(paths: &[WorldPath]) -> Vec<TangentPick> {
    let mut picks = Vec::new();
    for p in paths {
        for v in 0..p.len() {
            for (side, t) in [
                (TangentSide::Out, p.local_out[v]),
                (TangentSide::In, p.local_in[v]),
            ] {
                let magnitude = length(t);
                if magnitude > MIN_TANGENT_MAGNITUDE {
                    picks.push(TangentPick {
                        path: p.index,
                        vertex: v,
                        side,
                        magnitude,
                    });
                }
            }
        }
    }
    picks.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
    picks.truncate(TANGENT_CAP);
    picks
}

/// Ray of `ray_length` from `vertex` through `handle_end`.
///
/// A handle too short to carry a direction yields a zero-length ray at the vertex.
pub fn tangent_ray(vertex: Point, handle_end: Point, ray_length: f64) -> (Point, Point) {
    let dx = handle_end.x - vertex.x;
    let dy = handle_end.y - vertex.y;
    let d = (dx * dx + dy * dy).sqrt();
    let (ux, uy) = if d > DIRECTION_EPS {
        (dx / d, dy / d)
    } else {
        (0.0, 0.0)
    };
    (
        vertex,
        Point::new(vertex.x + ux * ray_length, vertex.y + uy * ray_length),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/tangent.rs"]
mod tests;
