//! Concentric offset contours around closed outlines.

use crate::foundation::core::{Point, Vec2};
use crate::foundation::math::{DIRECTION_EPS, length};
use crate::geometry::WorldPath;

/// Miter length allowed as a multiple of the offset before the corner falls back to the bisector.
const MITER_LIMIT: f64 = 4.0;
const PARALLEL_EPS: f64 = 1e-9;

/// Per-level styling of an offset contour.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContourLevel {
    /// Multiplier applied to the Contour Spacing control.
    pub spacing: f64,
    /// Group opacity in percent.
    pub opacity: f64,
    pub stroke_width: f64,
}

pub const CONTOUR_LEVELS: [ContourLevel; 3] = [
    ContourLevel {
        spacing: 1.0,
        opacity: 25.0,
        stroke_width: 0.5,
    },
    ContourLevel {
        spacing: 2.5,
        opacity: 15.0,
        stroke_width: 0.4,
    },
    ContourLevel {
        spacing: 5.0,
        opacity: 8.0,
        stroke_width: 0.3,
    },
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContourPick {
    pub path: usize,
    /// Index into [`CONTOUR_LEVELS`].
    pub level: usize,
}

impl ContourPick {
    pub fn style(&self) -> ContourLevel {
        CONTOUR_LEVELS[self.level]
    }
}

/// Every level for every closed path with at least three vertices.
pub fn select_contours(paths: &[WorldPath]) -> Vec<ContourPick> {
    paths
        .iter()
        .filter(|p| p.closed && p.len() >= 3)
        .flat_map(|p| {
            (0..CONTOUR_LEVELS.len()).map(move |level| ContourPick {
                path: p.index,
                level,
            })
        })
        .collect()
}

fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        / 2.0
}

/// Outward unit normal of the edge `a -> b`, or `None` for a zero-length edge.
fn edge_normal(a: Point, b: Point, outward_right: bool) -> Option<Vec2> {
    let d = b - a;
    let len = length(d);
    if len < DIRECTION_EPS {
        return None;
    }
    let (ux, uy) = (d.x / len, d.y / len);
    Some(if outward_right {
        Vec2::new(uy, -ux)
    } else {
        Vec2::new(-uy, ux)
    })
}

/// Miter offset of a closed polygon by `distance` (positive grows the shape).
///
/// The result is index-aligned with `points`. Corners whose miter would exceed the limit, and
/// corners between parallel edges, move along the averaged normal instead.
pub fn offset_polygon(points: &[Point], distance: f64) -> Vec<Point> {
    let n = points.len();
    if n < 3 || distance == 0.0 {
        return points.to_vec();
    }
    let outward_right = signed_area(points) > 0.0;
    let normals: Vec<Option<Vec2>> = (0..n)
        .map(|i| edge_normal(points[i], points[(i + 1) % n], outward_right))
        .collect();
    let fallback = normals.iter().flatten().next().copied();
    let Some(fallback) = fallback else {
        return points.to_vec();
    };

    (0..n)
        .map(|i| {
            let prev = (i + n - 1) % n;
            let n_in = normals[prev].or(normals[i]).unwrap_or(fallback);
            let n_out = normals[i].or(normals[prev]).unwrap_or(fallback);
            miter_corner(points[i], n_in, n_out, distance)
        })
        .collect()
}

fn miter_corner(corner: Point, n_in: Vec2, n_out: Vec2, distance: f64) -> Point {
    let sum = n_in + n_out;
    let sum_len = length(sum);
    if sum_len < PARALLEL_EPS {
        // Hairpin: push along the incoming normal.
        return corner + n_in * distance;
    }
    let bisector = sum / sum_len;
    let cos_half = bisector.dot(n_in);
    if cos_half.abs() < PARALLEL_EPS || 1.0 / cos_half.abs() > MITER_LIMIT {
        return corner + bisector * distance;
    }
    corner + bisector * (distance / cos_half)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/contour.rs"]
mod tests;
