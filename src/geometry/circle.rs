use crate::foundation::core::Point;
use crate::foundation::math::{COLLINEAR_EPS, doubled_area};
use crate::geometry::WorldPath;

/// Most circumcircles kept across all paths.
pub const CIRCUMCIRCLE_CAP: usize = 6;
/// Smallest doubled triangle area worth a circle.
pub const MIN_CIRCLE_AREA: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circumcircle {
    pub center: Point,
    pub radius: f64,
}

impl Circumcircle {
    pub const DEGENERATE: Self = Self {
        center: Point::ORIGIN,
        radius: 0.0,
    };
}

/// Circle through three points; near-collinear input gives [`Circumcircle::DEGENERATE`].
pub fn circumcircle(p1: Point, p2: Point, p3: Point) -> Circumcircle {
    let d = 2.0 * doubled_area(p1, p2, p3);
    if d.abs() < COLLINEAR_EPS {
        return Circumcircle::DEGENERATE;
    }
    let a2 = p1.x * p1.x + p1.y * p1.y;
    let b2 = p2.x * p2.x + p2.y * p2.y;
    let c2 = p3.x * p3.x + p3.y * p3.y;
    let cx = (a2 * (p2.y - p3.y) + b2 * (p3.y - p1.y) + c2 * (p1.y - p2.y)) / d;
    let cy = (a2 * (p3.x - p2.x) + b2 * (p1.x - p3.x) + c2 * (p2.x - p1.x)) / d;
    let radius = ((cx - p1.x) * (cx - p1.x) + (cy - p1.y) * (cy - p1.y)).sqrt();
    Circumcircle {
        center: Point::new(cx, cy),
        radius,
    }
}

/// Vertex triple of one path chosen for a circumcircle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleTriple {
    pub path: usize,
    pub i: usize,
    pub j: usize,
    pub k: usize,
    pub doubled_area: f64,
}

/// Exhaustive search for the vertex triple spanning the largest triangle.
pub fn best_triangle(points: &[Point]) -> Option<(usize, usize, usize, f64)> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    let mut best = (0, 1, 2, 0.0);
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                let area = doubled_area(points[i], points[j], points[k]).abs();
                if area > best.3 {
                    best = (i, j, k, area);
                }
            }
        }
    }
    Some(best)
}

/// One circle per closed path with at least three vertices, capped overall.
pub fn select_circumcircles(paths: &[WorldPath]) -> Vec<CircleTriple> {
    let mut out = Vec::new();
    for p in paths {
        if !p.closed {
            continue;
        }
        let Some((i, j, k, area)) = best_triangle(&p.points) else {
            continue;
        };
        if area < MIN_CIRCLE_AREA {
            continue;
        }
        out.push(CircleTriple {
            path: p.index,
            i,
            j,
            k,
            doubled_area: area,
        });
        if out.len() == CIRCUMCIRCLE_CAP {
            break;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/circle.rs"]
mod tests;
