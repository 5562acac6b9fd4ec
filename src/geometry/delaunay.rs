//! Bowyer-Watson triangulation and the diagonals it exposes.

use std::collections::HashSet;

use crate::foundation::core::{Point, bounds_of};
use crate::foundation::math::distance;
use crate::geometry::WorldPath;

/// Most triangulation diagonals kept across all paths.
pub const DIAGONAL_CAP: usize = 15;

const DET_EPS: f64 = 1e-10;
const SUPER_MARGIN: f64 = 3.0;

/// Triangles of `points` as index triples. Fewer than three points give none.
pub fn triangulate(points: &[Point]) -> Vec<[usize; 3]> {
    let n = points.len();
    let Some(bounds) = bounds_of(points.iter().copied()) else {
        return Vec::new();
    };
    if n < 3 {
        return Vec::new();
    }

    let c = bounds.center();
    let dmax = bounds.width().hypot(bounds.height()) * SUPER_MARGIN;
    let mut all: Vec<Point> = points.to_vec();
    all.push(Point::new(c.x - dmax, c.y - dmax));
    all.push(Point::new(c.x + dmax, c.y - dmax));
    all.push(Point::new(c.x, c.y + dmax));
    let mut triangles: Vec<[usize; 3]> = vec![[n, n + 1, n + 2]];

    for (pi, p) in points.iter().enumerate() {
        let bad: Vec<usize> = triangles
            .iter()
            .enumerate()
            .filter(|(_, t)| in_circumcircle(&all, **t, *p))
            .map(|(i, _)| i)
            .collect();

        let mut boundary: Vec<(usize, usize)> = Vec::new();
        for &bi in &bad {
            let t = triangles[bi];
            for e in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                let shared = bad.iter().any(|&bj| {
                    bj != bi && {
                        let o = triangles[bj];
                        o.contains(&e.0) && o.contains(&e.1)
                    }
                });
                if !shared {
                    boundary.push(e);
                }
            }
        }

        for &bi in bad.iter().rev() {
            triangles.remove(bi);
        }
        triangles.extend(boundary.into_iter().map(|(a, b)| [pi, a, b]));
    }

    triangles.retain(|t| t.iter().all(|&i| i < n));
    triangles
}

fn in_circumcircle(all: &[Point], t: [usize; 3], p: Point) -> bool {
    let (a, b, c) = (all[t[0]], all[t[1]], all[t[2]]);
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < DET_EPS {
        return false;
    }
    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
    let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
    let r2 = (ux - a.x) * (ux - a.x) + (uy - a.y) * (uy - a.y);
    let d2 = (ux - p.x) * (ux - p.x) + (uy - p.y) * (uy - p.y);
    d2 < r2 + DET_EPS
}

/// Triangulation edge that is not a side of the path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Diagonal {
    pub path: usize,
    /// Lower vertex index.
    pub a: usize,
    pub b: usize,
    pub length: f64,
}

/// Non-adjacent edges of one path's triangulation, in first-seen order.
pub fn path_diagonals(path: &WorldPath) -> Vec<Diagonal> {
    let n = path.len();
    if n < 3 {
        return Vec::new();
    }
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for t in triangulate(&path.points) {
        for (x, y) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
            let (a, b) = (x.min(y), x.max(y));
            if !seen.insert((a, b)) {
                continue;
            }
            let adjacent = b - a == 1 || (path.closed && a == 0 && b == n - 1);
            if !adjacent {
                out.push(Diagonal {
                    path: path.index,
                    a,
                    b,
                    length: distance(path.points[a], path.points[b]),
                });
            }
        }
    }
    out
}

/// Longest diagonals across all paths.
pub fn select_diagonals(paths: &[WorldPath]) -> Vec<Diagonal> {
    let mut all: Vec<Diagonal> = paths.iter().flat_map(path_diagonals).collect();
    all.sort_by(|x, y| y.length.total_cmp(&x.length));
    all.truncate(DIAGONAL_CAP);
    all
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/delaunay.rs"]
mod tests;
