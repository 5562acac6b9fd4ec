use crate::foundation::core::Point;
use crate::foundation::math::{DIRECTION_EPS, angle_deg, distance};
use crate::geometry::WorldPath;

/// Most bisectors kept across all paths.
pub const BISECTOR_CAP: usize = 8;

const MIN_BISECTOR_SEGMENT: f64 = 5.0;
const AXIS_EXCLUSION_DEG: f64 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BisectorPick {
    pub path: usize,
    pub a: usize,
    pub b: usize,
    pub length: f64,
}

fn near_axis(ang: f64) -> bool {
    let a = ang.abs();
    a < AXIS_EXCLUSION_DEG
        || (a - 180.0).abs() < AXIS_EXCLUSION_DEG
        || (a - 90.0).abs() < AXIS_EXCLUSION_DEG
}

/// Longest oblique segments across all paths.
pub fn select_bisectors(paths: &[WorldPath]) -> Vec<BisectorPick> {
    let mut picks = Vec::new();
    for p in paths {
        let n = p.len();
        for s in 0..p.segment_count() {
            let (a, b) = (s, (s + 1) % n);
            let len = distance(p.points[a], p.points[b]);
            if len < MIN_BISECTOR_SEGMENT || near_axis(angle_deg(p.points[a], p.points[b])) {
                continue;
            }
            picks.push(BisectorPick {
                path: p.index,
                a,
                b,
                length: len,
            });
        }
    }
    picks.sort_by(|x, y| y.length.total_cmp(&x.length));
    picks.truncate(BISECTOR_CAP);
    picks
}

/// Perpendicular bisector of `v0 v1`, `half_length` to each side of the midpoint.
///
/// A zero-length segment yields both endpoints at the midpoint.
pub fn perpendicular_bisector(v0: Point, v1: Point, half_length: f64) -> (Point, Point) {
    let mx = (v0.x + v1.x) / 2.0;
    let my = (v0.y + v1.y) / 2.0;
    let ex = v1.x - v0.x;
    let ey = v1.y - v0.y;
    let el = (ex * ex + ey * ey).sqrt();
    if el < DIRECTION_EPS {
        return (Point::new(mx, my), Point::new(mx, my));
    }
    let px = -ey / el;
    let py = ex / el;
    (
        Point::new(mx - px * half_length, my - py * half_length),
        Point::new(mx + px * half_length, my + py * half_length),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/bisector.rs"]
mod tests;
