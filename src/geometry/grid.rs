//! Axis-aligned grid lines and diagonal guides.

use crate::foundation::core::{Point, bounds_of};
use crate::foundation::math::{angle_deg, distance, fold_line_angle, length};
use crate::geometry::WorldPath;

/// Most grid lines kept per axis.
pub const GRID_LINE_CAP: usize = 18;
/// Most diagonal guides kept.
pub const DIAGONAL_GUIDE_CAP: usize = 6;

const MIN_GUIDE_SEGMENT: f64 = 12.0;
const MAX_GUIDE_HANDLE_RATIO: f64 = 0.15;
const AXIS_EXCLUSION_DEG: f64 = 5.0;
const GUIDE_MERGE_DEG: f64 = 4.0;
const GUIDE_LENGTH_FACTOR: f64 = 1.4;

/// Padded, integer-rounded box the grid lines span.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GridExtents {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// Diagonal of the unpadded box, with width and height floored at 1.
    pub diagonal: f64,
    /// Unpadded width floored at 1.
    pub width: f64,
}

impl GridExtents {
    /// Extents of a world-space point cloud; `None` when empty.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let r = bounds_of(points.iter().copied())?;
        let w = (r.x1 - r.x0).max(1.0);
        let h = (r.y1 - r.y0).max(1.0);
        let diagonal = (w * w + h * h).sqrt();
        let pad = (diagonal * 0.15).max(30.0);
        Some(Self {
            x_min: host_round(r.x0 - pad),
            x_max: host_round(r.x1 + pad),
            y_min: host_round(r.y0 - pad),
            y_max: host_round(r.y1 + pad),
            diagonal,
            width: w,
        })
    }

    /// Bucket tolerance for grid-line dedup; the width drives both axes.
    pub fn tolerance(&self) -> f64 {
        (self.width * 0.04).max(6.0)
    }
}

fn host_round(v: f64) -> f64 {
    crate::expression::eval::host_round(v)
}

/// A vertex picked to carry a grid line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPick {
    pub path: usize,
    pub vertex: usize,
    pub coord: f64,
}

/// Keep the first vertex of each coordinate bucket, up to `cap` buckets.
pub fn dedup_axis(
    samples: impl IntoIterator<Item = GridPick>,
    tolerance: f64,
    cap: usize,
) -> Vec<GridPick> {
    let mut kept: Vec<GridPick> = Vec::new();
    for s in samples {
        if kept.len() >= cap {
            break;
        }
        if kept.iter().all(|k| (k.coord - s.coord).abs() > tolerance) {
            kept.push(s);
        }
    }
    kept
}

/// Vertical (by x) and horizontal (by y) grid lines.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridLines {
    pub vertical: Vec<GridPick>,
    pub horizontal: Vec<GridPick>,
}

impl GridLines {
    pub fn len(&self) -> usize {
        self.vertical.len() + self.horizontal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn grid_lines(paths: &[WorldPath], extents: &GridExtents) -> GridLines {
    let tol = extents.tolerance();
    let samples = || {
        paths.iter().flat_map(|p| {
            p.points
                .iter()
                .enumerate()
                .map(move |(v, pt)| (p.index, v, *pt))
        })
    };
    GridLines {
        vertical: dedup_axis(
            samples().map(|(path, vertex, pt)| GridPick {
                path,
                vertex,
                coord: pt.x,
            }),
            tol,
            GRID_LINE_CAP,
        ),
        horizontal: dedup_axis(
            samples().map(|(path, vertex, pt)| GridPick {
                path,
                vertex,
                coord: pt.y,
            }),
            tol,
            GRID_LINE_CAP,
        ),
    }
}

/// Static guide line through a straight diagonal segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiagonalGuide {
    /// Line angle folded into `(-90, 90]`.
    pub angle_deg: f64,
    pub midpoint: Point,
    pub half_length: f64,
}

impl DiagonalGuide {
    pub fn endpoints(&self) -> (Point, Point) {
        let rad = self.angle_deg * std::f64::consts::PI / 180.0;
        let (s, c) = (rad.sin(), rad.cos());
        let m = self.midpoint;
        (
            Point::new(m.x - c * self.half_length, m.y - s * self.half_length),
            Point::new(m.x + c * self.half_length, m.y + s * self.half_length),
        )
    }
}

/// Straight-ish diagonal segments, one guide per distinct angle.
pub fn diagonal_guides(paths: &[WorldPath], extents: &GridExtents) -> Vec<DiagonalGuide> {
    let mut guides: Vec<DiagonalGuide> = Vec::new();
    for p in paths {
        let n = p.len();
        for s in 0..p.segment_count() {
            let (ia, ib) = (s, (s + 1) % n);
            let (va, vb) = (p.points[ia], p.points[ib]);
            let seg = distance(va, vb);
            if seg < MIN_GUIDE_SEGMENT {
                continue;
            }
            let limit = seg * MAX_GUIDE_HANDLE_RATIO;
            // Handles are measured as authored, against the display-space segment.
            if length(p.local_out[ia]) > limit || length(p.local_in[ib]) > limit {
                continue;
            }
            let ang = fold_line_angle(angle_deg(va, vb));
            if ang.abs() < AXIS_EXCLUSION_DEG || (ang.abs() - 90.0).abs() < AXIS_EXCLUSION_DEG {
                continue;
            }
            if guides.len() >= DIAGONAL_GUIDE_CAP {
                return guides;
            }
            if guides
                .iter()
                .all(|g| (g.angle_deg - ang).abs() > GUIDE_MERGE_DEG)
            {
                guides.push(DiagonalGuide {
                    angle_deg: ang,
                    midpoint: Point::new((va.x + vb.x) * 0.5, (va.y + vb.y) * 0.5),
                    half_length: extents.diagonal * GUIDE_LENGTH_FACTOR,
                });
            }
        }
    }
    guides
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/grid.rs"]
mod tests;
