use crate::foundation::error::{AnatomyError, AnatomyResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// 2D transform frame in host terms: anchor, position, percent scale and degree rotation.
///
/// Maps a child coordinate space into its parent's. Positive rotation turns counter-clockwise on
/// screen with the Y axis pointing down, which matches `kurbo::Affine::rotate`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AffineFrame {
    /// Pivot in child space.
    #[serde(default = "zero_vec")]
    pub anchor: Vec2,
    /// Translation in parent space.
    #[serde(default = "zero_vec")]
    pub position: Vec2,
    /// Per-axis scale in percent, `100` is identity.
    #[serde(default = "identity_scale")]
    pub scale_pct: Vec2,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation_deg: f64,
}

fn zero_vec() -> Vec2 {
    Vec2::ZERO
}

fn identity_scale() -> Vec2 {
    Vec2::new(100.0, 100.0)
}

impl Default for AffineFrame {
    fn default() -> Self {
        Self {
            anchor: Vec2::ZERO,
            position: Vec2::ZERO,
            scale_pct: identity_scale(),
            rotation_deg: 0.0,
        }
    }
}

impl AffineFrame {
    /// Frame that maps every point onto itself.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn rotation_rad(self) -> f64 {
        self.rotation_deg * std::f64::consts::PI / 180.0
    }

    /// Equivalent `kurbo` matrix.
    pub fn to_affine(self) -> Affine {
        // Canonical order:
        // T(position) * R(rot) * S(scale) * T(-anchor)
        Affine::translate(self.position)
            * Affine::rotate(self.rotation_rad())
            * Affine::scale_non_uniform(self.scale_pct.x / 100.0, self.scale_pct.y / 100.0)
            * Affine::translate(-self.anchor)
    }

    /// Map a child-space point into parent space.
    ///
    /// The operation order mirrors the generated formulas step for step, so a formula evaluated
    /// against the same live values reproduces this result bit for bit.
    pub fn apply(self, p: Point) -> Point {
        let mut x = p.x - self.anchor.x;
        let mut y = p.y - self.anchor.y;
        x *= self.scale_pct.x / 100.0;
        y *= self.scale_pct.y / 100.0;
        let rad = self.rotation_rad();
        let (si, co) = (rad.sin(), rad.cos());
        let nx = x * co - y * si;
        y = x * si + y * co;
        x = nx;
        Point::new(x + self.position.x, y + self.position.y)
    }

    /// Map a child-space direction (a tangent handle) into parent space; ignores translation.
    pub fn apply_vector(self, v: Vec2) -> Vec2 {
        let x = v.x * (self.scale_pct.x / 100.0);
        let y = v.y * (self.scale_pct.y / 100.0);
        let rad = self.rotation_rad();
        let (si, co) = (rad.sin(), rad.cos());
        Vec2::new(x * co - y * si, x * si + y * co)
    }

    /// Map a parent-space point back into child space.
    ///
    /// Returns `None` when a scale axis is zero and the frame collapses the plane.
    pub fn invert(self, p: Point) -> Option<Point> {
        let sx = self.scale_pct.x / 100.0;
        let sy = self.scale_pct.y / 100.0;
        if sx.abs() < f64::EPSILON || sy.abs() < f64::EPSILON {
            return None;
        }
        let x = p.x - self.position.x;
        let y = p.y - self.position.y;
        let rad = self.rotation_rad();
        let (si, co) = (rad.sin(), rad.cos());
        let ux = x * co + y * si;
        let uy = -x * si + y * co;
        Some(Point::new(ux / sx + self.anchor.x, uy / sy + self.anchor.y))
    }
}

/// Vertex/tangent data of one vector path in its local space.
///
/// Tangents are relative to their vertex; `(0, 0)` means the vertex has no handle on that side.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PathShape {
    pub vertices: Vec<Point>,
    pub in_tangents: Vec<Vec2>,
    pub out_tangents: Vec<Vec2>,
    #[serde(default)]
    pub closed: bool,
}

impl PathShape {
    /// Corner-only path through `vertices`.
    pub fn polygon(vertices: Vec<Point>, closed: bool) -> Self {
        let n = vertices.len();
        Self {
            vertices,
            in_tangents: vec![Vec2::ZERO; n],
            out_tangents: vec![Vec2::ZERO; n],
            closed,
        }
    }

    /// Check the index-alignment invariant between vertices and both tangent lists.
    pub fn validate(&self) -> AnatomyResult<()> {
        let n = self.vertices.len();
        if self.in_tangents.len() != n || self.out_tangents.len() != n {
            return Err(AnatomyError::validation(format!(
                "path has {n} vertices but {} in-tangents and {} out-tangents",
                self.in_tangents.len(),
                self.out_tangents.len()
            )));
        }
        if self
            .vertices
            .iter()
            .any(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(AnatomyError::validation("path has a non-finite vertex"));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Segment count: wraps around when closed.
    pub fn segment_count(&self) -> usize {
        let n = self.vertices.len();
        if n < 2 {
            0
        } else if self.closed {
            n
        } else {
            n - 1
        }
    }

    /// Endpoint vertex indices of segment `i`.
    pub fn segment(&self, i: usize) -> (usize, usize) {
        (i, (i + 1) % self.vertices.len())
    }

    /// Tangent vector on `side` of vertex `i`.
    pub fn tangent(&self, i: usize, side: TangentSide) -> Vec2 {
        match side {
            TangentSide::In => self.in_tangents[i],
            TangentSide::Out => self.out_tangents[i],
        }
    }

    /// Cubic Bézier form of the path, for inspection and export.
    pub fn to_bez_path(&self) -> BezPath {
        let mut bez = BezPath::new();
        let n = self.vertices.len();
        if n == 0 {
            return bez;
        }
        bez.move_to(self.vertices[0]);
        for s in 0..self.segment_count() {
            let (a, b) = self.segment(s);
            let c1 = self.vertices[a] + self.out_tangents[a];
            let c2 = self.vertices[b] + self.in_tangents[b];
            if self.out_tangents[a] == Vec2::ZERO && self.in_tangents[b] == Vec2::ZERO {
                bez.line_to(self.vertices[b]);
            } else {
                bez.curve_to(c1, c2, self.vertices[b]);
            }
        }
        if self.closed {
            bez.close_path();
        }
        bez
    }
}

/// Which handle of a vertex.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TangentSide {
    In,
    Out,
}

impl TangentSide {
    /// Single-letter tag used in generated names.
    pub fn tag(self) -> char {
        match self {
            Self::In => 'I',
            Self::Out => 'O',
        }
    }
}

/// Bounding box of a point cloud, `None` when empty.
pub fn bounds_of(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
    let mut it = points.into_iter();
    let first = it.next()?;
    let mut r = Rect::from_points(first, first);
    for p in it {
        r = r.union_pt(p);
    }
    Some(r)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
