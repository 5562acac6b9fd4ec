use crate::foundation::core::{Point, Vec2};

/// Determinant threshold below which three points count as collinear.
pub(crate) const COLLINEAR_EPS: f64 = 0.001;

/// Length below which a direction vector is treated as zero.
pub(crate) const DIRECTION_EPS: f64 = 0.001;

pub(crate) fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

pub(crate) fn length(v: Vec2) -> f64 {
    v.x.hypot(v.y)
}

pub(crate) fn distance(a: Point, b: Point) -> f64 {
    length(b - a)
}

pub(crate) fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Signed doubled area of triangle `abc` (the 2x2 determinant used for both area and orientation).
pub(crate) fn doubled_area(a: Point, b: Point, c: Point) -> f64 {
    a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y)
}

/// Segment direction in degrees, `atan2` convention in `(-180, 180]`.
pub(crate) fn angle_deg(a: Point, b: Point) -> f64 {
    (b.y - a.y).atan2(b.x - a.x).to_degrees()
}

/// Fold an angle into `(-90, 90]` so a line and its reverse compare equal.
pub(crate) fn fold_line_angle(mut deg: f64) -> f64 {
    while deg <= -90.0 {
        deg += 180.0;
    }
    while deg > 90.0 {
        deg -= 180.0;
    }
    deg
}

/// Unit direction of `v`, or zero when `v` is too short to carry a direction.
pub(crate) fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = length(v);
    if len > DIRECTION_EPS {
        Vec2::new(v.x / len, v.y / len)
    } else {
        Vec2::ZERO
    }
}
