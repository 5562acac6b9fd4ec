/// Temporal ease on one side of a keyframe, in the host's speed/influence terms.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyframeEase {
    /// Value units per second at the key.
    pub speed: f64,
    /// Percentage of the segment the handle reaches into, `0..=100`.
    pub influence: f64,
}

impl KeyframeEase {
    pub const fn new(speed: f64, influence: f64) -> Self {
        Self { speed, influence }
    }
}

/// Progress curve applied across one keyframe segment.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    /// Unit cubic bezier from `(0, 0)` to `(1, 1)`.
    Bezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

const BEZIER_ITERATIONS: usize = 48;

impl Ease {
    /// Segment curve from the outgoing ease of the left key and the incoming ease of the right key.
    ///
    /// `dt` and `dv` are the segment's duration and value change; a missing side behaves linearly.
    pub fn segment(
        out: Option<KeyframeEase>,
        incoming: Option<KeyframeEase>,
        dt: f64,
        dv: f64,
    ) -> Self {
        if out.is_none() && incoming.is_none() {
            return Self::Linear;
        }
        let slope = |e: KeyframeEase| {
            if dv == 0.0 { 0.0 } else { e.speed * dt / dv }
        };
        let (x1, y1) = match out {
            Some(e) => {
                let x = (e.influence / 100.0).clamp(0.0, 1.0);
                (x, x * slope(e))
            }
            None => (1.0 / 3.0, 1.0 / 3.0),
        };
        let (x2, y2) = match incoming {
            Some(e) => {
                let x = (e.influence / 100.0).clamp(0.0, 1.0);
                (1.0 - x, 1.0 - x * slope(e))
            }
            None => (2.0 / 3.0, 2.0 / 3.0),
        };
        Self::Bezier { x1, y1, x2, y2 }
    }

    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Bezier { x1, y1, x2, y2 } => {
                let s = solve_bezier_x(x1, x2, t);
                cubic(y1, y2, s)
            }
        }
    }
}

fn cubic(p1: f64, p2: f64, s: f64) -> f64 {
    let u = 1.0 - s;
    3.0 * u * u * s * p1 + 3.0 * u * s * s * p2 + s * s * s
}

/// Bezier parameter whose x equals `x`; x is monotone for control x in `0..=1`.
fn solve_bezier_x(x1: f64, x2: f64, x: f64) -> f64 {
    let (mut lo, mut hi) = (0.0, 1.0);
    for _ in 0..BEZIER_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        if cubic(x1, x2, mid) < x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
