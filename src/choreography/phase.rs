use crate::expression::context::ControlParameters;
use crate::foundation::error::{AnatomyError, AnatomyResult};
use crate::scene::control::names;

/// Narrowest reveal width once stagger is at its maximum.
pub(crate) const MIN_STAGGER_WIDTH: f64 = 0.01;
/// Easing percent per unit of exponent above linear.
pub(crate) const EASING_DIVISOR: f64 = 25.0;

/// Slice of the 0-100 timeline during which one category reveals.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhaseWindow {
    pub start: f64,
    pub end: f64,
}

impl PhaseWindow {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn span(self) -> f64 {
        self.end - self.start
    }
}

/// Reveal category of a generated element.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Grid,
    Outline,
    Anchor,
    Handle,
    Label,
    Bisector,
    Circumcircle,
    Triangulation,
    Contour,
    Tangent,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Self::Grid,
        Self::Outline,
        Self::Anchor,
        Self::Handle,
        Self::Label,
        Self::Bisector,
        Self::Circumcircle,
        Self::Triangulation,
        Self::Contour,
        Self::Tangent,
    ];

    pub fn window(self) -> PhaseWindow {
        match self {
            Self::Grid => PhaseWindow::new(0.0, 30.0),
            Self::Outline => PhaseWindow::new(10.0, 55.0),
            Self::Anchor => PhaseWindow::new(30.0, 65.0),
            Self::Handle => PhaseWindow::new(50.0, 80.0),
            Self::Label => PhaseWindow::new(65.0, 95.0),
            Self::Bisector => PhaseWindow::new(0.0, 20.0),
            Self::Circumcircle => PhaseWindow::new(15.0, 40.0),
            Self::Triangulation => PhaseWindow::new(25.0, 55.0),
            Self::Contour => PhaseWindow::new(35.0, 65.0),
            Self::Tangent => PhaseWindow::new(40.0, 65.0),
        }
    }

    /// Outlines draw as one piece; everything else staggers per element.
    pub fn staggered(self) -> bool {
        !matches!(self, Self::Outline)
    }

    /// Control that can pin this category's progress.
    pub fn override_control(self) -> Option<&'static str> {
        match self {
            Self::Grid => Some(names::GRID_DRAW),
            Self::Outline => Some(names::OUTLINE_DRAW),
            Self::Anchor => Some(names::ANCHOR_POP),
            Self::Handle => Some(names::HANDLE_POP),
            Self::Label => Some(names::LABEL_POP),
            Self::Bisector
            | Self::Circumcircle
            | Self::Triangulation
            | Self::Contour
            | Self::Tangent => None,
        }
    }
}

/// Position of one element within its category's stagger sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StaggerSlot {
    pub index: usize,
    pub total: usize,
}

impl StaggerSlot {
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }

    /// Normalized position in `0..=1`; a lone element sits at 0.
    pub fn position(self) -> f64 {
        if self.total > 1 {
            self.index as f64 / (self.total - 1) as f64
        } else {
            0.0
        }
    }
}

/// Snapshot of the choreography controls.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChoreographyParameters {
    pub timeline: f64,
    pub stagger: f64,
    pub easing: f64,
    pub grid_draw: f64,
    pub outline_draw: f64,
    pub anchor_pop: f64,
    pub handle_pop: f64,
    pub label_pop: f64,
}

impl Default for ChoreographyParameters {
    fn default() -> Self {
        Self {
            timeline: 100.0,
            stagger: 0.0,
            easing: 50.0,
            grid_draw: 100.0,
            outline_draw: 100.0,
            anchor_pop: 100.0,
            handle_pop: 100.0,
            label_pop: 100.0,
        }
    }
}

impl ChoreographyParameters {
    /// Read every choreography control; a missing or non-scalar control is an error.
    pub fn from_controls(controls: &dyn ControlParameters) -> AnatomyResult<Self> {
        let read = |name: &str| {
            controls
                .get(name)
                .and_then(|v| v.scalar())
                .ok_or_else(|| AnatomyError::evaluation(format!("control '{name}' not found")))
        };
        Ok(Self {
            timeline: read(names::TIMELINE)?,
            stagger: read(names::STAGGER)?,
            easing: read(names::EASING)?,
            grid_draw: read(names::GRID_DRAW)?,
            outline_draw: read(names::OUTLINE_DRAW)?,
            anchor_pop: read(names::ANCHOR_POP)?,
            handle_pop: read(names::HANDLE_POP)?,
            label_pop: read(names::LABEL_POP)?,
        })
    }

    pub fn override_for(&self, category: Category) -> Option<f64> {
        match category {
            Category::Grid => Some(self.grid_draw),
            Category::Outline => Some(self.outline_draw),
            Category::Anchor => Some(self.anchor_pop),
            Category::Handle => Some(self.handle_pop),
            Category::Label => Some(self.label_pop),
            _ => None,
        }
    }
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

/// Category progress before stagger, in `0..=1`.
pub fn raw_progress(params: &ChoreographyParameters, category: Category) -> f64 {
    if let Some(ov) = params.override_for(category)
        && ov < 100.0
    {
        return clamp(ov / 100.0, 0.0, 1.0);
    }
    let tl = clamp(params.timeline, 0.0, 100.0);
    let w = category.window();
    clamp((tl - w.start) / w.span(), 0.0, 1.0)
}

/// Element progress inside the category given its stagger slot.
///
/// A fully revealed category reveals every element regardless of stagger.
pub fn staggered(raw: f64, slot: StaggerSlot, stagger: f64) -> f64 {
    if raw >= 1.0 {
        return 1.0;
    }
    let sg = clamp(stagger, 0.0, 100.0) / 100.0;
    let start = slot.position() * sg;
    let width = (1.0 - sg).max(MIN_STAGGER_WIDTH);
    clamp((raw - start) / width, 0.0, 1.0)
}

/// Ease-out curve; `easing` 0 is linear, higher values punch harder.
pub fn ease(p: f64, easing: f64) -> f64 {
    let e = clamp(easing, 0.0, 100.0);
    let k = 1.0 + e / EASING_DIVISOR;
    1.0 - (1.0 - p).max(0.0).powf(k)
}

/// Eased progress of one element in `0..=1`.
///
/// `slot` is ignored for categories that do not stagger.
pub fn progress(params: &ChoreographyParameters, category: Category, slot: StaggerSlot) -> f64 {
    let raw = raw_progress(params, category);
    let p = if category.staggered() {
        staggered(raw, slot, params.stagger)
    } else {
        raw
    };
    ease(p, params.easing)
}

#[cfg(test)]
#[path = "../../tests/unit/choreography/phase.rs"]
mod tests;
