//! Build and animation options.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{AnatomyError, AnatomyResult};

/// Which construction-geometry layers a build emits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Anchors, handles, outlines, grid and labels only.
    Minimal,
    /// Adds circumcircles, tangents, triangulation, contours, bisectors and diagonal guides.
    #[default]
    Extended,
}

impl Profile {
    pub fn has_constructions(self) -> bool {
        matches!(self, Self::Extended)
    }
}

pub const DEFAULT_FONT: &str = "ArialMT";
pub const DEFAULT_VERTEX_WARNING: usize = 120;

/// Options for one build.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// PostScript font name for labels; whitespace is ignored.
    pub font: String,
    pub profile: Profile,
    /// Builds above this many vertices ask for confirmation first.
    pub vertex_warning_threshold: usize,
    /// Vertical shift of labels relative to their vertex.
    pub label_offset_y: f64,
    pub label_font_size: f64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT.to_string(),
            profile: Profile::Extended,
            vertex_warning_threshold: DEFAULT_VERTEX_WARNING,
            label_offset_y: -14.0,
            label_font_size: 11.0,
        }
    }
}

impl BuildOptions {
    pub fn from_reader<R: std::io::Read>(r: R) -> AnatomyResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| AnatomyError::serde(format!("parse build options JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> AnatomyResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            AnatomyError::serde(format!("open build options '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Font name with whitespace stripped, falling back to the default when nothing is left.
    pub fn font_name(&self) -> String {
        let stripped: String = self.font.chars().filter(|c| !c.is_whitespace()).collect();
        if stripped.is_empty() {
            DEFAULT_FONT.to_string()
        } else {
            stripped
        }
    }
}

/// Options for [`crate::auto_animate`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AutoAnimateOptions {
    /// Seconds from the first to the second Timeline key.
    pub duration: f64,
    pub stagger: f64,
    pub easing: f64,
}

pub const MIN_ANIMATION_DURATION: f64 = 0.1;

impl Default for AutoAnimateOptions {
    fn default() -> Self {
        Self {
            duration: 2.0,
            stagger: 40.0,
            easing: 50.0,
        }
    }
}

impl AutoAnimateOptions {
    /// Clamp to usable ranges; a non-finite duration falls back to the default.
    pub fn normalized(self) -> Self {
        let duration = if self.duration.is_finite() {
            self.duration
        } else {
            Self::default().duration
        };
        Self {
            duration: duration.max(MIN_ANIMATION_DURATION),
            stagger: clamp_percent(self.stagger, Self::default().stagger),
            easing: clamp_percent(self.easing, Self::default().easing),
        }
    }
}

fn clamp_percent(v: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 100.0)
    } else {
        fallback
    }
}
