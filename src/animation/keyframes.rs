use crate::animation::ease::{Ease, KeyframeEase};
use crate::foundation::error::{AnatomyError, AnatomyResult};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Composition time in seconds.
    pub time: f64,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease_in: Option<KeyframeEase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease_out: Option<KeyframeEase>,
}

impl Keyframe {
    pub fn new(time: f64, value: f64) -> Self {
        Self {
            time,
            value,
            ease_in: None,
            ease_out: None,
        }
    }

    pub fn with_ease(mut self, ease_in: KeyframeEase, ease_out: KeyframeEase) -> Self {
        self.ease_in = Some(ease_in);
        self.ease_out = Some(ease_out);
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpMode {
    Hold,
    #[default]
    Linear,
}

/// Scalar animation curve.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframes {
    pub keys: Vec<Keyframe>, // sorted by time
    #[serde(default)]
    pub mode: InterpMode,
}

impl Keyframes {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn validate(&self) -> AnatomyResult<()> {
        if self.keys.iter().any(|k| !k.time.is_finite() || !k.value.is_finite()) {
            return Err(AnatomyError::validation("keyframe time and value must be finite"));
        }
        if !self.keys.windows(2).all(|w| w[0].time <= w[1].time) {
            return Err(AnatomyError::validation("keyframes must be sorted by time"));
        }
        Ok(())
    }

    /// Insert `key`, replacing any key at the same time.
    pub fn set_key(&mut self, key: Keyframe) {
        let idx = self.keys.partition_point(|k| k.time < key.time);
        match self.keys.get_mut(idx) {
            Some(existing) if existing.time == key.time => *existing = key,
            _ => self.keys.insert(idx, key),
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Value at `time`; `None` when there are no keys.
    pub fn sample(&self, time: f64) -> Option<f64> {
        let first = self.keys.first()?;
        let idx = self.keys.partition_point(|k| k.time <= time);

        if idx == 0 {
            return Some(first.value);
        }
        if idx >= self.keys.len() {
            return self.keys.last().map(|k| k.value);
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let dt = b.time - a.time;
        if dt <= 0.0 {
            return Some(a.value);
        }
        match self.mode {
            InterpMode::Hold => Some(a.value),
            InterpMode::Linear => {
                let dv = b.value - a.value;
                let ease = Ease::segment(a.ease_out, b.ease_in, dt, dv);
                let te = ease.apply((time - a.time) / dt);
                Some(a.value + dv * te)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframes.rs"]
mod tests;
