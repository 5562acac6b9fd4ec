use crate::animation::ease::KeyframeEase;
use crate::animation::keyframes::Keyframe;
use crate::config::AutoAnimateOptions;
use crate::foundation::error::{AnatomyError, AnatomyResult};
use crate::scene::control::{ControlLayer, names};
use crate::scene::document::Document;

/// Temporal ease put on both sides of each auto-animate key.
pub const AUTO_ANIMATE_EASE: KeyframeEase = KeyframeEase::new(0.0, 33.0);

fn controls(doc: &mut Document) -> AnatomyResult<&mut ControlLayer> {
    doc.control_layer_mut()
        .ok_or_else(|| AnatomyError::user_input("control layer not found; build first"))
}

/// Key `Timeline` from 0 at the document time to 100 after `opts.duration` seconds.
#[tracing::instrument(skip(doc))]
pub fn auto_animate(doc: &mut Document, opts: AutoAnimateOptions) -> AnatomyResult<()> {
    let opts = opts.normalized();
    let t = doc.time;
    let controls = controls(doc)?;
    controls.set_scalar(names::STAGGER, opts.stagger)?;
    controls.set_scalar(names::EASING, opts.easing)?;

    let timeline = controls.param_mut(names::TIMELINE)?;
    for (time, value) in [(t, 0.0), (t + opts.duration, 100.0)] {
        timeline
            .keyframes
            .set_key(Keyframe::new(time, value).with_ease(AUTO_ANIMATE_EASE, AUTO_ANIMATE_EASE));
    }
    tracing::info!(start = t, duration = opts.duration, "keyed timeline");
    Ok(())
}

/// Drop all reveal keyframes and restore the fully visible state.
#[tracing::instrument(skip(doc))]
pub fn reset_animation(doc: &mut Document) -> AnatomyResult<()> {
    let controls = controls(doc)?;
    let resets = [
        (names::TIMELINE, 100.0),
        (names::STAGGER, 0.0),
        (names::EASING, 50.0),
    ]
    .into_iter()
    .chain(names::OVERRIDES.into_iter().map(|n| (n, 100.0)));
    for (name, value) in resets {
        controls.param_mut(name)?.keyframes.clear();
        controls.set_scalar(name, value)?;
    }
    tracing::info!("reset animation");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/ops/animate.rs"]
mod tests;
