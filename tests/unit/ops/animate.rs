use super::*;
use crate::config::Profile;
use crate::expression::context::ControlValue;
use crate::scene::document::Layer;

fn doc_at(time: f64) -> Document {
    let mut doc = Document::new(vec![Layer::Control(ControlLayer::with_defaults(
        Profile::Extended,
    ))]);
    doc.time = time;
    doc
}

fn scalar(doc: &Document, name: &str, time: f64) -> f64 {
    doc.control_layer()
        .unwrap()
        .value_at(name, time)
        .and_then(ControlValue::scalar)
        .unwrap()
}

#[test]
fn auto_animate_keys_the_timeline_from_the_current_time() {
    let mut doc = doc_at(1.0);
    auto_animate(
        &mut doc,
        AutoAnimateOptions {
            duration: 2.0,
            stagger: 30.0,
            easing: 70.0,
        },
    )
    .unwrap();

    let timeline = doc
        .control_layer()
        .unwrap()
        .param(names::TIMELINE)
        .unwrap();
    let keys = &timeline.keyframes.keys;
    assert_eq!(keys.len(), 2);
    assert_eq!((keys[0].time, keys[0].value), (1.0, 0.0));
    assert_eq!((keys[1].time, keys[1].value), (3.0, 100.0));
    assert_eq!(keys[0].ease_out, Some(AUTO_ANIMATE_EASE));
    assert_eq!(keys[1].ease_in, Some(AUTO_ANIMATE_EASE));

    assert_eq!(scalar(&doc, names::TIMELINE, 0.5), 0.0);
    assert_eq!(scalar(&doc, names::TIMELINE, 5.0), 100.0);
    let mid = scalar(&doc, names::TIMELINE, 2.0);
    assert!(mid > 0.0 && mid < 100.0);
    assert_eq!(scalar(&doc, names::STAGGER, 0.0), 30.0);
    assert_eq!(scalar(&doc, names::EASING, 0.0), 70.0);
}

#[test]
fn auto_animate_clamps_its_options() {
    let mut doc = doc_at(0.0);
    auto_animate(
        &mut doc,
        AutoAnimateOptions {
            duration: 0.0,
            stagger: 500.0,
            easing: -1.0,
        },
    )
    .unwrap();
    let keys = &doc
        .control_layer()
        .unwrap()
        .param(names::TIMELINE)
        .unwrap()
        .keyframes
        .keys;
    assert_eq!(keys[1].time, 0.1);
    assert_eq!(scalar(&doc, names::STAGGER, 0.0), 100.0);
    assert_eq!(scalar(&doc, names::EASING, 0.0), 0.0);
}

#[test]
fn reset_restores_the_fully_visible_state() {
    let mut doc = doc_at(0.0);
    auto_animate(&mut doc, AutoAnimateOptions::default()).unwrap();
    let controls = doc.control_layer_mut().unwrap();
    controls.set_scalar(names::ANCHOR_POP, 20.0).unwrap();

    reset_animation(&mut doc).unwrap();
    let controls = doc.control_layer().unwrap();
    assert!(controls.param(names::TIMELINE).unwrap().keyframes.is_empty());
    assert_eq!(scalar(&doc, names::TIMELINE, 0.0), 100.0);
    assert_eq!(scalar(&doc, names::STAGGER, 0.0), 0.0);
    assert_eq!(scalar(&doc, names::EASING, 0.0), 50.0);
    for name in names::OVERRIDES {
        assert_eq!(scalar(&doc, name, 0.0), 100.0);
    }
}

#[test]
fn animation_needs_a_control_layer() {
    let mut doc = Document::default();
    let err = auto_animate(&mut doc, AutoAnimateOptions::default()).unwrap_err();
    assert!(matches!(err, AnatomyError::UserInput(_)));
    let err = reset_animation(&mut doc).unwrap_err();
    assert!(matches!(err, AnatomyError::UserInput(_)));
}
