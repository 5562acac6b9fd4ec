use super::*;
use crate::animation::keyframes::Keyframe;

#[test]
fn defaults_depend_on_profile() {
    let ext = ControlLayer::with_defaults(Profile::Extended);
    let min = ControlLayer::with_defaults(Profile::Minimal);
    assert_eq!(
        ext.value_at(GRID_OPACITY, 0.0),
        Some(ControlValue::Scalar(8.0))
    );
    assert_eq!(
        min.value_at(GRID_OPACITY, 0.0),
        Some(ControlValue::Scalar(40.0))
    );
    assert!(ext.param(TANGENT_LENGTH).is_some());
    assert!(min.param(TANGENT_LENGTH).is_none());
    assert_eq!(
        ext.value_at(SHOW_GRID, 0.0),
        Some(ControlValue::Checkbox(true))
    );
    assert_eq!(
        ext.value_at(LABELS_OFFSET, 0.0),
        Some(ControlValue::Point([0.0, 0.0]))
    );
    for name in OVERRIDES {
        assert_eq!(ext.value_at(name, 0.0), Some(ControlValue::Scalar(100.0)));
    }
}

#[test]
fn keyframes_drive_scalar_reads() {
    let mut layer = ControlLayer::with_defaults(Profile::Minimal);
    let p = layer.param_mut(TIMELINE).unwrap();
    p.keyframes.set_key(Keyframe::new(0.0, 0.0));
    p.keyframes.set_key(Keyframe::new(2.0, 100.0));
    let view = layer.at(1.0);
    assert_eq!(view.get(TIMELINE), Some(ControlValue::Scalar(50.0)));
    assert_eq!(layer.at(9.0).get(TIMELINE), Some(ControlValue::Scalar(100.0)));
}

#[test]
fn set_scalar_rejects_non_sliders_and_unknown_names() {
    let mut layer = ControlLayer::with_defaults(Profile::Extended);
    assert!(layer.set_scalar(STAGGER, 30.0).is_ok());
    assert_eq!(layer.value_at(STAGGER, 0.0), Some(ControlValue::Scalar(30.0)));
    assert!(layer.set_scalar(SHOW_GRID, 1.0).is_err());
    assert!(layer.set_scalar("Nope", 1.0).is_err());
}
