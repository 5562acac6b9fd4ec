use super::*;

fn ramp() -> Keyframes {
    Keyframes {
        keys: vec![Keyframe::new(1.0, 0.0), Keyframe::new(3.0, 100.0)],
        mode: InterpMode::Linear,
    }
}

#[test]
fn sample_clamps_outside_the_keys() {
    let k = ramp();
    assert_eq!(k.sample(0.0), Some(0.0));
    assert_eq!(k.sample(5.0), Some(100.0));
    assert_eq!(k.sample(2.0), Some(50.0));
}

#[test]
fn hold_mode_keeps_left_value() {
    let mut k = ramp();
    k.mode = InterpMode::Hold;
    assert_eq!(k.sample(2.9), Some(0.0));
    assert_eq!(k.sample(3.0), Some(100.0));
}

#[test]
fn empty_curve_has_no_value() {
    assert_eq!(Keyframes::default().sample(1.0), None);
}

#[test]
fn eased_segment_lags_then_catches_up() {
    let ease = KeyframeEase::new(0.0, 33.0);
    let k = Keyframes {
        keys: vec![
            Keyframe::new(0.0, 0.0).with_ease(ease, ease),
            Keyframe::new(2.0, 100.0).with_ease(ease, ease),
        ],
        mode: InterpMode::Linear,
    };
    let early = k.sample(0.2).unwrap();
    assert!(early > 0.0 && early < 10.0);
    assert!((k.sample(1.0).unwrap() - 50.0).abs() < 1e-6);
}

#[test]
fn set_key_keeps_order_and_replaces_same_time() {
    let mut k = ramp();
    k.set_key(Keyframe::new(2.0, 7.0));
    k.set_key(Keyframe::new(3.0, 42.0));
    k.set_key(Keyframe::new(0.5, -1.0));
    let times: Vec<f64> = k.keys.iter().map(|k| k.time).collect();
    assert_eq!(times, vec![0.5, 1.0, 2.0, 3.0]);
    assert_eq!(k.keys[3].value, 42.0);
    assert!(k.validate().is_ok());
}

#[test]
fn validate_rejects_unsorted_keys() {
    let k = Keyframes {
        keys: vec![Keyframe::new(3.0, 0.0), Keyframe::new(1.0, 1.0)],
        mode: InterpMode::Linear,
    };
    assert!(k.validate().is_err());
}
