use super::*;
use crate::foundation::core::PathShape;

#[test]
fn bisector_is_perpendicular_through_midpoint() {
    let (a, b) = perpendicular_bisector(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 5.0);
    assert_eq!(a, Point::new(5.0, -5.0));
    assert_eq!(b, Point::new(5.0, 5.0));
}

#[test]
fn zero_length_segment_collapses_to_midpoint() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(perpendicular_bisector(p, p, 120.0), (p, p));
}

#[test]
fn selection_skips_short_and_axis_aligned_segments() {
    let shape = PathShape::polygon(
        vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(160.0, 80.0),
            Point::new(162.0, 82.0),
            Point::new(162.0, 200.0),
        ],
        false,
    );
    let paths = vec![WorldPath::from_world_shape(0, &shape)];
    let picks = select_bisectors(&paths);
    assert_eq!(picks.len(), 1);
    assert_eq!((picks[0].a, picks[0].b), (1, 2));
    assert!((picks[0].length - 100.0).abs() < 1e-9);
}

#[test]
fn closed_paths_include_the_wrap_segment() {
    let shape = PathShape::polygon(
        vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 30.0),
            Point::new(40.0, 120.0),
        ],
        true,
    );
    let paths = vec![WorldPath::from_world_shape(0, &shape)];
    let picks = select_bisectors(&paths);
    assert_eq!(picks.len(), 3);
    assert!(picks.iter().any(|p| (p.a, p.b) == (2, 0)));
    assert!(picks.windows(2).all(|w| w[0].length >= w[1].length));
}
