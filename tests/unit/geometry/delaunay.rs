use super::*;
use crate::foundation::core::PathShape;

fn square(closed: bool) -> WorldPath {
    let shape = PathShape::polygon(
        vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ],
        closed,
    );
    WorldPath::from_world_shape(0, &shape)
}

#[test]
fn square_gives_two_triangles_and_one_diagonal() {
    let sq = square(true);
    assert_eq!(triangulate(&sq.points).len(), 2);
    let diags = path_diagonals(&sq);
    assert_eq!(diags.len(), 1);
    let d = diags[0];
    assert!(d.b - d.a == 2);
    assert!((d.length - 100.0 * 2f64.sqrt()).abs() < 1e-9);
}

#[test]
fn open_path_counts_the_closing_edge_as_a_diagonal() {
    let diags = path_diagonals(&square(false));
    assert!(diags.iter().any(|d| (d.a, d.b) == (0, 3)));
}

#[test]
fn too_few_points_triangulate_to_nothing() {
    assert!(triangulate(&[]).is_empty());
    assert!(triangulate(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).is_empty());
}

#[test]
fn triangles_only_reference_input_points() {
    let pts: Vec<Point> = (0..12)
        .map(|i| {
            let a = i as f64 * std::f64::consts::TAU / 12.0;
            Point::new(50.0 * a.cos() + (i % 3) as f64, 50.0 * a.sin())
        })
        .collect();
    let tris = triangulate(&pts);
    assert!(!tris.is_empty());
    assert!(tris.iter().flatten().all(|&i| i < pts.len()));
}

#[test]
fn selection_sorts_by_length_and_caps() {
    let blob = |index: usize| {
        let shape = PathShape::polygon(
            (0..12)
                .map(|i| {
                    let a = i as f64 * std::f64::consts::TAU / 12.0 + index as f64 * 0.1;
                    let r = 50.0 + ((i * 37 + index * 5) % 11) as f64 * 3.0;
                    Point::new(r * a.cos() + index as f64 * 400.0, r * a.sin())
                })
                .collect(),
            true,
        );
        WorldPath::from_world_shape(index, &shape)
    };
    let paths: Vec<WorldPath> = (0..3).map(blob).collect();
    let diags = select_diagonals(&paths);
    assert_eq!(diags.len(), DIAGONAL_CAP);
    assert!(diags.windows(2).all(|w| w[0].length >= w[1].length));
}
