use super::*;

fn square(offset: f64) -> PathShape {
    PathShape::polygon(
        vec![
            Point::new(offset, offset),
            Point::new(offset + 10.0, offset),
            Point::new(offset + 10.0, offset + 10.0),
            Point::new(offset, offset + 10.0),
        ],
        true,
    )
}

fn layer() -> SourceLayer {
    SourceLayer {
        name: "Logo".to_string(),
        transform: AffineFrame {
            position: Vec2::new(100.0, 0.0),
            ..AffineFrame::identity()
        },
        contents: vec![
            Content::group(
                "Outer",
                AffineFrame {
                    position: Vec2::new(0.0, 50.0),
                    ..AffineFrame::identity()
                },
                vec![
                    Content::path("A", square(0.0)),
                    Content::Other {
                        name: "Fill 1".to_string(),
                    },
                    Content::group(
                        "Inner",
                        AffineFrame {
                            scale_pct: Vec2::new(200.0, 200.0),
                            ..AffineFrame::identity()
                        },
                        vec![Content::path("B", square(1.0))],
                    ),
                ],
            ),
            Content::path("C", square(2.0)),
        ],
    }
}

#[test]
fn absent_layer_is_empty_not_error() {
    let snap = discover_paths(None).unwrap();
    assert!(snap.is_empty());
    assert_eq!(snap.total_vertices(), 0);
}

#[test]
fn discovery_is_depth_first_pre_order() {
    let src = layer();
    let snap = discover_paths(Some(&src)).unwrap();
    let names: Vec<&str> = snap.paths.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);
    let indices: Vec<usize> = snap.paths.iter().map(|p| p.index).collect();
    assert_eq!(indices, [0, 1, 2]);
    assert_eq!(snap.total_vertices(), 12);
}

#[test]
fn ancestors_are_innermost_first() {
    let src = layer();
    let snap = discover_paths(Some(&src)).unwrap();
    let b = &snap.paths[1];
    let addrs: Vec<String> = snap
        .frames
        .entries(&b.ancestors)
        .map(|e| e.addr.to_string())
        .collect();
    assert_eq!(addrs, ["Logo/Outer/Inner", "Logo/Outer"]);
    assert_eq!(
        b.address,
        PathAddr::Source {
            layer: "Logo".to_string(),
            groups: vec!["Outer".to_string(), "Inner".to_string()],
            path: "B".to_string(),
        }
    );
    assert!(snap.paths[2].ancestors.is_empty());
}

#[test]
fn world_vertices_compose_the_chain() {
    let src = layer();
    let snap = discover_paths(Some(&src)).unwrap();
    // (1,1) scaled x2 by Inner, +50y by Outer, +100x by the layer.
    assert_eq!(snap.world_vertex(&snap.paths[1], 0), Point::new(102.0, 52.0));
    assert_eq!(snap.world_vertex(&snap.paths[2], 0), Point::new(102.0, 2.0));
    assert_eq!(snap.all_world_vertices().len(), 12);
}

#[test]
fn misaligned_tangents_are_rejected() {
    let mut shape = square(0.0);
    shape.in_tangents.pop();
    let src = SourceLayer {
        name: "Bad".to_string(),
        transform: AffineFrame::identity(),
        contents: vec![Content::path("P", shape)],
    };
    assert!(matches!(
        discover_paths(Some(&src)),
        Err(AnatomyError::Validation(_))
    ));
}

#[test]
fn duplicate_sibling_names_are_rejected() {
    let src = SourceLayer {
        name: "Twins".to_string(),
        transform: AffineFrame::identity(),
        contents: vec![
            Content::path("P", square(0.0)),
            Content::path("P", square(500.0)),
        ],
    };
    let err = discover_paths(Some(&src)).unwrap_err();
    assert!(matches!(err, AnatomyError::Validation(_)));
    assert!(err.to_string().contains("'P'"));

    let nested = SourceLayer {
        name: "Twins".to_string(),
        transform: AffineFrame::identity(),
        contents: vec![Content::group(
            "G",
            AffineFrame::identity(),
            vec![
                Content::group("Inner", AffineFrame::identity(), vec![]),
                Content::group("Inner", AffineFrame::identity(), vec![]),
            ],
        )],
    };
    assert!(matches!(
        discover_paths(Some(&nested)),
        Err(AnatomyError::Validation(_))
    ));
}

#[test]
fn same_name_in_different_groups_is_allowed() {
    let src = SourceLayer {
        name: "Cousins".to_string(),
        transform: AffineFrame::identity(),
        contents: vec![
            Content::group(
                "Left",
                AffineFrame::identity(),
                vec![Content::path("P", square(0.0))],
            ),
            Content::group(
                "Right",
                AffineFrame::identity(),
                vec![Content::path("P", square(500.0))],
            ),
        ],
    };
    let snap = discover_paths(Some(&src)).unwrap();
    assert_eq!(snap.paths.len(), 2);
    assert_ne!(snap.paths[0].address, snap.paths[1].address);
}
