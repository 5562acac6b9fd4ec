use std::borrow::Cow;
use std::collections::BTreeMap;

use super::*;
use crate::expression::address::FrameAddr;
use crate::expression::context::{ControlValue, EvalContext, SourceGeometry};
use crate::expression::eval::{Value, label_text as numeric_label};
use crate::foundation::core::{AffineFrame, PathShape, Point, Vec2};
use crate::geometry::WorldPath;
use crate::geometry::bisector::perpendicular_bisector;
use crate::geometry::circle::circumcircle;
use crate::geometry::tangent::tangent_ray;
use crate::source::discover::discover_paths;
use crate::source::model::{Content, SourceLayer};
use crate::transform::affine::to_world;

fn star() -> PathShape {
    PathShape {
        vertices: vec![
            Point::new(0.0, -50.0),
            Point::new(47.5, -15.5),
            Point::new(29.4, 40.5),
            Point::new(-29.4, 40.5),
            Point::new(-47.5, -15.5),
        ],
        in_tangents: vec![
            Vec2::new(-12.0, 0.0),
            Vec2::ZERO,
            Vec2::new(9.0, 6.5),
            Vec2::ZERO,
            Vec2::new(0.0, 3.0),
        ],
        out_tangents: vec![
            Vec2::new(12.0, 0.0),
            Vec2::new(0.0, 20.0),
            Vec2::ZERO,
            Vec2::new(-7.25, 1.0),
            Vec2::ZERO,
        ],
        closed: true,
    }
}

fn layer() -> SourceLayer {
    SourceLayer {
        name: "Logo".to_string(),
        transform: AffineFrame {
            anchor: Vec2::new(10.0, -4.0),
            position: Vec2::new(960.0, 540.0),
            scale_pct: Vec2::new(80.0, 120.0),
            rotation_deg: 17.0,
        },
        contents: vec![
            Content::group(
                "Outer",
                AffineFrame {
                    anchor: Vec2::new(2.0, 3.0),
                    position: Vec2::new(-40.0, 25.0),
                    scale_pct: Vec2::new(150.0, 90.0),
                    rotation_deg: -38.5,
                },
                vec![Content::path("Star", star())],
            ),
            Content::path(
                "Tail",
                PathShape::polygon(
                    vec![
                        Point::new(0.0, 0.0),
                        Point::new(80.0, 0.0),
                        Point::new(160.0, 0.0),
                    ],
                    false,
                ),
            ),
        ],
    }
}

fn controls() -> BTreeMap<String, ControlValue> {
    let mut c = BTreeMap::new();
    c.insert(
        names::LABELS_OFFSET.to_string(),
        ControlValue::Point([3.0, -2.0]),
    );
    c.insert(names::TANGENT_LENGTH.to_string(), ControlValue::Scalar(200.0));
    c.insert(names::BISECTOR_LENGTH.to_string(), ControlValue::Scalar(120.0));
    c.insert(names::CONTOUR_COUNT.to_string(), ControlValue::Scalar(2.0));
    c.insert(names::CONTOUR_SPACING.to_string(), ControlValue::Scalar(8.0));
    c
}

fn eval(f: &Formula, snapshot: &SourceSnapshot) -> Value {
    let c = controls();
    f.evaluate(&EvalContext::new(&c, snapshot)).unwrap()
}

fn vector(f: &Formula, snapshot: &SourceSnapshot) -> [f64; 2] {
    eval(f, snapshot).as_vector().unwrap()
}

fn path(f: &Formula, snapshot: &SourceSnapshot) -> PathShape {
    eval(f, snapshot).as_path().unwrap().clone()
}

fn arr(p: Point) -> [f64; 2] {
    [p.x, p.y]
}

#[test]
fn vertex_and_handle_positions_match_numeric_transform() {
    let snap = discover_paths(Some(&layer())).unwrap();
    let desc = &snap.paths[0];
    let src = VertexSource::live(&snap, desc);
    let world = WorldPath::from_descriptor(&snap, desc);
    let (chain, owner) = snap.chain(desc);

    for vi in 0..desc.shape.len() {
        assert_eq!(vector(&vertex_position(&src, vi), &snap), arr(world.points[vi]));
        let tip = desc.shape.vertices[vi] + desc.shape.out_tangents[vi];
        let expected = to_world(tip, &chain, owner);
        assert_eq!(
            vector(&handle_position(&src, vi, TangentSide::Out), &snap),
            arr(expected)
        );
    }

    let line = path(&handle_line_path(&src, 0, TangentSide::In), &snap);
    let tip = to_world(desc.shape.vertices[0] + desc.shape.in_tangents[0], &chain, owner);
    assert_eq!(line.vertices, vec![world.points[0], tip]);
    assert!(!line.closed);
}

#[test]
fn outline_reproduces_world_path() {
    let snap = discover_paths(Some(&layer())).unwrap();
    let src = VertexSource::live(&snap, &snap.paths[0]);
    let world = WorldPath::from_descriptor(&snap, &snap.paths[0]);

    let out = path(&outline_path(&src), &snap);
    assert!(out.closed);
    assert_eq!(out.vertices, world.points);
    assert_eq!(out.in_tangents, world.in_tangents);
    assert_eq!(out.out_tangents, world.out_tangents);
}

#[test]
fn grid_lines_span_the_extents() {
    let snap = discover_paths(Some(&layer())).unwrap();
    let src = VertexSource::live(&snap, &snap.paths[1]);
    let world = WorldPath::from_descriptor(&snap, &snap.paths[1]);
    let extents = GridExtents::from_points(&snap.all_world_vertices()).unwrap();

    let v = path(&grid_vertical_path(&src, 1, &extents), &snap);
    assert_eq!(
        v.vertices,
        vec![
            Point::new(world.points[1].x, extents.y_min),
            Point::new(world.points[1].x, extents.y_max)
        ]
    );
    let h = path(&grid_horizontal_path(&src, 2, &extents), &snap);
    assert_eq!(
        h.vertices,
        vec![
            Point::new(extents.x_min, world.points[2].y),
            Point::new(extents.x_max, world.points[2].y)
        ]
    );
}

#[test]
fn circumcircle_formulas_match_numeric_circle() {
    let snap = discover_paths(Some(&layer())).unwrap();
    let src = VertexSource::live(&snap, &snap.paths[0]);
    let world = WorldPath::from_descriptor(&snap, &snap.paths[0]);

    let c = circumcircle(world.points[0], world.points[2], world.points[4]);
    assert_eq!(
        vector(&circumcircle_center(&src, [0, 2, 4]), &snap),
        arr(c.center)
    );
    assert_eq!(
        vector(&circumcircle_size(&src, [0, 2, 4]), &snap),
        [c.radius * 2.0, c.radius * 2.0]
    );
}

#[test]
fn collinear_circumcircle_collapses_to_zero() {
    let snap = discover_paths(Some(&layer())).unwrap();
    let src = VertexSource::live(&snap, &snap.paths[1]);
    assert_eq!(
        vector(&circumcircle_center(&src, [0, 1, 2]), &snap),
        [0.0, 0.0]
    );
    assert_eq!(vector(&circumcircle_size(&src, [0, 1, 2]), &snap), [0.0, 0.0]);
}

#[test]
fn tangent_ray_matches_numeric_ray() {
    let snap = discover_paths(Some(&layer())).unwrap();
    let desc = &snap.paths[0];
    let src = VertexSource::live(&snap, desc);
    let world = WorldPath::from_descriptor(&snap, desc);
    let (chain, owner) = snap.chain(desc);

    let tip = to_world(desc.shape.vertices[1] + desc.shape.out_tangents[1], &chain, owner);
    let (a, b) = tangent_ray(world.points[1], tip, 200.0);
    let ray = path(&tangent_ray_path(&src, 1, TangentSide::Out), &snap);
    assert_eq!(ray.vertices, vec![a, b]);

    // No handle on that side: zero-length ray at the vertex.
    let flat = path(&tangent_ray_path(&src, 1, TangentSide::In), &snap);
    assert_eq!(flat.vertices, vec![world.points[1], world.points[1]]);
}

#[test]
fn bisector_matches_numeric_bisector() {
    let snap = discover_paths(Some(&layer())).unwrap();
    let src = VertexSource::live(&snap, &snap.paths[0]);
    let world = WorldPath::from_descriptor(&snap, &snap.paths[0]);

    let (a, b) = perpendicular_bisector(world.points[2], world.points[3], 120.0);
    let got = path(&bisector_path(&src, 2, 3), &snap);
    assert_eq!(got.vertices, vec![a, b]);

    let degenerate = path(&bisector_path(&src, 2, 2), &snap);
    assert_eq!(degenerate.vertices[0], degenerate.vertices[1]);
}

#[test]
fn labels_round_and_offset() {
    let snap = discover_paths(Some(&layer())).unwrap();
    let src = VertexSource::live(&snap, &snap.paths[0]);
    let world = WorldPath::from_descriptor(&snap, &snap.paths[0]);
    let p = world.points[3];

    let text = eval(&label_text(&src, 3), &snap);
    assert_eq!(text.as_text().unwrap(), numeric_label(p.x, p.y));

    let pos = vector(&label_position(&src, 3, -14.0), &snap);
    assert_eq!(pos, [p.x + 3.0, p.y + -2.0 - 14.0]);
}

#[test]
fn contour_controls() {
    let snap = discover_paths(Some(&layer())).unwrap();
    let scalar = |f: Formula| eval(&f, &snap).as_scalar().unwrap();
    assert_eq!(scalar(contour_offset(1)), 20.0);
    assert_eq!(scalar(contour_opacity(0)), 25.0);
    assert_eq!(scalar(contour_opacity(1)), 15.0);
    assert_eq!(scalar(contour_opacity(2)), 0.0);
}

struct Frozen(PathShape);

impl SourceGeometry for Frozen {
    fn path(&self, addr: &PathAddr) -> Option<Cow<'_, PathShape>> {
        matches!(addr, PathAddr::Generated { .. }).then(|| Cow::Borrowed(&self.0))
    }

    fn frame(&self, _addr: &FrameAddr) -> Option<AffineFrame> {
        None
    }
}

#[test]
fn frozen_source_reads_display_space_directly() {
    let shape = star();
    let geo = Frozen(shape.clone());
    let src = VertexSource::Frozen {
        addr: PathAddr::Generated {
            layer: "PP_Outlines".to_string(),
            group: "O0".to_string(),
        },
        len: shape.len(),
        closed: true,
    };
    let c = controls();
    let ctx = EvalContext::new(&c, &geo);

    let p = vertex_position(&src, 2).evaluate(&ctx).unwrap();
    assert_eq!(p.as_vector().unwrap(), arr(shape.vertices[2]));
    let tip = handle_position(&src, 0, TangentSide::Out)
        .evaluate(&ctx)
        .unwrap();
    assert_eq!(tip.as_vector().unwrap(), [12.0, -50.0]);
    let out = outline_path(&src).evaluate(&ctx).unwrap();
    assert_eq!(out.as_path().unwrap(), &shape);
    assert!(!vertex_position(&src, 0).to_source().contains("transform"));
}

#[test]
fn geometry_bindings_cover_each_source_slot() {
    let snap = discover_paths(Some(&layer())).unwrap();
    let src = VertexSource::live(&snap, &snap.paths[0]);
    let params = GeometryParams {
        extents: GridExtents::from_points(&snap.all_world_vertices()).unwrap(),
        label_offset_y: -14.0,
    };
    let slots = |id| -> Vec<Slot> {
        geometry_bindings(id, &src, &params)
            .into_iter()
            .map(|(s, _)| s)
            .collect()
    };
    assert_eq!(
        slots(ElementId::Label { path: 0, vertex: 1 }),
        vec![Slot::Text, Slot::Position]
    );
    assert_eq!(
        slots(ElementId::Circumcircle {
            path: 0,
            i: 0,
            j: 1,
            k: 2
        }),
        vec![Slot::Position, Slot::Size]
    );
    assert_eq!(slots(ElementId::Contour { path: 0, level: 2 }), vec![Slot::Path]);
    assert!(slots(ElementId::DiagonalGuide { index: 0 }).is_empty());
}
