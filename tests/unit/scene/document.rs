use super::*;
use crate::config::BuildOptions;
use crate::expression::context::ControlValue;
use crate::foundation::core::{Point, Vec2};
use crate::plan::emit::plan_scene;
use crate::scene::control::names;
use crate::source::discover::discover_paths;

fn logo() -> SourceLayer {
    SourceLayer {
        name: "Logo".to_string(),
        transform: AffineFrame {
            position: Vec2::new(200.0, 100.0),
            ..AffineFrame::identity()
        },
        contents: vec![Content::group(
            "Group 1",
            AffineFrame {
                rotation_deg: 30.0,
                scale_pct: Vec2::new(120.0, 120.0),
                ..AffineFrame::identity()
            },
            vec![Content::path(
                "Path 1",
                PathShape::polygon(
                    vec![
                        Point::new(0.0, 0.0),
                        Point::new(100.0, 0.0),
                        Point::new(100.0, 80.0),
                        Point::new(0.0, 80.0),
                    ],
                    true,
                ),
            )],
        )],
    }
}

fn built() -> Document {
    let source = logo();
    let snap = discover_paths(Some(&source)).unwrap();
    let plan = plan_scene(&snap, &BuildOptions::default()).unwrap();
    let mut layers = vec![Layer::Source(source), Layer::Control(plan.controls)];
    layers.extend(plan.layers.into_iter().map(Layer::Generated));
    Document::new(layers)
}

#[test]
fn live_reads_resolve_through_the_layer_stack() {
    let doc = built();
    let addr = PathAddr::Source {
        layer: "Logo".to_string(),
        groups: vec!["Group 1".to_string()],
        path: "Path 1".to_string(),
    };
    assert_eq!(doc.path(&addr).unwrap().len(), 4);

    let group = FrameAddr::Group {
        layer: "Logo".to_string(),
        groups: vec!["Group 1".to_string()],
    };
    assert_eq!(doc.frame(&group).unwrap().rotation_deg, 30.0);
    let layer = FrameAddr::Layer {
        layer: "Logo".to_string(),
    };
    assert_eq!(doc.frame(&layer).unwrap().position, Vec2::new(200.0, 100.0));
    assert!(
        doc.frame(&FrameAddr::Layer {
            layer: "Missing".to_string()
        })
        .is_none()
    );
}

#[test]
fn evaluate_matches_the_snapshot_world_position() {
    let doc = built();
    let snap = discover_paths(doc.source_layer("Logo")).unwrap();
    let expected = snap.world_vertex(&snap.paths[0], 2);

    let v = doc
        .evaluate(identity::ANCHOR_LAYER, "A0_2", Slot::Position)
        .unwrap();
    let [x, y] = v.as_vector().unwrap();
    assert_eq!((x, y), (expected.x, expected.y));

    let opacity = doc
        .evaluate_layer(identity::ANCHOR_LAYER, Slot::Opacity)
        .unwrap();
    assert_eq!(opacity.as_scalar(), Some(100.0));
    assert!(doc.evaluate_layer(identity::ANCHOR_LAYER, Slot::Text).is_err());
}

#[test]
fn contour_paths_are_offset_outward() {
    let doc = built();
    let outline = doc
        .evaluate(identity::OUTLINE_LAYER, "O0", Slot::Path)
        .unwrap();
    let contour = doc
        .evaluate(identity::CONTOUR_LAYER, "OC_0_0", Slot::Path)
        .unwrap();
    let (o, c) = (outline.as_path().unwrap(), contour.as_path().unwrap());
    assert_eq!(o.len(), c.len());

    let area = |s: &PathShape| crate::foundation::core::bounds_of(s.vertices.iter().copied())
        .unwrap()
        .area();
    assert!(area(c) > area(o));
}

#[test]
fn missing_pieces_are_evaluation_errors() {
    let doc = built();
    let err = doc.evaluate("PP_Nope", "A0_0", Slot::Position).unwrap_err();
    assert!(matches!(err, AnatomyError::Evaluation(_)));
    let err = doc
        .evaluate(identity::ANCHOR_LAYER, "A9_9", Slot::Position)
        .unwrap_err();
    assert!(matches!(err, AnatomyError::Evaluation(_)));

    let mut no_controls = built();
    no_controls.layers.retain(|l| !matches!(l, Layer::Control(_)));
    let err = no_controls
        .evaluate(identity::ANCHOR_LAYER, "A0_0", Slot::Position)
        .unwrap_err();
    assert!(matches!(err, AnatomyError::Evaluation(_)));
}

#[test]
fn lookups_see_into_precomps() {
    let mut doc = built();
    let generated: Vec<Layer> = doc.layers.drain(1..).collect();
    doc.layers.push(Layer::Precomp {
        name: identity::PRECOMP_NAME.to_string(),
        layers: generated,
    });

    assert!(doc.control_layer().is_some());
    assert!(doc.generated(identity::GRID_LAYER).is_some());
    assert!(doc.control_layer_mut().is_some());
    assert!(doc.generated_layers().len() > 5);
    assert!(
        doc.evaluate(identity::ANCHOR_LAYER, "A0_0", Slot::Position)
            .is_ok()
    );
    // The precomp itself is not a `PP_` layer.
    assert_eq!(doc.remove_generated(), 0);
}

#[test]
fn top_level_overlay_wins_over_a_precomposed_one() {
    let mut doc = built();
    let stale: Vec<Layer> = doc.layers.drain(1..).collect();
    doc.layers.push(Layer::Precomp {
        name: identity::PRECOMP_NAME.to_string(),
        layers: stale,
    });
    let fresh = built();
    doc.layers.extend(fresh.layers.into_iter().skip(1));
    let per_overlay = doc.layers.len() - 2;

    doc.control_layer_mut()
        .unwrap()
        .set_scalar(names::TIMELINE, 0.0)
        .unwrap();
    let top = doc.layers.iter().find_map(|l| match l {
        Layer::Control(c) => Some(c),
        _ => None,
    });
    assert_eq!(
        top.unwrap().param(names::TIMELINE).unwrap().value,
        ControlValue::Scalar(0.0)
    );
    assert_eq!(doc.generated_layers().len(), per_overlay - 1);
    assert_eq!(doc.generated_layers_mut().len(), per_overlay - 1);
    for g in doc.generated_layers_mut() {
        g.elements.clear();
    }
    let Layer::Precomp { layers, .. } = &doc.layers[1] else {
        panic!("precomp moved");
    };
    assert!(layers.iter().any(|l| match l {
        Layer::Generated(g) => !g.elements.is_empty(),
        _ => false,
    }));
}

#[test]
fn remove_generated_keeps_sources() {
    let mut doc = built();
    let total = doc.layers.len();
    assert_eq!(doc.remove_generated(), total - 1);
    assert_eq!(doc.layers.len(), 1);
    assert!(doc.source_layer("Logo").is_some());
}

#[test]
fn json_round_trip_keeps_structure() {
    let doc = built();
    let mut buf = Vec::new();
    doc.to_writer(&mut buf).unwrap();
    let back = Document::from_reader(buf.as_slice()).unwrap();

    let names = |d: &Document| d.layers.iter().map(|l| l.name().to_string()).collect::<Vec<_>>();
    assert_eq!(names(&back), names(&doc));
    assert_eq!(back.control_layer(), doc.control_layer());
    back.validate().unwrap();
}

#[test]
fn validation_rejects_duplicates_and_bad_paths() {
    let mut doc = built();
    doc.layers.push(Layer::Source(logo()));
    assert!(matches!(doc.validate(), Err(AnatomyError::Validation(_))));

    let mut bad = logo();
    bad.contents = vec![Content::path(
        "Broken",
        PathShape {
            vertices: vec![Point::ORIGIN],
            in_tangents: vec![],
            out_tangents: vec![],
            closed: false,
        },
    )];
    let doc = Document::new(vec![Layer::Source(bad)]);
    assert!(matches!(doc.validate(), Err(AnatomyError::Validation(_))));

    let mut twins = logo();
    twins.contents.push(Content::path("Group 1", PathShape::default()));
    let doc = Document::new(vec![Layer::Source(twins)]);
    assert!(matches!(doc.validate(), Err(AnatomyError::Validation(_))));

    let doc = Document {
        time: f64::NAN,
        layers: vec![],
    };
    assert!(doc.validate().is_err());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = Document::from_reader("{\"layers\": 3}".as_bytes()).unwrap_err();
    assert!(matches!(err, AnatomyError::Serde(_)));
}
