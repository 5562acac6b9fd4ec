use std::cell::Cell;

use super::*;
use crate::config::Profile;
use crate::foundation::core::{AffineFrame, PathShape, Point};
use crate::plan::identity;
use crate::source::model::{Content, SourceLayer};

fn ring(name: &str, n: usize) -> SourceLayer {
    let vertices = (0..n)
        .map(|i| {
            let a = i as f64 / n as f64 * std::f64::consts::TAU;
            Point::new(200.0 * a.cos(), 200.0 * a.sin())
        })
        .collect();
    SourceLayer {
        name: name.to_string(),
        transform: AffineFrame::identity(),
        contents: vec![Content::path("Path 1", PathShape::polygon(vertices, true))],
    }
}

fn minimal() -> BuildOptions {
    BuildOptions {
        profile: Profile::Minimal,
        ..BuildOptions::default()
    }
}

fn yes(_: &str) -> bool {
    true
}

#[test]
fn build_appends_control_then_generated_layers() {
    let mut doc = Document::new(vec![Layer::Source(ring("Ring", 6))]);
    let outcome = build(&mut doc, "Ring", &BuildOptions::default(), &yes).unwrap();
    let report = outcome.report().unwrap();

    assert_eq!((report.paths, report.vertices, report.removed), (1, 6, 0));
    assert_eq!(report.layers[0], identity::CONTROL_LAYER);
    assert_eq!(report.layers[1], identity::GRID_LAYER);
    assert_eq!(doc.layers[0].name(), "Ring");
    assert_eq!(doc.layers.len(), report.layers.len() + 1);
    assert!(doc.control_layer().is_some());
    assert!(doc.generated(identity::ANCHOR_LAYER).is_some());
}

#[test]
fn rebuild_replaces_the_previous_build() {
    let mut doc = Document::new(vec![Layer::Source(ring("Ring", 6))]);
    build(&mut doc, "Ring", &BuildOptions::default(), &yes).unwrap();
    let first = doc.layers.len();

    let outcome = build(&mut doc, "Ring", &minimal(), &yes).unwrap();
    let report = outcome.report().unwrap();
    assert_eq!(report.removed, first - 1);
    assert_eq!(doc.layers.len(), report.layers.len() + 1);
    assert!(doc.generated(identity::CONTOUR_LAYER).is_none());
}

#[test]
fn missing_or_empty_source_leaves_the_document_alone() {
    let empty = SourceLayer {
        name: "Empty".to_string(),
        transform: AffineFrame::identity(),
        contents: vec![Content::Other {
            name: "Fill 1".to_string(),
        }],
    };
    let mut doc = Document::new(vec![Layer::Source(empty)]);
    let before = doc.clone();

    let err = build(&mut doc, "Nope", &minimal(), &yes).unwrap_err();
    assert!(matches!(err, AnatomyError::UserInput(_)));
    let err = build(&mut doc, "Empty", &minimal(), &yes).unwrap_err();
    assert!(matches!(err, AnatomyError::EmptySource(_)));
    assert_eq!(doc, before);
}

#[test]
fn confirmation_is_requested_only_above_the_threshold() {
    let asked = Cell::new(0);
    let decline = |_: &str| {
        asked.set(asked.get() + 1);
        false
    };

    let mut doc = Document::new(vec![Layer::Source(ring("Ring", 120))]);
    let outcome = build(&mut doc, "Ring", &minimal(), &decline).unwrap();
    assert!(matches!(outcome, BuildOutcome::Built(_)));
    assert_eq!(asked.get(), 0);

    let mut doc = Document::new(vec![Layer::Source(ring("Ring", 121))]);
    let before = doc.clone();
    let outcome = build(&mut doc, "Ring", &minimal(), &decline).unwrap();
    assert_eq!(outcome, BuildOutcome::Declined);
    assert_eq!(asked.get(), 1);
    assert_eq!(doc, before);

    let outcome = build(&mut doc, "Ring", &minimal(), &yes).unwrap();
    assert_eq!(outcome.report().unwrap().vertices, 121);
}

#[test]
fn threshold_comes_from_options() {
    let asked = Cell::new(false);
    let confirm = |msg: &str| {
        asked.set(true);
        assert!(msg.starts_with("6 vertices"));
        true
    };
    let options = BuildOptions {
        vertex_warning_threshold: 5,
        ..minimal()
    };
    let mut doc = Document::new(vec![Layer::Source(ring("Ring", 6))]);
    build(&mut doc, "Ring", &options, &confirm).unwrap();
    assert!(asked.get());
}
