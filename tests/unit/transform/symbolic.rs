use std::borrow::Cow;
use std::collections::BTreeMap;

use super::*;
use crate::expression::address::PathAddr;
use crate::expression::ast::VertexAttr;
use crate::expression::context::{ControlValue, EvalContext, SourceGeometry};
use crate::expression::formula::Output;
use crate::foundation::core::{PathShape, Point, Vec2};
use crate::transform::affine::{to_world, vector_to_world};

struct Live {
    shape: PathShape,
    frames: Vec<(FrameAddr, AffineFrame)>,
}

impl SourceGeometry for Live {
    fn path(&self, _addr: &PathAddr) -> Option<Cow<'_, PathShape>> {
        Some(Cow::Borrowed(&self.shape))
    }

    fn frame(&self, addr: &FrameAddr) -> Option<AffineFrame> {
        self.frames.iter().find(|(a, _)| a == addr).map(|(_, f)| *f)
    }
}

fn group(name: &str) -> FrameAddr {
    FrameAddr::Group {
        layer: "Logo".to_string(),
        groups: vec![name.to_string()],
    }
}

fn owner() -> FrameAddr {
    FrameAddr::Layer {
        layer: "Logo".to_string(),
    }
}

fn live() -> Live {
    Live {
        shape: PathShape {
            vertices: vec![Point::new(12.25, -3.5)],
            in_tangents: vec![Vec2::new(4.0, 1.0)],
            out_tangents: vec![Vec2::ZERO],
            closed: false,
        },
        frames: vec![
            (
                group("Inner"),
                AffineFrame {
                    anchor: Vec2::new(1.0, 2.0),
                    position: Vec2::new(30.0, 40.0),
                    scale_pct: Vec2::new(125.0, 75.0),
                    rotation_deg: 33.0,
                },
            ),
            (
                owner(),
                AffineFrame {
                    anchor: Vec2::new(-4.0, 0.5),
                    position: Vec2::new(640.0, 360.0),
                    scale_pct: Vec2::new(90.0, 110.0),
                    rotation_deg: -71.0,
                },
            ),
        ],
    }
}

#[test]
fn symbolic_chain_is_bit_identical_to_numeric() {
    let geo = live();
    let controls: BTreeMap<String, ControlValue> = BTreeMap::new();
    let ctx = EvalContext::new(&controls, &geo);
    let path = PathAddr::Source {
        layer: "Logo".to_string(),
        groups: vec!["Inner".to_string()],
        path: "Path 1".to_string(),
    };

    let mut b = FormulaBuilder::new();
    let chain = SymChain::bind(&mut b, [group("Inner")].iter(), &owner());
    let local = SymPoint::new(
        Expr::vertex(&path, 0, VertexAttr::Point, Axis::X),
        Expr::vertex(&path, 0, VertexAttr::Point, Axis::Y),
    );
    let world = chain.to_world(&mut b, local);
    let f = b.finish(Output::Vector {
        value: world.into_array(),
    });
    let got = f.evaluate(&ctx).unwrap().as_vector().unwrap();

    let frames = [geo.frames[0].1];
    let expected = to_world(geo.shape.vertices[0], &frames, geo.frames[1].1);
    assert_eq!(got, [expected.x, expected.y]);
}

#[test]
fn symbolic_vectors_match_numeric() {
    let geo = live();
    let controls: BTreeMap<String, ControlValue> = BTreeMap::new();
    let ctx = EvalContext::new(&controls, &geo);

    let mut b = FormulaBuilder::new();
    let chain = SymChain::bind(&mut b, [group("Inner")].iter(), &owner());
    let v = chain.to_world_vector(&mut b, SymPoint::constant(4.0, 1.0));
    let f = b.finish(Output::Vector {
        value: v.into_array(),
    });
    let got = f.evaluate(&ctx).unwrap().as_vector().unwrap();

    let expected = vector_to_world(Vec2::new(4.0, 1.0), &[geo.frames[0].1], geo.frames[1].1);
    assert_eq!(got, [expected.x, expected.y]);
}

#[test]
fn constant_frames_match_live_frames() {
    let geo = live();
    let controls: BTreeMap<String, ControlValue> = BTreeMap::new();
    let ctx = EvalContext::new(&controls, &geo);
    let frame = geo.frames[1].1;

    let mut b = FormulaBuilder::new();
    let p = FrameTerms::constant(frame).apply(&mut b, SymPoint::constant(3.0, -9.0));
    let f = b.finish(Output::Vector {
        value: p.into_array(),
    });
    let got = f.evaluate(&ctx).unwrap().as_vector().unwrap();
    let expected = frame.apply(Point::new(3.0, -9.0));
    assert_eq!(got, [expected.x, expected.y]);
}

#[test]
fn identity_chain_passes_points_through() {
    let mut b = FormulaBuilder::new();
    let chain = SymChain::identity();
    assert!(chain.is_empty());
    let p = chain.to_world(&mut b, SymPoint::constant(1.0, 2.0));
    assert_eq!(p, SymPoint::constant(1.0, 2.0));
}
