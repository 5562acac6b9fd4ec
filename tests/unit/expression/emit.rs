use super::*;
use crate::expression::formula::{FormulaBuilder, PathOutput, SymPoint};

fn addr() -> PathAddr {
    PathAddr::Source {
        layer: "Logo".to_string(),
        groups: vec!["Group 1".to_string()],
        path: "Path 1".to_string(),
    }
}

#[test]
fn control_reads_address_the_control_layer() {
    let f = Formula::scalar(Expr::control("Timeline"));
    assert_eq!(
        f.to_source(),
        "thisComp.layer(\"PP_Control\").effect(\"Timeline\")(1);\n"
    );
}

#[test]
fn precedence_adds_only_needed_parentheses() {
    let a = Expr::control("A");
    let b = Expr::control("B");
    let f = Formula::scalar((a.clone() + b.clone()) * 2.0 - (a - b) / 4.0);
    let src = f.to_source();
    let ra = control_reference("A");
    let rb = control_reference("B");
    assert_eq!(src, format!("({ra} + {rb}) * 2 - ({ra} - {rb}) / 4;\n"));
}

#[test]
fn negation_never_produces_double_minus() {
    let f = Formula::scalar(-Expr::num(-3.0));
    assert_eq!(f.to_source(), "-(-3);\n");
}

#[test]
fn path_reads_are_hoisted_once() {
    let a = addr();
    let f = Formula::vector(
        Expr::vertex(&a, 0, VertexAttr::Point, crate::expression::ast::Axis::X),
        Expr::vertex(&a, 2, VertexAttr::InTangent, crate::expression::ast::Axis::Y),
    );
    let src = f.to_source();
    let lines: Vec<&str> = src.lines().collect();
    assert_eq!(
        lines[0],
        "var src0 = thisComp.layer(\"Logo\").content(\"Group 1\").content(\"Path 1\").path;"
    );
    assert_eq!(lines[1], "[src0.points()[0][0], src0.inTangents()[2][1]];");
}

#[test]
fn lets_become_vars_and_paths_use_create_path() {
    let mut b = FormulaBuilder::new();
    let x = b.bind(Expr::control("W").sqrt());
    let f = b.finish(Output::Path {
        path: PathOutput::polyline(
            vec![SymPoint::new(x.clone(), Expr::num(0.0)), SymPoint::constant(1.5, 2.0)],
            true,
        ),
    });
    let src = f.to_source();
    assert!(src.starts_with("var v0 = Math.sqrt("));
    assert!(src.ends_with("createPath([[v0, 0], [1.5, 2]], [[0, 0], [0, 0]], [[0, 0], [0, 0]], true);\n"));
}

#[test]
fn generated_paths_and_frames_use_content_chains() {
    let g = PathAddr::Generated {
        layer: "PP_Outlines".to_string(),
        group: "O0".to_string(),
    };
    assert_eq!(
        path_reference(&g),
        "thisComp.layer(\"PP_Outlines\").content(\"O0\").content(\"Path 1\").path"
    );
    let frame = FrameAddr::Group {
        layer: "Logo".to_string(),
        groups: vec!["Group 1".to_string()],
    };
    let f = Formula::scalar(Expr::frame_field(
        &frame,
        FrameField::Rotation,
        crate::expression::ast::Axis::X,
    ));
    assert_eq!(
        f.to_source(),
        "thisComp.layer(\"Logo\").content(\"Group 1\").transform.rotation;\n"
    );
}

#[test]
fn labels_and_selects_emit_host_idioms() {
    let f = Formula {
        lets: Vec::new(),
        output: Output::Label {
            value: [Expr::num(1.0), Expr::num(2.0)],
        },
    };
    assert_eq!(
        f.to_source(),
        "\"(\" + Math.round(1) + \", \" + Math.round(2) + \")\";\n"
    );

    let s = Formula::scalar(Expr::select(
        Expr::num(1.0).lt(Expr::num(2.0)),
        Expr::num(3.0),
        Expr::num(4.0),
    ));
    assert_eq!(s.to_source(), "1 < 2 ? 3 : 4;\n");
}

#[test]
fn strings_are_escaped() {
    assert_eq!(js_str("a\"b\\c"), "\"a\\\"b\\\\c\"");
}
