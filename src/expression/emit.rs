//! Host expression text for a [`Formula`].
//!
//! The output is the JavaScript-flavoured expression language of the host. Each distinct live path
//! is read once into a local, each let-binding becomes a `var`, and the last statement is the
//! formula's value.

use std::fmt::Write as _;

use crate::expression::address::{FrameAddr, PathAddr};
use crate::expression::ast::{BinaryOp, Builtin, CmpOp, Expr, FrameField, SourceRef, VertexAttr};
use crate::expression::formula::{Formula, Output};
use crate::plan::identity::CONTROL_LAYER;

/// Name of the content group that wraps a frozen path inside a generated layer.
pub(crate) const FROZEN_PATH_NAME: &str = "Path 1";

fn js_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn js_num(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else if v.is_finite() {
        format!("{v}")
    } else {
        "NaN".to_string()
    }
}

fn content_chain(layer: &str, groups: &[String]) -> String {
    let mut s = format!("thisComp.layer({})", js_str(layer));
    for g in groups {
        let _ = write!(s, ".content({})", js_str(g));
    }
    s
}

/// Host reference to the path property at `addr`.
pub fn path_reference(addr: &PathAddr) -> String {
    match addr {
        PathAddr::Source {
            layer,
            groups,
            path,
        } => format!("{}.content({}).path", content_chain(layer, groups), js_str(path)),
        PathAddr::Generated { layer, group } => format!(
            "thisComp.layer({}).content({}).content({}).path",
            js_str(layer),
            js_str(group),
            js_str(FROZEN_PATH_NAME)
        ),
    }
}

fn frame_reference(addr: &FrameAddr) -> String {
    match addr {
        FrameAddr::Group { layer, groups } => {
            format!("{}.transform", content_chain(layer, groups))
        }
        FrameAddr::Layer { layer } => format!("thisComp.layer({}).transform", js_str(layer)),
    }
}

/// Host reference to one control parameter's value.
pub fn control_reference(name: &str) -> String {
    format!(
        "thisComp.layer({}).effect({})(1)",
        js_str(CONTROL_LAYER),
        js_str(name)
    )
}

const PREC_SELECT: u8 = 0;
const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_UNARY: u8 = 3;
const PREC_ATOM: u8 = 4;

struct Emitter {
    paths: Vec<PathAddr>,
}

impl Emitter {
    fn path_local(&mut self, addr: &PathAddr) -> String {
        let idx = match self.paths.iter().position(|p| p == addr) {
            Some(i) => i,
            None => {
                self.paths.push(addr.clone());
                self.paths.len() - 1
            }
        };
        format!("src{idx}")
    }

    fn source(&mut self, src: &SourceRef) -> String {
        match src {
            SourceRef::Vertex {
                path,
                index,
                attr,
                axis,
            } => {
                let method = match attr {
                    VertexAttr::Point => "points",
                    VertexAttr::InTangent => "inTangents",
                    VertexAttr::OutTangent => "outTangents",
                };
                format!(
                    "{}.{method}()[{index}][{}]",
                    self.path_local(path),
                    axis.index()
                )
            }
            SourceRef::Frame { frame, field, axis } => {
                let base = frame_reference(frame);
                match field {
                    FrameField::Anchor => format!("{base}.anchorPoint[{}]", axis.index()),
                    FrameField::Position => format!("{base}.position[{}]", axis.index()),
                    FrameField::Scale => format!("{base}.scale[{}]", axis.index()),
                    FrameField::Rotation => format!("{base}.rotation"),
                }
            }
        }
    }

    /// Emit `e` and report its precedence.
    fn expr(&mut self, e: &Expr) -> (String, u8) {
        match e {
            Expr::Num { value } => {
                let prec = if *value < 0.0 { PREC_UNARY } else { PREC_ATOM };
                (js_num(*value), prec)
            }
            Expr::Var { id } => (format!("v{}", id.0), PREC_ATOM),
            Expr::Control { name, component } => {
                let base = control_reference(name);
                let text = match component {
                    Some(i) => format!("{base}[{i}]"),
                    None => base,
                };
                (text, PREC_ATOM)
            }
            Expr::Source { source } => (self.source(source), PREC_ATOM),
            Expr::Neg { expr } => {
                let inner = self.wrapped(expr, PREC_ATOM);
                (format!("-{inner}"), PREC_UNARY)
            }
            Expr::Binary { op, left, right } => {
                let (sym, prec) = match op {
                    BinaryOp::Add => ("+", PREC_ADD),
                    BinaryOp::Sub => ("-", PREC_ADD),
                    BinaryOp::Mul => ("*", PREC_MUL),
                    BinaryOp::Div => ("/", PREC_MUL),
                };
                let l = self.wrapped(left, prec);
                // Right operand of a non-commutative operator needs strictly higher precedence.
                let r = self.wrapped(right, prec + 1);
                (format!("{l} {sym} {r}"), prec)
            }
            Expr::Call { func, args } => {
                let name = match func {
                    Builtin::Sqrt => "Math.sqrt",
                    Builtin::Sin => "Math.sin",
                    Builtin::Cos => "Math.cos",
                    Builtin::Abs => "Math.abs",
                    Builtin::Round => "Math.round",
                    Builtin::Pow => "Math.pow",
                    Builtin::Max => "Math.max",
                    Builtin::Min => "Math.min",
                    Builtin::Clamp => "clamp",
                };
                let args: Vec<String> = args.iter().map(|a| self.expr(a).0).collect();
                (format!("{name}({})", args.join(", ")), PREC_ATOM)
            }
            Expr::Select {
                test,
                then,
                otherwise,
            } => {
                let l = self.wrapped(&test.left, PREC_ADD);
                let r = self.wrapped(&test.right, PREC_ADD);
                let op = match test.op {
                    CmpOp::Lt => "<",
                    CmpOp::Le => "<=",
                    CmpOp::Gt => ">",
                    CmpOp::Ge => ">=",
                };
                let t = self.wrapped(then, PREC_ADD);
                let o = self.wrapped(otherwise, PREC_ADD);
                (format!("{l} {op} {r} ? {t} : {o}"), PREC_SELECT)
            }
        }
    }

    fn wrapped(&mut self, e: &Expr, min_prec: u8) -> String {
        let (text, prec) = self.expr(e);
        if prec < min_prec {
            format!("({text})")
        } else {
            text
        }
    }

    fn pair(&mut self, p: &[Expr; 2]) -> String {
        format!("[{}, {}]", self.expr(&p[0]).0, self.expr(&p[1]).0)
    }

    fn pairs(&mut self, ps: &[[Expr; 2]]) -> String {
        let items: Vec<String> = ps.iter().map(|p| self.pair(p)).collect();
        format!("[{}]", items.join(", "))
    }
}

impl Formula {
    /// Serialize to host expression text.
    pub fn to_source(&self) -> String {
        let mut em = Emitter { paths: Vec::new() };
        let mut body = String::new();
        for (i, l) in self.lets.iter().enumerate() {
            let text = em.expr(l).0;
            let _ = writeln!(body, "var v{i} = {text};");
        }
        let value = match &self.output {
            Output::Scalar { value } => em.expr(value).0,
            Output::Vector { value } => em.pair(value),
            Output::Label { value } => {
                let x = em.expr(&value[0]).0;
                let y = em.expr(&value[1]).0;
                format!("\"(\" + Math.round({x}) + \", \" + Math.round({y}) + \")\"")
            }
            Output::Path { path } => {
                let pts = em.pairs(&path.points);
                let ins = em.pairs(&path.in_tangents);
                let outs = em.pairs(&path.out_tangents);
                format!("createPath({pts}, {ins}, {outs}, {})", path.closed)
            }
        };
        let _ = writeln!(body, "{value};");

        let mut out = String::new();
        for (i, p) in em.paths.iter().enumerate() {
            let _ = writeln!(out, "var src{i} = {};", path_reference(p));
        }
        out.push_str(&body);
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/emit.rs"]
mod tests;
