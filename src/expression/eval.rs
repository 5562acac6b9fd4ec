use std::borrow::Cow;
use std::collections::HashMap;

use crate::expression::address::PathAddr;
use crate::expression::ast::{BinaryOp, Builtin, CmpOp, Expr, FrameField, SourceRef, VertexAttr};
use crate::expression::context::EvalContext;
use crate::expression::formula::{Formula, Output};
use crate::foundation::core::{PathShape, Point, Vec2};
use crate::foundation::error::{AnatomyError, AnatomyResult};

/// Result of evaluating a [`Formula`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Scalar(f64),
    Vector([f64; 2]),
    Path(PathShape),
    Text(String),
}

impl Value {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<[f64; 2]> {
        match self {
            Self::Vector(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathShape> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Host rounding (`Math.round`): halves go toward positive infinity.
pub fn host_round(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Label text for a coordinate pair.
pub fn label_text(x: f64, y: f64) -> String {
    fn fmt(v: f64) -> String {
        let r = host_round(v);
        // `-0` prints as "0" in the host.
        if r == 0.0 {
            "0".to_string()
        } else {
            format!("{r}")
        }
    }
    format!("({}, {})", fmt(x), fmt(y))
}

struct Evaluator<'c, 'a> {
    ctx: &'c EvalContext<'a>,
    vars: Vec<f64>,
    paths: HashMap<PathAddr, Cow<'a, PathShape>>,
}

impl<'c, 'a> Evaluator<'c, 'a> {
    fn shape(&mut self, addr: &PathAddr) -> AnatomyResult<&PathShape> {
        if !self.paths.contains_key(addr) {
            let geometry = self.ctx.geometry;
            let shape = geometry
                .path(addr)
                .ok_or_else(|| AnatomyError::evaluation(format!("path '{addr}' not found")))?;
            self.paths.insert(addr.clone(), shape);
        }
        self.paths
            .get(addr)
            .map(|c| &**c)
            .ok_or_else(|| AnatomyError::evaluation(format!("path '{addr}' not found")))
    }

    fn source(&mut self, src: &SourceRef) -> AnatomyResult<f64> {
        match src {
            SourceRef::Vertex {
                path,
                index,
                attr,
                axis,
            } => {
                let shape = self.shape(path)?;
                let v = match attr {
                    VertexAttr::Point => shape.vertices.get(*index).map(|p| p.to_vec2()),
                    VertexAttr::InTangent => shape.in_tangents.get(*index).copied(),
                    VertexAttr::OutTangent => shape.out_tangents.get(*index).copied(),
                }
                .ok_or_else(|| {
                    AnatomyError::evaluation(format!(
                        "vertex {index} out of range for '{path}' ({} vertices)",
                        shape.len()
                    ))
                })?;
                Ok(pick(v, axis.index()))
            }
            SourceRef::Frame { frame, field, axis } => {
                let f = self
                    .ctx
                    .geometry
                    .frame(frame)
                    .ok_or_else(|| AnatomyError::evaluation(format!("frame '{frame}' not found")))?;
                Ok(match field {
                    FrameField::Anchor => pick(f.anchor, axis.index()),
                    FrameField::Position => pick(f.position, axis.index()),
                    FrameField::Scale => pick(f.scale_pct, axis.index()),
                    FrameField::Rotation => f.rotation_deg,
                })
            }
        }
    }

    fn expr(&mut self, e: &Expr) -> AnatomyResult<f64> {
        match e {
            Expr::Num { value } => Ok(*value),
            Expr::Var { id } => self
                .vars
                .get(id.0 as usize)
                .copied()
                .ok_or_else(|| AnatomyError::evaluation(format!("unbound variable v{}", id.0))),
            Expr::Control { name, component } => {
                let value = self
                    .ctx
                    .controls
                    .get(name)
                    .ok_or_else(|| AnatomyError::evaluation(format!("control '{name}' not found")))?;
                let read = match component {
                    None => value.scalar(),
                    Some(i) => value.component(*i),
                };
                read.ok_or_else(|| {
                    AnatomyError::evaluation(format!(
                        "control '{name}' has no component {component:?}"
                    ))
                })
            }
            Expr::Source { source } => self.source(source),
            Expr::Neg { expr } => Ok(-self.expr(expr)?),
            Expr::Binary { op, left, right } => {
                let a = self.expr(left)?;
                let b = self.expr(right)?;
                Ok(match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                })
            }
            Expr::Call { func, args } => {
                if args.len() != func.arity() {
                    return Err(AnatomyError::evaluation(format!(
                        "{func:?} expects {} args, got {}",
                        func.arity(),
                        args.len()
                    )));
                }
                let mut vals = [0.0; 3];
                for (slot, a) in vals.iter_mut().zip(args) {
                    *slot = self.expr(a)?;
                }
                Ok(match func {
                    Builtin::Sqrt => vals[0].sqrt(),
                    Builtin::Sin => vals[0].sin(),
                    Builtin::Cos => vals[0].cos(),
                    Builtin::Abs => vals[0].abs(),
                    Builtin::Round => host_round(vals[0]),
                    Builtin::Pow => vals[0].powf(vals[1]),
                    Builtin::Max => vals[0].max(vals[1]),
                    Builtin::Min => vals[0].min(vals[1]),
                    Builtin::Clamp => vals[0].max(vals[1]).min(vals[2]),
                })
            }
            Expr::Select {
                test,
                then,
                otherwise,
            } => {
                let a = self.expr(&test.left)?;
                let b = self.expr(&test.right)?;
                let hit = match test.op {
                    CmpOp::Lt => a < b,
                    CmpOp::Le => a <= b,
                    CmpOp::Gt => a > b,
                    CmpOp::Ge => a >= b,
                };
                if hit {
                    self.expr(then)
                } else {
                    self.expr(otherwise)
                }
            }
        }
    }

    fn pair(&mut self, p: &[Expr; 2]) -> AnatomyResult<[f64; 2]> {
        Ok([self.expr(&p[0])?, self.expr(&p[1])?])
    }
}

fn pick(v: Vec2, axis: usize) -> f64 {
    if axis == 0 { v.x } else { v.y }
}

impl Formula {
    /// Evaluate against live controls and geometry.
    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> AnatomyResult<Value> {
        let mut ev = Evaluator {
            ctx,
            vars: Vec::with_capacity(self.lets.len()),
            paths: HashMap::new(),
        };
        for l in &self.lets {
            let v = ev.expr(l)?;
            ev.vars.push(v);
        }

        match &self.output {
            Output::Scalar { value } => Ok(Value::Scalar(ev.expr(value)?)),
            Output::Vector { value } => Ok(Value::Vector(ev.pair(value)?)),
            Output::Label { value } => {
                let [x, y] = ev.pair(value)?;
                Ok(Value::Text(label_text(x, y)))
            }
            Output::Path { path } => {
                let mut shape = PathShape {
                    vertices: Vec::with_capacity(path.points.len()),
                    in_tangents: Vec::with_capacity(path.points.len()),
                    out_tangents: Vec::with_capacity(path.points.len()),
                    closed: path.closed,
                };
                for p in &path.points {
                    let [x, y] = ev.pair(p)?;
                    shape.vertices.push(Point::new(x, y));
                }
                for t in &path.in_tangents {
                    let [x, y] = ev.pair(t)?;
                    shape.in_tangents.push(Vec2::new(x, y));
                }
                for t in &path.out_tangents {
                    let [x, y] = ev.pair(t)?;
                    shape.out_tangents.push(Vec2::new(x, y));
                }
                Ok(Value::Path(shape))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/eval.rs"]
mod tests;
