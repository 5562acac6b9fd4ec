use crate::expression::address::{FrameAddr, PathAddr};

/// Let-binding slot inside one [`crate::Formula`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct VarId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }
}

/// Per-vertex attribute of a live path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexAttr {
    Point,
    InTangent,
    OutTangent,
}

/// Field of a live transform frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameField {
    Anchor,
    Position,
    /// Percent scale.
    Scale,
    /// Degrees; the axis is ignored.
    Rotation,
}

/// One scalar read from live host data.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceRef {
    Vertex {
        path: PathAddr,
        index: usize,
        attr: VertexAttr,
        axis: Axis,
    },
    Frame {
        frame: FrameAddr,
        field: FrameField,
        axis: Axis,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Builtin {
    Sqrt,
    Sin,
    Cos,
    Abs,
    /// Host rounding: half rounds toward positive infinity.
    Round,
    Pow,
    Max,
    Min,
    /// `clamp(value, lo, hi)`.
    Clamp,
}

impl Builtin {
    pub fn arity(self) -> usize {
        match self {
            Self::Sqrt | Self::Sin | Self::Cos | Self::Abs | Self::Round => 1,
            Self::Pow | Self::Max | Self::Min => 2,
            Self::Clamp => 3,
        }
    }
}

/// Numeric comparison driving a [`Expr::Select`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Compare {
    pub op: CmpOp,
    pub left: Expr,
    pub right: Expr,
}

/// Scalar expression tree.
///
/// Vectors and paths are built from pairs of scalar expressions; see [`crate::Output`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Expr {
    Num {
        value: f64,
    },
    Var {
        id: VarId,
    },
    /// Named control parameter. `component` is `None` for scalars and checkboxes.
    Control {
        name: String,
        component: Option<usize>,
    },
    Source {
        source: Box<SourceRef>,
    },
    Neg {
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        func: Builtin,
        args: Vec<Expr>,
    },
    Select {
        test: Box<Compare>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

impl Expr {
    pub fn num(value: f64) -> Self {
        Self::Num { value }
    }

    pub fn var(id: VarId) -> Self {
        Self::Var { id }
    }

    /// Scalar or checkbox control read by name.
    pub fn control(name: impl Into<String>) -> Self {
        Self::Control {
            name: name.into(),
            component: None,
        }
    }

    /// One component of a point or color control.
    pub fn control_component(name: impl Into<String>, component: usize) -> Self {
        Self::Control {
            name: name.into(),
            component: Some(component),
        }
    }

    pub fn source(source: SourceRef) -> Self {
        Self::Source {
            source: Box::new(source),
        }
    }

    pub fn vertex(path: &PathAddr, index: usize, attr: VertexAttr, axis: Axis) -> Self {
        Self::source(SourceRef::Vertex {
            path: path.clone(),
            index,
            attr,
            axis,
        })
    }

    pub fn frame_field(frame: &FrameAddr, field: FrameField, axis: Axis) -> Self {
        Self::source(SourceRef::Frame {
            frame: frame.clone(),
            field,
            axis,
        })
    }

    fn call(func: Builtin, args: Vec<Expr>) -> Self {
        Self::Call { func, args }
    }

    pub fn sqrt(self) -> Self {
        Self::call(Builtin::Sqrt, vec![self])
    }

    pub fn sin(self) -> Self {
        Self::call(Builtin::Sin, vec![self])
    }

    pub fn cos(self) -> Self {
        Self::call(Builtin::Cos, vec![self])
    }

    pub fn abs(self) -> Self {
        Self::call(Builtin::Abs, vec![self])
    }

    pub fn round(self) -> Self {
        Self::call(Builtin::Round, vec![self])
    }

    pub fn pow(self, exp: Expr) -> Self {
        Self::call(Builtin::Pow, vec![self, exp])
    }

    pub fn max(self, other: Expr) -> Self {
        Self::call(Builtin::Max, vec![self, other])
    }

    pub fn min(self, other: Expr) -> Self {
        Self::call(Builtin::Min, vec![self, other])
    }

    pub fn clamp(self, lo: Expr, hi: Expr) -> Self {
        Self::call(Builtin::Clamp, vec![self, lo, hi])
    }

    fn compare(self, op: CmpOp, right: Expr) -> Compare {
        Compare {
            op,
            left: self,
            right,
        }
    }

    pub fn lt(self, right: Expr) -> Compare {
        self.compare(CmpOp::Lt, right)
    }

    pub fn le(self, right: Expr) -> Compare {
        self.compare(CmpOp::Le, right)
    }

    pub fn gt(self, right: Expr) -> Compare {
        self.compare(CmpOp::Gt, right)
    }

    pub fn ge(self, right: Expr) -> Compare {
        self.compare(CmpOp::Ge, right)
    }

    /// `test ? then : otherwise`.
    pub fn select(test: Compare, then: Expr, otherwise: Expr) -> Self {
        Self::Select {
            test: Box::new(test),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    /// Literal and variable nodes are cheap to repeat and never need a let-binding.
    pub fn is_atom(&self) -> bool {
        matches!(self, Self::Num { .. } | Self::Var { .. })
    }

    fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::num(value)
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $op:expr) => {
        impl std::ops::$trait for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                Expr::binary($op, self, rhs)
            }
        }

        impl std::ops::$trait<f64> for Expr {
            type Output = Expr;
            fn $method(self, rhs: f64) -> Expr {
                Expr::binary($op, self, Expr::num(rhs))
            }
        }
    };
}

impl_binop!(Add, add, BinaryOp::Add);
impl_binop!(Sub, sub, BinaryOp::Sub);
impl_binop!(Mul, mul, BinaryOp::Mul);
impl_binop!(Div, div, BinaryOp::Div);

impl std::ops::Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::Neg {
            expr: Box::new(self),
        }
    }
}
