use crate::expression::ast::{Expr, VarId};

/// Symbolic 2D point: one scalar expression per axis.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SymPoint {
    pub x: Expr,
    pub y: Expr,
}

impl SymPoint {
    pub fn new(x: Expr, y: Expr) -> Self {
        Self { x, y }
    }

    pub fn constant(x: f64, y: f64) -> Self {
        Self::new(Expr::num(x), Expr::num(y))
    }

    pub fn add(self, other: SymPoint) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn into_array(self) -> [Expr; 2] {
        [self.x, self.y]
    }
}

/// Symbolic path output. All vectors are index-aligned.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PathOutput {
    pub points: Vec<[Expr; 2]>,
    pub in_tangents: Vec<[Expr; 2]>,
    pub out_tangents: Vec<[Expr; 2]>,
    pub closed: bool,
}

impl PathOutput {
    /// Open or closed polyline with no handles.
    pub fn polyline(points: Vec<SymPoint>, closed: bool) -> Self {
        let n = points.len();
        let zero = || [Expr::num(0.0), Expr::num(0.0)];
        Self {
            points: points.into_iter().map(SymPoint::into_array).collect(),
            in_tangents: (0..n).map(|_| zero()).collect(),
            out_tangents: (0..n).map(|_| zero()).collect(),
            closed,
        }
    }
}

/// What a formula produces.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Output {
    Scalar { value: Expr },
    Vector { value: [Expr; 2] },
    Path { path: PathOutput },
    /// Text `"(x, y)"` built from the rounded coordinates.
    Label { value: [Expr; 2] },
}

/// One live binding: ordered let-bindings followed by a single output.
///
/// Each let may only refer to lets declared before it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Formula {
    pub lets: Vec<Expr>,
    pub output: Output,
}

impl Formula {
    pub fn scalar(value: Expr) -> Self {
        Self {
            lets: Vec::new(),
            output: Output::Scalar { value },
        }
    }

    pub fn vector(x: Expr, y: Expr) -> Self {
        Self {
            lets: Vec::new(),
            output: Output::Vector { value: [x, y] },
        }
    }
}

/// Accumulates let-bindings while a formula is being assembled.
#[derive(Debug, Default)]
pub struct FormulaBuilder {
    lets: Vec<Expr>,
}

impl FormulaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `expr` to a fresh variable and return a reference to it.
    ///
    /// Atoms are returned unchanged.
    pub fn bind(&mut self, expr: Expr) -> Expr {
        if expr.is_atom() {
            return expr;
        }
        let id = VarId(self.lets.len() as u32);
        self.lets.push(expr);
        Expr::var(id)
    }

    pub fn bind_point(&mut self, p: SymPoint) -> SymPoint {
        SymPoint::new(self.bind(p.x), self.bind(p.y))
    }

    pub fn finish(self, output: Output) -> Formula {
        Formula {
            lets: self.lets,
            output,
        }
    }
}
