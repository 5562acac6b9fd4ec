//! Live formulas for element geometry.
//!
//! Each builder reads one path through a [`VertexSource`]: either the live source path, reached
//! through its group and layer frames, or a frozen outline that is already in display space. The
//! arithmetic follows the numeric constructors in [`crate::geometry`] step for step, so a formula
//! evaluated against the snapshot reproduces the static result exactly.

use crate::expression::address::PathAddr;
use crate::expression::ast::{Axis, Expr, VertexAttr};
use crate::expression::formula::{Formula, FormulaBuilder, Output, PathOutput, SymPoint};
use crate::foundation::core::TangentSide;
use crate::foundation::math::{COLLINEAR_EPS, DIRECTION_EPS};
use crate::geometry::contour::CONTOUR_LEVELS;
use crate::geometry::grid::GridExtents;
use crate::plan::identity::ElementId;
use crate::plan::model::{Binding, Slot};
use crate::scene::control::names;
use crate::source::discover::{PathDescriptor, SourceSnapshot};
use crate::transform::symbolic::SymChain;

/// Where an element's formulas read vertex data from.
#[derive(Clone, Debug)]
pub enum VertexSource<'a> {
    /// The source layer path, transformed through its frames on every evaluation.
    Live {
        snapshot: &'a SourceSnapshot,
        path: &'a PathDescriptor,
    },
    /// A frozen outline; its data is already in display space.
    Frozen {
        addr: PathAddr,
        len: usize,
        closed: bool,
    },
}

impl<'a> VertexSource<'a> {
    pub fn live(snapshot: &'a SourceSnapshot, path: &'a PathDescriptor) -> Self {
        Self::Live { snapshot, path }
    }

    pub fn address(&self) -> &PathAddr {
        match self {
            Self::Live { path, .. } => &path.address,
            Self::Frozen { addr, .. } => addr,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Live { path, .. } => path.shape.len(),
            Self::Frozen { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn closed(&self) -> bool {
        match self {
            Self::Live { path, .. } => path.shape.closed,
            Self::Frozen { closed, .. } => *closed,
        }
    }

    fn scope(&self, b: &mut FormulaBuilder) -> PathScope {
        let chain = match self {
            Self::Live { snapshot, path } => {
                let (groups, owner) = snapshot.chain_addrs(path);
                SymChain::bind(b, groups, &owner)
            }
            Self::Frozen { .. } => SymChain::identity(),
        };
        PathScope {
            addr: self.address().clone(),
            chain,
        }
    }
}

/// One path bound into a formula under construction.
struct PathScope {
    addr: PathAddr,
    chain: SymChain,
}

fn tangent_attr(side: TangentSide) -> VertexAttr {
    match side {
        TangentSide::In => VertexAttr::InTangent,
        TangentSide::Out => VertexAttr::OutTangent,
    }
}

impl PathScope {
    fn read(&self, vi: usize, attr: VertexAttr) -> SymPoint {
        SymPoint::new(
            Expr::vertex(&self.addr, vi, attr, Axis::X),
            Expr::vertex(&self.addr, vi, attr, Axis::Y),
        )
    }

    fn point(&self, b: &mut FormulaBuilder, vi: usize) -> SymPoint {
        let local = b.bind_point(self.read(vi, VertexAttr::Point));
        let world = self.chain.to_world(b, local);
        b.bind_point(world)
    }

    /// Display-space position of the handle tip `vertex + tangent`.
    fn handle_end(&self, b: &mut FormulaBuilder, vi: usize, side: TangentSide) -> SymPoint {
        let v = b.bind_point(self.read(vi, VertexAttr::Point));
        let t = self.read(vi, tangent_attr(side));
        let local = b.bind_point(v.add(t));
        let world = self.chain.to_world(b, local);
        b.bind_point(world)
    }

    fn tangent(&self, b: &mut FormulaBuilder, vi: usize, side: TangentSide) -> SymPoint {
        let local = self.read(vi, tangent_attr(side));
        let world = self.chain.to_world_vector(b, local);
        b.bind_point(world)
    }
}

fn path_output(b: FormulaBuilder, points: Vec<SymPoint>, closed: bool) -> Formula {
    b.finish(Output::Path {
        path: PathOutput::polyline(points, closed),
    })
}

/// Display-space position of vertex `vi`.
pub fn vertex_position(src: &VertexSource<'_>, vi: usize) -> Formula {
    let mut b = FormulaBuilder::new();
    let scope = src.scope(&mut b);
    let p = scope.point(&mut b, vi);
    b.finish(Output::Vector {
        value: p.into_array(),
    })
}

/// Display-space position of a handle tip.
pub fn handle_position(src: &VertexSource<'_>, vi: usize, side: TangentSide) -> Formula {
    let mut b = FormulaBuilder::new();
    let scope = src.scope(&mut b);
    let p = scope.handle_end(&mut b, vi, side);
    b.finish(Output::Vector {
        value: p.into_array(),
    })
}

/// Two-point line from a vertex to its handle tip.
pub fn handle_line_path(src: &VertexSource<'_>, vi: usize, side: TangentSide) -> Formula {
    let mut b = FormulaBuilder::new();
    let scope = src.scope(&mut b);
    let v = scope.point(&mut b, vi);
    let h = scope.handle_end(&mut b, vi, side);
    path_output(b, vec![v, h], false)
}

/// The whole path in display space, handles included.
pub fn outline_path(src: &VertexSource<'_>) -> Formula {
    let mut b = FormulaBuilder::new();
    let scope = src.scope(&mut b);
    let n = src.len();
    let mut points = Vec::with_capacity(n);
    let mut in_tangents = Vec::with_capacity(n);
    let mut out_tangents = Vec::with_capacity(n);
    for vi in 0..n {
        points.push(scope.point(&mut b, vi).into_array());
        in_tangents.push(scope.tangent(&mut b, vi, TangentSide::In).into_array());
        out_tangents.push(scope.tangent(&mut b, vi, TangentSide::Out).into_array());
    }
    b.finish(Output::Path {
        path: PathOutput {
            points,
            in_tangents,
            out_tangents,
            closed: src.closed(),
        },
    })
}

/// Vertical grid line through vertex `vi`, spanning the grid extents.
pub fn grid_vertical_path(src: &VertexSource<'_>, vi: usize, extents: &GridExtents) -> Formula {
    let mut b = FormulaBuilder::new();
    let scope = src.scope(&mut b);
    let p = scope.point(&mut b, vi);
    path_output(
        b,
        vec![
            SymPoint::new(p.x.clone(), Expr::num(extents.y_min)),
            SymPoint::new(p.x, Expr::num(extents.y_max)),
        ],
        false,
    )
}

/// Horizontal grid line through vertex `vi`, spanning the grid extents.
pub fn grid_horizontal_path(src: &VertexSource<'_>, vi: usize, extents: &GridExtents) -> Formula {
    let mut b = FormulaBuilder::new();
    let scope = src.scope(&mut b);
    let p = scope.point(&mut b, vi);
    path_output(
        b,
        vec![
            SymPoint::new(Expr::num(extents.x_min), p.y.clone()),
            SymPoint::new(Expr::num(extents.x_max), p.y),
        ],
        false,
    )
}

/// Coordinate label text of vertex `vi`.
pub fn label_text(src: &VertexSource<'_>, vi: usize) -> Formula {
    let mut b = FormulaBuilder::new();
    let scope = src.scope(&mut b);
    let p = scope.point(&mut b, vi);
    b.finish(Output::Label {
        value: p.into_array(),
    })
}

/// Label anchor: the vertex plus the Labels Offset control, shifted vertically by `offset_y`.
pub fn label_position(src: &VertexSource<'_>, vi: usize, offset_y: f64) -> Formula {
    let mut b = FormulaBuilder::new();
    let scope = src.scope(&mut b);
    let p = scope.point(&mut b, vi);
    let x = p.x + Expr::control_component(names::LABELS_OFFSET, 0);
    let y = p.y + Expr::control_component(names::LABELS_OFFSET, 1);
    let y = if offset_y < 0.0 {
        y - Expr::num(-offset_y)
    } else {
        y + Expr::num(offset_y)
    };
    b.finish(Output::Vector { value: [x, y] })
}

/// Bound circumcircle terms: determinant, center and radius.
struct CircleTerms {
    center: SymPoint,
    radius: Expr,
}

fn circle_terms(b: &mut FormulaBuilder, src: &VertexSource<'_>, ijk: [usize; 3]) -> CircleTerms {
    let scope = src.scope(b);
    let p1 = scope.point(b, ijk[0]);
    let p2 = scope.point(b, ijk[1]);
    let p3 = scope.point(b, ijk[2]);

    let area = p1.x.clone() * (p2.y.clone() - p3.y.clone())
        + p2.x.clone() * (p3.y.clone() - p1.y.clone())
        + p3.x.clone() * (p1.y.clone() - p2.y.clone());
    let d = b.bind(Expr::num(2.0) * area);
    let sq = |p: &SymPoint| p.x.clone() * p.x.clone() + p.y.clone() * p.y.clone();
    let a2 = b.bind(sq(&p1));
    let b2 = b.bind(sq(&p2));
    let c2 = b.bind(sq(&p3));

    let degenerate = || d.clone().abs().lt(Expr::num(COLLINEAR_EPS));
    let cx_num = a2.clone() * (p2.y.clone() - p3.y.clone())
        + b2.clone() * (p3.y.clone() - p1.y.clone())
        + c2.clone() * (p1.y.clone() - p2.y.clone());
    let cy_num = a2 * (p3.x.clone() - p2.x.clone())
        + b2 * (p1.x.clone() - p3.x.clone())
        + c2 * (p2.x.clone() - p1.x.clone());
    let cx = b.bind(Expr::select(
        degenerate(),
        Expr::num(0.0),
        cx_num / d.clone(),
    ));
    let cy = b.bind(Expr::select(
        degenerate(),
        Expr::num(0.0),
        cy_num / d.clone(),
    ));
    let dx = cx.clone() - p1.x;
    let dy = cy.clone() - p1.y;
    let r = (dx.clone() * dx + dy.clone() * dy).sqrt();
    let radius = b.bind(Expr::select(degenerate(), Expr::num(0.0), r));
    CircleTerms {
        center: SymPoint::new(cx, cy),
        radius,
    }
}

/// Circumcenter of three vertices; the origin when they are collinear.
pub fn circumcircle_center(src: &VertexSource<'_>, ijk: [usize; 3]) -> Formula {
    let mut b = FormulaBuilder::new();
    let t = circle_terms(&mut b, src, ijk);
    b.finish(Output::Vector {
        value: t.center.into_array(),
    })
}

/// Ellipse size `[2r, 2r]` of the circumcircle; zero when collinear.
pub fn circumcircle_size(src: &VertexSource<'_>, ijk: [usize; 3]) -> Formula {
    let mut b = FormulaBuilder::new();
    let t = circle_terms(&mut b, src, ijk);
    let s = b.bind(t.radius * 2.0);
    b.finish(Output::Vector {
        value: [s.clone(), s],
    })
}

/// Ray from a vertex through its handle tip, Tangent Length long.
pub fn tangent_ray_path(src: &VertexSource<'_>, vi: usize, side: TangentSide) -> Formula {
    let mut b = FormulaBuilder::new();
    let scope = src.scope(&mut b);
    let cv = scope.point(&mut b, vi);
    let ce = scope.handle_end(&mut b, vi, side);
    let dx = b.bind(ce.x - cv.x.clone());
    let dy = b.bind(ce.y - cv.y.clone());
    let d = b.bind((dx.clone() * dx.clone() + dy.clone() * dy.clone()).sqrt());
    let ux = b.bind(Expr::select(
        d.clone().gt(Expr::num(DIRECTION_EPS)),
        dx / d.clone(),
        Expr::num(0.0),
    ));
    let uy = b.bind(Expr::select(
        d.clone().gt(Expr::num(DIRECTION_EPS)),
        dy / d,
        Expr::num(0.0),
    ));
    let len = b.bind(Expr::control(names::TANGENT_LENGTH));
    let end = SymPoint::new(
        cv.x.clone() + ux * len.clone(),
        cv.y.clone() + uy * len,
    );
    path_output(b, vec![cv, end], false)
}

/// Triangulation edge between two vertices.
pub fn diagonal_path(src: &VertexSource<'_>, a: usize, bi: usize) -> Formula {
    let mut b = FormulaBuilder::new();
    let scope = src.scope(&mut b);
    let p1 = scope.point(&mut b, a);
    let p2 = scope.point(&mut b, bi);
    path_output(b, vec![p1, p2], false)
}

/// Perpendicular bisector of segment `a b`, Bisector Length to each side of the midpoint.
pub fn bisector_path(src: &VertexSource<'_>, a: usize, bi: usize) -> Formula {
    let mut b = FormulaBuilder::new();
    let scope = src.scope(&mut b);
    let v0 = scope.point(&mut b, a);
    let v1 = scope.point(&mut b, bi);
    let mx = b.bind((v0.x.clone() + v1.x.clone()) / 2.0);
    let my = b.bind((v0.y.clone() + v1.y.clone()) / 2.0);
    let ex = b.bind(v1.x - v0.x);
    let ey = b.bind(v1.y - v0.y);
    let el = b.bind((ex.clone() * ex.clone() + ey.clone() * ey.clone()).sqrt());
    let short = || el.clone().lt(Expr::num(DIRECTION_EPS));
    let px = b.bind(Expr::select(short(), Expr::num(0.0), -ey / el.clone()));
    let py = b.bind(Expr::select(short(), Expr::num(0.0), ex / el.clone()));
    let len = b.bind(Expr::control(names::BISECTOR_LENGTH));
    path_output(
        b,
        vec![
            SymPoint::new(
                mx.clone() - px.clone() * len.clone(),
                my.clone() - py.clone() * len.clone(),
            ),
            SymPoint::new(mx + px * len.clone(), my + py * len),
        ],
        false,
    )
}

/// Offset amount of contour `level`: Contour Spacing times the level multiplier.
pub fn contour_offset(level: usize) -> Formula {
    let mult = CONTOUR_LEVELS.get(level).map_or(1.0, |l| l.spacing);
    Formula::scalar(Expr::control(names::CONTOUR_SPACING) * mult)
}

/// Group opacity of contour `level`; hidden once Contour Count drops below the level.
pub fn contour_opacity(level: usize) -> Formula {
    let opacity = CONTOUR_LEVELS.get(level).map_or(0.0, |l| l.opacity);
    Formula::scalar(Expr::select(
        Expr::control(names::CONTOUR_COUNT).ge(Expr::num(level as f64 + 1.0)),
        Expr::num(opacity),
        Expr::num(0.0),
    ))
}

/// Values that do not come from the path but still shape element geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryParams {
    pub extents: GridExtents,
    pub label_offset_y: f64,
}

/// Source-dependent bindings of element `id`, read through `src`.
///
/// Diagonal guides are static and have none.
pub fn geometry_bindings(
    id: ElementId,
    src: &VertexSource<'_>,
    params: &GeometryParams,
) -> Vec<(Slot, Binding)> {
    let f = Binding::formula;
    match id {
        ElementId::Anchor { vertex, .. } => vec![(Slot::Position, f(vertex_position(src, vertex)))],
        ElementId::HandleDot { vertex, side, .. } => {
            vec![(Slot::Position, f(handle_position(src, vertex, side)))]
        }
        ElementId::HandleLine { vertex, side, .. } => {
            vec![(Slot::Path, f(handle_line_path(src, vertex, side)))]
        }
        ElementId::Outline { .. } | ElementId::Contour { .. } => {
            vec![(Slot::Path, f(outline_path(src)))]
        }
        ElementId::Label { vertex, .. } => vec![
            (Slot::Text, f(label_text(src, vertex))),
            (
                Slot::Position,
                f(label_position(src, vertex, params.label_offset_y)),
            ),
        ],
        ElementId::GridVertical { vertex, .. } => vec![(
            Slot::Path,
            f(grid_vertical_path(src, vertex, &params.extents)),
        )],
        ElementId::GridHorizontal { vertex, .. } => vec![(
            Slot::Path,
            f(grid_horizontal_path(src, vertex, &params.extents)),
        )],
        ElementId::DiagonalGuide { .. } => Vec::new(),
        ElementId::Circumcircle { i, j, k, .. } => vec![
            (Slot::Position, f(circumcircle_center(src, [i, j, k]))),
            (Slot::Size, f(circumcircle_size(src, [i, j, k]))),
        ],
        ElementId::Tangent { vertex, side, .. } => {
            vec![(Slot::Path, f(tangent_ray_path(src, vertex, side)))]
        }
        ElementId::Diagonal { a, b, .. } => vec![(Slot::Path, f(diagonal_path(src, a, b)))],
        ElementId::Bisector { a, b, .. } => vec![(Slot::Path, f(bisector_path(src, a, b)))],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/formulas.rs"]
mod tests;
