//! Formula-building twin of [`crate::transform::affine`].
//!
//! Every step reproduces the numeric operation order of [`AffineFrame::apply`], so a formula
//! evaluated against live values equal to the snapshot gives the same bits.

use crate::expression::address::FrameAddr;
use crate::expression::ast::{Axis, Expr, FrameField};
use crate::expression::formula::{FormulaBuilder, SymPoint};
use crate::foundation::core::AffineFrame;

/// Bound terms of one frame: anchor, position, scale factors and the rotation's sine/cosine.
#[derive(Clone, Debug)]
pub struct FrameTerms {
    anchor: SymPoint,
    position: SymPoint,
    sx: Expr,
    sy: Expr,
    sin: Expr,
    cos: Expr,
}

impl FrameTerms {
    /// Read the frame live from the host.
    pub fn live(b: &mut FormulaBuilder, addr: &FrameAddr) -> Self {
        let field = |field, axis| Expr::frame_field(addr, field, axis);
        let anchor = SymPoint::new(field(FrameField::Anchor, Axis::X), field(FrameField::Anchor, Axis::Y));
        let position = SymPoint::new(
            field(FrameField::Position, Axis::X),
            field(FrameField::Position, Axis::Y),
        );
        let sx = b.bind(field(FrameField::Scale, Axis::X) / 100.0);
        let sy = b.bind(field(FrameField::Scale, Axis::Y) / 100.0);
        let rad = b.bind(field(FrameField::Rotation, Axis::X) * std::f64::consts::PI / 180.0);
        let sin = b.bind(rad.clone().sin());
        let cos = b.bind(rad.cos());
        Self {
            anchor: b.bind_point(anchor),
            position: b.bind_point(position),
            sx,
            sy,
            sin,
            cos,
        }
    }

    /// Bake a snapshot frame in as literals.
    pub fn constant(frame: AffineFrame) -> Self {
        let rad = frame.rotation_rad();
        Self {
            anchor: SymPoint::constant(frame.anchor.x, frame.anchor.y),
            position: SymPoint::constant(frame.position.x, frame.position.y),
            sx: Expr::num(frame.scale_pct.x / 100.0),
            sy: Expr::num(frame.scale_pct.y / 100.0),
            sin: Expr::num(rad.sin()),
            cos: Expr::num(rad.cos()),
        }
    }

    /// `apply` in formula form; intermediate coordinates are bound so the text stays linear.
    pub fn apply(&self, b: &mut FormulaBuilder, p: SymPoint) -> SymPoint {
        let x = b.bind((p.x - self.anchor.x.clone()) * self.sx.clone());
        let y = b.bind((p.y - self.anchor.y.clone()) * self.sy.clone());
        let nx = x.clone() * self.cos.clone() - y.clone() * self.sin.clone();
        let ny = x * self.sin.clone() + y * self.cos.clone();
        b.bind_point(SymPoint::new(
            nx + self.position.x.clone(),
            ny + self.position.y.clone(),
        ))
    }

    pub fn apply_vector(&self, b: &mut FormulaBuilder, v: SymPoint) -> SymPoint {
        let x = b.bind(v.x * self.sx.clone());
        let y = b.bind(v.y * self.sy.clone());
        let nx = x.clone() * self.cos.clone() - y.clone() * self.sin.clone();
        let ny = x * self.sin.clone() + y * self.cos.clone();
        b.bind_point(SymPoint::new(nx, ny))
    }
}

/// Symbolic ancestor chain (innermost first) followed by the owner frame.
#[derive(Clone, Debug)]
pub struct SymChain {
    frames: Vec<FrameTerms>,
}

impl SymChain {
    /// Chain that reads `groups` (innermost first) and then `owner` live.
    pub fn bind<'a>(
        b: &mut FormulaBuilder,
        groups: impl IntoIterator<Item = &'a FrameAddr>,
        owner: &FrameAddr,
    ) -> Self {
        let mut frames: Vec<FrameTerms> = groups.into_iter().map(|g| FrameTerms::live(b, g)).collect();
        frames.push(FrameTerms::live(b, owner));
        Self { frames }
    }

    /// Chain that maps every point onto itself (frozen data already in display space).
    pub fn identity() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn to_world(&self, b: &mut FormulaBuilder, p: SymPoint) -> SymPoint {
        self.frames.iter().fold(p, |acc, f| f.apply(b, acc))
    }

    pub fn to_world_vector(&self, b: &mut FormulaBuilder, v: SymPoint) -> SymPoint {
        self.frames.iter().fold(v, |acc, f| f.apply_vector(b, acc))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/symbolic.rs"]
mod tests;
