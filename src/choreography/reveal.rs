//! Reveal bindings: trim-end or scale formulas driven by the choreography controls.

use crate::choreography::phase::{
    Category, ChoreographyParameters, EASING_DIVISOR, MIN_STAGGER_WIDTH, StaggerSlot, progress,
};
use crate::expression::ast::Expr;
use crate::expression::formula::{Formula, FormulaBuilder, Output};
use crate::scene::control::names;

/// Which slot the reveal drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealKind {
    /// Trim-path end percentage.
    Draw,
    /// Uniform scale percentage.
    Pop,
    /// Uniform scale percentage multiplied by the Label Scale control.
    LabelPop,
}

/// Reveal value computed directly: trim percent or scale percent.
pub fn reveal_value(
    params: &ChoreographyParameters,
    category: Category,
    slot: StaggerSlot,
    kind: RevealKind,
    label_scale: f64,
) -> f64 {
    let ep = progress(params, category, slot);
    match kind {
        RevealKind::Draw | RevealKind::Pop => ep * 100.0,
        RevealKind::LabelPop => ep * (label_scale / 100.0) * 100.0,
    }
}

fn clamp(v: Expr, lo: f64, hi: f64) -> Expr {
    v.clamp(Expr::num(lo), Expr::num(hi))
}

/// Live formula for one element's reveal.
///
/// Draw yields a scalar; both pop kinds yield an `[s, s]` scale.
pub fn reveal_formula(category: Category, slot: StaggerSlot, kind: RevealKind) -> Formula {
    let mut b = FormulaBuilder::new();
    let window = category.window();

    let tl = b.bind(clamp(Expr::control(names::TIMELINE), 0.0, 100.0));
    let timed = clamp(
        (tl - Expr::num(window.start)) / Expr::num(window.span()),
        0.0,
        1.0,
    );
    let raw = match category.override_control() {
        Some(name) => {
            let ov = b.bind(Expr::control(name));
            Expr::select(
                ov.clone().lt(Expr::num(100.0)),
                clamp(ov / 100.0, 0.0, 1.0),
                timed,
            )
        }
        None => timed,
    };
    let raw = b.bind(raw);

    let p = if category.staggered() {
        let sg = b.bind(clamp(Expr::control(names::STAGGER), 0.0, 100.0) / 100.0);
        let start = b.bind(Expr::num(slot.position()) * sg.clone());
        let width = b.bind((Expr::num(1.0) - sg).max(Expr::num(MIN_STAGGER_WIDTH)));
        let p = clamp((raw.clone() - start) / width, 0.0, 1.0);
        b.bind(Expr::select(raw.ge(Expr::num(1.0)), Expr::num(1.0), p))
    } else {
        raw
    };

    let e = b.bind(clamp(Expr::control(names::EASING), 0.0, 100.0));
    let k = b.bind(Expr::num(1.0) + e / EASING_DIVISOR);
    let ep = b.bind(Expr::num(1.0) - (Expr::num(1.0) - p).max(Expr::num(0.0)).pow(k));

    let output = match kind {
        RevealKind::Draw => Output::Scalar {
            value: ep * 100.0,
        },
        RevealKind::Pop => {
            let s = b.bind(ep * 100.0);
            Output::Vector {
                value: [s.clone(), s],
            }
        }
        RevealKind::LabelPop => {
            let s = b.bind(ep * (Expr::control(names::LABEL_SCALE) / 100.0) * 100.0);
            Output::Vector {
                value: [s.clone(), s],
            }
        }
    };
    b.finish(output)
}

#[cfg(test)]
#[path = "../../tests/unit/choreography/reveal.rs"]
mod tests;
