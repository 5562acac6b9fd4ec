//! Scene plan for one source snapshot.

use crate::choreography::{Category, RevealKind, StaggerSlot};
use crate::config::{BuildOptions, Profile};
use crate::expression::ast::{Compare, Expr};
use crate::expression::eval::Value;
use crate::expression::formula::Formula;
use crate::foundation::core::{PathShape, TangentSide, Vec2};
use crate::foundation::error::{AnatomyError, AnatomyResult};
use crate::geometry::bisector::select_bisectors;
use crate::geometry::circle::select_circumcircles;
use crate::geometry::contour::select_contours;
use crate::geometry::delaunay::select_diagonals;
use crate::geometry::grid::{GridExtents, diagonal_guides, grid_lines};
use crate::geometry::tangent::select_tangents;
use crate::geometry::{WorldPath, world_paths};
use crate::plan::formulas::{
    GeometryParams, VertexSource, contour_offset, contour_opacity, geometry_bindings,
};
use crate::plan::identity::{self, ElementId};
use crate::plan::model::{
    Binding, Element, ElementKind, GeneratedLayer, LayerRole, LineJoin, Paint, Reveal, ScenePlan,
    Slot, Stroke, Style,
};
use crate::scene::control::{ControlLayer, names};
use crate::source::discover::SourceSnapshot;

const GRID_STROKE: f64 = 1.0;
const HANDLE_LINE_STROKE: f64 = 1.5;
const HANDLE_LINE_DASH: [f64; 2] = [6.0, 4.0];
const CIRCUMCIRCLE_STROKE: f64 = 0.75;
const CONSTRUCTION_STROKE: f64 = 0.5;
const TANGENT_DASH: [f64; 2] = [4.0, 6.0];
const TANGENT_OPACITY: f64 = 20.0;
const TRIANGULATION_OPACITY: f64 = 15.0;
const BISECTOR_OPACITY: f64 = 15.0;

fn show(name: &str) -> Compare {
    Expr::control(name).gt(Expr::num(0.0))
}

/// `Show X ? Global Opacity : 0`.
pub fn visibility(show_control: &str) -> Binding {
    Binding::formula(Formula::scalar(Expr::select(
        show(show_control),
        Expr::control(names::GLOBAL_OPACITY),
        Expr::num(0.0),
    )))
}

fn grid_visibility(profile: Profile) -> Binding {
    let opacity = match profile {
        Profile::Extended => {
            Expr::control(names::GRID_OPACITY) * Expr::control(names::GRID_ELEMENTS_OPACITY) / 100.0
        }
        Profile::Minimal => Expr::control(names::GRID_OPACITY),
    };
    Binding::formula(Formula::scalar(Expr::select(
        show(names::SHOW_GRID),
        opacity,
        Expr::num(0.0),
    )))
}

/// Opacity factor of a construction layer relative to Grid Elements Opacity.
#[derive(Clone, Copy, Debug)]
enum Share {
    Control(&'static str),
    Percent(f64),
    Full,
}

fn construction_visibility(share: Share) -> Binding {
    let master = Expr::control(names::GRID_ELEMENTS_OPACITY);
    let opacity = match share {
        Share::Control(name) => master * Expr::control(name) / 100.0,
        Share::Percent(p) => master * p / 100.0,
        Share::Full => master,
    };
    Binding::formula(Formula::scalar(Expr::select(
        show(names::SHOW_GRID),
        opacity,
        Expr::num(0.0),
    )))
}

/// Layer position read from a point control.
pub fn offset_position(control: &str) -> Binding {
    Binding::formula(Formula::vector(
        Expr::control_component(control, 0),
        Expr::control_component(control, 1),
    ))
}

fn control_pair(name: &str) -> Binding {
    Binding::formula(Formula::vector(Expr::control(name), Expr::control(name)))
}

fn control_scalar(name: &str) -> Binding {
    Binding::formula(Formula::scalar(Expr::control(name)))
}

fn fill_style(color: &str) -> Style {
    Style {
        fill: Some(Paint::control(color)),
        ..Style::default()
    }
}

fn stroke_style(stroke: Stroke) -> Style {
    Style {
        stroke: Some(stroke),
        ..Style::default()
    }
}

fn reveal(category: Category, index: usize, total: usize, kind: RevealKind) -> Reveal {
    Reveal {
        category,
        slot: StaggerSlot::new(index, total),
        kind,
    }
}

fn static_path(shape: PathShape) -> Binding {
    Binding::Static {
        value: Value::Path(shape),
    }
}

struct Planner<'a> {
    snapshot: &'a SourceSnapshot,
    options: &'a BuildOptions,
    world: Vec<WorldPath>,
    params: GeometryParams,
}

impl<'a> Planner<'a> {
    fn source(&self, path: usize) -> AnatomyResult<VertexSource<'a>> {
        let snapshot = self.snapshot;
        snapshot
            .paths
            .get(path)
            .map(|p| VertexSource::live(snapshot, p))
            .ok_or_else(|| {
                AnatomyError::construction(
                    format!("path {path}"),
                    "element refers to an undiscovered path",
                )
            })
    }

    /// `base` with its source-dependent bindings installed.
    fn element(&self, base: Element) -> AnatomyResult<Element> {
        let Some(path) = base.id.path() else {
            return Ok(base);
        };
        let src = self.source(path)?;
        Ok(geometry_bindings(base.id, &src, &self.params)
            .into_iter()
            .fold(base, |e, (slot, binding)| e.bind(slot, binding)))
    }

    fn grid(&self) -> AnatomyResult<GeneratedLayer> {
        let extents = &self.params.extents;
        let lines = grid_lines(&self.world, extents);
        let guides = if self.options.profile.has_constructions() {
            diagonal_guides(&self.world, extents)
        } else {
            Vec::new()
        };
        let total = lines.len() + guides.len();
        let style = || stroke_style(Stroke::solid(Paint::control(names::GRID_COLOR), GRID_STROKE));

        let mut layer = GeneratedLayer::new(
            identity::GRID_LAYER,
            LayerRole::Grid,
            grid_visibility(self.options.profile),
        );
        layer.position = offset_position(names::GRID_OFFSET);

        let ids = lines
            .vertical
            .iter()
            .map(|g| ElementId::GridVertical {
                path: g.path,
                vertex: g.vertex,
            })
            .chain(lines.horizontal.iter().map(|g| ElementId::GridHorizontal {
                path: g.path,
                vertex: g.vertex,
            }));
        for (idx, id) in ids.enumerate() {
            let e = Element::new(id, ElementKind::Path)
                .with_style(style())
                .revealed(
                    Slot::TrimEnd,
                    reveal(Category::Grid, idx, total, RevealKind::Draw),
                );
            layer.elements.push(self.element(e)?);
        }
        for (gi, guide) in guides.iter().enumerate() {
            let (a, b) = guide.endpoints();
            let e = Element::new(ElementId::DiagonalGuide { index: gi }, ElementKind::Path)
                .bind(Slot::Path, static_path(PathShape::polygon(vec![a, b], false)))
                .with_style(style())
                .revealed(
                    Slot::TrimEnd,
                    reveal(Category::Grid, lines.len() + gi, total, RevealKind::Draw),
                );
            layer.elements.push(e);
        }
        tracing::debug!(
            vertical = lines.vertical.len(),
            horizontal = lines.horizontal.len(),
            guides = guides.len(),
            "planned grid"
        );
        Ok(layer)
    }

    /// Construction layer whose elements all stroke a single style and stagger in list order.
    fn construction(
        &self,
        name: &str,
        role: LayerRole,
        share: Share,
        category: Category,
        ids: Vec<ElementId>,
        decorate: impl Fn(Element) -> Element,
    ) -> AnatomyResult<Option<GeneratedLayer>> {
        if ids.is_empty() {
            return Ok(None);
        }
        let total = ids.len();
        let mut layer = GeneratedLayer::new(name, role, construction_visibility(share));
        for (idx, id) in ids.into_iter().enumerate() {
            let (kind, reveal_kind, slot) = match category {
                Category::Circumcircle => (ElementKind::Ellipse, RevealKind::Pop, Slot::Scale),
                _ => (ElementKind::Path, RevealKind::Draw, Slot::TrimEnd),
            };
            let e = decorate(Element::new(id, kind))
                .revealed(slot, reveal(category, idx, total, reveal_kind));
            layer.elements.push(self.element(e)?);
        }
        tracing::debug!(layer = name, elements = total, "planned construction layer");
        Ok(Some(layer))
    }

    fn constructions(&self) -> AnatomyResult<Vec<GeneratedLayer>> {
        let white = |width: f64| stroke_style(Stroke::solid(Paint::WHITE, width));
        let mut layers = Vec::new();

        let circles = select_circumcircles(&self.world)
            .into_iter()
            .map(|c| ElementId::Circumcircle {
                path: c.path,
                i: c.i,
                j: c.j,
                k: c.k,
            })
            .collect();
        layers.extend(self.construction(
            identity::CIRCUMCIRCLE_LAYER,
            LayerRole::Circumcircles,
            Share::Control(names::CIRCUMCIRCLE_OPACITY),
            Category::Circumcircle,
            circles,
            |e| e.with_style(white(CIRCUMCIRCLE_STROKE)),
        )?);

        let tangents = select_tangents(&self.world)
            .into_iter()
            .map(|t| ElementId::Tangent {
                path: t.path,
                vertex: t.vertex,
                side: t.side,
            })
            .collect();
        layers.extend(self.construction(
            identity::TANGENT_LAYER,
            LayerRole::Tangents,
            Share::Percent(TANGENT_OPACITY),
            Category::Tangent,
            tangents,
            |e| {
                e.with_style(stroke_style(Stroke::dashed(
                    Paint::WHITE,
                    CONSTRUCTION_STROKE,
                    TANGENT_DASH[0],
                    TANGENT_DASH[1],
                )))
            },
        )?);

        let diagonals = select_diagonals(&self.world)
            .into_iter()
            .map(|d| ElementId::Diagonal {
                path: d.path,
                a: d.a,
                b: d.b,
            })
            .collect();
        layers.extend(self.construction(
            identity::TRIANGULATION_LAYER,
            LayerRole::Triangulation,
            Share::Percent(TRIANGULATION_OPACITY),
            Category::Triangulation,
            diagonals,
            |e| e.with_style(white(CONSTRUCTION_STROKE)),
        )?);

        let contours: Vec<_> = select_contours(&self.world);
        let contour_ids = contours
            .iter()
            .map(|c| ElementId::Contour {
                path: c.path,
                level: c.level,
            })
            .collect();
        layers.extend(self.construction(
            identity::CONTOUR_LAYER,
            LayerRole::Contours,
            Share::Full,
            Category::Contour,
            contour_ids,
            |e| {
                let ElementId::Contour { level, .. } = e.id else {
                    return e;
                };
                let width = crate::geometry::contour::CONTOUR_LEVELS
                    .get(level)
                    .map_or(CONSTRUCTION_STROKE, |l| l.stroke_width);
                e.with_style(Style {
                    stroke: Some(Stroke::solid(Paint::WHITE, width)),
                    offset_join: Some(LineJoin::Miter),
                    ..Style::default()
                })
                .bind(Slot::Offset, Binding::formula(contour_offset(level)))
                .bind(Slot::Opacity, Binding::formula(contour_opacity(level)))
            },
        )?);

        let bisectors = select_bisectors(&self.world)
            .into_iter()
            .map(|b| ElementId::Bisector {
                path: b.path,
                a: b.a,
                b: b.b,
            })
            .collect();
        layers.extend(self.construction(
            identity::BISECTOR_LAYER,
            LayerRole::Bisectors,
            Share::Percent(BISECTOR_OPACITY),
            Category::Bisector,
            bisectors,
            |e| e.with_style(white(CONSTRUCTION_STROKE)),
        )?);

        Ok(layers)
    }

    fn outlines(&self) -> AnatomyResult<GeneratedLayer> {
        let mut layer = GeneratedLayer::new(
            identity::OUTLINE_LAYER,
            LayerRole::Outlines,
            visibility(names::SHOW_OUTLINES),
        );
        layer.position = offset_position(names::OUTLINES_OFFSET);
        let total = self.snapshot.paths.len();
        for p in &self.snapshot.paths {
            let stroke = Stroke {
                paint: Paint::control(names::OUTLINE_COLOR),
                width: control_scalar(names::OUTLINE_WIDTH),
                dash: None,
            };
            let e = Element::new(ElementId::Outline { path: p.index }, ElementKind::Path)
                .with_style(stroke_style(stroke))
                .revealed(
                    Slot::TrimEnd,
                    reveal(Category::Outline, p.index, total, RevealKind::Draw),
                );
            layer.elements.push(self.element(e)?);
        }
        Ok(layer)
    }

    /// Handle dots and handle lines share one stagger slot per nonzero tangent.
    fn handles(&self) -> AnatomyResult<(GeneratedLayer, GeneratedLayer)> {
        let mut tips = Vec::new();
        for p in &self.snapshot.paths {
            for vi in 0..p.shape.len() {
                for side in [TangentSide::In, TangentSide::Out] {
                    if p.shape.tangent(vi, side) != Vec2::ZERO {
                        tips.push((p.index, vi, side));
                    }
                }
            }
        }
        let total = tips.len();

        let mut dots = GeneratedLayer::new(
            identity::HANDLE_LAYER,
            LayerRole::Handles,
            visibility(names::SHOW_HANDLES),
        );
        dots.position = offset_position(names::HANDLES_OFFSET);
        let mut lines = GeneratedLayer::new(
            identity::HANDLE_LINE_LAYER,
            LayerRole::HandleLines,
            visibility(names::SHOW_HANDLES),
        );
        lines.position = offset_position(names::HANDLES_OFFSET);

        for (idx, (path, vertex, side)) in tips.into_iter().enumerate() {
            let dot = Element::new(ElementId::HandleDot { path, vertex, side }, ElementKind::Rect)
                .bind(Slot::Size, control_pair(names::HANDLE_SIZE))
                .bind(Slot::Roundness, control_scalar(names::HANDLE_ROUNDNESS))
                .with_style(fill_style(names::HANDLE_COLOR))
                .revealed(
                    Slot::Scale,
                    reveal(Category::Handle, idx, total, RevealKind::Pop),
                );
            dots.elements.push(self.element(dot)?);

            let line = Element::new(ElementId::HandleLine { path, vertex, side }, ElementKind::Path)
                .with_style(stroke_style(Stroke::dashed(
                    Paint::control(names::HANDLE_COLOR),
                    HANDLE_LINE_STROKE,
                    HANDLE_LINE_DASH[0],
                    HANDLE_LINE_DASH[1],
                )))
                .revealed(
                    Slot::TrimEnd,
                    reveal(Category::Handle, idx, total, RevealKind::Draw),
                );
            lines.elements.push(self.element(line)?);
        }
        Ok((dots, lines))
    }

    fn anchors(&self) -> AnatomyResult<GeneratedLayer> {
        let mut layer = GeneratedLayer::new(
            identity::ANCHOR_LAYER,
            LayerRole::Anchors,
            visibility(names::SHOW_ANCHORS),
        );
        layer.position = offset_position(names::ANCHORS_OFFSET);
        let total = self.snapshot.total_vertices();
        let mut idx = 0;
        for p in &self.snapshot.paths {
            for vertex in 0..p.shape.len() {
                let e = Element::new(
                    ElementId::Anchor {
                        path: p.index,
                        vertex,
                    },
                    ElementKind::Rect,
                )
                .bind(Slot::Size, control_pair(names::ANCHOR_SIZE))
                .bind(Slot::Roundness, control_scalar(names::ANCHOR_ROUNDNESS))
                .with_style(fill_style(names::ANCHOR_COLOR))
                .revealed(
                    Slot::Scale,
                    reveal(Category::Anchor, idx, total, RevealKind::Pop),
                );
                layer.elements.push(self.element(e)?);
                idx += 1;
            }
        }
        Ok(layer)
    }

    /// One text layer per vertex.
    fn labels(&self) -> AnatomyResult<Vec<GeneratedLayer>> {
        let total = self.snapshot.total_vertices();
        let kind = ElementKind::Text {
            font: self.options.font_name(),
            font_size: self.options.label_font_size,
        };
        let mut layers = Vec::with_capacity(total);
        let mut idx = 0;
        for p in &self.snapshot.paths {
            for vertex in 0..p.shape.len() {
                let id = ElementId::Label {
                    path: p.index,
                    vertex,
                };
                let mut layer = GeneratedLayer::new(
                    id.name(),
                    LayerRole::Label,
                    visibility(names::SHOW_LABELS),
                );
                let e = Element::new(id, kind.clone())
                    .with_style(fill_style(names::LABEL_COLOR))
                    .revealed(
                        Slot::Scale,
                        reveal(Category::Label, idx, total, RevealKind::LabelPop),
                    );
                layer.elements.push(self.element(e)?);
                layers.push(layer);
                idx += 1;
            }
        }
        Ok(layers)
    }
}

/// Plan every generated layer for `snapshot`, bottom-most first.
///
/// Construction layers appear only in the extended profile and only when they have elements.
#[tracing::instrument(skip(snapshot, options), fields(source = %snapshot.layer, paths = snapshot.paths.len()))]
pub fn plan_scene(snapshot: &SourceSnapshot, options: &BuildOptions) -> AnatomyResult<ScenePlan> {
    if snapshot.is_empty() {
        return Err(AnatomyError::empty_source(format!(
            "no paths found in '{}'",
            snapshot.layer
        )));
    }

    let world = world_paths(snapshot);
    let all: Vec<_> = world.iter().flat_map(|w| w.points.iter().copied()).collect();
    let extents = GridExtents::from_points(&all).ok_or_else(|| {
        AnatomyError::empty_source(format!("paths in '{}' have no vertices", snapshot.layer))
    })?;
    let planner = Planner {
        snapshot,
        options,
        world,
        params: GeometryParams {
            extents,
            label_offset_y: options.label_offset_y,
        },
    };

    let mut layers = vec![planner.grid()?];
    if options.profile.has_constructions() {
        layers.extend(planner.constructions()?);
    }
    layers.push(planner.outlines()?);
    let (dots, lines) = planner.handles()?;
    layers.push(dots);
    layers.push(lines);
    layers.push(planner.anchors()?);
    layers.extend(planner.labels()?);

    let plan = ScenePlan {
        controls: ControlLayer::with_defaults(options.profile),
        layers,
    };
    tracing::info!(
        layers = plan.layers.len(),
        elements = plan.element_count(),
        vertices = snapshot.total_vertices(),
        "planned scene"
    );
    Ok(plan)
}

#[cfg(test)]
#[path = "../../tests/unit/plan/emit.rs"]
mod tests;
