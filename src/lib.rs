//! path-anatomy generates live "anatomy" overlays for vector paths.
//!
//! Given a source layer (a tree of groups and paths, each with an affine frame), the crate plans a
//! stack of generated layers: anchor points, tangent handles, outlines, a deduplicated grid,
//! construction geometry (circumcircles, tangent rays, Delaunay diagonals, offset contours,
//! perpendicular bisectors) and coordinate labels. Every property is either static or a
//! [`Formula`] that reads the source geometry and a flat set of named controls, so the overlay
//! follows the source as it is edited and reveals itself over one `Timeline` control.
//!
//! # Pipeline overview
//!
//! 1. **Discover**: `SourceLayer -> SourceSnapshot` (every leaf path with its frame chain)
//! 2. **Plan**: `SourceSnapshot -> ScenePlan` (generated layers, elements and their bindings)
//! 3. **Apply**: [`build`] installs the plan into a [`Document`] inside one transaction
//! 4. **Evaluate**: [`Document::evaluate`] runs any binding at the document time
//! 5. **Bake** (optional): [`bake`] freezes the outlines and relinks every dependent to them
//!
//! Formulas evaluate natively and also serialize to the host's expression text with
//! [`Formula::to_source`].
#![forbid(unsafe_code)]

mod animation;
mod choreography;
mod config;
mod expression;
mod foundation;
mod geometry;
mod ops;
mod plan;
mod scene;
mod source;
mod transform;

pub use animation::ease::{Ease, KeyframeEase};
pub use animation::keyframes::{InterpMode, Keyframe, Keyframes};
pub use choreography::{
    Category, ChoreographyParameters, PhaseWindow, RevealKind, StaggerSlot, ease, progress,
    reveal_formula,
};
pub use config::{AutoAnimateOptions, BuildOptions, Profile};
pub use expression::address::{FrameAddr, PathAddr};
pub use expression::ast::{Axis, Expr, FrameField, SourceRef, VarId, VertexAttr};
pub use expression::context::{
    ControlParameters, ControlValue, EvalContext, NoGeometry, SourceGeometry,
};
pub use expression::eval::Value;
pub use expression::formula::{Formula, FormulaBuilder, Output, PathOutput, SymPoint};
pub use foundation::core::{AffineFrame, PathShape, Point, TangentSide, Vec2};
pub use foundation::error::{AnatomyError, AnatomyResult};
pub use geometry::WorldPath;
pub use geometry::circle::{Circumcircle, circumcircle};
pub use geometry::contour::offset_polygon;
pub use geometry::delaunay::triangulate;
pub use geometry::grid::GridExtents;
pub use ops::animate::{AUTO_ANIMATE_EASE, auto_animate, reset_animation};
pub use ops::bake::{BakeReport, SkippedDependent, bake, bake_with};
pub use ops::build::{BuildOutcome, BuildReport, Confirm, build};
pub use ops::layers::{cleanup, precompose};
pub use plan::emit::plan_scene;
pub use plan::identity::{
    CONTROL_LAYER, ElementId, LAYER_PREFIX, PRECOMP_NAME, ParseElementIdError, is_generated_layer,
};
pub use plan::model::{
    Binding, Element, ElementKind, GeneratedLayer, LayerRole, Paint, Reveal, ScenePlan, Slot,
    Stroke, Style,
};
pub use scene::control::{ControlLayer, ControlParam, names};
pub use scene::document::{Document, Layer};
pub use scene::transaction::{Transaction, transact};
pub use source::discover::{PathDescriptor, SourceSnapshot, discover_paths};
pub use source::model::{Content, SourceLayer};
pub use transform::affine::{to_local, to_world, vector_to_world};
