//! Maps the master timeline onto per-element reveal progress.
//!
//! The numeric path ([`progress`]) and the symbolic path ([`reveal_formula`]) perform the same
//! operations in the same order so a formula evaluated by the host agrees with the core.

pub(crate) mod phase;
pub(crate) mod reveal;

pub use phase::{Category, ChoreographyParameters, PhaseWindow, StaggerSlot, ease, progress};
pub use reveal::{RevealKind, reveal_formula};
