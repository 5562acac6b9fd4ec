//! What a build emits: layers, elements, their identities and the formulas bound to them.

pub(crate) mod emit;
pub(crate) mod formulas;
pub(crate) mod identity;
pub(crate) mod model;
