//! Document-level operations. Each one either applies completely or leaves the document as it was.

pub(crate) mod animate;
pub(crate) mod bake;
pub(crate) mod build;
pub(crate) mod layers;
