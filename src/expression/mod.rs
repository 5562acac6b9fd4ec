pub(crate) mod address;
pub(crate) mod ast;
pub(crate) mod context;
pub(crate) mod emit;
pub(crate) mod eval;
pub(crate) mod formula;
