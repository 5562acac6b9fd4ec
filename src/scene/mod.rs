pub(crate) mod control;
pub(crate) mod document;
pub(crate) mod transaction;
