//! CLI command implementations.

pub(crate) mod serve;
pub(crate) mod view;

pub(crate) use serve::ServeArgs;
pub(crate) use view::ViewArgs;
