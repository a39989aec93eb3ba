//! CLI command implementations.

mod common;
pub(crate) mod check;
pub(crate) mod render;
pub(crate) mod tree;

pub(crate) use check::CheckArgs;
pub(crate) use render::RenderArgs;
pub(crate) use tree::TreeArgs;
