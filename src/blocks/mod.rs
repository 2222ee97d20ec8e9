//! Block model: the static catalog, raw block instances, and typed blocks.
//!
//! The editor produces [`BlockInstance`]s whose parameters are loosely typed.
//! Before a run each instance is normalized once into a [`Block`], the tagged
//! form the executor interprets.

/// Typed blocks and normalization.
pub mod block;
/// Static catalog of block kinds.
pub mod catalog;
/// Block instances and action lists.
pub mod instance;
/// Raw parameter values and coercion.
pub mod value;

pub use block::{Block, DEFAULT_MESSAGE_MS, MessageKind};
pub use catalog::{BlockKind, BlockType, Category, catalog};
pub use instance::{ActionList, BlockInstance};
pub use value::ParamValue;
