//! Blockstage – a block-programming sandbox engine
//!
//! This crate implements the execution side of a visual block editor:
//! - A static catalog of action blocks (move, turn, go-to, repeat, speak, think)
//! - Lenient normalization of user-entered block parameters into typed blocks
//! - A per-sprite sequence executor with flat `repeat` semantics and timed bubbles
//! - Concurrent plays across all sprites on a single cooperative task
//! - Post-run proximity collision detection with rollback to pre-run positions
//! - A scripted two-sprite "hero" choreography

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Block catalog, instances, and typed blocks
pub mod blocks;
/// Stage runtime: sprite store, executor, collisions, choreography
pub mod runtime;

// Re-export key types for convenience
pub use blocks::{ActionList, Block, BlockInstance, BlockKind, ParamValue};
pub use runtime::{Stage, StageConfig};

/// Current version of the blockstage crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
