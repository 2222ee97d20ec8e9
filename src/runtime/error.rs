//! Error types for the stage runtime
//!
//! Block interpretation itself never fails; these errors cover the surface
//! operations around it (roster lookups, list edits, config and scene files).

use std::io;
use thiserror::Error;

use super::sprite::SpriteId;

/// Top-level stage error
#[derive(Debug, Error)]
pub enum StageError {
    /// No sprite with this id is on the roster
    #[error("Sprite {0} not found")]
    SpriteNotFound(SpriteId),

    /// Action list index outside the list
    #[error("Block index {index} out of range for action list of length {len}")]
    BlockIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Current list length
        len: usize,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Scene description errors
    #[error("Scene error: {0}")]
    Scene(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type using StageError
pub type StageResult<T> = std::result::Result<T, StageError>;
