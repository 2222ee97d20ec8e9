//! Typed blocks produced by normalizing raw instances.

use serde::{Deserialize, Serialize};

use super::catalog::BlockKind;
use super::instance::BlockInstance;
use super::value::{integer_or, text_or_empty};

/// Default bubble duration in milliseconds when `time` is missing.
pub const DEFAULT_MESSAGE_MS: i64 = 1000;

/// Kind of message bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    /// Speech bubble.
    Speak,
    /// Thought bubble.
    Think,
}

/// A block with its parameters coerced to their expected types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Block {
    /// Advance `x` by `steps`.
    Move {
        /// Horizontal displacement.
        steps: i64,
    },
    /// Add `degrees` to the angle.
    Turn {
        /// Rotation in degrees.
        degrees: i64,
    },
    /// Replace the position.
    GoTo {
        /// Target x.
        x: i64,
        /// Target y.
        y: i64,
    },
    /// Re-run the non-repeat blocks of the enclosing list.
    Repeat {
        /// Iteration count.
        times: i64,
    },
    /// Speech bubble.
    Speak {
        /// Bubble text.
        text: String,
        /// Display time in milliseconds.
        time: i64,
    },
    /// Thought bubble.
    Think {
        /// Bubble text.
        text: String,
        /// Display time in milliseconds.
        time: i64,
    },
}

impl Block {
    /// Coerce a raw instance. Missing or non-numeric inputs take their defaults.
    pub fn from_instance(instance: &BlockInstance) -> Self {
        let int = |name: &str, default: i64| integer_or(instance.value(name), default);
        match instance.kind {
            BlockKind::Move => Block::Move {
                steps: int("steps", 0),
            },
            BlockKind::Turn => Block::Turn {
                degrees: int("degrees", 0),
            },
            BlockKind::GoTo => Block::GoTo {
                x: int("x", 0),
                y: int("y", 0),
            },
            BlockKind::Repeat => Block::Repeat {
                times: int("times", 0),
            },
            BlockKind::Speak => Block::Speak {
                text: text_or_empty(instance.value("text")),
                time: int("time", DEFAULT_MESSAGE_MS),
            },
            BlockKind::Think => Block::Think {
                text: text_or_empty(instance.value("text")),
                time: int("time", DEFAULT_MESSAGE_MS),
            },
        }
    }

    /// Kind of this block.
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Move { .. } => BlockKind::Move,
            Block::Turn { .. } => BlockKind::Turn,
            Block::GoTo { .. } => BlockKind::GoTo,
            Block::Repeat { .. } => BlockKind::Repeat,
            Block::Speak { .. } => BlockKind::Speak,
            Block::Think { .. } => BlockKind::Think,
        }
    }

    /// Whether this is a `repeat` block.
    pub fn is_repeat(&self) -> bool {
        matches!(self, Block::Repeat { .. })
    }
}

impl From<&BlockInstance> for Block {
    fn from(instance: &BlockInstance) -> Self {
        Block::from_instance(instance)
    }
}
