//! Sprite identity, geometry, and per-sprite state

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::blocks::MessageKind;

/// Sprite identifier, unique and stable for the lifetime of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteId(pub u64);

impl SpriteId {
    /// Create from a raw id
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point on the stage plane. `x` grows rightward, `y` downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Position {
    /// Create a position
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between two positions
    pub fn midpoint(self, other: Position) -> Position {
        Position::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Position plus orientation; the state an executor run threads through
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// Location
    pub position: Position,
    /// Orientation in degrees, accumulated without wrapping
    pub angle: f64,
}

impl Pose {
    /// Create a pose
    pub const fn new(position: Position, angle: f64) -> Self {
        Self { position, angle }
    }
}

/// Full state of one sprite on the stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteState {
    /// Stable identifier
    pub id: SpriteId,
    /// Display name
    pub name: String,
    /// Current position
    pub position: Position,
    /// Current orientation in degrees
    pub angle: f64,
    /// Bubble text currently shown, if any
    pub message: Option<String>,
    /// Kind of bubble currently shown
    pub message_kind: Option<MessageKind>,
}

impl SpriteState {
    /// Create a sprite at `position` facing angle 0 with no message
    pub fn new(id: SpriteId, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            angle: 0.0,
            message: None,
            message_kind: None,
        }
    }

    /// Current pose
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.angle)
    }
}
