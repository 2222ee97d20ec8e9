//! Owned sprite store shared between the stage, executors, and observers
//!
//! The store is an arena of sprite records keyed by id plus the roster order.
//! Handles are cheap clones over one shared lock. Lock guards never outlive a
//! single call, so no guard is ever held across an await point.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::error::{StageError, StageResult};
use super::sprite::{Pose, Position, SpriteId, SpriteState};
use crate::blocks::MessageKind;

#[derive(Debug, Default)]
struct StoreInner {
    sprites: HashMap<SpriteId, SpriteState>,
    roster: Vec<SpriteId>,
    next_id: u64,
}

/// Shared handle to the sprite collection
#[derive(Debug, Clone, Default)]
pub struct SpriteStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl SpriteStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sprite at the end of the roster and return its fresh id
    pub fn add(&self, name: impl Into<String>, position: Position) -> SpriteId {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let id = SpriteId(inner.next_id);
        inner.sprites.insert(id, SpriteState::new(id, name, position));
        inner.roster.push(id);
        id
    }

    /// Remove a sprite from the roster
    pub fn remove(&self, id: SpriteId) -> StageResult<SpriteState> {
        let mut inner = self.inner.write();
        let state = inner
            .sprites
            .remove(&id)
            .ok_or(StageError::SpriteNotFound(id))?;
        inner.roster.retain(|existing| *existing != id);
        Ok(state)
    }

    /// Overwrite a sprite's position, as a user drag does
    pub fn drag(&self, id: SpriteId, position: Position) -> StageResult<()> {
        self.update(id, |sprite| sprite.position = position)
    }

    /// Overwrite a sprite's orientation
    pub fn set_angle(&self, id: SpriteId, angle: f64) -> StageResult<()> {
        self.update(id, |sprite| sprite.angle = angle)
    }

    /// Copy of one sprite's state
    pub fn get(&self, id: SpriteId) -> StageResult<SpriteState> {
        self.inner
            .read()
            .sprites
            .get(&id)
            .cloned()
            .ok_or(StageError::SpriteNotFound(id))
    }

    /// Whether the sprite is on the roster
    pub fn contains(&self, id: SpriteId) -> bool {
        self.inner.read().sprites.contains_key(&id)
    }

    /// Roster ids in order
    pub fn ids(&self) -> Vec<SpriteId> {
        self.inner.read().roster.clone()
    }

    /// Copies of every sprite in roster order
    pub fn list(&self) -> Vec<SpriteState> {
        let inner = self.inner.read();
        inner
            .roster
            .iter()
            .filter_map(|id| inner.sprites.get(id).cloned())
            .collect()
    }

    /// Number of sprites
    pub fn len(&self) -> usize {
        self.inner.read().roster.len()
    }

    /// Whether the roster is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capture every sprite's current position
    pub fn snapshot(&self) -> RunSnapshot {
        let inner = self.inner.read();
        RunSnapshot {
            positions: inner
                .sprites
                .iter()
                .map(|(id, sprite)| (*id, sprite.position))
                .collect(),
        }
    }

    /// Publish a live pose. Sprites removed mid-run are skipped.
    pub fn commit_pose(&self, id: SpriteId, pose: Pose) {
        if let Some(sprite) = self.inner.write().sprites.get_mut(&id) {
            sprite.position = pose.position;
            sprite.angle = pose.angle;
        }
    }

    /// Show (`Some`) or clear (`None`) a sprite's bubble
    pub fn set_message(&self, id: SpriteId, message: Option<(MessageKind, String)>) {
        if let Some(sprite) = self.inner.write().sprites.get_mut(&id) {
            match message {
                Some((kind, text)) => {
                    sprite.message = Some(text);
                    sprite.message_kind = Some(kind);
                }
                None => {
                    sprite.message = None;
                    sprite.message_kind = None;
                }
            }
        }
    }

    /// Publish a batch of reconciled poses under a single write lock
    pub fn publish(&self, poses: &[(SpriteId, Pose)]) {
        let mut inner = self.inner.write();
        for (id, pose) in poses {
            if let Some(sprite) = inner.sprites.get_mut(id) {
                sprite.position = pose.position;
                sprite.angle = pose.angle;
            }
        }
    }

    fn update(&self, id: SpriteId, apply: impl FnOnce(&mut SpriteState)) -> StageResult<()> {
        let mut inner = self.inner.write();
        let sprite = inner
            .sprites
            .get_mut(&id)
            .ok_or(StageError::SpriteNotFound(id))?;
        apply(sprite);
        Ok(())
    }
}

/// Positions captured at the start of a play, used as rollback targets
#[derive(Debug, Clone, Default)]
pub struct RunSnapshot {
    positions: HashMap<SpriteId, Position>,
}

impl RunSnapshot {
    /// Pre-run position of a sprite
    pub fn position(&self, id: SpriteId) -> Option<Position> {
        self.positions.get(&id).copied()
    }

    /// Number of captured sprites
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether nothing was captured
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl FromIterator<(SpriteId, Position)> for RunSnapshot {
    fn from_iter<I: IntoIterator<Item = (SpriteId, Position)>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}
