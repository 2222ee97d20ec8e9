//! JSON scene descriptions used to seed a stage
//!
//! A scene lists sprites with their starting pose and action list, plus an
//! optional configuration block. Scenes are input only; stages are never
//! written back out.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use super::Stage;
use super::config::StageConfig;
use super::error::{StageError, StageResult};
use super::events::EventSink;
use super::sprite::Position;
use crate::blocks::ActionList;

/// A stage description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Stage configuration
    #[serde(default)]
    pub config: StageConfig,
    /// Sprites in roster order
    #[serde(default)]
    pub sprites: Vec<SceneSprite>,
}

/// One sprite of a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSprite {
    /// Display name
    pub name: String,
    /// Starting position; the configured spawn position when absent
    #[serde(default)]
    pub position: Option<Position>,
    /// Starting orientation in degrees
    #[serde(default)]
    pub angle: f64,
    /// The sprite's blocks
    #[serde(default)]
    pub actions: ActionList,
}

impl Scene {
    /// Parse a scene from JSON text
    pub fn from_json(text: &str) -> StageResult<Self> {
        let scene: Scene = serde_json::from_str(text)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Read and parse a scene file
    pub fn load(path: &Path) -> StageResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Build a stage holding this scene's sprites and action lists
    pub fn into_stage(self, sink: Arc<dyn EventSink>) -> StageResult<Stage> {
        self.validate()?;
        let mut stage = Stage::with_sink(self.config, sink);
        for sprite in self.sprites {
            let position = sprite.position.unwrap_or(stage.config().spawn_position);
            let id = stage.add_sprite_at(sprite.name, position);
            stage.store().set_angle(id, sprite.angle)?;
            stage.set_actions(id, sprite.actions)?;
        }
        Ok(stage)
    }

    fn validate(&self) -> StageResult<()> {
        self.config.validate()?;
        if let Some(index) = self.sprites.iter().position(|s| s.name.trim().is_empty()) {
            return Err(StageError::Scene(format!("sprite {} has an empty name", index)));
        }
        Ok(())
    }
}
