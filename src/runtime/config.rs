//! Stage configuration and its JSON file form

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{StageError, StageResult};
use super::sprite::{Position, SpriteId};

/// Pause before each `repeat` iteration, in milliseconds
pub const DEFAULT_REPEAT_DELAY_MS: i64 = 1000;

/// Proximity threshold on each axis for a collision
pub const DEFAULT_COLLISION_THRESHOLD: f64 = 10.0;

/// Cosmetic pause before rolling back a colliding pair, in milliseconds
pub const DEFAULT_COLLISION_PAUSE_MS: i64 = 1000;

/// Timing and geometry constants for plays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Two sprites collide when closer than this on both axes
    pub collision_threshold: f64,

    /// Pause before each `repeat` iteration
    pub repeat_delay_ms: i64,

    /// Pause before rolling back each colliding pair
    pub collision_pause_ms: i64,

    /// Where newly added sprites appear
    pub spawn_position: Position,

    /// Hero choreography settings
    pub hero: HeroConfig,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            collision_threshold: DEFAULT_COLLISION_THRESHOLD,
            repeat_delay_ms: DEFAULT_REPEAT_DELAY_MS,
            collision_pause_ms: DEFAULT_COLLISION_PAUSE_MS,
            spawn_position: Position::new(600.0, 200.0),
            hero: HeroConfig::default(),
        }
    }
}

impl StageConfig {
    /// Reject values that make the stage meaningless
    pub fn validate(&self) -> StageResult<()> {
        if !(self.collision_threshold.is_finite() && self.collision_threshold >= 0.0) {
            return Err(StageError::Config(format!(
                "collision_threshold must be a non-negative number, got {}",
                self.collision_threshold
            )));
        }
        if self.hero.sprite_a == self.hero.sprite_b {
            return Err(StageError::Config(format!(
                "hero sprites must differ, both are {}",
                self.hero.sprite_a
            )));
        }
        Ok(())
    }
}

/// Scripted two-sprite approach demo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    /// Sprite advancing rightward
    pub sprite_a: SpriteId,
    /// Sprite advancing leftward
    pub sprite_b: SpriteId,
    /// Starting position of sprite A
    pub start_a: Position,
    /// Starting position of sprite B
    pub start_b: Position,
    /// Distance each sprite advances per iteration
    pub step: f64,
    /// Pause before and after each advance, in milliseconds
    pub cadence_ms: i64,
    /// Iteration cap
    pub max_iterations: usize,
    /// How long the collision marker stays up, in milliseconds
    pub marker_ms: i64,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            sprite_a: SpriteId(1),
            sprite_b: SpriteId(2),
            start_a: Position::new(300.0, 200.0),
            start_b: Position::new(800.0, 200.0),
            step: 25.0,
            cadence_ms: 80,
            max_iterations: 10,
            marker_ms: 800,
        }
    }
}

/// Load configuration from a JSON file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> StageResult<StageConfig> {
    let data = std::fs::read(path)?;
    let config: StageConfig = serde_json::from_slice(&data)?;
    config.validate()?;
    Ok(config)
}

/// Write configuration as pretty JSON
pub fn write_config(path: &Path, config: &StageConfig) -> StageResult<()> {
    let json = serde_json::to_vec_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stage.json");

        let config = StageConfig {
            collision_threshold: 4.0,
            repeat_delay_ms: 10,
            ..StageConfig::default()
        };

        write_config(&path, &config).unwrap();
        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_takes_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stage.json");
        std::fs::write(&path, r#"{"repeat_delay_ms": 5, "hero": {"step": 50}}"#).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.repeat_delay_ms, 5);
        assert_eq!(loaded.collision_threshold, DEFAULT_COLLISION_THRESHOLD);
        assert_eq!(loaded.hero.step, 50.0);
        assert_eq!(loaded.hero.max_iterations, 10);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stage.json");
        std::fs::write(&path, r#"{"collision_threshold": -1}"#).unwrap();

        assert!(matches!(load_config(&path), Err(StageError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let result = load_config(&temp.path().join("absent.json"));
        assert!(matches!(result, Err(StageError::Io(_))));
    }
}
