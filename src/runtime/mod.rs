//! Stage orchestrator and public API
//!
//! This module provides the `Stage` struct that owns the sprite roster and
//! their action lists, runs every sprite's sequence concurrently, and
//! reconciles collisions once all of them have finished.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

// Submodules
pub mod choreography;
pub mod collision;
pub mod config;
pub mod error;
pub mod events;
pub mod executor;
pub mod scene;
pub mod sprite;
pub mod store;
pub mod timeline;

use crate::blocks::{ActionList, Block};
use choreography::{HeroOutcome, run_hero};
use collision::{Collision, CollisionPass};
use error::{StageError, StageResult};
use events::{EventSink, NullSink, StageEvent};
use executor::SequenceExecutor;
use timeline::Timeline;

/// Summary of one completed play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayReport {
    /// Play identifier
    pub run_id: Uuid,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Wall-clock finish
    pub finished_at: DateTime<Utc>,
    /// Run time on the stage clock
    pub elapsed: Duration,
    /// Reconciled sprite states in roster order
    pub sprites: Vec<SpriteState>,
    /// Pairs that collided and were rolled back, in resolution order
    pub collisions: Vec<Collision>,
}

/// The sprite roster, their action lists, and the machinery to play them
pub struct Stage {
    config: StageConfig,
    store: SpriteStore,
    programs: HashMap<SpriteId, ActionList>,
    sink: Arc<dyn EventSink>,
}

impl Stage {
    /// Create an empty stage whose events are discarded
    pub fn new(config: StageConfig) -> Self {
        Self::with_sink(config, Arc::new(NullSink))
    }

    /// Create an empty stage reporting events to `sink`
    pub fn with_sink(config: StageConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            config,
            store: SpriteStore::new(),
            programs: HashMap::new(),
            sink,
        }
    }

    /// Get the current configuration
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Shared handle to the sprite store
    pub fn store(&self) -> &SpriteStore {
        &self.store
    }

    /// Add a sprite at the configured spawn position with an empty action list
    pub fn add_sprite(&mut self, name: impl Into<String>) -> SpriteId {
        let position = self.config.spawn_position;
        self.add_sprite_at(name, position)
    }

    /// Add a sprite at `position` with an empty action list
    pub fn add_sprite_at(&mut self, name: impl Into<String>, position: Position) -> SpriteId {
        let id = self.store.add(name, position);
        self.programs.insert(id, ActionList::new());
        tracing::debug!(%id, %position, "Sprite added");
        id
    }

    /// Remove a sprite together with its action list
    pub fn remove_sprite(&mut self, id: SpriteId) -> StageResult<SpriteState> {
        let state = self.store.remove(id)?;
        self.programs.remove(&id);
        Ok(state)
    }

    /// A sprite's action list
    pub fn actions(&self, id: SpriteId) -> StageResult<&ActionList> {
        self.programs.get(&id).ok_or(StageError::SpriteNotFound(id))
    }

    /// Mutable access to a sprite's action list
    pub fn actions_mut(&mut self, id: SpriteId) -> StageResult<&mut ActionList> {
        self.programs
            .get_mut(&id)
            .ok_or(StageError::SpriteNotFound(id))
    }

    /// Replace a sprite's action list
    pub fn set_actions(&mut self, id: SpriteId, actions: ActionList) -> StageResult<()> {
        *self.actions_mut(id)? = actions;
        Ok(())
    }

    /// Run every sprite's action list concurrently, then reconcile collisions.
    ///
    /// Each sprite starts from its current pose. All runs are multiplexed on
    /// the calling task and joined before the collision pass, which works on
    /// the run results rather than the live store. The reconciled poses are
    /// then published to the store.
    pub async fn play(&self) -> PlayReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let timeline = Timeline::start();

        let sprites = self.store.list();
        let snapshot = self.store.snapshot();
        tracing::info!(%run_id, sprites = sprites.len(), "Play started");
        self.sink.emit(StageEvent::PlayStarted {
            run_id,
            sprites: sprites.len(),
        });

        let programs: Vec<Vec<Block>> = sprites
            .iter()
            .map(|sprite| {
                self.programs
                    .get(&sprite.id)
                    .map(ActionList::compile)
                    .unwrap_or_default()
            })
            .collect();
        let executors: Vec<SequenceExecutor> = sprites
            .iter()
            .map(|sprite| {
                SequenceExecutor::new(sprite.id, self.store.clone(), self.sink.clone(), timeline)
                    .with_repeat_delay(self.config.repeat_delay_ms)
            })
            .collect();

        let runs = executors
            .iter()
            .zip(&programs)
            .zip(&sprites)
            .map(|((executor, blocks), sprite)| executor.run(blocks, sprite.pose()));
        let finals = join_all(runs).await;

        let mut poses: Vec<(SpriteId, Pose)> =
            sprites.iter().map(|sprite| sprite.id).zip(finals).collect();
        let collisions =
            CollisionPass::new(self.config.collision_threshold, self.config.collision_pause_ms)
                .reconcile(&mut poses, &snapshot, &timeline, self.sink.as_ref())
                .await;

        self.store.publish(&poses);
        self.sink.emit(StageEvent::PlayFinished {
            run_id,
            at: timeline.elapsed(),
        });
        tracing::info!(%run_id, collisions = collisions.len(), "Play finished");

        PlayReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            elapsed: timeline.elapsed(),
            sprites: self.store.list(),
            collisions,
        }
    }

    /// Run the hero choreography on the configured sprite pair.
    ///
    /// Fails with `StageError::Config` when the configuration is invalid,
    /// e.g. both hero roles name the same sprite.
    pub async fn hero(&self) -> StageResult<HeroOutcome> {
        self.config.validate()?;
        run_hero(
            &self.store,
            &self.config.hero,
            self.config.collision_threshold,
            self.sink.as_ref(),
        )
        .await
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new(StageConfig::default())
    }
}

// Re-export commonly used types
pub use config::{HeroConfig, StageConfig};
pub use sprite::{Pose, Position, SpriteId, SpriteState};
pub use store::{RunSnapshot, SpriteStore};
