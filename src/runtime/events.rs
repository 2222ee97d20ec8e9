//! Observer-facing event stream
//!
//! Executors and the stage report what a presentation layer needs to show:
//! timed bubbles, incremental pose commits, collisions, and the hero marker.
//! Every event carries `at`, the time elapsed since its run began.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use super::sprite::{Pose, Position, SpriteId};
use crate::blocks::MessageKind;

/// Events emitted while a play or choreography runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StageEvent {
    /// A play began
    PlayStarted {
        /// Play identifier
        run_id: Uuid,
        /// Number of sprites taking part
        sprites: usize,
    },
    /// A bubble appeared above a sprite
    MessageShown {
        /// Speaking sprite
        sprite: SpriteId,
        /// Speech or thought
        kind: MessageKind,
        /// Bubble text
        text: String,
        /// Offset from run start
        at: Duration,
        /// How long the bubble is held
        duration: Duration,
    },
    /// A sprite's bubble was removed
    MessageCleared {
        /// Sprite whose bubble cleared
        sprite: SpriteId,
        /// Offset from run start
        at: Duration,
    },
    /// A sprite's live pose was published
    PoseCommitted {
        /// Moving sprite
        sprite: SpriteId,
        /// Pose after the block
        pose: Pose,
        /// Offset from run start
        at: Duration,
    },
    /// Two sprites collided and were rolled back
    CollisionResolved {
        /// Earlier sprite in roster order
        first: SpriteId,
        /// Later sprite in roster order
        second: SpriteId,
        /// Offset from run start
        at: Duration,
    },
    /// The hero collision marker appeared
    MarkerShown {
        /// Marker location
        position: Position,
        /// Offset from run start
        at: Duration,
    },
    /// The hero collision marker was removed
    MarkerCleared {
        /// Offset from run start
        at: Duration,
    },
    /// A play finished and its reconciled state was published
    PlayFinished {
        /// Play identifier
        run_id: Uuid,
        /// Offset from run start
        at: Duration,
    },
}

impl StageEvent {
    /// Sprite the event concerns, if any
    pub fn sprite(&self) -> Option<SpriteId> {
        match self {
            StageEvent::MessageShown { sprite, .. }
            | StageEvent::MessageCleared { sprite, .. }
            | StageEvent::PoseCommitted { sprite, .. } => Some(*sprite),
            _ => None,
        }
    }
}

/// Destination for stage events
pub trait EventSink: Send + Sync {
    /// Deliver one event. Must not block.
    fn emit(&self, event: StageEvent);
}

impl EventSink for UnboundedSender<StageEvent> {
    fn emit(&self, event: StageEvent) {
        if self.send(event).is_err() {
            tracing::warn!("Stage event receiver dropped; event discarded");
        }
    }
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: StageEvent) {}
}

/// In-memory sink that records events in emission order
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<StageEvent>>>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all recorded events
    pub fn events(&self) -> Vec<StageEvent> {
        self.events.lock().clone()
    }

    /// Recorded events concerning one sprite
    pub fn for_sprite(&self, sprite: SpriteId) -> Vec<StageEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.sprite() == Some(sprite))
            .cloned()
            .collect()
    }

    /// Drop all recorded events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: StageEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_filters_by_sprite() {
        let log = EventLog::new();
        log.emit(StageEvent::MessageCleared {
            sprite: SpriteId(1),
            at: Duration::ZERO,
        });
        log.emit(StageEvent::MarkerCleared { at: Duration::ZERO });
        log.emit(StageEvent::MessageCleared {
            sprite: SpriteId(2),
            at: Duration::ZERO,
        });

        assert_eq!(log.events().len(), 3);
        assert_eq!(log.for_sprite(SpriteId(2)).len(), 1);
    }

    #[tokio::test]
    async fn test_channel_sink_delivers() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        tx.emit(StageEvent::MarkerCleared { at: Duration::ZERO });
        assert_eq!(
            rx.recv().await,
            Some(StageEvent::MarkerCleared { at: Duration::ZERO })
        );
    }

    #[test]
    fn test_closed_channel_does_not_panic() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<StageEvent>();
        drop(rx);
        tx.emit(StageEvent::MarkerCleared { at: Duration::ZERO });
    }
}
