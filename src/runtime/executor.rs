//! Sequence executor: interprets one sprite's action list
//!
//! Blocks run strictly in order. Motion blocks commit at once; bubbles and
//! `repeat` iterations are the only suspension points. A `repeat` block has
//! no children of its own: each iteration re-runs every non-repeat block of
//! the list it appears in, in original order, and any `repeat` found while
//! doing so applies the same rule to that sequence.

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::Arc;

use super::config::DEFAULT_REPEAT_DELAY_MS;
use super::events::{EventSink, StageEvent};
use super::sprite::{Pose, Position, SpriteId};
use super::store::SpriteStore;
use super::timeline::{Timeline, millis};
use crate::blocks::{Block, MessageKind};

/// Lifecycle of one executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorState {
    /// Not started
    Idle,
    /// Interpreting blocks
    Running,
    /// Waiting out a bubble or repeat delay
    Suspended,
    /// Every block has been interpreted
    Completed,
}

/// Interpreter for a single sprite's blocks
pub struct SequenceExecutor {
    sprite: SpriteId,
    store: SpriteStore,
    sink: Arc<dyn EventSink>,
    timeline: Timeline,
    repeat_delay_ms: i64,
    state: Mutex<ExecutorState>,
}

impl SequenceExecutor {
    /// Create an idle executor that publishes to `store` and `sink`
    pub fn new(
        sprite: SpriteId,
        store: SpriteStore,
        sink: Arc<dyn EventSink>,
        timeline: Timeline,
    ) -> Self {
        Self {
            sprite,
            store,
            sink,
            timeline,
            repeat_delay_ms: DEFAULT_REPEAT_DELAY_MS,
            state: Mutex::new(ExecutorState::Idle),
        }
    }

    /// Override the pause preceding each repeat iteration
    pub fn with_repeat_delay(mut self, ms: i64) -> Self {
        self.repeat_delay_ms = ms;
        self
    }

    /// Sprite this executor drives
    pub fn sprite(&self) -> SpriteId {
        self.sprite
    }

    /// Current lifecycle state
    pub fn state(&self) -> ExecutorState {
        *self.state.lock()
    }

    /// Interpret `blocks` from `start` and return the final pose.
    ///
    /// Runs to completion; there is no cancellation and no failure.
    pub async fn run(&self, blocks: &[Block], start: Pose) -> Pose {
        self.transition(ExecutorState::Running);
        tracing::debug!(sprite = %self.sprite, blocks = blocks.len(), "Sequence started");
        let end = self.run_sequence(blocks, start).await;
        self.transition(ExecutorState::Completed);
        tracing::debug!(
            sprite = %self.sprite,
            x = end.position.x,
            y = end.position.y,
            angle = end.angle,
            "Sequence completed"
        );
        end
    }

    fn run_sequence<'a>(&'a self, blocks: &'a [Block], start: Pose) -> BoxFuture<'a, Pose> {
        Box::pin(async move {
            let body: Vec<Block> = blocks
                .iter()
                .filter(|block| !block.is_repeat())
                .cloned()
                .collect();

            let mut pose = start;
            for block in blocks {
                match block {
                    Block::Move { steps } => pose.position.x += *steps as f64,
                    Block::Turn { degrees } => pose.angle += *degrees as f64,
                    Block::GoTo { x, y } => pose.position = Position::new(*x as f64, *y as f64),
                    Block::Repeat { times } => {
                        for iteration in 0..(*times).max(0) {
                            self.suspend(self.repeat_delay_ms).await;
                            tracing::trace!(sprite = %self.sprite, iteration, "Repeat iteration");
                            pose = self.run_sequence(&body, pose).await;
                        }
                    }
                    Block::Speak { text, time } => {
                        self.show_message(MessageKind::Speak, text, *time).await
                    }
                    Block::Think { text, time } => {
                        self.show_message(MessageKind::Think, text, *time).await
                    }
                }
                self.commit(pose);
            }
            pose
        })
    }

    async fn show_message(&self, kind: MessageKind, text: &str, time: i64) {
        self.store
            .set_message(self.sprite, Some((kind, text.to_string())));
        self.sink.emit(StageEvent::MessageShown {
            sprite: self.sprite,
            kind,
            text: text.to_string(),
            at: self.timeline.elapsed(),
            duration: millis(time),
        });

        self.suspend(time).await;

        self.store.set_message(self.sprite, None);
        self.sink.emit(StageEvent::MessageCleared {
            sprite: self.sprite,
            at: self.timeline.elapsed(),
        });
    }

    async fn suspend(&self, ms: i64) {
        self.transition(ExecutorState::Suspended);
        self.timeline.pause(ms).await;
        self.transition(ExecutorState::Running);
    }

    fn commit(&self, pose: Pose) {
        self.store.commit_pose(self.sprite, pose);
        self.sink.emit(StageEvent::PoseCommitted {
            sprite: self.sprite,
            pose,
            at: self.timeline.elapsed(),
        });
    }

    fn transition(&self, next: ExecutorState) {
        let mut state = self.state.lock();
        let previous = *state;
        tracing::trace!(sprite = %self.sprite, from = ?previous, to = ?next, "Executor transition");
        *state = next;
    }
}
