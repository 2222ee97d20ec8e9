//! Proximity collisions and rollback to the run snapshot
//!
//! Pairs are visited in roster order (i < j) over a single working array of
//! final poses. A colliding pair is rolled back in place, so later pairs see
//! the rolled-back positions, and a sprite that collides in several pairs
//! ends at whatever the last of those pairs assigned.

use serde::{Deserialize, Serialize};

use super::events::{EventSink, StageEvent};
use super::sprite::{Pose, Position, SpriteId};
use super::store::RunSnapshot;
use super::timeline::Timeline;

/// Whether two positions are closer than `threshold` on both axes
pub fn collides(a: Position, b: Position, threshold: f64) -> bool {
    (a.x - b.x).abs() < threshold && (a.y - b.y).abs() < threshold
}

/// A resolved collision between two sprites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    /// Earlier sprite in roster order
    pub first: SpriteId,
    /// Later sprite in roster order
    pub second: SpriteId,
}

/// Post-run reconciliation pass
#[derive(Debug, Clone, Copy)]
pub struct CollisionPass {
    threshold: f64,
    pause_ms: i64,
}

impl CollisionPass {
    /// Create a pass with the given threshold and per-collision pause
    pub fn new(threshold: f64, pause_ms: i64) -> Self {
        Self {
            threshold,
            pause_ms,
        }
    }

    /// Roll back every colliding pair in `poses` to its snapshot positions.
    ///
    /// `poses` must be in roster order. Angles are never rolled back. A sprite
    /// missing from the snapshot keeps its current position.
    pub async fn reconcile(
        &self,
        poses: &mut [(SpriteId, Pose)],
        snapshot: &RunSnapshot,
        timeline: &Timeline,
        sink: &dyn EventSink,
    ) -> Vec<Collision> {
        let mut collisions = Vec::new();

        for i in 0..poses.len() {
            for j in (i + 1)..poses.len() {
                let (first, a) = poses[i];
                let (second, b) = poses[j];
                if !collides(a.position, b.position, self.threshold) {
                    continue;
                }

                tracing::debug!(%first, %second, "Collision detected");
                timeline.pause(self.pause_ms).await;

                poses[i].1.position = snapshot.position(first).unwrap_or(a.position);
                poses[j].1.position = snapshot.position(second).unwrap_or(b.position);

                sink.emit(StageEvent::CollisionResolved {
                    first,
                    second,
                    at: timeline.elapsed(),
                });
                collisions.push(Collision { first, second });
            }
        }

        collisions
    }
}
