//! Scripted "hero" approach between two sprites
//!
//! Two sprites walk toward each other on a fixed cadence. The first time they
//! come within the collision threshold a marker appears between them, then
//! both return to where the choreography placed them and the demo stops.

use serde::{Deserialize, Serialize};

use super::collision::collides;
use super::config::HeroConfig;
use super::error::StageResult;
use super::events::{EventSink, StageEvent};
use super::sprite::{Position, SpriteId};
use super::store::SpriteStore;
use super::timeline::Timeline;

/// How a choreography run ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeroOutcome {
    /// Whether the sprites met
    pub collided: bool,
    /// Advances performed, including the colliding one
    pub iterations: usize,
    /// Where the marker was shown, if they met
    pub marker: Option<Position>,
}

/// Run the choreography against `store`
pub async fn run_hero(
    store: &SpriteStore,
    config: &HeroConfig,
    threshold: f64,
    sink: &dyn EventSink,
) -> StageResult<HeroOutcome> {
    let (a, b) = (config.sprite_a, config.sprite_b);
    store.drag(a, config.start_a)?;
    store.drag(b, config.start_b)?;

    let timeline = Timeline::start();
    tracing::info!(%a, %b, "Hero choreography started");

    for iteration in 1..=config.max_iterations {
        timeline.pause(config.cadence_ms).await;

        let next_a = advance(store, a, config.step, &timeline, sink)?;
        let next_b = advance(store, b, -config.step, &timeline, sink)?;

        timeline.pause(config.cadence_ms).await;

        if collides(next_a, next_b, threshold) {
            let marker = next_a.midpoint(next_b);
            tracing::info!(iteration, %marker, "Hero sprites collided");
            sink.emit(StageEvent::MarkerShown {
                position: marker,
                at: timeline.elapsed(),
            });
            timeline.pause(config.marker_ms).await;
            sink.emit(StageEvent::MarkerCleared {
                at: timeline.elapsed(),
            });

            store.drag(a, config.start_a)?;
            store.drag(b, config.start_b)?;
            emit_pose(store, a, &timeline, sink)?;
            emit_pose(store, b, &timeline, sink)?;

            return Ok(HeroOutcome {
                collided: true,
                iterations: iteration,
                marker: Some(marker),
            });
        }
    }

    tracing::info!("Hero choreography finished without collision");
    Ok(HeroOutcome {
        collided: false,
        iterations: config.max_iterations,
        marker: None,
    })
}

fn advance(
    store: &SpriteStore,
    id: SpriteId,
    dx: f64,
    timeline: &Timeline,
    sink: &dyn EventSink,
) -> StageResult<Position> {
    let current = store.get(id)?.position;
    let next = Position::new(current.x + dx, current.y);
    store.drag(id, next)?;
    emit_pose(store, id, timeline, sink)?;
    Ok(next)
}

fn emit_pose(
    store: &SpriteStore,
    id: SpriteId,
    timeline: &Timeline,
    sink: &dyn EventSink,
) -> StageResult<()> {
    let pose = store.get(id)?.pose();
    sink.emit(StageEvent::PoseCommitted {
        sprite: id,
        pose,
        at: timeline.elapsed(),
    });
    Ok(())
}
