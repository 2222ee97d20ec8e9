//! Integration tests for concurrent plays and collision reconciliation

use std::sync::Arc;
use std::time::Duration;

use blockstage::blocks::{ActionList, BlockInstance};
use blockstage::runtime::events::{EventLog, StageEvent};
use blockstage::runtime::error::StageError;
use blockstage::runtime::{HeroConfig, Position, SpriteId, Stage, StageConfig};

fn stage_with_log() -> (Stage, EventLog) {
    let log = EventLog::new();
    let stage = Stage::with_sink(StageConfig::default(), Arc::new(log.clone()));
    (stage, log)
}

fn list(blocks: Vec<BlockInstance>) -> ActionList {
    blocks.into_iter().collect()
}

#[tokio::test(start_paused = true)]
async fn colliding_sprites_return_to_pre_run_positions() {
    let (mut stage, log) = stage_with_log();
    let cat = stage.add_sprite_at("Cat", Position::new(0.0, 0.0));
    let dog = stage.add_sprite_at("Dog", Position::new(100.0, 0.0));
    stage
        .set_actions(cat, list(vec![BlockInstance::move_by(50), BlockInstance::turn_by(45)]))
        .unwrap();
    stage
        .set_actions(dog, list(vec![BlockInstance::go_to(55, 5)]))
        .unwrap();

    let report = stage.play().await;

    assert_eq!(report.collisions.len(), 1);
    assert_eq!(report.elapsed, Duration::from_millis(1000));
    let cat_state = stage.store().get(cat).unwrap();
    assert_eq!(cat_state.position, Position::new(0.0, 0.0));
    assert_eq!(cat_state.angle, 45.0);
    assert_eq!(
        stage.store().get(dog).unwrap().position,
        Position::new(100.0, 0.0)
    );
    assert!(log.events().iter().any(|event| matches!(
        event,
        StageEvent::CollisionResolved { first, second, .. } if *first == cat && *second == dog
    )));
}

#[tokio::test(start_paused = true)]
async fn separated_sprites_keep_final_positions() {
    let (mut stage, _log) = stage_with_log();
    let cat = stage.add_sprite_at("Cat", Position::new(0.0, 0.0));
    let dog = stage.add_sprite_at("Dog", Position::new(100.0, 0.0));
    stage
        .set_actions(cat, list(vec![BlockInstance::go_to(50, 50)]))
        .unwrap();
    stage
        .set_actions(dog, list(vec![BlockInstance::go_to(60, 55)]))
        .unwrap();

    let report = stage.play().await;

    assert!(report.collisions.is_empty());
    assert_eq!(report.elapsed, Duration::ZERO);
    assert_eq!(report.sprites[0].position, Position::new(50.0, 50.0));
    assert_eq!(report.sprites[1].position, Position::new(60.0, 55.0));
}

#[tokio::test(start_paused = true)]
async fn sprites_run_concurrently() {
    let (mut stage, log) = stage_with_log();
    let cat = stage.add_sprite_at("Cat", Position::new(0.0, 0.0));
    let dog = stage.add_sprite_at("Dog", Position::new(500.0, 0.0));
    stage
        .set_actions(
            cat,
            list(vec![
                BlockInstance::speak("meow", 1000),
                BlockInstance::move_by(20),
            ]),
        )
        .unwrap();
    stage
        .set_actions(
            dog,
            list(vec![
                BlockInstance::think("woof", 400),
                BlockInstance::move_by(-20),
            ]),
        )
        .unwrap();

    let report = stage.play().await;

    // Bubbles overlap instead of running back to back.
    assert_eq!(report.elapsed, Duration::from_millis(1000));

    // The dog's move lands while the cat is still speaking.
    let dog_move_at = log
        .for_sprite(dog)
        .into_iter()
        .filter_map(|event| match event {
            StageEvent::PoseCommitted { pose, at, .. } if pose.position.x == 480.0 => Some(at),
            _ => None,
        })
        .next();
    assert_eq!(dog_move_at, Some(Duration::from_millis(400)));
    assert_eq!(report.sprites[0].position, Position::new(20.0, 0.0));
    assert_eq!(report.sprites[1].position, Position::new(480.0, 0.0));
}

#[tokio::test(start_paused = true)]
async fn sprite_without_blocks_keeps_its_pose() {
    let (mut stage, _log) = stage_with_log();
    let cat = stage.add_sprite("Cat");
    stage.store().set_angle(cat, 30.0).unwrap();

    let report = stage.play().await;

    assert_eq!(report.sprites[0].position, Position::new(600.0, 200.0));
    assert_eq!(report.sprites[0].angle, 30.0);
}

#[tokio::test(start_paused = true)]
async fn later_pair_overrides_earlier_rollback() {
    // Cat and dog collide and roll back; the cat's snapshot position sits on
    // the fox's final position, so the cat/fox pair collides as well.
    let (mut stage, _log) = stage_with_log();
    let cat = stage.add_sprite_at("Cat", Position::new(300.0, 300.0));
    let dog = stage.add_sprite_at("Dog", Position::new(0.0, 0.0));
    let fox = stage.add_sprite_at("Fox", Position::new(900.0, 900.0));
    stage
        .set_actions(cat, list(vec![BlockInstance::go_to(100, 100)]))
        .unwrap();
    stage
        .set_actions(dog, list(vec![BlockInstance::go_to(101, 101)]))
        .unwrap();
    stage
        .set_actions(fox, list(vec![BlockInstance::go_to(302, 298)]))
        .unwrap();

    let report = stage.play().await;

    assert_eq!(report.collisions.len(), 2);
    assert_eq!(report.collisions[0].first, cat);
    assert_eq!(report.collisions[0].second, dog);
    assert_eq!(report.collisions[1].first, cat);
    assert_eq!(report.collisions[1].second, fox);
    assert_eq!(report.elapsed, Duration::from_millis(2000));
    assert_eq!(
        stage.store().get(fox).unwrap().position,
        Position::new(900.0, 900.0)
    );
    assert_eq!(
        stage.store().get(cat).unwrap().position,
        Position::new(300.0, 300.0)
    );
}

#[tokio::test(start_paused = true)]
async fn drags_before_play_define_the_snapshot() {
    let (mut stage, _log) = stage_with_log();
    let cat = stage.add_sprite_at("Cat", Position::new(0.0, 0.0));
    let dog = stage.add_sprite_at("Dog", Position::new(0.0, 0.0));
    stage.store().drag(cat, Position::new(-40.0, 10.0)).unwrap();
    stage
        .set_actions(cat, list(vec![BlockInstance::go_to(5, 5)]))
        .unwrap();
    stage
        .set_actions(dog, list(vec![BlockInstance::go_to(6, 6)]))
        .unwrap();

    stage.play().await;

    assert_eq!(
        stage.store().get(cat).unwrap().position,
        Position::new(-40.0, 10.0)
    );
}

#[tokio::test(start_paused = true)]
async fn play_events_are_bracketed() {
    let (mut stage, log) = stage_with_log();
    let cat = stage.add_sprite("Cat");
    stage
        .actions_mut(cat)
        .unwrap()
        .push_instance(BlockInstance::move_by(1));

    let report = stage.play().await;

    let events = log.events();
    assert!(matches!(
        events.first(),
        Some(StageEvent::PlayStarted { run_id, sprites: 1 }) if *run_id == report.run_id
    ));
    assert!(matches!(
        events.last(),
        Some(StageEvent::PlayFinished { run_id, .. }) if *run_id == report.run_id
    ));
    assert!(report.finished_at >= report.started_at);
}

#[test]
fn removing_a_sprite_drops_its_actions() {
    let mut stage = Stage::default();
    let cat = stage.add_sprite("Cat");
    stage.remove_sprite(cat).unwrap();

    assert!(stage.actions(cat).is_err());
    assert!(stage.store().is_empty());
    assert!(stage.remove_sprite(SpriteId(42)).is_err());
}

#[tokio::test(start_paused = true)]
async fn hero_runs_through_the_stage() {
    let (mut stage, log) = stage_with_log();
    stage.add_sprite("Cat");
    stage.add_sprite("Dog");

    let outcome = stage.hero().await.unwrap();

    assert!(outcome.collided);
    assert_eq!(outcome.iterations, 10);
    assert!(log.events().iter().any(|event| matches!(
        event,
        StageEvent::MarkerShown { position, .. } if *position == Position::new(550.0, 200.0)
    )));
    // 10 iterations at 2 x 80 ms, then the 800 ms marker.
    let cleared_at = log.events().into_iter().find_map(|event| match event {
        StageEvent::MarkerCleared { at } => Some(at),
        _ => None,
    });
    assert_eq!(cleared_at, Some(Duration::from_millis(2400)));
}

#[tokio::test(start_paused = true)]
async fn collision_pass_ignores_drags_made_during_the_run() {
    let (mut stage, _log) = stage_with_log();
    let cat = stage.add_sprite_at("Cat", Position::new(0.0, 0.0));
    let dog = stage.add_sprite_at("Dog", Position::new(500.0, 500.0));
    stage
        .set_actions(cat, list(vec![BlockInstance::go_to(100, 100)]))
        .unwrap();
    stage
        .set_actions(
            dog,
            list(vec![
                BlockInstance::speak("still talking", 1000),
                BlockInstance::go_to(300, 300),
            ]),
        )
        .unwrap();

    // The cat finishes at t=0; while the dog is still speaking, the cat is
    // dragged right next to where the dog will end up.
    let drag = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        stage.store().drag(cat, Position::new(302.0, 298.0)).unwrap();
    };
    let (report, ()) = tokio::join!(stage.play(), drag);

    assert!(report.collisions.is_empty());
    assert_eq!(report.elapsed, Duration::from_millis(1000));
    assert_eq!(
        stage.store().get(cat).unwrap().position,
        Position::new(100.0, 100.0)
    );
    assert_eq!(
        stage.store().get(dog).unwrap().position,
        Position::new(300.0, 300.0)
    );
}

#[tokio::test(start_paused = true)]
async fn hero_rejects_identical_sprites() {
    let config = StageConfig {
        hero: HeroConfig {
            sprite_a: SpriteId(1),
            sprite_b: SpriteId(1),
            ..HeroConfig::default()
        },
        ..StageConfig::default()
    };
    let mut stage = Stage::new(config);
    let cat = stage.add_sprite("Cat");

    let result = stage.hero().await;

    assert!(matches!(result, Err(StageError::Config(_))));
    assert_eq!(
        stage.store().get(cat).unwrap().position,
        Position::new(600.0, 200.0)
    );
}

#[tokio::test(start_paused = true)]
async fn hero_rejects_nan_threshold() {
    let config = StageConfig {
        collision_threshold: f64::NAN,
        ..StageConfig::default()
    };
    let mut stage = Stage::new(config);
    stage.add_sprite("Cat");
    stage.add_sprite("Dog");

    assert!(matches!(stage.hero().await, Err(StageError::Config(_))));
}
