//! Blockstage CLI - Command-line driver for the stage runtime
//!
//! Lists the block catalog, plays scene files, and runs the hero
//! choreography, streaming stage events to stdout.

use anyhow::{Context, Result};
use blockstage::blocks::catalog;
use blockstage::runtime::events::StageEvent;
use blockstage::runtime::scene::Scene;
use blockstage::runtime::{SpriteState, Stage, StageConfig, config::load_config};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "blockstage")]
#[command(about = "Block-programming sandbox engine", long_about = None)]
struct Cli {
    /// Stage configuration file (JSON); overrides a scene's own config
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available blocks
    Catalog,

    /// Play a scene and print events and final sprite states
    Play {
        /// Scene file (JSON)
        scene: PathBuf,

        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the hero choreography
    Hero {
        /// Scene file providing the roster (default: Cat and Dog)
        #[arg(long)]
        scene: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config_override = match &cli.config {
        Some(path) => Some(
            load_config(path).with_context(|| format!("Failed to load config: {:?}", path))?,
        ),
        None => None,
    };

    match cli.command {
        Commands::Catalog => {
            for entry in catalog() {
                println!(
                    "{:<8} {:?}  {}",
                    entry.kind.as_str(),
                    entry.category,
                    entry.template()
                );
            }
        }

        Commands::Play { scene, json } => {
            let (tx, rx) = mpsc::unbounded_channel();
            let stage = build_stage(Some(scene), config_override, tx)?;
            let printer = tokio::spawn(print_events(rx));

            let report = stage.play().await;
            drop(stage);
            printer.await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Play {} finished in {:?}", report.run_id, report.elapsed);
                for collision in &report.collisions {
                    println!("  collision: {} <-> {}", collision.first, collision.second);
                }
                print_sprites(&report.sprites);
            }
        }

        Commands::Hero { scene } => {
            let (tx, rx) = mpsc::unbounded_channel();
            let stage = build_stage(scene, config_override, tx)?;
            let printer = tokio::spawn(print_events(rx));

            let outcome = stage.hero().await?;
            let sprites = stage.store().list();
            drop(stage);
            printer.await?;

            match outcome.marker {
                Some(marker) => println!(
                    "Sprites met after {} steps at {}",
                    outcome.iterations, marker
                ),
                None => println!("No collision after {} steps", outcome.iterations),
            }
            print_sprites(&sprites);
        }
    }

    Ok(())
}

fn build_stage(
    scene: Option<PathBuf>,
    config_override: Option<StageConfig>,
    tx: mpsc::UnboundedSender<StageEvent>,
) -> Result<Stage> {
    let mut scene = match scene {
        Some(path) => {
            Scene::load(&path).with_context(|| format!("Failed to load scene: {:?}", path))?
        }
        None => Scene::from_json(r#"{"sprites": [{"name": "Cat"}, {"name": "Dog"}]}"#)?,
    };
    if let Some(config) = config_override {
        scene.config = config;
    }
    Ok(scene.into_stage(Arc::new(tx))?)
}

async fn print_events(mut rx: mpsc::UnboundedReceiver<StageEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            StageEvent::MessageShown {
                sprite,
                kind,
                text,
                at,
                duration,
            } => println!("[{:>6?}] sprite {} {:?}: {:?} for {:?}", at, sprite, kind, text, duration),
            StageEvent::PoseCommitted { sprite, pose, at } => println!(
                "[{:>6?}] sprite {} at {} facing {}",
                at, sprite, pose.position, pose.angle
            ),
            StageEvent::CollisionResolved { first, second, at } => {
                println!("[{:>6?}] rolled back {} and {}", at, first, second)
            }
            StageEvent::MarkerShown { position, at } => {
                println!("[{:>6?}] marker at {}", at, position)
            }
            other => tracing::debug!(?other, "Stage event"),
        }
    }
}

fn print_sprites(sprites: &[SpriteState]) {
    println!("Sprites:");
    for sprite in sprites {
        println!(
            "  {} {:<10} {} angle {}",
            sprite.id, sprite.name, sprite.position, sprite.angle
        );
    }
}
