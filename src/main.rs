//! Platformer Physics Demo
//!
//! Headless run of a small tile level: one player walks right, jumps at
//! an item block and climbs a slope while a patrolling walker bounces
//! between walls. Events are logged as they happen.
//!
//! Usage: `platformer-physics [config.json]`. `RUST_LOG` controls verbosity.

use std::fs;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use platformer_physics::{
    physics::{Locomotion, LocomotionConfig, PhysicsEventKind, ReverseOnWall},
    ActorConfig, Level, PhysicsConfig, PhysicsContext, Scene, Vec2, DEFAULT_TICK_RATE, VERSION,
};

/// Demo level, top row first.
const LEVEL: &[&str] = &[
    "....................",
    "....................",
    ".......?............",
    "....................",
    "#P.........../####.#",
    "##################.#",
    "####################",
];

/// Demo run length in seconds.
const RUN_SECONDS: u32 = 12;

/// Optional JSON configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoConfig {
    physics: PhysicsConfig,
    player: Option<ActorConfig>,
    locomotion: LocomotionConfig,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Platformer Physics v{}", VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?
        }
        None => DemoConfig::default(),
    };

    let physics = PhysicsContext::new(config.physics).context("invalid physics config")?;
    info!("Tick Rate: {:.0} Hz (default {} Hz)", 1.0 / physics.fixed_dt(), DEFAULT_TICK_RATE);

    demo_level(physics, config.player, config.locomotion)
}

/// Run the demo level.
fn demo_level(
    physics: PhysicsContext,
    player: Option<ActorConfig>,
    locomotion: LocomotionConfig,
) -> Result<()> {
    info!("=== Starting Demo Level ===");

    let level = Level::parse(LEVEL, 1.0).context("bad demo level")?;
    let (columns, rows) = level.dimensions();
    info!("Level: {}x{} tiles, {} colliders", columns, rows, level.world().len());

    let (world, spawns) = level.into_parts();
    let spawn = spawns.first().copied().context("demo level has no spawn marker")?;
    let fixed_dt = physics.fixed_dt();
    let mut scene = Scene::new(physics, world);

    let player_config = player.unwrap_or_else(|| ActorConfig {
        max_y_speed: 20.0,
        min_y_speed: 15.0,
        ..ActorConfig::new(Vec2::new(0.4, 0.45), 40.0)
    });
    let player = scene.spawn(player_config, spawn)?;

    let walker = scene.spawn(ActorConfig::new(Vec2::splat(0.4), 40.0), Vec2::new(9.5, 2.5))?;
    if let Some(actor) = scene.actor_mut(walker) {
        actor.add_reaction(ReverseOnWall);
        actor.set_velocity(Vec2::new(-2.0, 0.0));
    }

    let mut control = Locomotion::new(locomotion);
    control.set_horizontal_intent(1);
    control.set_run_held(true);

    let total_ticks = RUN_SECONDS * (1.0 / fixed_dt).round() as u32;
    info!("Running {} ticks...", total_ticks);

    let mut total_events = 0;
    for _ in 0..total_ticks {
        let Some(actor) = scene.actor_mut(player) else {
            break;
        };

        // Jump while under the item block
        let x = actor.position().x;
        if (6.5..7.5).contains(&x) && !control.is_jump_held() {
            control.request_jump(&*actor);
        } else if x >= 7.5 && control.is_jump_held() {
            control.release_jump();
        }
        control.apply(actor, fixed_dt);

        let result = scene.tick();
        total_events += result.events.len();

        for event in &result.events {
            match &event.kind {
                PhysicsEventKind::Landed { impact_speed } => {
                    info!("Tick {}: {} landed at {:.2} u/s", event.tick, event.actor, impact_speed);
                }
                PhysicsEventKind::LeftGround => {
                    info!("Tick {}: {} left the ground", event.tick, event.actor);
                }
                PhysicsEventKind::HeadBump { colliders } => {
                    info!("Tick {}: {} bumped {:?}", event.tick, event.actor, colliders);
                }
                PhysicsEventKind::SlopeEngaged { collider, slope_factor } => {
                    info!(
                        "Tick {}: {} engaged slope {:?} (factor {:.3})",
                        event.tick, event.actor, collider, slope_factor
                    );
                }
                _ => {}
            }
        }
    }

    // Print final results
    info!("=== Demo Results ===");
    info!("Ticks: {}, events: {}", scene.tick_count(), total_events);
    for actor in scene.actors() {
        let p = actor.position();
        info!(
            "{}: position ({:.3}, {:.3}), on ground: {}, slope: {:?}",
            actor.id(),
            p.x,
            p.y,
            actor.is_on_ground(),
            actor.slope_state()
        );
    }

    Ok(())
}
