//! Tick throughput over a tile level with a handful of walkers.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use platformer_physics::physics::ReverseOnWall;
use platformer_physics::{ActorConfig, Level, PhysicsContext, Scene, Vec2};

const LEVEL: &[&str] = &[
    "................................",
    "........?.........?.............",
    "................................",
    "#...../##\\............/####....#",
    "################################",
];

fn populated_scene(walkers: usize) -> Scene {
    let level = Level::parse(LEVEL, 1.0).expect("bench level parses");
    let (world, _) = level.into_parts();
    let mut scene = Scene::new(PhysicsContext::default(), world);

    for i in 0..walkers {
        let x = 1.5 + i as f32 * 1.7;
        let id = scene
            .spawn(ActorConfig::new(Vec2::splat(0.4), 20.0), Vec2::new(x, 2.5))
            .expect("walker config is valid");
        if let Some(actor) = scene.actor_mut(id) {
            actor.add_reaction(ReverseOnWall);
            let dir = if i % 2 == 0 { 1.0 } else { -1.0 };
            actor.set_velocity(Vec2::new(3.0 * dir, 0.0));
        }
    }
    scene
}

fn bench_scene_tick(c: &mut Criterion) {
    let mut scene = populated_scene(16);
    c.bench_function("scene_tick_16_walkers", |b| {
        b.iter(|| black_box(scene.tick()))
    });
}

fn bench_advance(c: &mut Criterion) {
    let mut scene = populated_scene(16);
    c.bench_function("scene_advance_60hz_frame", |b| {
        b.iter(|| black_box(scene.advance(black_box(1.0 / 60.0))))
    });
}

criterion_group!(benches, bench_scene_tick, bench_advance);
criterion_main!(benches);
