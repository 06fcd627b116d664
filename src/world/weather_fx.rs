//! Rain visuals: falling drops and splashes on the ground.
//!
//! While it rains, one splash and one falling drop are spawned every frame
//! at random points of the map. Both live for a random 400–500 ms.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

use crate::shared::*;

/// A rain particle. Splashes have no velocity.
#[derive(Component, Debug, Clone, Copy)]
pub struct RainDrop {
    pub expires_at: Duration,
    /// Map pixels per second.
    pub velocity: Vec2,
}

impl RainDrop {
    pub fn is_expired(&self, now: Duration) -> bool {
        now >= self.expires_at
    }
}

fn roll_lifetime(cfg: &WeatherConfig, rng: &mut impl Rng) -> Duration {
    let (lo, hi) = cfg.drop_lifetime_ms;
    Duration::from_millis(rng.gen_range(lo.min(hi)..=hi.max(lo)))
}

fn random_point(world: Vec2, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        rng.gen_range(0.0..=world.x.max(0.0)),
        rng.gen_range(0.0..=world.y.max(0.0)),
    )
}

pub fn spawn_rain(
    mut commands: Commands,
    time: Res<Time>,
    weather: Res<Weather>,
    world: Res<WorldBounds>,
    config: Res<GameConfig>,
    assets: Res<GameAssets>,
) {
    if !weather.raining {
        return;
    }
    let mut rng = rand::thread_rng();
    let cfg = &config.weather;
    let now = time.elapsed();

    let floor_rect = PixelRect::from_topleft(
        random_point(world.size, &mut rng),
        Vec2::new(cfg.floor_size.0, cfg.floor_size.1),
    );
    commands.spawn((
        Sprite {
            image: assets.rain_floor.choose(&mut rng).cloned().unwrap_or_default(),
            ..default()
        },
        Transform::default(),
        Bounds(floor_rect),
        Layer::RainFloor,
        RainDrop {
            expires_at: now + roll_lifetime(cfg, &mut rng),
            velocity: Vec2::ZERO,
        },
    ));

    let (lo, hi) = cfg.drop_speed;
    let speed = rng.gen_range(lo.min(hi)..=hi.max(lo));
    let drop_rect = PixelRect::from_topleft(
        random_point(world.size, &mut rng),
        Vec2::new(cfg.drop_size.0, cfg.drop_size.1),
    );
    commands.spawn((
        Sprite {
            image: assets.rain_drops.choose(&mut rng).cloned().unwrap_or_default(),
            ..default()
        },
        Transform::default(),
        Bounds(drop_rect),
        Layer::RainDrops,
        RainDrop {
            expires_at: now + roll_lifetime(cfg, &mut rng),
            velocity: cfg.drop_direction() * speed,
        },
    ));
}

/// Move falling drops and despawn expired ones. Runs whether or not it is
/// still raining so the last drops finish their life.
pub fn update_rain(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &RainDrop, &mut Bounds)>,
) {
    let now = time.elapsed();
    let dt = time.delta_secs();
    for (entity, drop, mut bounds) in &mut query {
        if drop.is_expired(now) {
            commands.entity(entity).despawn();
            continue;
        }
        if drop.velocity != Vec2::ZERO {
            bounds.0.x += drop.velocity.x * dt;
            bounds.0.y += drop.velocity.y * dt;
        }
    }
}
