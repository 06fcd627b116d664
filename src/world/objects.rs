//! Static map objects, animated water and white-flash particles.

use bevy::prelude::*;
use bevy::render::render_resource::TextureFormat;
use std::collections::HashMap;
use std::time::Duration;

use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// HITBOX SHAPES
// ═══════════════════════════════════════════════════════════════════════

/// Walls, fences and collision tiles: only the lower-middle blocks.
pub fn generic_hitbox(rect: PixelRect) -> PixelRect {
    rect.inflate(-rect.w * 0.2, -rect.h * 0.75)
}

/// Flowers block a narrow sliver around their centre.
pub fn wildflower_hitbox(rect: PixelRect) -> PixelRect {
    rect.inflate(-20.0, -rect.h * 0.9)
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWNING
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_sprite(
    commands: &mut Commands,
    rect: PixelRect,
    image: Handle<Image>,
    layer: Layer,
) -> Entity {
    commands
        .spawn((
            Sprite { image, ..default() },
            Transform::default(),
            Bounds(rect),
            layer,
        ))
        .id()
}

/// Visible or invisible (`image: None`) blocker.
pub fn spawn_obstacle(
    commands: &mut Commands,
    rect: PixelRect,
    image: Option<Handle<Image>>,
    layer: Layer,
    hitbox: PixelRect,
) -> Entity {
    let mut entity = commands.spawn((
        Transform::default(),
        Bounds(rect),
        layer,
        Hitbox(hitbox),
        Obstacle,
    ));
    if let Some(image) = image {
        entity.insert(Sprite { image, ..default() });
    }
    entity.id()
}

pub fn spawn_zone(commands: &mut Commands, rect: PixelRect, kind: ZoneKind) -> Entity {
    commands
        .spawn((Transform::default(), Bounds(rect), Layer::Main, InteractionZone { kind }))
        .id()
}

// ═══════════════════════════════════════════════════════════════════════
// WATER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone, Default)]
pub struct WaterAnimation {
    pub frame_index: f32,
}

impl WaterAnimation {
    pub fn advance(&mut self, dt: f32, fps: f32, frame_count: usize) -> usize {
        self.frame_index += fps * dt;
        if self.frame_index >= frame_count as f32 {
            self.frame_index = 0.0;
        }
        self.frame_index as usize
    }
}

pub fn spawn_water(commands: &mut Commands, rect: PixelRect, assets: &GameAssets) -> Entity {
    commands
        .spawn((
            Sprite {
                image: pick_variant(&assets.water, 0),
                ..default()
            },
            Transform::default(),
            Bounds(rect),
            Layer::Water,
            WaterAnimation::default(),
        ))
        .id()
}

pub fn animate_water(
    time: Res<Time>,
    config: Res<GameConfig>,
    assets: Res<GameAssets>,
    mut query: Query<(&mut WaterAnimation, &mut Sprite)>,
) {
    let frames = &assets.water;
    for (mut anim, mut sprite) in &mut query {
        let frame = anim.advance(time.delta_secs(), config.water_animation_fps, frames.len());
        if let Some(image) = frames.get(frame) {
            if sprite.image != *image {
                sprite.image = image.clone();
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PARTICLES
// ═══════════════════════════════════════════════════════════════════════

/// White silhouette that despawns once `expires_at` (app time) passes.
#[derive(Component, Debug, Clone, Copy)]
pub struct Particle {
    pub expires_at: Duration,
}

/// Source image → its white silhouette. Built once per source.
#[derive(Resource, Debug, Default)]
pub struct SilhouetteCache {
    pub images: HashMap<AssetId<Image>, Handle<Image>>,
}

/// Pixels with alpha above half become white, the rest fully transparent.
/// `None` for formats that are not 8-bit RGBA.
pub fn silhouette(source: &Image) -> Option<Image> {
    let format = source.texture_descriptor.format;
    if format != TextureFormat::Rgba8UnormSrgb && format != TextureFormat::Rgba8Unorm {
        return None;
    }
    let mut image = source.clone();
    for pixel in image.data.chunks_exact_mut(4) {
        let value = if pixel[3] > 127 { 255 } else { 0 };
        pixel.copy_from_slice(&[value, value, value, value]);
    }
    Some(image)
}

/// Until the source image has loaded (or without an image store at all)
/// the particle falls back to the source image.
pub fn spawn_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut requests: EventReader<SpawnParticleEvent>,
    mut images: Option<ResMut<Assets<Image>>>,
    mut cache: ResMut<SilhouetteCache>,
) {
    for request in requests.read() {
        let image = match images.as_deref_mut() {
            Some(images) => silhouette_handle(images, &mut cache, &request.image),
            None => request.image.clone(),
        };
        commands.spawn((
            Sprite { image, ..default() },
            Transform::default(),
            Bounds(request.bounds),
            request.layer,
            Particle {
                expires_at: time.elapsed() + request.duration,
            },
        ));
    }
}

fn silhouette_handle(
    images: &mut Assets<Image>,
    cache: &mut SilhouetteCache,
    source: &Handle<Image>,
) -> Handle<Image> {
    let id = source.id();
    if let Some(handle) = cache.images.get(&id) {
        return handle.clone();
    }
    let Some(white) = images.get(id).and_then(silhouette) else {
        return source.clone();
    };
    let handle = images.add(white);
    cache.images.insert(id, handle.clone());
    handle
}

pub fn expire_particles(
    mut commands: Commands,
    time: Res<Time>,
    query: Query<(Entity, &Particle)>,
) {
    let now = time.elapsed();
    for (entity, particle) in &query {
        if now >= particle.expires_at {
            commands.entity(entity).despawn();
        }
    }
}
