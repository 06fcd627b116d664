//! Visual synchronisation: reconcile soil, water and plant sprites with the
//! `SoilLayer` whenever it changes.

use bevy::prelude::*;
use crate::shared::*;

use super::soil::SoilLayer;
use super::{FarmEntities, PlantSprite, SoilSprite, WaterSprite};

fn tile_sprite(image: Handle<Image>) -> Sprite {
    Sprite {
        image,
        ..default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Soil + water overlay
// ─────────────────────────────────────────────────────────────────────────────

pub fn sync_soil_sprites(
    mut commands: Commands,
    soil: Res<SoilLayer>,
    assets: Res<GameAssets>,
    mut farm_entities: ResMut<FarmEntities>,
) {
    if !soil.is_changed() {
        return;
    }
    let tile_size = soil.tile_size();

    // Re-spawn tiles whose autotile variant changed, spawn new ones.
    for (&pos, &variant) in soil.soil_tiles() {
        if let Some(&(entity, current)) = farm_entities.soil.get(&pos) {
            if current == variant {
                continue;
            }
            commands.entity(entity).despawn();
        }
        let entity = commands
            .spawn((
                tile_sprite(assets.soil_image(variant.code())),
                Transform::default(),
                Bounds(pos.rect(tile_size)),
                Layer::Soil,
                SoilSprite { pos },
            ))
            .id();
        farm_entities.soil.insert(pos, (entity, variant));
    }

    let stale: Vec<TilePos> = farm_entities
        .soil
        .keys()
        .filter(|pos| !soil.soil_tiles().contains_key(pos))
        .copied()
        .collect();
    for pos in stale {
        if let Some((entity, _)) = farm_entities.soil.remove(&pos) {
            commands.entity(entity).despawn();
        }
    }

    for (&pos, &variant) in soil.water_tiles() {
        if farm_entities.water.contains_key(&pos) {
            continue;
        }
        let entity = commands
            .spawn((
                tile_sprite(pick_variant(&assets.soil_water, variant)),
                Transform::default(),
                Bounds(pos.rect(tile_size)),
                Layer::SoilWater,
                WaterSprite { pos },
            ))
            .id();
        farm_entities.water.insert(pos, entity);
    }

    let dried: Vec<TilePos> = farm_entities
        .water
        .keys()
        .filter(|pos| !soil.water_tiles().contains_key(pos))
        .copied()
        .collect();
    for pos in dried {
        if let Some(entity) = farm_entities.water.remove(&pos) {
            commands.entity(entity).despawn();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plants
// ─────────────────────────────────────────────────────────────────────────────

pub fn sync_plant_sprites(
    mut commands: Commands,
    soil: Res<SoilLayer>,
    assets: Res<GameAssets>,
    mut farm_entities: ResMut<FarmEntities>,
    mut plant_query: Query<(&PlantSprite, &mut Sprite, &mut Bounds, &mut Layer)>,
) {
    if !soil.is_changed() {
        return;
    }

    // Update existing entities in place.
    for (tag, mut sprite, mut bounds, mut layer) in plant_query.iter_mut() {
        let Some(plant) = soil.plants().get(&tag.pos) else {
            continue;
        };
        let image = assets.plant_frame(plant.seed, plant.frame());
        if sprite.image != image {
            sprite.image = image;
        }
        if bounds.0 != plant.bounds {
            bounds.0 = plant.bounds;
        }
        if *layer != plant.layer {
            *layer = plant.layer;
        }
    }
    // Hitboxes only appear once a plant has grown; obstacles are inserted
    // through commands so the query above stays simple.
    for (pos, plant) in soil.plants() {
        if let (Some(&entity), Some(hitbox)) = (farm_entities.plants.get(pos), plant.hitbox) {
            commands.entity(entity).insert((Hitbox(hitbox), Obstacle));
        }
    }

    let missing: Vec<TilePos> = soil
        .plants()
        .keys()
        .filter(|pos| !farm_entities.plants.contains_key(pos))
        .copied()
        .collect();
    for pos in missing {
        let plant = &soil.plants()[&pos];
        let mut entity = commands.spawn((
            tile_sprite(assets.plant_frame(plant.seed, plant.frame())),
            Transform::default(),
            Bounds(plant.bounds),
            plant.layer,
            PlantSprite { pos },
        ));
        if let Some(hitbox) = plant.hitbox {
            entity.insert((Hitbox(hitbox), Obstacle));
        }
        farm_entities.plants.insert(pos, entity.id());
    }

    let harvested: Vec<TilePos> = farm_entities
        .plants
        .keys()
        .filter(|pos| !soil.plants().contains_key(pos))
        .copied()
        .collect();
    for pos in harvested {
        if let Some(entity) = farm_entities.plants.remove(&pos) {
            commands.entity(entity).despawn();
        }
    }
}
