//! Farming domain: soil tilling, watering, planting, crop growth, harvest.
//!
//! `SoilLayer` is the source of truth; sprite entities are reconciled from
//! it. Communicates with other domains through crate::shared events and
//! resources. The day reset itself is driven by the level orchestrator.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::shared::*;

pub mod crops;
mod events_handler;
pub mod grid;
mod harvest;
mod render;
pub mod soil;

pub use crops::Plant;
pub use grid::{GridCell, Neighbors, SoilGrid, SoilVariant};
pub use soil::SoilLayer;

/// Marker for tilled soil sprites.
#[derive(Component, Debug, Clone, Copy)]
pub struct SoilSprite {
    pub pos: TilePos,
}

/// Marker for the watered-soil overlay.
#[derive(Component, Debug, Clone, Copy)]
pub struct WaterSprite {
    pub pos: TilePos,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct PlantSprite {
    pub pos: TilePos,
}

/// Tracks which sprite entities exist keyed by grid position.
#[derive(Resource, Default, Debug)]
pub struct FarmEntities {
    /// Soil entity plus the variant it was spawned with.
    pub soil: HashMap<TilePos, (Entity, SoilVariant)>,
    pub water: HashMap<TilePos, Entity>,
    pub plants: HashMap<TilePos, Entity>,
}

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SoilLayer>()
            .init_resource::<FarmEntities>()
            .add_systems(
                Update,
                (
                    events_handler::handle_player_actions,
                    harvest::harvest_ripe_plants,
                )
                    .chain()
                    .in_set(FrameSet::Effects),
            )
            // Visual sync, after every state mutation of the frame.
            .add_systems(
                Update,
                (render::sync_soil_sprites, render::sync_plant_sprites).in_set(FrameSet::Reconcile),
            );
    }
}
