//! World domain plugin.
//!
//! Responsible for:
//! - Static map objects, animated water and interaction zones
//! - Trees, fruit and stumps
//! - White-flash particles
//! - Rain visuals and the evening sky tint
//! - Layer + Y depth sorting of every world sprite

use bevy::prelude::*;

use crate::shared::*;

pub mod lighting;
pub mod objects;
pub mod trees;
pub mod weather_fx;
pub mod ysort;

pub use lighting::Sky;
pub use objects::{Particle, SilhouetteCache, WaterAnimation};
pub use trees::{ChopOutcome, Fruit, Tree};
pub use weather_fx::RainDrop;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Sky>()
            .init_resource::<SilhouetteCache>()
            .init_resource::<WorldBounds>()
            .add_systems(
                Update,
                (
                    trees::chop_trees,
                    objects::animate_water,
                    objects::expire_particles,
                )
                    .in_set(FrameSet::Effects),
            )
            .add_systems(
                Update,
                (weather_fx::spawn_rain, weather_fx::update_rain).in_set(FrameSet::Weather),
            )
            .add_systems(
                Update,
                (trees::regrow_fruit, objects::spawn_particles).in_set(FrameSet::Reconcile),
            )
            .add_systems(
                Update,
                (
                    lighting::advance_sky,
                    ysort::sync_world_transforms,
                    lighting::apply_scene_tint,
                )
                    .chain()
                    .in_set(FrameSet::Sync),
            );
    }
}
