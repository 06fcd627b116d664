//! Harvest system: walking into a ripe plant picks it.

use bevy::prelude::*;
use std::time::Duration;

use crate::shared::*;

use super::soil::SoilLayer;

/// Every frame: ripe plants whose sprite overlaps the player's hitbox are
/// removed, credited and leave a white flash behind.
pub fn harvest_ripe_plants(
    mut soil: ResMut<SoilLayer>,
    player: Query<&Hitbox, With<Player>>,
    assets: Res<GameAssets>,
    config: Res<GameConfig>,
    mut pickups: EventWriter<ItemPickupEvent>,
    mut particles: EventWriter<SpawnParticleEvent>,
) {
    let Ok(hitbox) = player.get_single() else {
        return;
    };

    let ripe: Vec<TilePos> = soil
        .plants()
        .iter()
        .filter(|(_, plant)| plant.harvestable && plant.bounds.intersects(&hitbox.0))
        .map(|(pos, _)| *pos)
        .collect();

    for pos in ripe {
        let Some(plant) = soil.harvest(pos) else {
            continue;
        };
        pickups.send(ItemPickupEvent {
            item: plant.seed.crop(),
            quantity: 1,
        });
        particles.send(SpawnParticleEvent {
            image: assets.plant_frame(plant.seed, plant.frame()),
            bounds: plant.bounds,
            layer: Layer::Main,
            duration: Duration::from_millis(config.harvest_particle_ms),
        });
        info!("[Farming] Harvested {} at {:?}", plant.seed.key(), pos);
    }
}
