//! Player actions that land on the soil: hoe, watering can, seeds.

use bevy::prelude::*;
use crate::shared::*;

use super::soil::SoilLayer;

pub fn handle_player_actions(
    mut actions: EventReader<PlayerAction>,
    mut soil: ResMut<SoilLayer>,
    mut inventory: ResMut<Inventory>,
    weather: Res<Weather>,
    config: Res<GameConfig>,
) {
    let mut rng = rand::thread_rng();
    for action in actions.read() {
        match *action {
            PlayerAction::UseTool {
                tool: ToolKind::Hoe,
                target,
            } => {
                if soil.till(target, weather.raining, &mut rng) {
                    info!("[Farming] Tilled soil at {:?}", target);
                }
            }
            PlayerAction::UseTool {
                tool: ToolKind::Water,
                target,
            } => {
                soil.water(target, &mut rng);
            }
            PlayerAction::UseTool {
                tool: ToolKind::Axe,
                ..
            } => {}
            PlayerAction::PlantSeed { seed, target } => {
                if inventory.seed_count(seed) == 0 {
                    continue;
                }
                let spec = config.crop(seed);
                if soil.plant_seed(target, seed, &spec) {
                    inventory.take_seed(seed);
                    info!(
                        "[Farming] Planted {} ({} left)",
                        seed.key(),
                        inventory.seed_count(seed)
                    );
                }
            }
        }
    }
}
