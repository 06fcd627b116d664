use bevy::prelude::*;
use crate::shared::*;

use super::{Pose, PlayerController};

/// Enter while overlapping an interaction zone: the trader opens the shop,
/// the bed puts the player to sleep facing left.
pub fn interact_with_zones(
    input: Res<PlayerInput>,
    zones: Query<(&Bounds, &InteractionZone), Without<Player>>,
    mut players: Query<(&mut Player, &mut PlayerController, &Hitbox)>,
    mut toggle_shop: EventWriter<ToggleShopEvent>,
) {
    if !input.interact {
        return;
    }
    let Ok((mut player, mut controller, hitbox)) = players.get_single_mut() else {
        return;
    };
    if player.sleeping {
        return;
    }

    for (bounds, zone) in zones.iter() {
        if !bounds.0.intersects(&hitbox.0) {
            continue;
        }
        match zone.kind {
            ZoneKind::Trader => {
                toggle_shop.send(ToggleShopEvent);
            }
            ZoneKind::Bed => {
                controller.status.facing = Facing::Left;
                controller.status.pose = Pose::Idle;
                controller.direction = Vec2::ZERO;
                player.sleeping = true;
                info!("[Player] Going to sleep");
            }
        }
        break;
    }
}

pub fn collect_item_pickups(
    mut pickups: EventReader<ItemPickupEvent>,
    mut inventory: ResMut<Inventory>,
) {
    for event in pickups.read() {
        inventory.add_item(event.item, event.quantity);
        info!(
            "[Player] +{} {} (now {})",
            event.quantity,
            event.item.key(),
            inventory.item_count(event.item)
        );
    }
}
