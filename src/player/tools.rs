use bevy::prelude::*;
use crate::shared::*;

use super::PlayerController;

/// Resolve the animation status, then fire whatever swing just completed at
/// the point in front of the player.
pub fn update_player_timers(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut query: Query<&mut PlayerController, With<Player>>,
    mut actions: EventWriter<PlayerAction>,
) {
    let Ok(mut controller) = query.get_single_mut() else {
        return;
    };
    controller.resolve_status();
    let target = controller.target_point(&config.player);
    for action in controller.tick_timers(time.elapsed(), target) {
        actions.send(action);
    }
}
