use bevy::prelude::*;
use crate::shared::*;

use super::PlayerController;

/// Turn the frame's `PlayerInput` into direction, facing and timer starts.
pub fn player_input(
    time: Res<Time>,
    input: Res<PlayerInput>,
    mut query: Query<(&mut PlayerController, &Player)>,
) {
    let Ok((mut controller, player)) = query.get_single_mut() else {
        return;
    };
    controller.apply_input(&input, time.elapsed(), player.sleeping);
}

/// Axis-separated movement against every obstacle hitbox.
pub fn player_movement(
    time: Res<Time>,
    obstacles: Query<&Hitbox, (With<Obstacle>, Without<Player>)>,
    mut query: Query<(&mut PlayerController, &mut Bounds, &mut Hitbox), With<Player>>,
) {
    let Ok((mut controller, mut bounds, mut hitbox)) = query.get_single_mut() else {
        return;
    };
    let blockers: Vec<PixelRect> = obstacles.iter().map(|h| h.0).collect();

    let mut next_bounds = bounds.0;
    let mut next_hitbox = hitbox.0;
    controller.move_and_collide(time.delta_secs(), &mut next_bounds, &mut next_hitbox, &blockers);

    if next_bounds != bounds.0 {
        bounds.0 = next_bounds;
    }
    if next_hitbox != hitbox.0 {
        hitbox.0 = next_hitbox;
    }
}
