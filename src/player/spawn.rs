use bevy::prelude::*;
use crate::shared::*;

use super::PlayerController;

/// Spawn the player centred on `start` (map pixels). Called by the level
/// builder for the map's `Start` marker.
pub fn spawn_player(
    commands: &mut Commands,
    start: Vec2,
    config: &PlayerConfig,
    assets: &GameAssets,
) -> Entity {
    let bounds = PixelRect::from_center(start, config.size());
    let (shrink_w, shrink_h) = config.hitbox_shrink;
    let hitbox = bounds.inflate(-shrink_w, -shrink_h);
    let image = assets
        .player_frames("down_idle")
        .first()
        .cloned()
        .unwrap_or_default();

    commands
        .spawn((
            Player::default(),
            PlayerController::new(hitbox.center(), config),
            Sprite { image, ..default() },
            Transform::default(),
            Bounds(bounds),
            Hitbox(hitbox),
            Layer::Main,
        ))
        .id()
}
