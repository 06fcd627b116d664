use bevy::prelude::*;
use crate::shared::*;

use super::PlayerController;

pub fn animate_player(
    time: Res<Time>,
    config: Res<GameConfig>,
    assets: Res<GameAssets>,
    mut query: Query<(&mut PlayerController, &mut Sprite), With<Player>>,
) {
    let Ok((mut controller, mut sprite)) = query.get_single_mut() else {
        return;
    };
    let key = controller.status.animation_key(controller.selected_tool);
    let frames = assets.player_frames(&key);
    let frame = controller.animate(time.delta_secs(), config.player.animation_fps, frames.len());
    if let Some(image) = frames.get(frame) {
        if sprite.image != *image {
            sprite.image = image.clone();
        }
    }
}
