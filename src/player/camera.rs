use bevy::prelude::*;
use crate::shared::*;

/// Top-left of the view in map pixels: player centre minus half the screen.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraOffset(pub Vec2);

impl CameraOffset {
    pub fn centered_on(center: Vec2, screen: Vec2) -> Self {
        Self(center - screen / 2.0)
    }
}

/// Keep the view centred on the player. The camera's translation is the
/// map-space view centre flipped into Bevy's Y-up space.
pub fn camera_follow_player(
    config: Res<GameConfig>,
    player_query: Query<&Bounds, (With<Player>, Without<Camera2d>)>,
    mut camera_query: Query<&mut Transform, (With<Camera2d>, Without<Player>)>,
    mut offset: ResMut<CameraOffset>,
) {
    let Ok(bounds) = player_query.get_single() else {
        return;
    };
    let center = bounds.0.center();
    let next = CameraOffset::centered_on(center, config.screen());
    if *offset != next {
        *offset = next;
    }

    let Ok(mut cam_tf) = camera_query.get_single_mut() else {
        return;
    };
    cam_tf.translation.x = center.x;
    cam_tf.translation.y = -center.y;
}
