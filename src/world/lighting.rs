//! Evening sky: a multiplicative tint that fades from white towards night
//! over the course of a day and snaps back on every day reset.

use bevy::prelude::*;

use crate::shared::*;

const DAYLIGHT: Vec3 = Vec3::splat(255.0);

/// Current scene tint, 0..255 per channel.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Sky {
    pub color: Vec3,
    pub target: Vec3,
    /// Colour units per second per channel.
    pub fade_rate: f32,
}

impl Default for Sky {
    fn default() -> Self {
        Self::from_config(&SkyConfig::default())
    }
}

impl Sky {
    pub fn from_config(cfg: &SkyConfig) -> Self {
        let (r, g, b) = cfg.target;
        Self {
            color: DAYLIGHT,
            target: Vec3::new(r, g, b),
            fade_rate: cfg.fade_rate,
        }
    }

    /// Channels above the target darken linearly; none go below it.
    pub fn advance(&mut self, dt: f32) {
        let step = self.fade_rate * dt;
        for i in 0..3 {
            if self.color[i] > self.target[i] {
                self.color[i] = (self.color[i] - step).max(self.target[i]);
            }
        }
    }

    pub fn reset(&mut self) {
        self.color = DAYLIGHT;
    }

    pub fn tint(&self) -> Color {
        let c = self.color / 255.0;
        Color::srgb(c.x, c.y, c.z)
    }
}

/// The sky keeps fading in every state, shop included.
pub fn advance_sky(time: Res<Time>, mut sky: ResMut<Sky>) {
    sky.advance(time.delta_secs());
}

/// Multiply every world sprite by the sky colour.
pub fn apply_scene_tint(sky: Res<Sky>, mut sprites: Query<&mut Sprite, With<Layer>>) {
    let tint = sky.tint();
    for mut sprite in &mut sprites {
        if sprite.color != tint {
            sprite.color = tint;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sky_fades_towards_target_and_stops() {
        let mut sky = Sky::default();
        sky.advance(10.0);
        assert_eq!(sky.color, Vec3::new(235.0, 235.0, 235.0));
        for _ in 0..1000 {
            sky.advance(1.0);
        }
        assert_eq!(sky.color, sky.target);
    }

    #[test]
    fn test_channels_already_below_target_are_untouched() {
        let mut sky = Sky {
            color: Vec3::new(10.0, 255.0, 255.0),
            ..default()
        };
        sky.advance(1.0);
        assert_eq!(sky.color.x, 10.0);
        assert_eq!(sky.color.y, 253.0);
    }

    #[test]
    fn test_reset_restores_daylight() {
        let mut sky = Sky::default();
        sky.advance(50.0);
        sky.reset();
        assert_eq!(sky.tint().to_srgba(), Srgba::WHITE);
    }
}
