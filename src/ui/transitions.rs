use bevy::prelude::*;
use crate::shared::*;

/// Marker for the sleep fade overlay
#[derive(Component)]
pub struct ScreenFadeOverlay;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStep {
    Fading,
    /// Fully black this frame; the day resets here.
    ReachedBlack,
    /// Back to normal; the player wakes up.
    ReachedWhite,
}

/// Sleep fade. `level` is a brightness from 255 (clear) down to 0 (black);
/// it falls first, then rises back.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct DayTransition {
    pub level: f32,
    /// -1 while darkening, +1 while brightening.
    pub direction: f32,
    /// Brightness units per second.
    pub speed: f32,
}

impl Default for DayTransition {
    fn default() -> Self {
        Self::new(120.0)
    }
}

impl DayTransition {
    pub fn new(speed: f32) -> Self {
        Self {
            level: 255.0,
            direction: -1.0,
            speed,
        }
    }

    pub fn step(&mut self, dt: f32) -> TransitionStep {
        self.level += self.direction * self.speed * dt;
        if self.level <= 0.0 {
            self.level = 0.0;
            self.direction = 1.0;
            return TransitionStep::ReachedBlack;
        }
        if self.level >= 255.0 {
            self.level = 255.0;
            self.direction = -1.0;
            return TransitionStep::ReachedWhite;
        }
        TransitionStep::Fading
    }

    /// Overlay opacity: 0 when clear, 1 when black.
    pub fn overlay_alpha(&self) -> f32 {
        1.0 - self.level / 255.0
    }
}

/// Spawn the fade overlay (always present, invisible while awake)
pub fn spawn_fade_overlay(mut commands: Commands) {
    commands.spawn((
        ScreenFadeOverlay,
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
        GlobalZIndex(100),
        PickingBehavior::IGNORE,
    ));
}

/// While the player sleeps: darken, reset the day at black, brighten, wake.
pub fn play_day_transition(
    time: Res<Time>,
    mut transition: ResMut<DayTransition>,
    mut players: Query<&mut Player>,
    mut overlay: Query<&mut BackgroundColor, With<ScreenFadeOverlay>>,
    mut resets: EventWriter<DayResetEvent>,
) {
    let Ok(mut player) = players.get_single_mut() else {
        return;
    };
    if !player.sleeping {
        return;
    }

    match transition.step(time.delta_secs()) {
        TransitionStep::Fading => {}
        TransitionStep::ReachedBlack => {
            resets.send(DayResetEvent);
        }
        TransitionStep::ReachedWhite => {
            player.sleeping = false;
            info!("[Ui] Good morning");
        }
    }

    let alpha = transition.overlay_alpha();
    for mut bg in &mut overlay {
        *bg = BackgroundColor(Color::srgba(0.0, 0.0, 0.0, alpha));
    }
}
