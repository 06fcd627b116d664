use bevy::prelude::*;
use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<KeyBindings>()
            .init_resource::<PlayerInput>()
            .add_systems(PreUpdate, read_input);
    }
}

#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub move_up: KeyCode,
    pub move_down: KeyCode,
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub use_tool: KeyCode,
    pub switch_tool: KeyCode,
    pub use_seed: KeyCode,
    pub switch_seed: KeyCode,
    pub interact: KeyCode,
    pub cancel: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_up: KeyCode::ArrowUp,
            move_down: KeyCode::ArrowDown,
            move_left: KeyCode::ArrowLeft,
            move_right: KeyCode::ArrowRight,
            use_tool: KeyCode::Space,
            switch_tool: KeyCode::KeyQ,
            use_seed: KeyCode::ControlLeft,
            switch_seed: KeyCode::KeyE,
            interact: KeyCode::Enter,
            cancel: KeyCode::Escape,
        }
    }
}

/// The single point where hardware input becomes game actions.
///
/// Without a keyboard resource (headless runs) `PlayerInput` is left alone
/// so tests can drive it directly.
fn read_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    bindings: Res<KeyBindings>,
    mut input: ResMut<PlayerInput>,
) {
    let Some(keys) = keys else {
        return;
    };
    *input = PlayerInput {
        up: keys.pressed(bindings.move_up),
        down: keys.pressed(bindings.move_down),
        left: keys.pressed(bindings.move_left),
        right: keys.pressed(bindings.move_right),
        use_tool: keys.pressed(bindings.use_tool),
        switch_tool: keys.pressed(bindings.switch_tool),
        use_seed: keys.pressed(bindings.use_seed),
        switch_seed: keys.pressed(bindings.switch_seed),
        interact: keys.just_pressed(bindings.interact),
        cancel: keys.just_pressed(bindings.cancel),
    };
}
