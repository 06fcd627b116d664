//! UI domain: the sleep fade and the trader's menu.

mod shop_screen;
mod transitions;

use bevy::prelude::*;
use crate::shared::*;

pub use shop_screen::{ShopEntry, ShopMenu};
pub use transitions::{DayTransition, TransitionStep};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DayTransition>()
            .init_resource::<ShopMenu>()
            .add_systems(Startup, (configure_ui, transitions::spawn_fade_overlay))
            .add_systems(
                Update,
                transitions::play_day_transition.in_set(FrameSet::Overlay),
            );

        // ─── SHOP ───
        app.add_systems(OnEnter(GameState::Shop), shop_screen::spawn_shop_screen);
        app.add_systems(OnExit(GameState::Shop), shop_screen::despawn_shop_screen);
        app.add_systems(
            Update,
            (shop_screen::shop_input, shop_screen::update_shop_display)
                .chain()
                .run_if(in_state(GameState::Shop)),
        );
    }
}

/// Pull speeds and debounce from the loaded config.
fn configure_ui(
    config: Res<GameConfig>,
    mut transition: ResMut<DayTransition>,
    mut menu: ResMut<ShopMenu>,
) {
    *transition = DayTransition::new(config.transition_speed);
    *menu = ShopMenu::new(config.shop.debounce_ms);
}
