//! Level orchestrator: frame ordering, world setup, the day reset and the
//! Playing ↔ Shop toggle.
//!
//! The only domain allowed to reach into farming, world and player state
//! directly; everything else talks through crate::shared.

pub mod setup;

use bevy::prelude::*;
use rand::Rng;

use crate::farming::SoilLayer;
use crate::shared::*;
use crate::world::Sky;

pub use setup::{build_level, LevelSummary};

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                FrameSet::Input,
                FrameSet::Timers,
                FrameSet::Movement,
                FrameSet::Effects,
                FrameSet::Weather,
                FrameSet::Overlay,
                FrameSet::Reconcile,
                FrameSet::Sync,
            )
                .chain(),
        );
        // The shop pauses the world; overlay, reconcile and sync keep running.
        app.configure_sets(
            Update,
            (
                FrameSet::Input,
                FrameSet::Timers,
                FrameSet::Movement,
                FrameSet::Effects,
                FrameSet::Weather,
            )
                .run_if(in_state(GameState::Playing)),
        );

        app.add_systems(Startup, setup::setup_level)
            .add_systems(Update, toggle_shop.in_set(FrameSet::Overlay))
            .add_systems(Update, reset_day.in_set(FrameSet::Reconcile));
    }
}

pub fn toggle_shop(
    mut events: EventReader<ToggleShopEvent>,
    state: Res<State<GameState>>,
    mut next: ResMut<NextState<GameState>>,
) {
    // Two toggles in one frame cancel out.
    let count = events.read().count();
    if count % 2 == 0 {
        return;
    }
    let target = match state.get() {
        GameState::Playing => GameState::Shop,
        GameState::Shop => GameState::Playing,
    };
    info!("[Level] {:?} -> {:?}", state.get(), target);
    next.set(target);
}

/// New day: crops grow on watered soil, the soil dries, the weather is
/// rerolled and the sky brightens again. Trees regrow their own fruit.
pub fn reset_day(
    mut resets: EventReader<DayResetEvent>,
    config: Res<GameConfig>,
    mut soil: ResMut<SoilLayer>,
    mut weather: ResMut<Weather>,
    mut sky: ResMut<Sky>,
) {
    if resets.is_empty() {
        return;
    }
    resets.clear();

    let mut rng = rand::thread_rng();
    soil.update_plants();
    soil.remove_water();
    weather.raining = rng.gen_bool(config.weather.rain_chance.clamp(0.0, 1.0));
    if weather.raining {
        soil.water_all(&mut rng);
    }
    sky.reset();
    info!(
        "[Level] New day: {} plants, raining: {}",
        soil.plants().len(),
        weather.raining
    );
}
