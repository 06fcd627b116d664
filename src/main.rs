mod shared;
mod input;
mod data;
mod level;
mod player;
mod farming;
mod world;
mod ui;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};
use std::path::Path;

use shared::*;

fn main() {
    // The window size comes from the config, so it is read before the app
    // exists; DataPlugin logs the outcome once logging is up.
    let (config, report) = data::load_config_or_default(Path::new(data::CONFIG_PATH));
    let screen = config.screen();
    let inventory = Inventory::new(config.starting_money, config.starting_seeds);

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Sproutvale".into(),
                        resolution: WindowResolution::new(screen.x, screen.y),
                        present_mode: PresentMode::AutoVsync,
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .insert_resource(config)
        .insert_resource(report)
        .insert_resource(inventory)
        .init_resource::<Weather>()
        // Events
        .add_event::<PlayerAction>()
        .add_event::<ItemPickupEvent>()
        .add_event::<SpawnParticleEvent>()
        .add_event::<DayResetEvent>()
        .add_event::<ToggleShopEvent>()
        // Domain plugins
        .add_plugins(input::InputPlugin)
        .add_plugins(data::DataPlugin)
        .add_plugins(level::LevelPlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(farming::FarmingPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(ui::UiPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
