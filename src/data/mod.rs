//! Data layer: reads the config, the map and the art folders from disk.
//!
//! `GameConfig` is loaded by `main` before the app exists (the window size
//! comes from it), so the outcome is parked in a `ConfigReport` and logged
//! once the log plugin is up. Image handles are requested in `PreStartup`
//! so every `Startup` spawner can rely on `GameAssets`.

pub mod assets;
pub mod map;

use bevy::prelude::*;
use std::path::{Path, PathBuf};

use crate::shared::*;

pub use assets::{import_folder, import_folder_dict};
pub use map::{MapData, MapObject, MapSource, MapTile, TileEntry};

/// Directory Bevy's `AssetPlugin` serves from.
pub const ASSET_ROOT: &str = "assets";
pub const CONFIG_PATH: &str = "assets/config/game.ron";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid data in {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub fn load_config(path: &Path) -> Result<GameConfig, LoadError> {
    let src = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    parse_config(path, &src)
}

pub fn parse_config(path: &Path, src: &str) -> Result<GameConfig, LoadError> {
    let config: GameConfig = ron::from_str(src).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if config.tile_size <= 0.0 {
        return Err(LoadError::Invalid {
            path: path.to_path_buf(),
            reason: format!("tile_size must be positive, got {}", config.tile_size),
        });
    }
    Ok(config)
}

/// Startup never aborts on a bad config; the error is reported later.
pub fn load_config_or_default(path: &Path) -> (GameConfig, ConfigReport) {
    match load_config(path) {
        Ok(config) => (
            config,
            ConfigReport {
                path: path.to_path_buf(),
                error: None,
            },
        ),
        Err(e) => (
            GameConfig::default(),
            ConfigReport {
                path: path.to_path_buf(),
                error: Some(e.to_string()),
            },
        ),
    }
}

/// Outcome of the pre-app config load.
#[derive(Resource, Debug, Clone, Default)]
pub struct ConfigReport {
    pub path: PathBuf,
    pub error: Option<String>,
}

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameConfig>()
            .init_resource::<GameAssets>()
            .init_resource::<ConfigReport>()
            .add_systems(PreStartup, (report_config, load_game_assets));
    }
}

fn report_config(report: Res<ConfigReport>) {
    match &report.error {
        None => info!("[Data] Config loaded from {}", report.path.display()),
        Some(e) => warn!("[Data] {e}; using built-in defaults"),
    }
}

/// Request every image handle the game needs.
///
/// Runs only when an `AssetServer` exists, so headless apps keep the empty
/// default `GameAssets`.
fn load_game_assets(
    asset_server: Option<Res<AssetServer>>,
    config: Res<GameConfig>,
    mut game_assets: ResMut<GameAssets>,
) {
    let Some(asset_server) = asset_server else {
        return;
    };
    let (loaded, errors) = assets::build_game_assets(Path::new(ASSET_ROOT), &asset_server, &config);
    for e in &errors {
        warn!("[Data] {e}; those sprites will render untextured");
    }
    info!(
        "[Data] Assets requested: {} soil tiles, {} water frames, {} player animations",
        loaded.soil.len(),
        loaded.water.len(),
        loaded.player.len()
    );
    *game_assets = loaded;
}
