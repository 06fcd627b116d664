//! Art folder import.
//!
//! Animations are folders of numbered frames; the soil autotiles are a
//! folder keyed by file stem. Paths returned here are relative to the asset
//! root, ready for `AssetServer::load`.

use bevy::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

use super::LoadError;
use crate::shared::*;

const CHARACTER_POSES: [&str; 5] = ["", "_idle", "_hoe", "_axe", "_water"];

/// Image paths in `dir`, in frame order (`2.png` before `10.png`).
pub fn import_folder(root: &Path, dir: &str) -> Result<Vec<String>, LoadError> {
    let full = root.join(dir);
    let entries = std::fs::read_dir(&full).map_err(|e| LoadError::io(&full, e))?;

    let mut files: Vec<(Option<u32>, String)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LoadError::io(&full, e))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("png") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let number = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<u32>().ok());
        files.push((number, name.to_string()));
    }
    files.sort_by(|a, b| (a.0.is_none(), a.0, &a.1).cmp(&(b.0.is_none(), b.0, &b.1)));

    Ok(files
        .into_iter()
        .map(|(_, name)| format!("{dir}/{name}"))
        .collect())
}

/// File stem → image path for every image in `dir`.
pub fn import_folder_dict(root: &Path, dir: &str) -> Result<BTreeMap<String, String>, LoadError> {
    let mut out = BTreeMap::new();
    for path in import_folder(root, dir)? {
        let stem = Path::new(&path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        out.insert(stem, path);
    }
    Ok(out)
}

/// Every folder that fails to list is reported and left empty.
pub fn build_game_assets(
    root: &Path,
    asset_server: &AssetServer,
    config: &GameConfig,
) -> (GameAssets, Vec<LoadError>) {
    let mut errors = Vec::new();
    let mut frames = |dir: &str| -> Vec<Handle<Image>> {
        match import_folder(root, dir) {
            Ok(paths) => paths.into_iter().map(|p| asset_server.load(p)).collect(),
            Err(e) => {
                errors.push(e);
                Vec::new()
            }
        }
    };

    let mut game_assets = GameAssets {
        soil_water: frames("graphics/soil_water"),
        water: frames("graphics/water"),
        rain_drops: frames("graphics/rain/drops"),
        rain_floor: frames("graphics/rain/floor"),
        ..default()
    };
    for seed in Seed::ALL {
        if config.crops.contains_key(&seed) {
            game_assets
                .plants
                .insert(seed, frames(&format!("graphics/fruit/{}", seed.key())));
        }
    }
    for facing in [Facing::Up, Facing::Down, Facing::Left, Facing::Right] {
        for pose in CHARACTER_POSES {
            let key = format!("{}{pose}", facing.key());
            let list = frames(&format!("graphics/character/{key}"));
            game_assets.player.insert(key, list);
        }
    }

    match import_folder_dict(root, "graphics/soil") {
        Ok(tiles) => {
            game_assets.soil = tiles
                .into_iter()
                .map(|(code, path)| (code, asset_server.load(path)))
                .collect();
        }
        Err(e) => errors.push(e),
    }

    game_assets.apple = asset_server.load("graphics/fruit/apple.png");
    for size in [TreeSize::Small, TreeSize::Large] {
        game_assets.stumps.insert(
            size,
            asset_server.load(format!("graphics/stumps/{}.png", size.key())),
        );
    }

    (game_assets, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("sproutvale-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("anim")).unwrap();
        dir
    }

    #[test]
    fn test_frames_sort_numerically() {
        let root = scratch_dir("frames");
        for name in ["10.png", "2.png", "0.png", "notes.txt"] {
            std::fs::write(root.join("anim").join(name), b"").unwrap();
        }
        let frames = import_folder(&root, "anim").unwrap();
        assert_eq!(frames, vec!["anim/0.png", "anim/2.png", "anim/10.png"]);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_dict_is_keyed_by_stem() {
        let root = scratch_dir("dict");
        for name in ["lr.png", "o.png", "tbl.png"] {
            std::fs::write(root.join("anim").join(name), b"").unwrap();
        }
        let dict = import_folder_dict(&root, "anim").unwrap();
        assert_eq!(dict.get("tbl").map(String::as_str), Some("anim/tbl.png"));
        assert_eq!(dict.len(), 3);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_missing_folder_is_io_error() {
        let err = import_folder(Path::new("no-such-root"), "anim").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
