//! Builds the world from a `MapSource`: ground, house, fences, water,
//! trees, flowers, collision, the player and the interaction zones.

use bevy::prelude::*;
use rand::Rng;
use std::path::Path;

use crate::data::{MapData, MapSource, ASSET_ROOT};
use crate::farming::SoilLayer;
use crate::player::spawn_player;
use crate::shared::*;
use crate::world::objects::{
    generic_hitbox, spawn_obstacle, spawn_sprite, spawn_water, spawn_zone, wildflower_hitbox,
};
use crate::world::trees::spawn_tree;

/// Tile layers drawn as plain sprites, with their draw layer.
const DECOR_LAYERS: [(&str, Layer); 4] = [
    ("HouseFloor", Layer::HouseBottom),
    ("HouseFurnitureBottom", Layer::HouseBottom),
    ("HouseWalls", Layer::Main),
    ("HouseFurnitureTop", Layer::Main),
];

/// What the level builder put into the world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelSummary {
    pub sprites: usize,
    pub obstacles: usize,
    pub water: usize,
    pub trees: usize,
    pub zones: usize,
    pub player: Option<Entity>,
}

/// Spawn every map entity. `load` turns a map image reference into a handle.
pub fn build_level(
    commands: &mut Commands,
    map: &impl MapSource,
    config: &GameConfig,
    assets: &GameAssets,
    load: impl Fn(&str) -> Handle<Image>,
    rng: &mut impl Rng,
) -> LevelSummary {
    let ts = config.tile_size;
    let tile_rect = |col: usize, row: usize| TilePos::new(col, row).rect(ts);
    let image_of = |image: &Option<String>| image.as_deref().map(&load).unwrap_or_default();
    let mut summary = LevelSummary::default();

    // ─── GROUND ───
    if let Some(ground) = map.ground_image() {
        let (cols, rows) = map.size_in_tiles();
        let rect = PixelRect::new(0.0, 0.0, cols as f32 * ts, rows as f32 * ts);
        spawn_sprite(commands, rect, load(ground), Layer::Ground);
        summary.sprites += 1;
    }

    // ─── HOUSE ───
    for (name, layer) in DECOR_LAYERS {
        for tile in map.tiles(name) {
            spawn_sprite(commands, tile_rect(tile.col, tile.row), image_of(&tile.image), layer);
            summary.sprites += 1;
        }
    }

    // ─── FENCE ───
    for tile in map.tiles("Fence") {
        let rect = tile_rect(tile.col, tile.row);
        let image = Some(image_of(&tile.image));
        spawn_obstacle(commands, rect, image, Layer::Main, generic_hitbox(rect));
        summary.obstacles += 1;
    }

    // ─── WATER ───
    for tile in map.tiles("Water") {
        spawn_water(commands, tile_rect(tile.col, tile.row), assets);
        summary.water += 1;
    }

    // ─── TREES ───
    for obj in map.objects("Trees") {
        let rect = PixelRect::new(obj.x, obj.y, obj.width, obj.height);
        spawn_tree(
            commands,
            rect,
            image_of(&obj.image),
            TreeSize::from_name(&obj.name),
            &config.trees,
            assets,
            rng,
        );
        summary.trees += 1;
    }

    // ─── WILD FLOWERS ───
    for obj in map.objects("Decoration") {
        let rect = PixelRect::new(obj.x, obj.y, obj.width, obj.height);
        let image = Some(image_of(&obj.image));
        spawn_obstacle(commands, rect, image, Layer::Main, wildflower_hitbox(rect));
        summary.obstacles += 1;
    }

    // ─── COLLISION ───
    for tile in map.tiles("Collision") {
        let rect = tile_rect(tile.col, tile.row);
        spawn_obstacle(commands, rect, None, Layer::Main, generic_hitbox(rect));
        summary.obstacles += 1;
    }

    // ─── PLAYER & ZONES ───
    for obj in map.objects("Player") {
        let rect = PixelRect::new(obj.x, obj.y, obj.width, obj.height);
        match obj.name.as_str() {
            "Start" => {
                let start = Vec2::new(obj.x, obj.y);
                summary.player = Some(spawn_player(commands, start, &config.player, assets));
            }
            "Bed" => {
                spawn_zone(commands, rect, ZoneKind::Bed);
                summary.zones += 1;
            }
            "Trader" => {
                spawn_zone(commands, rect, ZoneKind::Trader);
                summary.zones += 1;
            }
            other => warn!("[Level] Unknown player object '{other}'"),
        }
    }

    summary
}

/// Startup: read the map, fill the farm grid and spawn the world.
pub fn setup_level(
    mut commands: Commands,
    config: Res<GameConfig>,
    assets: Res<GameAssets>,
    asset_server: Option<Res<AssetServer>>,
    mut soil: ResMut<SoilLayer>,
    mut world: ResMut<WorldBounds>,
    mut weather: ResMut<Weather>,
) {
    let path = Path::new(ASSET_ROOT).join(&config.map_path);
    let map = match MapData::load(&path) {
        Ok(map) => {
            info!("[Level] Loaded map {} ({}x{})", path.display(), map.cols, map.rows);
            map
        }
        Err(e) => {
            error!("[Level] {e}; starting with an empty world");
            MapData::default()
        }
    };

    let (cols, rows) = map.size_in_tiles();
    *soil = SoilLayer::from_map(&map, config.tile_size);
    world.size = Vec2::new(cols as f32 * config.tile_size, rows as f32 * config.tile_size);

    let mut rng = rand::thread_rng();
    let load = |image: &str| -> Handle<Image> {
        asset_server
            .as_ref()
            .map(|server| server.load(image.to_string()))
            .unwrap_or_default()
    };
    let summary = build_level(&mut commands, &map, &config, &assets, load, &mut rng);

    weather.raining = rng.gen_bool(config.weather.rain_chance.clamp(0.0, 1.0));
    if weather.raining {
        soil.water_all(&mut rng);
    }

    info!(
        "[Level] Spawned {} sprites, {} obstacles, {} water tiles, {} trees, {} zones; raining: {}",
        summary.sprites,
        summary.obstacles,
        summary.water,
        summary.trees,
        summary.zones,
        weather.raining
    );
    if summary.player.is_none() {
        warn!("[Level] Map has no Start marker; no player spawned");
    }
}
