//! Tuning constants, deserialized from `assets/config/game.ron`.
//!
//! Every struct is `#[serde(default)]` so a config file only needs to name
//! the values it changes. Two-component values are `(f32, f32)` tuples on
//! disk and exposed as `Vec2` through accessors.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::{Facing, Item, Seed, TreeSize};

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tile_size: f32,
    pub screen_size: (f32, f32),
    /// Relative to the asset root.
    pub map_path: String,
    pub player: PlayerConfig,
    pub crops: BTreeMap<Seed, CropSpec>,
    pub trees: TreeConfig,
    pub weather: WeatherConfig,
    pub sky: SkyConfig,
    pub shop: ShopConfig,
    pub starting_money: u32,
    pub starting_seeds: u32,
    pub water_animation_fps: f32,
    /// Colour units (0..255) per second.
    pub transition_speed: f32,
    pub harvest_particle_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        let mut crops = BTreeMap::new();
        crops.insert(
            Seed::Corn,
            CropSpec {
                grow_speed: 1.0,
                frames: 4,
                y_offset: -16.0,
                frame_size: (64.0, 64.0),
            },
        );
        crops.insert(
            Seed::Tomato,
            CropSpec {
                grow_speed: 0.7,
                frames: 4,
                y_offset: -8.0,
                frame_size: (64.0, 64.0),
            },
        );
        Self {
            tile_size: 64.0,
            screen_size: (1280.0, 720.0),
            map_path: "maps/farm.ron".to_string(),
            player: PlayerConfig::default(),
            crops,
            trees: TreeConfig::default(),
            weather: WeatherConfig::default(),
            sky: SkyConfig::default(),
            shop: ShopConfig::default(),
            starting_money: 200,
            starting_seeds: 5,
            water_animation_fps: 5.0,
            transition_speed: 120.0,
            harvest_particle_ms: 200,
        }
    }
}

impl GameConfig {
    pub fn screen(&self) -> Vec2 {
        Vec2::new(self.screen_size.0, self.screen_size.1)
    }

    /// Unknown species fall back to a one-frame crop that never grows.
    pub fn crop(&self, seed: Seed) -> CropSpec {
        self.crops.get(&seed).cloned().unwrap_or(CropSpec {
            grow_speed: 0.0,
            frames: 1,
            y_offset: 0.0,
            frame_size: (self.tile_size, self.tile_size),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub speed: f32,
    pub size: (f32, f32),
    /// Subtracted from the sprite size to get the collision hitbox.
    pub hitbox_shrink: (f32, f32),
    pub animation_fps: f32,
    pub tool_use_ms: u64,
    pub tool_switch_ms: u64,
    pub seed_use_ms: u64,
    pub seed_switch_ms: u64,
    pub tool_offsets: BTreeMap<Facing, (f32, f32)>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        let tool_offsets = BTreeMap::from([
            (Facing::Left, (-50.0, 40.0)),
            (Facing::Right, (50.0, 40.0)),
            (Facing::Up, (0.0, -10.0)),
            (Facing::Down, (0.0, 50.0)),
        ]);
        Self {
            speed: 200.0,
            size: (192.0, 192.0),
            hitbox_shrink: (126.0, 70.0),
            animation_fps: 4.0,
            tool_use_ms: 350,
            tool_switch_ms: 200,
            seed_use_ms: 350,
            seed_switch_ms: 200,
            tool_offsets,
        }
    }
}

impl PlayerConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.size.0, self.size.1)
    }

    pub fn tool_offset(&self, facing: Facing) -> Vec2 {
        self.tool_offsets
            .get(&facing)
            .map(|(x, y)| Vec2::new(*x, *y))
            .unwrap_or(Vec2::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CropSpec {
    /// Age added per day reset while watered.
    pub grow_speed: f32,
    /// Number of growth frames; the last one is ripe.
    pub frames: usize,
    /// Vertical offset of the plant sprite from the soil tile's bottom.
    pub y_offset: f32,
    pub frame_size: (f32, f32),
}

impl Default for CropSpec {
    fn default() -> Self {
        Self {
            grow_speed: 1.0,
            frames: 4,
            y_offset: 0.0,
            frame_size: (64.0, 64.0),
        }
    }
}

impl CropSpec {
    pub fn max_age(&self) -> f32 {
        self.frames.saturating_sub(1) as f32
    }

    pub fn frame_size(&self) -> Vec2 {
        Vec2::new(self.frame_size.0, self.frame_size.1)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub health: u32,
    /// Per attachment point, per day.
    pub fruit_chance: f64,
    pub fruit_size: (f32, f32),
    /// Fruit attachment points, relative to the tree's top-left.
    pub fruit_offsets: BTreeMap<TreeSize, Vec<(f32, f32)>>,
    pub stump_size: BTreeMap<TreeSize, (f32, f32)>,
    pub chop_particle_ms: u64,
    pub fell_particle_ms: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        let fruit_offsets = BTreeMap::from([
            (
                TreeSize::Small,
                vec![
                    (18.0, 17.0),
                    (30.0, 37.0),
                    (12.0, 50.0),
                    (30.0, 45.0),
                    (20.0, 30.0),
                    (30.0, 10.0),
                ],
            ),
            (
                TreeSize::Large,
                vec![
                    (30.0, 24.0),
                    (60.0, 65.0),
                    (50.0, 50.0),
                    (16.0, 40.0),
                    (45.0, 50.0),
                    (42.0, 70.0),
                ],
            ),
        ]);
        let stump_size = BTreeMap::from([
            (TreeSize::Small, (48.0, 48.0)),
            (TreeSize::Large, (64.0, 64.0)),
        ]);
        Self {
            health: 5,
            fruit_chance: 2.0 / 11.0,
            fruit_size: (16.0, 16.0),
            fruit_offsets,
            stump_size,
            chop_particle_ms: 200,
            fell_particle_ms: 300,
        }
    }
}

impl TreeConfig {
    pub fn fruit_offsets(&self, size: TreeSize) -> &[(f32, f32)] {
        self.fruit_offsets.get(&size).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn stump_size(&self, size: TreeSize) -> Vec2 {
        let (w, h) = self.stump_size.get(&size).copied().unwrap_or((48.0, 48.0));
        Vec2::new(w, h)
    }

    pub fn fruit_size(&self) -> Vec2 {
        Vec2::new(self.fruit_size.0, self.fruit_size.1)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Rolled at level start and on every day reset.
    pub rain_chance: f64,
    pub drop_size: (f32, f32),
    pub floor_size: (f32, f32),
    pub drop_lifetime_ms: (u64, u64),
    pub drop_speed: (f32, f32),
    /// Screen-space direction of falling drops, in map pixels (Y down).
    pub drop_direction: (f32, f32),
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            rain_chance: 3.0 / 11.0,
            drop_size: (16.0, 32.0),
            floor_size: (16.0, 16.0),
            drop_lifetime_ms: (400, 500),
            drop_speed: (200.0, 250.0),
            drop_direction: (-2.0, 4.0),
        }
    }
}

impl WeatherConfig {
    pub fn drop_direction(&self) -> Vec2 {
        Vec2::new(self.drop_direction.0, self.drop_direction.1)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    /// Night tint, 0..255 per channel.
    pub target: (f32, f32, f32),
    /// Colour units per second per channel.
    pub fade_rate: f32,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            target: (38.0, 101.0, 189.0),
            fade_rate: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    pub debounce_ms: u64,
    pub sale_prices: BTreeMap<Item, u32>,
    pub purchase_prices: BTreeMap<Seed, u32>,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 200,
            sale_prices: BTreeMap::from([
                (Item::Wood, 4),
                (Item::Apple, 2),
                (Item::Corn, 10),
                (Item::Tomato, 20),
            ]),
            purchase_prices: BTreeMap::from([(Seed::Corn, 4), (Seed::Tomato, 5)]),
        }
    }
}

impl ShopConfig {
    pub fn sale_price(&self, item: Item) -> u32 {
        self.sale_prices.get(&item).copied().unwrap_or(0)
    }

    pub fn purchase_price(&self, seed: Seed) -> u32 {
        self.purchase_prices.get(&seed).copied().unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: GameConfig = ron::from_str("(tile_size: 32.0, player: (speed: 150.0))")
            .expect("partial config should parse");
        assert_eq!(config.tile_size, 32.0);
        assert_eq!(config.player.speed, 150.0);
        assert_eq!(config.player.tool_use_ms, 350);
        assert_eq!(config.shop.sale_price(Item::Tomato), 20);
    }

    #[test]
    fn test_crop_max_age_is_last_frame() {
        let config = GameConfig::default();
        assert_eq!(config.crop(Seed::Corn).max_age(), 3.0);
        assert_eq!(config.crop(Seed::Tomato).grow_speed, 0.7);
    }

    #[test]
    fn test_enum_keyed_maps_parse() {
        let src = "(shop: (purchase_prices: { Corn: 1, Tomato: 2 }), \
                   trees: (stump_size: { Small: (10.0, 12.0) }))";
        let config: GameConfig = ron::from_str(src).expect("enum keys should parse");
        assert_eq!(config.shop.purchase_price(Seed::Tomato), 2);
        assert_eq!(config.trees.stump_size(TreeSize::Small), Vec2::new(10.0, 12.0));
    }
}
