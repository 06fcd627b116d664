//! Soil layer: the farm grid plus the tiles and plants living on it.
//!
//! Pure state. Sprites are reconciled from it in `render`.

use bevy::prelude::*;
use rand::Rng;
use std::collections::BTreeMap;

use crate::data::MapSource;
use crate::shared::*;

use super::crops::Plant;
use super::grid::{SoilGrid, SoilVariant};

/// Map layer whose tiles mark farmable cells.
pub const FARMABLE_LAYER: &str = "Farmable";

#[derive(Resource, Debug, Clone, Default)]
pub struct SoilLayer {
    tile_size: f32,
    grid: SoilGrid,
    /// Tilled tile → autotile variant.
    soil_tiles: BTreeMap<TilePos, SoilVariant>,
    /// Watered tile → random overlay variant.
    water_tiles: BTreeMap<TilePos, u32>,
    plants: BTreeMap<TilePos, Plant>,
}

impl SoilLayer {
    pub fn new(grid: SoilGrid, tile_size: f32) -> Self {
        Self {
            tile_size,
            grid,
            ..default()
        }
    }

    pub fn from_map(map: &impl MapSource, tile_size: f32) -> Self {
        let (cols, rows) = map.size_in_tiles();
        let mut grid = SoilGrid::new(cols, rows);
        for tile in map.tiles(FARMABLE_LAYER) {
            grid.mark_farmable(TilePos::new(tile.col, tile.row));
        }
        Self::new(grid, tile_size)
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn grid(&self) -> &SoilGrid {
        &self.grid
    }

    pub fn soil_tiles(&self) -> &BTreeMap<TilePos, SoilVariant> {
        &self.soil_tiles
    }

    pub fn water_tiles(&self) -> &BTreeMap<TilePos, u32> {
        &self.water_tiles
    }

    pub fn plants(&self) -> &BTreeMap<TilePos, Plant> {
        &self.plants
    }

    /// Till the farmable tile under `point`. While it rains the new soil is
    /// watered straight away.
    pub fn till(&mut self, point: Vec2, raining: bool, rng: &mut impl Rng) -> bool {
        let Some(pos) = self.grid.tile_at(point, self.tile_size) else {
            return false;
        };
        let tilled = self.grid.get_mut(pos).is_some_and(|cell| cell.till());
        if !tilled {
            return false;
        }
        self.create_soil_tiles();
        if raining {
            self.water_tile(pos, rng);
        }
        true
    }

    /// Rebuild every soil tile from the grid so neighbours re-autotile.
    pub fn create_soil_tiles(&mut self) {
        self.soil_tiles = self
            .grid
            .iter()
            .filter(|(_, cell)| cell.is_tilled())
            .map(|(pos, _)| (pos, SoilVariant::from_neighbors(self.grid.tilled_neighbors(pos))))
            .collect();
    }

    /// Water the soil tile under `point`.
    pub fn water(&mut self, point: Vec2, rng: &mut impl Rng) -> bool {
        match self.grid.tile_at(point, self.tile_size) {
            Some(pos) if self.soil_tiles.contains_key(&pos) => self.water_tile(pos, rng),
            _ => false,
        }
    }

    fn water_tile(&mut self, pos: TilePos, rng: &mut impl Rng) -> bool {
        let watered = self.grid.get_mut(pos).is_some_and(|cell| cell.water());
        if watered {
            self.water_tiles.insert(pos, rng.gen());
        }
        watered
    }

    pub fn water_all(&mut self, rng: &mut impl Rng) {
        let tilled: Vec<TilePos> = self.soil_tiles.keys().copied().collect();
        for pos in tilled {
            self.water_tile(pos, rng);
        }
    }

    pub fn remove_water(&mut self) {
        self.water_tiles.clear();
        for cell in self.grid.cells_mut() {
            cell.dry();
        }
    }

    pub fn is_watered(&self, point: Vec2) -> bool {
        self.grid
            .tile_at(point, self.tile_size)
            .and_then(|pos| self.grid.get(pos))
            .is_some_and(|cell| cell.is_watered())
    }

    /// Plant on the tilled, unplanted tile under `point`.
    pub fn plant_seed(&mut self, point: Vec2, seed: Seed, spec: &CropSpec) -> bool {
        let Some(pos) = self.grid.tile_at(point, self.tile_size) else {
            return false;
        };
        if !self.soil_tiles.contains_key(&pos) {
            return false;
        }
        let planted = self.grid.get_mut(pos).is_some_and(|cell| cell.plant());
        if planted {
            let plant = Plant::new(seed, pos, pos.rect(self.tile_size), spec);
            self.plants.insert(pos, plant);
        }
        planted
    }

    /// Grow every plant by its own speed if its tile is watered.
    pub fn update_plants(&mut self) {
        for (pos, plant) in self.plants.iter_mut() {
            let watered = self.grid.get(*pos).is_some_and(|cell| cell.is_watered());
            plant.grow(watered);
        }
    }

    /// Remove a ripe plant. Unripe plants stay.
    pub fn harvest(&mut self, pos: TilePos) -> Option<Plant> {
        if !self.plants.get(&pos).is_some_and(|p| p.harvestable) {
            return None;
        }
        if let Some(cell) = self.grid.get_mut(pos) {
            cell.clear_plant();
        }
        self.plants.remove(&pos)
    }
}
