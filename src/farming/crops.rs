//! Plant growth.

use bevy::prelude::*;
use crate::shared::*;

/// Horizontal shrink of a grown plant's hitbox, in pixels.
const HITBOX_SHRINK_X: f32 = 26.0;
/// Vertical shrink of a grown plant's hitbox, as a share of its height.
const HITBOX_SHRINK_Y: f32 = 0.4;

/// A crop growing on one soil tile.
///
/// The sprite stands on the soil tile's bottom edge, shifted by the
/// species' `y_offset`. Seedlings sit on the `GroundPlant` layer and do not
/// block; from age 1 on a plant moves to `Main` and gets a hitbox.
#[derive(Debug, Clone, PartialEq)]
pub struct Plant {
    pub seed: Seed,
    pub tile: TilePos,
    pub age: f32,
    pub max_age: f32,
    pub grow_speed: f32,
    pub harvestable: bool,
    pub layer: Layer,
    pub bounds: PixelRect,
    pub hitbox: Option<PixelRect>,
    soil_rect: PixelRect,
    y_offset: f32,
    frame_size: Vec2,
}

impl Plant {
    pub fn new(seed: Seed, tile: TilePos, soil_rect: PixelRect, spec: &CropSpec) -> Self {
        let mut plant = Self {
            seed,
            tile,
            age: 0.0,
            max_age: spec.max_age(),
            grow_speed: spec.grow_speed,
            harvestable: false,
            layer: Layer::GroundPlant,
            bounds: PixelRect::default(),
            hitbox: None,
            soil_rect,
            y_offset: spec.y_offset,
            frame_size: spec.frame_size(),
        };
        if plant.max_age <= 0.0 {
            plant.harvestable = true;
        }
        plant.refresh_rects();
        plant
    }

    /// Growth frame to display; always a valid index into the species' frames.
    pub fn frame(&self) -> usize {
        self.age.max(0.0).floor() as usize
    }

    /// Advance one day. Dry soil and fully grown plants are left alone.
    pub fn grow(&mut self, watered: bool) {
        if !watered || self.age >= self.max_age {
            return;
        }
        self.age += self.grow_speed;
        if self.age >= self.max_age {
            self.age = self.max_age;
            self.harvestable = true;
        }
        self.refresh_rects();
    }

    fn refresh_rects(&mut self) {
        let anchor = self.soil_rect.midbottom() + Vec2::new(0.0, self.y_offset);
        self.bounds = PixelRect::from_midbottom(anchor, self.frame_size);
        if self.frame() > 0 {
            self.layer = Layer::Main;
            self.hitbox = Some(
                self.bounds
                    .inflate(-HITBOX_SHRINK_X, -self.bounds.h * HITBOX_SHRINK_Y),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corn() -> Plant {
        let spec = GameConfig::default().crop(Seed::Corn);
        Plant::new(
            Seed::Corn,
            TilePos::new(2, 3),
            TilePos::new(2, 3).rect(64.0),
            &spec,
        )
    }

    #[test]
    fn test_dry_plant_never_grows() {
        let mut plant = corn();
        for _ in 0..1000 {
            plant.grow(false);
        }
        assert_eq!(plant.age, 0.0);
        assert!(!plant.harvestable);
    }

    #[test]
    fn test_growth_clamps_and_becomes_harvestable() {
        let mut plant = corn();
        plant.grow(true);
        plant.grow(true);
        assert!(!plant.harvestable);
        plant.grow(true);
        assert_eq!(plant.age, plant.max_age);
        assert!(plant.harvestable);
        plant.grow(true);
        assert_eq!(plant.age, plant.max_age, "fully grown plants stay put");
    }

    #[test]
    fn test_seedling_has_no_hitbox_until_age_one() {
        let mut plant = corn();
        assert_eq!(plant.layer, Layer::GroundPlant);
        assert!(plant.hitbox.is_none());

        plant.grow(true);
        assert_eq!(plant.layer, Layer::Main);
        let hitbox = plant.hitbox.expect("grown plants block movement");
        assert_eq!(hitbox.center(), plant.bounds.center());
        assert!(hitbox.w < plant.bounds.w && hitbox.h < plant.bounds.h);
    }

    #[test]
    fn test_fractional_growth_keeps_frame_in_range() {
        let spec = GameConfig::default().crop(Seed::Tomato);
        let tile = TilePos::new(0, 0);
        let mut plant = Plant::new(Seed::Tomato, tile, tile.rect(64.0), &spec);
        plant.grow(true);
        assert_eq!(plant.frame(), 0, "0.7 days in, still the first frame");
        assert_eq!(plant.layer, Layer::GroundPlant);
        for _ in 0..10 {
            plant.grow(true);
            assert!(plant.frame() < spec.frames);
        }
        assert!(plant.harvestable);
    }

    #[test]
    fn test_sprite_stands_on_soil_with_offset() {
        let plant = corn();
        let soil = TilePos::new(2, 3).rect(64.0);
        assert_eq!(plant.bounds.bottom(), soil.bottom() - 16.0);
        assert_eq!(plant.bounds.center().x, soil.center().x);
    }
}
