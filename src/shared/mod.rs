//! Shared components, resources, events, and states for Sproutvale.
//!
//! This is the type contract. Every domain plugin imports from here.
//! Domains talk to each other only through these types; the `level`
//! orchestrator is the one module that reaches into farming, world and
//! player state directly.
//!
//! World coordinates are pixels with the origin at the top-left of the map
//! and Y growing downwards (the orientation of the map data). Conversion to
//! Bevy's Y-up translation happens in exactly one place, `world::ysort`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

mod config;

pub use config::*;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Playing,
    /// Shop menu open. World entities are frozen; only the menu updates.
    Shop,
}

// ═══════════════════════════════════════════════════════════════════════
// DRAW LAYERS
// ═══════════════════════════════════════════════════════════════════════

/// Discrete draw-order bucket. Declaration order is draw order: an entity in
/// a later bucket always draws over one in an earlier bucket.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Water,
    Ground,
    Soil,
    SoilWater,
    RainFloor,
    HouseBottom,
    GroundPlant,
    Main,
    HouseTop,
    Fruit,
    RainDrops,
}

impl Layer {
    pub fn index(self) -> usize {
        self as usize
    }
}

// ═══════════════════════════════════════════════════════════════════════
// GEOMETRY
// ═══════════════════════════════════════════════════════════════════════

/// Axis-aligned rectangle in world pixels (top-left origin, Y down).
///
/// Edge semantics follow the usual sprite-rect conventions: `contains_point`
/// is inclusive on the left/top edge and exclusive on the right/bottom, and
/// two rects that merely touch do not intersect.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_topleft(topleft: Vec2, size: Vec2) -> Self {
        Self::new(topleft.x, topleft.y, size.x, size.y)
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
    }

    pub fn from_midbottom(midbottom: Vec2, size: Vec2) -> Self {
        Self::new(midbottom.x - size.x / 2.0, midbottom.y - size.y, size.x, size.y)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn topleft(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn midbottom(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.bottom())
    }

    pub fn set_center_x(&mut self, cx: f32) {
        self.x = cx - self.w / 2.0;
    }

    pub fn set_center_y(&mut self, cy: f32) {
        self.y = cy - self.h / 2.0;
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    /// Grow (positive) or shrink (negative) around the same centre.
    pub fn inflate(&self, dw: f32, dh: f32) -> Self {
        let size = Vec2::new((self.w + dw).max(0.0), (self.h + dh).max(0.0));
        Self::from_center(self.center(), size)
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    pub fn intersects(&self, other: &PixelRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Visual bounds of a world entity. Drives the sprite position and size and
/// the Y-sort key.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Bounds(pub PixelRect);

/// Shrunk gameplay rect used for collision, independent of the visual bounds.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Hitbox(pub PixelRect);

/// Entities whose `Hitbox` blocks player movement.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Obstacle;

/// Tile address in the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePos {
    pub col: usize,
    pub row: usize,
}

impl TilePos {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    pub fn rect(&self, tile_size: f32) -> PixelRect {
        PixelRect::new(
            self.col as f32 * tile_size,
            self.row as f32 * tile_size,
            tile_size,
            tile_size,
        )
    }
}

/// Pixel size of the whole map. Rain spawns anywhere inside it.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct WorldBounds {
    pub size: Vec2,
}

// ═══════════════════════════════════════════════════════════════════════
// TIMER
// ═══════════════════════════════════════════════════════════════════════

/// Single-shot delay primitive for cooldowns (tool swings, menu debounce).
///
/// Time is passed in explicitly as the elapsed app time. `update` reports
/// completion by returning `true` exactly once per activation; the owner then
/// performs whatever the timer was guarding.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionTimer {
    duration: Duration,
    started_at: Duration,
    active: bool,
}

impl ActionTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            started_at: Duration::ZERO,
            active: false,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start (or restart) the window at `now`.
    pub fn activate(&mut self, now: Duration) {
        self.active = true;
        self.started_at = now;
    }

    /// Stop without reporting completion.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.started_at = Duration::ZERO;
    }

    pub fn update(&mut self, now: Duration) -> bool {
        if !self.active {
            return false;
        }
        if now.saturating_sub(self.started_at) >= self.duration {
            self.deactivate();
            return true;
        }
        false
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER-FACING ENUMS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    pub fn key(self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Hoe,
    Axe,
    Water,
}

impl ToolKind {
    pub fn key(self) -> &'static str {
        match self {
            ToolKind::Hoe => "hoe",
            ToolKind::Axe => "axe",
            ToolKind::Water => "water",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ToolKind::Hoe => ToolKind::Axe,
            ToolKind::Axe => ToolKind::Water,
            ToolKind::Water => ToolKind::Hoe,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Seed {
    #[default]
    Corn,
    Tomato,
}

impl Seed {
    pub const ALL: [Seed; 2] = [Seed::Corn, Seed::Tomato];

    pub fn key(self) -> &'static str {
        match self {
            Seed::Corn => "corn",
            Seed::Tomato => "tomato",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Seed::Corn => Seed::Tomato,
            Seed::Tomato => Seed::Corn,
        }
    }

    /// Item credited when a ripe plant of this species is harvested.
    pub fn crop(self) -> Item {
        match self {
            Seed::Corn => Item::Corn,
            Seed::Tomato => Item::Tomato,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Item {
    Wood,
    Apple,
    Corn,
    Tomato,
}

impl Item {
    pub const ALL: [Item; 4] = [Item::Wood, Item::Apple, Item::Corn, Item::Tomato];

    pub fn key(self) -> &'static str {
        match self {
            Item::Wood => "wood",
            Item::Apple => "apple",
            Item::Corn => "corn",
            Item::Tomato => "tomato",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum TreeSize {
    #[default]
    Small,
    Large,
}

impl TreeSize {
    /// Map object name → size. Anything but "Large" is a small tree.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("large") {
            TreeSize::Large
        } else {
            TreeSize::Small
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            TreeSize::Small => "small",
            TreeSize::Large => "large",
        }
    }
}

/// The player entity, as other domains see it. Movement and tool state
/// live on the player domain's own controller component.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player {
    /// Set by the bed; cleared once the day transition fades back in.
    pub sleeping: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneKind {
    Bed,
    Trader,
}

/// Invisible rect the player can interact with (Enter).
#[derive(Component, Debug, Clone, Copy)]
pub struct InteractionZone {
    pub kind: ZoneKind,
}

// ═══════════════════════════════════════════════════════════════════════
// INVENTORY
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Inventory {
    pub items: BTreeMap<Item, u32>,
    pub seeds: BTreeMap<Seed, u32>,
    pub money: u32,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(200, 5)
    }
}

impl Inventory {
    pub fn new(money: u32, seeds_each: u32) -> Self {
        Self {
            items: Item::ALL.iter().map(|i| (*i, 0)).collect(),
            seeds: Seed::ALL.iter().map(|s| (*s, seeds_each)).collect(),
            money,
        }
    }

    pub fn add_item(&mut self, item: Item, quantity: u32) {
        *self.items.entry(item).or_insert(0) += quantity;
    }

    pub fn item_count(&self, item: Item) -> u32 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    pub fn seed_count(&self, seed: Seed) -> u32 {
        self.seeds.get(&seed).copied().unwrap_or(0)
    }

    /// Remove one seed. Returns false when none are left.
    pub fn take_seed(&mut self, seed: Seed) -> bool {
        match self.seeds.get_mut(&seed) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Sell one unit of `item`. Returns false when none are owned.
    pub fn sell(&mut self, item: Item, price: u32) -> bool {
        match self.items.get_mut(&item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                self.money += price;
                true
            }
            _ => false,
        }
    }

    /// Buy one seed. Returns false when the player cannot afford it.
    pub fn buy_seed(&mut self, seed: Seed, price: u32) -> bool {
        if self.money < price {
            return false;
        }
        self.money -= price;
        *self.seeds.entry(seed).or_insert(0) += 1;
        true
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT: logical keys, filled once per frame by the input domain
// ═══════════════════════════════════════════════════════════════════════

/// Held-state for movement and actions (timers debounce them), edge-state
/// for toggles.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub use_tool: bool,
    pub switch_tool: bool,
    pub use_seed: bool,
    pub switch_seed: bool,
    /// Just pressed this frame.
    pub interact: bool,
    /// Just pressed this frame.
    pub cancel: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// ASSETS
// ═══════════════════════════════════════════════════════════════════════

/// Image handles shared by every domain. Populated once at startup by the
/// data domain; lookups fall back to the default handle when art is missing.
#[derive(Resource, Debug, Clone, Default)]
pub struct GameAssets {
    /// Autotile code (`"o"`, `"lr"`, ...) → tilled soil image.
    pub soil: HashMap<String, Handle<Image>>,
    pub soil_water: Vec<Handle<Image>>,
    pub water: Vec<Handle<Image>>,
    pub plants: HashMap<Seed, Vec<Handle<Image>>>,
    /// Status key (`"up"`, `"left_idle"`, `"down_axe"`, ...) → frames.
    pub player: HashMap<String, Vec<Handle<Image>>>,
    pub rain_drops: Vec<Handle<Image>>,
    pub rain_floor: Vec<Handle<Image>>,
    pub apple: Handle<Image>,
    pub stumps: HashMap<TreeSize, Handle<Image>>,
}

impl GameAssets {
    pub fn soil_image(&self, code: &str) -> Handle<Image> {
        self.soil.get(code).cloned().unwrap_or_default()
    }

    pub fn plant_frame(&self, seed: Seed, frame: usize) -> Handle<Image> {
        self.plants
            .get(&seed)
            .and_then(|frames| frames.get(frame))
            .cloned()
            .unwrap_or_default()
    }

    pub fn player_frames(&self, status_key: &str) -> &[Handle<Image>] {
        self.player.get(status_key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn stump(&self, size: TreeSize) -> Handle<Image> {
        self.stumps.get(&size).cloned().unwrap_or_default()
    }
}

/// Pick `variant % len` from a frame list.
pub fn pick_variant(frames: &[Handle<Image>], variant: u32) -> Handle<Image> {
    if frames.is_empty() {
        return Handle::default();
    }
    frames[variant as usize % frames.len()].clone()
}

// ═══════════════════════════════════════════════════════════════════════
// WEATHER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Weather {
    pub raining: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS: cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// World effect requested by the player once an action timer completes.
/// The farming and world domains decide what the target point hits.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PlayerAction {
    UseTool { tool: ToolKind, target: Vec2 },
    PlantSeed { seed: Seed, target: Vec2 },
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemPickupEvent {
    pub item: Item,
    pub quantity: u32,
}

/// Request a short-lived white silhouette of `image` covering `bounds`.
#[derive(Event, Debug, Clone)]
pub struct SpawnParticleEvent {
    pub image: Handle<Image>,
    pub bounds: PixelRect,
    pub layer: Layer,
    pub duration: Duration,
}

/// Fired at the darkest point of the sleep transition.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct DayResetEvent;

/// Player touched the trader, or pressed cancel inside the shop.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ToggleShopEvent;

// ═══════════════════════════════════════════════════════════════════════
// SYSTEM ORDERING
// ═══════════════════════════════════════════════════════════════════════

/// Per-frame phases, chained in this order inside `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Input,
    Timers,
    Movement,
    Effects,
    Weather,
    /// Day transition and the day reset it triggers.
    Overlay,
    /// Sprite entities rebuilt from domain state.
    Reconcile,
    /// Transforms, camera and tint derived from `Bounds`/`Layer`.
    Sync,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_once_per_activation() {
        let mut timer = ActionTimer::from_millis(350);
        timer.activate(Duration::from_millis(1000));

        assert!(!timer.update(Duration::from_millis(1200)));
        assert!(timer.is_active());
        assert!(timer.update(Duration::from_millis(1350)));
        assert!(!timer.is_active());
        assert!(!timer.update(Duration::from_millis(5000)), "second fire without reactivation");
    }

    #[test]
    fn test_timer_never_activated_is_inert() {
        let mut timer = ActionTimer::from_millis(0);
        for ms in [0, 10, 10_000] {
            assert!(!timer.update(Duration::from_millis(ms)));
        }
    }

    #[test]
    fn test_timer_reactivation_restarts_window() {
        let mut timer = ActionTimer::from_millis(200);
        timer.activate(Duration::from_millis(0));
        timer.activate(Duration::from_millis(150));
        assert!(!timer.update(Duration::from_millis(250)));
        assert!(timer.update(Duration::from_millis(350)));
    }

    #[test]
    fn test_timer_deactivate_suppresses_completion() {
        let mut timer = ActionTimer::from_millis(100);
        timer.activate(Duration::ZERO);
        timer.deactivate();
        assert!(!timer.update(Duration::from_millis(500)));
    }

    #[test]
    fn test_rect_edges_follow_sprite_conventions() {
        let rect = PixelRect::new(0.0, 0.0, 64.0, 64.0);
        assert!(rect.contains_point(Vec2::new(0.0, 0.0)));
        assert!(!rect.contains_point(Vec2::new(64.0, 10.0)));

        let touching = PixelRect::new(64.0, 0.0, 64.0, 64.0);
        assert!(!rect.intersects(&touching));
        let overlapping = PixelRect::new(63.0, 63.0, 10.0, 10.0);
        assert!(rect.intersects(&overlapping));
    }

    #[test]
    fn test_rect_inflate_keeps_center() {
        let rect = PixelRect::new(10.0, 20.0, 100.0, 40.0);
        let shrunk = rect.inflate(-20.0, -30.0);
        assert_eq!(shrunk.center(), rect.center());
        assert_eq!(shrunk.size(), Vec2::new(80.0, 10.0));
    }

    #[test]
    fn test_inventory_transactions() {
        let mut inv = Inventory::new(10, 0);
        assert!(!inv.sell(Item::Wood, 4));
        inv.add_item(Item::Wood, 2);
        assert!(inv.sell(Item::Wood, 4));
        assert_eq!(inv.money, 14);
        assert_eq!(inv.item_count(Item::Wood), 1);

        assert!(inv.buy_seed(Seed::Tomato, 5));
        assert!(inv.buy_seed(Seed::Tomato, 5));
        assert!(!inv.buy_seed(Seed::Tomato, 5));
        assert_eq!(inv.seed_count(Seed::Tomato), 2);
        assert_eq!(inv.money, 4);
    }
}
