//! Headless integration tests for Sproutvale.
//!
//! These tests run the full set of domain plugins on top of Bevy's
//! `MinimalPlugins`: no window, GPU or image files are needed. The level is
//! built from the shipped `assets/maps/farm.ron`, and time advances by a
//! fixed 100 ms per update.
//!
//! Run with: `cargo test --test headless`

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use sproutvale::data::DataPlugin;
use sproutvale::farming::{FarmingPlugin, SoilLayer};
use sproutvale::input::InputPlugin;
use sproutvale::level::LevelPlugin;
use sproutvale::player::{CameraOffset, PlayerController, PlayerPlugin};
use sproutvale::shared::*;
use sproutvale::ui::UiPlugin;
use sproutvale::world::ysort::draw_depth;
use sproutvale::world::{RainDrop, Sky, Tree, WorldPlugin};

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

const FRAME: Duration = Duration::from_millis(100);

/// A tilled-to-be tile inside the map's farmable area: cell (3, 6).
const FIELD_POINT: Vec2 = Vec2::new(200.0, 400.0);
const FIELD_TILE: TilePos = TilePos { col: 3, row: 6 };

/// Mirrors main.rs minus the window and renderer.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));

    // ── Game State ───────────────────────────────────────────────────────
    app.init_state::<GameState>();

    // ── Shared Resources (mirrors main.rs) ───────────────────────────────
    let config = GameConfig::default();
    app.insert_resource(Inventory::new(config.starting_money, config.starting_seeds))
        .insert_resource(config)
        .init_resource::<Weather>();

    // ── Shared Events (mirrors main.rs) ──────────────────────────────────
    app.add_event::<PlayerAction>()
        .add_event::<ItemPickupEvent>()
        .add_event::<SpawnParticleEvent>()
        .add_event::<DayResetEvent>()
        .add_event::<ToggleShopEvent>();

    app.add_plugins((
        InputPlugin,
        DataPlugin,
        LevelPlugin,
        PlayerPlugin,
        FarmingPlugin,
        WorldPlugin,
        UiPlugin,
    ));

    // Startup plus one frame, then pin the weather and let any rain from
    // the first frame run out.
    app.update();
    app.world_mut().resource_mut::<Weather>().raining = false;
    for _ in 0..7 {
        app.update();
    }
    app
}

fn act(app: &mut App, action: PlayerAction) {
    app.world_mut().send_event(action);
    app.update();
}

fn use_tool(app: &mut App, tool: ToolKind, target: Vec2) {
    act(app, PlayerAction::UseTool { tool, target });
}

fn new_day(app: &mut App) {
    app.world_mut().send_event(DayResetEvent);
    app.update();
}

fn player_entity(app: &mut App) -> Entity {
    app.world_mut()
        .query_filtered::<Entity, With<Player>>()
        .single(app.world())
}

fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

// ─────────────────────────────────────────────────────────────────────────────
// Level
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_level_builds_from_shipped_map() {
    let mut app = build_test_app();

    let world = app.world().resource::<WorldBounds>();
    assert_eq!(world.size, Vec2::new(20.0 * 64.0, 14.0 * 64.0));

    let soil = app.world().resource::<SoilLayer>();
    assert!(soil.grid().get(FIELD_TILE).is_some_and(|c| c.is_farmable()));
    assert!(!soil.grid().get(TilePos::new(0, 0)).is_some_and(|c| c.is_farmable()));

    let trees = app.world_mut().query::<&Tree>().iter(app.world()).count();
    assert_eq!(trees, 2);
    let zones = app
        .world_mut()
        .query::<&InteractionZone>()
        .iter(app.world())
        .count();
    assert_eq!(zones, 2);

    let player = player_entity(&mut app);
    let controller = app.world().get::<PlayerController>(player).unwrap();
    assert_eq!(controller.pos, Vec2::new(700.0, 520.0));
}

#[test]
fn test_world_transforms_follow_layer_and_y() {
    let mut app = build_test_app();
    let player = player_entity(&mut app);
    let bounds = app.world().get::<Bounds>(player).unwrap().0;
    let translation = app.world().get::<Transform>(player).unwrap().translation;

    assert_eq!(translation.x, bounds.center().x);
    assert_eq!(translation.y, -bounds.center().y, "map space is Y-down");
    assert_eq!(translation.z, draw_depth(Layer::Main, bounds.center().y));

    // Water is the bottom layer, whatever its row.
    let water_z = app
        .world_mut()
        .query_filtered::<&Transform, With<sproutvale::world::WaterAnimation>>()
        .iter(app.world())
        .map(|t| t.translation.z)
        .fold(f32::MIN, f32::max);
    assert!(water_z < translation.z);
}

#[test]
fn test_camera_offset_is_player_centre_minus_half_screen() {
    let mut app = build_test_app();
    let player = player_entity(&mut app);
    let center = app.world().get::<Bounds>(player).unwrap().0.center();
    let screen = app.world().resource::<GameConfig>().screen();

    let offset = app.world().resource::<CameraOffset>().0;
    assert_eq!(offset, center - screen / 2.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Farming
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_till_water_plant_and_grow() {
    let mut app = build_test_app();

    use_tool(&mut app, ToolKind::Hoe, FIELD_POINT);
    use_tool(&mut app, ToolKind::Water, FIELD_POINT);
    act(
        &mut app,
        PlayerAction::PlantSeed {
            seed: Seed::Corn,
            target: FIELD_POINT,
        },
    );

    let soil = app.world().resource::<SoilLayer>();
    assert!(soil.soil_tiles().contains_key(&FIELD_TILE));
    assert!(soil.water_tiles().contains_key(&FIELD_TILE));
    assert_eq!(soil.plants()[&FIELD_TILE].age, 0.0);
    assert_eq!(app.world().resource::<Inventory>().seed_count(Seed::Corn), 4);

    new_day(&mut app);
    let soil = app.world().resource::<SoilLayer>();
    assert_eq!(soil.plants()[&FIELD_TILE].age, 1.0);

    // A dry day leaves the crop as it was (unless the new day brought rain).
    let raining = app.world().resource::<Weather>().raining;
    new_day(&mut app);
    let age = app.world().resource::<SoilLayer>().plants()[&FIELD_TILE].age;
    assert_eq!(age, if raining { 2.0 } else { 1.0 });
}

#[test]
fn test_untilled_ground_cannot_be_planted() {
    let mut app = build_test_app();
    act(
        &mut app,
        PlayerAction::PlantSeed {
            seed: Seed::Tomato,
            target: FIELD_POINT,
        },
    );
    assert!(app.world().resource::<SoilLayer>().plants().is_empty());
    assert_eq!(app.world().resource::<Inventory>().seed_count(Seed::Tomato), 5);
}

#[test]
fn test_walking_into_ripe_crop_harvests_it() {
    let mut app = build_test_app();
    use_tool(&mut app, ToolKind::Hoe, FIELD_POINT);
    act(
        &mut app,
        PlayerAction::PlantSeed {
            seed: Seed::Corn,
            target: FIELD_POINT,
        },
    );
    for _ in 0..3 {
        use_tool(&mut app, ToolKind::Water, FIELD_POINT);
        new_day(&mut app);
    }
    assert!(app.world().resource::<SoilLayer>().plants()[&FIELD_TILE].harvestable);

    // Step onto the crop, just below its tile.
    let player = player_entity(&mut app);
    app.world_mut()
        .get_mut::<PlayerController>(player)
        .unwrap()
        .pos = Vec2::new(224.0, 460.0);
    app.update();
    app.update();

    assert!(app.world().resource::<SoilLayer>().plants().is_empty());
    assert_eq!(app.world().resource::<Inventory>().item_count(Item::Corn), 1);
    let soil = app.world().resource::<SoilLayer>();
    assert!(
        soil.grid().get(FIELD_TILE).is_some_and(|c| c.is_tilled() && !c.is_planted()),
        "the soil stays tilled for replanting"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Trees
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_five_axe_hits_leave_a_stump_and_wood() {
    let mut app = build_test_app();
    let trunk = Vec2::new(688.0, 160.0);
    for _ in 0..5 {
        use_tool(&mut app, ToolKind::Axe, trunk);
    }
    app.update();

    let (tree, bounds) = app
        .world_mut()
        .query::<(&Tree, &Bounds)>()
        .iter(app.world())
        .find(|(t, _)| t.size == TreeSize::Small)
        .map(|(t, b)| (t.clone(), b.0))
        .unwrap();
    assert!(!tree.alive);
    assert!(tree.fruit.is_empty());
    assert_eq!(bounds.size(), Vec2::new(48.0, 48.0));
    assert_eq!(app.world().resource::<Inventory>().item_count(Item::Wood), 1);

    // Further hits do nothing.
    use_tool(&mut app, ToolKind::Axe, bounds.center());
    app.update();
    assert_eq!(app.world().resource::<Inventory>().item_count(Item::Wood), 1);
}

#[test]
fn test_wood_is_credited_when_the_shop_opens_on_the_felling_frame() {
    let mut app = build_test_app();
    let trunk = Vec2::new(688.0, 160.0);
    for _ in 0..4 {
        use_tool(&mut app, ToolKind::Axe, trunk);
    }
    app.world_mut().send_event(ToggleShopEvent);
    use_tool(&mut app, ToolKind::Axe, trunk);
    for _ in 0..5 {
        app.update();
    }

    assert_eq!(state(&app), GameState::Shop);
    let felled = app
        .world_mut()
        .query::<&Tree>()
        .iter(app.world())
        .any(|t| t.size == TreeSize::Small && !t.alive);
    assert!(felled);
    assert_eq!(app.world().resource::<Inventory>().item_count(Item::Wood), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Shop & day transition
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_shop_opens_pauses_world_and_closes() {
    let mut app = build_test_app();
    app.world_mut().send_event(ToggleShopEvent);
    app.update();
    app.update();
    assert_eq!(state(&app), GameState::Shop);

    // Rain never falls inside the shop.
    app.world_mut().resource_mut::<Weather>().raining = true;
    for _ in 0..5 {
        app.update();
    }
    let drops = app.world_mut().query::<&RainDrop>().iter(app.world()).count();
    assert_eq!(drops, 0);

    app.world_mut().resource_mut::<PlayerInput>().cancel = true;
    app.update();
    app.world_mut().resource_mut::<PlayerInput>().cancel = false;
    app.update();
    app.update();
    assert_eq!(state(&app), GameState::Playing);

    app.update();
    let drops = app.world_mut().query::<&RainDrop>().iter(app.world()).count();
    assert!(drops > 0, "rain resumes once the shop closes");
}

#[test]
fn test_sleeping_resets_the_day_and_wakes_up() {
    let mut app = build_test_app();
    use_tool(&mut app, ToolKind::Hoe, FIELD_POINT);
    use_tool(&mut app, ToolKind::Water, FIELD_POINT);
    {
        let mut sky = app.world_mut().resource_mut::<Sky>();
        let night = sky.target;
        sky.color = night;
    }

    let player = player_entity(&mut app);
    app.world_mut().get_mut::<Player>(player).unwrap().sleeping = true;

    // 255 levels down and back up at 120/s is a little over 4 s.
    for _ in 0..50 {
        app.update();
    }

    assert!(!app.world().get::<Player>(player).unwrap().sleeping);
    let sky = app.world().resource::<Sky>();
    assert!(sky.color.x > 240.0, "the sky brightened at the day reset");
    let soil = app.world().resource::<SoilLayer>();
    let raining = app.world().resource::<Weather>().raining;
    assert_eq!(soil.water_tiles().contains_key(&FIELD_TILE), raining);
}
