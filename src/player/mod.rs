//! Player domain: input to movement, tool and seed timers, animation,
//! interaction zones and the follow camera.

mod animation;
pub mod camera;
mod interaction;
mod movement;
mod spawn;
mod tools;

use bevy::prelude::*;
use std::time::Duration;

use crate::shared::*;

pub use camera::CameraOffset;
pub use spawn::spawn_player;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraOffset>();

        app.add_systems(
            Update,
            (movement::player_input, interaction::interact_with_zones)
                .chain()
                .in_set(FrameSet::Input),
        );
        app.add_systems(Update, tools::update_player_timers.in_set(FrameSet::Timers));
        app.add_systems(Update, movement::player_movement.in_set(FrameSet::Movement));
        app.add_systems(Update, animation::animate_player.in_set(FrameSet::Effects));
        // Every state: a credit sent as the shop opens must not expire unread.
        app.add_systems(Update, interaction::collect_item_pickups.in_set(FrameSet::Reconcile));
        app.add_systems(Update, camera::camera_follow_player.in_set(FrameSet::Sync));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Player state machine
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pose {
    #[default]
    Idle,
    Walk,
    Tool,
}

/// Facing plus pose. Together with the selected tool this names the
/// animation to play (`"left"`, `"up_idle"`, `"down_hoe"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerStatus {
    pub facing: Facing,
    pub pose: Pose,
}

impl PlayerStatus {
    pub fn animation_key(&self, tool: ToolKind) -> String {
        match self.pose {
            Pose::Walk => self.facing.key().to_string(),
            Pose::Idle => format!("{}_idle", self.facing.key()),
            Pose::Tool => format!("{}_{}", self.facing.key(), tool.key()),
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct PlayerController {
    pub status: PlayerStatus,
    /// Raw input direction; normalized before moving.
    pub direction: Vec2,
    /// Hitbox centre with sub-pixel precision.
    pub pos: Vec2,
    pub speed: f32,
    pub frame_index: f32,
    pub selected_tool: ToolKind,
    pub selected_seed: Seed,
    pub tool_use: ActionTimer,
    pub tool_switch: ActionTimer,
    pub seed_use: ActionTimer,
    pub seed_switch: ActionTimer,
}

impl PlayerController {
    pub fn new(pos: Vec2, config: &PlayerConfig) -> Self {
        Self {
            status: PlayerStatus::default(),
            direction: Vec2::ZERO,
            pos,
            speed: config.speed,
            frame_index: 0.0,
            selected_tool: ToolKind::Hoe,
            selected_seed: Seed::Corn,
            tool_use: ActionTimer::from_millis(config.tool_use_ms),
            tool_switch: ActionTimer::from_millis(config.tool_switch_ms),
            seed_use: ActionTimer::from_millis(config.seed_use_ms),
            seed_switch: ActionTimer::from_millis(config.seed_switch_ms),
        }
    }

    /// Read one frame of input. Ignored while a tool swing is in progress
    /// or while asleep.
    pub fn apply_input(&mut self, input: &PlayerInput, now: Duration, sleeping: bool) {
        if self.tool_use.is_active() || sleeping {
            return;
        }

        if input.up {
            self.direction.y = -1.0;
            self.status.facing = Facing::Up;
        } else if input.down {
            self.direction.y = 1.0;
            self.status.facing = Facing::Down;
        } else {
            self.direction.y = 0.0;
        }

        if input.right {
            self.direction.x = 1.0;
            self.status.facing = Facing::Right;
        } else if input.left {
            self.direction.x = -1.0;
            self.status.facing = Facing::Left;
        } else {
            self.direction.x = 0.0;
        }

        if input.use_tool {
            self.tool_use.activate(now);
            self.direction = Vec2::ZERO;
            self.frame_index = 0.0;
        }

        if input.switch_tool && !self.tool_switch.is_active() {
            self.tool_switch.activate(now);
            self.selected_tool = self.selected_tool.next();
        }

        if input.use_seed && !self.seed_use.is_active() {
            self.seed_use.activate(now);
            self.direction = Vec2::ZERO;
            self.frame_index = 0.0;
        }

        if input.switch_seed && !self.seed_switch.is_active() {
            self.seed_switch.activate(now);
            self.selected_seed = self.selected_seed.next();
        }
    }

    /// Idle when not moving; tool pose overrides while the swing runs.
    pub fn resolve_status(&mut self) {
        self.status.pose = if self.direction == Vec2::ZERO {
            Pose::Idle
        } else {
            Pose::Walk
        };
        if self.tool_use.is_active() {
            self.status.pose = Pose::Tool;
        }
    }

    pub fn target_point(&self, config: &PlayerConfig) -> Vec2 {
        self.pos + config.tool_offset(self.status.facing)
    }

    /// Advance every timer; completed swings turn into world actions.
    pub fn tick_timers(&mut self, now: Duration, target: Vec2) -> Vec<PlayerAction> {
        let mut actions = Vec::new();
        if self.tool_use.update(now) {
            actions.push(PlayerAction::UseTool {
                tool: self.selected_tool,
                target,
            });
        }
        if self.seed_use.update(now) {
            actions.push(PlayerAction::PlantSeed {
                seed: self.selected_seed,
                target,
            });
        }
        self.tool_switch.update(now);
        self.seed_switch.update(now);
        actions
    }

    /// Move one axis at a time so the player slides along obstacles.
    pub fn move_and_collide(
        &mut self,
        dt: f32,
        bounds: &mut PixelRect,
        hitbox: &mut PixelRect,
        obstacles: &[PixelRect],
    ) {
        if self.direction != Vec2::ZERO {
            self.direction = self.direction.normalize();
        }

        self.pos.x += self.direction.x * self.speed * dt;
        hitbox.set_center_x(self.pos.x.round());
        bounds.set_center_x(hitbox.center().x);
        self.collide(Axis::Horizontal, bounds, hitbox, obstacles);

        self.pos.y += self.direction.y * self.speed * dt;
        hitbox.set_center_y(self.pos.y.round());
        bounds.set_center_y(hitbox.center().y);
        self.collide(Axis::Vertical, bounds, hitbox, obstacles);
    }

    fn collide(
        &mut self,
        axis: Axis,
        bounds: &mut PixelRect,
        hitbox: &mut PixelRect,
        obstacles: &[PixelRect],
    ) {
        for obstacle in obstacles {
            if !obstacle.intersects(hitbox) {
                continue;
            }
            match axis {
                Axis::Horizontal => {
                    if self.direction.x > 0.0 {
                        hitbox.set_right(obstacle.left());
                    }
                    if self.direction.x < 0.0 {
                        hitbox.set_left(obstacle.right());
                    }
                    bounds.set_center_x(hitbox.center().x);
                    self.pos.x = hitbox.center().x;
                }
                Axis::Vertical => {
                    if self.direction.y > 0.0 {
                        hitbox.set_bottom(obstacle.top());
                    }
                    if self.direction.y < 0.0 {
                        hitbox.set_top(obstacle.bottom());
                    }
                    bounds.set_center_y(hitbox.center().y);
                    self.pos.y = hitbox.center().y;
                }
            }
        }
    }

    /// Loop the current animation at `fps`.
    pub fn animate(&mut self, dt: f32, fps: f32, frame_count: usize) -> usize {
        self.frame_index += fps * dt;
        if self.frame_index >= frame_count as f32 {
            self.frame_index = 0.0;
        }
        self.frame_index as usize
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> PlayerController {
        PlayerController::new(Vec2::ZERO, &PlayerConfig::default())
    }

    fn rects_at(center: Vec2) -> (PixelRect, PixelRect) {
        let bounds = PixelRect::from_center(center, Vec2::splat(192.0));
        (bounds, bounds.inflate(-126.0, -70.0))
    }

    #[test]
    fn test_diagonal_speed_matches_axial() {
        let mut player = controller();
        let input = PlayerInput {
            up: true,
            right: true,
            ..default()
        };
        player.apply_input(&input, Duration::ZERO, false);
        let (mut bounds, mut hitbox) = rects_at(Vec2::ZERO);
        player.move_and_collide(1.0, &mut bounds, &mut hitbox, &[]);
        assert!((player.pos.length() - 200.0).abs() < 1e-3);
        assert_eq!(player.status.facing, Facing::Right);
    }

    #[test]
    fn test_collision_snaps_and_slides() {
        let mut player = controller();
        player.apply_input(
            &PlayerInput {
                right: true,
                down: true,
                ..default()
            },
            Duration::ZERO,
            false,
        );
        let (mut bounds, mut hitbox) = rects_at(Vec2::ZERO);
        // Wall just right of the hitbox, tall enough to cover the slide.
        let wall = PixelRect::new(hitbox.right() + 5.0, -500.0, 50.0, 1000.0);
        player.move_and_collide(0.5, &mut bounds, &mut hitbox, &[wall]);

        assert_eq!(hitbox.right(), wall.left(), "flush against the wall");
        assert!(player.pos.y > 60.0, "still slides downwards");
        assert_eq!(bounds.center(), hitbox.center());
    }

    #[test]
    fn test_input_ignored_during_tool_swing() {
        let mut player = controller();
        player.apply_input(
            &PlayerInput {
                use_tool: true,
                ..default()
            },
            Duration::ZERO,
            false,
        );
        player.apply_input(
            &PlayerInput {
                left: true,
                ..default()
            },
            Duration::from_millis(100),
            false,
        );
        assert_eq!(player.direction, Vec2::ZERO);
        player.resolve_status();
        assert_eq!(player.status.animation_key(player.selected_tool), "down_hoe");
    }

    #[test]
    fn test_tool_fires_once_after_swing() {
        let mut player = controller();
        player.apply_input(
            &PlayerInput {
                use_tool: true,
                ..default()
            },
            Duration::from_millis(1000),
            false,
        );
        let target = player.target_point(&PlayerConfig::default());
        assert_eq!(target, Vec2::new(0.0, 50.0));

        assert!(player.tick_timers(Duration::from_millis(1200), target).is_empty());
        let actions = player.tick_timers(Duration::from_millis(1350), target);
        assert_eq!(
            actions,
            vec![PlayerAction::UseTool {
                tool: ToolKind::Hoe,
                target
            }]
        );
        assert!(player.tick_timers(Duration::from_millis(2000), target).is_empty());
    }

    #[test]
    fn test_switch_cycles_once_per_window() {
        let mut player = controller();
        let held = PlayerInput {
            switch_tool: true,
            switch_seed: true,
            ..default()
        };
        player.apply_input(&held, Duration::ZERO, false);
        player.apply_input(&held, Duration::from_millis(50), false);
        assert_eq!(player.selected_tool, ToolKind::Axe);
        assert_eq!(player.selected_seed, Seed::Tomato);

        player.tick_timers(Duration::from_millis(200), Vec2::ZERO);
        player.apply_input(&held, Duration::from_millis(210), false);
        assert_eq!(player.selected_tool, ToolKind::Water);
        assert_eq!(player.selected_seed, Seed::Corn);
    }

    #[test]
    fn test_sleeping_player_ignores_input() {
        let mut player = controller();
        player.apply_input(
            &PlayerInput {
                up: true,
                use_tool: true,
                ..default()
            },
            Duration::ZERO,
            true,
        );
        assert_eq!(player.direction, Vec2::ZERO);
        assert!(!player.tool_use.is_active());
    }

    #[test]
    fn test_animation_wraps() {
        let mut player = controller();
        assert_eq!(player.animate(0.5, 4.0, 4), 2);
        assert_eq!(player.animate(0.4, 4.0, 4), 3);
        assert_eq!(player.animate(0.3, 4.0, 4), 0);
        assert_eq!(player.animate(1.0, 4.0, 0), 0, "no frames loaded");
    }
}
