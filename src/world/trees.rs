//! Choppable trees, their fruit and the stumps they leave behind.

use bevy::prelude::*;
use rand::Rng;
use std::time::Duration;

use crate::shared::*;

use super::objects::generic_hitbox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChopOutcome {
    /// Fruit knocked off by this hit.
    pub fruit: Option<Entity>,
    /// True only on the hit that fells the tree.
    pub felled: bool,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Tree {
    pub size: TreeSize,
    pub health: u32,
    pub alive: bool,
    pub fruit: Vec<Entity>,
}

impl Tree {
    pub fn new(size: TreeSize, health: u32) -> Self {
        Self {
            size,
            health,
            alive: true,
            fruit: Vec::new(),
        }
    }

    /// One axe hit. Stumps ignore further hits.
    pub fn damage(&mut self, rng: &mut impl Rng) -> ChopOutcome {
        if !self.alive {
            return ChopOutcome::default();
        }
        self.health = self.health.saturating_sub(1);
        let fruit = if self.fruit.is_empty() {
            None
        } else {
            let index = rng.gen_range(0..self.fruit.len());
            Some(self.fruit.remove(index))
        };
        ChopOutcome {
            fruit,
            felled: self.check_death(),
        }
    }

    /// Flip to a stump once health runs out. Fires once.
    pub fn check_death(&mut self) -> bool {
        if self.alive && self.health == 0 {
            self.alive = false;
            return true;
        }
        false
    }

    pub fn take_all_fruit(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.fruit)
    }

    /// Attachment offsets that bear fruit today. Stumps bear none.
    pub fn roll_fruit(&self, offsets: &[(f32, f32)], chance: f64, rng: &mut impl Rng) -> Vec<Vec2> {
        if !self.alive {
            return Vec::new();
        }
        let chance = chance.clamp(0.0, 1.0);
        offsets
            .iter()
            .filter(|_| rng.gen_bool(chance))
            .map(|(x, y)| Vec2::new(*x, *y))
            .collect()
    }
}

/// Stump sprite and hitbox, standing where the trunk stood.
pub fn stump_rects(tree_bounds: PixelRect, stump_size: Vec2) -> (PixelRect, PixelRect) {
    let bounds = PixelRect::from_midbottom(tree_bounds.midbottom(), stump_size);
    let hitbox = bounds.inflate(-10.0, -bounds.h * 0.6);
    (bounds, hitbox)
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Fruit {
    pub tree: Entity,
}

fn spawn_fruit(
    commands: &mut Commands,
    tree_entity: Entity,
    tree_bounds: PixelRect,
    offsets: Vec<Vec2>,
    config: &TreeConfig,
    assets: &GameAssets,
) -> Vec<Entity> {
    offsets
        .into_iter()
        .map(|offset| {
            let rect = PixelRect::from_topleft(tree_bounds.topleft() + offset, config.fruit_size());
            commands
                .spawn((
                    Sprite {
                        image: assets.apple.clone(),
                        ..default()
                    },
                    Transform::default(),
                    Bounds(rect),
                    Layer::Fruit,
                    Fruit { tree: tree_entity },
                ))
                .id()
        })
        .collect()
}

/// Spawn a tree with its first day's fruit.
pub fn spawn_tree(
    commands: &mut Commands,
    rect: PixelRect,
    image: Handle<Image>,
    size: TreeSize,
    config: &TreeConfig,
    assets: &GameAssets,
    rng: &mut impl Rng,
) -> Entity {
    let entity = commands
        .spawn((
            Sprite { image, ..default() },
            Transform::default(),
            Bounds(rect),
            Hitbox(generic_hitbox(rect)),
            Obstacle,
            Layer::Main,
        ))
        .id();
    let mut tree = Tree::new(size, config.health);
    let offsets = tree.roll_fruit(config.fruit_offsets(size), config.fruit_chance, rng);
    tree.fruit = spawn_fruit(commands, entity, rect, offsets, config, assets);
    commands.entity(entity).insert(tree);
    entity
}

/// Axe swings hit every tree whose sprite contains the target point.
pub fn chop_trees(
    mut commands: Commands,
    mut actions: EventReader<PlayerAction>,
    config: Res<GameConfig>,
    assets: Res<GameAssets>,
    mut trees: Query<(&mut Tree, &mut Bounds, &mut Hitbox, &mut Sprite)>,
    fruit: Query<(&Bounds, &Sprite), (With<Fruit>, Without<Tree>)>,
    mut pickups: EventWriter<ItemPickupEvent>,
    mut particles: EventWriter<SpawnParticleEvent>,
) {
    let mut rng = rand::thread_rng();
    let trees_cfg = &config.trees;

    for action in actions.read() {
        let PlayerAction::UseTool {
            tool: ToolKind::Axe,
            target,
        } = *action
        else {
            continue;
        };

        for (mut tree, mut bounds, mut hitbox, mut sprite) in &mut trees {
            if !bounds.0.contains_point(target) {
                continue;
            }
            let outcome = tree.damage(&mut rng);

            if let Some(apple) = outcome.fruit {
                if let Ok((apple_bounds, apple_sprite)) = fruit.get(apple) {
                    particles.send(SpawnParticleEvent {
                        image: apple_sprite.image.clone(),
                        bounds: apple_bounds.0,
                        layer: Layer::Fruit,
                        duration: Duration::from_millis(trees_cfg.chop_particle_ms),
                    });
                }
                commands.entity(apple).despawn();
                pickups.send(ItemPickupEvent {
                    item: Item::Apple,
                    quantity: 1,
                });
            }

            if outcome.felled {
                particles.send(SpawnParticleEvent {
                    image: sprite.image.clone(),
                    bounds: bounds.0,
                    layer: Layer::Fruit,
                    duration: Duration::from_millis(trees_cfg.fell_particle_ms),
                });
                for apple in tree.take_all_fruit() {
                    commands.entity(apple).despawn();
                }
                let (stump, stump_hitbox) = stump_rects(bounds.0, trees_cfg.stump_size(tree.size));
                bounds.0 = stump;
                hitbox.0 = stump_hitbox;
                sprite.image = assets.stump(tree.size);
                pickups.send(ItemPickupEvent {
                    item: Item::Wood,
                    quantity: 1,
                });
                info!("[World] {} tree felled", tree.size.key());
            }
        }
    }
}

/// New day: every living tree drops yesterday's fruit and grows a fresh set.
pub fn regrow_fruit(
    mut commands: Commands,
    mut resets: EventReader<DayResetEvent>,
    config: Res<GameConfig>,
    assets: Res<GameAssets>,
    mut trees: Query<(Entity, &mut Tree, &Bounds)>,
) {
    if resets.is_empty() {
        return;
    }
    resets.clear();

    let mut rng = rand::thread_rng();
    let trees_cfg = &config.trees;
    let mut grown = 0;
    for (entity, mut tree, bounds) in &mut trees {
        for apple in tree.take_all_fruit() {
            commands.entity(apple).despawn();
        }
        let offsets =
            tree.roll_fruit(trees_cfg.fruit_offsets(tree.size), trees_cfg.fruit_chance, &mut rng);
        tree.fruit = spawn_fruit(&mut commands, entity, bounds.0, offsets, trees_cfg, &assets);
        grown += tree.fruit.len();
    }
    info!("[World] Fruit regrown: {grown} apples");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_five_hits_fell_a_tree_once() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut tree = Tree::new(TreeSize::Small, 5);
        for _ in 0..4 {
            assert!(!tree.damage(&mut rng).felled);
        }
        assert!(tree.damage(&mut rng).felled);
        assert!(!tree.alive);
        assert_eq!(tree.damage(&mut rng), ChopOutcome::default(), "stumps ignore hits");
        assert!(!tree.check_death());
    }

    #[test]
    fn test_each_hit_knocks_off_one_fruit() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut tree = Tree::new(TreeSize::Large, 5);
        tree.fruit = vec![Entity::from_raw(1), Entity::from_raw(2)];

        let first = tree.damage(&mut rng).fruit.expect("two fruit left");
        let second = tree.damage(&mut rng).fruit.expect("one fruit left");
        assert_ne!(first, second);
        assert_eq!(tree.damage(&mut rng).fruit, None);
    }

    #[test]
    fn test_stumps_never_fruit() {
        let mut rng = StdRng::seed_from_u64(11);
        let offsets = [(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)];
        let mut tree = Tree::new(TreeSize::Small, 1);
        assert_eq!(tree.roll_fruit(&offsets, 1.0, &mut rng).len(), 3);
        tree.damage(&mut rng);
        assert!(tree.roll_fruit(&offsets, 1.0, &mut rng).is_empty());
    }

    #[test]
    fn test_stump_stands_on_trunk_base() {
        let tree = PixelRect::new(100.0, 50.0, 96.0, 128.0);
        let (stump, hitbox) = stump_rects(tree, Vec2::new(48.0, 48.0));
        assert_eq!(stump.midbottom(), tree.midbottom());
        assert_eq!(hitbox.center(), stump.center());
        assert_eq!(hitbox.w, 38.0);
    }
}
