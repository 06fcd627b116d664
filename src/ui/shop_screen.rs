use bevy::prelude::*;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MENU STATE
// ═══════════════════════════════════════════════════════════════════════

/// One row of the trader's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopEntry {
    Sell(Item),
    Buy(Seed),
}

impl ShopEntry {
    /// Items first (sold to the trader), then seeds (bought from them).
    pub fn all() -> Vec<ShopEntry> {
        Item::ALL
            .iter()
            .map(|i| ShopEntry::Sell(*i))
            .chain(Seed::ALL.iter().map(|s| ShopEntry::Buy(*s)))
            .collect()
    }

    pub fn label(&self, inventory: &Inventory, prices: &ShopConfig) -> String {
        match *self {
            ShopEntry::Sell(item) => format!(
                "{:<8} x{:<3} sell {} G",
                item.key(),
                inventory.item_count(item),
                prices.sale_price(item)
            ),
            ShopEntry::Buy(seed) => format!(
                "{:<8} x{:<3} buy  {} G",
                format!("{} seed", seed.key()),
                inventory.seed_count(seed),
                prices.purchase_price(seed)
            ),
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ShopMenu {
    pub entries: Vec<ShopEntry>,
    pub index: usize,
    /// Blocks further input until it fires.
    pub debounce: ActionTimer,
}

impl Default for ShopMenu {
    fn default() -> Self {
        Self::new(ShopConfig::default().debounce_ms)
    }
}

impl ShopMenu {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            entries: ShopEntry::all(),
            index: 0,
            debounce: ActionTimer::from_millis(debounce_ms),
        }
    }

    pub fn selected(&self) -> Option<ShopEntry> {
        self.entries.get(self.index).copied()
    }

    pub fn move_up(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let last = self.entries.len().saturating_sub(1);
        self.index = (self.index + 1).min(last);
    }

    /// Sell or buy one unit of the selected entry. Returns true when money
    /// changed hands.
    pub fn trade(&self, inventory: &mut Inventory, prices: &ShopConfig) -> bool {
        match self.selected() {
            Some(ShopEntry::Sell(item)) => inventory.sell(item, prices.sale_price(item)),
            Some(ShopEntry::Buy(seed)) => inventory.buy_seed(seed, prices.purchase_price(seed)),
            None => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════

pub fn shop_input(
    time: Res<Time>,
    input: Res<PlayerInput>,
    config: Res<GameConfig>,
    mut menu: ResMut<ShopMenu>,
    mut inventory: ResMut<Inventory>,
    mut toggles: EventWriter<ToggleShopEvent>,
) {
    let now = time.elapsed();
    menu.debounce.update(now);

    if input.cancel {
        toggles.send(ToggleShopEvent);
        return;
    }
    if menu.debounce.is_active() {
        return;
    }

    if input.up {
        menu.move_up();
        menu.debounce.activate(now);
    } else if input.down {
        menu.move_down();
        menu.debounce.activate(now);
    } else if input.use_tool {
        let traded = menu.trade(&mut inventory, &config.shop);
        match menu.selected() {
            Some(ShopEntry::Sell(item)) if traded => {
                info!("[Ui] Sold a {} ({} G)", item.key(), inventory.money);
            }
            Some(ShopEntry::Buy(seed)) if traded => {
                info!("[Ui] Bought a {} seed ({} G)", seed.key(), inventory.money);
            }
            _ => {}
        }
        menu.debounce.activate(now);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SPAWN / DESPAWN / DISPLAY
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct ShopScreenRoot;

#[derive(Component)]
pub struct ShopGoldDisplay;

#[derive(Component)]
pub struct ShopRow {
    pub index: usize,
}

const ROW_COLOR: Color = Color::srgb(0.85, 0.85, 0.85);
const SELECTED_COLOR: Color = Color::srgb(1.0, 0.84, 0.0);

pub fn spawn_shop_screen(mut commands: Commands, mut menu: ResMut<ShopMenu>) {
    menu.index = menu.index.min(menu.entries.len().saturating_sub(1));
    let rows = menu.entries.len();

    commands
        .spawn((
            ShopScreenRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        width: Val::Px(420.0),
                        flex_direction: FlexDirection::Column,
                        padding: UiRect::all(Val::Px(16.0)),
                        row_gap: Val::Px(6.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.12, 0.1, 0.08, 0.95)),
                ))
                .with_children(|panel| {
                    panel.spawn((
                        ShopGoldDisplay,
                        Text::new(""),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(SELECTED_COLOR),
                    ));
                    for index in 0..rows {
                        panel.spawn((
                            ShopRow { index },
                            Text::new(""),
                            TextFont {
                                font_size: 16.0,
                                ..default()
                            },
                            TextColor(ROW_COLOR),
                        ));
                    }
                });
        });
    info!("[Ui] Shop opened");
}

pub fn despawn_shop_screen(mut commands: Commands, query: Query<Entity, With<ShopScreenRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
    info!("[Ui] Shop closed");
}

pub fn update_shop_display(
    menu: Res<ShopMenu>,
    inventory: Res<Inventory>,
    config: Res<GameConfig>,
    mut gold: Query<&mut Text, (With<ShopGoldDisplay>, Without<ShopRow>)>,
    mut rows: Query<(&ShopRow, &mut Text, &mut TextColor)>,
) {
    for mut text in &mut gold {
        **text = format!("{} G", inventory.money);
    }
    for (row, mut text, mut color) in &mut rows {
        let Some(entry) = menu.entries.get(row.index) else {
            continue;
        };
        **text = entry.label(&inventory, &config.shop);
        *color = TextColor(if row.index == menu.index {
            SELECTED_COLOR
        } else {
            ROW_COLOR
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_list_items_then_seeds() {
        let entries = ShopEntry::all();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0], ShopEntry::Sell(Item::Wood));
        assert_eq!(entries[4], ShopEntry::Buy(Seed::Corn));
    }

    #[test]
    fn test_cursor_stays_in_range() {
        let mut menu = ShopMenu::default();
        menu.move_up();
        assert_eq!(menu.index, 0);
        for _ in 0..20 {
            menu.move_down();
        }
        assert_eq!(menu.index, 5);
    }

    #[test]
    fn test_selling_needs_stock() {
        let prices = ShopConfig::default();
        let mut inventory = Inventory::new(0, 0);
        let menu = ShopMenu::default();
        assert!(!menu.trade(&mut inventory, &prices));

        inventory.add_item(Item::Wood, 2);
        assert!(menu.trade(&mut inventory, &prices));
        assert_eq!(inventory.money, 4);
        assert_eq!(inventory.item_count(Item::Wood), 1);
    }

    #[test]
    fn test_buying_needs_money() {
        let prices = ShopConfig::default();
        let mut inventory = Inventory::new(4, 0);
        let mut menu = ShopMenu::default();
        menu.index = 5;
        assert!(!menu.trade(&mut inventory, &prices), "tomato seeds cost 5");

        menu.index = 4;
        assert!(menu.trade(&mut inventory, &prices));
        assert_eq!(inventory.money, 0);
        assert_eq!(inventory.seed_count(Seed::Corn), 1);
    }
}
