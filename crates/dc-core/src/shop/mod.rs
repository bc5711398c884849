//! Vendor catalog
//!
//! Four categories of wares, each keyed by a single letter. Prices come from
//! a [`PriceList`] so a config file can rebalance the economy without
//! touching the session logic in [`session`].

mod session;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

pub use session::{VendorOutcome, VendorPhase, VendorSession};

use crate::player::{EquipmentSlot, SpellKind};

/// Vendor menu categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum ShopCategory {
    Weapons,
    Armor,
    Scrolls,
    Potions,
}

impl ShopCategory {
    pub const fn key(&self) -> char {
        match self {
            ShopCategory::Weapons => 'W',
            ShopCategory::Armor => 'A',
            ShopCategory::Scrolls => 'S',
            ShopCategory::Potions => 'P',
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        ShopCategory::iter().find(|c| key.len() == 1 && key.starts_with(c.key()))
    }
}

/// What buying an item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEffect {
    Equip(EquipmentSlot, u8),
    Scroll(SpellKind),
    Healing,
    /// Leads to the attribute menu; nothing is charged until a choice is made.
    Enhancer,
}

/// One line of a category's menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopItem {
    pub key: char,
    pub name: &'static str,
    pub price: u32,
    pub effect: ItemEffect,
}

/// Gold prices for every item on sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceList {
    /// Dagger, Sword, Broadsword
    pub weapons: [u32; 3],
    /// Leather, Wooden, Chainmail
    pub armor: [u32; 3],
    pub scroll: u32,
    pub healing_potion: u32,
    pub attribute_potion: u32,
}

impl Default for PriceList {
    fn default() -> Self {
        Self {
            weapons: [10, 20, 30],
            armor: [10, 20, 30],
            scroll: 25,
            healing_potion: 15,
            attribute_potion: 40,
        }
    }
}

const WEAPON_KEYS: [(char, &str); 3] = [('D', "Dagger"), ('S', "Sword"), ('B', "Broadsword")];
const ARMOR_KEYS: [(char, &str); 3] = [('L', "Leather"), ('W', "Wooden"), ('C', "Chainmail")];

impl PriceList {
    /// Menu of a category, in display order.
    pub fn items(&self, category: ShopCategory) -> Vec<ShopItem> {
        match category {
            ShopCategory::Weapons => Self::tiered(EquipmentSlot::Weapon, &WEAPON_KEYS, &self.weapons),
            ShopCategory::Armor => Self::tiered(EquipmentSlot::Armor, &ARMOR_KEYS, &self.armor),
            ShopCategory::Scrolls => SpellKind::iter()
                .map(|spell| ShopItem {
                    key: spell.scroll_key(),
                    name: scroll_name(spell),
                    price: self.scroll,
                    effect: ItemEffect::Scroll(spell),
                })
                .collect(),
            ShopCategory::Potions => vec![
                ShopItem {
                    key: 'H',
                    name: "Healing potion",
                    price: self.healing_potion,
                    effect: ItemEffect::Healing,
                },
                ShopItem {
                    key: 'A',
                    name: "Attribute enhancer",
                    price: self.attribute_potion,
                    effect: ItemEffect::Enhancer,
                },
            ],
        }
    }

    /// Look up an item by its menu key within a category.
    pub fn find(&self, category: ShopCategory, key: &str) -> Option<ShopItem> {
        if key.len() != 1 {
            return None;
        }
        self.items(category)
            .into_iter()
            .find(|item| key.starts_with(item.key))
    }

    /// Cheapest item of a category.
    pub fn cheapest(&self, category: ShopCategory) -> u32 {
        self.items(category)
            .iter()
            .map(|item| item.price)
            .min()
            .unwrap_or(0)
    }

    fn tiered(slot: EquipmentSlot, keys: &[(char, &'static str); 3], prices: &[u32; 3]) -> Vec<ShopItem> {
        keys.iter()
            .zip(prices)
            .zip(1u8..)
            .map(|((&(key, name), &price), tier)| ShopItem {
                key,
                name,
                price,
                effect: ItemEffect::Equip(slot, tier),
            })
            .collect()
    }
}

fn scroll_name(spell: SpellKind) -> &'static str {
    match spell {
        SpellKind::Protection => "Scroll of Protection",
        SpellKind::Fireball => "Scroll of Fireball",
        SpellKind::Lightning => "Scroll of Lightning",
        SpellKind::Weaken => "Scroll of Weaken",
        SpellKind::Teleport => "Scroll of Teleport",
    }
}
