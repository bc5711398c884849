//! Weapon and armor slots

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::MAX_TIER;
use crate::error::CreationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
}

const WEAPON_NAMES: [&str; 4] = ["Bare hands", "Dagger", "Sword", "Broadsword"];
const ARMOR_NAMES: [&str; 4] = ["No armor", "Leather", "Wooden", "Chainmail"];
const BROKEN_WEAPON: &str = "Broken weapon";
const DAMAGED_ARMOR: &str = "Damaged armor";

/// An equipped item: tier 0..=3, where 0 means nothing usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub slot: EquipmentSlot,
    tier: u8,
    /// Set when the item was destroyed in use; cleared by a new purchase.
    pub damaged: bool,
}

impl Equipment {
    pub fn new(slot: EquipmentSlot, tier: u8) -> Result<Self, CreationError> {
        if tier > MAX_TIER {
            return Err(CreationError::TierOutOfRange { tier });
        }
        Ok(Self {
            slot,
            tier,
            damaged: false,
        })
    }

    pub const fn none(slot: EquipmentSlot) -> Self {
        Self {
            slot,
            tier: 0,
            damaged: false,
        }
    }

    pub const fn tier(&self) -> u8 {
        self.tier
    }

    /// Combat bonus contributed by this item.
    pub const fn bonus(&self) -> i32 {
        self.tier as i32
    }

    /// Replace the item with a fresh one of the given tier.
    pub fn equip(&mut self, tier: u8) {
        self.tier = tier.min(MAX_TIER);
        self.damaged = false;
    }

    /// Destroy the item: tier drops to 0 and the damaged marker is set.
    pub fn break_item(&mut self) {
        self.tier = 0;
        self.damaged = true;
    }

    pub fn name(&self) -> &'static str {
        match (self.slot, self.damaged && self.tier == 0) {
            (EquipmentSlot::Weapon, true) => BROKEN_WEAPON,
            (EquipmentSlot::Armor, true) => DAMAGED_ARMOR,
            (slot, false) => Self::tier_name(slot, self.tier),
        }
    }

    /// Display name of an item of this slot at a given tier.
    pub fn tier_name(slot: EquipmentSlot, tier: u8) -> &'static str {
        let idx = tier.min(MAX_TIER) as usize;
        match slot {
            EquipmentSlot::Weapon => WEAPON_NAMES[idx],
            EquipmentSlot::Armor => ARMOR_NAMES[idx],
        }
    }
}
