//! Player state
//!
//! Plain data plus the mutation helpers every mode shares: damage and
//! healing, attribute changes, treasure awards, gold.

mod equipment;
mod race;
mod spells;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::info;

use dc_rng::RandomSource;

pub use equipment::{Equipment, EquipmentSlot};
pub use race::{Race, RaceBase};
pub use spells::{SpellBook, SpellKind};

use crate::dungeon::Position;
use crate::error::CreationError;
use crate::event::Event;
use crate::{
    ALLOCATION_POOL, MAX_ATTRIBUTE, MIN_ATTRIBUTE, SPELL_IQ_THRESHOLD, STARTING_FLARES,
    STARTING_GOLD, TREASURE_COUNT,
};

/// Core attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Attribute {
    #[strum(serialize = "strength")]
    Strength,
    #[strum(serialize = "dexterity")]
    Dexterity,
    #[strum(serialize = "intelligence")]
    Intelligence,
}

/// Point-buy extras on top of the race base; must total `ALLOCATION_POOL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Allocation {
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
}

impl Allocation {
    pub const fn total(&self) -> i32 {
        self.strength + self.dexterity + self.intelligence
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Position,
    pub race: Race,

    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,

    pub hp: i32,
    pub max_hp: i32,

    pub gold: u32,
    pub flares: u32,
    pub treasures: BTreeSet<u8>,

    pub weapon: Equipment,
    pub armor: Equipment,
    pub spells: SpellBook,

    /// A failed escape leaves the player too winded to run again this fight.
    pub fatigued: bool,
    /// Protection spell armor, reset when an encounter starts.
    pub temp_armor_bonus: i32,
}

impl Player {
    fn from_base(race: Race, pos: Position) -> Self {
        let base = race.base();
        Self {
            pos,
            race,
            strength: base.strength,
            dexterity: base.dexterity,
            intelligence: base.intelligence,
            hp: base.max_hp,
            max_hp: base.max_hp,
            gold: STARTING_GOLD,
            flares: STARTING_FLARES,
            treasures: BTreeSet::new(),
            weapon: Equipment::none(EquipmentSlot::Weapon),
            armor: Equipment::none(EquipmentSlot::Armor),
            spells: SpellBook::default(),
            fatigued: false,
            temp_armor_bonus: 0,
        }
    }

    /// Roll a new character: race base plus `U(0,6)` on strength, dexterity
    /// and intelligence, in that order. Starts with a dagger.
    pub fn roll<R: RandomSource>(race: Race, pos: Position, rng: &mut R) -> Self {
        let mut player = Self::from_base(race, pos);
        player.strength = clamp_attribute(player.strength + rng.randint(0, 6));
        player.dexterity = clamp_attribute(player.dexterity + rng.randint(0, 6));
        player.intelligence = clamp_attribute(player.intelligence + rng.randint(0, 6));
        player.weapon.equip(1);
        player
    }

    /// Point-buy character creation.
    pub fn allocate(
        race: Race,
        allocation: Allocation,
        weapon_tier: u8,
        pos: Position,
    ) -> Result<Self, CreationError> {
        if allocation.total() != ALLOCATION_POOL {
            return Err(CreationError::AllocationTotal {
                expected: ALLOCATION_POOL,
                found: allocation.total(),
            });
        }

        let mut player = Self::from_base(race, pos);
        for (attribute, extra) in [
            (Attribute::Strength, allocation.strength),
            (Attribute::Dexterity, allocation.dexterity),
            (Attribute::Intelligence, allocation.intelligence),
        ] {
            let value = player.attribute(attribute) + extra;
            if !(MIN_ATTRIBUTE..=MAX_ATTRIBUTE).contains(&value) {
                return Err(CreationError::AttributeOutOfRange { attribute, value });
            }
            *player.attribute_mut(attribute) = value;
        }
        player.weapon = Equipment::new(EquipmentSlot::Weapon, weapon_tier)?;
        Ok(player)
    }

    pub const fn attribute(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Dexterity => self.dexterity,
            Attribute::Intelligence => self.intelligence,
        }
    }

    fn attribute_mut(&mut self, attribute: Attribute) -> &mut i32 {
        match attribute {
            Attribute::Strength => &mut self.strength,
            Attribute::Dexterity => &mut self.dexterity,
            Attribute::Intelligence => &mut self.intelligence,
        }
    }

    /// Change an attribute, staying within 1..=18. Returns the new value.
    pub fn adjust_attribute(&mut self, attribute: Attribute, delta: i32) -> i32 {
        let slot = self.attribute_mut(attribute);
        *slot = clamp_attribute(*slot + delta);
        *slot
    }

    /// Raise max HP; current HP rises by the same amount.
    pub fn raise_max_hp(&mut self, amount: i32) {
        self.max_hp += amount;
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    /// Heal, clamped to max HP. Returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount).min(self.max_hp);
        self.hp - before
    }

    /// Take damage. Returns true if this killed the player.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.hp -= amount;
        self.is_dead()
    }

    pub const fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub const fn can_cast(&self) -> bool {
        self.intelligence >= SPELL_IQ_THRESHOLD
    }

    /// Armor tier plus any spell protection.
    pub const fn armor_total(&self) -> i32 {
        self.armor.bonus() + self.temp_armor_bonus
    }

    pub const fn can_afford(&self, price: u32) -> bool {
        self.gold >= price
    }

    /// Deduct gold if affordable. Returns false, changing nothing, otherwise.
    pub fn spend_gold(&mut self, price: u32) -> bool {
        if !self.can_afford(price) {
            return false;
        }
        self.gold -= price;
        true
    }

    pub fn treasure_count(&self) -> usize {
        self.treasures.len()
    }

    pub fn has_all_treasures(&self) -> bool {
        self.treasures.len() >= TREASURE_COUNT as usize
    }

    /// Credit a treasure. Already-claimed ids produce no events and no change.
    pub fn claim_treasure(&mut self, id: u8, events: &mut Vec<Event>) -> bool {
        if id == 0 || id > TREASURE_COUNT || !self.treasures.insert(id) {
            return false;
        }

        info!(target: "dc_core.player", id, found = self.treasures.len(), "treasure claimed");
        events.push(Event::loot(format!(
            "You found treasure #{id}! ({} of {TREASURE_COUNT})",
            self.treasures.len()
        )));
        if self.has_all_treasures() {
            events.push(Event::info(
                "You hold every treasure. Find the exit on the final floor!",
            ));
        }
        true
    }

    /// Reset per-encounter combat state.
    pub fn reset_combat_flags(&mut self) {
        self.fatigued = false;
        self.temp_armor_bonus = 0;
    }

    /// Pull every field back into its legal range.
    pub fn repair(&mut self) {
        self.strength = clamp_attribute(self.strength);
        self.dexterity = clamp_attribute(self.dexterity);
        self.intelligence = clamp_attribute(self.intelligence);
        self.max_hp = self.max_hp.max(1);
        self.hp = self.hp.clamp(0, self.max_hp);
        self.temp_armor_bonus = self.temp_armor_bonus.max(0);
    }
}

fn clamp_attribute(value: i32) -> i32 {
    value.clamp(MIN_ATTRIBUTE, MAX_ATTRIBUTE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dc_rng::ScriptedRng;

    fn start() -> Position {
        Position::new(0, 3, 3)
    }

    #[test]
    fn test_roll_uses_race_base() {
        let mut rng = ScriptedRng::new([6, 0, 3], []);
        let player = Player::roll(Race::Elf, start(), &mut rng);
        assert_eq!(player.strength, 12);
        assert_eq!(player.dexterity, 10);
        assert_eq!(player.intelligence, 13);
        assert_eq!(player.hp, 12);
        assert_eq!(player.max_hp, 12);
        assert_eq!(player.weapon.name(), "Dagger");
        assert_eq!(player.gold, STARTING_GOLD);
    }

    #[test]
    fn test_allocation_total_checked() {
        let alloc = Allocation {
            strength: 5,
            dexterity: 5,
            intelligence: 5,
        };
        assert_eq!(
            Player::allocate(Race::Human, alloc, 1, start()),
            Err(CreationError::AllocationTotal {
                expected: 8,
                found: 15
            })
        );
    }

    #[test]
    fn test_allocation_range_checked() {
        let alloc = Allocation {
            strength: -4,
            dexterity: 12,
            intelligence: 0,
        };
        assert_eq!(
            Player::allocate(Race::Hobbit, alloc, 1, start()),
            Err(CreationError::AttributeOutOfRange {
                attribute: Attribute::Strength,
                value: 0
            })
        );
    }

    #[test]
    fn test_allocation_tier_checked() {
        let alloc = Allocation {
            strength: 4,
            dexterity: 2,
            intelligence: 2,
        };
        assert_eq!(
            Player::allocate(Race::Dwarf, alloc, 7, start()),
            Err(CreationError::TierOutOfRange { tier: 7 })
        );

        let dwarf = Player::allocate(Race::Dwarf, alloc, 2, start()).unwrap();
        assert_eq!(dwarf.strength, 14);
        assert_eq!(dwarf.weapon.name(), "Sword");
    }

    #[test]
    fn test_claim_treasure_is_idempotent() {
        let mut player = Player::roll(Race::Human, start(), &mut ScriptedRng::new([0, 0, 0], []));
        let mut events = Vec::new();

        assert!(player.claim_treasure(4, &mut events));
        assert_eq!(events.len(), 1);

        let mut again = Vec::new();
        assert!(!player.claim_treasure(4, &mut again));
        assert!(again.is_empty());
        assert_eq!(player.treasure_count(), 1);
    }

    #[test]
    fn test_heal_and_damage_clamp() {
        let mut player = Player::roll(Race::Human, start(), &mut ScriptedRng::new([0, 0, 0], []));
        player.hp = 5;
        assert_eq!(player.heal(100), player.max_hp - 5);
        assert!(!player.take_damage(3));
        assert!(player.take_damage(100));
    }

    #[test]
    fn test_adjust_attribute_clamps() {
        let mut player = Player::roll(Race::Human, start(), &mut ScriptedRng::new([0, 0, 0], []));
        assert_eq!(player.adjust_attribute(Attribute::Strength, 40), MAX_ATTRIBUTE);
        assert_eq!(player.adjust_attribute(Attribute::Dexterity, -40), MIN_ATTRIBUTE);
    }

    #[test]
    fn test_repair() {
        let mut player = Player::roll(Race::Human, start(), &mut ScriptedRng::new([0, 0, 0], []));
        player.strength = 40;
        player.max_hp = -2;
        player.hp = 9;
        player.repair();
        assert_eq!(player.strength, 18);
        assert_eq!(player.max_hp, 1);
        assert_eq!(player.hp, 1);
    }
}
