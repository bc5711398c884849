//! Spell kinds and charge counts

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// The five castable spells, in menu order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum SpellKind {
    Protection = 0,
    Fireball = 1,
    Lightning = 2,
    Weaken = 3,
    Teleport = 4,
}

impl SpellKind {
    pub const COUNT: usize = 5;

    /// Spell selected by a menu digit `'1'..='5'`.
    pub fn from_digit(key: &str) -> Option<Self> {
        match key {
            "1" => Some(SpellKind::Protection),
            "2" => Some(SpellKind::Fireball),
            "3" => Some(SpellKind::Lightning),
            "4" => Some(SpellKind::Weaken),
            "5" => Some(SpellKind::Teleport),
            _ => None,
        }
    }

    pub const fn digit(&self) -> char {
        match self {
            SpellKind::Protection => '1',
            SpellKind::Fireball => '2',
            SpellKind::Lightning => '3',
            SpellKind::Weaken => '4',
            SpellKind::Teleport => '5',
        }
    }

    /// Key of the matching scroll at a vendor.
    pub const fn scroll_key(&self) -> char {
        match self {
            SpellKind::Protection => 'P',
            SpellKind::Fireball => 'F',
            SpellKind::Lightning => 'L',
            SpellKind::Weaken => 'W',
            SpellKind::Teleport => 'T',
        }
    }

    pub const fn index(&self) -> usize {
        *self as usize
    }
}

/// Remaining charges per spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpellBook {
    charges: [u32; SpellKind::COUNT],
}

impl SpellBook {
    pub const fn from_charges(charges: [u32; SpellKind::COUNT]) -> Self {
        Self { charges }
    }

    /// Charges in menu order.
    pub const fn to_array(&self) -> [u32; SpellKind::COUNT] {
        self.charges
    }

    pub const fn charges(&self, spell: SpellKind) -> u32 {
        self.charges[spell.index()]
    }

    pub fn add(&mut self, spell: SpellKind, n: u32) {
        let slot = &mut self.charges[spell.index()];
        *slot = slot.saturating_add(n);
    }

    /// Use one charge. Returns false, changing nothing, if none remain.
    pub fn consume(&mut self, spell: SpellKind) -> bool {
        let slot = &mut self.charges[spell.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn total(&self) -> u32 {
        self.charges.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpellKind, u32)> + '_ {
        SpellKind::iter().map(|s| (s, self.charges(s)))
    }
}
