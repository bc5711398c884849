//! Player races

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The four playable archetypes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Race {
    #[default]
    Human,
    Elf,
    Dwarf,
    Hobbit,
}

/// Starting numbers for a race before any roll or allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceBase {
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub max_hp: i32,
}

impl Race {
    pub const fn base(&self) -> RaceBase {
        match self {
            Race::Human => RaceBase {
                strength: 8,
                dexterity: 8,
                intelligence: 8,
                max_hp: 14,
            },
            Race::Elf => RaceBase {
                strength: 6,
                dexterity: 10,
                intelligence: 10,
                max_hp: 12,
            },
            Race::Dwarf => RaceBase {
                strength: 10,
                dexterity: 8,
                intelligence: 6,
                max_hp: 16,
            },
            Race::Hobbit => RaceBase {
                strength: 4,
                dexterity: 12,
                intelligence: 8,
                max_hp: 10,
            },
        }
    }
}
