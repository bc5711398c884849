//! Rooms and their features

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::error::RoomDecodeError;
use crate::{MAX_MONSTER_LEVEL, TREASURE_COUNT};

/// Non-combat, non-treasure decoration of a room.
///
/// The discriminant is the 4-bit code used in the packed room format, and
/// codes 1..=8 are what the generator's feature roll maps onto.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Feature {
    #[default]
    Empty = 0,
    Mirror = 1,
    Scroll = 2,
    Chest = 3,
    Flares = 4,
    Potion = 5,
    Vendor = 6,
    Thief = 7,
    Warp = 8,
    StairsUp = 9,
    StairsDown = 10,
    Exit = 11,
}

impl Feature {
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Feature::Empty),
            1 => Some(Feature::Mirror),
            2 => Some(Feature::Scroll),
            3 => Some(Feature::Chest),
            4 => Some(Feature::Flares),
            5 => Some(Feature::Potion),
            6 => Some(Feature::Vendor),
            7 => Some(Feature::Thief),
            8 => Some(Feature::Warp),
            9 => Some(Feature::StairsUp),
            10 => Some(Feature::StairsDown),
            11 => Some(Feature::Exit),
            _ => None,
        }
    }

    pub const fn code(&self) -> u8 {
        *self as u8
    }

    /// Stairs and the exit; these never share a room with a monster or treasure.
    pub const fn is_structural(&self) -> bool {
        matches!(self, Feature::StairsUp | Feature::StairsDown | Feature::Exit)
    }

    /// Map symbol
    pub const fn symbol(&self) -> char {
        match self {
            Feature::Empty => '.',
            Feature::Mirror => 'O',
            Feature::Scroll => 'R',
            Feature::Chest => 'C',
            Feature::Flares => 'F',
            Feature::Potion => 'P',
            Feature::Vendor => 'V',
            Feature::Thief => 'T',
            Feature::Warp => 'W',
            Feature::StairsUp => 'U',
            Feature::StairsDown => 'D',
            Feature::Exit => 'X',
        }
    }

    /// Narration used when the player walks in.
    pub const fn description(&self) -> &'static str {
        match self {
            Feature::Empty => "an empty room",
            Feature::Mirror => "a tall silver mirror",
            Feature::Scroll => "a scroll lying on the floor",
            Feature::Chest => "a heavy wooden chest",
            Feature::Flares => "a bundle of flares",
            Feature::Potion => "a bubbling potion",
            Feature::Vendor => "a vendor with a cart of wares",
            Feature::Thief => "a thief lurking in the shadows",
            Feature::Warp => "a shimmering warp",
            Feature::StairsUp => "a stairway leading up",
            Feature::StairsDown => "a stairway leading down",
            Feature::Exit => "the dungeon exit",
        }
    }
}

/// A single room of the dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Room {
    pub feature: Feature,
    /// 0 = no monster, else 1..=10
    pub monster_level: u8,
    /// 0 = no treasure, else 1..=10
    pub treasure_id: u8,
    pub seen: bool,
}

const FEATURE_SHIFT: u16 = 0;
const MONSTER_SHIFT: u16 = 4;
const TREASURE_SHIFT: u16 = 8;
const SEEN_BIT: u16 = 1 << 12;
const RESERVED_MASK: u16 = 0xE000;

impl Room {
    pub const fn with_feature(feature: Feature) -> Self {
        Self {
            feature,
            monster_level: 0,
            treasure_id: 0,
            seen: false,
        }
    }

    pub const fn has_monster(&self) -> bool {
        self.monster_level > 0
    }

    pub const fn has_treasure(&self) -> bool {
        self.treasure_id != 0
    }

    /// Holds a monster or a treasure.
    pub const fn is_occupied(&self) -> bool {
        self.has_monster() || self.has_treasure()
    }

    /// Nothing at all: no feature, monster or treasure.
    pub fn is_bare(&self) -> bool {
        self.feature == Feature::Empty && !self.is_occupied()
    }

    /// Pack into the compact save word: feature, monster level and treasure
    /// id in successive nibbles, then the seen bit.
    pub fn pack(&self) -> u16 {
        ((self.feature.code() as u16 & 0xF) << FEATURE_SHIFT)
            | ((self.monster_level as u16 & 0xF) << MONSTER_SHIFT)
            | ((self.treasure_id as u16 & 0xF) << TREASURE_SHIFT)
            | if self.seen { SEEN_BIT } else { 0 }
    }

    pub fn unpack(word: u16) -> Result<Self, RoomDecodeError> {
        if word & RESERVED_MASK != 0 {
            return Err(RoomDecodeError::ReservedBits(word));
        }

        let code = ((word >> FEATURE_SHIFT) & 0xF) as u8;
        let feature = Feature::from_code(code).ok_or(RoomDecodeError::UnknownFeature(code))?;

        let monster_level = ((word >> MONSTER_SHIFT) & 0xF) as u8;
        if monster_level > MAX_MONSTER_LEVEL {
            return Err(RoomDecodeError::MonsterLevel(monster_level));
        }

        let treasure_id = ((word >> TREASURE_SHIFT) & 0xF) as u8;
        if treasure_id > TREASURE_COUNT {
            return Err(RoomDecodeError::TreasureId(treasure_id));
        }

        Ok(Self {
            feature,
            monster_level,
            treasure_id,
            seen: word & SEEN_BIT != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_feature_codes_round_trip() {
        for feature in Feature::iter() {
            assert_eq!(Feature::from_code(feature.code()), Some(feature));
        }
        assert_eq!(Feature::from_code(12), None);
    }

    #[test]
    fn test_pack_layout() {
        let room = Room {
            feature: Feature::Empty,
            monster_level: 5,
            treasure_id: 3,
            seen: true,
        };
        assert_eq!(room.pack(), 0x1350);
        assert_eq!(Room::unpack(0x1350), Ok(room));
    }

    #[test]
    fn test_unpack_rejects_bad_words() {
        assert_eq!(Room::unpack(0x000C), Err(RoomDecodeError::UnknownFeature(12)));
        assert_eq!(Room::unpack(0x00B0), Err(RoomDecodeError::MonsterLevel(11)));
        assert_eq!(Room::unpack(0x0F00), Err(RoomDecodeError::TreasureId(15)));
        assert_eq!(Room::unpack(0x2000), Err(RoomDecodeError::ReservedBits(0x2000)));
    }

    #[test]
    fn test_structural_features() {
        assert!(Feature::Exit.is_structural());
        assert!(Feature::StairsDown.is_structural());
        assert!(!Feature::Vendor.is_structural());
    }

    #[test]
    fn test_bare_room() {
        assert!(Room::default().is_bare());
        assert!(!Room::with_feature(Feature::Chest).is_bare());
        let guarded = Room {
            monster_level: 2,
            ..Room::default()
        };
        assert!(guarded.is_occupied());
        assert!(!guarded.is_bare());
    }
}
