//! Game-wide constants

/// Floors, rows and columns of the dungeon cube.
pub const SIZE: usize = 7;

/// Total number of rooms in the dungeon.
pub const ROOM_COUNT: usize = SIZE * SIZE * SIZE;

/// Treasures hidden in every dungeon; holding all of them wins at the exit.
pub const TREASURE_COUNT: u8 = 10;

/// Highest monster level.
pub const MAX_MONSTER_LEVEL: u8 = 10;

/// Attribute bounds (strength, dexterity, intelligence).
pub const MIN_ATTRIBUTE: i32 = 1;
pub const MAX_ATTRIBUTE: i32 = 18;

/// Highest equipment tier.
pub const MAX_TIER: u8 = 3;

/// Extra attribute points distributed at point-buy character creation.
pub const ALLOCATION_POOL: i32 = 8;

/// Minimum intelligence needed to cast from a scroll.
pub const SPELL_IQ_THRESHOLD: i32 = 12;

/// Starting purse and flare count.
pub const STARTING_GOLD: u32 = 60;
pub const STARTING_FLARES: u32 = 3;

/// Chance per successful hit that a real weapon breaks.
pub const WEAPON_BREAK_CHANCE: f64 = 0.05;

/// A dying monster strikes once more when a draw exceeds this.
pub const DEATH_THROES_THRESHOLD: f64 = 0.7;

/// Running away succeeds when a draw is below this.
pub const ESCAPE_THRESHOLD: f64 = 0.4;

/// Hit points restored by a healing potion bought from a vendor.
pub const HEALING_POTION_HP: i32 = 10;
