//! Error types crossing the engine boundary
//!
//! Nothing here is fatal to the process: player input mistakes are reported
//! as events, and only construction, snapshot restore and config loading
//! return these errors.

use thiserror::Error;

use crate::dungeon::{Position, Violation};
use crate::event::Mode;
use crate::player::Attribute;

/// Character creation failures; no partially built player escapes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreationError {
    #[error("allocated {found} attribute points, expected exactly {expected}")]
    AllocationTotal { expected: i32, found: i32 },

    #[error("{attribute} of {value} is outside 1..=18")]
    AttributeOutOfRange { attribute: Attribute, value: i32 },

    #[error("equipment tier {tier} is outside 0..=3")]
    TierOutOfRange { tier: u8 },
}

/// A packed room word that does not describe a room.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoomDecodeError {
    #[error("unknown feature code {0}")]
    UnknownFeature(u8),

    #[error("monster level {0} is outside 0..=10")]
    MonsterLevel(u8),

    #[error("treasure id {0} is outside 0..=10")]
    TreasureId(u8),

    #[error("reserved bits set in {0:#06x}")]
    ReservedBits(u16),
}

/// Reasons a snapshot is refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    #[error("incompatible snapshot version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("expected {expected} rooms, found {found}")]
    RoomCount { expected: usize, found: usize },

    #[error("room {index}: {source}")]
    Room {
        index: usize,
        #[source]
        source: RoomDecodeError,
    },

    #[error("dungeon fails validation: {0}")]
    Dungeon(Violation),

    #[error("player position {0} is outside the dungeon")]
    Position(Position),

    #[error("invalid equipment: {0}")]
    Equipment(CreationError),

    #[error("treasure id {0} is outside 1..=10")]
    TreasureId(u8),

    #[error("mode {mode} does not match the saved session")]
    SessionMismatch { mode: Mode },

    #[error("encounter saved in a room without a monster")]
    NoMonster,

    #[error("encounter with a level {session} monster saved in a room holding level {room}")]
    MonsterMismatch { session: u8, room: u8 },

    #[error("player with {hp} hp saved in a game still in progress")]
    DeadPlayer { hp: i32 },

    #[error("monster level {0} is outside 1..=10")]
    MonsterLevel(u8),
}

/// Engine configuration loading failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
