//! Structural invariant checks
//!
//! Used by the generation tests and by snapshot restore; never on the hot
//! path of a turn.

use std::collections::BTreeSet;

use thiserror::Error;

use super::{Dungeon, Feature, Position};
use crate::{MAX_MONSTER_LEVEL, ROOM_COUNT, SIZE, TREASURE_COUNT};

/// One broken dungeon invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("expected {expected} rooms, found {found}")]
    RoomCount { expected: usize, found: usize },

    #[error("expected exactly one exit, found {found}")]
    ExitCount { found: usize },

    #[error("exit at {0} is not on the final floor")]
    ExitOffFinalFloor(Position),

    #[error("expected {expected} treasures, found {found}")]
    TreasureCount { expected: usize, found: usize },

    #[error("treasure id {id} appears more than once")]
    DuplicateTreasure { id: u8 },

    #[error("treasure id {id} at {pos} is outside 1..=10")]
    TreasureIdOutOfRange { id: u8, pos: Position },

    #[error("monster level {level} at {pos} is outside 1..=10")]
    MonsterLevelOutOfRange { level: u8, pos: Position },

    #[error("{feature} at {pos} shares the room with a monster or treasure")]
    CrowdedRoom { feature: Feature, pos: Position },

    #[error("floor {floor} has {found} stairways up, expected {expected}")]
    StairsUpCount { floor: usize, found: usize, expected: usize },

    #[error("floor {floor} has {found} stairways down, expected {expected}")]
    StairsDownCount { floor: usize, found: usize, expected: usize },

    #[error("stairway up at {0} has no stairway down above it")]
    UnmatchedStairsUp(Position),

    #[error("stairway down at {0} has no stairway up below it")]
    UnmatchedStairsDown(Position),
}

/// Check every structural invariant. An empty result means the dungeon is valid.
pub fn validate(dungeon: &Dungeon) -> Vec<Violation> {
    validate_in_play(dungeon, &BTreeSet::new())
}

/// Like [`validate`], for a game in progress: treasures already claimed
/// count towards the total and must no longer lie in any room.
pub fn validate_in_play(dungeon: &Dungeon, claimed: &BTreeSet<u8>) -> Vec<Violation> {
    let mut violations = Vec::new();

    if dungeon.rooms().len() != ROOM_COUNT {
        violations.push(Violation::RoomCount {
            expected: ROOM_COUNT,
            found: dungeon.rooms().len(),
        });
        return violations;
    }

    let mut exits = Vec::new();
    let mut treasure_seen = [false; TREASURE_COUNT as usize + 1];
    let mut treasures = 0;
    for &id in claimed {
        if let Some(seen) = treasure_seen.get_mut(id as usize).filter(|_| id != 0) {
            *seen = true;
            treasures += 1;
        }
    }

    for (pos, room) in dungeon.iter() {
        if room.monster_level > MAX_MONSTER_LEVEL {
            violations.push(Violation::MonsterLevelOutOfRange {
                level: room.monster_level,
                pos,
            });
        }

        if room.has_treasure() {
            treasures += 1;
            match treasure_seen.get_mut(room.treasure_id as usize) {
                Some(seen) if *seen => {
                    violations.push(Violation::DuplicateTreasure { id: room.treasure_id })
                }
                Some(seen) => *seen = true,
                None => violations.push(Violation::TreasureIdOutOfRange {
                    id: room.treasure_id,
                    pos,
                }),
            }
        }

        if room.is_occupied() && room.feature != Feature::Empty {
            violations.push(Violation::CrowdedRoom {
                feature: room.feature,
                pos,
            });
        }

        match room.feature {
            Feature::Exit => exits.push(pos),
            Feature::StairsUp => {
                let matched = pos
                    .above()
                    .is_some_and(|above| dungeon.room(above).feature == Feature::StairsDown);
                if !matched {
                    violations.push(Violation::UnmatchedStairsUp(pos));
                }
            }
            Feature::StairsDown => {
                let matched = pos
                    .below()
                    .is_some_and(|below| dungeon.room(below).feature == Feature::StairsUp);
                if !matched {
                    violations.push(Violation::UnmatchedStairsDown(pos));
                }
            }
            _ => {}
        }
    }

    if exits.len() != 1 {
        violations.push(Violation::ExitCount { found: exits.len() });
    }
    for &pos in &exits {
        if pos.z != SIZE - 1 {
            violations.push(Violation::ExitOffFinalFloor(pos));
        }
    }

    if treasures != TREASURE_COUNT as usize {
        violations.push(Violation::TreasureCount {
            expected: TREASURE_COUNT as usize,
            found: treasures,
        });
    }

    for floor in 0..SIZE {
        let count = |feature: Feature| {
            Dungeon::floor_positions(floor)
                .filter(|&p| dungeon.room(p).feature == feature)
                .count()
        };

        let expected_up = usize::from(floor < SIZE - 1);
        let up = count(Feature::StairsUp);
        if up != expected_up {
            violations.push(Violation::StairsUpCount {
                floor,
                found: up,
                expected: expected_up,
            });
        }

        let expected_down = usize::from(floor > 0);
        let down = count(Feature::StairsDown);
        if down != expected_down {
            violations.push(Violation::StairsDownCount {
                floor,
                found: down,
                expected: expected_down,
            });
        }
    }

    violations
}
