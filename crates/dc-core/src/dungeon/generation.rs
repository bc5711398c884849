//! Dungeon generation
//!
//! Seeds every room independently, then layers the structural passes on
//! top: treasures, stair pairs, and finally the exit. Placement uses
//! rejection sampling; the grid is sparse enough that a valid candidate
//! turns up quickly.

use tracing::debug;

use dc_rng::RandomSource;

use super::{Dungeon, Feature, Position, Room};
use crate::{MAX_MONSTER_LEVEL, SIZE, TREASURE_COUNT};

/// Probability that a room is left empty during seeding.
const EMPTY_ROOM_CHANCE: f64 = 0.7;

/// Generate a complete dungeon.
pub fn generate<R: RandomSource>(rng: &mut R) -> Dungeon {
    let mut dungeon = Dungeon::empty();

    seed_rooms(&mut dungeon, rng);
    place_treasures(&mut dungeon, rng);
    place_stairs(&mut dungeon, rng);
    place_exit(&mut dungeon, rng);

    debug!(
        target: "dc_core.generation",
        treasures = dungeon.treasure_total(),
        monsters = dungeon.rooms().iter().filter(|r| r.has_monster()).count(),
        "dungeon generated"
    );
    dungeon
}

/// Uniformly random position, on the given floor or on any floor.
pub fn random_position<R: RandomSource>(rng: &mut R, floor: Option<usize>) -> Position {
    let z = match floor {
        Some(z) => z,
        None => rng.randint(0, SIZE as i32 - 1) as usize,
    };
    let y = rng.randint(0, SIZE as i32 - 1) as usize;
    let x = rng.randint(0, SIZE as i32 - 1) as usize;
    Position::new(z, y, x)
}

fn seed_rooms<R: RandomSource>(dungeon: &mut Dungeon, rng: &mut R) {
    for z in 0..SIZE {
        for pos in Dungeon::floor_positions(z) {
            if rng.random() < EMPTY_ROOM_CHANCE {
                continue;
            }

            let roll = rng.randint(1, 10);
            let room = dungeon.room_mut(pos);
            if roll >= 9 {
                // Deeper floors draw from a harder band of monsters.
                let lo = z as i32 + 1;
                let hi = (z as i32 + 6).min(MAX_MONSTER_LEVEL as i32);
                room.monster_level = rng.randint(lo, hi) as u8;
            } else if let Some(feature) = Feature::from_code(roll as u8) {
                room.feature = feature;
            }
        }
    }
}

fn place_treasures<R: RandomSource>(dungeon: &mut Dungeon, rng: &mut R) {
    let mut id = 1;
    while id <= TREASURE_COUNT {
        let pos = random_position(rng, None);
        let room = dungeon.room_mut(pos);
        if room.feature == Feature::Empty && !room.has_treasure() {
            room.treasure_id = id;
            id += 1;
        }
    }
}

fn place_stairs<R: RandomSource>(dungeon: &mut Dungeon, rng: &mut R) {
    for z in 0..SIZE - 1 {
        loop {
            let pos = random_position(rng, Some(z));
            let upper = Position::new(z + 1, pos.y, pos.x);
            let here = dungeon.room(pos);
            let there = dungeon.room(upper);
            if here.is_occupied() || there.is_occupied() || here.feature == Feature::StairsDown {
                continue;
            }

            *dungeon.room_mut(pos) = Room::with_feature(Feature::StairsUp);
            *dungeon.room_mut(upper) = Room::with_feature(Feature::StairsDown);
            break;
        }
    }
}

fn place_exit<R: RandomSource>(dungeon: &mut Dungeon, rng: &mut R) {
    let top = SIZE - 1;
    loop {
        let pos = random_position(rng, Some(top));
        let room = dungeon.room(pos);
        if room.is_occupied() || room.feature.is_structural() {
            continue;
        }
        *dungeon.room_mut(pos) = Room::with_feature(Feature::Exit);
        break;
    }
}
