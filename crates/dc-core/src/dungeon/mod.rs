//! Dungeon system
//!
//! The dungeon is a cube of `SIZE` floors, each `SIZE` rows by `SIZE`
//! columns. Floor 0 is where the player starts; the exit sits on the final
//! floor. Stairs-up on floor `z` lands on stairs-down at the same row and
//! column of floor `z + 1`.

mod generation;
mod room;
mod validate;

use core::fmt;

use serde::{Deserialize, Serialize};

pub use generation::{generate, random_position};
pub use room::{Feature, Room};
pub use validate::{Violation, validate, validate_in_play};

use crate::{ROOM_COUNT, SIZE};

/// Room coordinates: floor, row, column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub z: usize,
    pub y: usize,
    pub x: usize,
}

impl Position {
    pub const fn new(z: usize, y: usize, x: usize) -> Self {
        Self { z, y, x }
    }

    pub const fn in_bounds(&self) -> bool {
        self.z < SIZE && self.y < SIZE && self.x < SIZE
    }

    /// Flat index into the room vector.
    pub const fn index(&self) -> usize {
        (self.z * SIZE + self.y) * SIZE + self.x
    }

    pub const fn from_index(index: usize) -> Self {
        Self {
            z: index / (SIZE * SIZE),
            y: (index / SIZE) % SIZE,
            x: index % SIZE,
        }
    }

    /// Neighbour one step in a compass direction, if still inside the grid.
    pub fn step(&self, dy: i32, dx: i32) -> Option<Self> {
        let y = self.y as i32 + dy;
        let x = self.x as i32 + dx;
        if y < 0 || x < 0 || y >= SIZE as i32 || x >= SIZE as i32 {
            return None;
        }
        Some(Self {
            z: self.z,
            y: y as usize,
            x: x as usize,
        })
    }

    pub const fn above(&self) -> Option<Self> {
        if self.z + 1 < SIZE {
            Some(Self::new(self.z + 1, self.y, self.x))
        } else {
            None
        }
    }

    pub const fn below(&self) -> Option<Self> {
        if self.z > 0 {
            Some(Self::new(self.z - 1, self.y, self.x))
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "floor {}, row {}, column {}", self.z + 1, self.y + 1, self.x + 1)
    }
}

/// The full room grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dungeon {
    rooms: Vec<Room>,
}

impl Default for Dungeon {
    fn default() -> Self {
        Self::empty()
    }
}

impl Dungeon {
    /// A dungeon of bare rooms, before any placement pass.
    pub fn empty() -> Self {
        Self {
            rooms: vec![Room::default(); ROOM_COUNT],
        }
    }

    /// Wrap an arbitrary room vector. Nothing is checked here; run
    /// [`validate`] before trusting it.
    pub fn from_rooms(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, pos: Position) -> &Room {
        &self.rooms[pos.index()]
    }

    pub fn room_mut(&mut self, pos: Position) -> &mut Room {
        &mut self.rooms[pos.index()]
    }

    pub fn get(&self, pos: Position) -> Option<&Room> {
        if !pos.in_bounds() {
            return None;
        }
        self.rooms.get(pos.index())
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Room> {
        if !pos.in_bounds() {
            return None;
        }
        self.rooms.get_mut(pos.index())
    }

    /// Every position paired with its room, in `(z, y, x)` order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Room)> {
        self.rooms
            .iter()
            .enumerate()
            .map(|(i, room)| (Position::from_index(i), room))
    }

    /// Positions on one floor, row-major.
    pub fn floor_positions(floor: usize) -> impl Iterator<Item = Position> {
        (0..SIZE).flat_map(move |y| (0..SIZE).map(move |x| Position::new(floor, y, x)))
    }

    /// First room on a floor carrying the given feature.
    pub fn find_feature(&self, floor: usize, feature: Feature) -> Option<Position> {
        Self::floor_positions(floor).find(|&p| self.room(p).feature == feature)
    }

    pub fn treasure_total(&self) -> usize {
        self.rooms.iter().filter(|r| r.has_treasure()).count()
    }

    pub fn pack(&self) -> Vec<u16> {
        self.rooms.iter().map(Room::pack).collect()
    }
}
