//! Exploration commands
//!
//! One letter per command. Each submodule resolves one family of commands
//! against the engine.

mod help;
mod level_change;
mod look;
mod movement;
mod open_close;
mod quaff;
mod read;

use dc_rng::RandomSource;
use strum::{Display, EnumIter};

use crate::dungeon::Feature;
use crate::event::Event;
use crate::gameloop::{EngineState, GameEngine};
use crate::shop::VendorSession;

pub use help::HELP_ENTRIES;

/// Compass direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Row and column offset.
    pub const fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }
}

/// Exploration command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Up,
    Down,
    Flare,
    Exit,
    Look,
    Open,
    Read,
    Drink,
    Buy,
    Help,
    Map,
}

impl Command {
    /// Parse an upper-case command letter.
    pub fn parse(input: &str) -> Option<Self> {
        let command = match input {
            "N" => Command::Move(Direction::North),
            "S" => Command::Move(Direction::South),
            "E" => Command::Move(Direction::East),
            "W" => Command::Move(Direction::West),
            "U" => Command::Up,
            "D" => Command::Down,
            "F" => Command::Flare,
            "X" => Command::Exit,
            "L" => Command::Look,
            "O" => Command::Open,
            "R" => Command::Read,
            "P" => Command::Drink,
            "B" => Command::Buy,
            "H" => Command::Help,
            "M" => Command::Map,
            _ => return None,
        };
        Some(command)
    }
}

impl<R: RandomSource> GameEngine<R> {
    pub(crate) fn execute(&mut self, command: Command, events: &mut Vec<Event>) {
        match command {
            Command::Move(direction) => self.do_move(direction, events),
            Command::Up => self.do_up(events),
            Command::Down => self.do_down(events),
            Command::Flare => self.do_flare(events),
            Command::Exit => self.do_exit(events),
            Command::Look => self.do_look(events),
            Command::Open => self.do_open(events),
            Command::Read => self.do_read(events),
            Command::Drink => self.do_drink(events),
            Command::Buy => self.do_buy(events),
            Command::Help => self.do_help(events),
            Command::Map => self.do_map(events),
        }
    }

    /// Check that the current room holds a feature, reporting an error if not.
    pub(crate) fn require_feature(
        &self,
        feature: Feature,
        missing: &str,
        events: &mut Vec<Event>,
    ) -> bool {
        if self.current_feature() == feature {
            return true;
        }
        events.push(Event::error(missing));
        false
    }

    fn do_buy(&mut self, events: &mut Vec<Event>) {
        if !self.require_feature(Feature::Vendor, "There is no vendor here.", events) {
            return;
        }
        let session = VendorSession::open(&self.player, &self.config.prices, events);
        self.state = EngineState::InVendor(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse("N"), Some(Command::Move(Direction::North)));
        assert_eq!(Command::parse("B"), Some(Command::Buy));
        assert_eq!(Command::parse("n"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("NE"), None);
    }

    #[test]
    fn test_directions_are_unit_steps() {
        for direction in Direction::iter() {
            let (dy, dx) = direction.delta();
            assert_eq!(dy.abs() + dx.abs(), 1);
        }
    }
}
