//! Stairs and the exit

use tracing::info;

use dc_rng::RandomSource;

use crate::TREASURE_COUNT;
use crate::dungeon::Feature;
use crate::event::Event;
use crate::gameloop::{GameEngine, Outcome};

impl<R: RandomSource> GameEngine<R> {
    /// Climb to the floor above.
    pub(crate) fn do_up(&mut self, events: &mut Vec<Event>) {
        if !self.require_feature(Feature::StairsUp, "There are no stairs leading up here.", events) {
            return;
        }
        let Some(above) = self.player.pos.above() else {
            events.push(Event::error("The stairs end in solid rock."));
            return;
        };

        info!(target: "dc_core.engine", floor = above.z, "climbed stairs");
        events.push(Event::info("You climb the stairs."));
        self.player.pos = above;
        self.enter_room(events);
    }

    /// Descend to the floor below.
    pub(crate) fn do_down(&mut self, events: &mut Vec<Event>) {
        if !self.require_feature(Feature::StairsDown, "There are no stairs leading down here.", events) {
            return;
        }
        let Some(below) = self.player.pos.below() else {
            events.push(Event::error("The stairs end in solid rock."));
            return;
        };

        info!(target: "dc_core.engine", floor = below.z, "descended stairs");
        events.push(Event::info("You descend the stairs."));
        self.player.pos = below;
        self.enter_room(events);
    }

    /// Leave the dungeon. Without every treasure this ends the game in defeat.
    pub(crate) fn do_exit(&mut self, events: &mut Vec<Event>) {
        if !self.require_feature(Feature::Exit, "There is no exit here.", events) {
            return;
        }

        if self.player.has_all_treasures() {
            self.end(Outcome::Victory, events);
            return;
        }

        let remaining = TREASURE_COUNT as usize - self.player.treasure_count();
        events.push(Event::info(format!(
            "You flee the dungeon with {remaining} treasures still inside. The quest has failed."
        )));
        self.end(Outcome::Abandoned, events);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::dungeon::{Dungeon, Feature, Position, Room};
    use crate::event::{Event, Mode};
    use crate::gameloop::GameEngine;
    use crate::player::{Player, Race};
    use dc_rng::ScriptedRng;

    fn engine_with(dungeon: Dungeon, pos: Position) -> GameEngine<ScriptedRng> {
        let player = Player::roll(Race::Dwarf, pos, &mut ScriptedRng::new([0, 0, 0], []));
        GameEngine::with_parts(dungeon, player, EngineConfig::default(), ScriptedRng::default())
    }

    #[test]
    fn test_stairs_round_trip() {
        let mut dungeon = Dungeon::empty();
        *dungeon.room_mut(Position::new(2, 1, 5)) = Room::with_feature(Feature::StairsUp);
        *dungeon.room_mut(Position::new(3, 1, 5)) = Room::with_feature(Feature::StairsDown);
        let mut engine = engine_with(dungeon, Position::new(2, 1, 5));

        engine.step("U");
        assert_eq!(engine.player().pos, Position::new(3, 1, 5));
        engine.step("D");
        assert_eq!(engine.player().pos, Position::new(2, 1, 5));
    }

    #[test]
    fn test_stairs_need_feature() {
        let mut engine = engine_with(Dungeon::empty(), Position::new(2, 1, 5));
        assert!(engine.step("U").has_error());
        assert!(engine.step("D").has_error());
        assert_eq!(engine.player().pos, Position::new(2, 1, 5));
    }

    #[test]
    fn test_exit_without_treasures() {
        let mut dungeon = Dungeon::empty();
        *dungeon.room_mut(Position::new(6, 0, 0)) = Room::with_feature(Feature::Exit);
        let mut engine = engine_with(dungeon, Position::new(6, 0, 0));

        let result = engine.step("X");
        assert_eq!(result.mode, Mode::GameOver);
        assert!(result.narration().any(|e| e
            .text()
            .is_some_and(|t| t.contains("10 treasures still inside"))));
        assert!(!result.events.iter().any(|e| matches!(e, Event::Status(_))));

        let after = engine.step("N");
        assert!(after.events.is_empty());
        assert_eq!(after.mode, Mode::GameOver);
    }

    #[test]
    fn test_exit_with_all_treasures() {
        let mut dungeon = Dungeon::empty();
        *dungeon.room_mut(Position::new(6, 0, 0)) = Room::with_feature(Feature::Exit);
        let mut engine = engine_with(dungeon, Position::new(6, 0, 0));
        let mut events = Vec::new();
        for id in 1..=10 {
            engine.player.claim_treasure(id, &mut events);
        }

        assert_eq!(engine.step("x").mode, Mode::Victory);
        assert!(engine.attempt_cancel().events.is_empty());
    }
}
