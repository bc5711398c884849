//! Game engine
//!
//! Owns the dungeon, the player, the random source and at most one active
//! sub-session. [`GameEngine::step`] routes a command to the encounter or
//! vendor when one is running, and to the exploration commands otherwise.

use core::mem;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use dc_rng::{RandomSource, SeededRng};

use crate::action::Command;
use crate::combat::{EncounterOutcome, EncounterSession};
use crate::config::EngineConfig;
use crate::dungeon::{Dungeon, Feature, Position, generate, random_position};
use crate::event::{Event, Mode, StepResult};
use crate::player::Player;
use crate::shop::{VendorOutcome, VendorSession};
use crate::view::{self, MapView, StatusSummary};

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Left through the exit holding every treasure.
    Victory,
    /// Killed by a monster, a trap or poison.
    Died,
    /// Left through the exit with treasures still missing.
    Abandoned,
}

impl Outcome {
    pub const fn mode(&self) -> Mode {
        match self {
            Outcome::Victory => Mode::Victory,
            Outcome::Died | Outcome::Abandoned => Mode::GameOver,
        }
    }
}

/// What the engine is doing right now. At most one sub-session exists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Exploring,
    InEncounter(EncounterSession),
    InVendor(VendorSession),
    Ended(Outcome),
}

impl EngineState {
    pub const fn mode(&self) -> Mode {
        match self {
            EngineState::Exploring | EngineState::InVendor(_) => Mode::Explore,
            EngineState::InEncounter(_) => Mode::Encounter,
            EngineState::Ended(outcome) => outcome.mode(),
        }
    }
}

pub struct GameEngine<R: RandomSource = SeededRng> {
    pub(crate) dungeon: Dungeon,
    pub(crate) player: Player,
    pub(crate) state: EngineState,
    pub(crate) rng: R,
    pub(crate) config: EngineConfig,
}

impl<R: RandomSource> GameEngine<R> {
    /// Start a new game: generate the dungeon, roll the character, and drop
    /// them into a bare room on the first floor.
    pub fn new(config: EngineConfig, mut rng: R) -> Self {
        let dungeon = generate(&mut rng);
        let mut player = Player::roll(config.race, Position::default(), &mut rng);
        player.pos = starting_position(&dungeon, &mut rng);

        info!(
            target: "dc_core.engine",
            race = %player.race,
            start = %player.pos,
            "new game"
        );
        Self::with_parts(dungeon, player, config, rng)
    }

    /// Assemble an engine from existing parts. The player's room is marked
    /// seen but not entered.
    pub fn with_parts(dungeon: Dungeon, player: Player, config: EngineConfig, rng: R) -> Self {
        let mut engine = Self {
            dungeon,
            player,
            state: EngineState::Exploring,
            rng,
            config,
        };
        if let Some(room) = engine.dungeon.get_mut(engine.player.pos) {
            room.seen = true;
        }
        engine
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    /// A menu (encounter or vendor) is waiting for an answer.
    pub fn needs_input(&self) -> bool {
        matches!(
            self.state,
            EngineState::InEncounter(_) | EngineState::InVendor(_)
        )
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn encounter(&self) -> Option<&EncounterSession> {
        match &self.state {
            EngineState::InEncounter(session) => Some(session),
            _ => None,
        }
    }

    pub fn vendor(&self) -> Option<&VendorSession> {
        match &self.state {
            EngineState::InVendor(session) => Some(session),
            _ => None,
        }
    }

    pub fn map_view(&self, floor: usize) -> MapView {
        view::map_view(&self.dungeon, &self.player, floor)
    }

    pub fn status(&self) -> StatusSummary {
        view::status(&self.player, self.mode())
    }

    /// Apply one player command.
    pub fn step(&mut self, command: &str) -> StepResult {
        if self.mode().is_terminal() {
            return self.result(Vec::new());
        }

        let command = command.trim().to_uppercase();
        let mut events = Vec::new();

        match mem::take(&mut self.state) {
            EngineState::InEncounter(session) => {
                self.continue_encounter(session, &command, &mut events)
            }
            EngineState::InVendor(session) => self.continue_vendor(session, &command, &mut events),
            EngineState::Exploring => self.explore(&command, &mut events),
            ended @ EngineState::Ended(_) => self.state = ended,
        }

        self.finish(events)
    }

    /// Back out of the current menu.
    pub fn attempt_cancel(&mut self) -> StepResult {
        if self.mode().is_terminal() {
            return self.result(Vec::new());
        }

        let mut events = Vec::new();
        let mut closed = false;
        let cancelled = match &mut self.state {
            EngineState::InEncounter(session) => session.cancel(&self.player, &mut events),
            EngineState::InVendor(session) => {
                closed = session.cancel(&self.player, &self.config.prices, &mut events)
                    == VendorOutcome::Closed;
                true
            }
            EngineState::Exploring | EngineState::Ended(_) => false,
        };
        if closed {
            self.state = EngineState::Exploring;
        }
        if !cancelled {
            events.push(Event::error("There is nothing to cancel."));
        }

        self.finish(events)
    }

    fn explore(&mut self, command: &str, events: &mut Vec<Event>) {
        match Command::parse(command) {
            Some(command) => self.execute(command, events),
            None => events.push(Event::error(format!(
                "I don't understand \"{command}\". Press H for help."
            ))),
        }
    }

    fn continue_encounter(
        &mut self,
        mut session: EncounterSession,
        command: &str,
        events: &mut Vec<Event>,
    ) {
        let room = self.dungeon.room_mut(self.player.pos);
        let outcome = session.handle(command, &mut self.player, room, &mut self.rng, events);
        debug!(target: "dc_core.engine", ?outcome, "encounter turn");

        match outcome {
            EncounterOutcome::Continue => self.state = EngineState::InEncounter(session),
            EncounterOutcome::MonsterSlain => self.state = EngineState::Exploring,
            EncounterOutcome::Fled | EncounterOutcome::Teleported => {
                self.relocate(Some(self.player.pos.z), events);
                self.enter_room(events);
            }
            EncounterOutcome::PlayerDied => self.end(Outcome::Died, events),
        }
    }

    fn continue_vendor(&mut self, mut session: VendorSession, command: &str, events: &mut Vec<Event>) {
        let outcome = session.handle(
            command,
            &mut self.player,
            &self.config.prices,
            &mut self.rng,
            events,
        );
        if outcome == VendorOutcome::Continue {
            self.state = EngineState::InVendor(session);
        }
    }

    /// Resolve walking into the player's current room.
    pub(crate) fn enter_room(&mut self, events: &mut Vec<Event>) {
        let pos = self.player.pos;
        let room = {
            let room = self.dungeon.room_mut(pos);
            room.seen = true;
            *room
        };
        debug!(target: "dc_core.engine", %pos, feature = %room.feature, "room entered");
        self.debug_event(events, || format!("enter {pos}: {room:?}"));

        events.push(Event::info(format!("You are on {pos}.")));
        if room.has_monster() {
            let session =
                EncounterSession::begin(room.monster_level, &mut self.player, &mut self.rng, events);
            self.state = EngineState::InEncounter(session);
            return;
        }

        events.push(Event::info(format!("You see {}.", room.feature.description())));
        if room.has_treasure() {
            self.dungeon.room_mut(pos).treasure_id = 0;
            self.player.claim_treasure(room.treasure_id, events);
        }

        match room.feature {
            Feature::Flares => {
                let found = self.rng.randint(1, 5) as u32;
                self.player.flares += found;
                self.consume_feature();
                events.push(Event::loot(format!("You pick up {found} flares.")));
            }
            Feature::Thief => {
                self.consume_feature();
                if self.player.gold > 0 {
                    let stolen = self.rng.randint(1, self.player.gold as i32) as u32;
                    self.player.gold -= stolen;
                    events.push(Event::info(format!(
                        "The thief snatches {stolen} gold and vanishes!"
                    )));
                } else {
                    events.push(Event::info("The thief finds your purse empty and slinks away."));
                }
            }
            Feature::Warp => {
                self.consume_feature();
                events.push(Event::info("The warp seizes you and flings you elsewhere!"));
                self.relocate(None, events);
                self.enter_room(events);
            }
            _ => {}
        }
    }

    /// Move the player to a different random room, on the given floor or on
    /// any floor.
    pub(crate) fn relocate(&mut self, floor: Option<usize>, events: &mut Vec<Event>) {
        let from = self.player.pos;
        let to = loop {
            let candidate = random_position(&mut self.rng, floor);
            if candidate != from {
                break candidate;
            }
        };
        self.player.pos = to;
        debug!(target: "dc_core.engine", %from, %to, "relocated");
        self.debug_event(events, || format!("relocate {from} -> {to}"));
    }

    /// Replace the current room's feature with nothing.
    pub(crate) fn consume_feature(&mut self) {
        self.dungeon.room_mut(self.player.pos).feature = Feature::Empty;
    }

    pub(crate) fn current_feature(&self) -> Feature {
        self.dungeon.room(self.player.pos).feature
    }

    pub(crate) fn end(&mut self, outcome: Outcome, events: &mut Vec<Event>) {
        info!(
            target: "dc_core.engine",
            ?outcome,
            treasures = self.player.treasure_count(),
            "game over"
        );
        match outcome {
            Outcome::Victory => events.push(Event::info(
                "You step into the daylight with every treasure. You have won!",
            )),
            Outcome::Died => events.push(Event::info("You have died. The dungeon claims another soul.")),
            Outcome::Abandoned => {}
        }
        self.state = EngineState::Ended(outcome);
    }

    fn debug_event(&self, events: &mut Vec<Event>, message: impl FnOnce() -> String) {
        if self.config.debug_events {
            events.push(Event::Debug(message()));
        }
    }

    fn finish(&self, mut events: Vec<Event>) -> StepResult {
        if !self.mode().is_terminal() {
            events.push(Event::Status(self.status()));
        }
        self.result(events)
    }

    fn result(&self, events: Vec<Event>) -> StepResult {
        StepResult {
            events,
            mode: self.mode(),
            needs_input: self.needs_input(),
        }
    }
}

/// A bare room on the first floor, or the first room if there is none.
fn starting_position<R: RandomSource>(dungeon: &Dungeon, rng: &mut R) -> Position {
    let candidates: Vec<Position> = Dungeon::floor_positions(0)
        .filter(|&pos| dungeon.room(pos).is_bare())
        .collect();
    rng.choose(&candidates)
        .copied()
        .unwrap_or_else(|| Position::new(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{Room, validate};
    use crate::player::Race;
    use dc_rng::ScriptedRng;

    fn explorer(pos: Position) -> Player {
        Player::roll(Race::Human, pos, &mut ScriptedRng::new([0, 0, 0], []))
    }

    fn engine(dungeon: Dungeon, pos: Position, rng: ScriptedRng) -> GameEngine<ScriptedRng> {
        GameEngine::with_parts(dungeon, explorer(pos), EngineConfig::default(), rng)
    }

    #[test]
    fn test_new_game_starts_in_bare_room() {
        let engine = GameEngine::new(EngineConfig::default(), SeededRng::new(7));
        let pos = engine.player().pos;
        assert_eq!(pos.z, 0);
        assert!(engine.dungeon().room(pos).seen);
        assert!(validate(engine.dungeon()).is_empty());
        assert_eq!(engine.mode(), Mode::Explore);
        assert!(!engine.needs_input());
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = GameEngine::new(EngineConfig::default(), SeededRng::new(99));
        let mut b = GameEngine::new(EngineConfig::default(), SeededRng::new(99));
        for cmd in ["N", "E", "E", "S", "F", "W"] {
            assert_eq!(a.step(cmd), b.step(cmd));
        }
        assert_eq!(a.player(), b.player());
    }

    #[test]
    fn test_wall_blocks_movement() {
        let mut engine = engine(Dungeon::empty(), Position::new(0, 0, 0), ScriptedRng::default());
        let result = engine.step("n");

        assert_eq!(engine.player().pos, Position::new(0, 0, 0));
        assert!(!result.has_error());
        assert!(result.narration().any(|e| e.text() == Some("You bump into a wall.")));
        assert!(matches!(result.events.last(), Some(Event::Status(_))));
    }

    #[test]
    fn test_unknown_command() {
        let mut engine = engine(Dungeon::empty(), Position::new(0, 3, 3), ScriptedRng::default());
        let before = engine.player().clone();
        let result = engine.step("zz");
        assert!(result.has_error());
        assert_eq!(engine.player(), &before);
    }

    #[test]
    fn test_monster_preempts_treasure() {
        let mut dungeon = Dungeon::empty();
        *dungeon.room_mut(Position::new(0, 3, 4)) = Room {
            monster_level: 1,
            treasure_id: 5,
            ..Room::default()
        };
        let mut engine = engine(dungeon, Position::new(0, 3, 3), ScriptedRng::new([0], []));

        let result = engine.step("E");
        assert_eq!(result.mode, Mode::Encounter);
        assert!(result.needs_input);
        assert_eq!(engine.player().treasure_count(), 0);
        assert_eq!(engine.encounter().map(|s| s.vitality()), Some(3));
    }

    #[test]
    fn test_flee_relocates_on_same_floor() {
        let mut dungeon = Dungeon::empty();
        *dungeon.room_mut(Position::new(2, 3, 4)) = Room {
            monster_level: 4,
            ..Room::default()
        };
        // vitality roll, then run succeeds, then relocation y, x
        let rng = ScriptedRng::new([0, 1, 1], [0.1]);
        let mut engine = engine(dungeon, Position::new(2, 3, 3), rng);

        engine.step("E");
        let result = engine.step("R");
        assert_eq!(result.mode, Mode::Explore);
        assert_eq!(engine.player().pos, Position::new(2, 1, 1));
        assert_eq!(engine.dungeon().room(Position::new(2, 3, 4)).monster_level, 4);
    }

    #[test]
    fn test_flares_found_on_entry() {
        let mut dungeon = Dungeon::empty();
        *dungeon.room_mut(Position::new(0, 4, 3)) = Room::with_feature(Feature::Flares);
        let mut engine = engine(dungeon, Position::new(0, 3, 3), ScriptedRng::new([4], []));

        engine.step("S");
        assert_eq!(engine.player().flares, 7);
        assert_eq!(engine.current_feature(), Feature::Empty);
    }

    #[test]
    fn test_thief_steals() {
        let mut dungeon = Dungeon::empty();
        *dungeon.room_mut(Position::new(0, 3, 2)) = Room::with_feature(Feature::Thief);
        let mut engine = engine(dungeon, Position::new(0, 3, 3), ScriptedRng::new([45], []));

        engine.step("W");
        assert_eq!(engine.player().gold, 15);
        assert_eq!(engine.current_feature(), Feature::Empty);
    }

    #[test]
    fn test_debug_events() {
        let config = EngineConfig {
            debug_events: true,
            ..EngineConfig::default()
        };
        let mut engine = GameEngine::with_parts(
            Dungeon::empty(),
            explorer(Position::new(0, 3, 3)),
            config,
            ScriptedRng::default(),
        );
        let result = engine.step("E");
        assert!(result.events.iter().any(|e| matches!(e, Event::Debug(_))));
    }

    #[test]
    fn test_nothing_to_cancel() {
        let mut engine = engine(Dungeon::empty(), Position::new(0, 3, 3), ScriptedRng::default());
        assert!(engine.attempt_cancel().has_error());
    }
}
