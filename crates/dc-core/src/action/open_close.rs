//! Opening chests

use tracing::debug;

use dc_rng::RandomSource;

use crate::dungeon::Feature;
use crate::event::Event;
use crate::gameloop::{GameEngine, Outcome};

/// Chance that a chest is trapped.
const CHEST_TRAP_CHANCE: f64 = 0.3;

impl<R: RandomSource> GameEngine<R> {
    pub(crate) fn do_open(&mut self, events: &mut Vec<Event>) {
        if !self.require_feature(Feature::Chest, "There is no chest here.", events) {
            return;
        }
        self.consume_feature();

        if self.rng.random() < CHEST_TRAP_CHANCE {
            let damage = self.rng.randint(1, 5);
            debug!(target: "dc_core.engine", damage, "chest trap");
            events.push(Event::combat(format!(
                "A needle springs from the lock! You take {damage} damage."
            )));
            if self.player.take_damage(damage) {
                self.end(Outcome::Died, events);
            }
            return;
        }

        let gold = self.rng.randint(5, 30) as u32;
        self.player.gold += gold;
        events.push(Event::loot(format!("The chest holds {gold} gold pieces.")));
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::dungeon::{Dungeon, Feature, Position, Room};
    use crate::event::Mode;
    use crate::gameloop::GameEngine;
    use crate::player::{Player, Race};
    use dc_rng::ScriptedRng;

    fn chest_engine(rng: ScriptedRng) -> GameEngine<ScriptedRng> {
        let mut dungeon = Dungeon::empty();
        *dungeon.room_mut(Position::new(0, 0, 0)) = Room::with_feature(Feature::Chest);
        let player = Player::roll(Race::Human, Position::new(0, 0, 0), &mut ScriptedRng::new([0, 0, 0], []));
        GameEngine::with_parts(dungeon, player, EngineConfig::default(), rng)
    }

    #[test]
    fn test_chest_gold() {
        let mut engine = chest_engine(ScriptedRng::new([12], [0.3]));
        engine.step("O");
        assert_eq!(engine.player().gold, 72);
        assert!(engine.step("O").has_error());
    }

    #[test]
    fn test_chest_trap_can_kill() {
        let mut engine = chest_engine(ScriptedRng::new([5], [0.1]));
        engine.player.hp = 4;
        let result = engine.step("O");
        assert_eq!(result.mode, Mode::GameOver);
        assert_eq!(engine.player().hp, -1);
    }
}
