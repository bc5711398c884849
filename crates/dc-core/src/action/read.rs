//! Reading scrolls found on the floor

use strum::IntoEnumIterator;
use tracing::debug;

use dc_rng::RandomSource;

use crate::dungeon::Feature;
use crate::event::Event;
use crate::gameloop::GameEngine;
use crate::player::SpellKind;

impl<R: RandomSource> GameEngine<R> {
    /// Learn one charge of a random spell. The scroll crumbles afterwards.
    pub(crate) fn do_read(&mut self, events: &mut Vec<Event>) {
        if !self.require_feature(Feature::Scroll, "There is no scroll here.", events) {
            return;
        }

        let spells: Vec<SpellKind> = SpellKind::iter().collect();
        let Some(&spell) = self.rng.choose(&spells) else {
            return;
        };
        self.player.spells.add(spell, 1);
        self.consume_feature();

        debug!(target: "dc_core.engine", %spell, "scroll read");
        events.push(Event::loot(format!(
            "The scroll teaches you {spell}. It crumbles to dust."
        )));
        if !self.player.can_cast() {
            events.push(Event::info(
                "The runes are hard to follow; you will need more wits to cast it.",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::dungeon::{Dungeon, Feature, Position, Room};
    use crate::gameloop::GameEngine;
    use crate::player::{Player, Race, SpellKind};
    use dc_rng::ScriptedRng;

    #[test]
    fn test_read_grants_charge() {
        let mut dungeon = Dungeon::empty();
        *dungeon.room_mut(Position::new(0, 2, 2)) = Room::with_feature(Feature::Scroll);
        let player = Player::roll(Race::Elf, Position::new(0, 2, 2), &mut ScriptedRng::new([0, 0, 0], []));
        let mut engine =
            GameEngine::with_parts(dungeon, player, EngineConfig::default(), ScriptedRng::new([3], []));

        engine.step("R");
        assert_eq!(engine.player().spells.charges(SpellKind::Weaken), 1);
        assert_eq!(engine.dungeon().room(Position::new(0, 2, 2)).feature, Feature::Empty);

        assert!(engine.step("R").has_error());
    }
}
