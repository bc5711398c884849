//! Drinking potions found on the floor

use dc_rng::RandomSource;

use crate::dungeon::Feature;
use crate::event::Event;
use crate::gameloop::{GameEngine, Outcome};

/// Below this the potion heals; otherwise it is poison.
const HEALING_CHANCE: f64 = 0.5;

impl<R: RandomSource> GameEngine<R> {
    pub(crate) fn do_drink(&mut self, events: &mut Vec<Event>) {
        if !self.require_feature(Feature::Potion, "There is no potion here.", events) {
            return;
        }
        self.consume_feature();

        if self.rng.random() < HEALING_CHANCE {
            let restored = self.player.heal(self.rng.randint(1, 10));
            events.push(Event::info(format!(
                "A warm glow spreads through you. You recover {restored} hp."
            )));
            return;
        }

        let damage = self.rng.randint(1, 3);
        events.push(Event::combat(format!("Poison! You take {damage} damage.")));
        if self.player.take_damage(damage) {
            self.end(Outcome::Died, events);
        }
    }
}
