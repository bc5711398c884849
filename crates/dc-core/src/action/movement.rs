//! Walking between rooms on a floor

use dc_rng::RandomSource;

use super::Direction;
use crate::event::Event;
use crate::gameloop::GameEngine;

impl<R: RandomSource> GameEngine<R> {
    pub(crate) fn do_move(&mut self, direction: Direction, events: &mut Vec<Event>) {
        let (dy, dx) = direction.delta();
        match self.player.pos.step(dy, dx) {
            Some(next) => {
                self.player.pos = next;
                self.enter_room(events);
            }
            None => events.push(Event::info("You bump into a wall.")),
        }
    }
}
