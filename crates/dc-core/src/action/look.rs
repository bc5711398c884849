//! Looking around, mirrors and flares

use dc_rng::RandomSource;

use crate::SIZE;
use crate::combat::monster_name;
use crate::dungeon::{Feature, Position, Room, random_position};
use crate::event::Event;
use crate::gameloop::GameEngine;

impl<R: RandomSource> GameEngine<R> {
    /// Describe the room. A mirror also shows a distant room.
    pub(crate) fn do_look(&mut self, events: &mut Vec<Event>) {
        let pos = self.player.pos;
        let room = *self.dungeon.room(pos);
        events.push(Event::info(format!(
            "You are on {pos}. You see {}.",
            room.feature.description()
        )));

        if room.feature != Feature::Mirror {
            return;
        }

        let vision = random_position(&mut self.rng, None);
        let seen = self.dungeon.room_mut(vision);
        seen.seen = true;
        events.push(Event::info(format!(
            "The mirror clouds over, then shows {vision}: {}.",
            glimpse(seen)
        )));
    }

    /// Light a flare, revealing the neighbouring rooms on this floor.
    pub(crate) fn do_flare(&mut self, events: &mut Vec<Event>) {
        if self.player.flares == 0 {
            events.push(Event::error("You have no flares left."));
            return;
        }
        self.player.flares -= 1;

        let pos = self.player.pos;
        for y in pos.y.saturating_sub(1)..=(pos.y + 1).min(SIZE - 1) {
            for x in pos.x.saturating_sub(1)..=(pos.x + 1).min(SIZE - 1) {
                self.dungeon.room_mut(Position::new(pos.z, y, x)).seen = true;
            }
        }

        events.push(Event::info("The flare bursts into light, revealing the rooms around you."));
        events.push(Event::Map(self.map_view(pos.z)));
    }
}

fn glimpse(room: &Room) -> String {
    if room.has_monster() {
        format!("a level {} {}", room.monster_level, monster_name(room.monster_level))
    } else if room.has_treasure() {
        format!("a glittering treasure (#{})", room.treasure_id)
    } else {
        room.feature.description().to_string()
    }
}
