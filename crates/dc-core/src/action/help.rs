//! Help and map commands

use dc_rng::RandomSource;

use crate::event::{Event, PromptOption};
use crate::gameloop::GameEngine;

/// Exploration commands as `(key, description)`.
pub const HELP_ENTRIES: [(&str, &str); 15] = [
    ("N", "Move north"),
    ("S", "Move south"),
    ("E", "Move east"),
    ("W", "Move west"),
    ("U", "Climb stairs up"),
    ("D", "Descend stairs down"),
    ("F", "Light a flare"),
    ("X", "Leave through the exit"),
    ("L", "Look around"),
    ("O", "Open a chest"),
    ("R", "Read a scroll"),
    ("P", "Drink a potion"),
    ("B", "Buy from a vendor"),
    ("H", "Show this help"),
    ("M", "Show the map of this floor"),
];

impl<R: RandomSource> GameEngine<R> {
    pub(crate) fn do_help(&mut self, events: &mut Vec<Event>) {
        let options = HELP_ENTRIES
            .iter()
            .map(|&(key, label)| PromptOption::new(key, label))
            .collect();
        events.push(Event::prompt("Commands:", options, false));
    }

    pub(crate) fn do_map(&mut self, events: &mut Vec<Event>) {
        events.push(Event::Map(self.map_view(self.player.pos.z)));
    }
}
