//! Read-only projections for front ends

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::SIZE;
use crate::dungeon::{Dungeon, Position};
use crate::event::Mode;
use crate::player::{Player, Race, SpellKind};

pub const UNSEEN_SYMBOL: char = '?';
pub const PLAYER_SYMBOL: char = '@';
pub const MONSTER_SYMBOL: char = 'M';
pub const TREASURE_SYMBOL: char = '$';

/// One floor as rows of map symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapView {
    pub floor: usize,
    pub rows: Vec<String>,
}

impl fmt::Display for MapView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Floor {}", self.floor + 1)?;
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Player status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub mode: Mode,
    pub race: Race,
    pub position: Position,
    pub hp: i32,
    pub max_hp: i32,
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub gold: u32,
    pub flares: u32,
    pub treasures: usize,
    pub weapon: String,
    pub armor: String,
    /// Charges in spell menu order.
    pub spell_charges: [u32; SpellKind::COUNT],
}

/// Render a floor. Unseen rooms show `?`; the player's room shows `@`.
pub fn map_view(dungeon: &Dungeon, player: &Player, floor: usize) -> MapView {
    let floor = floor.min(SIZE - 1);
    let rows = (0..SIZE)
        .map(|y| {
            (0..SIZE)
                .map(|x| {
                    let pos = Position::new(floor, y, x);
                    let room = dungeon.room(pos);
                    if pos == player.pos {
                        PLAYER_SYMBOL
                    } else if !room.seen {
                        UNSEEN_SYMBOL
                    } else if room.has_monster() {
                        MONSTER_SYMBOL
                    } else if room.has_treasure() {
                        TREASURE_SYMBOL
                    } else {
                        room.feature.symbol()
                    }
                })
                .collect()
        })
        .collect();
    MapView { floor, rows }
}

pub fn status(player: &Player, mode: Mode) -> StatusSummary {
    StatusSummary {
        mode,
        race: player.race,
        position: player.pos,
        hp: player.hp,
        max_hp: player.max_hp,
        strength: player.strength,
        dexterity: player.dexterity,
        intelligence: player.intelligence,
        gold: player.gold,
        flares: player.flares,
        treasures: player.treasure_count(),
        weapon: player.weapon.name().to_string(),
        armor: player.armor.name().to_string(),
        spell_charges: player.spells.to_array(),
    }
}
