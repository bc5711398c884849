//! Combat system
//!
//! Monster naming and the hit/dodge/damage formulas shared by every
//! encounter turn. The turn state machine itself lives in [`encounter`].

mod encounter;

pub use encounter::{EncounterOutcome, EncounterSession};

use crate::MAX_MONSTER_LEVEL;
use crate::player::Player;

const MONSTER_NAMES: [&str; MAX_MONSTER_LEVEL as usize] = [
    "Kobold", "Goblin", "Orc", "Gnoll", "Troll", "Ogre", "Minotaur", "Chimera", "Balrog", "Dragon",
];

/// Name of a monster of the given level (clamped to 1..=10).
pub fn monster_name(level: u8) -> &'static str {
    let idx = level.clamp(1, MAX_MONSTER_LEVEL) as usize - 1;
    MONSTER_NAMES[idx]
}

/// Starting vitality before the `U(0,3)` bonus.
pub const fn base_vitality(level: u8) -> i32 {
    3 * level as i32
}

/// Percentile the player must roll at or under to land a blow.
pub const fn attack_score(level: u8, player: &Player) -> i32 {
    20 + 5 * (11 - level as i32) + player.dexterity + 3 * player.weapon.bonus()
}

/// Percentile at or under which the player dodges a monster's blow.
pub const fn dodge_score(level: u8, player: &Player) -> i32 {
    20 + 5 * (11 - level as i32) + 2 * player.dexterity
}

/// Melee damage before the floor of 1, given the `U(0,4)` roll.
pub const fn melee_damage(player: &Player, roll: i32) -> i32 {
    let raw = player.weapon.bonus() + player.strength / 3 + roll - 2;
    if raw < 1 { 1 } else { raw }
}

/// Monster damage after armor, given the `U(0, level-1)` roll.
pub const fn monster_damage(player: &Player, roll: i32) -> i32 {
    let raw = roll + 3 - player.armor_total();
    if raw < 0 { 0 } else { raw }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::Position;
    use crate::player::{Allocation, Race};

    fn fixture() -> Player {
        // Human 8/8/8 + 4/2/2 -> 12 str, 10 dex, 10 iq
        let alloc = Allocation {
            strength: 4,
            dexterity: 2,
            intelligence: 2,
        };
        Player::allocate(Race::Human, alloc, 1, Position::default()).unwrap()
    }

    #[test]
    fn test_monster_names() {
        assert_eq!(monster_name(1), "Kobold");
        assert_eq!(monster_name(5), "Troll");
        assert_eq!(monster_name(10), "Dragon");
        assert_eq!(monster_name(0), "Kobold");
        assert_eq!(monster_name(42), "Dragon");
    }

    #[test]
    fn test_scores() {
        let player = fixture();
        assert_eq!(attack_score(5, &player), 20 + 30 + 10 + 3);
        assert_eq!(dodge_score(5, &player), 20 + 30 + 20);
        assert_eq!(attack_score(10, &player), 20 + 5 + 10 + 3);
    }

    #[test]
    fn test_damage_floors() {
        let mut player = fixture();
        assert_eq!(melee_damage(&player, 0), 1 + 4 - 2);
        player.weapon.break_item();
        player.strength = 1;
        assert_eq!(melee_damage(&player, 0), 1);

        player.armor.equip(3);
        player.temp_armor_bonus = 3;
        assert_eq!(monster_damage(&player, 2), 0);
    }
}
