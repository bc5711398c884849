//! Encounter state machine
//!
//! One session per monster fight. The session owns only the monster's side
//! of the fight; the player and the room are borrowed for each turn.
//!
//! Draw order per turn is fixed so a scripted source can replay it:
//! fight = to-hit roll, damage roll, weapon-break check; counter-attack =
//! dodge roll, damage roll; death = death-throes check, then loot.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use dc_rng::RandomSource;

use super::{attack_score, base_vitality, dodge_score, melee_damage, monster_damage, monster_name};
use crate::dungeon::Room;
use crate::event::{Event, PromptOption};
use crate::player::{Player, SpellKind};
use crate::{DEATH_THROES_THRESHOLD, ESCAPE_THRESHOLD, WEAPON_BREAK_CHANCE};

/// How a turn left the encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterOutcome {
    /// Still fighting; awaiting the next command.
    Continue,
    /// Monster dead and loot awarded.
    MonsterSlain,
    /// Escaped on foot; the caller relocates the player on this floor.
    Fled,
    /// Escaped by spell; the monster is gone and the caller relocates the
    /// player on this floor.
    Teleported,
    PlayerDied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSession {
    monster_level: u8,
    monster_name: String,
    vitality: i32,
    awaiting_spell: bool,
}

impl EncounterSession {
    /// Start a fight with a monster of the given level.
    pub fn begin<R: RandomSource>(
        level: u8,
        player: &mut Player,
        rng: &mut R,
        events: &mut Vec<Event>,
    ) -> Self {
        let session = Self::resume(level, base_vitality(level) + rng.randint(0, 3), false);
        player.reset_combat_flags();

        info!(
            target: "dc_core.encounter",
            level,
            vitality = session.vitality,
            "encounter started"
        );
        events.push(Event::combat(format!(
            "A level {level} {} blocks your way!",
            session.monster_name
        )));
        events.push(session.prompt(player));
        session
    }

    /// Rebuild a session from saved state. The name is derived from the level.
    pub fn resume(level: u8, vitality: i32, awaiting_spell: bool) -> Self {
        Self {
            monster_level: level,
            monster_name: monster_name(level).to_string(),
            vitality,
            awaiting_spell,
        }
    }

    pub fn monster_level(&self) -> u8 {
        self.monster_level
    }

    pub fn monster_name(&self) -> &str {
        &self.monster_name
    }

    pub fn vitality(&self) -> i32 {
        self.vitality
    }

    pub fn awaiting_spell(&self) -> bool {
        self.awaiting_spell
    }

    /// Resolve one command against the monster.
    pub fn handle<R: RandomSource>(
        &mut self,
        command: &str,
        player: &mut Player,
        room: &mut Room,
        rng: &mut R,
        events: &mut Vec<Event>,
    ) -> EncounterOutcome {
        let outcome = if self.awaiting_spell {
            self.select_spell(command, player, room, rng, events)
        } else {
            match command {
                "F" => self.fight(player, room, rng, events),
                "R" => self.run(player, rng, events),
                "S" => {
                    self.awaiting_spell = true;
                    EncounterOutcome::Continue
                }
                _ => {
                    events.push(Event::error(format!("I don't understand \"{command}\".")));
                    EncounterOutcome::Continue
                }
            }
        };

        if outcome == EncounterOutcome::Continue {
            events.push(self.prompt(player));
        }
        outcome
    }

    /// Back out of the spell menu. Returns false if there was nothing to cancel.
    pub fn cancel(&mut self, player: &Player, events: &mut Vec<Event>) -> bool {
        if !self.awaiting_spell {
            return false;
        }
        self.awaiting_spell = false;
        events.push(Event::info("You put your scrolls away."));
        events.push(self.prompt(player));
        true
    }

    /// Menu for the current sub-state.
    pub fn prompt(&self, player: &Player) -> Event {
        if self.awaiting_spell {
            let options = player
                .spells
                .iter()
                .map(|(spell, charges)| {
                    PromptOption::new(spell.digit().to_string(), format!("{spell} ({charges})"))
                        .disabled_if(charges == 0 || !player.can_cast())
                })
                .collect();
            return Event::prompt("Cast which spell?", options, true);
        }

        let options = vec![
            PromptOption::new("F", "Fight"),
            PromptOption::new("R", "Run").disabled_if(player.fatigued),
            PromptOption::new("S", "Spell")
                .disabled_if(!player.can_cast() || player.spells.total() == 0),
        ];
        Event::prompt(
            format!("The {} (vitality {}) faces you.", self.monster_name, self.vitality.max(0)),
            options,
            false,
        )
    }

    fn fight<R: RandomSource>(
        &mut self,
        player: &mut Player,
        room: &mut Room,
        rng: &mut R,
        events: &mut Vec<Event>,
    ) -> EncounterOutcome {
        let roll = rng.randint(1, 100);
        let target = attack_score(self.monster_level, player);
        debug!(target: "dc_core.encounter", roll, target, "player attacks");

        if roll > target {
            events.push(Event::combat(format!("The {} evades your blow.", self.monster_name)));
            return self.counter_attack(player, rng, events);
        }

        let damage = melee_damage(player, rng.randint(0, 4));
        self.vitality -= damage;
        events.push(Event::combat(format!(
            "You hit the {} for {damage} damage.",
            self.monster_name
        )));

        if player.weapon.tier() > 0 && rng.random() < WEAPON_BREAK_CHANCE {
            let name = player.weapon.name();
            player.weapon.break_item();
            events.push(Event::combat(format!("Your {name} shatters!")));
        }

        self.after_damage(player, room, rng, events)
    }

    fn run<R: RandomSource>(
        &mut self,
        player: &mut Player,
        rng: &mut R,
        events: &mut Vec<Event>,
    ) -> EncounterOutcome {
        if player.fatigued {
            events.push(Event::info("You are too exhausted to run."));
            return EncounterOutcome::Continue;
        }

        if rng.random() < ESCAPE_THRESHOLD {
            events.push(Event::info(format!("You flee from the {}!", self.monster_name)));
            return EncounterOutcome::Fled;
        }

        player.fatigued = true;
        events.push(Event::combat(format!(
            "The {} cuts off your escape!",
            self.monster_name
        )));
        self.counter_attack(player, rng, events)
    }

    fn select_spell<R: RandomSource>(
        &mut self,
        command: &str,
        player: &mut Player,
        room: &mut Room,
        rng: &mut R,
        events: &mut Vec<Event>,
    ) -> EncounterOutcome {
        if command == "Q" {
            self.awaiting_spell = false;
            events.push(Event::info("You put your scrolls away."));
            return EncounterOutcome::Continue;
        }

        let Some(spell) = SpellKind::from_digit(command) else {
            events.push(Event::error(format!("I don't understand \"{command}\".")));
            return EncounterOutcome::Continue;
        };

        self.awaiting_spell = false;
        if !player.can_cast() {
            events.push(Event::info("The runes swim before your eyes; you cannot cast."));
            return EncounterOutcome::Continue;
        }
        if !player.spells.consume(spell) {
            events.push(Event::info(format!("You have no {spell} scrolls.")));
            return EncounterOutcome::Continue;
        }

        self.cast(spell, player, room, rng, events)
    }

    fn cast<R: RandomSource>(
        &mut self,
        spell: SpellKind,
        player: &mut Player,
        room: &mut Room,
        rng: &mut R,
        events: &mut Vec<Event>,
    ) -> EncounterOutcome {
        debug!(target: "dc_core.encounter", %spell, "spell cast");
        let name = self.monster_name.clone();

        match spell {
            SpellKind::Protection => {
                player.temp_armor_bonus += 3;
                events.push(Event::combat("A shimmering shield surrounds you."));
                return self.counter_attack(player, rng, events);
            }
            SpellKind::Fireball => {
                let damage = (rng.randint(1, 5) - player.intelligence / 3).max(0);
                self.vitality -= damage;
                events.push(Event::combat(format!(
                    "Your fireball scorches the {name} for {damage} damage."
                )));
            }
            SpellKind::Lightning => {
                let damage = (rng.randint(1, 10) - player.intelligence / 2).max(0);
                self.vitality -= damage;
                events.push(Event::combat(format!(
                    "Lightning strikes the {name} for {damage} damage."
                )));
            }
            SpellKind::Weaken => {
                self.vitality /= 2;
                events.push(Event::combat(format!("The {name} withers and weakens.")));
            }
            SpellKind::Teleport => {
                room.monster_level = 0;
                events.push(Event::info(format!("You vanish, and the {name} is gone.")));
                info!(target: "dc_core.encounter", level = self.monster_level, "teleported away");
                return EncounterOutcome::Teleported;
            }
        }

        self.after_damage(player, room, rng, events)
    }

    fn after_damage<R: RandomSource>(
        &mut self,
        player: &mut Player,
        room: &mut Room,
        rng: &mut R,
        events: &mut Vec<Event>,
    ) -> EncounterOutcome {
        if self.vitality <= 0 {
            self.monster_death(player, room, rng, events)
        } else {
            self.counter_attack(player, rng, events)
        }
    }

    fn counter_attack<R: RandomSource>(
        &self,
        player: &mut Player,
        rng: &mut R,
        events: &mut Vec<Event>,
    ) -> EncounterOutcome {
        let roll = rng.randint(1, 100);
        let target = dodge_score(self.monster_level, player);
        debug!(target: "dc_core.encounter", roll, target, "monster attacks");

        if roll <= target {
            events.push(Event::combat(format!(
                "You dodge the {}'s attack.",
                self.monster_name
            )));
            return EncounterOutcome::Continue;
        }

        let damage = monster_damage(player, rng.randint(0, self.monster_level as i32 - 1));
        if damage == 0 {
            events.push(Event::combat(format!(
                "The {} hits you, but your armor absorbs the blow.",
                self.monster_name
            )));
            return EncounterOutcome::Continue;
        }

        events.push(Event::combat(format!(
            "The {} hits you for {damage} damage.",
            self.monster_name
        )));
        if player.take_damage(damage) {
            info!(target: "dc_core.encounter", level = self.monster_level, "player slain");
            events.push(Event::combat(format!("The {} has killed you.", self.monster_name)));
            return EncounterOutcome::PlayerDied;
        }
        EncounterOutcome::Continue
    }

    fn monster_death<R: RandomSource>(
        &mut self,
        player: &mut Player,
        room: &mut Room,
        rng: &mut R,
        events: &mut Vec<Event>,
    ) -> EncounterOutcome {
        events.push(Event::combat(format!("The {} dies!", self.monster_name)));

        if rng.random() > DEATH_THROES_THRESHOLD {
            events.push(Event::combat(format!(
                "With its dying breath the {} lashes out!",
                self.monster_name
            )));
            if self.counter_attack(player, rng, events) == EncounterOutcome::PlayerDied {
                return EncounterOutcome::PlayerDied;
            }
        }

        if room.has_treasure() {
            let id = room.treasure_id;
            room.treasure_id = 0;
            player.claim_treasure(id, events);
        } else {
            let gold = 5 * self.monster_level as u32 + rng.randint(0, 20) as u32;
            player.gold += gold;
            events.push(Event::loot(format!("You find {gold} gold pieces.")));
        }

        room.monster_level = 0;
        info!(target: "dc_core.encounter", level = self.monster_level, "monster slain");
        EncounterOutcome::MonsterSlain
    }
}
