//! Snapshot record
//!
//! A plain serializable picture of a game in progress: the player, every
//! room packed into a `u16`, and the minimal state needed to resume an
//! encounter or vendor visit. Restoring refuses anything structurally
//! broken and clamps the player's numbers back into range.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use dc_rng::RandomSource;

use crate::combat::EncounterSession;
use crate::config::EngineConfig;
use crate::dungeon::{Dungeon, Position, Room, validate_in_play};
use crate::error::SnapshotError;
use crate::event::Mode;
use crate::gameloop::{EngineState, GameEngine, Outcome};
use crate::player::{Equipment, EquipmentSlot, Player, Race, SpellBook, SpellKind};
use crate::shop::{VendorPhase, VendorSession};
use crate::{MAX_MONSTER_LEVEL, ROOM_COUNT, TREASURE_COUNT};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub mode: Mode,
    pub player: PlayerRecord,
    /// Packed rooms in `(z, y, x)` order.
    pub rooms: Vec<u16>,
    pub session: Option<SessionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub pos: Position,
    pub race: Race,
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub hp: i32,
    pub max_hp: i32,
    pub gold: u32,
    pub flares: u32,
    pub treasures: Vec<u8>,
    pub weapon_tier: u8,
    pub weapon_damaged: bool,
    pub armor_tier: u8,
    pub armor_damaged: bool,
    pub spell_charges: [u32; SpellKind::COUNT],
    pub fatigued: bool,
    pub temp_armor_bonus: i32,
}

impl From<&Player> for PlayerRecord {
    fn from(player: &Player) -> Self {
        Self {
            pos: player.pos,
            race: player.race,
            strength: player.strength,
            dexterity: player.dexterity,
            intelligence: player.intelligence,
            hp: player.hp,
            max_hp: player.max_hp,
            gold: player.gold,
            flares: player.flares,
            treasures: player.treasures.iter().copied().collect(),
            weapon_tier: player.weapon.tier(),
            weapon_damaged: player.weapon.damaged,
            armor_tier: player.armor.tier(),
            armor_damaged: player.armor.damaged,
            spell_charges: player.spells.to_array(),
            fatigued: player.fatigued,
            temp_armor_bonus: player.temp_armor_bonus,
        }
    }
}

impl PlayerRecord {
    /// Rebuild the player, rejecting impossible equipment and treasures and
    /// clamping everything else.
    pub fn into_player(self) -> Result<Player, SnapshotError> {
        if !self.pos.in_bounds() {
            return Err(SnapshotError::Position(self.pos));
        }

        let mut weapon =
            Equipment::new(EquipmentSlot::Weapon, self.weapon_tier).map_err(SnapshotError::Equipment)?;
        weapon.damaged = self.weapon_damaged;
        let mut armor =
            Equipment::new(EquipmentSlot::Armor, self.armor_tier).map_err(SnapshotError::Equipment)?;
        armor.damaged = self.armor_damaged;

        let mut treasures = BTreeSet::new();
        for id in self.treasures {
            if id == 0 || id > TREASURE_COUNT {
                return Err(SnapshotError::TreasureId(id));
            }
            treasures.insert(id);
        }

        let mut player = Player {
            pos: self.pos,
            race: self.race,
            strength: self.strength,
            dexterity: self.dexterity,
            intelligence: self.intelligence,
            hp: self.hp,
            max_hp: self.max_hp,
            gold: self.gold,
            flares: self.flares,
            treasures,
            weapon,
            armor,
            spells: SpellBook::from_charges(self.spell_charges),
            fatigued: self.fatigued,
            temp_armor_bonus: self.temp_armor_bonus,
        };
        player.repair();
        Ok(player)
    }
}

/// Resumable sub-session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionRecord {
    Encounter {
        monster_level: u8,
        monster_name: String,
        vitality: i32,
        awaiting_spell: bool,
    },
    Vendor {
        phase: VendorPhase,
    },
}

impl<R: RandomSource> GameEngine<R> {
    pub fn snapshot(&self) -> Snapshot {
        let session = match &self.state {
            EngineState::InEncounter(session) => Some(SessionRecord::Encounter {
                monster_level: session.monster_level(),
                monster_name: session.monster_name().to_string(),
                vitality: session.vitality(),
                awaiting_spell: session.awaiting_spell(),
            }),
            EngineState::InVendor(session) => Some(SessionRecord::Vendor {
                phase: session.phase(),
            }),
            EngineState::Exploring | EngineState::Ended(_) => None,
        };

        Snapshot {
            version: SNAPSHOT_VERSION,
            mode: self.mode(),
            player: PlayerRecord::from(&self.player),
            rooms: self.dungeon.pack(),
            session,
        }
    }

    /// Resume a game from a snapshot.
    pub fn restore(snapshot: Snapshot, config: EngineConfig, rng: R) -> Result<Self, SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::IncompatibleVersion {
                expected: SNAPSHOT_VERSION,
                found: snapshot.version,
            });
        }
        if snapshot.rooms.len() != ROOM_COUNT {
            return Err(SnapshotError::RoomCount {
                expected: ROOM_COUNT,
                found: snapshot.rooms.len(),
            });
        }

        let rooms = snapshot
            .rooms
            .iter()
            .enumerate()
            .map(|(index, &word)| {
                Room::unpack(word).map_err(|source| SnapshotError::Room { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let dungeon = Dungeon::from_rooms(rooms);
        let saved_hp = snapshot.player.hp;
        let player = snapshot.player.into_player()?;
        if !snapshot.mode.is_terminal() && player.is_dead() {
            return Err(SnapshotError::DeadPlayer { hp: saved_hp });
        }
        if let Some(violation) = validate_in_play(&dungeon, &player.treasures).into_iter().next() {
            return Err(SnapshotError::Dungeon(violation));
        }

        let state = restore_state(snapshot.mode, snapshot.session, &dungeon, &player)?;

        info!(
            target: "dc_core.snapshot",
            mode = %snapshot.mode,
            pos = %player.pos,
            treasures = player.treasure_count(),
            "snapshot restored"
        );

        Ok(Self {
            dungeon,
            player,
            state,
            rng,
            config,
        })
    }
}

fn restore_state(
    mode: Mode,
    session: Option<SessionRecord>,
    dungeon: &Dungeon,
    player: &Player,
) -> Result<EngineState, SnapshotError> {
    let state = match (mode, session) {
        (Mode::Explore, None) => EngineState::Exploring,
        (Mode::Explore, Some(SessionRecord::Vendor { phase })) => {
            EngineState::InVendor(VendorSession::resume(phase))
        }
        (
            Mode::Encounter,
            Some(SessionRecord::Encounter {
                monster_level,
                vitality,
                awaiting_spell,
                ..
            }),
        ) => {
            if monster_level == 0 || monster_level > MAX_MONSTER_LEVEL {
                return Err(SnapshotError::MonsterLevel(monster_level));
            }
            let room_level = dungeon.room(player.pos).monster_level;
            if room_level == 0 {
                return Err(SnapshotError::NoMonster);
            }
            if room_level != monster_level {
                return Err(SnapshotError::MonsterMismatch {
                    session: monster_level,
                    room: room_level,
                });
            }
            EngineState::InEncounter(EncounterSession::resume(
                monster_level,
                vitality,
                awaiting_spell,
            ))
        }
        (Mode::Victory, None) => EngineState::Ended(Outcome::Victory),
        (Mode::GameOver, None) if player.is_dead() => EngineState::Ended(Outcome::Died),
        (Mode::GameOver, None) => EngineState::Ended(Outcome::Abandoned),
        (mode, _) => return Err(SnapshotError::SessionMismatch { mode }),
    };
    Ok(state)
}
