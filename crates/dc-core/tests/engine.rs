use dc_core::config::EngineConfig;
use dc_core::dungeon::{Dungeon, Feature, Position, Room, validate_in_play};
use dc_core::event::{Event, Mode};
use dc_core::player::{Allocation, Player, Race};
use dc_core::shop::{ShopCategory, VendorPhase};
use dc_core::snapshot::{SessionRecord, Snapshot};
use dc_core::{EngineState, GameEngine, Outcome, ScriptedRng, SeededRng};
use proptest::prelude::*;

/// Human with 12 str, 10 dex, 10 iq, a dagger and chainmail.
fn fighter(pos: Position) -> Player {
    let alloc = Allocation {
        strength: 4,
        dexterity: 2,
        intelligence: 2,
    };
    let mut player = Player::allocate(Race::Human, alloc, 1, pos).unwrap();
    player.armor.equip(3);
    player
}

fn scripted(dungeon: Dungeon, player: Player, rng: ScriptedRng) -> GameEngine<ScriptedRng> {
    GameEngine::with_parts(dungeon, player, EngineConfig::default(), rng)
}

/// A real game, rewritten so the player stands in an encounter with a
/// monster of the given level and vitality.
fn encounter_snapshot(level: u8, vitality: i32) -> Snapshot {
    let engine = GameEngine::new(EngineConfig::default(), SeededRng::new(5));
    let mut snapshot = engine.snapshot();

    let index = engine
        .dungeon()
        .iter()
        .find(|(pos, room)| room.is_bare() && *pos != engine.player().pos)
        .map(|(pos, _)| pos.index())
        .unwrap();
    snapshot.rooms[index] = Room {
        monster_level: level,
        seen: true,
        ..Room::default()
    }
    .pack();

    let mut player = fighter(Position::from_index(index));
    player.gold = snapshot.player.gold;
    snapshot.player = (&player).into();
    snapshot.mode = Mode::Encounter;
    snapshot.session = Some(SessionRecord::Encounter {
        monster_level: level,
        monster_name: String::new(),
        vitality,
        awaiting_spell: false,
    });
    snapshot
}

#[test]
fn test_combat_is_deterministic() {
    let mut dungeon = Dungeon::empty();
    *dungeon.room_mut(Position::new(0, 3, 4)) = Room {
        monster_level: 5,
        ..Room::default()
    };
    let rng = ScriptedRng::new([2, 90, 90, 3], []);
    let mut engine = scripted(dungeon, fighter(Position::new(0, 3, 3)), rng);

    let entered = engine.step("E");
    assert_eq!(entered.mode, Mode::Encounter);
    assert!(entered.needs_input);

    let result = engine.step("F");
    let combat: Vec<&str> = result
        .events
        .iter()
        .filter(|e| matches!(e, Event::Combat(_)))
        .filter_map(Event::text)
        .collect();
    assert_eq!(
        combat,
        vec!["The Troll evades your blow.", "The Troll hits you for 3 damage."]
    );
    assert_eq!(engine.player().hp, 11);
    assert_eq!(engine.encounter().map(|s| s.vitality()), Some(17));
    assert_eq!(result.mode, Mode::Encounter);
}

#[test]
fn test_kill_and_loot() {
    let snapshot = encounter_snapshot(5, 3);
    let pos = snapshot.player.pos;
    let rng = ScriptedRng::new([10, 1, 7], [0.1, 0.1]);
    let mut engine = GameEngine::restore(snapshot, EngineConfig::default(), rng).unwrap();
    let gold = engine.player().gold;

    let result = engine.step("F");
    assert_eq!(result.mode, Mode::Explore);
    assert!(!result.needs_input);
    assert_eq!(engine.player().gold, gold + 32);
    assert!(!engine.dungeon().room(pos).has_monster());
    assert!(engine.rng_mut().is_exhausted());
}

#[test]
fn test_run_boundary() {
    let rng = ScriptedRng::new([1], [0.4]);
    let mut engine = GameEngine::restore(encounter_snapshot(3, 9), EngineConfig::default(), rng).unwrap();
    engine.step("R");
    assert_eq!(engine.mode(), Mode::Encounter);
    assert!(engine.player().fatigued);

    let before = engine.player().clone();
    let refused = engine.step("R");
    assert_eq!(refused.mode, Mode::Encounter);
    assert_eq!(engine.player(), &before);

    let snapshot = encounter_snapshot(3, 9);
    let start = snapshot.player.pos;
    let rng = ScriptedRng::new([], [0.39999]);
    let mut engine = GameEngine::restore(snapshot, EngineConfig::default(), rng).unwrap();
    let landing = Dungeon::floor_positions(start.z)
        .find(|&p| p != start && engine.dungeon().room(p).is_bare())
        .unwrap();
    engine.rng_mut().push_int(landing.y as i32);
    engine.rng_mut().push_int(landing.x as i32);

    let fled = engine.step("R");
    assert_eq!(fled.mode, Mode::Explore);
    assert_eq!(engine.player().pos, landing);
    assert!(engine.dungeon().room(start).has_monster());
}

#[test]
fn test_teleport_clears_monster_and_relocates() {
    let mut snapshot = encounter_snapshot(5, 17);
    let start = snapshot.player.pos;
    snapshot.player.intelligence = 12;
    snapshot.player.spell_charges = [0, 0, 0, 0, 1];
    let mut engine =
        GameEngine::restore(snapshot, EngineConfig::default(), ScriptedRng::default()).unwrap();
    let landing = Dungeon::floor_positions(start.z)
        .find(|&p| p != start && engine.dungeon().room(p).is_bare())
        .unwrap();
    engine.rng_mut().push_int(landing.y as i32);
    engine.rng_mut().push_int(landing.x as i32);
    let gold = engine.player().gold;

    engine.step("S");
    let result = engine.step("5");

    assert_eq!(result.mode, Mode::Explore);
    assert!(!result.needs_input);
    assert_eq!(engine.player().pos, landing);
    assert!(!engine.dungeon().room(start).has_monster());
    assert_eq!(engine.player().gold, gold);
    assert!(!result.events.iter().any(|e| matches!(e, Event::Loot(_))));
    assert!(engine.rng_mut().is_exhausted());
}

#[test]
fn test_vendor_affordability_gate() {
    let mut dungeon = Dungeon::empty();
    *dungeon.room_mut(Position::new(0, 2, 2)) = Room::with_feature(Feature::Vendor);
    let mut player = fighter(Position::new(0, 2, 2));
    player.gold = 5;
    player.armor.equip(1);
    let mut engine = scripted(dungeon, player, ScriptedRng::default());

    assert!(engine.step("b").needs_input);
    engine.step("A");
    let before = engine.player().clone();
    let result = engine.step("C");

    assert_eq!(engine.player(), &before);
    assert_eq!(engine.player().armor.tier(), 1);
    assert_eq!(
        engine.vendor().map(|v| v.phase()),
        Some(VendorPhase::Item(ShopCategory::Armor))
    );
    let prompt = result
        .events
        .iter()
        .rev()
        .find(|e| matches!(e, Event::Prompt { .. }));
    assert!(matches!(prompt, Some(Event::Prompt { has_cancel: true, .. })));

    engine.attempt_cancel();
    assert_eq!(engine.vendor().map(|v| v.phase()), Some(VendorPhase::Category));
    let closed = engine.attempt_cancel();
    assert!(!closed.needs_input);
    assert_eq!(engine.state(), &EngineState::Exploring);
}

#[test]
fn test_vendor_purchase_ends_visit() {
    let mut dungeon = Dungeon::empty();
    *dungeon.room_mut(Position::new(0, 2, 2)) = Room::with_feature(Feature::Vendor);
    let mut engine = scripted(dungeon, fighter(Position::new(0, 2, 2)), ScriptedRng::default());

    engine.step("B");
    engine.step("W");
    let result = engine.step("B");
    assert!(!result.needs_input);
    assert_eq!(engine.player().weapon.name(), "Broadsword");
    assert_eq!(engine.player().gold, 30);
    assert_eq!(
        engine.dungeon().room(Position::new(0, 2, 2)).feature,
        Feature::Vendor
    );
}

#[test]
fn test_treasure_award_is_idempotent() {
    let mut dungeon = Dungeon::empty();
    *dungeon.room_mut(Position::new(0, 0, 1)) = Room {
        treasure_id: 4,
        ..Room::default()
    };
    let mut player = fighter(Position::new(0, 0, 0));
    let mut events = Vec::new();
    player.claim_treasure(4, &mut events);
    let mut engine = scripted(dungeon, player, ScriptedRng::default());

    let result = engine.step("E");
    assert!(!result.events.iter().any(|e| matches!(e, Event::Loot(_))));
    assert_eq!(engine.player().treasure_count(), 1);
    assert!(!engine.dungeon().room(Position::new(0, 0, 1)).has_treasure());
}

#[test]
fn test_warp_re_enters() {
    let mut dungeon = Dungeon::empty();
    *dungeon.room_mut(Position::new(0, 3, 4)) = Room::with_feature(Feature::Warp);
    *dungeon.room_mut(Position::new(4, 5, 6)) = Room::with_feature(Feature::Flares);
    let rng = ScriptedRng::new([4, 5, 6, 2], []);
    let mut engine = scripted(dungeon, fighter(Position::new(0, 3, 3)), rng);

    engine.step("E");
    assert_eq!(engine.player().pos, Position::new(4, 5, 6));
    assert_eq!(engine.player().flares, 5);
    assert_eq!(engine.dungeon().room(Position::new(0, 3, 4)).feature, Feature::Empty);
    assert!(engine.dungeon().room(Position::new(4, 5, 6)).seen);
}

#[test]
fn test_terminal_mode_is_inert() {
    let mut dungeon = Dungeon::empty();
    *dungeon.room_mut(Position::new(6, 6, 6)) = Room::with_feature(Feature::Exit);
    let mut engine = scripted(dungeon, fighter(Position::new(6, 6, 6)), ScriptedRng::default());

    assert_eq!(engine.step("X").mode, Mode::GameOver);
    assert_eq!(engine.state(), &EngineState::Ended(Outcome::Abandoned));

    let snapshot = engine.snapshot();
    for cmd in ["N", "F", "X", "H"] {
        let result = engine.step(cmd);
        assert!(result.events.is_empty());
        assert_eq!(result.mode, Mode::GameOver);
        assert!(!result.needs_input);
    }
    assert!(engine.attempt_cancel().events.is_empty());
    assert_eq!(engine.snapshot(), snapshot);
}

#[test]
fn test_mid_encounter_snapshot_round_trip() {
    let mut engine =
        GameEngine::restore(encounter_snapshot(4, 20), EngineConfig::default(), SeededRng::new(3))
            .unwrap();
    engine.step("S");
    let snapshot = engine.snapshot();

    let json = serde_json::to_string_pretty(&snapshot).unwrap();
    let parsed: Snapshot = serde_json::from_str(&json).unwrap();
    let restored = GameEngine::restore(parsed, EngineConfig::default(), SeededRng::new(3)).unwrap();

    assert_eq!(restored.mode(), Mode::Encounter);
    assert_eq!(restored.player(), engine.player());
    assert_eq!(restored.dungeon(), engine.dungeon());
    assert_eq!(restored.encounter(), engine.encounter());
    assert_eq!(restored.encounter().map(|s| s.monster_name()), Some("Gnoll"));
    assert_eq!(restored.snapshot(), snapshot);
}

#[test]
fn test_spell_menu_cancel() {
    let mut engine =
        GameEngine::restore(encounter_snapshot(2, 8), EngineConfig::default(), ScriptedRng::default())
            .unwrap();
    engine.step("S");
    assert!(engine.encounter().is_some_and(|s| s.awaiting_spell()));

    let result = engine.attempt_cancel();
    assert!(!result.has_error());
    assert!(engine.encounter().is_some_and(|s| !s.awaiting_spell()));
    assert!(engine.attempt_cancel().has_error());
}

const COMMANDS: [&str; 22] = [
    "N", "S", "E", "W", "U", "D", "F", "X", "L", "O", "R", "P", "B", "H", "M", "Q", "A", "C",
    "1", "2", "5", "?",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_random_play_keeps_invariants(
        seed in any::<u64>(),
        commands in prop::collection::vec(prop::sample::select(COMMANDS.to_vec()), 0..80),
    ) {
        let mut engine = GameEngine::new(EngineConfig::default(), SeededRng::new(seed));

        for cmd in commands {
            let result = engine.step(cmd);
            let violations = validate_in_play(engine.dungeon(), &engine.player().treasures);
            prop_assert!(violations.is_empty(), "{violations:?}");
            prop_assert_eq!(result.mode, engine.mode());
            prop_assert_eq!(result.needs_input, engine.needs_input());
            if !result.mode.is_terminal() {
                prop_assert!(matches!(result.events.last(), Some(Event::Status(_))));
                prop_assert!(engine.player().hp > 0);
            }
        }

        let snapshot = engine.snapshot();
        let restored = GameEngine::restore(snapshot.clone(), EngineConfig::default(), SeededRng::new(seed));
        prop_assert!(restored.is_ok(), "{:?}", restored.as_ref().err());
        if let Ok(restored) = restored {
            prop_assert_eq!(restored.mode(), engine.mode());
            prop_assert_eq!(restored.dungeon(), engine.dungeon());
            if engine.player().hp >= 0 {
                prop_assert_eq!(restored.snapshot(), snapshot);
            }
        }
    }
}
