//! Full-loop tests driven through the public session API: travel, fight,
//! level and unlock, the way a presentation layer would.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use saga::catalog::GameData;
use saga::combat_logic::{acknowledge_battle_end, battle_attack, start_battle, BattlePhase};
use saga::constants::{HEALTH_PER_LEVEL, MONSTERS_PER_LOCATION};
use saga::game_state::GameState;
use saga::monsters::MonsterInstance;

fn fresh_session() -> GameState {
    let mut state = GameState::new(GameData::builtin());
    // A bonus-free hero keeps every number in these tests exact.
    state.heroes[0].race = "unknown".to_string();
    state.heroes[0].class = "unknown".to_string();
    state.heroes[0].saga = "unknown".to_string();
    assert!(state.select_hero(1));
    assert!(state.select_map(1));
    assert!(state.select_location(10));
    state
}

fn plain_monster(id: u32, health: u32, damage: u32, armor: u32) -> MonsterInstance {
    MonsterInstance {
        id,
        name: format!("Monster {}", id),
        max_health: health,
        current_health: health,
        damage,
        armor,
        reward: 10,
        power: 30,
    }
}

/// Fights the given monster to the end and acknowledges the result.
fn fight(state: &mut GameState, monster: MonsterInstance, now_ms: i64) -> BattlePhase {
    state.monster = Some(monster);
    assert!(start_battle(state));
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    while state.battle.in_progress() {
        battle_attack(state, now_ms, &mut rng);
    }
    let outcome = state.battle.phase;
    assert!(acknowledge_battle_end(state));
    outcome
}

#[test]
fn test_scripted_two_round_battle_plays_out_exactly() {
    let mut state = fresh_session();
    // Hero: 20 damage, 10 armor. Monster: 30 hp, 15 damage, 5 armor.
    // Each hero strike lands 15, each counter costs 5 health.
    state.monster = Some(plain_monster(1, 30, 15, 5));
    assert!(start_battle(&mut state));
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    battle_attack(&mut state, 0, &mut rng);
    assert_eq!(state.monster.as_ref().unwrap().current_health, 15);
    assert_eq!(state.heroes[0].current_health, 95.0);

    battle_attack(&mut state, 0, &mut rng);
    assert_eq!(state.battle.phase, BattlePhase::Victory);
    // Killing blow: no second counter-attack.
    assert_eq!(state.heroes[0].current_health, 95.0);
}

#[test]
fn test_experience_from_kills_accumulates_into_levels() {
    let mut state = fresh_session();
    let base_health = state.heroes[0].base_health;

    // power 30 grants 15 xp per kill; the level 3 threshold is 250.
    let kills_needed = 250 / 15 + 1;
    for _ in 0..kills_needed {
        let outcome = fight(&mut state, plain_monster(1, 1, 1, 0), 0);
        assert_eq!(outcome, BattlePhase::Victory);
    }

    assert_eq!(state.heroes[0].level, 3);
    assert_eq!(state.heroes[0].base_health, base_health + 2 * HEALTH_PER_LEVEL);
}

#[test]
fn test_clearing_the_entry_location_unlocks_the_next() {
    let mut state = fresh_session();
    assert!(!state
        .locations
        .iter()
        .find(|l| l.level == 9)
        .unwrap()
        .unlocked);
    // A locked location cannot be selected.
    assert!(!state.select_location(9));

    // One kill of each monster id in the entry pool clears it.
    for id in 1..=MONSTERS_PER_LOCATION {
        fight(&mut state, plain_monster(id, 1, 1, 0), 0);
    }

    let entry = state.locations.iter().find(|l| l.level == 10).unwrap();
    assert!(entry.is_cleared());
    assert!(state
        .locations
        .iter()
        .find(|l| l.level == 9)
        .unwrap()
        .unlocked);
    assert!(state.select_location(9));
}

#[test]
fn test_repeat_kills_do_not_clear_a_location() {
    let mut state = fresh_session();
    for _ in 0..20 {
        fight(&mut state, plain_monster(1, 1, 1, 0), 0);
    }
    let entry = state.locations.iter().find(|l| l.level == 10).unwrap();
    assert!(!entry.is_cleared());
}

#[test]
fn test_defeat_ends_the_encounter_and_health_regenerates_after() {
    let mut state = fresh_session();
    state.heroes[0].current_health = 5.0;
    let outcome = fight(&mut state, plain_monster(1, 10_000, 100, 100), 0);

    assert_eq!(outcome, BattlePhase::Defeat);
    assert!(state.monster.is_none());
    assert_eq!(state.heroes[0].current_health, 0.0);

    // A minute later the hero is back on their feet.
    let stats = state.hero_stats(60_000).unwrap();
    assert!(stats.current_health > 0);
}

#[test]
fn test_adventure_generates_an_encounter_from_the_location_pool() {
    let mut state = fresh_session();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    assert!(state.start_adventure(&mut rng));
    let monster = state.monster.as_ref().unwrap();
    let location = state.locations.iter().find(|l| l.level == 10).unwrap();
    let (min, max) = location.monster_range;
    assert!(monster.id >= min && monster.id <= max);

    // A second adventure cannot start while one is pending.
    assert!(!state.start_adventure(&mut rng));
}

#[test]
fn test_stealth_resolves_the_encounter_either_way() {
    let mut state = fresh_session();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    assert!(state.start_adventure(&mut rng));
    let roll = state.attempt_stealth(0, &mut rng).unwrap();
    assert_eq!(roll.target, saga::constants::STEALTH_TARGET);
    assert!(state.monster.is_none());
    assert!(!state.battle.in_progress());
}
