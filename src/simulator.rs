//! Balance simulator: automated playthroughs of the progression loop.
//!
//! Drives the real game state through fight/heal cycles on a simulated
//! clock, so pacing numbers reflect actual game behavior rather than a
//! re-implementation of it.

use crate::catalog::GameData;
use crate::combat_logic::{
    acknowledge_battle_end, battle_attack, start_battle, BattlePhase, CombatEvent,
};
use crate::constants::LEVEL_CAP;
use crate::game_state::GameState;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub num_runs: u32,
    /// Seed for reproducibility; None draws from entropy.
    pub seed: Option<u64>,
    /// Stop a run once the hero reaches this level.
    pub target_level: u32,
    /// Hard cap on combat rounds per run before timeout.
    pub max_rounds: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 100,
            seed: None,
            target_level: 10,
            max_rounds: 200_000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub rounds: u64,
    pub kills: u64,
    pub deaths: u64,
    pub locations_cleared: u64,
    pub final_level: u32,
    pub final_gold: u64,
    /// Simulated play time in milliseconds, healing downtime included.
    pub elapsed_ms: i64,
    pub reached_target: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SimReport {
    pub runs: Vec<RunStats>,
    pub target_level: u32,
}

impl SimReport {
    pub fn to_text(&self) -> String {
        let total = self.runs.len().max(1) as f64;
        let reached = self.runs.iter().filter(|r| r.reached_target).count();
        let avg_rounds = self.runs.iter().map(|r| r.rounds).sum::<u64>() as f64 / total;
        let avg_kills = self.runs.iter().map(|r| r.kills).sum::<u64>() as f64 / total;
        let avg_deaths = self.runs.iter().map(|r| r.deaths).sum::<u64>() as f64 / total;
        let avg_gold = self.runs.iter().map(|r| r.final_gold).sum::<u64>() as f64 / total;
        let avg_hours = self.runs.iter().map(|r| r.elapsed_ms).sum::<i64>() as f64
            / total
            / 3_600_000.0;

        let mut out = String::new();
        out.push_str(&format!(
            "Runs reaching level {}: {}/{}\n",
            self.target_level,
            reached,
            self.runs.len()
        ));
        out.push_str(&format!("Average combat rounds: {:.0}\n", avg_rounds));
        out.push_str(&format!("Average kills:         {:.0}\n", avg_kills));
        out.push_str(&format!("Average deaths:        {:.1}\n", avg_deaths));
        out.push_str(&format!("Average final gold:    {:.0}\n", avg_gold));
        out.push_str(&format!("Average play time:     {:.1}h simulated\n", avg_hours));
        out
    }
}

pub fn run_simulation(config: &SimConfig) -> SimReport {
    let mut runs = Vec::with_capacity(config.num_runs as usize);
    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
            None => StdRng::from_entropy(),
        };
        runs.push(simulate_single_run(config, &mut rng));
    }
    SimReport {
        runs,
        target_level: config.target_level,
    }
}

fn simulate_single_run(config: &SimConfig, rng: &mut StdRng) -> RunStats {
    let mut state = GameState::new(GameData::builtin());
    let mut stats = RunStats::default();
    let mut now_ms: i64 = 0;
    let target_level = config.target_level.min(LEVEL_CAP);

    state.select_hero(1);
    state.select_map(1);

    while stats.rounds < config.max_rounds {
        let Some(hero_stats) = state.hero_stats(now_ms) else {
            break;
        };
        if hero_stats.current_health < hero_stats.max_health / 2 {
            // Idle until healed; lazy regen commits on the next read.
            now_ms += 30_000;
            continue;
        }

        pick_location(&mut state);
        if !state.start_adventure(rng) {
            break;
        }
        start_battle(&mut state);

        while state.battle.in_progress() && stats.rounds < config.max_rounds {
            stats.rounds += 1;
            now_ms += 1_000;
            for event in battle_attack(&mut state, now_ms, rng) {
                match event {
                    CombatEvent::Victory { .. } => stats.kills += 1,
                    CombatEvent::Defeat => stats.deaths += 1,
                    CombatEvent::LocationCleared { .. } => stats.locations_cleared += 1,
                    _ => {}
                }
            }
        }
        let defeated = state.battle.phase == BattlePhase::Defeat;
        acknowledge_battle_end(&mut state);
        if defeated {
            // Sleep off the defeat before heading back out.
            now_ms += 120_000;
        } else {
            auto_shop(&mut state);
        }

        if let Some(idx) = state.active_hero_index() {
            if state.heroes[idx].level >= target_level {
                stats.reached_target = true;
                break;
            }
        }
    }

    if let Some(idx) = state.active_hero_index() {
        stats.final_level = state.heroes[idx].level;
        stats.final_gold = state.heroes[idx].gold;
    }
    stats.elapsed_ms = now_ms;
    stats
}

/// Fights in the hardest location the run has unlocked so far.
fn pick_location(state: &mut GameState) {
    let Some(level) = state
        .locations
        .iter()
        .filter(|l| l.unlocked)
        .map(|l| l.level)
        .min()
    else {
        return;
    };
    if state.active_location != Some(level) {
        state.select_location(level);
    }
}

/// Spends gold on the first affordable piece of gear the hero can use.
fn auto_shop(state: &mut GameState) {
    let Some(idx) = state.active_hero_index() else {
        return;
    };
    let hero = &state.heroes[idx];
    let candidate = state
        .items
        .iter()
        .filter(|item| item.slot.is_some())
        .filter(|item| {
            item.required_level <= hero.level
                && item.price <= hero.gold
                && !hero.inventory.contains(&item.id)
                && !hero.equipment.is_equipped(item.id)
        })
        .map(|item| item.id)
        .next();
    if let Some(item_id) = candidate {
        if state.buy_item(item_id) {
            state.equip_item(item_id);
        }
    }
}
