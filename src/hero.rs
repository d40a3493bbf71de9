use crate::constants::DEFAULT_HEALTH_REGEN;
use crate::equipment::Equipment;
use serde::{Deserialize, Serialize};

/// A playable hero. Identity and base attributes come from the catalog;
/// everything else is mutable progress carried across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub id: u32,
    pub name: String,
    pub race: String,
    pub class: String,
    pub saga: String,
    pub base_health: u32,
    pub base_damage: u32,
    pub base_armor: u32,
    pub level: u32,
    pub experience: u64,
    pub gold: u64,
    /// Regeneration rate in health points per second, before bonuses.
    pub health_regen: f64,
    pub current_health: f64,
    /// Epoch milliseconds of the last committed health change.
    pub last_health_update: i64,
    pub inventory: Vec<u32>,
    pub equipment: Equipment,
    pub unlocked: bool,
    #[serde(default)]
    pub story: String,
}

impl Hero {
    /// Lazily regenerated health at `now_ms`, clamped to `max_health`.
    ///
    /// This is a committing read: when the value increases, the stored
    /// health and timestamp advance, so repeated reads consume elapsed time
    /// incrementally instead of accumulating a backlog. Regeneration works
    /// normally from exactly 0: defeat is not a dead state.
    pub fn current_health_at(&mut self, now_ms: i64, max_health: u32, regen_mult: f64) -> f64 {
        let elapsed_secs = (now_ms - self.last_health_update) as f64 / 1000.0;
        if elapsed_secs <= 0.0 {
            return self.current_health.min(max_health as f64);
        }
        let rate = self.health_regen * (1.0 + regen_mult);
        let candidate = (self.current_health + elapsed_secs * rate).min(max_health as f64);
        if candidate > self.current_health {
            self.current_health = candidate;
            self.last_health_update = now_ms;
        }
        self.current_health.min(max_health as f64)
    }

    /// Applies a health change (damage is negative), clamped to
    /// [0, max_health]. Any non-zero delta restarts the regeneration clock
    /// so healing and damage never interact with backlogged regen time.
    pub fn apply_health_delta(&mut self, delta: f64, max_health: u32, now_ms: i64) {
        if delta != 0.0 {
            self.current_health = (self.current_health + delta).clamp(0.0, max_health as f64);
            self.last_health_update = now_ms;
        }
    }

    /// Re-clamps stored health after max health shrank (level or gear
    /// changes). Never raises health.
    pub fn clamp_health_to_max(&mut self, max_health: u32) {
        if self.current_health > max_health as f64 {
            self.current_health = max_health as f64;
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0.0
    }
}

/// Built-in hero roster used when the data provider yields nothing.
pub fn default_heroes() -> Vec<Hero> {
    vec![
        Hero {
            id: 1,
            name: "Novice Hero".to_string(),
            race: "human".to_string(),
            class: "warrior".to_string(),
            saga: "golden_egg".to_string(),
            base_health: 100,
            base_damage: 20,
            base_armor: 10,
            level: 1,
            experience: 0,
            gold: 500,
            health_regen: DEFAULT_HEALTH_REGEN,
            current_health: 100.0,
            last_health_update: 0,
            inventory: Vec::new(),
            equipment: Equipment::new(),
            unlocked: true,
            story: "A plain warrior from a distant village.".to_string(),
        },
        Hero {
            id: 2,
            name: "Seasoned Seeker".to_string(),
            race: "elf".to_string(),
            class: "archer".to_string(),
            saga: "vulkanor".to_string(),
            base_health: 120,
            base_damage: 25,
            base_armor: 8,
            level: 1,
            experience: 0,
            gold: 0,
            health_regen: 100.0 / 45.0,
            current_health: 120.0,
            last_health_update: 0,
            inventory: Vec::new(),
            equipment: Equipment::new(),
            unlocked: false,
            story: "An elven ranger with a keen eye.".to_string(),
        },
    ]
}
