use crate::derived_stats::power_rating;
use serde::{Deserialize, Serialize};

/// Catalog monster template, immutable at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub id: u32,
    pub name: String,
    pub health: u32,
    pub damage: u32,
    pub armor: u32,
    pub reward: u64,
    #[serde(default)]
    pub description: String,
}

/// Per-encounter monster, scaled by the active map's multiplier. Created by
/// the encounter generator and discarded when the encounter resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterInstance {
    pub id: u32,
    pub name: String,
    pub max_health: u32,
    pub current_health: u32,
    pub damage: u32,
    pub armor: u32,
    pub reward: u64,
    pub power: u32,
}

impl MonsterInstance {
    /// Scales a template by the map multiplier. Each stat is rounded after
    /// scaling, and power is recomputed from the scaled stats with the same
    /// formula heroes use.
    pub fn from_template(template: &Monster, multiplier: f64) -> Self {
        let health = (template.health as f64 * multiplier).round() as u32;
        let damage = (template.damage as f64 * multiplier).round() as u32;
        let armor = (template.armor as f64 * multiplier).round() as u32;
        let reward = (template.reward as f64 * multiplier).round() as u64;
        Self {
            id: template.id,
            name: template.name.clone(),
            max_health: health,
            current_health: health,
            damage,
            armor,
            reward,
            power: power_rating(health as f64, damage as f64, armor as f64),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current_health = self.current_health.saturating_sub(amount);
    }
}

/// Built-in monster ladder for degraded mode. Encounter generation falls
/// back to the first entry for any id this set does not cover.
pub fn default_monsters() -> Vec<Monster> {
    let table: [(&str, u32, u32, u32, u64); 10] = [
        ("Feeble Slime", 30, 5, 2, 10),
        ("Forest Wolf", 45, 8, 3, 18),
        ("Cave Bat", 40, 10, 2, 20),
        ("Marsh Goblin", 60, 12, 4, 30),
        ("Bandit Scout", 75, 15, 5, 40),
        ("Stone Golem", 120, 14, 10, 60),
        ("Swamp Troll", 150, 18, 8, 80),
        ("Dire Boar", 110, 22, 6, 75),
        ("Young Wyvern", 170, 26, 9, 120),
        ("Ogre Brute", 200, 30, 12, 160),
    ];
    table
        .iter()
        .enumerate()
        .map(|(i, &(name, health, damage, armor, reward))| Monster {
            id: i as u32 + 1,
            name: name.to_string(),
            health,
            damage,
            armor,
            reward,
            description: String::new(),
        })
        .collect()
}
