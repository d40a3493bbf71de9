use crate::bonus::{race_bonus, class_bonus, saga_bonus, BonusTotals};
use crate::constants::LEVEL_MULTIPLIER_STEP;
use crate::hero::Hero;
use crate::items::{EquipmentSlot, ItemCatalog};

/// Effective combat statistics derived from the layered bonus model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedStats {
    pub max_health: u32,
    pub damage: u32,
    pub armor: u32,
    pub power: u32,
    /// Regenerated-and-floored health at the time of computation.
    pub current_health: u32,
    pub totals: BonusTotals,
}

/// Scaling applied to base attributes before additive bonuses.
pub fn level_multiplier(level: u32) -> f64 {
    1.0 + (level.saturating_sub(1)) as f64 * LEVEL_MULTIPLIER_STEP
}

/// Single scalar strength heuristic. Heroes and monsters must go through
/// this same formula for power comparison to mean anything.
pub fn power_rating(health: f64, damage: f64, armor: f64) -> u32 {
    (health / 10.0 + damage * 1.5 + armor * 2.0).round() as u32
}

impl DerivedStats {
    /// Derives effective stats for `hero` at `now_ms`.
    ///
    /// Order matters: base attributes are scaled by the level multiplier,
    /// same-kind percentage bonuses add linearly on top, and flat equipment
    /// addends come last. Stored health is re-clamped immediately if the
    /// derived max dropped below it.
    pub fn compute(hero: &mut Hero, items: &ItemCatalog, now_ms: i64) -> Self {
        let totals = BonusTotals::collect([
            race_bonus(&hero.race),
            class_bonus(&hero.class),
            saga_bonus(&hero.saga),
            hero.equipment.slot_bonus(EquipmentSlot::MainHand, items),
            hero.equipment.slot_bonus(EquipmentSlot::Chest, items),
        ]);

        let lm = level_multiplier(hero.level);
        let health = hero.base_health as f64 * lm * (1.0 + totals.health_mult);
        let mut damage = hero.base_damage as f64 * lm * (1.0 + totals.damage_mult);
        let mut armor = hero.base_armor as f64 * lm * (1.0 + totals.armor_mult);

        damage += hero.equipment.fixed_damage_bonus(items) as f64;
        armor += hero.equipment.fixed_armor_bonus(items) as f64;

        let max_health = health.round() as u32;
        hero.clamp_health_to_max(max_health);
        let current_health = hero
            .current_health_at(now_ms, max_health, totals.health_regen_mult)
            .floor() as u32;

        Self {
            max_health,
            damage: damage.round() as u32,
            armor: armor.round() as u32,
            power: power_rating(health, damage, armor),
            current_health,
            totals,
        }
    }
}
