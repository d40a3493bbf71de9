use crate::constants::{
    ARMOR_PER_LEVEL, DAMAGE_PER_LEVEL, HEALTH_PER_LEVEL, HERO_UNLOCK_LEVELS, LEVEL_CAP,
};
use crate::derived_stats::DerivedStats;
use crate::hero::Hero;
use crate::items::ItemCatalog;

/// Cumulative experience required to hold `level`. The table is fixed for
/// save compatibility; levels past the cap have no threshold.
pub fn xp_threshold(level: u32) -> Option<u64> {
    let xp = match level {
        1 => 1,
        2 => 100,
        3 => 250,
        4 => 500,
        5 => 1000,
        6 => 2000,
        7 => 4000,
        8 => 8000,
        9 => 16000,
        10 => 32000,
        11 => 64000,
        12 => 128000,
        13 => 256000,
        14 => 512000,
        15 => 1024000,
        _ => return None,
    };
    Some(xp)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelUpReport {
    pub levels_gained: u32,
    pub new_level: u32,
    pub health_gained: u32,
    pub damage_gained: u32,
    pub armor_gained: u32,
}

/// Grants experience and processes every level crossed in one call.
///
/// Each level gained adds the fixed stat growth; after any level-up the
/// hero is fully healed to the recomputed max health. Roster unlocks are
/// keyed to the active hero's level and need the whole roster, so callers
/// granting experience follow up with [`check_hero_unlocks`], as the
/// combat resolver does on victory.
pub fn add_experience(
    hero: &mut Hero,
    amount: u64,
    items: &ItemCatalog,
    now_ms: i64,
) -> LevelUpReport {
    hero.experience += amount;

    let mut levels_gained = 0;
    while hero.level < LEVEL_CAP {
        match xp_threshold(hero.level + 1) {
            Some(needed) if hero.experience >= needed => {
                hero.level += 1;
                levels_gained += 1;
            }
            _ => break,
        }
    }

    let mut report = LevelUpReport {
        levels_gained,
        new_level: hero.level,
        ..Default::default()
    };

    if levels_gained > 0 {
        report.health_gained = HEALTH_PER_LEVEL * levels_gained;
        report.damage_gained = DAMAGE_PER_LEVEL * levels_gained;
        report.armor_gained = ARMOR_PER_LEVEL * levels_gained;
        hero.base_health += report.health_gained;
        hero.base_damage += report.damage_gained;
        hero.base_armor += report.armor_gained;

        // Full heal on level-up.
        let stats = DerivedStats::compute(hero, items, now_ms);
        hero.current_health = stats.max_health as f64;
        hero.last_health_update = now_ms;
    }

    report
}

/// Unlocks roster heroes gated on the *active* hero's level. Flags are
/// permanent once set; returns the ids newly unlocked by this check.
pub fn check_hero_unlocks(roster: &mut [Hero], active_level: u32) -> Vec<u32> {
    let mut unlocked = Vec::new();
    for (hero_id, required_level) in HERO_UNLOCK_LEVELS {
        if active_level < required_level {
            continue;
        }
        if let Some(hero) = roster.iter_mut().find(|h| h.id == hero_id) {
            if !hero.unlocked {
                hero.unlocked = true;
                unlocked.push(hero_id);
            }
        }
    }
    unlocked
}
