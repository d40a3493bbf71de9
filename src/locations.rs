use crate::constants::{ENTRY_LOCATION_LEVEL, MONSTERS_PER_LOCATION};
use serde::{Deserialize, Serialize};

/// World map. The multiplier scales monster stats and rewards for every
/// encounter fought on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub multiplier: f64,
    pub unlocked: bool,
}

/// A difficulty-ranked hunting ground. Levels count down: 10 is the entry
/// point, 1 the hardest. Each location owns one kill counter per distinct
/// monster id in its range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub level: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Inclusive monster id range assigned to this location.
    pub monster_range: (u32, u32),
    pub artifact_chance: f64,
    pub relic_chance: f64,
    pub unlocked: bool,
    #[serde(default)]
    pub kill_counts: Vec<u32>,
}

impl Location {
    /// Counter slot for a monster id, or None if the id is outside the
    /// location's range.
    pub fn monster_slot(&self, monster_id: u32) -> Option<usize> {
        let (min, max) = self.monster_range;
        if monster_id < min || monster_id > max {
            return None;
        }
        Some((monster_id - min) as usize)
    }

    pub fn pool_size(&self) -> usize {
        let (min, max) = self.monster_range;
        (max - min + 1) as usize
    }

    /// Cleared once every distinct monster in the pool has died at least
    /// once. Repeat kills of the same monster do not help.
    pub fn is_cleared(&self) -> bool {
        self.kill_counts.len() == self.pool_size() && self.kill_counts.iter().all(|&n| n > 0)
    }

    fn ensure_counters(&mut self) {
        if self.kill_counts.len() != self.pool_size() {
            self.kill_counts = vec![0; self.pool_size()];
        }
    }
}

/// Result of recording a kill with the progress tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KillOutcome {
    pub recorded: bool,
    /// The location completed its pool with this kill.
    pub cleared: bool,
    /// Next location level unlocked by the clear, if any.
    pub unlocked_level: Option<u32>,
}

/// Increments the kill counter for `monster_id` at `location_level`.
/// Clearing location N unlocks location N-1; unlock flags never revert.
pub fn record_kill(locations: &mut [Location], location_level: u32, monster_id: u32) -> KillOutcome {
    let Some(idx) = locations.iter().position(|l| l.level == location_level) else {
        return KillOutcome::default();
    };

    let already_cleared = {
        let location = &mut locations[idx];
        location.ensure_counters();
        let Some(slot) = location.monster_slot(monster_id) else {
            return KillOutcome::default();
        };
        let cleared_before = location.is_cleared();
        location.kill_counts[slot] += 1;
        cleared_before
    };

    let cleared_now = locations[idx].is_cleared();
    let mut outcome = KillOutcome {
        recorded: true,
        cleared: cleared_now && !already_cleared,
        unlocked_level: None,
    };

    if outcome.cleared && location_level > 1 {
        let next_level = location_level - 1;
        if let Some(next) = locations.iter_mut().find(|l| l.level == next_level) {
            if !next.unlocked {
                next.unlocked = true;
                outcome.unlocked_level = Some(next_level);
            }
        }
    }
    outcome
}

/// Built-in world maps, entry map unlocked.
pub fn default_maps() -> Vec<Map> {
    let table: [(&str, &str, f64); 9] = [
        ("Arcanium", "Land of ancient magic", 1.0),
        ("Hobbleton", "Peaceful farmland", 1.5),
        ("Felisar", "Forest tropics", 2.0),
        ("Ilverin", "Enchanted woods", 2.5),
        ("Vargosh", "Volcanic wastes", 3.0),
        ("Dungarn", "Underground caverns", 3.5),
        ("Luminel", "Glittering plains", 4.0),
        ("Astarion", "Sky reaches", 4.5),
        ("Elfarion", "Ancient elven kingdom", 5.0),
    ];
    table
        .iter()
        .enumerate()
        .map(|(i, &(name, description, multiplier))| Map {
            id: i as u32 + 1,
            name: name.to_string(),
            description: description.to_string(),
            multiplier,
            unlocked: i == 0,
        })
        .collect()
}

/// Built-in locations, levels 10 down to 1, disjoint pools of ten monster
/// ids each. Only the entry location starts unlocked.
pub fn default_locations() -> Vec<Location> {
    let table: [(&str, &str); 10] = [
        ("Starting Lands", "Mild climate, weak monsters"),
        ("Deep Forest", "Dense thickets"),
        ("Rocky Cliffs", "Steep drops"),
        ("Abandoned Ruins", "Ancient structures"),
        ("Dark Caves", "Gloom and danger"),
        ("Lands of Magic", "Raw arcane power"),
        ("Frozen Wastes", "Permafrost"),
        ("Burning Lands", "Heat and flame"),
        ("Sky Paths", "High above the clouds"),
        ("Throne Hall", "Lair of mighty creatures"),
    ];
    table
        .iter()
        .enumerate()
        .map(|(i, &(name, description))| {
            let level = ENTRY_LOCATION_LEVEL - i as u32;
            let min_id = i as u32 * MONSTERS_PER_LOCATION + 1;
            Location {
                level,
                name: name.to_string(),
                description: description.to_string(),
                monster_range: (min_id, min_id + MONSTERS_PER_LOCATION - 1),
                artifact_chance: 0.005 * (i + 1) as f64,
                relic_chance: 0.0005 * (i + 1) as f64,
                unlocked: level == ENTRY_LOCATION_LEVEL,
                kill_counts: vec![0; MONSTERS_PER_LOCATION as usize],
            }
        })
        .collect()
}
