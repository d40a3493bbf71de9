use crate::constants::{
    ARMOR_PER_LEVEL, DAMAGE_PER_LEVEL, HEALTH_PER_LEVEL, LEVEL_CAP, SAVE_DIR_NAME, SAVE_FILE_NAME,
    SAVE_VERSION,
};
use crate::equipment::Equipment;
use crate::game_state::GameState;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Per-hero progress snapshot. Only fields the player changes are stored;
/// identity and base attributes always come from the live catalog, with
/// level growth reapplied on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroProgress {
    pub id: u32,
    pub level: u32,
    pub experience: u64,
    pub gold: u64,
    pub current_health: f64,
    pub last_health_update: i64,
    pub inventory: Vec<u32>,
    pub equipment: Equipment,
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationProgress {
    pub level: u32,
    pub unlocked: bool,
    pub kill_counts: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapProgress {
    pub id: u32,
    pub unlocked: bool,
}

/// The persisted game: progress only, never catalog content. Loading an
/// old save over a rebalanced catalog keeps the player's gold, items and
/// levels while picking up the new numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    /// Epoch milliseconds at capture time. Regen resumes from the per-hero
    /// clocks, this is informational.
    pub saved_at: i64,
    pub heroes: Vec<HeroProgress>,
    pub maps: Vec<MapProgress>,
    pub locations: Vec<LocationProgress>,
    pub active_hero: Option<u32>,
    pub active_map: Option<u32>,
    pub active_location: Option<u32>,
}

impl SaveData {
    pub fn capture(state: &GameState) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at: chrono::Utc::now().timestamp_millis(),
            heroes: state
                .heroes
                .iter()
                .map(|hero| HeroProgress {
                    id: hero.id,
                    level: hero.level,
                    experience: hero.experience,
                    gold: hero.gold,
                    current_health: hero.current_health,
                    last_health_update: hero.last_health_update,
                    inventory: hero.inventory.clone(),
                    equipment: hero.equipment,
                    unlocked: hero.unlocked,
                })
                .collect(),
            maps: state
                .maps
                .iter()
                .map(|map| MapProgress {
                    id: map.id,
                    unlocked: map.unlocked,
                })
                .collect(),
            locations: state
                .locations
                .iter()
                .map(|location| LocationProgress {
                    level: location.level,
                    unlocked: location.unlocked,
                    kill_counts: location.kill_counts.clone(),
                })
                .collect(),
            active_hero: state.active_hero,
            active_map: state.active_map,
            active_location: state.active_location,
        }
    }
}

/// Merges saved progress onto a freshly-built state. Saved entries with no
/// catalog counterpart are dropped; catalog entries absent from the save
/// keep their defaults. Unlock flags only ever move towards unlocked.
pub fn apply_save(state: &mut GameState, save: SaveData) {
    for progress in save.heroes {
        let Some(hero) = state.heroes.iter_mut().find(|h| h.id == progress.id) else {
            continue;
        };
        let level = progress.level.clamp(1, LEVEL_CAP);
        let gained = level - 1;
        hero.base_health += gained * HEALTH_PER_LEVEL;
        hero.base_damage += gained * DAMAGE_PER_LEVEL;
        hero.base_armor += gained * ARMOR_PER_LEVEL;
        hero.level = level;
        hero.experience = progress.experience;
        hero.gold = progress.gold;
        hero.current_health = progress.current_health.max(0.0);
        hero.last_health_update = progress.last_health_update;
        // Items the catalog no longer knows are dropped from the bag.
        hero.inventory = progress
            .inventory
            .into_iter()
            .filter(|id| state.items.get(*id).is_some())
            .collect();
        hero.equipment = progress.equipment;
        for slot_id in [hero.equipment.main_hand, hero.equipment.chest] {
            if let Some(id) = slot_id {
                if state.items.get(id).is_none() {
                    hero.equipment.remove_item(id);
                }
            }
        }
        if progress.unlocked {
            hero.unlocked = true;
        }
    }

    for progress in save.maps {
        if let Some(map) = state.maps.iter_mut().find(|m| m.id == progress.id) {
            if progress.unlocked {
                map.unlocked = true;
            }
        }
    }

    for progress in save.locations {
        let Some(location) = state
            .locations
            .iter_mut()
            .find(|l| l.level == progress.level)
        else {
            continue;
        };
        if progress.unlocked {
            location.unlocked = true;
        }
        if progress.kill_counts.len() == location.pool_size() {
            location.kill_counts = progress.kill_counts;
        }
    }

    // Selections only survive if the target still exists and is open.
    state.active_hero = save
        .active_hero
        .filter(|id| state.heroes.iter().any(|h| h.id == *id && h.unlocked));
    state.active_map = save
        .active_map
        .filter(|id| state.maps.iter().any(|m| m.id == *id && m.unlocked));
    state.active_location = save
        .active_location
        .filter(|lv| state.locations.iter().any(|l| l.level == *lv && l.unlocked));
}

/// Reads and writes the save file under the player's home directory.
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    pub fn new() -> io::Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "home directory not found"))?;
        Ok(Self {
            save_path: home.join(SAVE_DIR_NAME).join(SAVE_FILE_NAME),
        })
    }

    /// Saves under an explicit directory instead of the home directory.
    pub fn with_dir(dir: PathBuf) -> Self {
        Self {
            save_path: dir.join(SAVE_FILE_NAME),
        }
    }

    pub fn save(&self, data: &SaveData) -> io::Result<()> {
        if let Some(parent) = self.save_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.save_path, json)
    }

    /// Missing file is a fresh start (`Ok(None)`); an unreadable or
    /// malformed file is an error the caller may also treat as fresh. A
    /// save from a different format version is ignored.
    pub fn load(&self) -> io::Result<Option<SaveData>> {
        let contents = match fs::read_to_string(&self.save_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let data: SaveData = serde_json::from_str(&contents)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if data.version != SAVE_VERSION {
            return Ok(None);
        }
        Ok(Some(data))
    }
}
