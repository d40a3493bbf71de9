use crate::hero::{default_heroes, Hero};
use crate::items::{default_items, ItemCatalog};
use crate::locations::{default_locations, default_maps, Location, Map};
use crate::monsters::{default_monsters, Monster};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Everything the game needs to start: the full content catalog. Loaded
/// once and handed to [`crate::game_state::GameState::new`].
#[derive(Debug, Clone)]
pub struct GameData {
    pub heroes: Vec<Hero>,
    pub items: ItemCatalog,
    pub monsters: Vec<Monster>,
    pub maps: Vec<Map>,
    pub locations: Vec<Location>,
}

impl GameData {
    /// The built-in catalog: always available, no I/O.
    pub fn builtin() -> Self {
        Self {
            heroes: default_heroes(),
            items: ItemCatalog::new(default_items()),
            monsters: default_monsters(),
            maps: default_maps(),
            locations: default_locations(),
        }
    }

    /// Loads catalog data from JSON files in `dir`, falling back to the
    /// built-in table for any file that is missing or malformed. Each
    /// fallback is reported in the returned warning list; the load itself
    /// never fails.
    pub fn load_from_dir(dir: &Path) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();

        let heroes = load_table(dir, "heroes.json", default_heroes, &mut warnings);
        let items = load_table(dir, "items.json", default_items, &mut warnings);
        let monsters = load_table(dir, "monsters.json", default_monsters, &mut warnings);
        let maps = load_table(dir, "maps.json", default_maps, &mut warnings);
        let locations = load_table(dir, "locations.json", default_locations, &mut warnings);

        (
            Self {
                heroes,
                items: ItemCatalog::new(items),
                monsters,
                maps,
                locations,
            },
            warnings,
        )
    }
}

fn load_table<T: DeserializeOwned>(
    dir: &Path,
    file_name: &str,
    fallback: fn() -> Vec<T>,
    warnings: &mut Vec<String>,
) -> Vec<T> {
    let path = dir.join(file_name);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(_) => return fallback(),
    };
    match serde_json::from_str::<Vec<T>>(&contents) {
        Ok(table) if !table.is_empty() => table,
        Ok(_) => {
            warnings.push(format!("{}: empty table, using built-in data", file_name));
            fallback()
        }
        Err(err) => {
            warnings.push(format!("{}: {}, using built-in data", file_name, err));
            fallback()
        }
    }
}
