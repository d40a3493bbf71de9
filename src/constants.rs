// Progression constants
pub const LEVEL_CAP: u32 = 15;
pub const LEVEL_MULTIPLIER_STEP: f64 = 0.1;
pub const HEALTH_PER_LEVEL: u32 = 10;
pub const DAMAGE_PER_LEVEL: u32 = 2;
pub const ARMOR_PER_LEVEL: u32 = 1;

/// Roster unlocks keyed by the active hero's level: (hero id, required level).
pub const HERO_UNLOCK_LEVELS: [(u32, u32); 7] = [
    (2, 10),
    (3, 15),
    (4, 20),
    (5, 25),
    (6, 30),
    (7, 35),
    (8, 40),
];

// Combat constants
pub const MIN_KILL_XP: u64 = 10;
pub const BATTLE_LOG_CAPACITY: usize = 10;

// Dice-pool skill checks
pub const DICE_SIDES: u32 = 6;
pub const STEALTH_TARGET: u32 = 8;
pub const ESCAPE_TARGET: u32 = 10;

// Health regeneration: 100 HP per minute, in points per second
pub const DEFAULT_HEALTH_REGEN: f64 = 100.0 / 60.0;

// Inventory and world layout
pub const INVENTORY_CAPACITY: usize = 10;
pub const MONSTERS_PER_LOCATION: u32 = 10;
pub const ENTRY_LOCATION_LEVEL: u32 = 10;

// Save system constants
pub const SAVE_VERSION: u32 = 1;
pub const SAVE_DIR_NAME: &str = ".saga";
pub const SAVE_FILE_NAME: &str = "save.json";

// Session journal cap
pub const JOURNAL_CAPACITY: usize = 100;
