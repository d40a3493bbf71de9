use crate::catalog::GameData;
use crate::combat_logic::BattleState;
use crate::constants::{ESCAPE_TARGET, INVENTORY_CAPACITY, JOURNAL_CAPACITY, STEALTH_TARGET};
use crate::derived_stats::DerivedStats;
use crate::encounter::{generate_encounter, roll_dice, DiceRoll};
use crate::hero::Hero;
use crate::items::{ItemCatalog, ItemKind};
use crate::locations::{Location, Map};
use crate::monsters::{Monster, MonsterInstance};
use rand::Rng;

/// The whole session: roster, world, at most one live monster, battle
/// state and a bounded message journal. Every mutation happens through a
/// method on this struct; there is no ambient global, and presentation is
/// expected to re-read state after each call.
#[derive(Debug, Clone)]
pub struct GameState {
    pub items: ItemCatalog,
    pub monsters: Vec<Monster>,
    pub heroes: Vec<Hero>,
    pub maps: Vec<Map>,
    pub locations: Vec<Location>,
    /// Pristine catalog roster, kept for hero resets.
    hero_templates: Vec<Hero>,
    pub active_hero: Option<u32>,
    pub active_map: Option<u32>,
    pub active_location: Option<u32>,
    pub monster: Option<MonsterInstance>,
    pub battle: BattleState,
    pub journal: Vec<String>,
}

impl GameState {
    pub fn new(data: GameData) -> Self {
        let GameData {
            mut heroes,
            items,
            monsters,
            maps,
            locations,
        } = data;

        // The first roster hero is always playable, whatever the data says.
        if let Some(first) = heroes.first_mut() {
            first.unlocked = true;
        }

        Self {
            items,
            monsters,
            hero_templates: heroes.clone(),
            heroes,
            maps,
            locations,
            active_hero: None,
            active_map: None,
            active_location: None,
            monster: None,
            battle: BattleState::new(),
            journal: Vec::new(),
        }
    }

    pub fn push_journal(&mut self, message: impl Into<String>) {
        self.journal.push(message.into());
        if self.journal.len() > JOURNAL_CAPACITY {
            self.journal.remove(0);
        }
    }

    // ---- lookups ----

    pub fn active_hero_index(&self) -> Option<usize> {
        let id = self.active_hero?;
        self.heroes.iter().position(|h| h.id == id)
    }

    pub fn active_hero(&self) -> Option<&Hero> {
        self.active_hero_index().map(|i| &self.heroes[i])
    }

    pub fn active_hero_mut(&mut self) -> Option<&mut Hero> {
        let idx = self.active_hero_index()?;
        Some(&mut self.heroes[idx])
    }

    pub fn active_map(&self) -> Option<&Map> {
        let id = self.active_map?;
        self.maps.iter().find(|m| m.id == id)
    }

    pub fn active_location(&self) -> Option<&Location> {
        let level = self.active_location?;
        self.locations.iter().find(|l| l.level == level)
    }

    /// Effective stats of the active hero at `now_ms`. Commits lazy health
    /// regeneration as a side effect.
    pub fn hero_stats(&mut self, now_ms: i64) -> Option<DerivedStats> {
        let idx = self.active_hero_index()?;
        Some(DerivedStats::compute(&mut self.heroes[idx], &self.items, now_ms))
    }

    // ---- selection ----

    pub fn select_hero(&mut self, hero_id: u32) -> bool {
        let Some(hero) = self.heroes.iter().find(|h| h.id == hero_id) else {
            self.push_journal(format!("No such hero: {}", hero_id));
            return false;
        };
        if !hero.unlocked {
            let name = hero.name.clone();
            self.push_journal(format!("{} is still locked", name));
            return false;
        }
        let name = hero.name.clone();
        self.active_hero = Some(hero_id);
        self.push_journal(format!("Hero selected: {}", name));
        true
    }

    pub fn select_map(&mut self, map_id: u32) -> bool {
        let Some(map) = self.maps.iter().find(|m| m.id == map_id) else {
            self.push_journal(format!("No such map: {}", map_id));
            return false;
        };
        if !map.unlocked {
            let name = map.name.clone();
            self.push_journal(format!("Map {} is still locked", name));
            return false;
        }
        let name = map.name.clone();
        self.active_map = Some(map_id);
        self.push_journal(format!("Map selected: {}", name));
        true
    }

    pub fn select_location(&mut self, level: u32) -> bool {
        let Some(location) = self.locations.iter().find(|l| l.level == level) else {
            self.push_journal(format!("No such location level: {}", level));
            return false;
        };
        if !location.unlocked {
            let name = location.name.clone();
            self.push_journal(format!("Location {} is still locked", name));
            return false;
        }
        let name = location.name.clone();
        self.active_location = Some(level);
        self.push_journal(format!("Location selected: {} (lv. {})", name, level));
        true
    }

    // ---- encounters ----

    /// Travels into the selected location and rolls a monster encounter.
    /// Requires a hero, a map and a location; refuses while an encounter
    /// or battle is already running.
    pub fn start_adventure(&mut self, rng: &mut impl Rng) -> bool {
        if self.active_hero_index().is_none() {
            self.push_journal("Pick a hero first");
            return false;
        }
        if self.monster.is_some() || self.battle.in_progress() {
            self.push_journal("An encounter is already underway");
            return false;
        }
        let (Some(map), Some(location)) = (self.active_map(), self.active_location()) else {
            self.push_journal("Pick a map and a location first");
            return false;
        };
        let Some(instance) = generate_encounter(location, map, &self.monsters, rng) else {
            self.push_journal("The lands are empty: no monsters in the catalog");
            return false;
        };
        self.push_journal(format!("Encountered: {}", instance.name));
        self.monster = Some(instance);
        true
    }

    /// Pre-battle stealth check (target 8). Either way the encounter ends.
    pub fn attempt_stealth(&mut self, now_ms: i64, rng: &mut impl Rng) -> Option<DiceRoll> {
        if self.monster.is_none() || self.battle.in_progress() {
            self.push_journal("Nothing to hide from");
            return None;
        }
        let stats = self.hero_stats(now_ms)?;
        let roll = roll_dice(stats.totals.stealth_dice, STEALTH_TARGET, rng);
        let name = self.monster.as_ref().map(|m| m.name.clone()).unwrap_or_default();
        if roll.success {
            self.push_journal(format!("Slipped past {} unseen", name));
        } else {
            self.push_journal(format!("{} spotted you, but you got away", name));
        }
        self.complete_encounter();
        Some(roll)
    }

    /// Pre-battle escape check (target 10). Failure forces the battle to
    /// start.
    pub fn attempt_escape(&mut self, now_ms: i64, rng: &mut impl Rng) -> Option<DiceRoll> {
        if self.monster.is_none() || self.battle.in_progress() {
            self.push_journal("Nothing to run from");
            return None;
        }
        let stats = self.hero_stats(now_ms)?;
        let roll = roll_dice(stats.totals.escape_dice, ESCAPE_TARGET, rng);
        if roll.success {
            let name = self.monster.as_ref().map(|m| m.name.clone()).unwrap_or_default();
            self.push_journal(format!("Escaped from {}", name));
            self.complete_encounter();
        } else {
            self.push_journal("No escape: the fight is on");
            crate::combat_logic::start_battle(self);
        }
        Some(roll)
    }

    /// Walks away from an unresolved battle. Distinct from the escape
    /// action: no roll, no counter-attack, the monster is simply left
    /// behind.
    pub fn abandon_battle(&mut self) {
        if !self.battle.in_progress() {
            return;
        }
        self.push_journal("Battle abandoned");
        self.battle.reset();
        self.complete_encounter();
    }

    /// Discards the monster instance and clears the encounter.
    pub(crate) fn complete_encounter(&mut self) {
        self.monster = None;
    }

    // ---- items and economy ----

    pub fn buy_item(&mut self, item_id: u32) -> bool {
        let Some(idx) = self.active_hero_index() else {
            self.push_journal("Pick a hero first");
            return false;
        };
        let Some(item) = self.items.get(item_id).cloned() else {
            self.push_journal(format!("No such item: {}", item_id));
            return false;
        };
        let hero = &mut self.heroes[idx];
        if hero.level < item.required_level {
            let msg = format!("{} requires level {}", item.name, item.required_level);
            self.push_journal(msg);
            return false;
        }
        if hero.gold < item.price {
            let msg = format!("Not enough gold for {}", item.name);
            self.push_journal(msg);
            return false;
        }
        if hero.inventory.len() >= INVENTORY_CAPACITY {
            let msg = format!("Inventory full: at most {} items", INVENTORY_CAPACITY);
            self.push_journal(msg);
            return false;
        }
        if hero.inventory.contains(&item_id) || hero.equipment.is_equipped(item_id) {
            let msg = format!("Already own {}", item.name);
            self.push_journal(msg);
            return false;
        }
        hero.gold -= item.price;
        hero.inventory.push(item_id);
        let msg = format!("Bought {} for {} gold", item.name, item.price);
        self.push_journal(msg);
        true
    }

    pub fn sell_item(&mut self, item_id: u32) -> bool {
        let Some(idx) = self.active_hero_index() else {
            self.push_journal("Pick a hero first");
            return false;
        };
        let Some(item) = self.items.get(item_id).cloned() else {
            self.push_journal(format!("No such item: {}", item_id));
            return false;
        };
        let hero = &mut self.heroes[idx];
        let owned = hero.inventory.contains(&item_id) || hero.equipment.is_equipped(item_id);
        if !owned {
            let msg = format!("{} is not in the inventory", item.name);
            self.push_journal(msg);
            return false;
        }
        hero.inventory.retain(|&id| id != item_id);
        hero.equipment.remove_item(item_id);
        hero.gold += item.sell_price;
        let msg = format!("Sold {} for {} gold", item.name, item.sell_price);
        self.push_journal(msg);
        true
    }

    /// Equips an owned item into its slot; a potion is consumed instead.
    /// The previously worn item returns to the inventory.
    pub fn equip_item(&mut self, item_id: u32) -> bool {
        let Some(idx) = self.active_hero_index() else {
            self.push_journal("Pick a hero first");
            return false;
        };
        let Some(item) = self.items.get(item_id).cloned() else {
            self.push_journal(format!("No such item: {}", item_id));
            return false;
        };
        if item.kind == ItemKind::Potion {
            return self.use_potion(item_id);
        }
        let Some(slot) = item.slot else {
            self.push_journal(format!("{} cannot be equipped", item.name));
            return false;
        };
        let hero = &mut self.heroes[idx];
        if !hero.inventory.contains(&item_id) {
            let msg = format!("{} is not in the inventory", item.name);
            self.push_journal(msg);
            return false;
        }
        if let Some(previous) = hero.equipment.get(slot) {
            if !hero.inventory.contains(&previous) {
                hero.inventory.push(previous);
            }
        }
        hero.inventory.retain(|&id| id != item_id);
        hero.equipment.set(slot, Some(item_id));
        let msg = format!("Equipped: {}", item.name);
        self.push_journal(msg);
        true
    }

    /// Takes a worn item off and returns it to the inventory.
    pub fn unequip_item(&mut self, item_id: u32) -> bool {
        let Some(idx) = self.active_hero_index() else {
            self.push_journal("Pick a hero first");
            return false;
        };
        let hero = &mut self.heroes[idx];
        if !hero.equipment.is_equipped(item_id) {
            self.push_journal(format!("Item {} is not equipped", item_id));
            return false;
        }
        if hero.inventory.len() >= INVENTORY_CAPACITY {
            let msg = format!("Inventory full: at most {} items", INVENTORY_CAPACITY);
            self.push_journal(msg);
            return false;
        }
        hero.equipment.remove_item(item_id);
        hero.inventory.push(item_id);
        let name = self
            .items
            .get(item_id)
            .map(|item| item.name.clone())
            .unwrap_or_else(|| format!("item {}", item_id));
        self.push_journal(format!("Unequipped: {}", name));
        true
    }

    /// Drinks a potion from the inventory. Its heal value raises base
    /// health permanently, matching the merchant's pitch.
    pub fn use_potion(&mut self, item_id: u32) -> bool {
        let Some(idx) = self.active_hero_index() else {
            self.push_journal("Pick a hero first");
            return false;
        };
        let Some(item) = self.items.get(item_id).cloned() else {
            self.push_journal(format!("No such item: {}", item_id));
            return false;
        };
        if item.kind != ItemKind::Potion {
            self.push_journal(format!("{} is not a potion", item.name));
            return false;
        }
        let hero = &mut self.heroes[idx];
        if !hero.inventory.contains(&item_id) {
            let msg = format!("{} is not in the inventory", item.name);
            self.push_journal(msg);
            return false;
        }
        hero.base_health += item.heal;
        hero.inventory.retain(|&id| id != item_id);
        let msg = format!("Used {} (+{} health)", item.name, item.heal);
        self.push_journal(msg);
        true
    }

    /// Resets the active hero's progress back to its catalog template.
    /// The unlock flag survives the reset.
    pub fn reset_hero(&mut self) -> bool {
        let Some(idx) = self.active_hero_index() else {
            self.push_journal("Pick a hero first");
            return false;
        };
        let id = self.heroes[idx].id;
        let Some(template) = self.hero_templates.iter().find(|h| h.id == id).cloned() else {
            self.push_journal("No catalog template for this hero");
            return false;
        };
        let unlocked = self.heroes[idx].unlocked;
        self.heroes[idx] = Hero { unlocked, ..template };
        self.push_journal("Hero reset to starting condition");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fresh_state() -> GameState {
        GameState::new(GameData::builtin())
    }

    #[test]
    fn test_first_hero_forced_unlocked() {
        let mut data = GameData::builtin();
        data.heroes[0].unlocked = false;
        let state = GameState::new(data);
        assert!(state.heroes[0].unlocked);
    }

    #[test]
    fn test_select_locked_hero_rejected() {
        let mut state = fresh_state();
        assert!(!state.select_hero(2));
        assert!(state.active_hero.is_none());
        assert!(state.select_hero(1));
        assert_eq!(state.active_hero, Some(1));
    }

    #[test]
    fn test_select_locked_map_and_location_rejected() {
        let mut state = fresh_state();
        assert!(!state.select_map(5));
        assert!(state.select_map(1));
        assert!(!state.select_location(1));
        assert!(state.select_location(10));
    }

    #[test]
    fn test_start_adventure_needs_selections() {
        let mut state = fresh_state();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(!state.start_adventure(&mut rng));
        state.select_hero(1);
        assert!(!state.start_adventure(&mut rng));
        state.select_map(1);
        state.select_location(10);
        assert!(state.start_adventure(&mut rng));
        assert!(state.monster.is_some());
        // Re-entrant adventure is refused while a monster is live.
        assert!(!state.start_adventure(&mut rng));
    }

    #[test]
    fn test_buy_rules() {
        let mut state = fresh_state();
        state.select_hero(1);
        // Rusty Sword: 50 gold, level 1.
        assert!(state.buy_item(2));
        assert_eq!(state.active_hero().unwrap().gold, 450);
        // Duplicates rejected, no gold spent.
        assert!(!state.buy_item(2));
        assert_eq!(state.active_hero().unwrap().gold, 450);
        // Level gate.
        assert!(!state.buy_item(6)); // Vampiric Blade requires level 9
        // Unknown item.
        assert!(!state.buy_item(999));
    }

    #[test]
    fn test_buy_respects_gold_and_capacity() {
        let mut state = fresh_state();
        state.select_hero(1);
        {
            let hero = state.active_hero_mut().unwrap();
            hero.gold = 10;
        }
        assert!(!state.buy_item(2));
        {
            let hero = state.active_hero_mut().unwrap();
            hero.gold = 100_000;
            hero.inventory = (100..110).collect(); // already at capacity
        }
        assert!(!state.buy_item(2));
    }

    #[test]
    fn test_equip_swaps_previous_back_to_inventory() {
        let mut state = fresh_state();
        state.select_hero(1);
        state.active_hero_mut().unwrap().level = 3;
        assert!(state.buy_item(2)); // Rusty Sword
        assert!(state.buy_item(3)); // Orcish Cleaver
        assert!(state.equip_item(2));
        assert!(state.equip_item(3));
        let hero = state.active_hero().unwrap();
        assert_eq!(hero.equipment.main_hand, Some(3));
        assert!(hero.inventory.contains(&2));
        assert!(!hero.inventory.contains(&3));
    }

    #[test]
    fn test_equip_requires_ownership() {
        let mut state = fresh_state();
        state.select_hero(1);
        assert!(!state.equip_item(2));
        assert!(state.active_hero().unwrap().equipment.main_hand.is_none());
    }

    #[test]
    fn test_sell_unequips() {
        let mut state = fresh_state();
        state.select_hero(1);
        state.buy_item(2);
        state.equip_item(2);
        let gold_before = state.active_hero().unwrap().gold;
        assert!(state.sell_item(2));
        let hero = state.active_hero().unwrap();
        assert!(hero.equipment.main_hand.is_none());
        assert_eq!(hero.gold, gold_before + 25);
        // Selling again fails: not owned.
        assert!(!state.sell_item(2));
    }

    #[test]
    fn test_unequip_returns_item_to_inventory() {
        let mut state = fresh_state();
        state.select_hero(1);
        state.buy_item(2);
        state.equip_item(2);
        assert!(state.unequip_item(2));
        let hero = state.active_hero().unwrap();
        assert!(hero.equipment.main_hand.is_none());
        assert!(hero.inventory.contains(&2));
        // Not equipped any more.
        assert!(!state.unequip_item(2));
    }

    #[test]
    fn test_unequip_respects_inventory_capacity() {
        let mut state = fresh_state();
        state.select_hero(1);
        state.buy_item(2);
        state.equip_item(2);
        state.active_hero_mut().unwrap().inventory = (100..110).collect();
        assert!(!state.unequip_item(2));
        assert_eq!(state.active_hero().unwrap().equipment.main_hand, Some(2));
    }

    #[test]
    fn test_potion_raises_base_health_and_is_consumed() {
        let mut state = fresh_state();
        state.select_hero(1);
        state.buy_item(1);
        let base_before = state.active_hero().unwrap().base_health;
        assert!(state.equip_item(1)); // potions are drunk, not worn
        let hero = state.active_hero().unwrap();
        assert_eq!(hero.base_health, base_before + 20);
        assert!(hero.inventory.is_empty());
    }

    #[test]
    fn test_reset_hero_restores_template_but_keeps_unlock() {
        let mut state = fresh_state();
        state.select_hero(1);
        {
            let hero = state.active_hero_mut().unwrap();
            hero.gold = 9_999;
            hero.level = 7;
            hero.base_health = 400;
        }
        assert!(state.reset_hero());
        let hero = state.active_hero().unwrap();
        assert_eq!(hero.gold, 500);
        assert_eq!(hero.level, 1);
        assert_eq!(hero.base_health, 100);
        assert!(hero.unlocked);
    }

    #[test]
    fn test_journal_is_bounded() {
        let mut state = fresh_state();
        for i in 0..(JOURNAL_CAPACITY + 50) {
            state.push_journal(format!("entry {}", i));
        }
        assert_eq!(state.journal.len(), JOURNAL_CAPACITY);
        assert_eq!(state.journal.last().unwrap(), &format!("entry {}", JOURNAL_CAPACITY + 49));
    }
}
