use crate::bonus::{Bonus, BonusKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentSlot {
    MainHand,
    Chest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon,
    Armor,
    Potion,
}

/// Catalog item record, immutable at runtime. Heroes reference items by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub name: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub slot: Option<EquipmentSlot>,
    #[serde(default)]
    pub bonus: Option<Bonus>,
    #[serde(default)]
    pub fixed_damage: u32,
    #[serde(default)]
    pub fixed_armor: u32,
    #[serde(default)]
    pub heal: u32,
    pub price: u64,
    pub sell_price: u64,
    #[serde(default)]
    pub required_level: u32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCatalog {
    items: Vec<Item>,
}

impl ItemCatalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn get(&self, id: u32) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::new(default_items())
    }
}

fn weapon(
    id: u32,
    name: &str,
    fixed_damage: u32,
    bonus: Option<Bonus>,
    price: u64,
    required_level: u32,
) -> Item {
    Item {
        id,
        name: name.to_string(),
        kind: ItemKind::Weapon,
        slot: Some(EquipmentSlot::MainHand),
        bonus,
        fixed_damage,
        fixed_armor: 0,
        heal: 0,
        price,
        sell_price: price / 2,
        required_level,
        description: String::new(),
    }
}

fn armor(
    id: u32,
    name: &str,
    fixed_armor: u32,
    bonus: Option<Bonus>,
    price: u64,
    required_level: u32,
) -> Item {
    Item {
        id,
        name: name.to_string(),
        kind: ItemKind::Armor,
        slot: Some(EquipmentSlot::Chest),
        bonus,
        fixed_damage: 0,
        fixed_armor,
        heal: 0,
        price,
        sell_price: price / 2,
        required_level,
        description: String::new(),
    }
}

/// Built-in item catalog used when the data provider fails or supplies
/// nothing. Covers every bonus kind gear can carry so degraded mode still
/// exercises the whole combat model.
pub fn default_items() -> Vec<Item> {
    vec![
        Item {
            id: 1,
            name: "Small Health Potion".to_string(),
            kind: ItemKind::Potion,
            slot: None,
            bonus: None,
            fixed_damage: 0,
            fixed_armor: 0,
            heal: 20,
            price: 25,
            sell_price: 12,
            required_level: 0,
            description: "Restores a little vigor.".to_string(),
        },
        weapon(2, "Rusty Sword", 5, None, 50, 1),
        weapon(
            3,
            "Orcish Cleaver",
            8,
            Some(Bonus::new(BonusKind::DamageMult, 0.1)),
            150,
            3,
        ),
        weapon(
            4,
            "Duelist Rapier",
            10,
            Some(Bonus::new(BonusKind::CritChance, 0.15)),
            400,
            5,
        ),
        weapon(
            5,
            "Serpent Fang",
            12,
            Some(Bonus::new(BonusKind::ArmorPenetration, 0.2)),
            700,
            7,
        ),
        weapon(
            6,
            "Vampiric Blade",
            14,
            Some(Bonus::new(BonusKind::Vampirism, 0.25)),
            1200,
            9,
        ),
        armor(7, "Leather Jerkin", 3, None, 40, 1),
        armor(
            8,
            "Dragonhide Vest",
            6,
            Some(Bonus::new(BonusKind::ArmorMult, 0.15)),
            300,
            4,
        ),
        armor(
            9,
            "Warded Plate",
            10,
            Some(Bonus::new(BonusKind::HealthMult, 0.2)),
            800,
            8,
        ),
        armor(
            10,
            "Troll Skin Cloak",
            4,
            Some(Bonus::new(BonusKind::HealthRegenMult, 0.5)),
            500,
            6,
        ),
    ]
}
