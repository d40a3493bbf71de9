use crate::bonus::Bonus;
use crate::items::{EquipmentSlot, ItemCatalog, ItemKind};
use serde::{Deserialize, Serialize};

/// Worn gear, one optional catalog item id per slot. An item id can occupy
/// at most one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Equipment {
    pub main_hand: Option<u32>,
    pub chest: Option<u32>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<u32> {
        match slot {
            EquipmentSlot::MainHand => self.main_hand,
            EquipmentSlot::Chest => self.chest,
        }
    }

    pub fn set(&mut self, slot: EquipmentSlot, item_id: Option<u32>) {
        match slot {
            EquipmentSlot::MainHand => self.main_hand = item_id,
            EquipmentSlot::Chest => self.chest = item_id,
        }
    }

    pub fn is_equipped(&self, item_id: u32) -> bool {
        self.main_hand == Some(item_id) || self.chest == Some(item_id)
    }

    /// Removes the item from whichever slot holds it, if any.
    pub fn remove_item(&mut self, item_id: u32) {
        if self.main_hand == Some(item_id) {
            self.main_hand = None;
        }
        if self.chest == Some(item_id) {
            self.chest = None;
        }
    }

    /// Percentage/probability bonus contributed by the item in `slot`.
    /// An empty slot or a dangling item id contributes nothing.
    pub fn slot_bonus(&self, slot: EquipmentSlot, items: &ItemCatalog) -> Option<Bonus> {
        let id = self.get(slot)?;
        items.get(id).and_then(|item| item.bonus)
    }

    /// Flat damage addend from the equipped weapon.
    pub fn fixed_damage_bonus(&self, items: &ItemCatalog) -> u32 {
        self.main_hand
            .and_then(|id| items.get(id))
            .filter(|item| item.kind == ItemKind::Weapon)
            .map(|item| item.fixed_damage)
            .unwrap_or(0)
    }

    /// Flat armor addend from the equipped chest piece.
    pub fn fixed_armor_bonus(&self, items: &ItemCatalog) -> u32 {
        self.chest
            .and_then(|id| items.get(id))
            .filter(|item| item.kind == ItemKind::Armor)
            .map(|item| item.fixed_armor)
            .unwrap_or(0)
    }
}
