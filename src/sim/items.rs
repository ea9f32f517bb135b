//! Collectible items and the player's inventory

use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// One throwing stone
    Stone,
    /// Unlocks the bolt attack
    Staff,
    /// Consumable, restores health from the inventory screen
    Herb,
    /// Pure collectible
    Relic,
}

/// Item pickup size in pixels
pub const ITEM_SIZE: f32 = 24.0;

/// A collectible lying in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub rect: Rect,
    /// Tombstone flag, swept at the end of the frame
    pub collected: bool,
}

impl Item {
    pub fn new(id: u32, kind: ItemKind, x: f32, y: f32) -> Self {
        Self {
            id,
            kind,
            rect: Rect::new(x, y, ITEM_SIZE, ITEM_SIZE),
            collected: false,
        }
    }
}

/// Entries the inventory cursor can land on, in display order
pub const INVENTORY_SLOTS: [ItemKind; 4] =
    [ItemKind::Stone, ItemKind::Staff, ItemKind::Herb, ItemKind::Relic];

/// Result of using the selected slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseOutcome {
    /// Restore this much health
    Heal(i32),
    /// Slot empty or not a consumable
    Nothing,
}

/// What the player is carrying
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub stones: u32,
    pub has_staff: bool,
    pub herbs: u32,
    pub relics: u32,
    /// Index into [`INVENTORY_SLOTS`]
    pub selected: usize,
}

impl Inventory {
    pub fn with_stones(stones: u32) -> Self {
        Self {
            stones,
            ..Default::default()
        }
    }

    pub fn add(&mut self, kind: ItemKind) {
        match kind {
            ItemKind::Stone => self.stones += 1,
            ItemKind::Staff => self.has_staff = true,
            ItemKind::Herb => self.herbs += 1,
            ItemKind::Relic => self.relics += 1,
        }
    }

    /// Spend one stone, false if none left
    pub fn take_stone(&mut self) -> bool {
        if self.stones == 0 {
            return false;
        }
        self.stones -= 1;
        true
    }

    pub fn count(&self, kind: ItemKind) -> u32 {
        match kind {
            ItemKind::Stone => self.stones,
            ItemKind::Staff => self.has_staff as u32,
            ItemKind::Herb => self.herbs,
            ItemKind::Relic => self.relics,
        }
    }

    pub fn selected_kind(&self) -> ItemKind {
        INVENTORY_SLOTS[self.selected % INVENTORY_SLOTS.len()]
    }

    /// Move the cursor by `delta` slots, wrapping around
    pub fn move_cursor(&mut self, delta: i32) {
        let len = INVENTORY_SLOTS.len() as i32;
        let next = (self.selected as i32 + delta).rem_euclid(len);
        self.selected = next as usize;
    }

    /// Use the selected slot (only herbs are consumable)
    pub fn use_selected(&mut self, herb_heal: i32) -> UseOutcome {
        match self.selected_kind() {
            ItemKind::Herb if self.herbs > 0 => {
                self.herbs -= 1;
                UseOutcome::Heal(herb_heal)
            }
            _ => UseOutcome::Nothing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_count() {
        let mut inv = Inventory::with_stones(2);
        inv.add(ItemKind::Stone);
        inv.add(ItemKind::Staff);
        inv.add(ItemKind::Staff);
        inv.add(ItemKind::Relic);
        assert_eq!(inv.count(ItemKind::Stone), 3);
        assert_eq!(inv.count(ItemKind::Staff), 1);
        assert_eq!(inv.count(ItemKind::Relic), 1);
        assert_eq!(inv.count(ItemKind::Herb), 0);
    }

    #[test]
    fn test_take_stone_runs_out() {
        let mut inv = Inventory::with_stones(1);
        assert!(inv.take_stone());
        assert!(!inv.take_stone());
        assert_eq!(inv.stones, 0);
    }

    #[test]
    fn test_cursor_wraps() {
        let mut inv = Inventory::default();
        assert_eq!(inv.selected_kind(), ItemKind::Stone);
        inv.move_cursor(-1);
        assert_eq!(inv.selected_kind(), ItemKind::Relic);
        inv.move_cursor(3);
        assert_eq!(inv.selected_kind(), ItemKind::Herb);
    }

    #[test]
    fn test_use_herb() {
        let mut inv = Inventory::default();
        inv.selected = 2;
        assert_eq!(inv.use_selected(2), UseOutcome::Nothing);
        inv.add(ItemKind::Herb);
        assert_eq!(inv.use_selected(2), UseOutcome::Heal(2));
        assert_eq!(inv.herbs, 0);

        // Stones are ammo, not consumables
        inv.selected = 0;
        inv.add(ItemKind::Stone);
        assert_eq!(inv.use_selected(2), UseOutcome::Nothing);
        assert_eq!(inv.stones, 1);
    }
}
