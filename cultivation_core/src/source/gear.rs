//! GearSource - Stats from equipped items

use crate::character::Attributes;
use crate::item::ItemInstance;
use crate::source::StatSource;
use crate::stats::StatAccumulator;
use crate::types::{Attribute, GearSlot};

/// Stats from an equipped item
pub struct GearSource {
    /// Which slot this item is in
    pub slot: GearSlot,
    /// The equipped item
    pub item: ItemInstance,
    /// Wearer's attributes, for affix bonuses
    pub attributes: Attributes,
    /// Bonus per matching attribute point, as a fraction of the final value
    pub affix_bonus_per_point: f64,
}

impl GearSource {
    pub fn new(
        slot: GearSlot,
        item: ItemInstance,
        attributes: Attributes,
        affix_bonus_per_point: f64,
    ) -> Self {
        GearSource {
            slot,
            item,
            attributes,
            affix_bonus_per_point,
        }
    }

    /// Final value plus a bonus for each affix matching an allocated attribute
    pub fn contribution(&self) -> f64 {
        let value = self.item.final_value as f64;
        let bonus: f64 = self
            .item
            .affixes
            .iter()
            .filter_map(|e| Attribute::from_element(*e))
            .map(|attr| self.attributes.get(attr))
            .filter(|points| *points > 0)
            .map(|points| (value * points as f64 * self.affix_bonus_per_point).floor())
            .sum();
        value + bonus
    }
}

impl StatSource for GearSource {
    fn id(&self) -> &str {
        &self.item.item_id
    }

    fn priority(&self) -> i32 {
        0
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        match self.slot {
            GearSlot::Weapon => stats.attack_flat += self.contribution(),
            GearSlot::Armor => stats.defense_flat += self.contribution(),
            GearSlot::Artifact => stats.luck_flat += self.contribution(),
            // Furnace and robe feed breakthrough, not combat stats
            GearSlot::Furnace | GearSlot::Robe => {}
        }
    }
}
