//! Owned item instances

use crate::config::{ItemConstants, ItemDef};
use crate::roll::{chance, variance};
use crate::types::{Element, ItemUid, Rarity};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An owned copy of an item definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInstance {
    pub uid: ItemUid,
    /// Definition identifier
    pub item_id: String,
    /// Base value varied by the roll at creation
    pub final_value: u32,
    /// Distinct elemental affixes
    #[serde(default)]
    pub affixes: Vec<Element>,
}

/// Roll a new instance of `def`
pub fn create_item(
    def: &ItemDef,
    uid: ItemUid,
    constants: &ItemConstants,
    rng: &mut impl Rng,
) -> ItemInstance {
    let final_value = if def.value > 0 {
        (def.value as f64 * variance(rng, constants.value_variance)).floor() as u32
    } else {
        0
    };

    let affixes = if def.kind.is_gear() {
        let count = affix_count(def.rarity, constants, rng);
        Element::FIVE.choose_multiple(rng, count).copied().collect()
    } else {
        Vec::new()
    };

    ItemInstance {
        uid,
        item_id: def.id.clone(),
        final_value,
        affixes,
    }
}

fn affix_count(rarity: Rarity, constants: &ItemConstants, rng: &mut impl Rng) -> usize {
    match rarity {
        Rarity::Common => usize::from(chance(rng, constants.common_affix_chance)),
        Rarity::Rare => 1,
        Rarity::Epic => 1 + usize::from(chance(rng, constants.epic_second_affix_chance)),
        Rarity::Legend | Rarity::Myth => {
            2 + usize::from(chance(rng, constants.legend_third_affix_chance))
        }
    }
}
