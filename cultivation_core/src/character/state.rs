//! Persistent character progression state

use crate::item::ItemInstance;
use crate::types::{Attribute, GearSlot, ItemUid};
use serde::{Deserialize, Serialize};

/// Number of skill slots
pub const SKILL_SLOTS: usize = 3;

/// The five allocated elemental affinities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub gold: u32,
    pub wood: u32,
    pub water: u32,
    pub fire: u32,
    pub earth: u32,
}

impl Attributes {
    pub fn uniform(value: u32) -> Self {
        Attributes {
            gold: value,
            wood: value,
            water: value,
            fire: value,
            earth: value,
        }
    }

    pub fn get(&self, attr: Attribute) -> u32 {
        match attr {
            Attribute::Gold => self.gold,
            Attribute::Wood => self.wood,
            Attribute::Water => self.water,
            Attribute::Fire => self.fire,
            Attribute::Earth => self.earth,
        }
    }

    pub fn get_mut(&mut self, attr: Attribute) -> &mut u32 {
        match attr {
            Attribute::Gold => &mut self.gold,
            Attribute::Wood => &mut self.wood,
            Attribute::Water => &mut self.water,
            Attribute::Fire => &mut self.fire,
            Attribute::Earth => &mut self.earth,
        }
    }

    pub fn total(&self) -> u32 {
        self.gold + self.wood + self.water + self.fire + self.earth
    }
}

/// Gear and skill slots
///
/// Gear slots reference inventory entries; skill slots reference learned skills.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<ItemUid>,
    pub armor: Option<ItemUid>,
    pub furnace: Option<ItemUid>,
    pub robe: Option<ItemUid>,
    pub artifact: Option<ItemUid>,
    pub skills: [Option<String>; SKILL_SLOTS],
}

impl Equipment {
    pub fn slot(&self, slot: GearSlot) -> Option<ItemUid> {
        match slot {
            GearSlot::Weapon => self.weapon,
            GearSlot::Armor => self.armor,
            GearSlot::Furnace => self.furnace,
            GearSlot::Robe => self.robe,
            GearSlot::Artifact => self.artifact,
        }
    }

    pub fn slot_mut(&mut self, slot: GearSlot) -> &mut Option<ItemUid> {
        match slot {
            GearSlot::Weapon => &mut self.weapon,
            GearSlot::Armor => &mut self.armor,
            GearSlot::Furnace => &mut self.furnace,
            GearSlot::Robe => &mut self.robe,
            GearSlot::Artifact => &mut self.artifact,
        }
    }

    /// Clear every gear slot holding `uid`
    pub fn clear_item(&mut self, uid: ItemUid) {
        for slot in GearSlot::all() {
            let entry = self.slot_mut(*slot);
            if *entry == Some(uid) {
                *entry = None;
            }
        }
    }

    /// Identifiers of the slotted skills
    pub fn slotted_skills(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().filter_map(|s| s.as_deref())
    }

    pub fn has_skill(&self, skill_id: &str) -> bool {
        self.slotted_skills().any(|s| s == skill_id)
    }
}

/// The single long-lived character value every engine operation transforms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterState {
    pub name: String,
    pub realm: u32,
    /// 1..=max level within the realm
    pub level: u32,
    pub exp: u64,
    pub exp_cap: u64,
    pub hp: u32,
    /// HP pool before passive bonuses
    pub base_max_hp: u32,
    pub mp: u32,
    /// MP pool before water and passive bonuses
    pub base_max_mp: u32,
    /// Percent
    pub injury: u32,
    /// Percent
    pub corruption: u32,
    pub qi_deviation: bool,
    pub stones: u64,
    pub attributes: Attributes,
    pub free_points: u32,
    pub map_id: u32,
    pub inventory: Vec<ItemInstance>,
    pub learned_skills: Vec<String>,
    pub equipment: Equipment,
    /// Next instance id handed out by `take_item_id`
    pub next_item_id: u64,
}

impl CharacterState {
    pub fn item(&self, uid: ItemUid) -> Option<&ItemInstance> {
        self.inventory.iter().find(|i| i.uid == uid)
    }

    /// First owned instance of a definition
    pub fn find_item(&self, item_id: &str) -> Option<&ItemInstance> {
        self.inventory.iter().find(|i| i.item_id == item_id)
    }

    /// The instance in a gear slot, if it is still owned
    pub fn equipped(&self, slot: GearSlot) -> Option<&ItemInstance> {
        self.equipment.slot(slot).and_then(|uid| self.item(uid))
    }

    /// Final value of the equipped item in `slot`, 0 when empty
    pub fn equipped_value(&self, slot: GearSlot) -> u32 {
        self.equipped(slot).map_or(0, |i| i.final_value)
    }

    pub fn knows_skill(&self, skill_id: &str) -> bool {
        self.learned_skills.iter().any(|s| s == skill_id)
    }

    pub fn is_injured(&self) -> bool {
        self.injury > 0
    }

    /// Allocate the next item id
    pub fn take_item_id(&mut self) -> ItemUid {
        let uid = ItemUid(self.next_item_id);
        self.next_item_id = self.next_item_id.saturating_add(1);
        uid
    }

    /// Remove an instance and clear any slot referencing it
    pub fn remove_item(&mut self, uid: ItemUid) -> Option<ItemInstance> {
        let idx = self.inventory.iter().position(|i| i.uid == uid)?;
        self.equipment.clear_item(uid);
        Some(self.inventory.remove(idx))
    }

    /// Sum of allocated attributes and unspent points
    pub fn attribute_budget(&self) -> u32 {
        self.attributes.total() + self.free_points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::sample_character;

    #[test]
    fn test_remove_item_clears_slots() {
        let mut state = sample_character();
        let uid = state.take_item_id();
        state.inventory.push(ItemInstance {
            uid,
            item_id: "w_iron".to_string(),
            final_value: 120,
            affixes: vec![],
        });
        state.equipment.weapon = Some(uid);

        assert_eq!(state.equipped_value(GearSlot::Weapon), 120);
        let removed = state.remove_item(uid).unwrap();
        assert_eq!(removed.item_id, "w_iron");
        assert_eq!(state.equipment.weapon, None);
        assert_eq!(state.equipped_value(GearSlot::Weapon), 0);
    }

    #[test]
    fn test_take_item_id_is_monotonic() {
        let mut state = sample_character();
        let a = state.take_item_id();
        let b = state.take_item_id();
        assert!(b > a);
    }

    #[test]
    fn test_slotted_skills() {
        let mut equipment = Equipment::default();
        equipment.skills[1] = Some("s_fire_1".to_string());
        assert_eq!(equipment.slotted_skills().collect::<Vec<_>>(), vec!["s_fire_1"]);
        assert!(equipment.has_skill("s_fire_1"));
        assert!(!equipment.has_skill("s_fire_2"));
    }
}
