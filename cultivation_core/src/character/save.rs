//! Persisted character shapes and the load-time upgrade

use super::{Attributes, CharacterState, Equipment, SKILL_SLOTS};
use crate::config::ContentTables;
use crate::item::ItemInstance;
use crate::progression::exp_cap;
use crate::types::{Element, GearSlot, ItemUid};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Item entry as found in a save, any field may be missing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedItem {
    pub uid: Option<u64>,
    pub item_id: Option<String>,
    pub final_value: Option<u32>,
    pub affixes: Option<Vec<Element>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedEquipment {
    pub weapon: Option<u64>,
    pub armor: Option<u64>,
    pub furnace: Option<u64>,
    pub robe: Option<u64>,
    pub artifact: Option<u64>,
    pub skills: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedAttributes {
    pub gold: Option<u32>,
    pub wood: Option<u32>,
    pub water: Option<u32>,
    pub fire: Option<u32>,
    pub earth: Option<u32>,
}

/// Character state as stored by any earlier version
///
/// Every field is optional; `upgrade` fills the gaps once at load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedCharacter {
    pub name: Option<String>,
    pub realm: Option<u32>,
    pub level: Option<u32>,
    pub exp: Option<u64>,
    pub hp: Option<u32>,
    pub base_max_hp: Option<u32>,
    pub mp: Option<u32>,
    pub base_max_mp: Option<u32>,
    pub injury: Option<u32>,
    pub corruption: Option<u32>,
    pub qi_deviation: Option<bool>,
    pub stones: Option<u64>,
    pub attributes: Option<PersistedAttributes>,
    pub free_points: Option<u32>,
    pub map_id: Option<u32>,
    pub inventory: Option<Vec<PersistedItem>>,
    pub learned_skills: Option<Vec<String>>,
    pub equipment: Option<PersistedEquipment>,
    pub next_item_id: Option<u64>,
}

impl From<&CharacterState> for PersistedCharacter {
    fn from(state: &CharacterState) -> Self {
        let a = state.attributes;
        let e = &state.equipment;
        PersistedCharacter {
            name: Some(state.name.clone()),
            realm: Some(state.realm),
            level: Some(state.level),
            exp: Some(state.exp),
            hp: Some(state.hp),
            base_max_hp: Some(state.base_max_hp),
            mp: Some(state.mp),
            base_max_mp: Some(state.base_max_mp),
            injury: Some(state.injury),
            corruption: Some(state.corruption),
            qi_deviation: Some(state.qi_deviation),
            stones: Some(state.stones),
            attributes: Some(PersistedAttributes {
                gold: Some(a.gold),
                wood: Some(a.wood),
                water: Some(a.water),
                fire: Some(a.fire),
                earth: Some(a.earth),
            }),
            free_points: Some(state.free_points),
            map_id: Some(state.map_id),
            inventory: Some(
                state
                    .inventory
                    .iter()
                    .map(|i| PersistedItem {
                        uid: Some(i.uid.0),
                        item_id: Some(i.item_id.clone()),
                        final_value: Some(i.final_value),
                        affixes: Some(i.affixes.clone()),
                    })
                    .collect(),
            ),
            learned_skills: Some(state.learned_skills.clone()),
            equipment: Some(PersistedEquipment {
                weapon: e.weapon.map(|u| u.0),
                armor: e.armor.map(|u| u.0),
                furnace: e.furnace.map(|u| u.0),
                robe: e.robe.map(|u| u.0),
                artifact: e.artifact.map(|u| u.0),
                skills: e.skills.to_vec(),
            }),
            next_item_id: Some(state.next_item_id),
        }
    }
}

/// Bring a persisted character up to the current shape
///
/// Drops inventory entries whose definition no longer exists, clears slots
/// pointing at missing items or unlearned skills, rebuilds the learned set
/// from slotted skills when a save predates it, fills numeric defaults and
/// recomputes the experience cap.
pub fn upgrade(persisted: PersistedCharacter, tables: &ContentTables) -> CharacterState {
    let constants = &tables.constants;
    let creation = &constants.creation;
    let peak = constants.realms.peak();
    let max_level = constants.realms.max_level.max(1);

    let attrs = persisted.attributes.unwrap_or_default();
    let min = creation.attribute_min;
    let attributes = Attributes {
        gold: attrs.gold.unwrap_or(min),
        wood: attrs.wood.unwrap_or(min),
        water: attrs.water.unwrap_or(min),
        fire: attrs.fire.unwrap_or(min),
        earth: attrs.earth.unwrap_or(min),
    };

    // Inventory: keep known definitions, assign ids where missing
    let entries = persisted.inventory.unwrap_or_default();
    let highest_saved = entries.iter().filter_map(|e| e.uid).max().unwrap_or(0);
    let mut next_item_id = persisted.next_item_id.unwrap_or(1).max(highest_saved.saturating_add(1));
    let mut inventory: Vec<ItemInstance> = Vec::new();
    for entry in entries {
        let Some(item_id) = entry.item_id.filter(|id| tables.items.contains(id)) else {
            warn!("dropping inventory entry with unknown definition");
            continue;
        };
        let uid = match entry.uid {
            Some(uid) if !inventory.iter().any(|i| i.uid.0 == uid) => uid,
            _ => {
                let uid = next_item_id;
                next_item_id = next_item_id.saturating_add(1);
                uid
            }
        };
        inventory.push(ItemInstance {
            uid: ItemUid(uid),
            item_id,
            final_value: entry.final_value.unwrap_or(0),
            affixes: entry.affixes.unwrap_or_default(),
        });
    }
    let saved_equipment = persisted.equipment.unwrap_or_default();

    // Learned set: fall back to whatever is slotted
    let mut learned_skills = persisted.learned_skills.unwrap_or_else(|| {
        saved_equipment.skills.iter().flatten().cloned().collect()
    });
    let mut seen = Vec::new();
    learned_skills.retain(|s| {
        let keep = tables.skills.contains(s) && !seen.contains(s);
        if keep {
            seen.push(s.clone());
        }
        keep
    });

    let mut equipment = Equipment::default();
    let gear = [
        (GearSlot::Weapon, saved_equipment.weapon),
        (GearSlot::Armor, saved_equipment.armor),
        (GearSlot::Furnace, saved_equipment.furnace),
        (GearSlot::Robe, saved_equipment.robe),
        (GearSlot::Artifact, saved_equipment.artifact),
    ];
    for (slot, uid) in gear {
        let owned = uid.filter(|u| {
            inventory.iter().any(|i| {
                i.uid.0 == *u
                    && tables
                        .items
                        .get(&i.item_id)
                        .and_then(|d| d.kind.gear_slot())
                        == Some(slot)
            })
        });
        *equipment.slot_mut(slot) = owned.map(ItemUid);
    }
    for (idx, skill) in saved_equipment.skills.into_iter().take(SKILL_SLOTS).enumerate() {
        equipment.skills[idx] = skill.filter(|s| learned_skills.contains(s));
    }

    let realm = persisted.realm.unwrap_or(0).min(peak);
    let level = persisted.level.unwrap_or(1).clamp(1, max_level);
    let cap = exp_cap(realm, level, &constants.realms);
    let mut exp = persisted.exp.unwrap_or(0);
    if level >= max_level {
        exp = exp.min(cap);
    }

    let base_max_hp = persisted.base_max_hp.unwrap_or(creation.start_hp).max(1);
    let base_max_mp = persisted.base_max_mp.unwrap_or(creation.start_mp);
    let state = CharacterState {
        name: persisted.name.unwrap_or_else(|| "Nameless".to_string()),
        realm,
        level,
        exp,
        exp_cap: cap,
        hp: persisted.hp.unwrap_or(creation.start_hp),
        base_max_hp,
        mp: persisted.mp.unwrap_or(creation.start_mp),
        base_max_mp,
        injury: persisted.injury.unwrap_or(0).min(100),
        corruption: persisted.corruption.unwrap_or(0).min(100),
        qi_deviation: persisted.qi_deviation.unwrap_or(false),
        stones: persisted.stones.unwrap_or(0),
        attributes,
        free_points: persisted.free_points.unwrap_or(0),
        map_id: persisted.map_id.unwrap_or(0),
        inventory,
        learned_skills,
        equipment,
        next_item_id,
    };
    info!(name = %state.name, realm = state.realm, level = state.level, "character loaded");
    state
}
