//! Item definition table loading

use super::ConfigError;
use crate::item::ItemEffect;
use crate::types::{ItemKind, Rarity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Static definition of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub rarity: Rarity,
    /// Base value rolled into an instance's final value
    #[serde(default)]
    pub value: u32,
    /// Shop price in spirit stones
    #[serde(default)]
    pub price: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effect: Option<ItemEffect>,
}

impl ItemDef {
    /// Whether this definition may appear as an encounter drop
    pub fn is_droppable(&self) -> bool {
        self.kind != ItemKind::Consumable && self.kind != ItemKind::SkillBook
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemsFile {
    #[serde(rename = "items")]
    items: Vec<ItemDef>,
}

/// Item definitions keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct ItemTable {
    defs: BTreeMap<String, ItemDef>,
}

impl ItemTable {
    pub fn new(defs: impl IntoIterator<Item = ItemDef>) -> Self {
        ItemTable {
            defs: defs.into_iter().map(|d| (d.id.clone(), d)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ItemDef> {
        self.defs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.defs.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDef> {
        self.defs.values()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Droppable definitions whose rarity is in `rarities`, in id order
    pub fn drop_candidates(&self, rarities: &[Rarity]) -> Vec<&ItemDef> {
        self.defs
            .values()
            .filter(|d| d.is_droppable() && rarities.contains(&d.rarity))
            .collect()
    }

    /// Skill books that teach a skill directly, in id order
    pub fn skill_books(&self) -> Vec<&ItemDef> {
        self.defs
            .values()
            .filter(|d| matches!(d.effect, Some(ItemEffect::LearnSkill { .. })))
            .collect()
    }
}

/// Load item definitions from a TOML file
pub fn load_item_table(path: &Path) -> Result<ItemTable, ConfigError> {
    let file: ItemsFile = super::load_toml(path)?;
    Ok(ItemTable::new(file.items))
}

/// Load item definitions from a TOML string
pub fn parse_item_table(content: &str) -> Result<ItemTable, ConfigError> {
    let file: ItemsFile = super::parse_toml(content)?;
    Ok(ItemTable::new(file.items))
}

/// Get the built-in item table
pub fn default_items() -> ItemTable {
    let toml = include_str!("../../config/items.toml");
    parse_item_table(toml).unwrap_or_else(|_| {
        ItemTable::new([ItemDef {
            id: "hp_s".to_string(),
            name: "Minor Rejuvenation Pill".to_string(),
            kind: ItemKind::Consumable,
            rarity: Rarity::Common,
            value: 0,
            price: 10,
            description: String::new(),
            effect: Some(ItemEffect::RestoreHp { amount: 50 }),
        }])
    })
}
