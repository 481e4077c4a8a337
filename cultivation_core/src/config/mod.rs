//! Configuration loading from TOML files

mod constants;
mod items;
mod maps;
mod skills;

pub use constants::{
    BreakthroughConstants, CombatConstants, CreationConstants, EncounterConstants,
    GameConstants, InjuryConstants, ItemConstants, LevelUpConstants, OvershootStep, PerClass,
    RealmConstants, RecoveryConstants, RewardConstants, TickConstants,
};
pub use items::{default_items, load_item_table, parse_item_table, ItemDef, ItemTable};
pub use maps::{
    default_maps, default_monsters, load_map_table, load_monster_table, parse_map_table,
    parse_monster_table, MapBase, MapDef, MapTable, MonsterPool, MonsterTable, MonsterTemplate,
    StatModifiers,
};
pub use skills::{default_skills, load_skill_table, parse_skill_table, SkillTable};

use crate::element::ElementTable;
use crate::item::ItemEffect;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Every static table the engine reads
#[derive(Debug, Clone)]
pub struct ContentTables {
    pub items: ItemTable,
    pub skills: SkillTable,
    pub maps: MapTable,
    pub monsters: MonsterTable,
    pub elements: ElementTable,
    pub constants: GameConstants,
}

impl ContentTables {
    /// Tables embedded in the crate
    pub fn builtin() -> Self {
        ContentTables {
            items: default_items(),
            skills: default_skills(),
            maps: default_maps(),
            monsters: default_monsters(),
            elements: ElementTable::default(),
            constants: GameConstants::default(),
        }
    }

    /// Load tables from a directory
    ///
    /// `items.toml`, `skills.toml`, `maps.toml` and `monsters.toml` are
    /// required. `elements.toml` and `constants.toml` are optional and fall
    /// back to the built-in values.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let elements_path = dir.join("elements.toml");
        let elements = if elements_path.exists() {
            load_toml(&elements_path)?
        } else {
            ElementTable::default()
        };

        let constants_path = dir.join("constants.toml");
        let constants = if constants_path.exists() {
            load_toml(&constants_path)?
        } else {
            GameConstants::default()
        };

        let tables = ContentTables {
            items: load_item_table(&dir.join("items.toml"))?,
            skills: load_skill_table(&dir.join("skills.toml"))?,
            maps: load_map_table(&dir.join("maps.toml"))?,
            monsters: load_monster_table(&dir.join("monsters.toml"))?,
            elements,
            constants,
        };
        tables.validate()?;

        debug!(
            dir = %dir.display(),
            items = tables.items.len(),
            skills = tables.skills.len(),
            maps = tables.maps.len(),
            "loaded content tables"
        );
        Ok(tables)
    }

    /// Check cross-table references
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.maps.is_empty() {
            return Err(ConfigError::ValidationError("no maps defined".to_string()));
        }
        if self.monsters.pool(0).map_or(true, |p| p.common.is_empty()) {
            return Err(ConfigError::ValidationError(
                "tier 0 needs at least one common monster".to_string(),
            ));
        }
        if self.constants.realms.names.is_empty() {
            return Err(ConfigError::ValidationError("no realms defined".to_string()));
        }

        for item in self.items.iter() {
            if let Some(ItemEffect::LearnSkill { skill }) = &item.effect {
                if !self.skills.contains(skill) {
                    return Err(ConfigError::ValidationError(format!(
                        "item `{}` teaches unknown skill `{}`",
                        item.id, skill
                    )));
                }
            }
        }

        let deviation = self.constants.encounter.deviation_map_id;
        if self.maps.get(deviation).is_none() {
            warn!(map = deviation, "qi-deviation map is not defined");
        }
        Ok(())
    }
}

impl Default for ContentTables {
    fn default() -> Self {
        Self::builtin()
    }
}
