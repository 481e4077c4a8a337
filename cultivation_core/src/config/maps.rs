//! Map and monster table loading

use super::ConfigError;
use crate::types::{Element, EncounterClass, Rarity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Tier-scaled base numbers of a map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapBase {
    pub hp: u64,
    pub atk: u64,
    pub def: u64,
    pub exp: u64,
    pub stones: u64,
}

/// Static definition of a hunting map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDef {
    pub id: u32,
    pub name: String,
    /// Realm the map is balanced for
    #[serde(default)]
    pub min_realm: u32,
    pub base: MapBase,
    /// Rarities an encounter drop may be drawn from
    #[serde(default)]
    pub drops: Vec<Rarity>,
    /// Monster pool tier; defaults to the map id
    #[serde(default)]
    pub pool: Option<u32>,
}

impl MapDef {
    pub fn pool_tier(&self) -> u32 {
        self.pool.unwrap_or(self.id)
    }
}

/// Stat multipliers applied to a map's base numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatModifiers {
    #[serde(default = "default_modifier")]
    pub hp: f64,
    #[serde(default = "default_modifier")]
    pub atk: f64,
    #[serde(default = "default_modifier")]
    pub def: f64,
    #[serde(default)]
    pub spd: Option<f64>,
}

fn default_modifier() -> f64 {
    1.0
}

impl Default for StatModifiers {
    fn default() -> Self {
        StatModifiers {
            hp: 1.0,
            atk: 1.0,
            def: 1.0,
            spd: None,
        }
    }
}

/// A monster an encounter can spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub name: String,
    pub element: Element,
    #[serde(default)]
    pub modifiers: StatModifiers,
}

/// Monsters of one tier, split by encounter class
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonsterPool {
    pub common: Vec<MonsterTemplate>,
    pub elite: Vec<MonsterTemplate>,
    pub miniboss: Vec<MonsterTemplate>,
    pub boss: Vec<MonsterTemplate>,
}

impl MonsterPool {
    pub fn class(&self, class: EncounterClass) -> &[MonsterTemplate] {
        match class {
            EncounterClass::Common => &self.common,
            EncounterClass::Elite => &self.elite,
            EncounterClass::Miniboss => &self.miniboss,
            EncounterClass::Boss => &self.boss,
        }
    }

    fn class_mut(&mut self, class: EncounterClass) -> &mut Vec<MonsterTemplate> {
        match class {
            EncounterClass::Common => &mut self.common,
            EncounterClass::Elite => &mut self.elite,
            EncounterClass::Miniboss => &mut self.miniboss,
            EncounterClass::Boss => &mut self.boss,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapsFile {
    #[serde(rename = "maps")]
    maps: Vec<MapDef>,
}

/// Map definitions keyed by id
#[derive(Debug, Clone, Default)]
pub struct MapTable {
    defs: BTreeMap<u32, MapDef>,
}

impl MapTable {
    pub fn new(defs: impl IntoIterator<Item = MapDef>) -> Self {
        MapTable {
            defs: defs.into_iter().map(|d| (d.id, d)).collect(),
        }
    }

    pub fn get(&self, id: u32) -> Option<&MapDef> {
        self.defs.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MapDef> {
        self.defs.values()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// A monster row as written in the data file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MonsterEntry {
    tier: u32,
    class: EncounterClass,
    #[serde(flatten)]
    template: MonsterTemplate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MonstersFile {
    #[serde(rename = "monsters")]
    monsters: Vec<MonsterEntry>,
}

/// Monster pools keyed by tier
#[derive(Debug, Clone, Default)]
pub struct MonsterTable {
    pools: BTreeMap<u32, MonsterPool>,
}

impl MonsterTable {
    pub fn new(pools: impl IntoIterator<Item = (u32, MonsterPool)>) -> Self {
        MonsterTable {
            pools: pools.into_iter().collect(),
        }
    }

    pub fn pool(&self, tier: u32) -> Option<&MonsterPool> {
        self.pools.get(&tier)
    }

    /// Candidates for a class, falling back to the tier's commons, then tier 0 commons
    pub fn candidates(&self, tier: u32, class: EncounterClass) -> &[MonsterTemplate] {
        let pool = self.pools.get(&tier);
        if let Some(found) = pool.map(|p| p.class(class)).filter(|c| !c.is_empty()) {
            return found;
        }
        if let Some(common) = pool.map(|p| p.class(EncounterClass::Common)).filter(|c| !c.is_empty()) {
            return common;
        }
        self.pools
            .get(&0)
            .map(|p| p.class(EncounterClass::Common))
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

/// Load map definitions from a TOML file
pub fn load_map_table(path: &Path) -> Result<MapTable, ConfigError> {
    let file: MapsFile = super::load_toml(path)?;
    Ok(MapTable::new(file.maps))
}

/// Load map definitions from a TOML string
pub fn parse_map_table(content: &str) -> Result<MapTable, ConfigError> {
    let file: MapsFile = super::parse_toml(content)?;
    Ok(MapTable::new(file.maps))
}

fn group_monsters(entries: Vec<MonsterEntry>) -> MonsterTable {
    let mut pools: BTreeMap<u32, MonsterPool> = BTreeMap::new();
    for entry in entries {
        pools
            .entry(entry.tier)
            .or_default()
            .class_mut(entry.class)
            .push(entry.template);
    }
    MonsterTable { pools }
}

/// Load monster pools from a TOML file
pub fn load_monster_table(path: &Path) -> Result<MonsterTable, ConfigError> {
    let file: MonstersFile = super::load_toml(path)?;
    Ok(group_monsters(file.monsters))
}

/// Load monster pools from a TOML string
pub fn parse_monster_table(content: &str) -> Result<MonsterTable, ConfigError> {
    let file: MonstersFile = super::parse_toml(content)?;
    Ok(group_monsters(file.monsters))
}

/// Get the built-in map table
pub fn default_maps() -> MapTable {
    let toml = include_str!("../../config/maps.toml");
    parse_map_table(toml).unwrap_or_else(|_| {
        MapTable::new([MapDef {
            id: 0,
            name: "Spirit Spring Valley".to_string(),
            min_realm: 0,
            base: MapBase {
                hp: 80,
                atk: 8,
                def: 1,
                exp: 5,
                stones: 1,
            },
            drops: vec![Rarity::Common],
            pool: None,
        }])
    })
}

/// Get the built-in monster pools
pub fn default_monsters() -> MonsterTable {
    let toml = include_str!("../../config/monsters.toml");
    parse_monster_table(toml).unwrap_or_else(|_| {
        let pool = MonsterPool {
            common: vec![MonsterTemplate {
                name: "Wandering Bandit".to_string(),
                element: Element::Physical,
                modifiers: StatModifiers::default(),
            }],
            ..Default::default()
        };
        MonsterTable::new([(0, pool)])
    })
}
