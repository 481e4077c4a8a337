//! Core types shared across the engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Elemental affinity used for damage matchups and gear affixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Gold,
    Wood,
    Earth,
    Water,
    Fire,
    Physical,
    Ice,
    Thunder,
    Dark,
    Light,
    Chaos,
    None,
}

impl Element {
    /// The five cultivation elements; gear affixes are drawn from these
    pub const FIVE: [Element; 5] = [
        Element::Gold,
        Element::Wood,
        Element::Earth,
        Element::Water,
        Element::Fire,
    ];

    /// Get all elements, `None` excluded
    pub fn all() -> &'static [Element] {
        &[
            Element::Gold,
            Element::Wood,
            Element::Earth,
            Element::Water,
            Element::Fire,
            Element::Physical,
            Element::Ice,
            Element::Thunder,
            Element::Dark,
            Element::Light,
            Element::Chaos,
        ]
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Element::Gold => "gold",
            Element::Wood => "wood",
            Element::Earth => "earth",
            Element::Water => "water",
            Element::Fire => "fire",
            Element::Physical => "physical",
            Element::Ice => "ice",
            Element::Thunder => "thunder",
            Element::Dark => "dark",
            Element::Light => "light",
            Element::Chaos => "chaos",
            Element::None => "none",
        };
        f.write_str(name)
    }
}

/// One of the five player-allocated affinities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Gold,
    Wood,
    Water,
    Fire,
    Earth,
}

impl Attribute {
    pub fn all() -> &'static [Attribute] {
        &[
            Attribute::Gold,
            Attribute::Wood,
            Attribute::Water,
            Attribute::Fire,
            Attribute::Earth,
        ]
    }

    pub fn element(self) -> Element {
        match self {
            Attribute::Gold => Element::Gold,
            Attribute::Wood => Element::Wood,
            Attribute::Water => Element::Water,
            Attribute::Fire => Element::Fire,
            Attribute::Earth => Element::Earth,
        }
    }

    /// Map an element back to its attribute, if it is one of the five
    pub fn from_element(element: Element) -> Option<Attribute> {
        match element {
            Element::Gold => Some(Attribute::Gold),
            Element::Wood => Some(Attribute::Wood),
            Element::Water => Some(Attribute::Water),
            Element::Fire => Some(Attribute::Fire),
            Element::Earth => Some(Attribute::Earth),
            _ => None,
        }
    }
}

/// Item quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legend,
    Myth,
}

/// What an item definition is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Weapon,
    Armor,
    Furnace,
    Robe,
    Artifact,
    Consumable,
    SkillBook,
}

impl ItemKind {
    /// The gear slot this kind is worn in, if any
    pub fn gear_slot(self) -> Option<GearSlot> {
        match self {
            ItemKind::Weapon => Some(GearSlot::Weapon),
            ItemKind::Armor => Some(GearSlot::Armor),
            ItemKind::Furnace => Some(GearSlot::Furnace),
            ItemKind::Robe => Some(GearSlot::Robe),
            ItemKind::Artifact => Some(GearSlot::Artifact),
            ItemKind::Consumable | ItemKind::SkillBook => None,
        }
    }

    pub fn is_gear(self) -> bool {
        self.gear_slot().is_some()
    }
}

/// Gear slot on a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GearSlot {
    Weapon,
    Armor,
    Furnace,
    Robe,
    Artifact,
}

impl GearSlot {
    pub fn all() -> &'static [GearSlot] {
        &[
            GearSlot::Weapon,
            GearSlot::Armor,
            GearSlot::Furnace,
            GearSlot::Robe,
            GearSlot::Artifact,
        ]
    }
}

/// Encounter strength class, rolled when an encounter starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterClass {
    Common,
    Elite,
    Miniboss,
    Boss,
}

impl fmt::Display for EncounterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncounterClass::Common => "common",
            EncounterClass::Elite => "elite",
            EncounterClass::Miniboss => "miniboss",
            EncounterClass::Boss => "boss",
        };
        f.write_str(name)
    }
}

/// Unique identifier of an owned item instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemUid(pub u64);

impl From<u64> for ItemUid {
    fn from(value: u64) -> Self {
        ItemUid(value)
    }
}

impl fmt::Display for ItemUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
