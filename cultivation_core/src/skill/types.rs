//! Skill definitions

use crate::buff::BuffKind;
use crate::types::Element;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    /// Cast in battle for MP, then goes on cooldown
    Active,
    /// Always on while slotted
    Passive,
}

/// Who a buff effect lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffTarget {
    Caster,
    Opponent,
}

fn default_chance() -> f64 {
    1.0
}

/// One step of an active skill, applied in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkillEffect {
    /// `floor(atk * scale - def)` damage, at least 1
    Strike {
        scale: f64,
        /// Extra scale when the opponent has this element
        #[serde(default)]
        bonus_vs: Option<Element>,
        #[serde(default)]
        bonus: f64,
    },
    /// Heal the caster for a fraction of the preceding strike's damage
    Drain { fraction: f64 },
    /// Heal the caster for a fraction of max HP
    Heal { fraction: f64 },
    /// Attach a buff, optionally behind a chance roll
    Buff {
        target: BuffTarget,
        name: String,
        kind: BuffKind,
        magnitude: f64,
        duration: u32,
        #[serde(default = "default_chance")]
        chance: f64,
    },
    /// Burn the opponent for a fraction of the caster's attack each round
    Burn {
        name: String,
        attack_fraction: f64,
        duration: u32,
    },
    /// Remove every negative buff from the caster
    Cleanse,
}

/// Continuous effect of a passive skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PassiveEffect {
    /// Fractional max HP bonus
    MaxHp { bonus: f64 },
    /// Fractional max MP bonus
    MaxMp { bonus: f64 },
    /// Heal a fraction of max HP each round
    Regeneration { fraction: f64 },
    /// Restore flat MP each round
    Resonance { mp: i64 },
    /// Attack multiplier bonus while HP is under `threshold` of max
    Desperation { threshold: f64, bonus: f64 },
    /// Chance per attack to ignore a fraction of the defense
    ArmorBreak { chance: f64, ignore: f64 },
    /// Incoming damage reduction against one element
    Warding { element: Element, reduction: f64 },
}

/// Static definition of a skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDef {
    pub id: String,
    pub name: String,
    pub element: Element,
    pub kind: SkillKind,
    #[serde(default)]
    pub mp_cost: u32,
    /// Rounds before the skill can be cast again
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effects: Vec<SkillEffect>,
    #[serde(default)]
    pub passive: Option<PassiveEffect>,
}

impl SkillDef {
    pub fn is_active(&self) -> bool {
        self.kind == SkillKind::Active
    }

    pub fn is_passive(&self) -> bool {
        self.kind == SkillKind::Passive
    }
}
