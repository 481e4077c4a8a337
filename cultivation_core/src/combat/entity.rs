//! CombatEntity - one side of an encounter

use crate::buff::{is_stunned, sum_modifier, Buff, BuffKind};
use crate::skill::PassiveEffect;
use crate::stats::DerivedStats;
use crate::types::Element;
use serde::{Deserialize, Serialize};

/// Live combat numbers for the player or the enemy
///
/// HP and MP are signed so intermediate arithmetic never wraps; every
/// mutation clamps them back into `[0, max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEntity {
    pub name: String,
    pub max_hp: i64,
    pub hp: i64,
    pub max_mp: i64,
    pub mp: i64,
    pub atk: i64,
    pub def: i64,
    /// Innate element, read by skill bonuses and warding
    pub element: Element,
    /// Elements carried into attacks (weapon affixes for the player)
    pub strike_elements: Vec<Element>,
    /// Elements attacks are measured against (armor affixes for the player)
    pub guard_elements: Vec<Element>,
    pub buffs: Vec<Buff>,
    /// Passive effects snapshotted at encounter start
    #[serde(default)]
    pub passives: Vec<PassiveEffect>,
}

impl CombatEntity {
    /// Build the player's side from derived stats and current pools
    #[allow(clippy::too_many_arguments)]
    pub fn player(
        name: impl Into<String>,
        stats: &DerivedStats,
        hp: u32,
        mp: u32,
        element: Element,
        strike_elements: Vec<Element>,
        guard_elements: Vec<Element>,
        passives: Vec<PassiveEffect>,
    ) -> Self {
        let max_hp = stats.max_hp as i64;
        let max_mp = stats.max_mp as i64;
        CombatEntity {
            name: name.into(),
            max_hp,
            hp: (hp as i64).clamp(0, max_hp),
            max_mp,
            mp: (mp as i64).clamp(0, max_mp),
            atk: stats.atk as i64,
            def: stats.def as i64,
            element,
            strike_elements,
            guard_elements,
            buffs: Vec::new(),
            passives,
        }
    }

    /// Build a monster; its innate element is both its strike and guard set
    pub fn enemy(name: impl Into<String>, element: Element, hp: i64, mp: i64, atk: i64, def: i64) -> Self {
        let hp = hp.max(1);
        CombatEntity {
            name: name.into(),
            max_hp: hp,
            hp,
            max_mp: mp.max(0),
            mp: mp.max(0),
            atk: atk.max(0),
            def: def.max(0),
            element,
            strike_elements: vec![element],
            guard_elements: vec![element],
            buffs: Vec::new(),
            passives: Vec::new(),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    pub fn is_stunned(&self) -> bool {
        is_stunned(&self.buffs)
    }

    /// Lose HP, never below 0
    pub fn take_damage(&mut self, amount: i64) {
        self.hp = (self.hp - amount.max(0)).max(0);
    }

    /// Gain HP up to max; returns the amount actually healed
    pub fn heal(&mut self, amount: i64) -> i64 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    /// Gain MP up to max; returns the amount actually restored
    pub fn restore_mp(&mut self, amount: i64) -> i64 {
        let before = self.mp;
        self.mp = (self.mp + amount.max(0)).min(self.max_mp);
        self.mp - before
    }

    /// Attack after buffs and the low-HP passive
    pub fn effective_attack(&self) -> f64 {
        let mut multiplier = 1.0 + sum_modifier(&self.buffs, BuffKind::AttackMod);
        for passive in &self.passives {
            if let PassiveEffect::Desperation { threshold, bonus } = passive {
                if (self.hp as f64) < self.max_hp as f64 * threshold {
                    multiplier += bonus;
                }
            }
        }
        self.atk as f64 * multiplier
    }

    pub fn effective_defense(&self) -> f64 {
        self.def as f64 * (1.0 + sum_modifier(&self.buffs, BuffKind::DefenseMod))
    }

    /// Armor-break passive as (chance, ignored defense fraction)
    pub fn armor_break(&self) -> Option<(f64, f64)> {
        self.passives.iter().find_map(|p| match p {
            PassiveEffect::ArmorBreak { chance, ignore } => Some((*chance, *ignore)),
            _ => None,
        })
    }

    /// Total incoming reduction against an attacker of `element`
    pub fn warding_against(&self, element: Element) -> f64 {
        self.passives
            .iter()
            .filter_map(|p| match p {
                PassiveEffect::Warding { element: e, reduction } if *e == element => Some(*reduction),
                _ => None,
            })
            .sum()
    }

    /// Per-round heal fraction of max HP
    pub fn regeneration(&self) -> f64 {
        self.passives
            .iter()
            .filter_map(|p| match p {
                PassiveEffect::Regeneration { fraction } => Some(*fraction),
                _ => None,
            })
            .sum()
    }

    /// Per-round flat MP
    pub fn resonance(&self) -> i64 {
        self.passives
            .iter()
            .filter_map(|p| match p {
                PassiveEffect::Resonance { mp } => Some(*mp),
                _ => None,
            })
            .sum()
    }
}
