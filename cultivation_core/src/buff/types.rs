//! Buff and debuff types

use serde::{Deserialize, Serialize};

/// What a buff does while it is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffKind {
    /// Skips the holder's action phase
    Stun,
    /// Additive fraction on attack
    AttackMod,
    /// Additive fraction on defense
    DefenseMod,
    /// Flat HP loss per round
    DamageOverTime,
    /// Tracked for display only; no round phase reads it
    SpeedMod,
}

/// A timed buff or debuff on a combat entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub name: String,
    pub kind: BuffKind,
    pub magnitude: f64,
    /// Remaining rounds
    pub duration: u32,
}

impl Buff {
    pub fn new(name: impl Into<String>, kind: BuffKind, magnitude: f64, duration: u32) -> Self {
        Buff {
            name: name.into(),
            kind,
            magnitude,
            duration,
        }
    }

    pub fn stun(name: impl Into<String>, duration: u32) -> Self {
        Self::new(name, BuffKind::Stun, 1.0, duration)
    }

    pub fn damage_over_time(name: impl Into<String>, per_round: f64, duration: u32) -> Self {
        Self::new(name, BuffKind::DamageOverTime, per_round, duration)
    }

    /// Harmful to its holder
    pub fn is_negative(&self) -> bool {
        match self.kind {
            BuffKind::Stun | BuffKind::DamageOverTime => true,
            BuffKind::AttackMod | BuffKind::DefenseMod | BuffKind::SpeedMod => self.magnitude < 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.duration > 0
    }
}

/// Sum of magnitudes of every buff of `kind` (same-kind buffs stack additively)
pub fn sum_modifier(buffs: &[Buff], kind: BuffKind) -> f64 {
    buffs
        .iter()
        .filter(|b| b.kind == kind)
        .map(|b| b.magnitude)
        .sum()
}

pub fn is_stunned(buffs: &[Buff]) -> bool {
    buffs.iter().any(|b| b.kind == BuffKind::Stun && b.is_active())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_stack_additively() {
        let buffs = vec![
            Buff::new("Iron Bones", BuffKind::DefenseMod, 0.25, 10),
            Buff::new("Stone Skin", BuffKind::DefenseMod, 0.3, 12),
            Buff::new("Weakness", BuffKind::AttackMod, -0.2, 8),
        ];
        assert!((sum_modifier(&buffs, BuffKind::DefenseMod) - 0.55).abs() < 1e-9);
        assert!((sum_modifier(&buffs, BuffKind::AttackMod) + 0.2).abs() < 1e-9);
        assert_eq!(sum_modifier(&buffs, BuffKind::SpeedMod), 0.0);
    }

    #[test]
    fn test_negative_classification() {
        assert!(Buff::stun("Quake", 2).is_negative());
        assert!(Buff::damage_over_time("Burn", 5.0, 5).is_negative());
        assert!(Buff::new("Weakness", BuffKind::AttackMod, -0.2, 8).is_negative());
        assert!(!Buff::new("Surge", BuffKind::AttackMod, 0.2, 8).is_negative());
    }

    #[test]
    fn test_stunned() {
        assert!(is_stunned(&[Buff::stun("Entangle", 3)]));
        assert!(!is_stunned(&[Buff::new("Surge", BuffKind::AttackMod, 0.2, 8)]));
        assert!(!is_stunned(&[]));
    }
}
