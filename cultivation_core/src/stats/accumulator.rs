//! StatAccumulator - Collects stat contributions before derivation

use serde::{Deserialize, Serialize};

/// Derived combat stats of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub max_hp: u32,
    pub max_mp: u32,
    pub atk: u32,
    pub def: u32,
    pub luk: u32,
}

impl DerivedStats {
    /// Fallback values for fields that fail to derive
    pub const SAFE_DEFAULT: DerivedStats = DerivedStats {
        max_hp: 100,
        max_mp: 50,
        atk: 0,
        def: 0,
        luk: 0,
    };
}

impl Default for DerivedStats {
    fn default() -> Self {
        Self::SAFE_DEFAULT
    }
}

/// Accumulates contributions from every stat source
#[derive(Debug, Clone, PartialEq)]
pub struct StatAccumulator {
    // === Resources ===
    pub hp_base: f64,
    pub hp_increased: f64,
    pub mp_base: f64,
    pub mp_flat: f64,
    pub mp_increased: f64,

    // === Combat ===
    pub attack_flat: f64,
    pub defense_flat: f64,
    pub luck_flat: f64,
    /// Applied to attack and defense only
    pub combat_multiplier: f64,
}

impl Default for StatAccumulator {
    fn default() -> Self {
        StatAccumulator {
            hp_base: 0.0,
            hp_increased: 0.0,
            mp_base: 0.0,
            mp_flat: 0.0,
            mp_increased: 0.0,
            attack_flat: 0.0,
            defense_flat: 0.0,
            luck_flat: 0.0,
            combat_multiplier: 1.0,
        }
    }
}

impl StatAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the final stats, replacing any non-finite or negative field
    /// with its safe default
    pub fn finish(&self) -> DerivedStats {
        let defaults = DerivedStats::SAFE_DEFAULT;

        let max_hp = (self.hp_base * (1.0 + self.hp_increased)).floor();
        let max_mp = ((self.mp_base + self.mp_flat) * (1.0 + self.mp_increased)).floor();
        let atk = (self.attack_flat * self.combat_multiplier).floor();
        let def = (self.defense_flat * self.combat_multiplier).floor();
        let luk = self.luck_flat.floor();

        DerivedStats {
            max_hp: sanitize(max_hp, defaults.max_hp),
            max_mp: sanitize(max_mp, defaults.max_mp),
            atk: sanitize(atk, defaults.atk),
            def: sanitize(def, defaults.def),
            luk: sanitize(luk, defaults.luk),
        }
    }
}

fn sanitize(value: f64, default: u32) -> u32 {
    if value.is_finite() && value >= 0.0 {
        value.min(u32::MAX as f64) as u32
    } else {
        default
    }
}
