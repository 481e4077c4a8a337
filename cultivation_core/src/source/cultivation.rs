//! CultivationSource - Base stats from attributes, realm and level

use crate::character::Attributes;
use crate::config::InjuryConstants;
use crate::source::StatSource;
use crate::stats::StatAccumulator;

/// Base stats from the character's cultivation progress
pub struct CultivationSource {
    pub attributes: Attributes,
    /// Injury-reduced realm
    pub effective_realm: u32,
    pub level: u32,
    pub base_max_hp: u32,
    pub base_max_mp: u32,
    /// Attack/defense multiplier from injury
    pub injury_multiplier: f64,
}

impl CultivationSource {
    pub fn new(
        attributes: Attributes,
        realm: u32,
        level: u32,
        injury: u32,
        base_max_hp: u32,
        base_max_mp: u32,
        constants: &InjuryConstants,
    ) -> Self {
        CultivationSource {
            attributes,
            effective_realm: effective_realm(realm, injury, constants),
            level,
            base_max_hp,
            base_max_mp,
            injury_multiplier: injury_multiplier(injury, constants),
        }
    }
}

/// Realm used for combat after the injury penalty, floored at 0
pub fn effective_realm(realm: u32, injury: u32, constants: &InjuryConstants) -> u32 {
    let penalty = if injury >= constants.heavy_threshold {
        constants.heavy_realm_penalty
    } else if injury > 0 {
        constants.light_realm_penalty
    } else {
        0
    };
    realm.saturating_sub(penalty)
}

/// Attack/defense multiplier for an injury percentage
pub fn injury_multiplier(injury: u32, constants: &InjuryConstants) -> f64 {
    if injury >= constants.heavy_threshold {
        constants.heavy_multiplier
    } else if injury > 0 {
        constants.light_multiplier
    } else {
        1.0
    }
}

impl StatSource for CultivationSource {
    fn id(&self) -> &str {
        "cultivation"
    }

    fn priority(&self) -> i32 {
        -100
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        let a = &self.attributes;
        let realm = self.effective_realm as f64;
        let level = self.level as f64;

        stats.hp_base += self.base_max_hp as f64;
        stats.mp_base += self.base_max_mp as f64;
        stats.mp_flat += a.water as f64 * 10.0;

        // Flat offsets keep minimum attributes playable
        stats.attack_flat += (a.gold + a.fire) as f64 * 5.0 + realm * 50.0 + level * 5.0 + 10.0;
        stats.defense_flat += (a.wood + a.earth) as f64 * 3.0 + realm * 30.0 + level * 3.0 + 5.0;
        stats.luck_flat += a.water as f64 * 2.0;

        stats.combat_multiplier *= self.injury_multiplier;
    }
}
