//! PassiveSource - Pool bonuses from slotted passive skills

use crate::skill::PassiveEffect;
use crate::source::StatSource;
use crate::stats::StatAccumulator;

/// Stats from one slotted passive skill
pub struct PassiveSource {
    pub skill_id: String,
    pub effect: PassiveEffect,
}

impl PassiveSource {
    pub fn new(skill_id: impl Into<String>, effect: PassiveEffect) -> Self {
        PassiveSource {
            skill_id: skill_id.into(),
            effect,
        }
    }
}

impl StatSource for PassiveSource {
    fn id(&self) -> &str {
        &self.skill_id
    }

    fn priority(&self) -> i32 {
        100
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        // Only pool bonuses feed derived stats; combat passives are read by the battle engine
        match self.effect {
            PassiveEffect::MaxHp { bonus } => stats.hp_increased += bonus,
            PassiveEffect::MaxMp { bonus } => stats.mp_increased += bonus,
            _ => {}
        }
    }
}
