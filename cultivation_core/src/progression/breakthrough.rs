//! Realm breakthroughs and the corruption branch

use super::leveling::exp_cap;
use crate::character::CharacterState;
use crate::config::ContentTables;
use crate::error::ActionError;
use crate::roll::{chance, roll_percent};
use crate::stats::derive_stats;
use crate::types::{GearSlot, Rarity};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// What a breakthrough attempt did
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BreakthroughOutcome {
    Success {
        realm: u32,
    },
    Failure {
        exp_lost: u64,
        corruption_gained: u32,
        /// Qi-deviation triggered by this failure
        deviated: bool,
    },
}

/// Rate, roll and outcome of one attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakthroughReport {
    pub rate: f64,
    pub roll: f64,
    pub outcome: BreakthroughOutcome,
}

impl BreakthroughReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, BreakthroughOutcome::Success { .. })
    }
}

/// Success percent for the character's next breakthrough, clamped to the
/// configured bounds
///
/// Base rate per realm, plus capped luck, plus the equipped furnace and
/// artifact values, minus the corruption penalty.
pub fn breakthrough_rate(state: &CharacterState, tables: &ContentTables) -> f64 {
    let c = &tables.constants.breakthrough;
    let stats = derive_stats(state, tables);

    let mut rate = c
        .base_rates
        .get(state.realm as usize)
        .copied()
        .unwrap_or(c.rate_floor);
    rate += (stats.luk as f64 * c.luck_factor).min(c.luck_cap);
    rate += state.equipped_value(GearSlot::Furnace) as f64;
    rate += state.equipped_value(GearSlot::Artifact) as f64;
    if state.corruption > c.corruption_threshold {
        rate -= (state.corruption - c.corruption_threshold) as f64 * c.corruption_penalty;
    }

    if rate.is_finite() {
        rate.clamp(c.min_rate, c.max_rate)
    } else {
        c.min_rate
    }
}

/// Check every precondition of a breakthrough attempt
pub fn can_breakthrough(state: &CharacterState, tables: &ContentTables) -> Result<(), ActionError> {
    let realms = &tables.constants.realms;
    if state.is_injured() {
        return Err(ActionError::Injured);
    }
    if state.realm >= realms.peak() {
        return Err(ActionError::PeakRealm);
    }
    if state.level < realms.max_level || state.exp < state.exp_cap {
        return Err(ActionError::CultivationIncomplete);
    }
    Ok(())
}

/// Attempt to break through to the next realm
///
/// Success advances the realm, resets level and experience, scales base HP
/// and eases corruption. Failure keeps only a fraction of experience and adds
/// corruption (less with a protective robe); crossing the deviation threshold
/// may trigger qi-deviation, which pins encounters to the deviation map.
pub fn attempt_breakthrough(
    state: &CharacterState,
    tables: &ContentTables,
    rng: &mut impl Rng,
) -> Result<(CharacterState, BreakthroughReport), ActionError> {
    can_breakthrough(state, tables)?;
    let constants = &tables.constants;
    let c = &constants.breakthrough;

    let rate = breakthrough_rate(state, tables);
    let roll = roll_percent(rng);
    let mut next = state.clone();

    let outcome = if roll < rate {
        next.realm += 1;
        next.level = 1;
        next.exp = 0;
        next.exp_cap = exp_cap(next.realm, 1, &constants.realms);
        next.base_max_hp = (next.base_max_hp as f64 * c.success_hp_multiplier).floor() as u32;
        next.corruption = next.corruption.saturating_sub(c.success_corruption_relief);
        let stats = derive_stats(&next, tables);
        next.hp = stats.max_hp;
        next.mp = stats.max_mp;
        info!(
            name = %next.name,
            realm = constants.realms.name(next.realm),
            rate,
            "breakthrough succeeded"
        );
        BreakthroughOutcome::Success { realm: next.realm }
    } else {
        let kept = (next.exp as f64 * c.failure_exp_retained).floor() as u64;
        let exp_lost = next.exp - kept.min(next.exp);
        next.exp = kept.min(next.exp);

        let corruption_gained = robe_corruption(state, tables, c.failure_corruption);
        next.corruption = (next.corruption + corruption_gained).min(100);

        let deviated = !next.qi_deviation
            && next.corruption >= c.deviation_threshold
            && chance(rng, c.deviation_chance);
        if deviated {
            next.qi_deviation = true;
            next.map_id = constants.encounter.deviation_map_id;
        }
        info!(
            name = %next.name,
            rate,
            corruption = next.corruption,
            deviated,
            "breakthrough failed"
        );
        BreakthroughOutcome::Failure {
            exp_lost,
            corruption_gained,
            deviated,
        }
    };

    Ok((next, BreakthroughReport { rate, roll, outcome }))
}

/// Corruption a failed attempt leaves behind the equipped robe
///
/// Legend and higher robes block it outright; lesser robes soak their value.
fn robe_corruption(state: &CharacterState, tables: &ContentTables, base: u32) -> u32 {
    let Some(robe) = state.equipped(GearSlot::Robe) else {
        return base;
    };
    let immune = tables
        .items
        .get(&robe.item_id)
        .is_some_and(|def| def.rarity >= Rarity::Legend);
    if immune {
        0
    } else {
        base.saturating_sub(robe.final_value)
    }
}
