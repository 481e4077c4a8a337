//! RewardCalculator - encounter yields and their final scaling

use crate::config::{ItemTable, MapDef, MonsterTemplate, RewardConstants};
use crate::roll::chance;
use crate::types::EncounterClass;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Yields fixed when an encounter starts, before character scaling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRewards {
    pub exp: u64,
    pub stones: u64,
    /// Item id of the rolled drop
    pub drop: Option<String>,
}

/// What a won encounter actually pays out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalRewards {
    pub exp: u64,
    pub stones: u64,
    pub drops: Vec<String>,
}

/// Character numbers the final scaling reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardContext {
    pub realm: u32,
    pub level: u32,
    pub luk: u32,
    pub injured: bool,
}

/// Roll the pending yields for a spawned monster
///
/// Exp scales with the class (bosses on late maps pay more), stones with
/// the monster's HP modifier. The drop gate is one roll per encounter.
pub fn roll_pending(
    map: &MapDef,
    class: EncounterClass,
    monster: &MonsterTemplate,
    items: &ItemTable,
    constants: &RewardConstants,
    rng: &mut impl Rng,
) -> PendingRewards {
    let class_multiplier = if class == EncounterClass::Boss && map.id >= constants.late_map_id {
        constants.late_boss_exp_multiplier
    } else {
        constants.class_exp_multipliers.get(class)
    };
    let exp = floor_u64(map.base.exp as f64 * class_multiplier);
    let stones = floor_u64(map.base.stones as f64 * monster.modifiers.hp);

    let drop = if chance(rng, constants.drop_chances.get(class)) {
        let candidates = items.drop_candidates(&map.drops);
        candidates.choose(rng).map(|def| def.id.clone())
    } else {
        None
    };

    PendingRewards { exp, stones, drop }
}

/// Exp multiplier for how far the character's realm exceeds the map's
pub fn realm_gap_multiplier(realm: u32, min_realm: u32, constants: &RewardConstants) -> f64 {
    let gap = realm.saturating_sub(min_realm) as usize;
    let table = &constants.realm_gap_multipliers;
    table
        .get(gap)
        .or_else(|| table.last())
        .copied()
        .unwrap_or(1.0)
}

/// Exp multiplier for levels gained within the current realm
pub fn level_overshoot_multiplier(level: u32, constants: &RewardConstants) -> f64 {
    let excess = level.saturating_sub(1);
    constants
        .level_overshoot
        .iter()
        .filter(|step| excess >= step.min_excess)
        .max_by_key(|step| step.min_excess)
        .map_or(1.0, |step| step.multiplier)
}

/// Scale pending yields by the character's realm, level, luck and injury
///
/// Exp is floored to at least 1, then zeroed while injured. Stones and drops
/// are never suppressed.
pub fn finalize(
    pending: &PendingRewards,
    map_min_realm: u32,
    ctx: RewardContext,
    constants: &RewardConstants,
) -> FinalRewards {
    let exp = if ctx.injured {
        0
    } else {
        let scaled = pending.exp as f64
            * realm_gap_multiplier(ctx.realm, map_min_realm, constants)
            * level_overshoot_multiplier(ctx.level, constants);
        floor_u64(scaled).max(1)
    };
    let stones = floor_u64(
        pending.stones as f64 * constants.stone_multiplier * (1.0 + ctx.luk as f64 / 100.0),
    );

    FinalRewards {
        exp,
        stones,
        drops: pending.drop.iter().cloned().collect(),
    }
}

fn floor_u64(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u64
    } else {
        0
    }
}
