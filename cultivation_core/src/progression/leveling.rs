//! Experience and level-ups within a realm

use crate::character::CharacterState;
use crate::config::{ContentTables, RealmConstants};
use crate::stats::derive_stats;
use tracing::info;

/// Experience needed to finish `level` of `realm`
///
/// `floor(base * realm_multiplier * growth^(level - 1))`; realms past the
/// multiplier table use its last entry.
pub fn exp_cap(realm: u32, level: u32, realms: &RealmConstants) -> u64 {
    let multiplier = realms
        .exp_multipliers
        .get(realm as usize)
        .or_else(|| realms.exp_multipliers.last())
        .copied()
        .unwrap_or(1.0);
    let growth = realms.exp_cap_growth.powi(level.saturating_sub(1) as i32);
    let cap = (realms.base_exp_cap * multiplier * growth).floor();
    if cap.is_finite() && cap >= 1.0 {
        cap as u64
    } else {
        1
    }
}

/// Add experience and resolve any level-ups it triggers
///
/// Returns the new state and the number of levels gained.
pub fn gain_exp(state: &CharacterState, amount: u64, tables: &ContentTables) -> (CharacterState, u32) {
    let mut next = state.clone();
    next.exp = next.exp.saturating_add(amount);
    let levels = apply_level_ups(&mut next, tables);
    (next, levels)
}

/// Level up while experience covers the cap, then hold experience at the
/// cap once the last level of the realm is reached
pub(crate) fn apply_level_ups(state: &mut CharacterState, tables: &ContentTables) -> u32 {
    let constants = &tables.constants;
    let max_level = constants.realms.max_level;
    let mut gained = 0;

    while state.level < max_level && state.exp >= state.exp_cap {
        state.exp -= state.exp_cap;
        state.level += 1;
        state.base_max_hp += constants.level_up.hp_gain;
        state.base_max_mp += constants.level_up.mp_gain;
        state.free_points += constants.level_up.free_points;
        state.exp_cap = exp_cap(state.realm, state.level, &constants.realms);
        gained += 1;
    }

    if state.level >= max_level {
        state.exp = state.exp.min(state.exp_cap);
    }

    if gained > 0 {
        let stats = derive_stats(state, tables);
        state.hp = stats.max_hp;
        state.mp = stats.max_mp;
        info!(
            name = %state.name,
            level = state.level,
            realm = state.realm,
            gained,
            "level up"
        );
    }
    gained
}
