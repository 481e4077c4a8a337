//! Out-of-battle actions: cultivating, resting and paying off injury and corruption

use super::leveling::apply_level_ups;
use crate::character::CharacterState;
use crate::config::ContentTables;
use crate::error::ActionError;
use crate::stats::derive_stats;
use rand::Rng;
use tracing::{debug, info};

/// Cultivate in seclusion for a little experience
///
/// Grants `cultivate_base + floor(luk * cultivate_luck_factor)`, then
/// resolves level-ups. Refused while injured. Returns the next state and the
/// experience gained.
pub fn cultivate(state: &CharacterState, tables: &ContentTables) -> Result<(CharacterState, u64), ActionError> {
    if state.is_injured() {
        return Err(ActionError::Injured);
    }
    let c = &tables.constants.recovery;
    let stats = derive_stats(state, tables);
    let gain = c.cultivate_base + (stats.luk as f64 * c.cultivate_luck_factor).floor() as u64;

    let mut next = state.clone();
    next.exp = next.exp.saturating_add(gain);
    apply_level_ups(&mut next, tables);
    debug!(gain, exp = next.exp, "cultivated");
    Ok((next, gain))
}

/// Rest to full HP and MP; in the mortal realm this also eases injury
pub fn meditate(state: &CharacterState, tables: &ContentTables) -> CharacterState {
    let stats = derive_stats(state, tables);
    let mut next = state.clone();
    next.hp = stats.max_hp;
    next.mp = stats.max_mp;
    if next.realm == 0 && next.is_injured() {
        next.injury = next
            .injury
            .saturating_sub(tables.constants.recovery.meditate_injury_relief);
    }
    next
}

/// Pay for treatment of an injury
pub fn heal_injury(state: &CharacterState, tables: &ContentTables) -> Result<CharacterState, ActionError> {
    let c = &tables.constants.recovery;
    if !state.is_injured() {
        return Err(ActionError::NotInjured);
    }
    if state.stones < c.heal_cost {
        return Err(ActionError::NotEnoughStones {
            need: c.heal_cost,
            have: state.stones,
        });
    }
    let mut next = state.clone();
    next.stones -= c.heal_cost;
    next.injury = next.injury.saturating_sub(c.heal_amount);
    info!(injury = next.injury, "injury treated");
    Ok(next)
}

/// Retreat to purge corruption
///
/// Costs stones and removes a random amount in `[retreat_min, retreat_max]`.
/// Qi-deviation clears once corruption falls under the recovery threshold,
/// sending the character back to the first map.
pub fn retreat(
    state: &CharacterState,
    tables: &ContentTables,
    rng: &mut impl Rng,
) -> Result<(CharacterState, u32), ActionError> {
    let constants = &tables.constants;
    let c = &constants.recovery;
    if state.stones < c.retreat_cost {
        return Err(ActionError::NotEnoughStones {
            need: c.retreat_cost,
            have: state.stones,
        });
    }
    let purged = rng.gen_range(c.retreat_min..=c.retreat_max.max(c.retreat_min));

    let mut next = state.clone();
    next.stones -= c.retreat_cost;
    next.corruption = next.corruption.saturating_sub(purged);
    if next.qi_deviation && next.corruption < c.deviation_recovery {
        next.qi_deviation = false;
        next.map_id = 0;
        info!(corruption = next.corruption, "qi-deviation cleared");
    }
    Ok((next, purged))
}
