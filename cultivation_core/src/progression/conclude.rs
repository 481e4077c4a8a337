//! Folding a finished encounter back into the character

use super::leveling::apply_level_ups;
use crate::character::CharacterState;
use crate::combat::{BattleResult, BattleState};
use crate::config::ContentTables;
use crate::error::ActionError;
use crate::item::grant_item;
use crate::reward::{finalize, FinalRewards, RewardContext};
use crate::stats::derive_stats;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// What concluding an encounter changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conclusion {
    /// Payout of a won encounter
    pub rewards: Option<FinalRewards>,
    pub levels_gained: u32,
}

/// Apply a terminal encounter to the character
///
/// - Win: battle HP/MP are kept, stones and drops are added, experience is
///   scaled (and suppressed while injured) and level-ups resolved
/// - Loss: HP drops to 1 and injury is set to its defeat value
/// - Escape: battle HP/MP are kept
///
/// The drop instance rolls its own value and affixes, so this takes the
/// random source too.
pub fn conclude_encounter(
    battle: &BattleState,
    state: &CharacterState,
    tables: &ContentTables,
    rng: &mut impl Rng,
) -> Result<(CharacterState, Conclusion), ActionError> {
    let constants = &tables.constants;
    let mut next = state.clone();
    let mut conclusion = Conclusion::default();
    let hp = battle.player.hp.clamp(0, u32::MAX as i64) as u32;
    let mp = battle.player.mp.clamp(0, u32::MAX as i64) as u32;

    match battle.result {
        BattleResult::Ongoing => return Err(ActionError::EncounterOngoing),
        BattleResult::Win => {
            let min_realm = tables.maps.get(battle.map_id).map_or(0, |m| m.min_realm);
            let ctx = RewardContext {
                realm: state.realm,
                level: state.level,
                luk: derive_stats(state, tables).luk,
                injured: state.is_injured(),
            };
            let rewards = finalize(&battle.rewards, min_realm, ctx, &constants.rewards);

            next.hp = hp;
            next.mp = mp;
            next.stones = next.stones.saturating_add(rewards.stones);
            for item_id in &rewards.drops {
                match grant_item(&next, item_id, tables, rng) {
                    Ok((granted, _)) => next = granted,
                    Err(err) => warn!(item = %item_id, %err, "drop skipped"),
                }
            }
            next.exp = next.exp.saturating_add(rewards.exp);
            conclusion.levels_gained = apply_level_ups(&mut next, tables);

            info!(
                exp = rewards.exp,
                stones = rewards.stones,
                drops = rewards.drops.len(),
                "victory rewards"
            );
            conclusion.rewards = Some(rewards);
        }
        BattleResult::Loss => {
            next.hp = 1;
            next.mp = mp;
            next.injury = constants.injury.defeat_injury;
            info!(injury = next.injury, "defeated");
        }
        BattleResult::Escaped => {
            next.hp = hp;
            next.mp = mp;
        }
    }
    Ok((next, conclusion))
}
