//! Active skill resolution against the two combat entities

use super::types::{BuffTarget, SkillDef, SkillEffect};
use crate::buff::Buff;
use crate::combat::attack::floor_damage;
use crate::combat::CombatEntity;
use crate::error::ActionError;
use crate::roll::chance;
use rand::Rng;
use std::collections::BTreeMap;

/// Check MP and cooldown before a cast
pub fn validate_cast(
    skill: &SkillDef,
    caster: &CombatEntity,
    cooldowns: &BTreeMap<String, u32>,
) -> Result<(), ActionError> {
    if !skill.is_active() {
        return Err(ActionError::NotUsable(skill.name.clone()));
    }
    let remaining = cooldowns.get(&skill.id).copied().unwrap_or(0);
    if remaining > 0 {
        return Err(ActionError::OnCooldown {
            skill: skill.name.clone(),
            rounds: remaining,
        });
    }
    if caster.mp < skill.mp_cost as i64 {
        return Err(ActionError::NotEnoughMp {
            need: skill.mp_cost,
            have: caster.mp,
        });
    }
    Ok(())
}

/// Apply a skill's effects in order
///
/// Costs are not touched here; the caller debits MP and sets the cooldown.
/// Returns one log line per effect that did something.
pub fn apply_skill(
    skill: &SkillDef,
    caster: &mut CombatEntity,
    target: &mut CombatEntity,
    rng: &mut impl Rng,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut last_damage = 0;

    for effect in &skill.effects {
        match effect {
            SkillEffect::Strike {
                scale,
                bonus_vs,
                bonus,
            } => {
                let mut coefficient = *scale;
                if *bonus_vs == Some(target.element) {
                    coefficient += bonus;
                }
                let damage = floor_damage((caster.atk as f64 * coefficient - target.def as f64).floor());
                target.take_damage(damage);
                last_damage = damage;
                lines.push(format!(
                    "{} uses {} on {} for {} damage",
                    caster.name, skill.name, target.name, damage
                ));
            }
            SkillEffect::Drain { fraction } => {
                let healed = caster.heal((last_damage as f64 * fraction).floor() as i64);
                if healed > 0 {
                    lines.push(format!("{} drains {} HP", caster.name, healed));
                }
            }
            SkillEffect::Heal { fraction } => {
                let healed = caster.heal((caster.max_hp as f64 * fraction).floor() as i64);
                lines.push(format!("{} recovers {} HP", caster.name, healed));
            }
            SkillEffect::Buff {
                target: who,
                name,
                kind,
                magnitude,
                duration,
                chance: p,
            } => {
                if *p < 1.0 && !chance(rng, *p) {
                    continue;
                }
                let holder = match who {
                    BuffTarget::Caster => &mut *caster,
                    BuffTarget::Opponent => &mut *target,
                };
                holder.buffs.push(Buff::new(name.clone(), *kind, *magnitude, *duration));
                lines.push(format!("{} is affected by {}", holder.name, name));
            }
            SkillEffect::Burn {
                name,
                attack_fraction,
                duration,
            } => {
                let per_round = (caster.atk as f64 * attack_fraction).floor().max(0.0);
                target
                    .buffs
                    .push(Buff::damage_over_time(name.clone(), per_round, *duration));
                lines.push(format!("{} is burning", target.name));
            }
            SkillEffect::Cleanse => {
                let before = caster.buffs.len();
                caster.buffs.retain(|b| !b.is_negative());
                if caster.buffs.len() < before {
                    lines.push(format!("{} is cleansed", caster.name));
                }
            }
        }
    }

    if lines.is_empty() {
        lines.push(format!("{} uses {}", caster.name, skill.name));
    }
    lines
}
