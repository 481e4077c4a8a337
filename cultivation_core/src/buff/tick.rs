//! Per-round buff processing

use super::{Buff, BuffKind};

/// Result of ticking an entity's buffs for one round
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuffTickResult {
    /// Buffs still active after the tick
    pub remaining: Vec<Buff>,
    /// Damage-over-time hits as (buff name, damage)
    pub dot_hits: Vec<(String, i64)>,
    /// Names of buffs that expired this tick
    pub expired: Vec<String>,
    pub total_damage: i64,
}

/// Decrement every buff once, collecting damage-over-time hits
///
/// DoT buffs deal their (floored) magnitude on every tick, including the one
/// that expires them.
pub fn tick_buffs(buffs: &[Buff]) -> BuffTickResult {
    let mut result = BuffTickResult::default();

    for buff in buffs {
        let mut buff = buff.clone();
        buff.duration = buff.duration.saturating_sub(1);

        if buff.kind == BuffKind::DamageOverTime {
            let damage = buff.magnitude.floor().max(0.0) as i64;
            result.total_damage += damage;
            result.dot_hits.push((buff.name.clone(), damage));
        }

        if buff.is_active() {
            result.remaining.push(buff);
        } else {
            result.expired.push(buff.name);
        }
    }

    result
}
