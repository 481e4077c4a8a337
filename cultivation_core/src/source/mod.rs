//! StatSource - Trait and implementations for stat providers

mod cultivation;
mod gear;
mod passive;

pub use cultivation::{effective_realm, injury_multiplier, CultivationSource};
pub use gear::GearSource;
pub use passive::PassiveSource;

use crate::stats::StatAccumulator;

/// Trait for anything that contributes to a character's derived stats
pub trait StatSource: Send + Sync {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Priority for application order (higher = applied later)
    /// Suggested priorities:
    /// - Cultivation base: -100
    /// - Gear: 0
    /// - Passive skills: 100
    fn priority(&self) -> i32 {
        0
    }

    /// Apply this source's contribution to the accumulator
    fn apply(&self, stats: &mut StatAccumulator);
}
