//! Timed buffs and debuffs on combat entities

pub mod tick;
mod types;

pub use tick::{tick_buffs, BuffTickResult};
pub use types::{is_stunned, sum_modifier, Buff, BuffKind};
