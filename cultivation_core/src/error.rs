//! Action errors - every rejected engine action maps to one of these
//!
//! Engine operations take their input state by reference and return a new
//! value, so an `Err` always means the caller's state is untouched.

use crate::types::{GearSlot, ItemUid};
use thiserror::Error;

/// Broad category of a rejected action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An identifier is missing from its definition table or inventory
    InvalidReference,
    /// Not enough currency, MP, experience, slots or similar
    InsufficientResource,
    /// The action is not allowed in the current encounter state
    IllegalTransition,
}

/// A rejected engine action, with a user-facing message
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    // === Invalid reference ===
    #[error("unknown item `{0}`")]
    UnknownItem(String),
    #[error("unknown skill `{0}`")]
    UnknownSkill(String),
    #[error("unknown map {0}")]
    UnknownMap(u32),
    #[error("item {0} is not in the inventory")]
    ItemNotOwned(ItemUid),
    #[error("no `{0}` left in the inventory")]
    ItemNotCarried(String),
    #[error("skill `{0}` has not been learned")]
    SkillNotLearned(String),

    // === Insufficient resource ===
    #[error("not enough MP ({need} needed, {have} available)")]
    NotEnoughMp { need: u32, have: i64 },
    #[error("not enough spirit stones ({need} needed, {have} available)")]
    NotEnoughStones { need: u64, have: u64 },
    #[error("`{skill}` is on cooldown for {rounds} more rounds")]
    OnCooldown { skill: String, rounds: u32 },
    #[error("cultivation is not yet complete")]
    CultivationIncomplete,
    #[error("cannot do that while injured")]
    Injured,
    #[error("not injured")]
    NotInjured,
    #[error("too weak to fight, rest first")]
    Exhausted,
    #[error("no free attribute points")]
    NoFreePoints,
    #[error("all skill slots are occupied")]
    SkillSlotsFull,
    #[error("skill `{0}` is already learned")]
    AlreadyLearned(String),
    #[error("already at the peak realm")]
    PeakRealm,
    #[error("`{0}` only takes effect during a breakthrough")]
    BreakthroughOnly(String),
    #[error("`{0}` cannot be used here")]
    NotUsable(String),
    #[error("{0:?} slot is empty")]
    SlotEmpty(GearSlot),
    #[error("skill slot {0} is empty")]
    SkillSlotEmpty(usize),
    #[error("invalid attribute allocation: {0}")]
    InvalidAllocation(String),

    // === Illegal transition ===
    #[error("the encounter has already concluded")]
    EncounterConcluded,
    #[error("the encounter is still ongoing")]
    EncounterOngoing,
    #[error("cannot act while stunned")]
    Stunned,
}

impl ActionError {
    /// Get the taxonomy category for this error
    pub fn category(&self) -> ErrorKind {
        match self {
            ActionError::UnknownItem(_)
            | ActionError::UnknownSkill(_)
            | ActionError::UnknownMap(_)
            | ActionError::ItemNotOwned(_)
            | ActionError::ItemNotCarried(_)
            | ActionError::SkillNotLearned(_) => ErrorKind::InvalidReference,
            ActionError::EncounterConcluded
            | ActionError::EncounterOngoing
            | ActionError::Stunned => ErrorKind::IllegalTransition,
            _ => ErrorKind::InsufficientResource,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            ActionError::UnknownSkill("s_x".into()).category(),
            ErrorKind::InvalidReference
        );
        assert_eq!(
            ActionError::NotEnoughMp { need: 20, have: 5 }.category(),
            ErrorKind::InsufficientResource
        );
        assert_eq!(
            ActionError::EncounterConcluded.category(),
            ErrorKind::IllegalTransition
        );
    }

    #[test]
    fn test_messages() {
        let err = ActionError::NotEnoughStones { need: 50, have: 10 };
        assert_eq!(
            err.to_string(),
            "not enough spirit stones (50 needed, 10 available)"
        );
    }
}
