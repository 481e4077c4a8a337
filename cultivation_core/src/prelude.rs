//! Prelude module for convenient imports
//!
//! ```rust
//! use cultivation_core::prelude::*;
//! ```

// State
pub use crate::character::{Attributes, CharacterState};
pub use crate::stats::{derive_stats, DerivedStats};

// Combat
pub use crate::combat::{
    attempt_flee, resolve_round, start_encounter, use_battle_item, use_skill, BattleResult,
    BattleState,
};

// Progression
pub use crate::progression::{
    attempt_breakthrough, conclude_encounter, cultivate, heal_injury, meditate, retreat,
};

// Session
pub use crate::session::{Session, SessionEvent};

// Config
pub use crate::config::{ContentTables, GameConstants};

// Errors and shared types
pub use crate::error::ActionError;
pub use crate::types::{Attribute, Element, GearSlot, ItemUid};
