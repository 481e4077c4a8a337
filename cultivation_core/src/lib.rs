//! cultivation_core - Progression and combat engine for a cultivation RPG
//!
//! This library provides:
//! - Stat derivation: persistent character state to combat stats
//! - BattleState: the per-round state machine, skills, buffs and elements
//! - Rewards: encounter yields and their scaling
//! - Progression: levels, realm breakthroughs, corruption and recovery
//! - Session: the auto-battle and requeue clocks around one character
//!
//! Every engine operation takes its input state by reference, returns the
//! next state and draws randomness from a caller-supplied `rand::Rng`.

pub mod buff;
pub mod character;
pub mod combat;
pub mod config;
pub mod element;
pub mod error;
pub mod item;
pub mod prelude;
pub mod progression;
pub mod reward;
pub mod roll;
pub mod session;
pub mod skill;
pub mod source;
pub mod stats;
pub mod types;

// Re-export core types for convenience
pub use character::{create_character, CharacterState, PersistedCharacter};
pub use combat::{
    attempt_flee, resolve_round, start_encounter, use_battle_item, use_skill, BattleResult,
    BattleState, RoundReport,
};
pub use config::{ConfigError, ContentTables, GameConstants};
pub use element::{ElementTable, Matchup};
pub use error::{ActionError, ErrorKind};
pub use progression::{attempt_breakthrough, conclude_encounter};
pub use session::{Session, SessionEvent};
pub use stats::{derive_stats, DerivedStats};
pub use types::{Attribute, Element, EncounterClass, GearSlot, ItemKind, ItemUid, Rarity};
