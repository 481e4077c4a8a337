//! Combat: entities, attack rolls, the round state machine and encounter setup

pub mod attack;
mod battle;
mod encounter;
mod entity;
mod result;

pub use attack::{resolve_attack, AttackOutcome};
pub use battle::{
    attempt_flee, flee_chance, resolve_round, use_battle_item, use_skill, BattleState,
};
pub use encounter::{roll_class, start_encounter};
pub use entity::CombatEntity;
pub use result::{BattleResult, RoundReport};
