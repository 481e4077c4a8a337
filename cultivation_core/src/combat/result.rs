//! BattleResult and RoundReport - what a round did

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an encounter; every variant but `Ongoing` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleResult {
    #[default]
    Ongoing,
    Win,
    Loss,
    Escaped,
}

impl BattleResult {
    pub fn is_over(self) -> bool {
        self != BattleResult::Ongoing
    }
}

impl fmt::Display for BattleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BattleResult::Ongoing => "ongoing",
            BattleResult::Win => "win",
            BattleResult::Loss => "loss",
            BattleResult::Escaped => "escaped",
        };
        f.write_str(name)
    }
}

/// Summary of one resolved round
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    /// Round number the report belongs to
    pub round: u32,

    // === Damage ===
    pub player_damage_dealt: i64,
    pub enemy_damage_dealt: i64,
    /// DoT damage taken by the player and the enemy
    pub player_dot_taken: i64,
    pub enemy_dot_taken: i64,

    // === Recovery ===
    pub player_regenerated: i64,
    pub player_mp_restored: i64,

    // === Flags ===
    pub player_stunned: bool,
    pub enemy_stunned: bool,
    pub critical: bool,
    /// Skill cast as the player action, if any
    pub skill: Option<String>,

    /// Status after the round
    pub result: BattleResult,
}

impl RoundReport {
    pub fn new(round: u32) -> Self {
        RoundReport {
            round,
            ..Self::default()
        }
    }
}
