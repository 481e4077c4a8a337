//! Game constants configuration

use crate::types::EncounterClass;
use serde::{Deserialize, Serialize};

/// Tunable balance numbers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConstants {
    #[serde(default)]
    pub realms: RealmConstants,
    #[serde(default)]
    pub level_up: LevelUpConstants,
    #[serde(default)]
    pub breakthrough: BreakthroughConstants,
    #[serde(default)]
    pub injury: InjuryConstants,
    #[serde(default)]
    pub rewards: RewardConstants,
    #[serde(default)]
    pub encounter: EncounterConstants,
    #[serde(default)]
    pub combat: CombatConstants,
    #[serde(default)]
    pub recovery: RecoveryConstants,
    #[serde(default)]
    pub creation: CreationConstants,
    #[serde(default)]
    pub items: ItemConstants,
    #[serde(default)]
    pub ticks: TickConstants,
}

/// Realm ladder and experience curve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RealmConstants {
    pub names: Vec<String>,
    /// Per-realm experience cap multiplier; clamped at the last entry
    pub exp_multipliers: Vec<f64>,
    /// Level-1 experience cap before the realm multiplier
    pub base_exp_cap: f64,
    /// Cap growth per level within a realm
    pub exp_cap_growth: f64,
    pub max_level: u32,
}

impl Default for RealmConstants {
    fn default() -> Self {
        RealmConstants {
            names: [
                "Mortal",
                "Qi Refining",
                "Foundation Establishment",
                "Golden Core",
                "Nascent Soul",
                "Deity Transformation",
                "Body Integration",
                "Mahayana",
                "Ascension",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            exp_multipliers: vec![
                1.0, 20.0, 80.0, 300.0, 1200.0, 5000.0, 20000.0, 80000.0, 320000.0,
            ],
            base_exp_cap: 100.0,
            exp_cap_growth: 1.15,
            max_level: 10,
        }
    }
}

impl RealmConstants {
    /// Display name for a realm index
    pub fn name(&self, realm: u32) -> &str {
        self.names
            .get(realm as usize)
            .or_else(|| self.names.last())
            .map(String::as_str)
            .unwrap_or("Unknown")
    }

    /// Index of the last realm
    pub fn peak(&self) -> u32 {
        self.names.len().saturating_sub(1) as u32
    }
}

/// Grants applied on every level-up
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelUpConstants {
    pub hp_gain: u32,
    pub mp_gain: u32,
    pub free_points: u32,
}

impl Default for LevelUpConstants {
    fn default() -> Self {
        LevelUpConstants {
            hp_gain: 50,
            mp_gain: 20,
            free_points: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakthroughConstants {
    /// Base success percent per realm
    pub base_rates: Vec<f64>,
    /// Base percent for realms past the end of `base_rates`
    pub rate_floor: f64,
    pub luck_factor: f64,
    pub luck_cap: f64,
    /// Corruption above this starts reducing the success rate
    pub corruption_threshold: u32,
    pub corruption_penalty: f64,
    pub min_rate: f64,
    pub max_rate: f64,
    pub success_hp_multiplier: f64,
    pub success_corruption_relief: u32,
    /// Fraction of experience kept on failure
    pub failure_exp_retained: f64,
    pub failure_corruption: u32,
    pub deviation_threshold: u32,
    pub deviation_chance: f64,
}

impl Default for BreakthroughConstants {
    fn default() -> Self {
        BreakthroughConstants {
            base_rates: vec![100.0, 60.0, 45.0, 30.0, 20.0, 15.0, 10.0, 5.0],
            rate_floor: 5.0,
            luck_factor: 0.5,
            luck_cap: 15.0,
            corruption_threshold: 20,
            corruption_penalty: 0.5,
            min_rate: 1.0,
            max_rate: 95.0,
            success_hp_multiplier: 1.5,
            success_corruption_relief: 10,
            failure_exp_retained: 0.1,
            failure_corruption: 10,
            deviation_threshold: 80,
            deviation_chance: 0.5,
        }
    }
}

/// Injury penalties on combat stats
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InjuryConstants {
    pub heavy_threshold: u32,
    pub heavy_realm_penalty: u32,
    pub light_realm_penalty: u32,
    pub heavy_multiplier: f64,
    pub light_multiplier: f64,
    /// Injury set when an encounter is lost
    pub defeat_injury: u32,
}

impl Default for InjuryConstants {
    fn default() -> Self {
        InjuryConstants {
            heavy_threshold: 50,
            heavy_realm_penalty: 2,
            light_realm_penalty: 1,
            heavy_multiplier: 0.5,
            light_multiplier: 0.75,
            defeat_injury: 100,
        }
    }
}

/// A level-overshoot step: at `min_excess` levels past 1, multiply by `multiplier`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OvershootStep {
    pub min_excess: u32,
    pub multiplier: f64,
}

/// A value per encounter class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerClass {
    pub common: f64,
    pub elite: f64,
    pub miniboss: f64,
    pub boss: f64,
}

impl PerClass {
    pub fn get(&self, class: EncounterClass) -> f64 {
        match class {
            EncounterClass::Common => self.common,
            EncounterClass::Elite => self.elite,
            EncounterClass::Miniboss => self.miniboss,
            EncounterClass::Boss => self.boss,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConstants {
    /// Exp multiplier indexed by realm gap; the last entry covers larger gaps
    pub realm_gap_multipliers: Vec<f64>,
    /// Checked from the largest `min_excess` down
    pub level_overshoot: Vec<OvershootStep>,
    pub stone_multiplier: f64,
    pub class_exp_multipliers: PerClass,
    /// Boss exp multiplier on maps with id >= `late_map_id`
    pub late_boss_exp_multiplier: f64,
    pub late_map_id: u32,
    pub drop_chances: PerClass,
}

impl Default for RewardConstants {
    fn default() -> Self {
        RewardConstants {
            realm_gap_multipliers: vec![1.0, 0.6, 0.3, 0.1, 0.05, 0.01],
            level_overshoot: vec![
                OvershootStep { min_excess: 8, multiplier: 0.2 },
                OvershootStep { min_excess: 5, multiplier: 0.4 },
                OvershootStep { min_excess: 3, multiplier: 0.7 },
                OvershootStep { min_excess: 1, multiplier: 0.9 },
            ],
            stone_multiplier: 1.5,
            class_exp_multipliers: PerClass {
                common: 1.0,
                elite: 4.0,
                miniboss: 12.0,
                boss: 35.0,
            },
            late_boss_exp_multiplier: 50.0,
            late_map_id: 7,
            drop_chances: PerClass {
                common: 0.2,
                elite: 0.4,
                miniboss: 0.7,
                boss: 1.0,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConstants {
    /// Class roll thresholds on a uniform `[0, 1)` roll
    pub elite_above: f64,
    pub miniboss_above: f64,
    pub boss_above: f64,
    /// Enemy HP/attack spread around the template value
    pub stat_variance: f64,
    pub enemy_mp: i64,
    /// Enemy attack multiplier when the player is more than one realm under the map
    pub realm_pressure_attack: f64,
    /// Map forced while qi-deviation is active
    pub deviation_map_id: u32,
    pub player_element: crate::types::Element,
}

impl Default for EncounterConstants {
    fn default() -> Self {
        EncounterConstants {
            elite_above: 0.70,
            miniboss_above: 0.90,
            boss_above: 0.98,
            stat_variance: 0.1,
            enemy_mp: 100,
            realm_pressure_attack: 2.0,
            deviation_map_id: 99,
            player_element: crate::types::Element::Physical,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConstants {
    pub flee_base: f64,
    pub flee_luck_factor: f64,
}

impl Default for CombatConstants {
    fn default() -> Self {
        CombatConstants {
            flee_base: 40.0,
            flee_luck_factor: 0.2,
        }
    }
}

/// Prices and amounts for out-of-battle recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConstants {
    pub cultivate_base: u64,
    pub cultivate_luck_factor: f64,
    pub meditate_injury_relief: u32,
    pub heal_cost: u64,
    pub heal_amount: u32,
    pub retreat_cost: u64,
    pub retreat_min: u32,
    pub retreat_max: u32,
    /// Qi-deviation clears once corruption drops below this
    pub deviation_recovery: u32,
    pub sell_ratio: f64,
}

impl Default for RecoveryConstants {
    fn default() -> Self {
        RecoveryConstants {
            cultivate_base: 10,
            cultivate_luck_factor: 0.5,
            meditate_injury_relief: 10,
            heal_cost: 1000,
            heal_amount: 5,
            retreat_cost: 50,
            retreat_min: 10,
            retreat_max: 19,
            deviation_recovery: 50,
            sell_ratio: 0.3,
        }
    }
}

/// Character creation budget and starting pools
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CreationConstants {
    pub attribute_min: u32,
    pub attribute_max: u32,
    pub point_budget: u32,
    pub start_hp: u32,
    pub start_mp: u32,
}

impl Default for CreationConstants {
    fn default() -> Self {
        CreationConstants {
            attribute_min: 1,
            attribute_max: 5,
            point_budget: 20,
            start_hp: 100,
            start_mp: 50,
        }
    }
}

/// Item roll parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemConstants {
    pub value_variance: f64,
    /// Affix bonus per attribute point, as a fraction of the item value
    pub affix_bonus_per_point: f64,
    pub common_affix_chance: f64,
    pub epic_second_affix_chance: f64,
    pub legend_third_affix_chance: f64,
}

impl Default for ItemConstants {
    fn default() -> Self {
        ItemConstants {
            value_variance: 0.1,
            affix_bonus_per_point: 0.05,
            common_affix_chance: 0.2,
            epic_second_affix_chance: 0.3,
            legend_third_affix_chance: 0.5,
        }
    }
}

/// Clock intervals for the session scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConstants {
    pub battle_interval_ms: u64,
    pub requeue_delay_ms: u64,
}

impl Default for TickConstants {
    fn default() -> Self {
        TickConstants {
            battle_interval_ms: 800,
            requeue_delay_ms: 1500,
        }
    }
}
