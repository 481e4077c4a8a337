//! ElementTable - attacking element -> elements it counters

use crate::types::Element;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of an elemental matchup between an attack and a defense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matchup {
    /// An attacking element counters a defending element
    Advantage,
    /// A defending element counters an attacking element
    Disadvantage,
    Neutral,
}

/// Static asymmetric counter table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementTable {
    /// Attacker element -> defender elements it counters
    pub counters: BTreeMap<Element, Vec<Element>>,
    #[serde(default = "default_advantage_multiplier")]
    pub advantage_multiplier: f64,
    #[serde(default = "default_disadvantage_multiplier")]
    pub disadvantage_multiplier: f64,
}

fn default_advantage_multiplier() -> f64 {
    1.5
}

fn default_disadvantage_multiplier() -> f64 {
    0.8
}

impl Default for ElementTable {
    fn default() -> Self {
        use Element::*;

        let counters = BTreeMap::from([
            (Gold, vec![Wood, Light]),
            (Wood, vec![Earth, Thunder]),
            (Earth, vec![Water, Thunder]),
            (Water, vec![Fire, Chaos]),
            (Fire, vec![Gold, Ice, Wood]),
            (Ice, vec![Fire, Earth]),
            (Thunder, vec![Water, Gold]),
            (Dark, vec![Light, Gold]),
            (Light, vec![Dark, Chaos]),
            (Physical, vec![Wood]),
            (Chaos, vec![Light, Dark, Gold, Wood, Water, Fire, Earth]),
        ]);

        ElementTable {
            counters,
            advantage_multiplier: default_advantage_multiplier(),
            disadvantage_multiplier: default_disadvantage_multiplier(),
        }
    }
}

impl ElementTable {
    /// Whether `attacker` counters `defender`
    pub fn counters(&self, attacker: Element, defender: Element) -> bool {
        self.counters
            .get(&attacker)
            .is_some_and(|targets| targets.contains(&defender))
    }

    /// Resolve a matchup between an attacker's element set and a defender's
    ///
    /// An attacker counter wins over a reverse counter when both exist.
    pub fn matchup(&self, attack: &[Element], defense: &[Element]) -> Matchup {
        let advantage = attack
            .iter()
            .any(|a| defense.iter().any(|d| self.counters(*a, *d)));
        if advantage {
            return Matchup::Advantage;
        }

        let disadvantage = defense
            .iter()
            .any(|d| attack.iter().any(|a| self.counters(*d, *a)));
        if disadvantage {
            Matchup::Disadvantage
        } else {
            Matchup::Neutral
        }
    }

    /// Damage multiplier for a matchup
    pub fn multiplier(&self, matchup: Matchup) -> f64 {
        match matchup {
            Matchup::Advantage => self.advantage_multiplier,
            Matchup::Disadvantage => self.disadvantage_multiplier,
            Matchup::Neutral => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Element::*;

    #[test]
    fn test_counter_is_asymmetric() {
        let table = ElementTable::default();
        assert!(table.counters(Water, Fire));
        assert!(!table.counters(Fire, Water));
        assert!(!table.counters(None, Gold));
    }

    #[test]
    fn test_matchup_multipliers() {
        let table = ElementTable::default();

        let adv = table.matchup(&[Water], &[Fire]);
        assert_eq!(adv, Matchup::Advantage);
        assert!((table.multiplier(adv) - 1.5).abs() < f64::EPSILON);

        let dis = table.matchup(&[Gold], &[Fire]);
        assert_eq!(dis, Matchup::Disadvantage);
        assert!((table.multiplier(dis) - 0.8).abs() < f64::EPSILON);

        let neutral = table.matchup(&[Gold], &[Water]);
        assert_eq!(neutral, Matchup::Neutral);
        assert!((table.multiplier(neutral) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_attacker_counter_preferred() {
        let table = ElementTable::default();
        assert_eq!(table.matchup(&[Fire, Gold], &[Wood]), Matchup::Advantage);
        // Ice counters fire and fire counters ice
        assert_eq!(table.matchup(&[Ice], &[Fire, Water]), Matchup::Advantage);
    }

    #[test]
    fn test_empty_sets_are_neutral() {
        let table = ElementTable::default();
        assert_eq!(table.matchup(&[], &[Dark]), Matchup::Neutral);
        assert_eq!(table.matchup(&[Dark], &[]), Matchup::Neutral);
    }

    #[test]
    fn test_parse_overrides() {
        let toml = r#"
[counters]
gold = ["wood"]
"#;
        let table: ElementTable = toml::from_str(toml).unwrap();
        assert!(table.counters(Gold, Wood));
        assert!(!table.counters(Gold, Light));
        assert!((table.advantage_multiplier - 1.5).abs() < f64::EPSILON);
    }
}
