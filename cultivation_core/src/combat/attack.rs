//! Standard attack roll

use super::entity::CombatEntity;
use crate::element::{ElementTable, Matchup};
use crate::roll::chance;
use rand::Rng;

/// Result of one attack roll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackOutcome {
    pub damage: i64,
    pub matchup: Matchup,
    /// The armor-break passive fired
    pub armor_break: bool,
    /// Elemental advantage or armor break
    pub critical: bool,
}

/// Roll a standard attack from `attacker` against `defender`
///
/// 1. Effective attack and defense from buffs and the low-HP passive
/// 2. Elemental matchup of the attacker's strike set against the defender's guard set
/// 3. Armor-break roll, only when the attacker carries the passive
/// 4. `max(1, floor(atk * multiplier - def * (1 - ignored)))`
/// 5. Warding against the attacker's element, again floored at 1
pub fn resolve_attack(
    attacker: &CombatEntity,
    defender: &CombatEntity,
    elements: &ElementTable,
    rng: &mut impl Rng,
) -> AttackOutcome {
    // Step 1
    let attack = attacker.effective_attack();
    let defense = defender.effective_defense();

    // Step 2
    let matchup = elements.matchup(&attacker.strike_elements, &defender.guard_elements);
    let multiplier = elements.multiplier(matchup);

    // Step 3
    let armor_break = attacker
        .armor_break()
        .is_some_and(|(p, _)| chance(rng, p));
    let ignored = if armor_break {
        attacker.armor_break().map_or(0.0, |(_, ignore)| ignore)
    } else {
        0.0
    };

    // Step 4
    let raw = (attack * multiplier - defense * (1.0 - ignored)).floor();
    let mut damage = floor_damage(raw);

    // Step 5
    let reduction = defender.warding_against(attacker.element);
    if reduction > 0.0 {
        damage = floor_damage((damage as f64 * (1.0 - reduction)).floor());
    }

    AttackOutcome {
        damage,
        matchup,
        armor_break,
        critical: matchup == Matchup::Advantage || armor_break,
    }
}

/// Clamp a raw damage figure to an integer of at least 1
pub(crate) fn floor_damage(raw: f64) -> i64 {
    if raw.is_finite() && raw >= 1.0 {
        raw as i64
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::PassiveEffect;
    use crate::types::Element;
    use rand::rngs::mock::StepRng;

    fn low() -> StepRng {
        StepRng::new(0, 0)
    }

    fn high() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    #[test]
    fn test_neutral_attack() {
        let table = ElementTable::default();
        let attacker = CombatEntity::enemy("A", Element::Gold, 100, 0, 50, 0);
        let defender = CombatEntity::enemy("B", Element::Water, 100, 0, 0, 20);
        let out = resolve_attack(&attacker, &defender, &table, &mut low());
        assert_eq!(out.damage, 30);
        assert_eq!(out.matchup, Matchup::Neutral);
        assert!(!out.critical);
    }

    #[test]
    fn test_advantage_is_critical() {
        let table = ElementTable::default();
        let attacker = CombatEntity::enemy("A", Element::Water, 100, 0, 50, 0);
        let defender = CombatEntity::enemy("B", Element::Fire, 100, 0, 0, 20);
        let out = resolve_attack(&attacker, &defender, &table, &mut low());
        assert_eq!(out.damage, 55);
        assert!(out.critical);

        let out = resolve_attack(&defender, &attacker, &table, &mut low());
        assert_eq!(out.matchup, Matchup::Disadvantage);
        assert_eq!(out.damage, 1);
    }

    #[test]
    fn test_minimum_damage() {
        let table = ElementTable::default();
        let attacker = CombatEntity::enemy("A", Element::None, 100, 0, 1, 0);
        let defender = CombatEntity::enemy("B", Element::None, 100, 0, 0, 10_000);
        assert_eq!(resolve_attack(&attacker, &defender, &table, &mut low()).damage, 1);
    }

    #[test]
    fn test_armor_break_rolls() {
        let table = ElementTable::default();
        let mut attacker = CombatEntity::enemy("A", Element::None, 100, 0, 100, 0);
        attacker.passives.push(PassiveEffect::ArmorBreak {
            chance: 0.05,
            ignore: 0.3,
        });
        let defender = CombatEntity::enemy("B", Element::None, 100, 0, 0, 50);

        let hit = resolve_attack(&attacker, &defender, &table, &mut low());
        assert!(hit.armor_break && hit.critical);
        assert_eq!(hit.damage, 65);

        let miss = resolve_attack(&attacker, &defender, &table, &mut high());
        assert!(!miss.armor_break);
        assert_eq!(miss.damage, 50);
    }

    #[test]
    fn test_warding_applies_last() {
        let table = ElementTable::default();
        let attacker = CombatEntity::enemy("A", Element::Dark, 100, 0, 120, 0);
        let mut defender = CombatEntity::enemy("B", Element::Physical, 100, 0, 0, 20);
        defender.passives.push(PassiveEffect::Warding {
            element: Element::Dark,
            reduction: 0.05,
        });
        // floor(100 * 0.95)
        assert_eq!(resolve_attack(&attacker, &defender, &table, &mut low()).damage, 95);
    }
}
