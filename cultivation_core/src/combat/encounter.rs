//! Encounter generation - map, class and monster rolls

use super::battle::BattleState;
use super::entity::CombatEntity;
use super::result::BattleResult;
use crate::character::CharacterState;
use crate::config::{ContentTables, EncounterConstants};
use crate::error::ActionError;
use crate::reward::roll_pending;
use crate::roll::variance;
use crate::stats::{derive_stats, effective_realm};
use crate::types::{EncounterClass, GearSlot};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::info;

/// Map class thresholds onto a uniform `[0, 1)` roll
pub fn roll_class(roll: f64, constants: &EncounterConstants) -> EncounterClass {
    if roll > constants.boss_above {
        EncounterClass::Boss
    } else if roll > constants.miniboss_above {
        EncounterClass::Miniboss
    } else if roll > constants.elite_above {
        EncounterClass::Elite
    } else {
        EncounterClass::Common
    }
}

/// Start an encounter on `map_id`
///
/// Qi-deviation overrides the requested map. Rolls, in order: the encounter
/// class, the monster, the stat spread and the drop. A player at 0 HP is
/// refused.
pub fn start_encounter(
    state: &CharacterState,
    map_id: u32,
    tables: &ContentTables,
    rng: &mut impl Rng,
) -> Result<BattleState, ActionError> {
    if state.hp == 0 {
        return Err(ActionError::Exhausted);
    }
    let constants = &tables.constants;
    let map_id = if state.qi_deviation {
        constants.encounter.deviation_map_id
    } else {
        map_id
    };
    let map = tables.maps.get(map_id).ok_or(ActionError::UnknownMap(map_id))?;

    let class = roll_class(rng.gen::<f64>(), &constants.encounter);
    let candidates = tables.monsters.candidates(map.pool_tier(), class);
    let monster = candidates
        .choose(rng)
        .ok_or(ActionError::UnknownMap(map_id))?;

    let spread = variance(rng, constants.encounter.stat_variance);
    let mods = &monster.modifiers;
    let hp = (map.base.hp as f64 * mods.hp * spread).floor() as i64;
    let mut atk = (map.base.atk as f64 * mods.atk * spread).floor();
    let def = (map.base.def as f64 * mods.def).floor() as i64;

    let realm = effective_realm(state.realm, state.injury, &constants.injury) as i64;
    if realm < map.min_realm as i64 - 1 {
        atk *= constants.encounter.realm_pressure_attack;
    }

    let rewards = roll_pending(map, class, monster, &tables.items, &constants.rewards, rng);

    let stats = derive_stats(state, tables);
    let affixes = |slot| state.equipped(slot).map(|i| i.affixes.clone()).unwrap_or_default();
    let passives = tables
        .skills
        .passives(state.equipment.slotted_skills())
        .cloned()
        .collect();
    let player = CombatEntity::player(
        state.name.clone(),
        &stats,
        state.hp,
        state.mp,
        constants.encounter.player_element,
        affixes(GearSlot::Weapon),
        affixes(GearSlot::Armor),
        passives,
    );
    let enemy = CombatEntity::enemy(
        monster.name.clone(),
        monster.element,
        hp,
        constants.encounter.enemy_mp,
        atk as i64,
        def,
    );

    info!(
        map = map.id,
        %class,
        enemy = %enemy.name,
        hp = enemy.hp,
        atk = enemy.atk,
        "encounter started"
    );
    let opening = format!("A {} {} appears in {}", class, enemy.name, map.name);
    Ok(BattleState {
        map_id: map.id,
        class,
        round: 1,
        player,
        enemy,
        player_luck: stats.luk,
        cooldowns: BTreeMap::new(),
        rewards,
        result: BattleResult::Ongoing,
        log: vec![opening],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::sample_character;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_class_thresholds() {
        let c = EncounterConstants::default();
        assert_eq!(roll_class(0.0, &c), EncounterClass::Common);
        assert_eq!(roll_class(0.70, &c), EncounterClass::Common);
        assert_eq!(roll_class(0.75, &c), EncounterClass::Elite);
        assert_eq!(roll_class(0.95, &c), EncounterClass::Miniboss);
        assert_eq!(roll_class(0.99, &c), EncounterClass::Boss);
    }

    #[test]
    fn test_low_rolls_spawn_weak_common() {
        let tables = ContentTables::builtin();
        let state = sample_character();
        let battle = start_encounter(&state, 0, &tables, &mut StepRng::new(0, 0)).unwrap();

        assert_eq!(battle.class, EncounterClass::Common);
        assert_eq!(battle.round, 1);
        assert_eq!(battle.enemy.mp, 100);
        let template = &tables.monsters.candidates(0, EncounterClass::Common)[0];
        assert_eq!(battle.enemy.name, template.name);
        // Variance at its floor of 0.9
        assert_eq!(battle.enemy.max_hp, (80.0 * template.modifiers.hp * 0.9).floor() as i64);
        assert_eq!(battle.rewards.exp, 5);
        assert_eq!(battle.player.hp, 100);
        assert_eq!(battle.player_luck, 8);
    }

    #[test]
    fn test_exhausted_refused() {
        let tables = ContentTables::builtin();
        let mut state = sample_character();
        state.hp = 0;
        assert_eq!(
            start_encounter(&state, 0, &tables, &mut StepRng::new(0, 0)).unwrap_err(),
            ActionError::Exhausted
        );
        state.hp = 1;
        assert_eq!(
            start_encounter(&state, 42, &tables, &mut StepRng::new(0, 0)).unwrap_err(),
            ActionError::UnknownMap(42)
        );
    }

    #[test]
    fn test_deviation_forces_barrier_map() {
        let tables = ContentTables::builtin();
        let mut state = sample_character();
        state.qi_deviation = true;
        let battle = start_encounter(&state, 3, &tables, &mut StepRng::new(0, 0)).unwrap();
        assert_eq!(battle.map_id, 99);
        assert!(battle.rewards.drop.is_none());
    }

    #[test]
    fn test_realm_pressure_doubles_attack() {
        let tables = ContentTables::builtin();
        let state = sample_character();
        // Map 2 needs realm 1: no pressure at realm 0
        let near = start_encounter(&state, 2, &tables, &mut StepRng::new(0, 0)).unwrap();
        // Map 4 needs realm 2: pressure
        let far = start_encounter(&state, 4, &tables, &mut StepRng::new(0, 0)).unwrap();

        let template = &tables.monsters.candidates(2, EncounterClass::Common)[0];
        assert_eq!(near.enemy.atk, (60.0 * template.modifiers.atk * 0.9).floor() as i64);
        let template = &tables.monsters.candidates(4, EncounterClass::Common)[0];
        assert_eq!(far.enemy.atk, ((300.0 * template.modifiers.atk * 0.9).floor() * 2.0) as i64);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let tables = ContentTables::builtin();
        let state = sample_character();
        let a = start_encounter(&state, 1, &tables, &mut ChaCha8Rng::seed_from_u64(11)).unwrap();
        let b = start_encounter(&state, 1, &tables, &mut ChaCha8Rng::seed_from_u64(11)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_gear_affixes_become_elements() {
        let tables = ContentTables::builtin();
        let mut state = sample_character();
        state.inventory.push(crate::item::ItemInstance {
            uid: crate::types::ItemUid(1),
            item_id: "w_iron".to_string(),
            final_value: 100,
            affixes: vec![crate::types::Element::Water],
        });
        state.equipment.weapon = Some(crate::types::ItemUid(1));
        let battle = start_encounter(&state, 0, &tables, &mut StepRng::new(0, 0)).unwrap();
        assert_eq!(battle.player.strike_elements, vec![crate::types::Element::Water]);
        assert!(battle.player.guard_elements.is_empty());
    }
}
