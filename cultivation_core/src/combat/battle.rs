//! BattleState - the round state machine (immutable API)
//!
//! Every operation takes the encounter by reference and returns the next
//! one. Rejected actions return an `ActionError` and leave the input as it
//! was.

use super::attack::resolve_attack;
use super::entity::CombatEntity;
use super::result::{BattleResult, RoundReport};
use crate::buff::tick_buffs;
use crate::character::CharacterState;
use crate::config::{CombatConstants, ContentTables};
use crate::error::ActionError;
use crate::item::{dispatch, EffectOutcome};
use crate::reward::PendingRewards;
use crate::roll::roll_percent;
use crate::skill::{apply_skill, validate_cast, SkillDef};
use crate::types::EncounterClass;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One live encounter between the player and a monster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    /// Map the encounter was started on (the forced map under qi-deviation)
    pub map_id: u32,
    pub class: EncounterClass,
    /// Current round, starting at 1
    pub round: u32,
    pub player: CombatEntity,
    pub enemy: CombatEntity,
    /// Player luck at encounter start, read by fleeing
    pub player_luck: u32,
    /// Skill id -> rounds until it can be cast again
    pub cooldowns: BTreeMap<String, u32>,
    pub rewards: PendingRewards,
    pub result: BattleResult,
    pub log: Vec<String>,
}

enum PlayerAction<'a> {
    Attack,
    Cast(&'a SkillDef),
}

impl BattleState {
    pub fn is_over(&self) -> bool {
        self.result.is_over()
    }

    fn ensure_ongoing(&self) -> Result<(), ActionError> {
        if self.is_over() {
            Err(ActionError::EncounterConcluded)
        } else {
            Ok(())
        }
    }

    fn finish(&mut self, result: BattleResult) {
        self.player.hp = self.player.hp.max(0);
        self.enemy.hp = self.enemy.hp.max(0);
        self.result = result;
        let line = match result {
            BattleResult::Win => format!("{} is defeated", self.enemy.name),
            BattleResult::Loss => format!("{} has fallen", self.player.name),
            BattleResult::Escaped => format!("{} escapes", self.player.name),
            BattleResult::Ongoing => return,
        };
        info!(round = self.round, enemy = %self.enemy.name, %result, "encounter over");
        self.log.push(line);
    }
}

/// Resolve one round with a standard attack as the player action
pub fn resolve_round(
    battle: &BattleState,
    tables: &ContentTables,
    rng: &mut impl Rng,
) -> Result<(BattleState, RoundReport), ActionError> {
    battle.ensure_ongoing()?;
    Ok(run_round(battle, PlayerAction::Attack, tables, rng))
}

/// Resolve one round with an active skill as the player action
///
/// The skill must be known and slotted by `state`, off cooldown and
/// affordable at the start of the round.
pub fn use_skill(
    battle: &BattleState,
    state: &CharacterState,
    skill_id: &str,
    tables: &ContentTables,
    rng: &mut impl Rng,
) -> Result<(BattleState, RoundReport), ActionError> {
    battle.ensure_ongoing()?;
    let skill = tables
        .skills
        .get(skill_id)
        .ok_or_else(|| ActionError::UnknownSkill(skill_id.to_string()))?;
    if !state.knows_skill(skill_id) {
        return Err(ActionError::SkillNotLearned(skill_id.to_string()));
    }
    if !state.equipment.has_skill(skill_id) {
        return Err(ActionError::NotUsable(skill.name.clone()));
    }
    if battle.player.is_stunned() {
        return Err(ActionError::Stunned);
    }
    if let Err(err) = validate_cast(skill, &battle.player, &battle.cooldowns) {
        debug!(skill = skill_id, %err, "cast rejected");
        return Err(err);
    }
    Ok(run_round(battle, PlayerAction::Cast(skill), tables, rng))
}

/// Try to leave the encounter
///
/// Succeeds when a percent roll lands under `flee_base + luck * flee_luck_factor`.
/// A failed attempt is logged and costs nothing else: no round passes and the
/// enemy gets no attack.
pub fn attempt_flee(
    battle: &BattleState,
    constants: &CombatConstants,
    rng: &mut impl Rng,
) -> Result<BattleState, ActionError> {
    battle.ensure_ongoing()?;
    let mut next = battle.clone();
    if roll_percent(rng) < flee_chance(battle.player_luck, constants) {
        next.finish(BattleResult::Escaped);
    } else {
        next.log.push(format!("{} fails to escape", next.player.name));
    }
    Ok(next)
}

/// Percent chance to flee at a given luck
pub fn flee_chance(luck: u32, constants: &CombatConstants) -> f64 {
    constants.flee_base + luck as f64 * constants.flee_luck_factor
}

/// Drink a restorative outside the round order
///
/// Removes one instance of `item_id` from the character and restores the
/// player's pools up to their maximum. Returns the next encounter and the
/// next character.
pub fn use_battle_item(
    battle: &BattleState,
    state: &CharacterState,
    item_id: &str,
    tables: &ContentTables,
) -> Result<(BattleState, CharacterState), ActionError> {
    battle.ensure_ongoing()?;
    let def = tables
        .items
        .get(item_id)
        .ok_or_else(|| ActionError::UnknownItem(item_id.to_string()))?;
    let uid = state
        .find_item(item_id)
        .map(|i| i.uid)
        .ok_or_else(|| ActionError::ItemNotCarried(def.name.clone()))?;
    let EffectOutcome::Restore { hp, mp } = dispatch(def)? else {
        return Err(ActionError::NotUsable(def.name.clone()));
    };

    let mut next = battle.clone();
    let healed = next.player.heal(hp as i64);
    let restored = next.player.restore_mp(mp as i64);
    next.log.push(format!(
        "{} uses {} (+{} HP, +{} MP)",
        next.player.name, def.name, healed, restored
    ));

    let mut character = state.clone();
    character.remove_item(uid);
    Ok((next, character))
}

/// Run the round phases in order
///
/// 1. Capture stun flags
/// 2. Tick cooldowns
/// 3. Tick buffs on both sides, then the player's regeneration and resonance
/// 4. Pre-action death check
/// 5. Player action
/// 6. Win check
/// 7. Enemy action
/// 8. Loss check
fn run_round(
    battle: &BattleState,
    action: PlayerAction<'_>,
    tables: &ContentTables,
    rng: &mut impl Rng,
) -> (BattleState, RoundReport) {
    let mut next = battle.clone();
    let mut report = RoundReport::new(next.round);

    // Step 1: a stun landing mid-round takes hold next round
    report.player_stunned = next.player.is_stunned();
    report.enemy_stunned = next.enemy.is_stunned();

    // Step 2
    for rounds in next.cooldowns.values_mut() {
        *rounds = rounds.saturating_sub(1);
    }
    next.cooldowns.retain(|_, rounds| *rounds > 0);

    // Step 3
    report.player_dot_taken = tick_entity(&mut next.player, &mut next.log);
    report.enemy_dot_taken = tick_entity(&mut next.enemy, &mut next.log);
    if !next.player.is_dead() {
        let fraction = next.player.regeneration();
        if fraction > 0.0 && next.player.hp < next.player.max_hp {
            let amount = (next.player.max_hp as f64 * fraction).floor() as i64;
            report.player_regenerated = next.player.heal(amount);
        }
        let mp = next.player.resonance();
        if mp > 0 {
            report.player_mp_restored = next.player.restore_mp(mp);
        }
    }

    // Step 4
    if next.enemy.is_dead() {
        next.finish(BattleResult::Win);
        report.result = next.result;
        return (next, report);
    }
    if next.player.is_dead() {
        next.finish(BattleResult::Loss);
        report.result = next.result;
        return (next, report);
    }

    // Step 5
    if report.player_stunned {
        next.log.push(format!("{} is stunned", next.player.name));
    } else {
        match action {
            PlayerAction::Attack => {
                let hit = resolve_attack(&next.player, &next.enemy, &tables.elements, rng);
                next.enemy.take_damage(hit.damage);
                report.player_damage_dealt = hit.damage;
                report.critical = hit.critical;
                next.log.push(attack_line(&next.player, &next.enemy, hit.damage, hit.critical));
            }
            PlayerAction::Cast(skill) => {
                next.player.mp -= skill.mp_cost as i64;
                if skill.cooldown > 0 {
                    next.cooldowns.insert(skill.id.clone(), skill.cooldown);
                }
                let before = next.enemy.hp;
                let lines = apply_skill(skill, &mut next.player, &mut next.enemy, rng);
                report.player_damage_dealt = before - next.enemy.hp;
                report.skill = Some(skill.id.clone());
                next.log.extend(lines);
            }
        }
    }

    // Step 6
    if next.enemy.is_dead() {
        next.finish(BattleResult::Win);
        next.round += 1;
        report.result = next.result;
        return (next, report);
    }

    // Step 7
    if report.enemy_stunned {
        next.log.push(format!("{} is stunned", next.enemy.name));
    } else {
        let hit = resolve_attack(&next.enemy, &next.player, &tables.elements, rng);
        next.player.take_damage(hit.damage);
        report.enemy_damage_dealt = hit.damage;
        next.log.push(attack_line(&next.enemy, &next.player, hit.damage, hit.critical));
    }

    // Step 8
    if next.player.is_dead() {
        next.finish(BattleResult::Loss);
    } else {
        next.round += 1;
    }
    report.result = next.result;
    debug!(
        round = report.round,
        dealt = report.player_damage_dealt,
        taken = report.enemy_damage_dealt,
        player_hp = next.player.hp,
        enemy_hp = next.enemy.hp,
        "round resolved"
    );
    (next, report)
}

/// Tick one side's buffs, apply DoT and log it; returns the DoT taken
fn tick_entity(entity: &mut CombatEntity, log: &mut Vec<String>) -> i64 {
    let ticked = tick_buffs(&entity.buffs);
    for (name, damage) in &ticked.dot_hits {
        log.push(format!("{} takes {} damage from {}", entity.name, damage, name));
    }
    entity.take_damage(ticked.total_damage);
    entity.buffs = ticked.remaining;
    ticked.total_damage
}

fn attack_line(attacker: &CombatEntity, defender: &CombatEntity, damage: i64, critical: bool) -> String {
    if critical {
        format!("{} strikes {} critically for {} damage", attacker.name, defender.name, damage)
    } else {
        format!("{} strikes {} for {} damage", attacker.name, defender.name, damage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::{Buff, BuffKind};
    use crate::character::sample_character;
    use crate::item::grant_item;
    use crate::skill::PassiveEffect;
    use crate::stats::DerivedStats;
    use crate::types::Element;
    use rand::rngs::mock::StepRng;

    fn low() -> StepRng {
        StepRng::new(0, 0)
    }

    fn battle(enemy_hp: i64, enemy_atk: i64) -> BattleState {
        let stats = DerivedStats {
            max_hp: 100,
            max_mp: 90,
            atk: 55,
            def: 32,
            luk: 8,
        };
        BattleState {
            map_id: 0,
            class: EncounterClass::Common,
            round: 1,
            player: CombatEntity::player(
                "Tester",
                &stats,
                100,
                90,
                Element::Physical,
                vec![],
                vec![],
                vec![],
            ),
            enemy: CombatEntity::enemy("Bandit", Element::Physical, enemy_hp, 100, enemy_atk, 5),
            player_luck: 8,
            cooldowns: BTreeMap::new(),
            rewards: PendingRewards::default(),
            result: BattleResult::Ongoing,
            log: Vec::new(),
        }
    }

    #[test]
    fn test_exchange_of_blows() {
        let tables = ContentTables::builtin();
        let start = battle(200, 40);
        let (next, report) = resolve_round(&start, &tables, &mut low()).unwrap();

        assert_eq!(report.player_damage_dealt, 50);
        assert_eq!(report.enemy_damage_dealt, 8);
        assert_eq!(next.enemy.hp, 150);
        assert_eq!(next.player.hp, 92);
        assert_eq!(next.round, 2);
        assert_eq!(next.result, BattleResult::Ongoing);
        // Input untouched
        assert_eq!(start.enemy.hp, 200);
    }

    #[test]
    fn test_win_skips_enemy_action() {
        let tables = ContentTables::builtin();
        let (next, report) = resolve_round(&battle(30, 500), &tables, &mut low()).unwrap();
        assert_eq!(next.result, BattleResult::Win);
        assert_eq!(next.enemy.hp, 0);
        assert_eq!(next.player.hp, 100);
        assert_eq!(report.enemy_damage_dealt, 0);
        assert_eq!(next.round, 2);
    }

    #[test]
    fn test_loss_clamps_hp() {
        let tables = ContentTables::builtin();
        let (next, _) = resolve_round(&battle(1000, 500), &tables, &mut low()).unwrap();
        assert_eq!(next.result, BattleResult::Loss);
        assert_eq!(next.player.hp, 0);
        assert_eq!(next.round, 1);
    }

    #[test]
    fn test_dot_death_ends_before_actions() {
        let tables = ContentTables::builtin();
        let mut start = battle(10, 500);
        start.enemy.buffs.push(Buff::damage_over_time("Burning", 20.0, 3));
        let (next, report) = resolve_round(&start, &tables, &mut low()).unwrap();

        assert_eq!(next.result, BattleResult::Win);
        assert_eq!(report.enemy_dot_taken, 20);
        assert_eq!(report.player_damage_dealt, 0);
        assert_eq!(next.round, 1);
        assert_eq!(next.enemy.hp, 0);
    }

    #[test]
    fn test_stun_skips_exactly_one_action() {
        let tables = ContentTables::builtin();
        let mut start = battle(1000, 10);
        start.player.buffs.push(Buff::stun("Quake", 1));

        let (second, report) = resolve_round(&start, &tables, &mut low()).unwrap();
        assert!(report.player_stunned);
        assert_eq!(report.player_damage_dealt, 0);
        assert!(second.player.buffs.is_empty());

        let (_, report) = resolve_round(&second, &tables, &mut low()).unwrap();
        assert!(!report.player_stunned);
        assert!(report.player_damage_dealt > 0);
    }

    #[test]
    fn test_terminal_rejects_everything() {
        let tables = ContentTables::builtin();
        let mut done = battle(100, 10);
        done.result = BattleResult::Escaped;
        let state = sample_character();

        assert_eq!(
            resolve_round(&done, &tables, &mut low()).unwrap_err(),
            ActionError::EncounterConcluded
        );
        assert_eq!(
            attempt_flee(&done, &tables.constants.combat, &mut low()).unwrap_err(),
            ActionError::EncounterConcluded
        );
        assert_eq!(
            use_skill(&done, &state, "s_gold_1", &tables, &mut low()).unwrap_err(),
            ActionError::EncounterConcluded
        );
    }

    #[test]
    fn test_skill_debits_and_cools_down() {
        let tables = ContentTables::builtin();
        let mut state = sample_character();
        state.learned_skills.push("s_fire_1".to_string());
        state.equipment.skills[0] = Some("s_fire_1".to_string());

        let (next, report) = use_skill(&battle(1000, 10), &state, "s_fire_1", &tables, &mut low()).unwrap();
        assert_eq!(report.skill.as_deref(), Some("s_fire_1"));
        assert_eq!(next.player.mp, 90 - 25);
        assert_eq!(next.cooldowns.get("s_fire_1"), Some(&6));
        assert!(next.enemy.buffs.iter().any(|b| b.kind == BuffKind::DamageOverTime));

        let err = use_skill(&next, &state, "s_fire_1", &tables, &mut low()).unwrap_err();
        assert!(matches!(err, ActionError::OnCooldown { rounds: 6, .. }));

        // Cooldown ticks once per round
        let (later, _) = resolve_round(&next, &tables, &mut low()).unwrap();
        assert_eq!(later.cooldowns.get("s_fire_1"), Some(&5));
    }

    #[test]
    fn test_skill_rejections_leave_state() {
        let tables = ContentTables::builtin();
        let mut state = sample_character();
        state.learned_skills.push("s_light_2".to_string());
        state.equipment.skills[0] = Some("s_light_2".to_string());
        let mut start = battle(1000, 10);
        start.player.mp = 10;

        assert_eq!(
            use_skill(&start, &state, "s_light_2", &tables, &mut low()).unwrap_err(),
            ActionError::NotEnoughMp { need: 50, have: 10 }
        );
        assert_eq!(
            use_skill(&start, &state, "s_fire_1", &tables, &mut low()).unwrap_err(),
            ActionError::SkillNotLearned("s_fire_1".to_string())
        );
        assert_eq!(
            use_skill(&start, &state, "s_nope", &tables, &mut low()).unwrap_err(),
            ActionError::UnknownSkill("s_nope".to_string())
        );
    }

    #[test]
    fn test_regeneration_and_resonance() {
        let tables = ContentTables::builtin();
        let mut start = battle(1000, 1);
        start.player.hp = 50;
        start.player.mp = 10;
        start.player.passives = vec![
            PassiveEffect::Regeneration { fraction: 0.01 },
            PassiveEffect::Resonance { mp: 3 },
        ];
        let (_, report) = resolve_round(&start, &tables, &mut low()).unwrap();
        assert_eq!(report.player_regenerated, 1);
        assert_eq!(report.player_mp_restored, 3);
    }

    #[test]
    fn test_flee() {
        let constants = CombatConstants::default();
        let start = battle(100, 10);

        let fled = attempt_flee(&start, &constants, &mut low()).unwrap();
        assert_eq!(fled.result, BattleResult::Escaped);

        let stuck = attempt_flee(&start, &constants, &mut StepRng::new(u64::MAX, 0)).unwrap();
        assert_eq!(stuck.result, BattleResult::Ongoing);
        assert_eq!(stuck.round, start.round);
        assert_eq!(stuck.player.hp, start.player.hp);
        assert_eq!(stuck.log.len(), 1);
    }

    #[test]
    fn test_flee_chance_formula() {
        let constants = CombatConstants::default();
        assert!((flee_chance(0, &constants) - 40.0).abs() < f64::EPSILON);
        assert!((flee_chance(50, &constants) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_battle_item() {
        let tables = ContentTables::builtin();
        let (state, _) = grant_item(&sample_character(), "hp_s", &tables, &mut low()).unwrap();
        let mut start = battle(100, 10);
        start.player.hp = 70;

        let (next, character) = use_battle_item(&start, &state, "hp_s", &tables).unwrap();
        assert_eq!(next.player.hp, 100);
        assert!(character.inventory.is_empty());
        assert_eq!(next.round, start.round);

        assert_eq!(
            use_battle_item(&next, &character, "hp_s", &tables).unwrap_err(),
            ActionError::ItemNotCarried("Minor Rejuvenation Pill".to_string())
        );
    }
}
