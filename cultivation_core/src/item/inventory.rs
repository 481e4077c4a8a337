//! Inventory and equipment operations
//!
//! Each operation takes the character by reference and returns the next
//! state, leaving the input untouched on rejection.

use super::effect::{dispatch, EffectOutcome};
use super::instance::create_item;
use crate::character::{CharacterState, SKILL_SLOTS};
use crate::config::ContentTables;
use crate::error::ActionError;
use crate::stats::derive_stats;
use crate::types::{GearSlot, ItemUid};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

/// Create a fresh instance of `item_id` in the inventory
pub fn grant_item(
    state: &CharacterState,
    item_id: &str,
    tables: &ContentTables,
    rng: &mut impl Rng,
) -> Result<(CharacterState, ItemUid), ActionError> {
    let def = tables.items.get(item_id).ok_or_else(|| {
        warn!(item = item_id, "grant of unknown item");
        ActionError::UnknownItem(item_id.to_string())
    })?;
    let mut next = state.clone();
    let uid = next.take_item_id();
    next.inventory
        .push(create_item(def, uid, &tables.constants.items, rng));
    Ok((next, uid))
}

/// Use an owned item outside battle
///
/// Gear is equipped; restoratives heal up to the derived maximum; skill books
/// teach their skill and take the first free skill slot; the random codex
/// turns into a random skill book. Breakthrough aids are refused and kept.
pub fn use_item(
    state: &CharacterState,
    uid: ItemUid,
    tables: &ContentTables,
    rng: &mut impl Rng,
) -> Result<CharacterState, ActionError> {
    let item = state.item(uid).ok_or(ActionError::ItemNotOwned(uid))?;
    let def = tables
        .items
        .get(&item.item_id)
        .ok_or_else(|| ActionError::UnknownItem(item.item_id.clone()))?;

    if def.kind.is_gear() {
        return equip_item(state, uid, tables);
    }

    match dispatch(def)? {
        EffectOutcome::Restore { hp, mp } => {
            let stats = derive_stats(state, tables);
            let mut next = state.clone();
            next.hp = next.hp.saturating_add(hp).min(stats.max_hp);
            next.mp = next.mp.saturating_add(mp).min(stats.max_mp);
            next.remove_item(uid);
            info!(item = %def.id, hp = next.hp, mp = next.mp, "restorative used");
            Ok(next)
        }
        EffectOutcome::Learn(skill_id) => {
            if !tables.skills.contains(&skill_id) {
                return Err(ActionError::UnknownSkill(skill_id));
            }
            if state.knows_skill(&skill_id) {
                return Err(ActionError::AlreadyLearned(skill_id));
            }
            let mut next = state.clone();
            next.learned_skills.push(skill_id.clone());
            if let Some(slot) = next.equipment.skills.iter_mut().find(|s| s.is_none()) {
                *slot = Some(skill_id.clone());
            }
            next.remove_item(uid);
            info!(skill = %skill_id, "skill learned");
            Ok(next)
        }
        EffectOutcome::OpenRandomBook => {
            let books = tables.items.skill_books();
            let book_id = books
                .choose(rng)
                .map(|book| book.id.clone())
                .ok_or_else(|| ActionError::NotUsable(def.name.clone()))?;
            let mut opened = state.clone();
            opened.remove_item(uid);
            let (next, _) = grant_item(&opened, &book_id, tables, rng)?;
            info!(book = %book_id, "codex opened");
            Ok(next)
        }
    }
}

/// Put an owned gear item into its slot
pub fn equip_item(
    state: &CharacterState,
    uid: ItemUid,
    tables: &ContentTables,
) -> Result<CharacterState, ActionError> {
    let item = state.item(uid).ok_or(ActionError::ItemNotOwned(uid))?;
    let def = tables
        .items
        .get(&item.item_id)
        .ok_or_else(|| ActionError::UnknownItem(item.item_id.clone()))?;
    let slot = def
        .kind
        .gear_slot()
        .ok_or_else(|| ActionError::NotUsable(def.name.clone()))?;

    let mut next = state.clone();
    *next.equipment.slot_mut(slot) = Some(uid);
    Ok(next)
}

/// Empty a gear slot; the item stays in the inventory
pub fn unequip(state: &CharacterState, slot: GearSlot) -> Result<CharacterState, ActionError> {
    if state.equipment.slot(slot).is_none() {
        return Err(ActionError::SlotEmpty(slot));
    }
    let mut next = state.clone();
    *next.equipment.slot_mut(slot) = None;
    Ok(next)
}

/// Slot a learned skill into the first free skill slot
pub fn equip_skill(state: &CharacterState, skill_id: &str) -> Result<CharacterState, ActionError> {
    if !state.knows_skill(skill_id) {
        return Err(ActionError::SkillNotLearned(skill_id.to_string()));
    }
    if state.equipment.has_skill(skill_id) {
        return Ok(state.clone());
    }
    let mut next = state.clone();
    let slot = next
        .equipment
        .skills
        .iter_mut()
        .find(|s| s.is_none())
        .ok_or(ActionError::SkillSlotsFull)?;
    *slot = Some(skill_id.to_string());
    Ok(next)
}

/// Clear a skill slot by index
pub fn unequip_skill(state: &CharacterState, slot: usize) -> Result<CharacterState, ActionError> {
    if slot >= SKILL_SLOTS || state.equipment.skills[slot].is_none() {
        return Err(ActionError::SkillSlotEmpty(slot));
    }
    let mut next = state.clone();
    next.equipment.skills[slot] = None;
    Ok(next)
}

/// Sell an owned item for a fraction of its price
///
/// Returns the next state and the stones received.
pub fn sell_item(
    state: &CharacterState,
    uid: ItemUid,
    tables: &ContentTables,
) -> Result<(CharacterState, u64), ActionError> {
    let item = state.item(uid).ok_or(ActionError::ItemNotOwned(uid))?;
    let price = tables.items.get(&item.item_id).map_or(0, |d| d.price);
    let earned = (price as f64 * tables.constants.recovery.sell_ratio).floor() as u64;

    let mut next = state.clone();
    next.remove_item(uid);
    next.stones += earned;
    Ok((next, earned))
}

/// Buy a new instance of `item_id` at its listed price
pub fn buy_item(
    state: &CharacterState,
    item_id: &str,
    tables: &ContentTables,
    rng: &mut impl Rng,
) -> Result<(CharacterState, ItemUid), ActionError> {
    let def = tables
        .items
        .get(item_id)
        .ok_or_else(|| ActionError::UnknownItem(item_id.to_string()))?;
    if state.stones < def.price {
        return Err(ActionError::NotEnoughStones {
            need: def.price,
            have: state.stones,
        });
    }
    let mut paid = state.clone();
    paid.stones -= def.price;
    grant_item(&paid, item_id, tables, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::sample_character;
    use rand::rngs::mock::StepRng;

    fn tables() -> ContentTables {
        ContentTables::builtin()
    }

    #[test]
    fn test_buy_and_sell() {
        let tables = tables();
        let mut rng = StepRng::new(0, 0);
        let mut state = sample_character();
        state.stones = 250;

        let (state, uid) = buy_item(&state, "w_iron", &tables, &mut rng).unwrap();
        assert_eq!(state.stones, 50);
        assert_eq!(state.inventory.len(), 1);

        let state = equip_item(&state, uid, &tables).unwrap();
        assert_eq!(state.equipment.weapon, Some(uid));

        let (state, earned) = sell_item(&state, uid, &tables).unwrap();
        assert_eq!(earned, 60);
        assert_eq!(state.stones, 110);
        assert!(state.inventory.is_empty());
        assert_eq!(state.equipment.weapon, None);
    }

    #[test]
    fn test_buy_rejected_without_stones() {
        let tables = tables();
        let mut rng = StepRng::new(0, 0);
        let state = sample_character();
        let err = buy_item(&state, "w_iron", &tables, &mut rng).unwrap_err();
        assert_eq!(err, ActionError::NotEnoughStones { need: 200, have: 0 });
    }

    #[test]
    fn test_restorative_clamps_to_max() {
        let tables = tables();
        let mut rng = StepRng::new(0, 0);
        let mut state = sample_character();
        state.hp = 80;
        let (state, uid) = grant_item(&state, "hp_s", &tables, &mut rng).unwrap();

        let next = use_item(&state, uid, &tables, &mut rng).unwrap();
        assert_eq!(next.hp, 100);
        assert!(next.inventory.is_empty());
    }

    #[test]
    fn test_skill_book_learns_and_slots() {
        let tables = tables();
        let mut rng = StepRng::new(0, 0);
        let state = sample_character();
        let (state, uid) = grant_item(&state, "bk_fire_1", &tables, &mut rng).unwrap();

        let next = use_item(&state, uid, &tables, &mut rng).unwrap();
        assert!(next.knows_skill("s_fire_1"));
        assert_eq!(next.equipment.skills[0].as_deref(), Some("s_fire_1"));
        assert!(next.inventory.is_empty());

        // A second copy is refused and kept
        let (again, uid) = grant_item(&next, "bk_fire_1", &tables, &mut rng).unwrap();
        let err = use_item(&again, uid, &tables, &mut rng).unwrap_err();
        assert_eq!(err, ActionError::AlreadyLearned("s_fire_1".to_string()));
    }

    #[test]
    fn test_breakthrough_pill_not_consumed() {
        let tables = tables();
        let mut rng = StepRng::new(0, 0);
        let (state, uid) = grant_item(&sample_character(), "bt_base", &tables, &mut rng).unwrap();
        let err = use_item(&state, uid, &tables, &mut rng).unwrap_err();
        assert!(matches!(err, ActionError::BreakthroughOnly(_)));
        assert_eq!(state.inventory.len(), 1);
    }

    #[test]
    fn test_random_codex_becomes_book() {
        let tables = tables();
        let mut rng = StepRng::new(0, 0);
        let (state, uid) = grant_item(&sample_character(), "bk_random", &tables, &mut rng).unwrap();

        let next = use_item(&state, uid, &tables, &mut rng).unwrap();
        assert_eq!(next.inventory.len(), 1);
        // Lowest roll picks the first book in id order
        assert_eq!(next.inventory[0].item_id, "bk_dark_1");
        assert_ne!(next.inventory[0].uid, uid);
    }

    #[test]
    fn test_skill_slots() {
        let mut state = sample_character();
        state.learned_skills = ["s_gold_1", "s_gold_2", "s_gold_3", "s_wood_1"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let state = equip_skill(&state, "s_gold_1").unwrap();
        let state = equip_skill(&state, "s_gold_2").unwrap();
        let state = equip_skill(&state, "s_gold_3").unwrap();
        assert_eq!(
            equip_skill(&state, "s_wood_1").unwrap_err(),
            ActionError::SkillSlotsFull
        );
        assert_eq!(
            equip_skill(&state, "s_fire_1").unwrap_err(),
            ActionError::SkillNotLearned("s_fire_1".to_string())
        );

        let state = unequip_skill(&state, 1).unwrap();
        assert_eq!(unequip_skill(&state, 1).unwrap_err(), ActionError::SkillSlotEmpty(1));
        let state = equip_skill(&state, "s_wood_1").unwrap();
        assert_eq!(state.equipment.skills[1].as_deref(), Some("s_wood_1"));
    }

    #[test]
    fn test_unequip_empty_slot() {
        let state = sample_character();
        assert_eq!(
            unequip(&state, GearSlot::Robe).unwrap_err(),
            ActionError::SlotEmpty(GearSlot::Robe)
        );
    }
}
