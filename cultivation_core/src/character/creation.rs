//! Character creation and attribute allocation

use super::{Attributes, CharacterState, Equipment};
use crate::config::GameConstants;
use crate::error::ActionError;
use crate::progression::exp_cap;
use crate::types::Attribute;
use tracing::info;

/// Create a fresh character from an initial allocation
///
/// Every attribute must lie in the creation range and the allocation must
/// spend the whole point budget.
pub fn create_character(
    name: &str,
    allocation: Attributes,
    constants: &GameConstants,
) -> Result<CharacterState, ActionError> {
    let creation = &constants.creation;

    for attr in Attribute::all() {
        let value = allocation.get(*attr);
        if !(creation.attribute_min..=creation.attribute_max).contains(&value) {
            return Err(ActionError::InvalidAllocation(format!(
                "{:?} must be between {} and {}, got {}",
                attr, creation.attribute_min, creation.attribute_max, value
            )));
        }
    }
    if allocation.total() != creation.point_budget {
        return Err(ActionError::InvalidAllocation(format!(
            "{} of {} points spent",
            allocation.total(),
            creation.point_budget
        )));
    }

    let name = name.trim();
    let state = CharacterState {
        name: if name.is_empty() { "Nameless".to_string() } else { name.to_string() },
        realm: 0,
        level: 1,
        exp: 0,
        exp_cap: exp_cap(0, 1, &constants.realms),
        hp: creation.start_hp,
        base_max_hp: creation.start_hp,
        mp: creation.start_mp,
        base_max_mp: creation.start_mp,
        injury: 0,
        corruption: 0,
        qi_deviation: false,
        stones: 0,
        attributes: allocation,
        free_points: 0,
        map_id: 0,
        inventory: Vec::new(),
        learned_skills: Vec::new(),
        equipment: Equipment::default(),
        next_item_id: 1,
    };
    info!(name = %state.name, "character created");
    Ok(state)
}

/// Spend one free point on `attribute`
pub fn allocate_point(
    state: &CharacterState,
    attribute: Attribute,
) -> Result<CharacterState, ActionError> {
    if state.free_points == 0 {
        return Err(ActionError::NoFreePoints);
    }
    let mut next = state.clone();
    next.free_points -= 1;
    *next.attributes.get_mut(attribute) += 1;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::sample_character;

    #[test]
    fn test_create_valid() {
        let constants = GameConstants::default();
        let allocation = Attributes {
            gold: 5,
            wood: 3,
            water: 5,
            fire: 5,
            earth: 2,
        };
        let state = create_character("Lin Feng", allocation, &constants).unwrap();
        assert_eq!(state.realm, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.exp_cap, 100);
        assert_eq!((state.hp, state.mp), (100, 50));
        assert_eq!(state.attribute_budget(), 20);
    }

    #[test]
    fn test_create_rejects_unspent_points() {
        let constants = GameConstants::default();
        let err = create_character("Lin", Attributes::uniform(1), &constants).unwrap_err();
        assert!(matches!(err, ActionError::InvalidAllocation(_)));
    }

    #[test]
    fn test_create_rejects_out_of_range() {
        let constants = GameConstants::default();
        let allocation = Attributes {
            gold: 6,
            wood: 5,
            water: 5,
            fire: 4,
            earth: 0,
        };
        assert!(create_character("Lin", allocation, &constants).is_err());
    }

    #[test]
    fn test_allocate_point() {
        let mut state = sample_character();
        state.free_points = 1;

        let next = allocate_point(&state, Attribute::Water).unwrap();
        assert_eq!(next.attributes.water, 5);
        assert_eq!(next.free_points, 0);
        assert_eq!(next.attribute_budget(), state.attribute_budget());

        assert_eq!(
            allocate_point(&next, Attribute::Gold).unwrap_err(),
            ActionError::NoFreePoints
        );
    }
}
