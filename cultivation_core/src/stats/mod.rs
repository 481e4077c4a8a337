//! Stat derivation - persistent character state to combat stats
//!
//! `derive_stats` collects a `StatSource` for the cultivation base, every
//! equipped gear item and every slotted passive skill, applies them in
//! priority order and sanitizes the result in one place.

mod accumulator;

pub use crate::source::{effective_realm, injury_multiplier};
pub use accumulator::{DerivedStats, StatAccumulator};

use crate::character::CharacterState;
use crate::config::ContentTables;
use crate::source::{CultivationSource, GearSource, PassiveSource, StatSource};
use crate::types::GearSlot;
use tracing::debug;

/// Build the stat sources for a character, sorted by priority
pub fn stat_sources(state: &CharacterState, tables: &ContentTables) -> Vec<Box<dyn StatSource>> {
    let constants = &tables.constants;
    let mut sources: Vec<Box<dyn StatSource>> = vec![Box::new(CultivationSource::new(
        state.attributes,
        state.realm,
        state.level,
        state.injury,
        state.base_max_hp,
        state.base_max_mp,
        &constants.injury,
    ))];

    for slot in GearSlot::all() {
        if let Some(item) = state.equipped(*slot) {
            sources.push(Box::new(GearSource::new(
                *slot,
                item.clone(),
                state.attributes,
                constants.items.affix_bonus_per_point,
            )));
        }
    }

    for skill_id in state.equipment.slotted_skills() {
        let passive = tables
            .skills
            .get(skill_id)
            .filter(|d| d.is_passive())
            .and_then(|d| d.passive.clone());
        if let Some(effect) = passive {
            sources.push(Box::new(PassiveSource::new(skill_id, effect)));
        }
    }

    sources.sort_by_key(|s| s.priority());
    sources
}

/// Derive combat stats from persistent state
///
/// Never fails: any field that does not derive to a finite non-negative
/// number is replaced by its safe default.
pub fn derive_stats(state: &CharacterState, tables: &ContentTables) -> DerivedStats {
    let mut acc = StatAccumulator::new();
    for source in stat_sources(state, tables) {
        source.apply(&mut acc);
    }
    let stats = acc.finish();
    debug!(
        name = %state.name,
        max_hp = stats.max_hp,
        max_mp = stats.max_mp,
        atk = stats.atk,
        def = stats.def,
        luk = stats.luk,
        "derived stats"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::sample_character;
    use crate::item::ItemInstance;
    use crate::types::{Element, ItemUid};

    #[test]
    fn test_default_character() {
        let tables = ContentTables::builtin();
        let state = sample_character();
        let stats = derive_stats(&state, &tables);

        // Attributes all 4: atk (4 + 4) * 5 + 5 + 10, def (4 + 4) * 3 + 3 + 5
        assert_eq!(stats.max_hp, 100);
        assert_eq!(stats.max_mp, 90);
        assert_eq!(stats.atk, 55);
        assert_eq!(stats.def, 32);
        assert_eq!(stats.luk, 8);
    }

    #[test]
    fn test_gear_and_passives() {
        let tables = ContentTables::builtin();
        let mut state = sample_character();
        state.inventory.push(ItemInstance {
            uid: ItemUid(7),
            item_id: "w_iron".to_string(),
            final_value: 100,
            affixes: vec![Element::Fire],
        });
        state.equipment.weapon = Some(ItemUid(7));
        state.learned_skills.push("s_earth_3".to_string());
        state.equipment.skills[0] = Some("s_earth_3".to_string());

        let stats = derive_stats(&state, &tables);
        // floor(100 * 4 * 0.05) = 20 affix bonus
        assert_eq!(stats.atk, 55 + 120);
        assert_eq!(stats.max_hp, 110);
    }

    #[test]
    fn test_injury_reduces_combat_only() {
        let tables = ContentTables::builtin();
        let mut state = sample_character();
        state.realm = 2;
        state.injury = 60;

        let stats = derive_stats(&state, &tables);
        // effective realm 0, then x0.5
        assert_eq!(stats.atk, 27);
        assert_eq!(stats.def, 16);
        assert_eq!(stats.max_hp, 100);
        assert_eq!(stats.luk, 8);
    }

    #[test]
    fn test_dangling_references_ignored() {
        let tables = ContentTables::builtin();
        let mut state = sample_character();
        state.equipment.armor = Some(ItemUid(999));
        state.equipment.skills[2] = Some("s_missing".to_string());

        assert_eq!(derive_stats(&state, &tables), derive_stats(&sample_character(), &tables));
    }

    #[test]
    fn test_sources_sorted_by_priority() {
        let tables = ContentTables::builtin();
        let mut state = sample_character();
        state.equipment.skills[0] = Some("s_water_3".to_string());
        let sources = stat_sources(&state, &tables);
        assert_eq!(sources.first().map(|s| s.id()), Some("cultivation"));
        assert_eq!(sources.last().map(|s| s.id()), Some("s_water_3"));
    }
}
