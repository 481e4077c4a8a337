//! Item effects and their dispatch

use crate::config::ItemDef;
use crate::error::ActionError;
use serde::{Deserialize, Serialize};

/// On-use effect carried by an item definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemEffect {
    RestoreHp { amount: u32 },
    RestoreMp { amount: u32 },
    /// Only takes effect inside a breakthrough; using it directly is refused
    BreakthroughAid,
    LearnSkill { skill: String },
    /// Opens into a random skill book
    RandomSkillBook,
}

/// What using an item should do to its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOutcome {
    Restore { hp: u32, mp: u32 },
    Learn(String),
    OpenRandomBook,
}

/// Interpret a definition's effect
///
/// Items without an effect and breakthrough aids are rejected here, so
/// callers never consume them.
pub fn dispatch(def: &ItemDef) -> Result<EffectOutcome, ActionError> {
    match &def.effect {
        Some(ItemEffect::RestoreHp { amount }) => Ok(EffectOutcome::Restore { hp: *amount, mp: 0 }),
        Some(ItemEffect::RestoreMp { amount }) => Ok(EffectOutcome::Restore { hp: 0, mp: *amount }),
        Some(ItemEffect::LearnSkill { skill }) => Ok(EffectOutcome::Learn(skill.clone())),
        Some(ItemEffect::RandomSkillBook) => Ok(EffectOutcome::OpenRandomBook),
        Some(ItemEffect::BreakthroughAid) => Err(ActionError::BreakthroughOnly(def.name.clone())),
        None => Err(ActionError::NotUsable(def.name.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_items;

    #[test]
    fn test_dispatch_table() {
        let items = default_items();

        assert_eq!(
            dispatch(items.get("hp_s").unwrap()),
            Ok(EffectOutcome::Restore { hp: 50, mp: 0 })
        );
        assert_eq!(
            dispatch(items.get("mp_s").unwrap()),
            Ok(EffectOutcome::Restore { hp: 0, mp: 30 })
        );
        assert_eq!(
            dispatch(items.get("bk_dark_3").unwrap()),
            Ok(EffectOutcome::Learn("s_dark_3".to_string()))
        );
        assert_eq!(
            dispatch(items.get("bk_random").unwrap()),
            Ok(EffectOutcome::OpenRandomBook)
        );
    }

    #[test]
    fn test_breakthrough_aid_refused() {
        let items = default_items();
        let err = dispatch(items.get("bt_base").unwrap()).unwrap_err();
        assert!(matches!(err, ActionError::BreakthroughOnly(_)));
        assert!(matches!(
            dispatch(items.get("w_iron").unwrap()),
            Err(ActionError::NotUsable(_))
        ));
    }
}
