//! Skill definition table loading

use super::ConfigError;
use crate::skill::{PassiveEffect, SkillDef, SkillKind};
use crate::types::Element;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SkillsFile {
    #[serde(rename = "skills")]
    skills: Vec<SkillDef>,
}

/// Skill definitions keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct SkillTable {
    defs: BTreeMap<String, SkillDef>,
}

impl SkillTable {
    pub fn new(defs: impl IntoIterator<Item = SkillDef>) -> Self {
        SkillTable {
            defs: defs.into_iter().map(|d| (d.id.clone(), d)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&SkillDef> {
        self.defs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.defs.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDef> {
        self.defs.values()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Passive effects of the given slotted skills, unknown ids skipped
    pub fn passives<'a>(
        &'a self,
        slotted: impl IntoIterator<Item = &'a str, IntoIter: 'a>,
    ) -> impl Iterator<Item = &'a PassiveEffect> + 'a {
        slotted
            .into_iter()
            .filter_map(move |id| self.defs.get(id))
            .filter(|d| d.is_passive())
            .filter_map(|d| d.passive.as_ref())
    }
}

/// Load skill definitions from a TOML file
pub fn load_skill_table(path: &Path) -> Result<SkillTable, ConfigError> {
    let file: SkillsFile = super::load_toml(path)?;
    Ok(SkillTable::new(file.skills))
}

/// Load skill definitions from a TOML string
pub fn parse_skill_table(content: &str) -> Result<SkillTable, ConfigError> {
    let file: SkillsFile = super::parse_toml(content)?;
    Ok(SkillTable::new(file.skills))
}

/// Get the built-in skill table
pub fn default_skills() -> SkillTable {
    let toml = include_str!("../../config/skills.toml");
    parse_skill_table(toml).unwrap_or_else(|_| {
        SkillTable::new([SkillDef {
            id: "s_earth_3".to_string(),
            name: "Earthen Foundation".to_string(),
            element: Element::Earth,
            kind: SkillKind::Passive,
            mp_cost: 0,
            cooldown: 0,
            description: String::new(),
            effects: Vec::new(),
            passive: Some(PassiveEffect::MaxHp { bonus: 0.1 }),
        }])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::BuffKind;
    use crate::skill::{BuffTarget, SkillEffect};

    #[test]
    fn test_parse_skills() {
        let toml = r#"
[[skills]]
id = "s_earth_2"
name = "Earthshaker"
element = "earth"
kind = "active"
mp_cost = 45
cooldown = 12

[[skills.effects]]
type = "strike"
scale = 1.2

[[skills.effects]]
type = "buff"
target = "opponent"
name = "Dazed"
kind = "stun"
magnitude = 1.0
duration = 2

[[skills]]
id = "s_wood_3"
name = "Spirit Root"
element = "wood"
kind = "passive"

[skills.passive]
type = "regeneration"
fraction = 0.01
"#;

        let skills = parse_skill_table(toml).unwrap();
        assert_eq!(skills.len(), 2);

        let quake = skills.get("s_earth_2").unwrap();
        assert_eq!(quake.mp_cost, 45);
        assert_eq!(quake.effects.len(), 2);
        match &quake.effects[1] {
            SkillEffect::Buff {
                target,
                kind,
                chance,
                ..
            } => {
                assert_eq!(*target, BuffTarget::Opponent);
                assert_eq!(*kind, BuffKind::Stun);
                assert!((chance - 1.0).abs() < f64::EPSILON);
            }
            other => panic!("unexpected effect {other:?}"),
        }

        let passives: Vec<_> = skills.passives(["s_wood_3", "s_earth_2", "missing"]).collect();
        assert_eq!(passives, vec![&PassiveEffect::Regeneration { fraction: 0.01 }]);
    }

    #[test]
    fn test_builtin_skills() {
        let skills = default_skills();
        assert_eq!(skills.len(), 21);
        assert!(skills.get("s_gold_3").unwrap().is_passive());
        assert!(skills.get("s_fire_1").unwrap().is_active());
    }
}
