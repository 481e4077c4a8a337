//! Skills: definitions and active-skill resolution
//!
//! Passive skills have no resolver entry; `stats` and `combat` read their
//! effects directly.

pub mod resolver;
mod types;

pub use resolver::{apply_skill, validate_cast};
pub use types::{BuffTarget, PassiveEffect, SkillDef, SkillEffect, SkillKind};
