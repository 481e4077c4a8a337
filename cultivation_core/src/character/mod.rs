//! Persistent character state, creation and save upgrades

mod creation;
mod save;
mod state;

pub use creation::{allocate_point, create_character};
pub use save::{upgrade, PersistedCharacter};
pub use state::{Attributes, CharacterState, Equipment, SKILL_SLOTS};

/// A fresh character with every attribute at 4
#[cfg(test)]
pub(crate) fn sample_character() -> CharacterState {
    let constants = crate::config::GameConstants::default();
    match create_character("Tester", Attributes::uniform(4), &constants) {
        Ok(state) => state,
        Err(err) => panic!("sample allocation rejected: {err}"),
    }
}
