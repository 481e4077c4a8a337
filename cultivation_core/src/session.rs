//! Session - the character and encounter cells plus the two battle clocks
//!
//! The engine itself is stateless; a `Session` is the single owner of the
//! persistent character and the live encounter that a front-end drives. The
//! auto-battle clock resolves one round per full interval, and the requeue
//! clock concludes a won encounter and starts the next after a delay.

use crate::character::CharacterState;
use crate::combat::{
    attempt_flee, resolve_round, start_encounter, use_battle_item, use_skill, BattleResult,
    BattleState, RoundReport,
};
use crate::config::ContentTables;
use crate::error::ActionError;
use crate::progression::{conclude_encounter, Conclusion};
use crate::types::EncounterClass;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Something a tick or action did, for the front-end to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    EncounterStarted {
        map_id: u32,
        enemy: String,
        class: EncounterClass,
    },
    RoundResolved(RoundReport),
    EncounterConcluded {
        result: BattleResult,
        conclusion: Conclusion,
    },
    /// A scheduled action was refused; looping stops
    Rejected { reason: String },
}

/// Owner of one character and at most one encounter
#[derive(Debug, Clone)]
pub struct Session {
    pub character: CharacterState,
    pub battle: Option<BattleState>,
    /// Resolve rounds on the battle clock
    pub auto_battle: bool,
    /// Start a new encounter after each win
    pub auto_loop: bool,
    /// Map requested for new encounters
    pub map_id: u32,
    battle_elapsed_ms: u64,
    requeue_elapsed_ms: u64,
}

impl Session {
    pub fn new(character: CharacterState) -> Self {
        let map_id = character.map_id;
        Session {
            character,
            battle: None,
            auto_battle: false,
            auto_loop: false,
            map_id,
            battle_elapsed_ms: 0,
            requeue_elapsed_ms: 0,
        }
    }

    /// Whether an encounter is live and unresolved
    pub fn in_battle(&self) -> bool {
        self.battle.as_ref().is_some_and(|b| !b.is_over())
    }

    /// Start an encounter on `map_id`, replacing any concluded one
    pub fn start(
        &mut self,
        map_id: u32,
        tables: &ContentTables,
        rng: &mut impl Rng,
    ) -> Result<SessionEvent, ActionError> {
        if self.in_battle() {
            return Err(ActionError::EncounterOngoing);
        }
        if self.battle.is_some() {
            self.conclude(tables, rng)?;
        }
        let battle = start_encounter(&self.character, map_id, tables, rng)?;
        self.map_id = map_id;
        self.character.map_id = battle.map_id;
        self.battle_elapsed_ms = 0;
        self.requeue_elapsed_ms = 0;
        let event = SessionEvent::EncounterStarted {
            map_id: battle.map_id,
            enemy: battle.enemy.name.clone(),
            class: battle.class,
        };
        self.battle = Some(battle);
        Ok(event)
    }

    /// Fold a finished encounter into the character and drop it
    pub fn conclude(
        &mut self,
        tables: &ContentTables,
        rng: &mut impl Rng,
    ) -> Result<SessionEvent, ActionError> {
        let battle = self.battle.as_ref().ok_or(ActionError::EncounterConcluded)?;
        let (character, conclusion) = conclude_encounter(battle, &self.character, tables, rng)?;
        let result = battle.result;
        self.character = character;
        self.battle = None;
        Ok(SessionEvent::EncounterConcluded { result, conclusion })
    }

    /// Resolve one round by hand
    pub fn attack(
        &mut self,
        tables: &ContentTables,
        rng: &mut impl Rng,
    ) -> Result<SessionEvent, ActionError> {
        let battle = self.battle.as_ref().ok_or(ActionError::EncounterConcluded)?;
        let (next, report) = resolve_round(battle, tables, rng)?;
        Ok(self.after_round(next, report))
    }

    /// Cast a slotted skill as this round's action
    pub fn cast(
        &mut self,
        skill_id: &str,
        tables: &ContentTables,
        rng: &mut impl Rng,
    ) -> Result<SessionEvent, ActionError> {
        let battle = self.battle.as_ref().ok_or(ActionError::EncounterConcluded)?;
        let (next, report) = use_skill(battle, &self.character, skill_id, tables, rng)?;
        self.battle_elapsed_ms = 0;
        Ok(self.after_round(next, report))
    }

    /// Try to escape; success stops looping
    pub fn flee(&mut self, tables: &ContentTables, rng: &mut impl Rng) -> Result<BattleResult, ActionError> {
        let battle = self.battle.as_ref().ok_or(ActionError::EncounterConcluded)?;
        let next = attempt_flee(battle, &tables.constants.combat, rng)?;
        let result = next.result;
        if result == BattleResult::Escaped {
            self.auto_loop = false;
        }
        self.battle = Some(next);
        Ok(result)
    }

    /// Use a restorative from the inventory mid-battle
    pub fn use_item(&mut self, item_id: &str, tables: &ContentTables) -> Result<(), ActionError> {
        let battle = self.battle.as_ref().ok_or(ActionError::EncounterConcluded)?;
        let (next, character) = use_battle_item(battle, &self.character, item_id, tables)?;
        self.battle = Some(next);
        self.character = character;
        Ok(())
    }

    /// Advance both clocks by `delta_ms`
    ///
    /// While auto-battle is on, each full battle interval resolves exactly one
    /// round. After a win with looping on, the requeue delay concludes the
    /// encounter and starts the next on the same map. Time left over when an
    /// encounter ends is not carried into the requeue clock.
    pub fn tick(&mut self, delta_ms: u64, tables: &ContentTables, rng: &mut impl Rng) -> Vec<SessionEvent> {
        let ticks = &tables.constants.ticks;
        let mut events = Vec::new();

        if self.in_battle() {
            if !self.auto_battle {
                return events;
            }
            self.battle_elapsed_ms += delta_ms;
            while self.battle_elapsed_ms >= ticks.battle_interval_ms && self.in_battle() {
                self.battle_elapsed_ms -= ticks.battle_interval_ms;
                match self.attack(tables, rng) {
                    Ok(event) => events.push(event),
                    Err(err) => {
                        warn!(%err, "scheduled round refused");
                        break;
                    }
                }
            }
            return events;
        }

        let won = self.battle.as_ref().is_some_and(|b| b.result == BattleResult::Win);
        if !(won && self.auto_loop) {
            return events;
        }
        self.requeue_elapsed_ms += delta_ms;
        if self.requeue_elapsed_ms < ticks.requeue_delay_ms {
            return events;
        }

        match self.conclude(tables, rng) {
            Ok(event) => events.push(event),
            Err(err) => {
                self.auto_loop = false;
                events.push(SessionEvent::Rejected { reason: err.to_string() });
                return events;
            }
        }
        match self.start(self.map_id, tables, rng) {
            Ok(event) => {
                debug!(map = self.map_id, "requeued");
                events.push(event);
            }
            Err(err) => {
                self.auto_loop = false;
                events.push(SessionEvent::Rejected { reason: err.to_string() });
            }
        }
        events
    }

    fn after_round(&mut self, next: BattleState, report: RoundReport) -> SessionEvent {
        if matches!(next.result, BattleResult::Loss | BattleResult::Escaped) {
            self.auto_loop = false;
        }
        if next.is_over() {
            self.requeue_elapsed_ms = 0;
        }
        self.battle = Some(next);
        SessionEvent::RoundResolved(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::sample_character;
    use rand::rngs::mock::StepRng;

    fn session(tables: &ContentTables) -> Session {
        let mut session = Session::new(sample_character());
        session.start(0, tables, &mut StepRng::new(0, 0)).unwrap();
        session
    }

    #[test]
    fn test_one_round_per_interval() {
        let tables = ContentTables::builtin();
        let mut s = session(&tables);
        s.battle.as_mut().unwrap().enemy.hp = 10_000;
        s.battle.as_mut().unwrap().enemy.max_hp = 10_000;
        s.auto_battle = true;
        let mut rng = StepRng::new(0, 0);

        assert!(s.tick(799, &tables, &mut rng).is_empty());
        assert_eq!(s.tick(1, &tables, &mut rng).len(), 1);
        assert_eq!(s.tick(1600, &tables, &mut rng).len(), 2);
        assert_eq!(s.battle.as_ref().unwrap().round, 4);
    }

    #[test]
    fn test_paused_clock_does_nothing() {
        let tables = ContentTables::builtin();
        let mut s = session(&tables);
        assert!(s.tick(10_000, &tables, &mut StepRng::new(0, 0)).is_empty());
        assert_eq!(s.battle.as_ref().unwrap().round, 1);
    }

    #[test]
    fn test_requeue_after_win() {
        let tables = ContentTables::builtin();
        let mut s = session(&tables);
        s.battle.as_mut().unwrap().enemy.hp = 1;
        s.auto_battle = true;
        s.auto_loop = true;
        let mut rng = StepRng::new(0, 0);

        let events = s.tick(800, &tables, &mut rng);
        assert_eq!(events.len(), 1);
        assert_eq!(s.battle.as_ref().unwrap().result, BattleResult::Win);

        assert!(s.tick(1499, &tables, &mut rng).is_empty());
        let events = s.tick(1, &tables, &mut rng);
        assert!(matches!(events[0], SessionEvent::EncounterConcluded { result: BattleResult::Win, .. }));
        assert!(matches!(events[1], SessionEvent::EncounterStarted { map_id: 0, .. }));
        assert!(s.in_battle());
        assert!(s.character.exp > 0);
    }

    #[test]
    fn test_no_requeue_without_loop() {
        let tables = ContentTables::builtin();
        let mut s = session(&tables);
        s.battle.as_mut().unwrap().enemy.hp = 1;
        s.auto_battle = true;
        let mut rng = StepRng::new(0, 0);

        s.tick(800, &tables, &mut rng);
        assert!(s.tick(10_000, &tables, &mut rng).is_empty());
        assert!(!s.in_battle());
    }

    #[test]
    fn test_loss_stops_looping() {
        let tables = ContentTables::builtin();
        let mut s = session(&tables);
        {
            let battle = s.battle.as_mut().unwrap();
            battle.enemy.hp = 10_000;
            battle.enemy.atk = 10_000;
        }
        s.auto_battle = true;
        s.auto_loop = true;
        let mut rng = StepRng::new(0, 0);

        s.tick(800, &tables, &mut rng);
        assert_eq!(s.battle.as_ref().unwrap().result, BattleResult::Loss);
        assert!(!s.auto_loop);

        let event = s.conclude(&tables, &mut rng).unwrap();
        assert!(matches!(event, SessionEvent::EncounterConcluded { result: BattleResult::Loss, .. }));
        assert_eq!(s.character.injury, 100);
        assert!(s.battle.is_none());
    }

    #[test]
    fn test_start_refused_mid_battle() {
        let tables = ContentTables::builtin();
        let mut s = session(&tables);
        assert_eq!(
            s.start(1, &tables, &mut StepRng::new(0, 0)).unwrap_err(),
            ActionError::EncounterOngoing
        );
    }
}
