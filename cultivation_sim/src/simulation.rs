//! Headless run driver
//!
//! Plays a character through the session clocks, doing between encounters
//! what a player would do: spend free points, rest, pay off injury and
//! corruption, and attempt breakthroughs when cultivation is complete.

use cultivation_core::character::allocate_point;
use cultivation_core::progression::{
    attempt_breakthrough, can_breakthrough, heal_injury, meditate, retreat,
};
use cultivation_core::{
    ActionError, Attribute, BattleResult, CharacterState, ContentTables, Session,
    SessionEvent,
};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

/// How a run is driven
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub ticks: u64,
    pub tick_ms: u64,
    pub map_id: u32,
    pub auto_loop: bool,
}

/// Summary printed at the end of a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub name: String,
    pub ticks: u64,
    pub encounters: u32,
    pub wins: u32,
    pub losses: u32,
    pub escapes: u32,
    pub rounds: u32,
    pub breakthroughs_attempted: u32,
    pub breakthroughs_succeeded: u32,
    pub realm: u32,
    pub realm_name: String,
    pub level: u32,
    pub exp: u64,
    pub stones: u64,
    pub corruption: u32,
    pub injury: u32,
    pub qi_deviation: bool,
    pub inventory: usize,
}

impl RunReport {
    fn record(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::EncounterStarted { .. } => self.encounters += 1,
            SessionEvent::RoundResolved(_) => self.rounds += 1,
            SessionEvent::EncounterConcluded { result, .. } => match result {
                BattleResult::Win => self.wins += 1,
                BattleResult::Loss => self.losses += 1,
                BattleResult::Escaped => self.escapes += 1,
                BattleResult::Ongoing => {}
            },
            SessionEvent::Rejected { .. } => {}
        }
    }
}

/// Play `config.ticks` ticks and report where the character ended up
pub fn run(
    character: CharacterState,
    tables: &ContentTables,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Result<RunReport, ActionError> {
    let mut report = RunReport {
        name: character.name.clone(),
        ticks: config.ticks,
        ..RunReport::default()
    };
    let mut session = Session::new(character);
    session.auto_battle = true;

    for tick in 0..config.ticks {
        if !session.in_battle() {
            let won = session
                .battle
                .as_ref()
                .is_some_and(|b| b.result == BattleResult::Win);
            if !(won && session.auto_loop) {
                if session.battle.is_some() {
                    let event = session.conclude(tables, rng)?;
                    report.record(&event);
                }
                tend(&mut session, tables, &mut report, rng)?;
                match session.start(config.map_id, tables, rng) {
                    Ok(event) => report.record(&event),
                    Err(ActionError::Exhausted) => {
                        session.character = meditate(&session.character, tables);
                        continue;
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        session.auto_loop = config.auto_loop && !needs_tending(&session.character, tables);
        drink_if_low(&mut session, tables);
        for event in session.tick(config.tick_ms, tables, rng) {
            report.record(&event);
        }
        if tick % 1000 == 0 {
            debug!(tick, realm = session.character.realm, level = session.character.level, "progress");
        }
    }

    let c = &session.character;
    report.realm = c.realm;
    report.realm_name = tables.constants.realms.name(c.realm).to_string();
    report.level = c.level;
    report.exp = c.exp;
    report.stones = c.stones;
    report.corruption = c.corruption;
    report.injury = c.injury;
    report.qi_deviation = c.qi_deviation;
    report.inventory = c.inventory.len();
    Ok(report)
}

fn needs_tending(state: &CharacterState, tables: &ContentTables) -> bool {
    state.free_points > 0
        || state.is_injured()
        || state.qi_deviation
        || can_breakthrough(state, tables).is_ok()
}

/// Between-encounter upkeep
fn tend(
    session: &mut Session,
    tables: &ContentTables,
    report: &mut RunReport,
    rng: &mut impl Rng,
) -> Result<(), ActionError> {
    let recovery = &tables.constants.recovery;

    while session.character.free_points > 0 {
        let weakest = Attribute::all()
            .iter()
            .copied()
            .min_by_key(|a| session.character.attributes.get(*a))
            .unwrap_or(Attribute::Gold);
        session.character = allocate_point(&session.character, weakest)?;
    }

    if session.character.is_injured() && session.character.stones >= recovery.heal_cost {
        session.character = heal_injury(&session.character, tables)?;
    }
    if session.character.qi_deviation && session.character.stones >= recovery.retreat_cost {
        session.character = retreat(&session.character, tables, rng)?.0;
    }
    session.character = meditate(&session.character, tables);

    if can_breakthrough(&session.character, tables).is_ok() {
        let (next, attempt) = attempt_breakthrough(&session.character, tables, rng)?;
        report.breakthroughs_attempted += 1;
        if attempt.succeeded() {
            report.breakthroughs_succeeded += 1;
        }
        info!(rate = attempt.rate, success = attempt.succeeded(), "breakthrough attempted");
        session.character = next;
    }
    Ok(())
}

/// Drink a healing pill mid-battle under a third of max HP
fn drink_if_low(session: &mut Session, tables: &ContentTables) {
    let low = session
        .battle
        .as_ref()
        .is_some_and(|b| !b.is_over() && b.player.hp * 3 < b.player.max_hp);
    if low && session.character.find_item("hp_s").is_some() {
        if let Err(err) = session.use_item("hp_s", tables) {
            debug!(%err, "pill refused");
        }
    }
}
