//! The game state machine: the top-level driver.
//!
//! ```text
//! Setup → Night → DayDiscussion → DayVote → (Night | Ended)
//! ```
//!
//! The win condition is checked after every death-causing event: the night's
//! deaths, each hunter shot, and the vote elimination. A decided game stops
//! at once; no later phase of that round runs.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use tracing::{error, info, warn};

use wolfnet_contracts::{
    action::{Death, DeathCause},
    agent::{AgentId, GameId},
    error::{WolfnetError, WolfnetResult},
    event::EventKind,
    game::{EndReason, GameEnd, GameSetup, Phase, RoundResult},
    role::Faction,
};

use crate::{
    collect::Table,
    day,
    ledger::TrustLedger,
    night,
    roles::capabilities_of,
    state::GameState,
    traits::{AgentAdapter, DecisionParser, RecordSink},
};

/// One running game and everything it talks to.
///
/// The handle owns the state, the trust ledger, the adapter bindings, the
/// validation boundary, and the record sink for exactly one game.
pub struct GameHandle {
    state: GameState,
    ledger: TrustLedger,
    adapters: BTreeMap<AgentId, Arc<dyn AgentAdapter>>,
    parser: Box<dyn DecisionParser>,
    sink: Box<dyn RecordSink>,
    /// Set once a fatal error has aborted the run.
    aborted: Option<String>,
}

impl GameHandle {
    /// Start a new game.
    ///
    /// Validates the setup and the adapter bindings, then emits `GameStarted`.
    /// Fails with `ConfigError` on a bad setup and `RecordWriteFailed` if the
    /// sink refuses the first event.
    pub fn new(
        setup: GameSetup,
        adapters: BTreeMap<AgentId, Arc<dyn AgentAdapter>>,
        sink: Box<dyn RecordSink>,
        parser: Box<dyn DecisionParser>,
    ) -> WolfnetResult<Self> {
        validate_setup(&setup, &adapters)?;

        let state = GameState::new(setup.game_id.clone(), setup.roster.clone(), setup.settings.clone());
        info!(
            game_id = %state.game_id(),
            players = setup.roster.len(),
            max_rounds = setup.settings.max_rounds,
            "game created"
        );

        let handle = Self {
            state,
            ledger: TrustLedger::new(),
            adapters,
            parser,
            sink,
            aborted: None,
        };
        handle.table().emit(
            &handle.state,
            EventKind::GameStarted {
                roster: setup.roster,
                settings: setup.settings,
            },
        )?;
        Ok(handle)
    }

    fn table(&self) -> Table<'_> {
        Table {
            adapters: &self.adapters,
            parser: self.parser.as_ref(),
            sink: self.sink.as_ref(),
        }
    }

    /// Play one full round: night, then (unless the night decided the game)
    /// discussion, trust scoring, and the vote.
    ///
    /// Per-decision failures are recovered and listed in the result. A fatal
    /// error aborts the game: it is returned here, the record gets a
    /// `GameAborted` event and is closed, and every later call fails with
    /// `InvariantViolation`. The record is closed when the game ends.
    pub async fn run_round(&mut self) -> WolfnetResult<RoundResult> {
        if let Some(reason) = &self.aborted {
            return Err(WolfnetError::invariant(format!("game was aborted: {reason}")));
        }
        if self.state.is_ended() {
            return Err(WolfnetError::invariant("run_round called on an ended game"));
        }

        let table = Table {
            adapters: &self.adapters,
            parser: self.parser.as_ref(),
            sink: self.sink.as_ref(),
        };
        let result = play_round(&table, &mut self.state, &mut self.ledger).await;

        match result {
            Ok(round) => {
                if round.ended.is_some() {
                    table.sink.close(&self.state.game_id().to_string())?;
                }
                Ok(round)
            }
            Err(e) => {
                error!(game_id = %self.state.game_id(), round = self.state.round(), error = %e, "game aborted");
                seal_aborted(&table, &self.state, &e);
                self.aborted = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Run rounds until the game ends. Bounded by `max_rounds`.
    pub async fn run_to_end(&mut self) -> WolfnetResult<Vec<RoundResult>> {
        let mut rounds = Vec::new();
        loop {
            let result = self.run_round().await?;
            let done = result.ended.is_some();
            rounds.push(result);
            if done {
                return Ok(rounds);
            }
        }
    }

    pub fn is_ended(&self) -> bool {
        self.state.is_ended()
    }

    /// The winning faction. `None` while running and after a round-limit end.
    pub fn winner(&self) -> Option<Faction> {
        self.state.winner()
    }

    pub fn end(&self) -> Option<&GameEnd> {
        self.state.end()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn ledger(&self) -> &TrustLedger {
        &self.ledger
    }

    pub fn game_id(&self) -> &GameId {
        self.state.game_id()
    }
}

fn validate_setup(setup: &GameSetup, adapters: &BTreeMap<AgentId, Arc<dyn AgentAdapter>>) -> WolfnetResult<()> {
    let config = |reason: String| WolfnetError::ConfigError { reason };
    let roster = &setup.roster;

    if roster.is_empty() {
        return Err(config("roster is empty".into()));
    }
    if setup.settings.total_players != roster.len() {
        return Err(config(format!(
            "total_players is {} but the roster has {} agents",
            setup.settings.total_players,
            roster.len()
        )));
    }
    if setup.settings.max_rounds == 0 {
        return Err(config("max_rounds must be at least 1".into()));
    }
    if setup.settings.max_rounds as usize > roster.len() {
        return Err(config(format!(
            "max_rounds {} exceeds the {}-round bound of this roster",
            setup.settings.max_rounds,
            roster.len()
        )));
    }

    let mut ids = BTreeSet::new();
    for profile in roster {
        if !ids.insert(profile.id) {
            return Err(config(format!("agent id {} appears twice", profile.id)));
        }
        if !adapters.contains_key(&profile.id) {
            return Err(config(format!("no adapter bound to {} ({})", profile.id, profile.name)));
        }
    }

    let wolves = roster.iter().filter(|p| p.role.faction() == Faction::Werewolf).count();
    if wolves == 0 {
        return Err(config("roster has no werewolf".into()));
    }
    if wolves == roster.len() {
        return Err(config("roster has no village agent".into()));
    }
    Ok(())
}

async fn play_round(
    table: &Table<'_>,
    state: &mut GameState,
    ledger: &mut TrustLedger,
) -> WolfnetResult<RoundResult> {
    let round = state.round();
    let mut rejections = Vec::new();
    let mut deaths = Vec::new();

    info!(round, living = state.living().len(), "round started");

    // ── Night ────────────────────────────────────────────────────────────────
    state.transition(Phase::Night)?;
    let night = night::run_night(table, state, ledger, &mut rejections).await?;
    deaths.extend(night.deaths.iter().cloned());

    let mut ended = conclude(table, state)?;
    for death in &night.deaths {
        if ended.is_some() {
            break;
        }
        // A poisoned hunter cannot shoot.
        if death.cause == DeathCause::WerewolfKill {
            if let Some(shot) = revenge(table, state, ledger, death.agent, &mut rejections).await? {
                deaths.push(shot);
                ended = conclude(table, state)?;
            }
        }
    }

    if let Some(end) = ended {
        return Ok(RoundResult {
            round,
            night,
            statements: Vec::new(),
            vote: None,
            deaths,
            rejections,
            ended: Some(end),
        });
    }

    // ── Day ──────────────────────────────────────────────────────────────────
    state.transition(Phase::DayDiscussion)?;
    let statements = day::run_discussion(table, state, ledger, &mut rejections).await?;
    day::run_trust(table, state, ledger, &statements, &mut rejections).await?;

    state.transition(Phase::DayVote)?;
    let vote = day::run_vote(table, state, ledger, &statements, &mut rejections).await?;

    if let Some(target) = vote.eliminated {
        let death = Death {
            round,
            agent: target,
            cause: DeathCause::VoteElimination,
        };
        state.apply_death(death.clone())?;
        table.emit(state, EventKind::Elimination { death: death.clone() })?;
        deaths.push(death);

        ended = conclude(table, state)?;
        if ended.is_none() {
            if let Some(shot) = revenge(table, state, ledger, target, &mut rejections).await? {
                deaths.push(shot);
                ended = conclude(table, state)?;
            }
        }
    }

    if ended.is_none() {
        if round >= state.settings().max_rounds {
            info!(round, "round limit reached");
            ended = Some(finish(table, state, None, EndReason::RoundLimit)?);
        } else {
            state.advance_round()?;
        }
    }

    Ok(RoundResult {
        round,
        night,
        statements,
        vote: Some(vote),
        deaths,
        rejections,
        ended,
    })
}

/// Give a dead agent with an on-death ability its shot and apply the result.
async fn revenge(
    table: &Table<'_>,
    state: &mut GameState,
    ledger: &TrustLedger,
    agent: AgentId,
    rejections: &mut Vec<WolfnetError>,
) -> WolfnetResult<Option<Death>> {
    let has_on_death = state
        .role_of(agent)
        .is_some_and(|role| capabilities_of(role).on_death.is_some());
    if !has_on_death {
        return Ok(None);
    }

    let Some(target) = day::run_revenge_shot(table, state, ledger, agent, rejections).await? else {
        return Ok(None);
    };
    let death = Death {
        round: state.round(),
        agent: target,
        cause: DeathCause::HunterShot,
    };
    state.apply_death(death.clone())?;
    table.emit(state, EventKind::Elimination { death: death.clone() })?;
    Ok(Some(death))
}

/// Run the win check; end the game if a faction has won.
fn conclude(table: &Table<'_>, state: &mut GameState) -> WolfnetResult<Option<GameEnd>> {
    match state.check_winner() {
        Some(winner) => finish(table, state, Some(winner), EndReason::Victory).map(Some),
        None => Ok(None),
    }
}

fn finish(
    table: &Table<'_>,
    state: &mut GameState,
    winner: Option<Faction>,
    reason: EndReason,
) -> WolfnetResult<GameEnd> {
    let end = state.finish(winner, reason)?;
    table.emit(state, EventKind::GameEnded { end: end.clone() })?;
    Ok(end)
}

/// Leave an aborted game's record closed, with the reason as its last event.
///
/// Best effort: the sink may be the thing that failed, so its errors are
/// logged and dropped.
fn seal_aborted(table: &Table<'_>, state: &GameState, cause: &WolfnetError) {
    let kind = EventKind::GameAborted {
        reason: cause.to_string(),
    };
    if let Err(e) = table.emit(state, kind) {
        warn!(game_id = %state.game_id(), error = %e, "abort event not recorded");
    }
    if let Err(e) = table.sink.close(&state.game_id().to_string()) {
        warn!(game_id = %state.game_id(), error = %e, "aborted record not closed");
    }
}
