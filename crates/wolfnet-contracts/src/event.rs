//! Structured events emitted to the game record sink.
//!
//! One event per observable fact. Each carries its round, phase, and a
//! timestamp; the payload names the actors and the outcome. The stream is
//! enough to rebuild the exported game record and the trust network.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    action::{Death, NightAction, NightOutcome, TallyEntry, TrustEntry, Vote, VoteOutcome},
    agent::{AgentId, AgentProfile},
    decision::DecisionKind,
    game::{GameEnd, GameSettings, Phase, Statement},
};

/// A single record-stream entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub round: u32,
    pub phase: Phase,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}

impl GameEvent {
    /// Stamp `kind` with the current wall-clock time.
    pub fn now(round: u32, phase: Phase, kind: EventKind) -> Self {
        Self {
            round,
            phase,
            timestamp: Utc::now(),
            kind,
        }
    }

    /// The agents this event is about, for filtering and indexing.
    pub fn actors(&self) -> Vec<AgentId> {
        match &self.kind {
            EventKind::GameStarted { roster, .. } => roster.iter().map(|p| p.id).collect(),
            EventKind::NightActionSubmitted { action } => vec![action.actor, action.target],
            EventKind::NightOutcome { outcome } => {
                let mut ids: Vec<AgentId> = outcome.deaths.iter().map(|d| d.agent).collect();
                ids.extend(outcome.suppressed.iter().copied());
                ids
            }
            EventKind::DiscussionTurn { statement } => vec![statement.speaker],
            EventKind::TrustBatch { observer, .. } => vec![*observer],
            EventKind::VoteCast { vote, .. } => {
                let mut ids = vec![vote.voter];
                ids.extend(vote.target);
                ids
            }
            EventKind::RunoffStarted { candidates, .. } => candidates.clone(),
            EventKind::VoteResolved { outcome } => outcome.eliminated.into_iter().collect(),
            EventKind::Elimination { death } => vec![death.agent],
            EventKind::DecisionRejected { agent, .. } => vec![*agent],
            EventKind::GameEnded { .. } | EventKind::GameAborted { .. } => Vec::new(),
        }
    }
}

/// The payload of a `GameEvent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// The roster, with roles, as the game began.
    GameStarted {
        roster: Vec<AgentProfile>,
        settings: GameSettings,
    },
    /// A night action passed validation.
    NightActionSubmitted { action: NightAction },
    /// The night was resolved.
    NightOutcome { outcome: NightOutcome },
    /// One speaker's turn, in speaking order.
    DiscussionTurn { statement: Statement },
    /// The accepted part of one observer's trust batch.
    TrustBatch {
        observer: AgentId,
        entries: Vec<TrustEntry>,
    },
    /// A ballot as counted (invalid targets already turned into abstentions).
    VoteCast { vote: Vote, runoff: bool },
    /// The first ballot tied; these candidates go to a run-off.
    RunoffStarted {
        candidates: Vec<AgentId>,
        tally: Vec<TallyEntry>,
    },
    /// The day's vote was settled.
    VoteResolved { outcome: VoteOutcome },
    /// Someone left the game outside night resolution: voted out or shot.
    Elimination { death: Death },
    /// A decision was discarded and replaced with its fallback.
    DecisionRejected {
        agent: AgentId,
        decision: DecisionKind,
        reason: String,
    },
    /// Terminal event; nothing follows it.
    GameEnded { end: GameEnd },
    /// A fatal error stopped the game. Terminal; written only if the sink
    /// still accepts writes.
    GameAborted { reason: String },
}
