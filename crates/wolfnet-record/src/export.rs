//! The exported game-record dataset.
//!
//! One JSON document per game, keyed the way the trust-network analysis
//! tooling reads it: player ids are strings, ratings are nested
//! `rater → target → score` maps per round, and every vote carries both
//! participants' roles.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wolfnet_contracts::{
    action::DeathCause,
    agent::AgentId,
    error::{WolfnetError, WolfnetResult},
    event::EventKind,
    game::EndReason,
    role::{Faction, Role},
};

use crate::event::GameLog;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRole {
    pub name: String,
    pub role_type: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter: String,
    pub voter_role: Role,
    /// `None` for an abstention.
    pub target: Option<String>,
    pub target_role: Option<Role>,
    pub reason: String,
    pub runoff: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathRecord {
    pub player: String,
    pub role_type: Role,
    pub cause: DeathCause,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    /// rater id → target id → score.
    pub ratings: BTreeMap<String, BTreeMap<String, f64>>,
    pub votes: Vec<VoteRecord>,
    pub deaths: Vec<DeathRecord>,
    /// Time of the round's first event.
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: String,
    pub player_roles: BTreeMap<String, PlayerRole>,
    pub rounds: Vec<RoundRecord>,
    pub winner: Option<Faction>,
    pub end_reason: Option<EndReason>,
    /// Why the game stopped early, if a fatal error aborted it.
    pub aborted: Option<String>,
    /// The `terminal_hash` of the chain this record was built from.
    pub terminal_hash: String,
}

fn key(id: AgentId) -> String {
    id.0.to_string()
}

impl GameRecord {
    /// Build the dataset from a recorded game.
    ///
    /// Fails with `InvariantViolation` if the log does not start with
    /// `GameStarted` or mentions an agent missing from the roster.
    pub fn from_log(log: &GameLog) -> WolfnetResult<Self> {
        let mut events = log.events();
        let roster = match events.next().map(|e| &e.kind) {
            Some(EventKind::GameStarted { roster, .. }) => roster,
            _ => {
                return Err(WolfnetError::invariant(format!(
                    "record for game {} does not start with GameStarted",
                    log.game_id
                )))
            }
        };

        let roles: BTreeMap<AgentId, Role> = roster.iter().map(|p| (p.id, p.role)).collect();
        let role_of = |id: AgentId| {
            roles
                .get(&id)
                .copied()
                .ok_or_else(|| WolfnetError::invariant(format!("record mentions unknown agent {id}")))
        };

        let mut record = GameRecord {
            game_id: log.game_id.clone(),
            player_roles: roster
                .iter()
                .map(|p| {
                    (
                        key(p.id),
                        PlayerRole {
                            name: p.name.clone(),
                            role_type: p.role,
                        },
                    )
                })
                .collect(),
            rounds: Vec::new(),
            winner: None,
            end_reason: None,
            aborted: None,
            terminal_hash: log.terminal_hash.clone(),
        };

        for event in events {
            if record.rounds.last().map_or(true, |r| r.round != event.round) {
                record.rounds.push(RoundRecord {
                    round: event.round,
                    ratings: BTreeMap::new(),
                    votes: Vec::new(),
                    deaths: Vec::new(),
                    timestamp: event.timestamp,
                });
            }
            let Some(round) = record.rounds.last_mut() else {
                continue;
            };

            match &event.kind {
                EventKind::TrustBatch { observer, entries } => {
                    let row = round.ratings.entry(key(*observer)).or_default();
                    for entry in entries {
                        row.insert(key(entry.observed), entry.score);
                    }
                }
                EventKind::VoteCast { vote, runoff } => {
                    round.votes.push(VoteRecord {
                        voter: key(vote.voter),
                        voter_role: role_of(vote.voter)?,
                        target: vote.target.map(key),
                        target_role: vote.target.map(role_of).transpose()?,
                        reason: vote.rationale.clone(),
                        runoff: *runoff,
                        timestamp: event.timestamp,
                    });
                }
                EventKind::NightOutcome { outcome } => {
                    for death in &outcome.deaths {
                        round.deaths.push(DeathRecord {
                            player: key(death.agent),
                            role_type: role_of(death.agent)?,
                            cause: death.cause,
                        });
                    }
                }
                EventKind::Elimination { death } => {
                    round.deaths.push(DeathRecord {
                        player: key(death.agent),
                        role_type: role_of(death.agent)?,
                        cause: death.cause,
                    });
                }
                EventKind::GameEnded { end } => {
                    record.winner = end.winner;
                    record.end_reason = Some(end.reason);
                }
                EventKind::GameAborted { reason } => {
                    record.aborted = Some(reason.clone());
                }
                _ => {}
            }
        }

        Ok(record)
    }

    pub fn to_json_pretty(&self) -> WolfnetResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| WolfnetError::RecordWriteFailed {
            reason: format!("game record does not serialize: {e}"),
        })
    }
}
