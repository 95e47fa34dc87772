//! Resolved game facts: night actions, deaths, votes, and trust entries.
//!
//! Everything here is a record of something that was accepted by a phase
//! engine. Raw, unvalidated adapter output lives in `decision`.

use serde::{Deserialize, Serialize};

use crate::{
    agent::AgentId,
    role::{Faction, NightActionKind},
};

/// One accepted night action.
///
/// An agent contributes at most one action per ability per round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightAction {
    pub round: u32,
    pub actor: AgentId,
    pub kind: NightActionKind,
    pub target: AgentId,
}

/// Why an agent died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    WerewolfKill,
    Poison,
    VoteElimination,
    HunterShot,
}

/// A single death, attributed to the round it happened in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Death {
    pub round: u32,
    pub agent: AgentId,
    pub cause: DeathCause,
}

/// The resolved result of one night.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightOutcome {
    pub round: u32,
    /// Deaths in ascending agent order.
    pub deaths: Vec<Death>,
    /// Agents whose werewolf kill was cancelled by a heal.
    pub suppressed: Vec<AgentId>,
}

/// Private result of a seer investigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investigation {
    pub round: u32,
    pub target: AgentId,
    pub faction: Faction,
}

/// One ballot. `target = None` is an abstention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub round: u32,
    pub voter: AgentId,
    pub target: Option<AgentId>,
    /// Opaque free text; logged, never interpreted.
    #[serde(default)]
    pub rationale: String,
}

/// Vote count for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyEntry {
    pub target: AgentId,
    pub votes: u32,
}

/// How a voting sub-round was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteResolution {
    /// A single target received the most votes (first round or run-off).
    Eliminated,
    /// Nobody cast a valid vote.
    NoVotes,
    /// The run-off tied again; nobody leaves.
    DeadlockedRunoff,
}

/// The full result of a day's voting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub round: u32,
    /// First-ballot tally, highest count first, then ascending id.
    pub tally: Vec<TallyEntry>,
    /// Run-off tally, present only when the first ballot tied.
    pub runoff: Option<Vec<TallyEntry>>,
    pub eliminated: Option<AgentId>,
    pub resolution: VoteResolution,
}

/// One agent's assessment of another for a given round.
///
/// Scores live in the closed range `[0, 10]`; the ledger rejects anything
/// else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustEntry {
    pub round: u32,
    pub observer: AgentId,
    pub observed: AgentId,
    pub score: f64,
}

impl TrustEntry {
    /// Lowest legal score.
    pub const MIN_SCORE: f64 = 0.0;
    /// Highest legal score.
    pub const MAX_SCORE: f64 = 10.0;

    /// True if `score` is finite and inside `[MIN_SCORE, MAX_SCORE]`.
    pub fn score_in_range(score: f64) -> bool {
        score.is_finite() && (Self::MIN_SCORE..=Self::MAX_SCORE).contains(&score)
    }
}
