//! Game-level types: phases, settings, and per-round results.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    action::{Death, NightOutcome, VoteOutcome},
    agent::{AgentId, AgentProfile, GameId},
    decision::DecisionKind,
    error::WolfnetError,
    role::Faction,
};

/// The state machine's phases.
///
/// `Setup → Night → DayDiscussion → DayVote → (Night | Ended)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Night,
    DayDiscussion,
    DayVote,
    Ended,
}

impl Phase {
    /// True if the state machine may move from `self` to `next`.
    pub fn can_transition_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Setup, Phase::Night)
                | (Phase::Night, Phase::DayDiscussion)
                | (Phase::DayDiscussion, Phase::DayVote)
                | (Phase::DayVote, Phase::Night)
                | (Phase::Setup | Phase::Night | Phase::DayDiscussion | Phase::DayVote, Phase::Ended)
        )
    }
}

/// How a phase's adapter calls are executed.
///
/// Both modes must produce identical resolved outcomes; the choice only
/// affects wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionMode {
    #[default]
    Parallel,
    Sequential,
}

/// Per-call adapter budgets, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLimits {
    pub night_ms: u64,
    pub discussion_ms: u64,
    pub trust_ms: u64,
    pub vote_ms: u64,
    /// Budget for on-death abilities such as the hunter's shot.
    pub ability_ms: u64,
}

impl TimeLimits {
    /// Thirty seconds per call, for every phase.
    pub const DEFAULT_MS: u64 = 30_000;

    /// The budget that applies to one kind of decision.
    pub fn budget_for(&self, kind: DecisionKind) -> Duration {
        let ms = match kind {
            DecisionKind::NightAction => self.night_ms,
            DecisionKind::Discussion => self.discussion_ms,
            DecisionKind::TrustScores => self.trust_ms,
            DecisionKind::Vote => self.vote_ms,
            DecisionKind::RevengeShot => self.ability_ms,
        };
        Duration::from_millis(ms)
    }

    /// Same budget for every kind of decision.
    pub fn uniform(ms: u64) -> Self {
        Self {
            night_ms: ms,
            discussion_ms: ms,
            trust_ms: ms,
            vote_ms: ms,
            ability_ms: ms,
        }
    }
}

impl Default for TimeLimits {
    fn default() -> Self {
        Self::uniform(Self::DEFAULT_MS)
    }
}

/// Game settings consumed from the configuration layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub total_players: usize,
    /// Hard cap on completed rounds. Reaching it ends the game without a winner.
    pub max_rounds: u32,
    /// Rotates the first speaker of each discussion.
    pub discussion_start_offset: usize,
    pub collection: CollectionMode,
    pub time_limits: TimeLimits,
}

impl GameSettings {
    /// Defaults for a table of `total_players`: one round per player,
    /// parallel collection, thirty-second budgets.
    pub fn for_players(total_players: usize) -> Self {
        Self {
            total_players,
            max_rounds: u32::try_from(total_players).unwrap_or(u32::MAX),
            discussion_start_offset: 0,
            collection: CollectionMode::Parallel,
            time_limits: TimeLimits::default(),
        }
    }
}

/// Everything needed to start a game, minus the adapter bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetup {
    /// Chosen by the caller so the record sink can be keyed before the game
    /// starts. A fresh id when omitted.
    #[serde(default)]
    pub game_id: GameId,
    pub roster: Vec<AgentProfile>,
    pub settings: GameSettings,
}

/// Why a game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// A faction met its win condition.
    Victory,
    /// `max_rounds` elapsed with no winner.
    RoundLimit,
}

/// The terminal result of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEnd {
    pub winner: Option<Faction>,
    pub reason: EndReason,
    /// The round during which the game ended.
    pub final_round: u32,
}

/// One speaker's slot in a day's discussion. `text = None` is a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub round: u32,
    pub speaker: AgentId,
    /// Zero-based position in the speaking order.
    pub order: u32,
    pub text: Option<String>,
}

/// What `run_round` reports back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub round: u32,
    pub night: NightOutcome,
    /// Empty if the game ended during the night.
    pub statements: Vec<Statement>,
    /// `None` if the game ended before the vote.
    pub vote: Option<VoteOutcome>,
    /// Every death this round, in the order it was applied.
    pub deaths: Vec<Death>,
    /// Per-decision failures that were recovered with a default.
    pub rejections: Vec<WolfnetError>,
    pub ended: Option<GameEnd>,
}
