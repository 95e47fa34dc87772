//! Error taxonomy for the wolfnet game engine.
//!
//! Two families live here. Per-decision failures (an illegal action, a bad
//! target, an adapter that timed out) are recovered locally by the phase
//! engines with a default-safe substitution. Structural failures
//! (`InvariantViolation`, `RecordWriteFailed`, `ConfigError`) abort the game.

use thiserror::Error;

use crate::agent::AgentId;

/// The unified error type for the wolfnet crates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WolfnetError {
    /// The action kind is not available to this agent's role, its uses are
    /// exhausted, or it was already submitted this round.
    #[error("illegal action '{action}' by {agent}: {reason}")]
    IllegalAction {
        agent: AgentId,
        action: String,
        reason: String,
    },

    /// A night action named a missing, dead, or otherwise forbidden target.
    #[error("invalid night target for {agent}: {reason}")]
    InvalidNightTarget { agent: AgentId, reason: String },

    /// A vote named a target that is not living, does not exist, or is not
    /// on the run-off ballot.
    #[error("invalid vote target {target} from {voter}")]
    InvalidVoteTarget { voter: AgentId, target: AgentId },

    /// A trust score named an agent the observer may not rate this round.
    #[error("invalid trust target {observed} from {observer}")]
    InvalidTrustTarget { observer: AgentId, observed: AgentId },

    /// A hunter's revenge shot named an ineligible target.
    #[error("invalid revenge shot target {target} from {shooter}")]
    InvalidShotTarget { shooter: AgentId, target: AgentId },

    /// A ballot was submitted by an agent that is dead or not in the game.
    #[error("{voter} is not eligible to vote")]
    IneligibleVoter { voter: AgentId },

    /// The adapter did not answer within its budget.
    #[error("adapter for {agent} timed out after {budget_ms} ms during {operation}")]
    AdapterTimeout {
        agent: AgentId,
        operation: String,
        budget_ms: u64,
    },

    /// The adapter answered with something that is not a legal decision.
    #[error("malformed response from {agent}: {reason}")]
    AdapterMalformedResponse { agent: AgentId, reason: String },

    /// The observer already rated this agent in this round.
    #[error("duplicate trust entry: {observer} already rated {observed} in round {round}")]
    DuplicateTrustEntry {
        round: u32,
        observer: AgentId,
        observed: AgentId,
    },

    /// The trust score is outside `[0, 10]` or not a finite number.
    #[error("trust score {score} from {observer} for {observed} in round {round} is out of range")]
    ScoreOutOfRange {
        round: u32,
        observer: AgentId,
        observed: AgentId,
        score: f64,
    },

    /// The engine reached a state the rules forbid. Always a core bug.
    #[error("invariant violation: {reason}")]
    InvariantViolation { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The record sink could not append an event.
    ///
    /// Fatal: a game that cannot be recorded cannot proceed.
    #[error("record write failed: {reason}")]
    RecordWriteFailed { reason: String },
}

impl WolfnetError {
    /// True for errors that must terminate the game run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WolfnetError::InvariantViolation { .. }
                | WolfnetError::ConfigError { .. }
                | WolfnetError::RecordWriteFailed { .. }
        )
    }

    /// Shorthand for building an `InvariantViolation`.
    pub fn invariant(reason: impl Into<String>) -> Self {
        WolfnetError::InvariantViolation {
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the wolfnet crates.
pub type WolfnetResult<T> = Result<T, WolfnetError>;
