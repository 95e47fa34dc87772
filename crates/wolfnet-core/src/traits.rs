//! Core trait definitions for the wolfnet engine.
//!
//! These three traits define the trust boundary of a game:
//!
//! - `AgentAdapter`: untrusted decision maker (usually backed by an LLM)
//! - `DecisionParser`: trusted validation boundary for raw adapter output
//! - `RecordSink`: trusted append-only event stream
//!
//! The phase engines call adapters only through the collector, which applies
//! the per-call budget and substitutes a fallback on any failure.

use std::sync::Arc;

use async_trait::async_trait;

use wolfnet_contracts::{
    agent::AgentId,
    decision::{Decision, DecisionContext, DecisionKind, RawDecision},
    error::WolfnetResult,
    event::GameEvent,
};

/// One AI participant.
///
/// Implementations are **untrusted**: they may hang, answer late, or answer
/// nonsense. Every method receives an immutable snapshot and returns a raw
/// decision; the core never blocks on a single adapter beyond its budget.
#[async_trait]
pub trait AgentAdapter: Send + Sync {
    /// Choose tonight's actions. Only called for agents with a usable night
    /// ability.
    async fn produce_night_action(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision>;

    /// Say something during the day's discussion.
    async fn produce_discussion_turn(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision>;

    /// Score every other living agent for this round.
    async fn produce_trust_scores(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision>;

    /// Cast a ballot. `ctx.candidates` is set during a run-off.
    async fn produce_vote(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision>;

    /// Fire the hunter's revenge shot. Adapters that never play a hunter can
    /// rely on the default, which holds fire.
    async fn produce_revenge_shot(&self, _ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Ok(RawDecision::pass(DecisionKind::RevengeShot))
    }
}

/// The validation boundary between raw adapter output and the engines.
///
/// Implementations are **trusted** and must be deterministic: the same raw
/// input always yields the same decision or the same error.
pub trait DecisionParser: Send + Sync {
    /// Turn `raw` into a decision of kind `expected`, or reject it with
    /// `AdapterMalformedResponse`.
    fn parse(&self, agent: AgentId, expected: DecisionKind, raw: &RawDecision) -> WolfnetResult<Decision>;
}

/// The game record: an append-only event stream.
///
/// Every observable fact produces exactly one event. A failed write is fatal:
/// the game aborts with `RecordWriteFailed`.
pub trait RecordSink: Send + Sync {
    /// Append one event. Events are never modified or deleted.
    fn emit(&self, event: &GameEvent) -> WolfnetResult<()>;

    /// Seal the record. Called exactly once, when the game ends.
    fn close(&self, game_id: &str) -> WolfnetResult<()>;
}

impl<T: RecordSink + ?Sized> RecordSink for Arc<T> {
    fn emit(&self, event: &GameEvent) -> WolfnetResult<()> {
        (**self).emit(event)
    }

    fn close(&self, game_id: &str) -> WolfnetResult<()> {
        (**self).close(game_id)
    }
}

/// Typed parsing with no structural pre-checks.
///
/// Enough for tests and trusted in-process adapters; production wiring
/// usually installs a schema-checking parser instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedDecisionParser;

impl DecisionParser for TypedDecisionParser {
    fn parse(&self, agent: AgentId, expected: DecisionKind, raw: &RawDecision) -> WolfnetResult<Decision> {
        Decision::from_raw(agent, expected, raw)
    }
}
