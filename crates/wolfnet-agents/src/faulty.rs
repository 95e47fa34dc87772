//! Adapters that misbehave on purpose.
//!
//! A real backend can hang or answer with junk. These two reproduce both so
//! the fallback paths of the engines run in full matches.

use async_trait::async_trait;
use serde_json::json;

use wolfnet_contracts::{
    decision::{DecisionContext, RawDecision},
    error::WolfnetResult,
};
use wolfnet_core::traits::AgentAdapter;

/// Never answers. Every call runs into the phase budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnresponsiveAdapter;

impl UnresponsiveAdapter {
    async fn hang() -> WolfnetResult<RawDecision> {
        std::future::pending().await
    }
}

#[async_trait]
impl AgentAdapter for UnresponsiveAdapter {
    async fn produce_night_action(&self, _ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Self::hang().await
    }

    async fn produce_discussion_turn(&self, _ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Self::hang().await
    }

    async fn produce_trust_scores(&self, _ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Self::hang().await
    }

    async fn produce_vote(&self, _ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Self::hang().await
    }

    async fn produce_revenge_shot(&self, _ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Self::hang().await
    }
}

/// Answers promptly with the right discriminant and a payload of the wrong
/// shape for every kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct GarbledAdapter;

impl GarbledAdapter {
    fn garble(ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Ok(RawDecision::new(
            ctx.kind.as_str(),
            json!({
                "actions": "everyone",
                "text": 42,
                "scores": "all tens",
                "target": "the quiet one",
            }),
        ))
    }
}

#[async_trait]
impl AgentAdapter for GarbledAdapter {
    async fn produce_night_action(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Self::garble(ctx)
    }

    async fn produce_discussion_turn(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Self::garble(ctx)
    }

    async fn produce_trust_scores(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Self::garble(ctx)
    }

    async fn produce_vote(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Self::garble(ctx)
    }

    async fn produce_revenge_shot(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Self::garble(ctx)
    }
}
