//! An adapter that replays canned decisions.
//!
//! Decisions are queued per (round, kind). Each question pops the front of
//! its queue, so a second `Vote` entry for the same round answers the
//! run-off ballot. An empty queue answers with a pass.

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;
use tracing::debug;

use wolfnet_contracts::{
    agent::AgentId,
    decision::{
        Decision, DecisionContext, DecisionKind, DiscussionTurn, NightChoice, NightPlan, RawDecision, ShotChoice,
        TrustBatch, TrustScore, VoteChoice,
    },
    error::{WolfnetError, WolfnetResult},
    role::NightActionKind,
};
use wolfnet_core::traits::AgentAdapter;

#[derive(Default)]
struct Script {
    queues: HashMap<(u32, DecisionKind), VecDeque<RawDecision>>,
    asked: Vec<(u32, DecisionKind)>,
}

/// Replays a fixed script of decisions.
///
/// ```rust,ignore
/// let wolf = ScriptedAdapter::new()
///     .night(1, NightActionKind::Kill, 3)
///     .vote(1, Some(4), "too quiet");
/// ```
#[derive(Default)]
pub struct ScriptedAdapter {
    script: Mutex<Script>,
}

impl ScriptedAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an arbitrary raw answer for `kind` in `round`.
    pub fn push(mut self, round: u32, kind: DecisionKind, raw: RawDecision) -> Self {
        if let Ok(script) = self.script.get_mut() {
            script.queues.entry((round, kind)).or_default().push_back(raw);
        }
        self
    }

    fn push_decision(self, round: u32, decision: Decision) -> Self {
        let kind = decision.kind();
        self.push(round, kind, decision.into_raw())
    }

    /// Queue a single night action.
    pub fn night(self, round: u32, kind: NightActionKind, target: u32) -> Self {
        self.night_plan(
            round,
            vec![NightChoice {
                kind,
                target: Some(AgentId(target)),
            }],
        )
    }

    /// Queue several night actions submitted together.
    pub fn night_plan(self, round: u32, actions: Vec<NightChoice>) -> Self {
        self.push_decision(round, Decision::NightAction(NightPlan { actions }))
    }

    pub fn say(self, round: u32, text: impl Into<String>) -> Self {
        self.push_decision(round, Decision::Discussion(DiscussionTurn { text: Some(text.into()) }))
    }

    /// Queue a trust batch of `(target, score)` pairs.
    pub fn trust(self, round: u32, scores: &[(u32, f64)]) -> Self {
        let scores = scores
            .iter()
            .map(|&(target, score)| TrustScore {
                target: AgentId(target),
                score,
            })
            .collect();
        self.push_decision(round, Decision::TrustScores(TrustBatch { scores }))
    }

    /// Queue a ballot. Queue two in one round to answer a run-off.
    pub fn vote(self, round: u32, target: Option<u32>, rationale: impl Into<String>) -> Self {
        self.push_decision(
            round,
            Decision::Vote(VoteChoice {
                target: target.map(AgentId),
                rationale: rationale.into(),
            }),
        )
    }

    pub fn shoot(self, round: u32, target: u32) -> Self {
        self.push_decision(
            round,
            Decision::RevengeShot(ShotChoice {
                target: Some(AgentId(target)),
            }),
        )
    }

    /// Every question asked so far, in order.
    pub fn asked(&self) -> Vec<(u32, DecisionKind)> {
        self.script.lock().map(|s| s.asked.clone()).unwrap_or_default()
    }

    fn next(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| WolfnetError::AdapterMalformedResponse {
                agent: ctx.me.id,
                reason: "script lock poisoned".to_string(),
            })?;
        script.asked.push((ctx.round, ctx.kind));

        let queued = script
            .queues
            .get_mut(&(ctx.round, ctx.kind))
            .and_then(VecDeque::pop_front);
        match queued {
            Some(raw) => Ok(raw),
            None => {
                debug!(agent = %ctx.me.id, round = ctx.round, kind = %ctx.kind, "script exhausted, passing");
                Ok(RawDecision::pass(ctx.kind))
            }
        }
    }
}

#[async_trait]
impl AgentAdapter for ScriptedAdapter {
    async fn produce_night_action(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        self.next(ctx)
    }

    async fn produce_discussion_turn(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        self.next(ctx)
    }

    async fn produce_trust_scores(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        self.next(ctx)
    }

    async fn produce_vote(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        self.next(ctx)
    }

    async fn produce_revenge_shot(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        self.next(ctx)
    }
}
