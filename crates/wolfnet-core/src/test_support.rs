//! Mocks shared by the engine tests.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use serde_json::json;

use wolfnet_contracts::{
    agent::AgentId,
    decision::{
        Decision, DecisionContext, DecisionKind, DiscussionTurn, NightChoice, NightPlan, RawDecision, ShotChoice,
        TrustBatch, TrustScore, VoteChoice,
    },
    error::{WolfnetError, WolfnetResult},
    event::GameEvent,
    role::NightActionKind,
};

use crate::traits::{AgentAdapter, RecordSink};

// ── Scripted adapter ─────────────────────────────────────────────────────────

/// Answers every question from a fixed script.
#[derive(Default)]
pub struct Scripted {
    night: Vec<NightChoice>,
    speech: Option<String>,
    trust: Vec<TrustScore>,
    trust_all: Option<f64>,
    vote: Option<AgentId>,
    runoff_vote: Option<Option<AgentId>>,
    shot: Option<AgentId>,
    stall: Option<Duration>,
    garble: Option<DecisionKind>,
    calls: Mutex<HashMap<DecisionKind, u32>>,
}

impl Scripted {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn night(mut self, kind: NightActionKind, target: Option<u32>) -> Self {
        self.night.push(NightChoice {
            kind,
            target: target.map(AgentId),
        });
        self
    }

    pub fn speak(mut self, text: &str) -> Self {
        self.speech = Some(text.to_string());
        self
    }

    pub fn trust(mut self, target: u32, score: f64) -> Self {
        self.trust.push(TrustScore {
            target: AgentId(target),
            score,
        });
        self
    }

    /// Score every other living agent with `score`.
    pub fn trust_all(mut self, score: f64) -> Self {
        self.trust_all = Some(score);
        self
    }

    pub fn vote(mut self, target: u32) -> Self {
        self.vote = Some(AgentId(target));
        self
    }

    pub fn runoff_vote(mut self, target: Option<u32>) -> Self {
        self.runoff_vote = Some(target.map(AgentId));
        self
    }

    pub fn shoot(mut self, target: u32) -> Self {
        self.shot = Some(AgentId(target));
        self
    }

    /// Sleep this long before every answer.
    pub fn stall(mut self, delay: Duration) -> Self {
        self.stall = Some(delay);
        self
    }

    /// Answer `kind` with a payload that does not parse.
    pub fn garble(mut self, kind: DecisionKind) -> Self {
        self.garble = Some(kind);
        self
    }

    pub fn calls(&self, kind: DecisionKind) -> u32 {
        self.calls.lock().unwrap().get(&kind).copied().unwrap_or(0)
    }

    async fn respond(&self, decision: Decision) -> WolfnetResult<RawDecision> {
        let kind = decision.kind();
        *self.calls.lock().unwrap().entry(kind).or_insert(0) += 1;
        if let Some(delay) = self.stall {
            tokio::time::sleep(delay).await;
        }
        if self.garble == Some(kind) {
            return Ok(RawDecision::new(kind.as_str(), json!("garbled")));
        }
        Ok(decision.into_raw())
    }
}

#[async_trait]
impl AgentAdapter for Scripted {
    async fn produce_night_action(&self, _ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        self.respond(Decision::NightAction(NightPlan {
            actions: self.night.clone(),
        }))
        .await
    }

    async fn produce_discussion_turn(&self, _ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        self.respond(Decision::Discussion(DiscussionTurn {
            text: self.speech.clone(),
        }))
        .await
    }

    async fn produce_trust_scores(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        let mut scores = self.trust.clone();
        if let Some(score) = self.trust_all {
            scores.extend(ctx.living_others().map(|target| TrustScore { target, score }));
        }
        self.respond(Decision::TrustScores(TrustBatch { scores })).await
    }

    async fn produce_vote(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        let target = match (&ctx.candidates, self.runoff_vote) {
            (Some(_), Some(runoff)) => runoff,
            _ => self.vote,
        };
        self.respond(Decision::Vote(VoteChoice {
            target,
            rationale: String::new(),
        }))
        .await
    }

    async fn produce_revenge_shot(&self, _ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        self.respond(Decision::RevengeShot(ShotChoice { target: self.shot })).await
    }
}

// ── Recording sink ───────────────────────────────────────────────────────────

/// Keeps every event in memory; clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<GameEvent>>>,
    closed: Arc<Mutex<u32>>,
    fail_after: Option<usize>,
    /// Refuse only the write at this position, once.
    fail_once_at: Option<usize>,
    refused: Arc<Mutex<bool>>,
}

impl MemorySink {
    /// A sink whose write number `n + 1` fails.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    /// A sink that refuses write number `n + 1` and accepts everything after.
    pub fn failing_once_at(n: usize) -> Self {
        Self {
            fail_once_at: Some(n),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> u32 {
        *self.closed.lock().unwrap()
    }
}

impl RecordSink for MemorySink {
    fn emit(&self, event: &GameEvent) -> WolfnetResult<()> {
        let mut events = self.events.lock().unwrap();
        if self.fail_after.is_some_and(|n| events.len() >= n) {
            return Err(WolfnetError::RecordWriteFailed {
                reason: "disk full".into(),
            });
        }
        if self.fail_once_at == Some(events.len()) {
            let mut refused = self.refused.lock().unwrap();
            if !*refused {
                *refused = true;
                return Err(WolfnetError::RecordWriteFailed {
                    reason: "disk full".into(),
                });
            }
        }
        events.push(event.clone());
        Ok(())
    }

    fn close(&self, _game_id: &str) -> WolfnetResult<()> {
        *self.closed.lock().unwrap() += 1;
        Ok(())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub mod fixture {
    use wolfnet_contracts::{
        agent::{AgentProfile, GameId},
        game::GameSettings,
        role::Role,
    };

    use super::*;
    use crate::state::GameState;

    /// Agents get ids 1..=n in the order given.
    pub fn roster(roles: &[Role]) -> Vec<AgentProfile> {
        roles
            .iter()
            .enumerate()
            .map(|(i, role)| AgentProfile {
                id: AgentId(i as u32 + 1),
                name: format!("agent-{}", i + 1),
                role: *role,
                personality: String::new(),
                backend: String::new(),
            })
            .collect()
    }

    pub fn state(roles: &[Role]) -> GameState {
        let roster = roster(roles);
        let settings = GameSettings::for_players(roster.len());
        GameState::new(GameId::new(), roster, settings)
    }

    pub fn adapters(scripts: Vec<(u32, Scripted)>) -> BTreeMap<AgentId, Arc<dyn AgentAdapter>> {
        scripts
            .into_iter()
            .map(|(id, s)| (AgentId(id), Arc::new(s) as Arc<dyn AgentAdapter>))
            .collect()
    }

    pub fn adapters_from(scripts: Vec<(u32, Arc<Scripted>)>) -> BTreeMap<AgentId, Arc<dyn AgentAdapter>> {
        scripts
            .into_iter()
            .map(|(id, s)| (AgentId(id), s as Arc<dyn AgentAdapter>))
            .collect()
    }
}
