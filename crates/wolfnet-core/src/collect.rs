//! Batch-collect-then-resolve plumbing shared by every phase engine.
//!
//! A phase asks its question of every eligible agent at once:
//!
//!   build all contexts → fan out → per-call timeout → fan in → parse
//!
//! Contexts are built before the first adapter call, so no agent can observe
//! another agent's same-phase answer. Results are keyed by agent id in a
//! `BTreeMap`; arrival order never reaches the resolution logic. An adapter
//! that overruns its budget is abandoned (its future is dropped) and its
//! agent gets the fallback decision for that kind.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use tokio::task::JoinSet;
use tracing::{debug, warn};

use wolfnet_contracts::{
    agent::AgentId,
    decision::{Decision, DecisionContext, DecisionKind, RawDecision},
    error::{WolfnetError, WolfnetResult},
    event::{EventKind, GameEvent},
    game::{CollectionMode, Statement},
};

use crate::{
    ledger::TrustLedger,
    state::GameState,
    traits::{AgentAdapter, DecisionParser, RecordSink},
};

/// The collaborators a phase engine talks to, borrowed from the game handle
/// for the duration of one phase.
pub(crate) struct Table<'a> {
    pub adapters: &'a BTreeMap<AgentId, Arc<dyn AgentAdapter>>,
    pub parser: &'a dyn DecisionParser,
    pub sink: &'a dyn RecordSink,
}

/// What came back from one fan-out.
#[derive(Debug, Default)]
pub(crate) struct Collected {
    /// Every asked agent has an entry; failed agents hold the fallback.
    pub decisions: BTreeMap<AgentId, Decision>,
    /// Why each failed agent fell back, keyed by agent.
    pub failures: BTreeMap<AgentId, WolfnetError>,
}

/// Optional extras that go into every context of one fan-out.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Prompt<'a> {
    pub discussion: &'a [Statement],
    pub candidates: Option<&'a [AgentId]>,
}

impl<'a> Table<'a> {
    /// Ask `agents` for a `kind` decision and return the parsed answers.
    ///
    /// Never fails because of an adapter: timeouts, adapter errors, panics,
    /// and malformed payloads all become fallbacks listed in `failures`.
    /// Fails only on a structural problem (unknown agent, missing binding).
    pub async fn gather(
        &self,
        state: &GameState,
        ledger: &TrustLedger,
        kind: DecisionKind,
        agents: &[AgentId],
        prompt: Prompt<'_>,
    ) -> WolfnetResult<Collected> {
        let settings = state.settings();
        let budget = settings.time_limits.budget_for(kind);

        // Every context is built before any adapter runs.
        let mut requests = Vec::with_capacity(agents.len());
        for &agent in agents {
            let adapter = self
                .adapters
                .get(&agent)
                .cloned()
                .ok_or_else(|| WolfnetError::invariant(format!("no adapter bound to {agent}")))?;
            let ctx = state.context_for(agent, kind, ledger, prompt.discussion, prompt.candidates)?;
            requests.push((agent, adapter, ctx));
        }

        debug!(
            round = state.round(),
            decision = %kind,
            agents = requests.len(),
            mode = ?settings.collection,
            "collecting decisions"
        );

        let raw = match settings.collection {
            CollectionMode::Parallel => fan_out_parallel(kind, budget, requests).await,
            CollectionMode::Sequential => fan_out_sequential(kind, budget, requests).await,
        };

        let mut collected = Collected::default();
        for &agent in agents {
            let parsed = match raw.get(&agent) {
                Some(Ok(raw)) => self.parser.parse(agent, kind, raw),
                Some(Err(e)) => Err(e.clone()),
                None => Err(WolfnetError::AdapterMalformedResponse {
                    agent,
                    reason: format!("adapter task for '{kind}' ended without an answer"),
                }),
            };
            match parsed {
                Ok(decision) if decision.kind() == kind => {
                    collected.decisions.insert(agent, decision);
                }
                Ok(other) => {
                    collected.failures.insert(
                        agent,
                        WolfnetError::AdapterMalformedResponse {
                            agent,
                            reason: format!("parser returned '{}' for a '{}' request", other.kind(), kind),
                        },
                    );
                    collected.decisions.insert(agent, Decision::fallback(kind));
                }
                Err(e) => {
                    warn!(
                        round = state.round(),
                        agent = %agent,
                        decision = %kind,
                        error = %e,
                        "decision failed, applying fallback"
                    );
                    collected.failures.insert(agent, e);
                    collected.decisions.insert(agent, Decision::fallback(kind));
                }
            }
        }

        Ok(collected)
    }

    /// Append one event stamped with the current round and phase.
    pub fn emit(&self, state: &GameState, kind: EventKind) -> WolfnetResult<()> {
        self.sink.emit(&GameEvent::now(state.round(), state.phase(), kind))
    }

    /// Record a recovered per-decision failure: warn, emit, and keep it for
    /// the round result.
    pub fn reject(
        &self,
        state: &GameState,
        agent: AgentId,
        decision: DecisionKind,
        error: WolfnetError,
        rejections: &mut Vec<WolfnetError>,
    ) -> WolfnetResult<()> {
        warn!(
            round = state.round(),
            agent = %agent,
            decision = %decision,
            error = %error,
            "decision rejected"
        );
        self.emit(
            state,
            EventKind::DecisionRejected {
                agent,
                decision,
                reason: error.to_string(),
            },
        )?;
        rejections.push(error);
        Ok(())
    }

    /// Emit a rejection event for every collected failure, in agent order.
    pub fn reject_failures(
        &self,
        state: &GameState,
        kind: DecisionKind,
        collected: &mut Collected,
        rejections: &mut Vec<WolfnetError>,
    ) -> WolfnetResult<()> {
        for (agent, error) in std::mem::take(&mut collected.failures) {
            self.reject(state, agent, kind, error, rejections)?;
        }
        Ok(())
    }
}

type Answers = BTreeMap<AgentId, WolfnetResult<RawDecision>>;

async fn fan_out_parallel(
    kind: DecisionKind,
    budget: Duration,
    requests: Vec<(AgentId, Arc<dyn AgentAdapter>, DecisionContext)>,
) -> Answers {
    let mut tasks = JoinSet::new();
    for (agent, adapter, ctx) in requests {
        tasks.spawn(async move {
            let answer = ask_within(agent, adapter.as_ref(), kind, &ctx, budget).await;
            (agent, answer)
        });
    }

    let mut answers = Answers::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((agent, answer)) => {
                answers.insert(agent, answer);
            }
            // The agent id is lost with the task; the caller notices the gap.
            Err(e) => warn!(decision = %kind, error = %e, "adapter task aborted"),
        }
    }
    answers
}

async fn fan_out_sequential(
    kind: DecisionKind,
    budget: Duration,
    requests: Vec<(AgentId, Arc<dyn AgentAdapter>, DecisionContext)>,
) -> Answers {
    let mut answers = Answers::new();
    for (agent, adapter, ctx) in requests {
        let answer = ask_within(agent, adapter.as_ref(), kind, &ctx, budget).await;
        answers.insert(agent, answer);
    }
    answers
}

async fn ask_within(
    agent: AgentId,
    adapter: &dyn AgentAdapter,
    kind: DecisionKind,
    ctx: &DecisionContext,
    budget: Duration,
) -> WolfnetResult<RawDecision> {
    match tokio::time::timeout(budget, ask(adapter, kind, ctx)).await {
        Ok(answer) => answer,
        Err(_) => Err(WolfnetError::AdapterTimeout {
            agent,
            operation: kind.as_str().to_string(),
            budget_ms: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

async fn ask(adapter: &dyn AgentAdapter, kind: DecisionKind, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
    match kind {
        DecisionKind::NightAction => adapter.produce_night_action(ctx).await,
        DecisionKind::Discussion => adapter.produce_discussion_turn(ctx).await,
        DecisionKind::TrustScores => adapter.produce_trust_scores(ctx).await,
        DecisionKind::Vote => adapter.produce_vote(ctx).await,
        DecisionKind::RevengeShot => adapter.produce_revenge_shot(ctx).await,
    }
}
