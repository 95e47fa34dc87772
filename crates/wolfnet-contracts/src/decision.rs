//! Adapter-facing decision types.
//!
//! Adapters see a `DecisionContext` and answer with a `RawDecision`: a kind
//! discriminant plus an arbitrary JSON payload. Nothing raw reaches the
//! engines. The validation boundary turns a `RawDecision` into the tagged
//! `Decision` variant or rejects it as `AdapterMalformedResponse`.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    action::{Investigation, TrustEntry, Vote},
    agent::{AgentId, AgentProfile, GameId, PublicAgent},
    error::{WolfnetError, WolfnetResult},
    game::{Phase, Statement},
    role::NightActionKind,
};

/// The five questions the core can put to an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    NightAction,
    Discussion,
    TrustScores,
    Vote,
    RevengeShot,
}

impl DecisionKind {
    /// The discriminant string carried in `RawDecision::kind`.
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionKind::NightAction => "night_action",
            DecisionKind::Discussion => "discussion",
            DecisionKind::TrustScores => "trust_scores",
            DecisionKind::Vote => "vote",
            DecisionKind::RevengeShot => "revenge_shot",
        }
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unvalidated adapter response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDecision {
    /// Discriminant string, expected to equal `DecisionKind::as_str()`.
    pub kind: String,
    /// Arbitrary JSON body. Only the validation boundary inspects this.
    pub payload: Value,
}

impl RawDecision {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// The no-op answer for `kind`: no night action, a silent turn, no
    /// scores, an abstention, or holding fire.
    pub fn pass(kind: DecisionKind) -> Self {
        Decision::fallback(kind).into_raw()
    }
}

// ── Typed payloads ───────────────────────────────────────────────────────────

/// One requested night action. `target` is mandatory for every kind; a
/// missing target is rejected by the night engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightChoice {
    pub kind: NightActionKind,
    #[serde(default)]
    pub target: Option<AgentId>,
}

/// An agent's full night submission. Empty means "do nothing tonight".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightPlan {
    #[serde(default)]
    pub actions: Vec<NightChoice>,
}

/// Free-form discussion text. `None` passes the turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionTurn {
    #[serde(default)]
    pub text: Option<String>,
}

/// One score inside a trust batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustScore {
    pub target: AgentId,
    pub score: f64,
}

/// An observer's scores for this round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrustBatch {
    #[serde(default)]
    pub scores: Vec<TrustScore>,
}

/// A ballot choice. `target = None` abstains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteChoice {
    #[serde(default)]
    pub target: Option<AgentId>,
    #[serde(default)]
    pub rationale: String,
}

/// The hunter's last act. `target = None` holds fire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotChoice {
    #[serde(default)]
    pub target: Option<AgentId>,
}

/// A validated decision, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    NightAction(NightPlan),
    Discussion(DiscussionTurn),
    TrustScores(TrustBatch),
    Vote(VoteChoice),
    RevengeShot(ShotChoice),
}

impl Decision {
    /// The kind this decision answers.
    pub fn kind(&self) -> DecisionKind {
        match self {
            Decision::NightAction(_) => DecisionKind::NightAction,
            Decision::Discussion(_) => DecisionKind::Discussion,
            Decision::TrustScores(_) => DecisionKind::TrustScores,
            Decision::Vote(_) => DecisionKind::Vote,
            Decision::RevengeShot(_) => DecisionKind::RevengeShot,
        }
    }

    /// The default-safe decision substituted when an adapter fails.
    pub fn fallback(kind: DecisionKind) -> Self {
        match kind {
            DecisionKind::NightAction => Decision::NightAction(NightPlan::default()),
            DecisionKind::Discussion => Decision::Discussion(DiscussionTurn::default()),
            DecisionKind::TrustScores => Decision::TrustScores(TrustBatch::default()),
            DecisionKind::Vote => Decision::Vote(VoteChoice::default()),
            DecisionKind::RevengeShot => Decision::RevengeShot(ShotChoice::default()),
        }
    }

    /// Parse `raw` as a decision of kind `expected`.
    ///
    /// Fails with `AdapterMalformedResponse` if the discriminant does not
    /// match or the payload does not fit the typed shape.
    pub fn from_raw(agent: AgentId, expected: DecisionKind, raw: &RawDecision) -> WolfnetResult<Self> {
        if raw.kind != expected.as_str() {
            return Err(WolfnetError::AdapterMalformedResponse {
                agent,
                reason: format!("expected a '{}' decision, got '{}'", expected, raw.kind),
            });
        }

        let decision = match expected {
            DecisionKind::NightAction => Decision::NightAction(payload_as(agent, expected, raw)?),
            DecisionKind::Discussion => Decision::Discussion(payload_as(agent, expected, raw)?),
            DecisionKind::TrustScores => Decision::TrustScores(payload_as(agent, expected, raw)?),
            DecisionKind::Vote => Decision::Vote(payload_as(agent, expected, raw)?),
            DecisionKind::RevengeShot => Decision::RevengeShot(payload_as(agent, expected, raw)?),
        };
        Ok(decision)
    }

    /// Serialize back into the raw wire shape.
    pub fn into_raw(self) -> RawDecision {
        let kind = self.kind();
        let payload = match self {
            Decision::NightAction(p) => serde_json::to_value(p),
            Decision::Discussion(p) => serde_json::to_value(p),
            Decision::TrustScores(p) => serde_json::to_value(p),
            Decision::Vote(p) => serde_json::to_value(p),
            Decision::RevengeShot(p) => serde_json::to_value(p),
        }
        .unwrap_or_default();
        RawDecision::new(kind.as_str(), payload)
    }
}

fn payload_as<T: DeserializeOwned>(
    agent: AgentId,
    kind: DecisionKind,
    raw: &RawDecision,
) -> WolfnetResult<T> {
    serde_json::from_value(raw.payload.clone()).map_err(|e| WolfnetError::AdapterMalformedResponse {
        agent,
        reason: format!("'{}' payload does not parse: {}", kind, e),
    })
}

// ── Context snapshot ─────────────────────────────────────────────────────────

/// Knowledge only this agent holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKnowledge {
    /// Seer only: every investigation so far, oldest first.
    pub investigations: Vec<Investigation>,
    /// Werewolves only: the other werewolves, dead or alive.
    pub allies: Vec<AgentId>,
    pub heal_available: bool,
    pub poison_available: bool,
    pub shot_available: bool,
}

/// A death as the table saw it. Night causes stay hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicDeath {
    pub round: u32,
    pub agent: AgentId,
    /// The phase in which the death was announced.
    pub during: Phase,
}

/// The immutable snapshot an adapter receives for one decision.
///
/// Built before the phase fans out, so no agent can see another agent's
/// answer to the same question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionContext {
    pub game_id: GameId,
    pub round: u32,
    pub phase: Phase,
    pub kind: DecisionKind,
    /// This agent's own profile, role included.
    pub me: AgentProfile,
    pub roster: Vec<PublicAgent>,
    pub private: PrivateKnowledge,
    /// This agent's own past trust entries, oldest first.
    pub own_trust: Vec<TrustEntry>,
    pub deaths: Vec<PublicDeath>,
    /// Every ballot cast on earlier days.
    pub past_votes: Vec<Vote>,
    /// Today's statements in speaking order. Empty at night.
    pub discussion: Vec<Statement>,
    /// Set only for run-off ballots.
    pub candidates: Option<Vec<AgentId>>,
}

impl DecisionContext {
    /// Ids of every living agent, ascending.
    pub fn living(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.roster.iter().filter(|a| a.alive).map(|a| a.id)
    }

    /// Ids of every living agent other than this one, ascending.
    pub fn living_others(&self) -> impl Iterator<Item = AgentId> + '_ {
        let me = self.me.id;
        self.living().filter(move |id| *id != me)
    }

    pub fn is_alive(&self, id: AgentId) -> bool {
        self.roster.iter().any(|a| a.id == id && a.alive)
    }
}
