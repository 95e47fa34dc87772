//! Schema-checked decision parser for the wolfnet engines.
//!
//! `SchemaDecisionParser` implements the `DecisionParser` trait from
//! `wolfnet-core`. A raw adapter answer is accepted only if its discriminant
//! names the requested kind, its payload satisfies the JSON Schema for that
//! kind, and the payload deserializes into the typed decision. Every schema
//! violation is collected before rejecting so the rejection reason shows the
//! full failure set in one pass.

use std::collections::HashMap;

use serde_json::{json, Value};
use tracing::{debug, warn};

use wolfnet_contracts::{
    agent::AgentId,
    decision::{Decision, DecisionKind, RawDecision},
    error::{WolfnetError, WolfnetResult},
};
use wolfnet_core::traits::DecisionParser;

/// JSON Schema fragment for an optional agent id.
fn optional_agent_id() -> Value {
    json!({
        "anyOf": [
            { "type": "integer", "minimum": 0, "maximum": u32::MAX },
            { "type": "null" }
        ]
    })
}

/// The built-in schema for one kind of decision.
///
/// Extra properties are tolerated: adapters backed by language models often
/// add reasoning fields, and the typed layer ignores them.
pub fn default_schema(kind: DecisionKind) -> Value {
    match kind {
        DecisionKind::NightAction => json!({
            "type": "object",
            "properties": {
                "actions": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "kind": { "enum": ["kill", "heal", "poison", "investigate"] },
                            "target": optional_agent_id()
                        },
                        "required": ["kind"]
                    }
                }
            }
        }),
        DecisionKind::Discussion => json!({
            "type": "object",
            "properties": {
                "text": { "type": ["string", "null"] }
            }
        }),
        // Scores only need to be numbers; the ledger owns the range check.
        DecisionKind::TrustScores => json!({
            "type": "object",
            "properties": {
                "scores": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "target": { "type": "integer", "minimum": 0, "maximum": u32::MAX },
                            "score": { "type": "number" }
                        },
                        "required": ["target", "score"]
                    }
                }
            }
        }),
        DecisionKind::Vote => json!({
            "type": "object",
            "properties": {
                "target": optional_agent_id(),
                "rationale": { "type": "string" }
            }
        }),
        DecisionKind::RevengeShot => json!({
            "type": "object",
            "properties": {
                "target": optional_agent_id()
            }
        }),
    }
}

/// The wolfnet validation boundary.
///
/// Starts with [`default_schema`] for every kind. A host can tighten any of
/// them with [`SchemaDecisionParser::with_schema`], for example to cap the
/// length of discussion text.
pub struct SchemaDecisionParser {
    schemas: HashMap<DecisionKind, Value>,
}

impl SchemaDecisionParser {
    /// A parser using the built-in schema for every kind.
    pub fn new() -> Self {
        let kinds = [
            DecisionKind::NightAction,
            DecisionKind::Discussion,
            DecisionKind::TrustScores,
            DecisionKind::Vote,
            DecisionKind::RevengeShot,
        ];
        Self {
            schemas: kinds.into_iter().map(|k| (k, default_schema(k))).collect(),
        }
    }

    /// Replace the schema used for `kind`.
    pub fn with_schema(mut self, kind: DecisionKind, schema: Value) -> Self {
        self.schemas.insert(kind, schema);
        self
    }

    /// Every schema violation in `payload`, as human-readable messages.
    fn violations(&self, agent: AgentId, kind: DecisionKind, payload: &Value) -> Vec<String> {
        let Some(schema) = self.schemas.get(&kind) else {
            return Vec::new();
        };

        match jsonschema::validator_for(schema) {
            Ok(validator) => validator
                .iter_errors(payload)
                .map(|error| format!("schema violation at '{}': {}", error.instance_path, error))
                .collect(),
            Err(e) => {
                // A broken schema is a host misconfiguration. Rejecting keeps
                // the game moving on the fallback decision.
                warn!(%agent, %kind, error = %e, "decision schema does not compile");
                vec![format!("invalid JSON Schema document for '{kind}': {e}")]
            }
        }
    }
}

impl Default for SchemaDecisionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionParser for SchemaDecisionParser {
    /// Validate `raw` and convert it into a decision of kind `expected`.
    ///
    /// Fails with `AdapterMalformedResponse` on a kind mismatch, on any
    /// schema violation, or if the payload does not fit the typed shape.
    fn parse(&self, agent: AgentId, expected: DecisionKind, raw: &RawDecision) -> WolfnetResult<Decision> {
        // ── Phase 1: discriminant ────────────────────────────────────────────
        if raw.kind != expected.as_str() {
            warn!(%agent, expected = %expected, got = %raw.kind, "decision kind mismatch");
            return Err(WolfnetError::AdapterMalformedResponse {
                agent,
                reason: format!("expected a '{}' decision, got '{}'", expected, raw.kind),
            });
        }

        // ── Phase 2: JSON Schema structural validation ───────────────────────
        let failures = self.violations(agent, expected, &raw.payload);
        if !failures.is_empty() {
            let reason = failures.join("; ");
            warn!(%agent, kind = %expected, failure_count = failures.len(), %reason, "decision failed validation");
            return Err(WolfnetError::AdapterMalformedResponse { agent, reason });
        }

        // ── Phase 3: typed conversion ────────────────────────────────────────
        let decision = Decision::from_raw(agent, expected, raw)?;
        debug!(%agent, kind = %expected, "decision accepted");
        Ok(decision)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
