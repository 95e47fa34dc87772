//! Agent identity and roster types.
//!
//! An agent is one seat at the table. Its role is fixed for the whole game;
//! only its alive flag ever changes, and only the phase engines change it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Stable identifier for a seat in one game.
///
/// Ordering matters: every tie-break in the engines resolves to the lowest
/// id, and discussion turns run in ascending id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Unique identifier for a single game run.
///
/// Appears in every record entry and in the exported game record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub uuid::Uuid);

impl GameId {
    /// Create a new, unique game ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Everything the setup layer knows about one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: AgentId,
    /// Display name used in transcripts and the exported record.
    pub name: String,
    pub role: Role,
    /// Opaque personality tag passed through to the adapter untouched.
    #[serde(default)]
    pub personality: String,
    /// Backend binding tag (e.g. "heuristic"). The core never interprets it.
    #[serde(default)]
    pub backend: String,
}

/// The public face of an agent: what every other player can see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAgent {
    pub id: AgentId,
    pub name: String,
    pub alive: bool,
}
