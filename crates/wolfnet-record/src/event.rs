//! Record entry and log types.
//!
//! `RecordEntry` is one link in the hash chain: a `GameEvent` plus its
//! sequence number and the SHA-256 hashes that make tampering detectable.
//! `GameLog` is the exported record of one game.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wolfnet_contracts::event::GameEvent;

/// A single entry in the SHA-256 hash chain for one game.
///
/// Each entry commits to the previous one via `prev_hash`. Changing any
/// field, including the embedded event, invalidates `this_hash` and every
/// later `prev_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    pub game_id: String,

    pub event: GameEvent,

    /// Hex SHA-256 of the previous entry, or `GENESIS_HASH` for the first.
    pub prev_hash: String,

    /// Hex SHA-256 over (game_id, sequence, prev_hash, event JSON).
    pub this_hash: String,
}

impl RecordEntry {
    /// The `prev_hash` of the first entry in every chain: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// The exported record of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLog {
    pub game_id: String,

    /// Every entry in chain order.
    pub entries: Vec<RecordEntry>,

    /// True once the sink was closed at game end.
    pub sealed: bool,

    pub exported_at: DateTime<Utc>,

    /// `this_hash` of the last entry; empty for an empty log.
    pub terminal_hash: String,
}

impl GameLog {
    /// The recorded events, in emission order.
    pub fn events(&self) -> impl Iterator<Item = &GameEvent> + '_ {
        self.entries.iter().map(|e| &e.event)
    }
}
