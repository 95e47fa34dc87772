//! In-memory implementation of `RecordSink`.
//!
//! Keeps every entry in a `Vec` behind a `Mutex`, so the sink can be shared
//! through an `Arc` between the game handle and whoever exports the log.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{info, warn};

use wolfnet_contracts::{
    error::{WolfnetError, WolfnetResult},
    event::GameEvent,
};
use wolfnet_core::traits::RecordSink;

use crate::{
    chain::{hash_entry, verify_chain},
    event::{GameLog, RecordEntry},
};

// ── Internal mutable state ───────────────────────────────────────────────────

pub(crate) struct InMemoryState {
    pub(crate) entries: Vec<RecordEntry>,
    pub(crate) sequence: u64,
    pub(crate) last_hash: String,
    pub(crate) sealed: bool,
}

// ── Public sink ──────────────────────────────────────────────────────────────

/// An in-memory, append-only record sink backed by a SHA-256 hash chain.
pub struct InMemoryRecordSink {
    game_id: String,
    pub(crate) state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryRecordSink {
    pub fn new(game_id: impl Into<String>) -> Self {
        let state = InMemoryState {
            entries: Vec::new(),
            sequence: 0,
            last_hash: RecordEntry::GENESIS_HASH.to_string(),
            sealed: false,
        };
        Self {
            game_id: game_id.into(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> WolfnetResult<std::sync::MutexGuard<'_, InMemoryState>> {
        self.state.lock().map_err(|e| WolfnetError::RecordWriteFailed {
            reason: format!("record state lock poisoned: {e}"),
        })
    }

    /// Everything recorded so far.
    pub fn export_log(&self) -> WolfnetResult<GameLog> {
        let state = self.lock()?;
        Ok(GameLog {
            game_id: self.game_id.clone(),
            entries: state.entries.clone(),
            sealed: state.sealed,
            exported_at: Utc::now(),
            terminal_hash: state.entries.last().map(|e| e.this_hash.clone()).unwrap_or_default(),
        })
    }

    /// True if the in-memory chain is intact.
    pub fn verify_integrity(&self) -> bool {
        self.lock().map(|state| verify_chain(&state.entries)).unwrap_or(false)
    }

    pub fn is_sealed(&self) -> bool {
        self.lock().map(|state| state.sealed).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.lock().map(|state| state.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── RecordSink impl ──────────────────────────────────────────────────────────

impl RecordSink for InMemoryRecordSink {
    /// Append one event to the chain. Fails once the sink is sealed.
    fn emit(&self, event: &GameEvent) -> WolfnetResult<()> {
        let mut state = self.lock()?;
        if state.sealed {
            return Err(WolfnetError::RecordWriteFailed {
                reason: format!("record for game {} is sealed", self.game_id),
            });
        }

        let prev_hash = state.last_hash.clone();
        let sequence = state.sequence;
        let this_hash = hash_entry(&self.game_id, sequence, event, &prev_hash)?;

        state.entries.push(RecordEntry {
            sequence,
            game_id: self.game_id.clone(),
            event: event.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.sequence += 1;
        state.last_hash = this_hash;
        Ok(())
    }

    /// Seal the record. A second close is refused.
    fn close(&self, game_id: &str) -> WolfnetResult<()> {
        let mut state = self.lock()?;
        if state.sealed {
            return Err(WolfnetError::RecordWriteFailed {
                reason: format!("record for game {game_id} closed twice"),
            });
        }
        if game_id != self.game_id {
            warn!(expected = %self.game_id, got = %game_id, "record closed under a different game id");
        }
        state.sealed = true;

        info!(
            game_id = %game_id,
            entry_count = state.entries.len(),
            terminal_hash = %state.last_hash,
            "game record sealed"
        );
        Ok(())
    }
}
