//! Hash-chain primitives: hashing and chain verification.
//!
//! Hash input layout (bytes, in order):
//!   1. game_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the event

use sha2::{Digest, Sha256};

use wolfnet_contracts::{
    error::{WolfnetError, WolfnetResult},
    event::GameEvent,
};

use crate::event::RecordEntry;

/// Compute the SHA-256 hash of one record entry.
///
/// Returns a lowercase 64-character hex string. Fails with
/// `RecordWriteFailed` if the event cannot be serialized.
pub fn hash_entry(game_id: &str, sequence: u64, event: &GameEvent, prev_hash: &str) -> WolfnetResult<String> {
    let event_json = serde_json::to_vec(event).map_err(|e| WolfnetError::RecordWriteFailed {
        reason: format!("event {sequence} does not serialize: {e}"),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(game_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&event_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify a hash chain.
///
/// Valid when every entry links to its predecessor (the first to
/// `GENESIS_HASH`), sequence numbers run 0, 1, 2, …, and every stored hash
/// matches the recomputed one. An empty chain is valid.
pub fn verify_chain(entries: &[RecordEntry]) -> bool {
    let mut expected_prev = RecordEntry::GENESIS_HASH.to_string();

    for (position, entry) in entries.iter().enumerate() {
        if entry.sequence != position as u64 || entry.prev_hash != expected_prev {
            return false;
        }
        match hash_entry(&entry.game_id, entry.sequence, &entry.event, &entry.prev_hash) {
            Ok(recomputed) if recomputed == entry.this_hash => {}
            _ => return false,
        }
        expected_prev = entry.this_hash.clone();
    }

    true
}
