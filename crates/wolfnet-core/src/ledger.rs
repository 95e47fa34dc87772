//! The trust ledger: every agent's per-round trust judgments.
//!
//! Append-only. An entry is never overwritten; a later round supersedes it
//! without erasing it, so the full temporal history survives for network
//! construction. There is no deletion operation.

use std::collections::HashSet;

use tracing::{debug, warn};

use wolfnet_contracts::{
    action::TrustEntry,
    agent::AgentId,
    error::{WolfnetError, WolfnetResult},
};

/// Append-only store of `TrustEntry` values.
#[derive(Debug, Default, Clone)]
pub struct TrustLedger {
    /// Entries in append order. Rounds are appended in ascending order, so
    /// append order is also chronological.
    entries: Vec<TrustEntry>,
    /// (round, observer, observed) keys already recorded.
    seen: HashSet<(u32, AgentId, AgentId)>,
}

impl TrustLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append one entry.
    ///
    /// Fails with `ScoreOutOfRange` for a score outside `[0, 10]` (or not
    /// finite) and `DuplicateTrustEntry` if the observer already rated the
    /// same agent this round. A rejected entry leaves the ledger unchanged.
    pub fn record(&mut self, entry: TrustEntry) -> WolfnetResult<()> {
        if !TrustEntry::score_in_range(entry.score) {
            warn!(
                round = entry.round,
                observer = %entry.observer,
                observed = %entry.observed,
                score = entry.score,
                "trust score out of range"
            );
            return Err(WolfnetError::ScoreOutOfRange {
                round: entry.round,
                observer: entry.observer,
                observed: entry.observed,
                score: entry.score,
            });
        }

        let key = (entry.round, entry.observer, entry.observed);
        if !self.seen.insert(key) {
            warn!(
                round = entry.round,
                observer = %entry.observer,
                observed = %entry.observed,
                "duplicate trust entry"
            );
            return Err(WolfnetError::DuplicateTrustEntry {
                round: entry.round,
                observer: entry.observer,
                observed: entry.observed,
            });
        }

        debug!(
            round = entry.round,
            observer = %entry.observer,
            observed = %entry.observed,
            score = entry.score,
            "trust entry recorded"
        );
        self.entries.push(entry);
        Ok(())
    }

    /// Record every entry of a batch, returning the accepted entries and the
    /// rejections. One bad entry does not block the rest.
    pub fn record_batch(
        &mut self,
        batch: impl IntoIterator<Item = TrustEntry>,
    ) -> (Vec<TrustEntry>, Vec<WolfnetError>) {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for entry in batch {
            match self.record(entry.clone()) {
                Ok(()) => accepted.push(entry),
                Err(e) => rejected.push(e),
            }
        }
        (accepted, rejected)
    }

    /// `observer`'s entries up to and including `upto_round`, oldest first.
    ///
    /// Lazy and restartable: clone the returned iterator to walk it again.
    pub fn snapshot_for(&self, observer: AgentId, upto_round: u32) -> TrustSnapshot<'_> {
        TrustSnapshot {
            inner: self.entries.iter(),
            observer,
            upto_round,
        }
    }

    /// Every entry for `round`, in append order.
    pub fn entries_for_round(&self, round: u32) -> impl Iterator<Item = &TrustEntry> + '_ {
        self.entries.iter().filter(move |e| e.round == round)
    }

    /// Every entry, in append order.
    pub fn entries(&self) -> &[TrustEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Iterator over one observer's history. See `TrustLedger::snapshot_for`.
#[derive(Debug, Clone)]
pub struct TrustSnapshot<'a> {
    inner: std::slice::Iter<'a, TrustEntry>,
    observer: AgentId,
    upto_round: u32,
}

impl<'a> Iterator for TrustSnapshot<'a> {
    type Item = &'a TrustEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let observer = self.observer;
        let upto = self.upto_round;
        self.inner
            .by_ref()
            .find(|e| e.observer == observer && e.round <= upto)
    }
}
