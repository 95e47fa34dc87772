//! Trust-network aggregation.
//!
//! Turns ledger entries into directed, weighted edges (observer → observed)
//! and pairs each vote with the trust its voter last expressed toward the
//! target. Plotting and statistics are left to external tooling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use wolfnet_contracts::{action::TrustEntry, agent::AgentId};

use crate::export::GameRecord;

/// Coarse trust level of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustBand {
    /// Mean score ≥ 7.
    High,
    /// Mean score ≥ 4.
    Medium,
    Low,
}

impl TrustBand {
    pub fn of(score: f64) -> Self {
        if score >= 7.0 {
            TrustBand::High
        } else if score >= 4.0 {
            TrustBand::Medium
        } else {
            TrustBand::Low
        }
    }
}

/// One aggregated observer → observed edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustEdge {
    pub observer: AgentId,
    pub observed: AgentId,
    /// Mean of every contributing score.
    pub mean: f64,
    pub samples: u32,
    pub band: TrustBand,
}

/// Directed trust graph, edges sorted by (observer, observed).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrustNetwork {
    pub edges: Vec<TrustEdge>,
}

impl TrustNetwork {
    /// Aggregate `entries`, optionally restricted to one round.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a TrustEntry>, round: Option<u32>) -> Self {
        let mut sums: BTreeMap<(AgentId, AgentId), (f64, u32)> = BTreeMap::new();
        for entry in entries {
            if round.is_some_and(|r| r != entry.round) {
                continue;
            }
            let slot = sums.entry((entry.observer, entry.observed)).or_insert((0.0, 0));
            slot.0 += entry.score;
            slot.1 += 1;
        }

        let edges = sums
            .into_iter()
            .map(|((observer, observed), (sum, samples))| {
                let mean = sum / f64::from(samples);
                TrustEdge {
                    observer,
                    observed,
                    mean,
                    samples,
                    band: TrustBand::of(mean),
                }
            })
            .collect();
        Self { edges }
    }

    pub fn edge(&self, observer: AgentId, observed: AgentId) -> Option<&TrustEdge> {
        self.edges
            .iter()
            .find(|e| e.observer == observer && e.observed == observed)
    }

    /// Mean of the incoming edge means for `agent`: how trusted it was.
    pub fn trust_received(&self, agent: AgentId) -> Option<f64> {
        let incoming: Vec<f64> = self.edges.iter().filter(|e| e.observed == agent).map(|e| e.mean).collect();
        if incoming.is_empty() {
            None
        } else {
            Some(incoming.iter().sum::<f64>() / incoming.len() as f64)
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// A vote next to the trust its voter held toward the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteTrust {
    pub round: u32,
    pub voter: String,
    pub target: String,
    pub trust: f64,
    pub same_faction: bool,
}

/// Pair every non-abstaining vote in `record` with the voter's rating of
/// the target from the same round, or else the latest earlier round.
/// Votes with no matching rating are skipped.
pub fn vote_trust(record: &GameRecord) -> Vec<VoteTrust> {
    let mut paired = Vec::new();
    for round in &record.rounds {
        for vote in &round.votes {
            let (Some(target), Some(target_role)) = (&vote.target, vote.target_role) else {
                continue;
            };
            let rating = record
                .rounds
                .iter()
                .rev()
                .filter(|r| r.round <= round.round)
                .find_map(|r| r.ratings.get(&vote.voter).and_then(|row| row.get(target)).copied());
            let Some(trust) = rating else {
                continue;
            };
            paired.push(VoteTrust {
                round: round.round,
                voter: vote.voter.clone(),
                target: target.clone(),
                trust,
                same_faction: vote.voter_role.faction() == target_role.faction(),
            });
        }
    }
    paired
}
