//! Backend tag resolution.
//!
//! The config layer names a backend per seat; the core never interprets the
//! tag. This module maps the tags this crate knows to adapters.

use std::{collections::BTreeMap, sync::Arc};

use tracing::debug;

use wolfnet_contracts::{
    agent::{AgentId, AgentProfile},
    error::{WolfnetError, WolfnetResult},
};
use wolfnet_core::traits::AgentAdapter;

use crate::{
    faulty::{GarbledAdapter, UnresponsiveAdapter},
    heuristic::HeuristicAdapter,
};

/// Tags accepted by [`adapter_for_backend`].
pub const KNOWN_BACKENDS: [&str; 3] = ["heuristic", "silent", "garbled"];

/// Build the adapter for one seat.
///
/// - `heuristic` (or an empty tag): [`HeuristicAdapter`]
/// - `silent`: [`UnresponsiveAdapter`]
/// - `garbled`: [`GarbledAdapter`]
///
/// Any other tag is a `ConfigError`.
pub fn adapter_for_backend(tag: &str, profile: &AgentProfile) -> WolfnetResult<Arc<dyn AgentAdapter>> {
    let adapter: Arc<dyn AgentAdapter> = match tag.trim().to_ascii_lowercase().as_str() {
        "" | "heuristic" => Arc::new(HeuristicAdapter),
        "silent" => Arc::new(UnresponsiveAdapter),
        "garbled" => Arc::new(GarbledAdapter),
        other => {
            return Err(WolfnetError::ConfigError {
                reason: format!(
                    "unknown backend '{other}' for {} ({}); expected one of {}",
                    profile.id,
                    profile.name,
                    KNOWN_BACKENDS.join(", ")
                ),
            })
        }
    };
    debug!(agent = %profile.id, backend = %tag, "adapter bound");
    Ok(adapter)
}

/// Bind every seat in `roster` to the adapter its backend tag names.
pub fn adapters_for(roster: &[AgentProfile]) -> WolfnetResult<BTreeMap<AgentId, Arc<dyn AgentAdapter>>> {
    roster
        .iter()
        .map(|p| adapter_for_backend(&p.backend, p).map(|a| (p.id, a)))
        .collect()
}
