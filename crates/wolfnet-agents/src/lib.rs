//! # wolfnet-agents
//!
//! Reference agent adapters for the wolfnet engine, and full-match scenarios
//! that exercise the whole stack.
//!
//! Adapters:
//!
//! 1. **`HeuristicAdapter`**: a deterministic rule-based player.
//! 2. **`ScriptedAdapter`**: replays canned decisions per round.
//! 3. **`UnresponsiveAdapter`** / **`GarbledAdapter`**: broken backends that
//!    hang or answer with junk.
//!
//! Real language-model backends live outside this workspace; they plug in
//! through the same `AgentAdapter` trait. No external calls are made here.

pub mod backend;
pub mod faulty;
pub mod heuristic;
pub mod scenarios;
pub mod scripted;

pub use backend::{adapter_for_backend, adapters_for};
pub use faulty::{GarbledAdapter, UnresponsiveAdapter};
pub use heuristic::HeuristicAdapter;
pub use scripted::ScriptedAdapter;

// ── Tests ─────────────────────────────────────────────────────────────────────
