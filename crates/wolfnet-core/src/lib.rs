//! # wolfnet-core
//!
//! The game engine for the wolfnet werewolf simulation.
//!
//! This crate provides:
//! - The three core traits (`AgentAdapter`, `DecisionParser`, `RecordSink`)
//! - The role registry and the append-only trust ledger
//! - The night and day engines, built on one batch-collect-then-resolve
//!   collector with per-call timeouts and default-safe fallbacks
//! - `GameHandle`, the state machine that drives a game round by round
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wolfnet_core::{GameHandle, traits::{AgentAdapter, RecordSink, TypedDecisionParser}};
//!
//! let mut game = GameHandle::new(setup, adapters, Box::new(sink), Box::new(TypedDecisionParser))?;
//! while !game.is_ended() {
//!     let round = game.run_round().await?;
//! }
//! ```

mod collect;
pub mod day;
pub mod game;
pub mod ledger;
pub mod night;
pub mod roles;
pub mod state;
pub mod traits;

#[cfg(test)]
mod test_support;

pub use game::GameHandle;
pub use ledger::TrustLedger;
pub use roles::capabilities_of;
pub use state::GameState;
