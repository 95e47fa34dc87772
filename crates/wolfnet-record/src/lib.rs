//! # wolfnet-record
//!
//! The game record for the wolfnet simulation: an append-only, SHA-256
//! hash-chained event log, the JSON dataset exported from it, and trust
//! network aggregation over the recorded trust entries.
//!
//! ## Overview
//!
//! Every event the engine emits is wrapped in a `RecordEntry` that links to
//! the previous entry by hash. Changing any recorded byte breaks the chain
//! and `verify_chain` reports it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wolfnet_record::{InMemoryRecordSink, GameRecord};
//!
//! let sink = Arc::new(InMemoryRecordSink::new(setup.game_id.to_string()));
//! let mut game = GameHandle::new(setup, adapters, Box::new(Arc::clone(&sink)), parser)?;
//! game.run_to_end().await?;
//!
//! assert!(sink.verify_integrity());
//! let record = GameRecord::from_log(&sink.export_log()?)?;
//! ```

pub mod chain;
pub mod event;
pub mod export;
pub mod memory;
pub mod network;

pub use chain::{hash_entry, verify_chain};
pub use event::{GameLog, RecordEntry};
pub use export::GameRecord;
pub use memory::InMemoryRecordSink;
pub use network::{vote_trust, TrustBand, TrustNetwork};

// ── Tests ────────────────────────────────────────────────────────────────────
