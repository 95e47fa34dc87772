//! # wolfnet-verify
//!
//! The validation boundary for raw adapter output.
//!
//! This crate provides [`engine::SchemaDecisionParser`], which implements
//! [`wolfnet_core::traits::DecisionParser`]. A raw decision is accepted in
//! three steps:
//!
//! 1. **Kind**: the discriminant must name the decision that was asked for.
//! 2. **Structural**: the payload is validated against the JSON Schema for
//!    that kind via the `jsonschema` crate. Every violation is reported.
//! 3. **Typed**: the payload is deserialized into the tagged `Decision`.
//!
//! Trust score ranges are not checked here; the trust ledger reports them
//! as `ScoreOutOfRange`.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use wolfnet_verify::engine::SchemaDecisionParser;
//!
//! let parser = SchemaDecisionParser::new();
//! let game = GameHandle::new(setup, adapters, Box::new(sink), Box::new(parser))?;
//! ```

pub mod engine;

pub use engine::SchemaDecisionParser;
