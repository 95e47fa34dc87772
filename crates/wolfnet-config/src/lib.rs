//! # wolfnet-config
//!
//! TOML loading for wolfnet games: the role assignment (one `[[players]]`
//! entry per seat) and the table settings.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use wolfnet_config::GameConfig;
//!
//! let setup = GameConfig::from_file(Path::new("configs/classic.toml"))?.into_setup()?;
//! // Pass `setup` to `wolfnet_core::GameHandle::new(...)`.
//! ```
//!
//! Every failure, from unreadable files to an unwinnable role mix, is a
//! `WolfnetError::ConfigError`.

pub mod loader;
pub mod model;

pub use model::{GameConfig, PlayerConfig, SettingsConfig, TimeLimitsConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────
