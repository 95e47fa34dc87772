//! Configuration schema.
//!
//! A `GameConfig` is deserialized from TOML. It holds the table settings and
//! one `[[players]]` entry per seat. Unknown keys are rejected so a typo
//! never silently falls back to a default.

use serde::{Deserialize, Serialize};

use wolfnet_contracts::{game::CollectionMode, role::Role};

fn default_budget_ms() -> u64 {
    30_000
}

fn default_backend() -> String {
    "heuristic".to_string()
}

/// Per-call adapter budgets in milliseconds. Missing keys default to
/// thirty seconds.
///
/// ```toml
/// [settings.time_limits]
/// night_ms = 10000
/// vote_ms = 5000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeLimitsConfig {
    #[serde(default = "default_budget_ms")]
    pub night_ms: u64,
    #[serde(default = "default_budget_ms")]
    pub discussion_ms: u64,
    #[serde(default = "default_budget_ms")]
    pub trust_ms: u64,
    #[serde(default = "default_budget_ms")]
    pub vote_ms: u64,
    #[serde(default = "default_budget_ms")]
    pub ability_ms: u64,
}

impl Default for TimeLimitsConfig {
    fn default() -> Self {
        Self {
            night_ms: default_budget_ms(),
            discussion_ms: default_budget_ms(),
            trust_ms: default_budget_ms(),
            vote_ms: default_budget_ms(),
            ability_ms: default_budget_ms(),
        }
    }
}

/// The `[settings]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsConfig {
    /// Must equal the number of `[[players]]` when present.
    pub total_players: Option<usize>,

    /// Defaults to the number of players.
    pub max_rounds: Option<u32>,

    #[serde(default)]
    pub discussion_start_offset: usize,

    /// `"parallel"` (default) or `"sequential"`.
    #[serde(default)]
    pub collection: CollectionMode,

    #[serde(default)]
    pub time_limits: TimeLimitsConfig,
}

/// One `[[players]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerConfig {
    pub id: u32,
    pub name: String,
    /// `"werewolf"`, `"villager"`, `"seer"`, `"witch"` or `"hunter"`.
    pub role: Role,
    /// Passed to the adapter untouched.
    #[serde(default)]
    pub personality: String,
    /// Adapter binding tag. Defaults to `"heuristic"`.
    #[serde(default = "default_backend")]
    pub backend: String,
}

/// The top-level structure deserialized from a game config file.
///
/// Example:
/// ```toml
/// [settings]
/// discussion_start_offset = 1
///
/// [[players]]
/// id = 1
/// name = "Ada"
/// role = "werewolf"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub players: Vec<PlayerConfig>,
}
