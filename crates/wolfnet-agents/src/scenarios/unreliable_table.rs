//! Scenario 2: an unreliable table.
//!
//! The classic table with two broken seats: the witch (P4) never answers
//! and the hunter (P6) answers with junk. Every one of their decisions is
//! replaced by the default-safe fallback, and the match still runs to a
//! recorded end.

use wolfnet_config::GameConfig;
use wolfnet_contracts::{error::WolfnetResult, game::GameSetup};

use crate::{
    backend::adapters_for,
    scenarios::{play_match, print_summary, MatchReport, CLASSIC_CONFIG},
};

/// Budget per adapter call for this scenario, in milliseconds.
pub const BUDGET_MS: u64 = 200;

/// The classic setup with P4 silent, P6 garbled, and short budgets.
pub fn unreliable_setup() -> WolfnetResult<GameSetup> {
    let mut config = GameConfig::from_toml_str(CLASSIC_CONFIG)?;
    for player in &mut config.players {
        match player.id {
            4 => player.backend = "silent".to_string(),
            6 => player.backend = "garbled".to_string(),
            _ => {}
        }
    }
    let limits = &mut config.settings.time_limits;
    limits.night_ms = BUDGET_MS;
    limits.discussion_ms = BUDGET_MS;
    limits.trust_ms = BUDGET_MS;
    limits.vote_ms = BUDGET_MS;
    limits.ability_ms = BUDGET_MS;
    config.into_setup()
}

/// Run Scenario 2 and print its summary.
pub async fn run_scenario() -> WolfnetResult<MatchReport> {
    println!("=== Scenario 2: Unreliable table (P4 silent, P6 garbled) ===");
    println!();

    let setup = unreliable_setup()?;
    let adapters = adapters_for(&setup.roster)?;
    let report = play_match(setup, adapters).await?;
    print_summary(&report);

    println!();
    println!("  Scenario 2 complete.");
    println!();
    Ok(report)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
