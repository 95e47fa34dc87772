//! wolfnet demo CLI
//!
//! Plays a werewolf match between AI agents to completion, prints a round
//! summary, verifies the hash-chained game record, and optionally writes the
//! exported game record as JSON.
//!
//! Usage:
//!   cargo run -p demo -- run
//!   cargo run -p demo -- run --config my_table.toml --output game.json
//!   cargo run -p demo -- run --sequential
//!   cargo run -p demo -- scenarios

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wolfnet_agents::{
    adapters_for,
    scenarios::{classic_match, play_match, print_summary, unreliable_table, CLASSIC_CONFIG},
};
use wolfnet_config::GameConfig;
use wolfnet_contracts::{
    error::{WolfnetError, WolfnetResult},
    game::CollectionMode,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// wolfnet: a werewolf table played by AI agents, with trust tracking.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "wolfnet werewolf match runner",
    long_about = "Plays a werewolf match between AI agents, records every event in a\n\
                  SHA-256 hash chain, and exports the per-round trust ratings."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play one match to the end.
    Run {
        /// Game config TOML. Defaults to the bundled classic six-seat table.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the exported game record here as pretty JSON.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Ask agents one at a time instead of in parallel.
        #[arg(long)]
        sequential: bool,
    },
    /// Run the bundled scenarios: the classic table and an unreliable one.
    Scenarios,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Initialize structured logging. Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::Run {
            config,
            output,
            sequential,
        } => run(config, output, sequential).await,
        Command::Scenarios => run_scenarios().await,
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

async fn run(config: Option<PathBuf>, output: Option<PathBuf>, sequential: bool) -> WolfnetResult<()> {
    let mut game_config = match &config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::from_toml_str(CLASSIC_CONFIG)?,
    };
    if sequential {
        game_config.settings.collection = CollectionMode::Sequential;
    }

    let setup = game_config.into_setup()?;
    println!("  Game {}", setup.game_id);
    for p in &setup.roster {
        println!("  {:<4} {:<10} {:<9} {}", p.id.to_string(), p.name, p.role.as_str(), p.backend);
    }
    println!();

    let adapters = adapters_for(&setup.roster)?;
    let report = play_match(setup, adapters).await?;
    print_summary(&report);

    if !report.chain_valid {
        warn!(game_id = %report.game_id, "record chain failed verification");
        return Err(WolfnetError::RecordWriteFailed {
            reason: format!("record for game {} failed chain verification", report.game_id),
        });
    }

    if let Some(path) = output {
        let json = report.record.to_json_pretty()?;
        std::fs::write(&path, json).map_err(|e| WolfnetError::RecordWriteFailed {
            reason: format!("failed to write game record to '{}': {}", path.display(), e),
        })?;
        info!(path = %path.display(), "game record written");
        println!("  Game record written to {}", path.display());
    }
    Ok(())
}

async fn run_scenarios() -> WolfnetResult<()> {
    classic_match::run_scenario(CollectionMode::Parallel).await?;
    unreliable_table::run_scenario().await?;
    println!("All scenarios completed successfully.");
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("wolfnet: Werewolf played by AI agents");
    println!("======================================");
    println!();
    println!("Each round:");
    println!("  [1] Night: werewolves, seer and witch act at once; one resolution order applies");
    println!("  [2] Discussion: every living agent speaks in a fixed rotating order");
    println!("  [3] Trust: every living agent scores every other on a 0-10 scale");
    println!("  [4] Vote: plurality elimination, one run-off on a tie");
    println!("  Every event is appended to a SHA-256 hash-chained record.");
    println!();
}
