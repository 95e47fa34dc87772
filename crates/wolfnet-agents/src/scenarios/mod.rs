//! Full-match scenarios.
//!
//! Each scenario wires real wolfnet components (game handle, schema parser,
//! hash-chained record sink) to the reference adapters and plays a match to
//! the end. [`play_match`] is the shared runner.

pub mod classic_match;
pub mod unreliable_table;

use std::{collections::BTreeMap, sync::Arc};

use tracing::info;

use wolfnet_contracts::{
    action::TrustEntry,
    agent::AgentId,
    error::{WolfnetError, WolfnetResult},
    game::{GameEnd, GameSetup, RoundResult},
};
use wolfnet_core::{traits::AgentAdapter, GameHandle};
use wolfnet_record::{verify_chain, GameLog, GameRecord, InMemoryRecordSink, TrustNetwork};
use wolfnet_verify::SchemaDecisionParser;

/// The bundled six-seat table.
pub const CLASSIC_CONFIG: &str = include_str!("../../configs/classic.toml");

/// Everything a finished match leaves behind.
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub game_id: String,
    pub rounds: Vec<RoundResult>,
    pub end: GameEnd,
    /// Every accepted trust entry, in append order.
    pub trust: Vec<TrustEntry>,
    pub log: GameLog,
    /// True if the exported hash chain verified.
    pub chain_valid: bool,
    pub record: GameRecord,
}

impl MatchReport {
    /// Trust network over the whole match.
    pub fn network(&self) -> TrustNetwork {
        TrustNetwork::from_entries(&self.trust, None)
    }

    /// Per-decision failures recovered across every round.
    pub fn rejection_count(&self) -> usize {
        self.rounds.iter().map(|r| r.rejections.len()).sum()
    }
}

/// Play `setup` to the end with the schema parser and an in-memory record.
pub async fn play_match(
    setup: GameSetup,
    adapters: BTreeMap<AgentId, Arc<dyn AgentAdapter>>,
) -> WolfnetResult<MatchReport> {
    let game_id = setup.game_id.to_string();
    let sink = Arc::new(InMemoryRecordSink::new(game_id.clone()));

    let mut game = GameHandle::new(
        setup,
        adapters,
        Box::new(Arc::clone(&sink)),
        Box::new(SchemaDecisionParser::new()),
    )?;
    let rounds = game.run_to_end().await?;
    let end = game
        .end()
        .cloned()
        .ok_or_else(|| WolfnetError::invariant("match finished without an end record"))?;

    let log = sink.export_log()?;
    let chain_valid = verify_chain(&log.entries);
    let record = GameRecord::from_log(&log)?;
    info!(
        game_id = %game_id,
        rounds = rounds.len(),
        winner = ?end.winner,
        chain_valid,
        "match complete"
    );

    Ok(MatchReport {
        game_id,
        rounds,
        end,
        trust: game.ledger().entries().to_vec(),
        log,
        chain_valid,
        record,
    })
}

/// Print a round-by-round summary of `report`.
pub fn print_summary(report: &MatchReport) {
    for round in &report.rounds {
        println!("  Round {}", round.round);
        let night: Vec<String> = round.night.deaths.iter().map(|d| d.agent.to_string()).collect();
        println!(
            "    Night:       {}",
            if night.is_empty() { "no deaths".to_string() } else { night.join(", ") }
        );
        if let Some(vote) = &round.vote {
            let outcome = match vote.eliminated {
                Some(id) => format!("{id} eliminated"),
                None => "no elimination".to_string(),
            };
            println!("    Vote:        {outcome} ({:?})", vote.resolution);
        }
        if !round.rejections.is_empty() {
            println!("    Rejected:    {} decision(s) replaced by defaults", round.rejections.len());
        }
    }
    println!();

    match report.end.winner {
        Some(faction) => println!("  Winner:      {faction} (round {})", report.end.final_round),
        None => println!("  Winner:      none ({:?} after round {})", report.end.reason, report.end.final_round),
    }
    println!(
        "  Record chain: {} ({} event(s))",
        if report.chain_valid { "VERIFIED" } else { "FAILED" },
        report.log.entries.len()
    );
    println!("  Trust edges: {}", report.network().len());
}
