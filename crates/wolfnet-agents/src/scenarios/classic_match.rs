//! Scenario 1: the classic six-seat table.
//!
//! Two werewolves against a seer, a witch, a hunter and a villager, every
//! seat played by the heuristic adapter. Heuristic players depend only on
//! their context, so the match replays identically under either collection
//! mode.

use wolfnet_config::GameConfig;
use wolfnet_contracts::{
    error::WolfnetResult,
    game::{CollectionMode, GameSetup},
};

use crate::{
    backend::adapters_for,
    scenarios::{play_match, print_summary, MatchReport, CLASSIC_CONFIG},
};

/// The bundled classic setup with the given collection mode.
pub fn classic_setup(collection: CollectionMode) -> WolfnetResult<GameSetup> {
    let mut config = GameConfig::from_toml_str(CLASSIC_CONFIG)?;
    config.settings.collection = collection;
    config.into_setup()
}

/// Run Scenario 1 and print its summary.
pub async fn run_scenario(collection: CollectionMode) -> WolfnetResult<MatchReport> {
    println!("=== Scenario 1: Classic table ({collection:?} collection) ===");
    println!();

    let setup = classic_setup(collection)?;
    for p in &setup.roster {
        println!("  {:<4} {:<8} {}", p.id.to_string(), p.name, p.role);
    }
    println!();

    let adapters = adapters_for(&setup.roster)?;
    let report = play_match(setup, adapters).await?;
    print_summary(&report);

    println!();
    println!("  Scenario 1 complete.");
    println!();
    Ok(report)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use wolfnet_contracts::{
        action::{DeathCause, VoteResolution},
        agent::AgentId,
        game::{CollectionMode, EndReason},
        role::Faction,
    };

    use super::*;

    /// Night 1 both wolves pick the lowest-id outsider; day 1 the village
    /// votes out P2; night 2 takes the seer and day 2 the witch, leaving
    /// the last wolf level with the hunter.
    #[tokio::test]
    async fn test_classic_match_plays_out() {
        let report = run_scenario(CollectionMode::Parallel).await.unwrap();

        assert!(report.chain_valid);
        assert_eq!(report.rejection_count(), 0, "heuristic players only submit legal decisions");
        assert_eq!(report.end.winner, Some(Faction::Werewolf));
        assert_eq!(report.end.reason, EndReason::Victory);
        assert_eq!(report.end.final_round, 2);
        assert_eq!(report.rounds.len(), 2);

        let first = &report.rounds[0];
        assert_eq!(first.night.deaths.len(), 1);
        assert_eq!(first.night.deaths[0].agent, AgentId(1));
        assert_eq!(first.night.deaths[0].cause, DeathCause::WerewolfKill);
        let vote = first.vote.as_ref().unwrap();
        assert_eq!(vote.resolution, VoteResolution::Eliminated);
        assert_eq!(vote.eliminated, Some(AgentId(2)));

        let second = &report.rounds[1];
        assert_eq!(second.night.deaths[0].agent, AgentId(3));
        assert_eq!(second.vote.as_ref().unwrap().eliminated, Some(AgentId(4)));
        assert!(second.ended.is_some());
    }

    #[tokio::test]
    async fn test_record_matches_match() {
        let report = run_scenario(CollectionMode::Parallel).await.unwrap();
        let record = &report.record;

        assert_eq!(record.game_id, report.game_id);
        assert_eq!(record.winner, report.end.winner);
        assert_eq!(record.player_roles.len(), 6);
        assert_eq!(record.rounds.len(), 2);
        assert_eq!(record.terminal_hash, report.log.terminal_hash);
        assert!(report.log.sealed);

        // Five living raters in round 1, each scoring the other four.
        let ratings = &record.rounds[0].ratings;
        assert_eq!(ratings.len(), 5);
        assert!(ratings.values().all(|row| row.len() == 4));
        // A werewolf trusts its ally fully.
        assert_eq!(ratings["2"]["5"], 10.0);

        assert!(!report.network().is_empty());
    }

    /// Same scripts, different execution strategy, identical outcome.
    #[tokio::test]
    async fn test_parallel_and_sequential_agree() {
        let parallel = run_scenario(CollectionMode::Parallel).await.unwrap();
        let sequential = run_scenario(CollectionMode::Sequential).await.unwrap();

        assert_ne!(parallel.game_id, sequential.game_id);
        assert_eq!(parallel.rounds, sequential.rounds);
        assert_eq!(parallel.trust, sequential.trust);
        assert_eq!(parallel.end, sequential.end);
    }
}
