//! The day engine: discussion, trust scoring, and the elimination vote.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use wolfnet_contracts::{
    action::{TallyEntry, TrustEntry, Vote, VoteOutcome, VoteResolution},
    agent::AgentId,
    decision::{Decision, DecisionKind},
    error::{WolfnetError, WolfnetResult},
    event::EventKind,
    game::Statement,
};

use crate::{
    collect::{Prompt, Table},
    ledger::TrustLedger,
    state::GameState,
};

// ── Discussion ───────────────────────────────────────────────────────────────

/// Speaking order for one day.
///
/// Living agents ascending by id, rotated left by `offset`. Reproducible for
/// a given roster and offset.
pub fn discussion_order(living: &[AgentId], offset: usize) -> Vec<AgentId> {
    let mut order = living.to_vec();
    if !order.is_empty() {
        let shift = offset % order.len();
        order.rotate_left(shift);
    }
    order
}

/// Run the discussion phase and return the day's statements in order.
///
/// Every speaker answers from the same pre-phase snapshot. A failed turn is
/// recorded as a pass.
pub(crate) async fn run_discussion(
    table: &Table<'_>,
    state: &GameState,
    ledger: &TrustLedger,
    rejections: &mut Vec<WolfnetError>,
) -> WolfnetResult<Vec<Statement>> {
    let round = state.round();
    let offset = state.settings().discussion_start_offset + (round as usize).saturating_sub(1);
    let order = discussion_order(&state.living(), offset);

    let mut collected = table
        .gather(state, ledger, DecisionKind::Discussion, &order, Prompt::default())
        .await?;
    table.reject_failures(state, DecisionKind::Discussion, &mut collected, rejections)?;

    let mut statements = Vec::with_capacity(order.len());
    for (position, speaker) in order.into_iter().enumerate() {
        let text = match collected.decisions.remove(&speaker) {
            Some(Decision::Discussion(turn)) => turn.text,
            _ => None,
        };
        let statement = Statement {
            round,
            speaker,
            order: position as u32,
            text,
        };
        table.emit(
            state,
            EventKind::DiscussionTurn {
                statement: statement.clone(),
            },
        )?;
        statements.push(statement);
    }

    debug!(round, statements = statements.len(), "discussion finished");
    Ok(statements)
}

// ── Trust ────────────────────────────────────────────────────────────────────

/// Collect every living agent's trust scores for the round into `ledger`.
///
/// Each score is validated on its own; a bad entry is rejected without
/// discarding the rest of the observer's batch.
pub(crate) async fn run_trust(
    table: &Table<'_>,
    state: &GameState,
    ledger: &mut TrustLedger,
    statements: &[Statement],
    rejections: &mut Vec<WolfnetError>,
) -> WolfnetResult<()> {
    let round = state.round();
    let observers = state.living();
    let prompt = Prompt {
        discussion: statements,
        candidates: None,
    };

    let mut collected = table
        .gather(state, ledger, DecisionKind::TrustScores, &observers, prompt)
        .await?;
    let failed: BTreeSet<AgentId> = collected.failures.keys().copied().collect();
    table.reject_failures(state, DecisionKind::TrustScores, &mut collected, rejections)?;

    for (observer, decision) in collected.decisions {
        if failed.contains(&observer) {
            continue;
        }
        let Decision::TrustScores(batch) = decision else {
            continue;
        };

        let mut entries = Vec::with_capacity(batch.scores.len());
        for score in batch.scores {
            if score.target == observer || !state.is_alive(score.target) {
                table.reject(
                    state,
                    observer,
                    DecisionKind::TrustScores,
                    WolfnetError::InvalidTrustTarget {
                        observer,
                        observed: score.target,
                    },
                    rejections,
                )?;
                continue;
            }
            entries.push(TrustEntry {
                round,
                observer,
                observed: score.target,
                score: score.score,
            });
        }

        let (accepted, refused) = ledger.record_batch(entries);
        for error in refused {
            table.reject(state, observer, DecisionKind::TrustScores, error, rejections)?;
        }
        table.emit(
            state,
            EventKind::TrustBatch {
                observer,
                entries: accepted,
            },
        )?;
    }

    debug!(round, entries = ledger.entries_for_round(round).count(), "trust collected");
    Ok(())
}

// ── Ballot ───────────────────────────────────────────────────────────────────

/// One round of voting: the first ballot or a run-off.
#[derive(Debug, Clone)]
pub struct Ballot {
    round: u32,
    /// Run-off only: the tied candidates.
    candidates: Option<BTreeSet<AgentId>>,
    votes: BTreeMap<AgentId, Vote>,
}

impl Ballot {
    pub fn new(round: u32) -> Self {
        Self {
            round,
            candidates: None,
            votes: BTreeMap::new(),
        }
    }

    /// A run-off restricted to `candidates`.
    pub fn runoff(round: u32, candidates: &[AgentId]) -> Self {
        Self {
            round,
            candidates: Some(candidates.iter().copied().collect()),
            votes: BTreeMap::new(),
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_runoff(&self) -> bool {
        self.candidates.is_some()
    }

    /// Count one ballot.
    ///
    /// Fails with `IneligibleVoter` for a dead or unknown voter or a second
    /// ballot from the same voter, and `InvalidVoteTarget` for a target that
    /// is not a living agent (or not a candidate in a run-off). A failed cast
    /// changes nothing.
    pub fn cast(&mut self, state: &GameState, vote: Vote) -> WolfnetResult<()> {
        if !state.is_alive(vote.voter) || self.votes.contains_key(&vote.voter) {
            return Err(WolfnetError::IneligibleVoter { voter: vote.voter });
        }
        if let Some(target) = vote.target {
            let allowed = state.is_alive(target)
                && self.candidates.as_ref().map_or(true, |c| c.contains(&target));
            if !allowed {
                return Err(WolfnetError::InvalidVoteTarget {
                    voter: vote.voter,
                    target,
                });
            }
        }
        self.votes.insert(vote.voter, vote);
        Ok(())
    }

    /// Counted ballots, ascending by voter.
    pub fn votes(&self) -> impl Iterator<Item = &Vote> + '_ {
        self.votes.values()
    }

    /// Votes per target, most votes first, ties by ascending id.
    /// Abstentions are not counted.
    pub fn tally(&self) -> Vec<TallyEntry> {
        let mut counts: BTreeMap<AgentId, u32> = BTreeMap::new();
        for target in self.votes.values().filter_map(|v| v.target) {
            *counts.entry(target).or_insert(0) += 1;
        }
        let mut tally: Vec<TallyEntry> = counts
            .into_iter()
            .map(|(target, votes)| TallyEntry { target, votes })
            .collect();
        tally.sort_by(|a, b| b.votes.cmp(&a.votes).then(a.target.cmp(&b.target)));
        tally
    }

    /// Every target sharing the highest count, ascending. Empty when nobody
    /// cast a non-abstaining vote.
    pub fn leaders(&self) -> Vec<AgentId> {
        let tally = self.tally();
        let Some(top) = tally.first().map(|t| t.votes) else {
            return Vec::new();
        };
        tally.into_iter().take_while(|t| t.votes == top).map(|t| t.target).collect()
    }
}

/// Run the day's vote: one ballot, and one run-off if the ballot ties.
///
/// Does not apply the elimination; the state machine does that so it can
/// run the win check and the hunter's shot in order.
pub(crate) async fn run_vote(
    table: &Table<'_>,
    state: &mut GameState,
    ledger: &TrustLedger,
    statements: &[Statement],
    rejections: &mut Vec<WolfnetError>,
) -> WolfnetResult<VoteOutcome> {
    let round = state.round();

    let first = collect_ballot(table, state, ledger, statements, Ballot::new(round), rejections).await?;
    let tally = first.tally();
    let leaders = first.leaders();

    let (runoff, eliminated, resolution) = match leaders.as_slice() {
        [] => (None, None, VoteResolution::NoVotes),
        [single] => (None, Some(*single), VoteResolution::Eliminated),
        tied => {
            info!(round, candidates = ?tied, "vote tied, holding a run-off");
            table.emit(
                state,
                EventKind::RunoffStarted {
                    candidates: tied.to_vec(),
                    tally: tally.clone(),
                },
            )?;
            let second = collect_ballot(
                table,
                state,
                ledger,
                statements,
                Ballot::runoff(round, tied),
                rejections,
            )
            .await?;
            match second.leaders().as_slice() {
                [single] => (Some(second.tally()), Some(*single), VoteResolution::Eliminated),
                _ => (Some(second.tally()), None, VoteResolution::DeadlockedRunoff),
            }
        }
    };

    let outcome = VoteOutcome {
        round,
        tally,
        runoff,
        eliminated,
        resolution,
    };
    info!(round, eliminated = ?outcome.eliminated, resolution = ?outcome.resolution, "vote resolved");
    table.emit(
        state,
        EventKind::VoteResolved {
            outcome: outcome.clone(),
        },
    )?;
    Ok(outcome)
}

/// Ask every living agent for a ballot and count it.
///
/// A failed decision or an invalid target counts as an abstention, so
/// every living voter appears in the ballot.
async fn collect_ballot(
    table: &Table<'_>,
    state: &mut GameState,
    ledger: &TrustLedger,
    statements: &[Statement],
    mut ballot: Ballot,
    rejections: &mut Vec<WolfnetError>,
) -> WolfnetResult<Ballot> {
    let round = ballot.round();
    let voters = state.living();
    let candidates: Option<Vec<AgentId>> = ballot.candidates.as_ref().map(|c| c.iter().copied().collect());
    let prompt = Prompt {
        discussion: statements,
        candidates: candidates.as_deref(),
    };

    let mut collected = table.gather(state, ledger, DecisionKind::Vote, &voters, prompt).await?;
    table.reject_failures(state, DecisionKind::Vote, &mut collected, rejections)?;

    for (voter, decision) in collected.decisions {
        let choice = match decision {
            Decision::Vote(choice) => choice,
            _ => Default::default(),
        };
        let vote = Vote {
            round,
            voter,
            target: choice.target,
            rationale: choice.rationale,
        };

        let counted = match ballot.cast(state, vote.clone()) {
            Ok(()) => vote,
            Err(e @ WolfnetError::InvalidVoteTarget { .. }) => {
                table.reject(state, voter, DecisionKind::Vote, e, rejections)?;
                let abstain = Vote { target: None, ..vote };
                ballot.cast(state, abstain.clone())?;
                abstain
            }
            Err(e) => {
                return Err(WolfnetError::invariant(format!("ballot refused living voter {voter}: {e}")));
            }
        };

        table.emit(
            state,
            EventKind::VoteCast {
                vote: counted.clone(),
                runoff: ballot.is_runoff(),
            },
        )?;
        state.record_vote(counted)?;
    }

    Ok(ballot)
}

// ── Hunter ───────────────────────────────────────────────────────────────────

/// Ask a dead hunter for the revenge shot and return the victim's death.
///
/// Returns `None` if the hunter holds no shot, holds fire, or names an
/// invalid target (which is rejected). Does not apply the death.
pub(crate) async fn run_revenge_shot(
    table: &Table<'_>,
    state: &mut GameState,
    ledger: &TrustLedger,
    hunter: AgentId,
    rejections: &mut Vec<WolfnetError>,
) -> WolfnetResult<Option<AgentId>> {
    if !state.seat(hunter).is_some_and(|s| s.can_shoot()) {
        return Ok(None);
    }

    let mut collected = table
        .gather(state, ledger, DecisionKind::RevengeShot, &[hunter], Prompt::default())
        .await?;
    table.reject_failures(state, DecisionKind::RevengeShot, &mut collected, rejections)?;

    let target = match collected.decisions.remove(&hunter) {
        Some(Decision::RevengeShot(shot)) => shot.target,
        _ => None,
    };
    let Some(target) = target else {
        debug!(hunter = %hunter, "hunter held fire");
        return Ok(None);
    };

    if target == hunter || !state.is_alive(target) {
        table.reject(
            state,
            hunter,
            DecisionKind::RevengeShot,
            WolfnetError::InvalidShotTarget { shooter: hunter, target },
            rejections,
        )?;
        return Ok(None);
    }

    state.consume_shot(hunter)?;
    info!(round = state.round(), hunter = %hunter, target = %target, "hunter fired");
    Ok(Some(target))
}

#[cfg(test)]
mod tests {
    use wolfnet_contracts::{game::Phase, role::Role};

    use super::*;
    use crate::{
        test_support::{fixture, MemorySink, Scripted},
        traits::TypedDecisionParser,
    };

    fn vote(voter: u32, target: Option<u32>) -> Vote {
        Vote {
            round: 1,
            voter: AgentId(voter),
            target: target.map(AgentId),
            rationale: String::new(),
        }
    }

    fn five_villagers_and_a_wolf() -> GameState {
        let mut s = fixture::state(&[
            Role::Werewolf,
            Role::Villager,
            Role::Villager,
            Role::Villager,
            Role::Villager,
            Role::Seer,
        ]);
        s.transition(Phase::Night).unwrap();
        s.transition(Phase::DayDiscussion).unwrap();
        s
    }

    // ── Discussion order ─────────────────────────────────────────────────────

    #[test]
    fn test_discussion_order_rotates() {
        let living = [AgentId(1), AgentId(3), AgentId(4)];
        assert_eq!(discussion_order(&living, 0), living.to_vec());
        assert_eq!(discussion_order(&living, 1), vec![AgentId(3), AgentId(4), AgentId(1)]);
        assert_eq!(discussion_order(&living, 4), vec![AgentId(3), AgentId(4), AgentId(1)]);
        assert!(discussion_order(&[], 7).is_empty());
    }

    // ── Ballot ───────────────────────────────────────────────────────────────

    #[test]
    fn test_ballot_tallies_and_finds_leaders() {
        let s = five_villagers_and_a_wolf();
        let mut b = Ballot::new(1);
        b.cast(&s, vote(1, Some(2))).unwrap();
        b.cast(&s, vote(2, Some(1))).unwrap();
        b.cast(&s, vote(3, Some(1))).unwrap();
        b.cast(&s, vote(4, None)).unwrap();

        let tally = b.tally();
        assert_eq!(
            tally,
            vec![
                TallyEntry {
                    target: AgentId(1),
                    votes: 2
                },
                TallyEntry {
                    target: AgentId(2),
                    votes: 1
                },
            ]
        );
        assert_eq!(b.leaders(), vec![AgentId(1)]);
    }

    #[test]
    fn test_ballot_rejects_dead_and_repeat_voters() {
        let mut s = five_villagers_and_a_wolf();
        s.apply_death(wolfnet_contracts::action::Death {
            round: 1,
            agent: AgentId(5),
            cause: wolfnet_contracts::action::DeathCause::WerewolfKill,
        })
        .unwrap();

        let mut b = Ballot::new(1);
        assert_eq!(
            b.cast(&s, vote(5, Some(1))).unwrap_err(),
            WolfnetError::IneligibleVoter { voter: AgentId(5) }
        );
        b.cast(&s, vote(2, Some(1))).unwrap();
        assert!(matches!(
            b.cast(&s, vote(2, Some(3))).unwrap_err(),
            WolfnetError::IneligibleVoter { .. }
        ));
        assert!(matches!(
            b.cast(&s, vote(3, Some(5))).unwrap_err(),
            WolfnetError::InvalidVoteTarget { .. }
        ));
        assert_eq!(b.votes().count(), 1);
    }

    #[test]
    fn test_runoff_ballot_only_accepts_candidates() {
        let s = five_villagers_and_a_wolf();
        let mut b = Ballot::runoff(1, &[AgentId(1), AgentId(2)]);
        assert!(b.is_runoff());
        assert!(b.cast(&s, vote(3, Some(4))).is_err());
        b.cast(&s, vote(3, Some(2))).unwrap();
        b.cast(&s, vote(4, None)).unwrap();
    }

    #[test]
    fn test_all_abstaining_ballot_has_no_leaders() {
        let s = five_villagers_and_a_wolf();
        let mut b = Ballot::new(1);
        b.cast(&s, vote(1, None)).unwrap();
        assert!(b.tally().is_empty());
        assert!(b.leaders().is_empty());
    }

    // ── Engine ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_discussion_records_passes_for_failed_turns() {
        let s = five_villagers_and_a_wolf();
        let ledger = TrustLedger::new();
        let sink = MemorySink::default();
        let adapters = fixture::adapters(vec![
            (1, Scripted::new().speak("I am a simple villager.")),
            (2, Scripted::new().garble(DecisionKind::Discussion)),
            (3, Scripted::new()),
            (4, Scripted::new().speak("Agent 1 sounds nervous.")),
            (5, Scripted::new()),
            (6, Scripted::new()),
        ]);
        let parser = TypedDecisionParser;
        let table = Table {
            adapters: &adapters,
            parser: &parser,
            sink: &sink,
        };

        let mut rejections = Vec::new();
        let statements = run_discussion(&table, &s, &ledger, &mut rejections).await.unwrap();

        assert_eq!(statements.len(), 6);
        assert_eq!(statements[0].speaker, AgentId(1));
        assert_eq!(statements[0].text.as_deref(), Some("I am a simple villager."));
        assert_eq!(statements[1].text, None);
        assert_eq!(rejections.len(), 1);
        assert!(matches!(
            rejections[0],
            WolfnetError::AdapterMalformedResponse { agent: AgentId(2), .. }
        ));

        let turns = sink
            .events()
            .iter()
            .filter(|e| matches!(e.kind, EventKind::DiscussionTurn { .. }))
            .count();
        assert_eq!(turns, 6);
    }

    #[tokio::test]
    async fn test_trust_keeps_valid_scores_and_rejects_the_rest() {
        let s = five_villagers_and_a_wolf();
        let mut ledger = TrustLedger::new();
        let sink = MemorySink::default();
        let adapters = fixture::adapters(vec![
            (
                1,
                Scripted::new()
                    .trust(2, 8.0)
                    .trust(1, 10.0) // self
                    .trust(3, 12.0) // out of range
                    .trust(9, 5.0), // unknown
            ),
            (2, Scripted::new().trust_all(5.0)),
            (3, Scripted::new()),
            (4, Scripted::new()),
            (5, Scripted::new()),
            (6, Scripted::new()),
        ]);
        let parser = TypedDecisionParser;
        let table = Table {
            adapters: &adapters,
            parser: &parser,
            sink: &sink,
        };

        let mut rejections = Vec::new();
        run_trust(&table, &s, &mut ledger, &[], &mut rejections).await.unwrap();

        // 1 valid from agent 1, 5 from agent 2.
        assert_eq!(ledger.len(), 6);
        assert_eq!(rejections.len(), 3);
        assert!(matches!(rejections[0], WolfnetError::InvalidTrustTarget { .. }));
        assert!(matches!(rejections[1], WolfnetError::InvalidTrustTarget { .. }));
        assert!(matches!(rejections[2], WolfnetError::ScoreOutOfRange { .. }));
    }

    #[tokio::test]
    async fn test_tied_vote_goes_to_runoff_and_resolves() {
        let mut s = five_villagers_and_a_wolf();
        s.transition(Phase::DayVote).unwrap();
        let ledger = TrustLedger::new();
        let sink = MemorySink::default();

        // First ballot: 1 and 2 get two votes each (3-way split otherwise).
        // Run-off: agent 1 gets three votes.
        let adapters = fixture::adapters(vec![
            (1, Scripted::new().vote(2).runoff_vote(Some(2))),
            (2, Scripted::new().vote(1).runoff_vote(Some(1))),
            (3, Scripted::new().vote(1).runoff_vote(Some(1))),
            (4, Scripted::new().vote(2).runoff_vote(Some(1))),
            (5, Scripted::new().vote(3).runoff_vote(None)),
            (6, Scripted::new().runoff_vote(None)),
        ]);
        let parser = TypedDecisionParser;
        let table = Table {
            adapters: &adapters,
            parser: &parser,
            sink: &sink,
        };

        let mut rejections = Vec::new();
        let outcome = run_vote(&table, &mut s, &ledger, &[], &mut rejections).await.unwrap();

        assert_eq!(outcome.tally[0].votes, 2);
        assert_eq!(outcome.tally[1].votes, 2);
        assert_eq!(outcome.resolution, VoteResolution::Eliminated);
        assert_eq!(outcome.eliminated, Some(AgentId(1)));
        let runoff = outcome.runoff.unwrap();
        assert_eq!(runoff[0].target, AgentId(1));
        assert_eq!(runoff[0].votes, 3);

        // 6 first-round ballots plus 6 run-off ballots are in the history.
        assert_eq!(s.votes().len(), 12);
        assert!(rejections.is_empty());
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e.kind, EventKind::RunoffStarted { .. })));
    }

    #[tokio::test]
    async fn test_repeated_tie_is_a_deadlock() {
        let mut s = five_villagers_and_a_wolf();
        s.transition(Phase::DayVote).unwrap();
        let ledger = TrustLedger::new();
        let sink = MemorySink::default();
        let adapters = fixture::adapters(vec![
            (1, Scripted::new().vote(2)),
            (2, Scripted::new().vote(1)),
            (3, Scripted::new().vote(1)),
            (4, Scripted::new().vote(2)),
            (5, Scripted::new()),
            (6, Scripted::new()),
        ]);
        let parser = TypedDecisionParser;
        let table = Table {
            adapters: &adapters,
            parser: &parser,
            sink: &sink,
        };

        let mut rejections = Vec::new();
        let outcome = run_vote(&table, &mut s, &ledger, &[], &mut rejections).await.unwrap();

        assert_eq!(outcome.resolution, VoteResolution::DeadlockedRunoff);
        assert_eq!(outcome.eliminated, None);
        assert!(s.living().len() == 6);
    }

    #[tokio::test]
    async fn test_invalid_vote_target_counts_as_abstention() {
        let mut s = five_villagers_and_a_wolf();
        s.transition(Phase::DayVote).unwrap();
        let ledger = TrustLedger::new();
        let sink = MemorySink::default();
        let adapters = fixture::adapters(vec![
            (1, Scripted::new().vote(42)),
            (2, Scripted::new().vote(1)),
            (3, Scripted::new()),
            (4, Scripted::new()),
            (5, Scripted::new()),
            (6, Scripted::new()),
        ]);
        let parser = TypedDecisionParser;
        let table = Table {
            adapters: &adapters,
            parser: &parser,
            sink: &sink,
        };

        let mut rejections = Vec::new();
        let outcome = run_vote(&table, &mut s, &ledger, &[], &mut rejections).await.unwrap();

        assert_eq!(outcome.eliminated, Some(AgentId(1)));
        assert_eq!(rejections.len(), 1);
        assert!(matches!(rejections[0], WolfnetError::InvalidVoteTarget { .. }));
        assert_eq!(s.votes()[0].target, None);
    }

    #[tokio::test]
    async fn test_nobody_voting_is_no_votes() {
        let mut s = five_villagers_and_a_wolf();
        s.transition(Phase::DayVote).unwrap();
        let ledger = TrustLedger::new();
        let sink = MemorySink::default();
        let adapters = fixture::adapters((1..=6).map(|id| (id, Scripted::new())).collect());
        let parser = TypedDecisionParser;
        let table = Table {
            adapters: &adapters,
            parser: &parser,
            sink: &sink,
        };

        let mut rejections = Vec::new();
        let outcome = run_vote(&table, &mut s, &ledger, &[], &mut rejections).await.unwrap();
        assert_eq!(outcome.resolution, VoteResolution::NoVotes);
        assert!(outcome.runoff.is_none());
    }

    #[tokio::test]
    async fn test_hunter_shot_rejects_invalid_targets() {
        let mut s = fixture::state(&[Role::Werewolf, Role::Hunter, Role::Villager, Role::Villager]);
        s.transition(Phase::Night).unwrap();
        s.apply_death(wolfnet_contracts::action::Death {
            round: 1,
            agent: AgentId(2),
            cause: wolfnet_contracts::action::DeathCause::WerewolfKill,
        })
        .unwrap();
        let ledger = TrustLedger::new();
        let sink = MemorySink::default();
        let parser = TypedDecisionParser;

        let adapters = fixture::adapters(vec![(2, Scripted::new().shoot(2))]);
        let table = Table {
            adapters: &adapters,
            parser: &parser,
            sink: &sink,
        };
        let mut rejections = Vec::new();
        let shot = run_revenge_shot(&table, &mut s, &ledger, AgentId(2), &mut rejections)
            .await
            .unwrap();
        assert_eq!(shot, None);
        assert!(matches!(rejections[0], WolfnetError::InvalidShotTarget { .. }));
        assert!(s.seat(AgentId(2)).unwrap().can_shoot(), "a rejected shot is not spent");

        let adapters = fixture::adapters(vec![(2, Scripted::new().shoot(1))]);
        let table = Table {
            adapters: &adapters,
            parser: &parser,
            sink: &sink,
        };
        let shot = run_revenge_shot(&table, &mut s, &ledger, AgentId(2), &mut rejections)
            .await
            .unwrap();
        assert_eq!(shot, Some(AgentId(1)));
        assert!(!s.seat(AgentId(2)).unwrap().can_shoot());
    }
}
