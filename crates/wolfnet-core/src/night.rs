//! The night engine.
//!
//! Collect every eligible agent's plan, validate each requested action on its
//! own, then resolve the accepted batch in a fixed priority order:
//!
//! 1. protection (witch heal) cancels the werewolf kill on its target
//! 2. poison kills its target
//! 3. investigations reveal the target's faction to the seer
//! 4. the werewolf kill lands, unless cancelled or its victim already died
//!
//! Resolution is a pure function of the accepted actions: submission order
//! and arrival order never change the outcome.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use wolfnet_contracts::{
    action::{Death, DeathCause, Investigation, NightAction, NightOutcome},
    agent::AgentId,
    decision::{Decision, DecisionKind, NightChoice},
    error::{WolfnetError, WolfnetResult},
    event::EventKind,
    role::{NightActionKind, Role},
};

use crate::{
    collect::{Prompt, Table},
    ledger::TrustLedger,
    roles::capabilities_of,
    state::GameState,
};

/// Everything a resolved night changes.
#[derive(Debug, Clone, PartialEq)]
pub struct NightResolution {
    pub outcome: NightOutcome,
    /// (seer, result), ascending by seer.
    pub investigations: Vec<(AgentId, Investigation)>,
    /// Limited-use abilities spent tonight, ascending by actor.
    pub consumed: Vec<(AgentId, NightActionKind)>,
}

/// Run the night phase of the current round.
pub(crate) async fn run_night(
    table: &Table<'_>,
    state: &mut GameState,
    ledger: &TrustLedger,
    rejections: &mut Vec<WolfnetError>,
) -> WolfnetResult<NightOutcome> {
    let round = state.round();
    let eligible: Vec<AgentId> = state
        .seats()
        .filter(|s| s.alive && s.has_usable_night_ability())
        .map(|s| s.profile.id)
        .collect();

    let mut collected = table
        .gather(state, ledger, DecisionKind::NightAction, &eligible, Prompt::default())
        .await?;
    table.reject_failures(state, DecisionKind::NightAction, &mut collected, rejections)?;

    let mut accepted = Vec::new();
    let mut submitted = BTreeSet::new();
    for (actor, decision) in collected.decisions {
        let Decision::NightAction(plan) = decision else {
            continue;
        };
        for choice in plan.actions {
            match validate_choice(state, round, actor, &choice, &mut submitted) {
                Ok(action) => {
                    debug!(round, actor = %actor, kind = %action.kind, target = %action.target, "night action accepted");
                    table.emit(state, EventKind::NightActionSubmitted { action: action.clone() })?;
                    accepted.push(action);
                }
                Err(e) => table.reject(state, actor, DecisionKind::NightAction, e, rejections)?,
            }
        }
    }

    let resolution = resolve_night(round, &accepted, state);
    for &(actor, kind) in &resolution.consumed {
        state.consume(actor, kind)?;
    }
    for (seer, investigation) in &resolution.investigations {
        state.record_investigation(*seer, investigation.clone())?;
    }
    for death in &resolution.outcome.deaths {
        state.apply_death(death.clone())?;
    }

    info!(
        round,
        deaths = resolution.outcome.deaths.len(),
        suppressed = resolution.outcome.suppressed.len(),
        "night resolved"
    );
    table.emit(
        state,
        EventKind::NightOutcome {
            outcome: resolution.outcome.clone(),
        },
    )?;
    Ok(resolution.outcome)
}

/// Check one requested action against the current state.
///
/// `submitted` tracks (actor, kind) pairs already requested tonight; each
/// ability may be requested once per night, whether or not the first request
/// was valid.
fn validate_choice(
    state: &GameState,
    round: u32,
    actor: AgentId,
    choice: &NightChoice,
    submitted: &mut BTreeSet<(AgentId, NightActionKind)>,
) -> WolfnetResult<NightAction> {
    let seat = state
        .seat(actor)
        .ok_or_else(|| WolfnetError::invariant(format!("night action from unknown agent {actor}")))?;
    let kind = choice.kind;
    let illegal = |reason: String| WolfnetError::IllegalAction {
        agent: actor,
        action: kind.to_string(),
        reason,
    };

    if capabilities_of(seat.role()).ability(kind).is_none() {
        return Err(illegal(format!("role {} has no {} ability", seat.role(), kind)));
    }
    if !submitted.insert((actor, kind)) {
        return Err(illegal("ability already requested this night".into()));
    }
    if !seat.can_use(kind) {
        return Err(illegal("no uses left".into()));
    }

    let bad_target = |reason: String| WolfnetError::InvalidNightTarget { agent: actor, reason };
    let target = choice
        .target
        .ok_or_else(|| bad_target(format!("{kind} requires a target")))?;
    let Some(target_seat) = state.seat(target) else {
        return Err(bad_target(format!("{target} is not in the game")));
    };
    if !target_seat.alive {
        return Err(bad_target(format!("{target} is dead")));
    }

    match kind {
        NightActionKind::Kill if target_seat.role() == Role::Werewolf => {
            return Err(bad_target(format!("{target} is a werewolf")));
        }
        NightActionKind::Investigate if target == actor => {
            return Err(bad_target("the seer cannot investigate itself".into()));
        }
        NightActionKind::Investigate if seat.investigations.iter().any(|i| i.target == target) => {
            return Err(bad_target(format!("{target} was already investigated")));
        }
        NightActionKind::Poison if target == actor => {
            return Err(bad_target("the witch cannot poison itself".into()));
        }
        _ => {}
    }

    Ok(NightAction {
        round,
        actor,
        kind,
        target,
    })
}

/// Resolve a batch of validated night actions.
///
/// Pure: reads roles from `state` but changes nothing. The batch is sorted
/// before resolution, so any permutation of `actions` yields the same value.
pub fn resolve_night(round: u32, actions: &[NightAction], state: &GameState) -> NightResolution {
    let mut actions = actions.to_vec();
    actions.sort_by_key(|a| (a.actor, a.kind, a.target));

    let targets_of = |kind: NightActionKind| -> BTreeSet<AgentId> {
        actions.iter().filter(|a| a.kind == kind).map(|a| a.target).collect()
    };
    let healed = targets_of(NightActionKind::Heal);
    let poisoned = targets_of(NightActionKind::Poison);

    // Werewolves vote on a victim: most picks wins, ties go to the lowest id.
    let mut picks: BTreeMap<AgentId, u32> = BTreeMap::new();
    for a in actions.iter().filter(|a| a.kind == NightActionKind::Kill) {
        *picks.entry(a.target).or_insert(0) += 1;
    }
    let mut victim: Option<(AgentId, u32)> = None;
    for (&target, &count) in &picks {
        if victim.map_or(true, |(_, best)| count > best) {
            victim = Some((target, count));
        }
    }
    let victim = victim.map(|(target, _)| target);

    let mut deaths = Vec::new();
    let mut suppressed = Vec::new();

    // 1. protection
    let kill = match victim {
        Some(target) if healed.contains(&target) => {
            suppressed.push(target);
            None
        }
        other => other,
    };

    // 2. poison; a heal never counters it
    for &target in &poisoned {
        deaths.push(Death {
            round,
            agent: target,
            cause: DeathCause::Poison,
        });
    }

    // 3. investigation
    let investigations = actions
        .iter()
        .filter(|a| a.kind == NightActionKind::Investigate)
        .filter_map(|a| {
            state.role_of(a.target).map(|role| {
                (
                    a.actor,
                    Investigation {
                        round,
                        target: a.target,
                        faction: role.faction(),
                    },
                )
            })
        })
        .collect();

    // 4. kill
    if let Some(target) = kill {
        if !poisoned.contains(&target) {
            deaths.push(Death {
                round,
                agent: target,
                cause: DeathCause::WerewolfKill,
            });
        }
    }

    deaths.sort_by_key(|d| d.agent);

    let consumed = actions
        .iter()
        .filter(|a| {
            state
                .role_of(a.actor)
                .and_then(|role| capabilities_of(role).ability(a.kind))
                .is_some_and(|ability| ability.uses_per_game.is_some())
        })
        .map(|a| (a.actor, a.kind))
        .collect();

    NightResolution {
        outcome: NightOutcome {
            round,
            deaths,
            suppressed,
        },
        investigations,
        consumed,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wolfnet_contracts::{game::Phase, role::Faction};

    use super::*;
    use crate::test_support::{fixture, MemorySink, Scripted};

    fn action(actor: u32, kind: NightActionKind, target: u32) -> NightAction {
        NightAction {
            round: 1,
            actor: AgentId(actor),
            kind,
            target: AgentId(target),
        }
    }

    // Roster used by the pure resolution tests:
    // 1 werewolf, 2 werewolf, 3 seer, 4 witch, 5 villager, 6 hunter
    fn six() -> GameState {
        fixture::state(&[
            Role::Werewolf,
            Role::Werewolf,
            Role::Seer,
            Role::Witch,
            Role::Villager,
            Role::Hunter,
        ])
    }

    // ── Pure resolution ──────────────────────────────────────────────────────

    #[test]
    fn test_quiet_night_has_no_deaths() {
        let s = six();
        let r = resolve_night(1, &[], &s);
        assert!(r.outcome.deaths.is_empty());
        assert!(r.outcome.suppressed.is_empty());
        assert!(r.consumed.is_empty());
    }

    #[test]
    fn test_heal_suppresses_the_kill() {
        let s = six();
        let r = resolve_night(
            1,
            &[
                action(1, NightActionKind::Kill, 5),
                action(4, NightActionKind::Heal, 5),
            ],
            &s,
        );
        assert!(r.outcome.deaths.is_empty());
        assert_eq!(r.outcome.suppressed, vec![AgentId(5)]);
        assert_eq!(r.consumed, vec![(AgentId(4), NightActionKind::Heal)]);
    }

    #[test]
    fn test_poison_and_kill_on_the_same_target_is_one_death() {
        let s = six();
        let r = resolve_night(
            1,
            &[
                action(1, NightActionKind::Kill, 5),
                action(4, NightActionKind::Poison, 5),
            ],
            &s,
        );
        assert_eq!(r.outcome.deaths.len(), 1);
        assert_eq!(r.outcome.deaths[0].cause, DeathCause::Poison);
    }

    #[test]
    fn test_poison_and_kill_on_different_targets_are_two_deaths_in_id_order() {
        let s = six();
        let r = resolve_night(
            1,
            &[
                action(4, NightActionKind::Poison, 2),
                action(1, NightActionKind::Kill, 6),
            ],
            &s,
        );
        let dead: Vec<(AgentId, DeathCause)> = r.outcome.deaths.iter().map(|d| (d.agent, d.cause)).collect();
        assert_eq!(
            dead,
            vec![
                (AgentId(2), DeathCause::Poison),
                (AgentId(6), DeathCause::WerewolfKill),
            ]
        );
    }

    #[test]
    fn test_heal_does_not_counter_poison() {
        let s = six();
        let r = resolve_night(
            1,
            &[
                action(1, NightActionKind::Kill, 3),
                action(4, NightActionKind::Heal, 5),
                action(4, NightActionKind::Poison, 5),
            ],
            &s,
        );
        let dead: Vec<(AgentId, DeathCause)> = r.outcome.deaths.iter().map(|d| (d.agent, d.cause)).collect();
        assert_eq!(
            dead,
            vec![
                (AgentId(3), DeathCause::WerewolfKill),
                (AgentId(5), DeathCause::Poison),
            ]
        );
        assert!(r.outcome.suppressed.is_empty(), "the heal saved nobody");
        assert_eq!(r.consumed.len(), 2, "both potions are spent");
        assert!(r.consumed.contains(&(AgentId(4), NightActionKind::Heal)));
        assert!(r.consumed.contains(&(AgentId(4), NightActionKind::Poison)));
    }

    #[test]
    fn test_healed_kill_victim_still_dies_to_poison() {
        let s = six();
        let r = resolve_night(
            1,
            &[
                action(1, NightActionKind::Kill, 5),
                action(4, NightActionKind::Heal, 5),
                action(4, NightActionKind::Poison, 5),
            ],
            &s,
        );
        let dead: Vec<(AgentId, DeathCause)> = r.outcome.deaths.iter().map(|d| (d.agent, d.cause)).collect();
        assert_eq!(dead, vec![(AgentId(5), DeathCause::Poison)]);
        assert_eq!(r.outcome.suppressed, vec![AgentId(5)], "the kill itself was stopped");
    }

    #[test]
    fn test_split_werewolf_picks_go_to_the_lowest_id() {
        let s = six();
        let r = resolve_night(
            1,
            &[
                action(1, NightActionKind::Kill, 6),
                action(2, NightActionKind::Kill, 5),
            ],
            &s,
        );
        assert_eq!(r.outcome.deaths[0].agent, AgentId(5));
    }

    #[test]
    fn test_investigation_reveals_faction() {
        let s = six();
        let r = resolve_night(1, &[action(3, NightActionKind::Investigate, 2)], &s);
        assert_eq!(r.investigations.len(), 1);
        assert_eq!(r.investigations[0].0, AgentId(3));
        assert_eq!(r.investigations[0].1.faction, Faction::Werewolf);
        assert!(r.consumed.is_empty(), "investigation is unlimited");
    }

    #[test]
    fn test_resolution_ignores_submission_order() {
        let s = six();
        let batch = vec![
            action(1, NightActionKind::Kill, 6),
            action(2, NightActionKind::Kill, 5),
            action(3, NightActionKind::Investigate, 1),
            action(4, NightActionKind::Heal, 5),
            action(4, NightActionKind::Poison, 6),
        ];

        let expected = resolve_night(1, &batch, &s);
        let expected_json = serde_json::to_string(&expected.outcome).unwrap();

        // Every rotation plus the reversal.
        let mut orders: Vec<Vec<NightAction>> = (0..batch.len())
            .map(|k| {
                let mut v = batch.clone();
                v.rotate_left(k);
                v
            })
            .collect();
        orders.push(batch.iter().rev().cloned().collect());

        for order in orders {
            let r = resolve_night(1, &order, &s);
            assert_eq!(r, expected);
            assert_eq!(serde_json::to_string(&r.outcome).unwrap(), expected_json);
        }
    }

    // ── Engine ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_engine_rejects_illegal_actions_and_keeps_the_rest() {
        let mut s = six();
        s.transition(Phase::Night).unwrap();
        let ledger = TrustLedger::new();
        let sink = MemorySink::default();

        let adapters = fixture::adapters(vec![
            // Wolf targets its ally: rejected.
            (1, Scripted::new().night(NightActionKind::Kill, Some(2))),
            // Wolf targets the villager: accepted.
            (2, Scripted::new().night(NightActionKind::Kill, Some(5))),
            // Seer investigates itself: rejected.
            (3, Scripted::new().night(NightActionKind::Investigate, Some(3))),
            // Witch tries to kill: rejected; poison with no target: rejected.
            (
                4,
                Scripted::new()
                    .night(NightActionKind::Kill, Some(6))
                    .night(NightActionKind::Poison, None),
            ),
            (5, Scripted::new()),
            (6, Scripted::new()),
        ]);
        let parser = crate::traits::TypedDecisionParser;
        let table = Table {
            adapters: &adapters,
            parser: &parser,
            sink: &sink,
        };

        let mut rejections = Vec::new();
        let outcome = run_night(&table, &mut s, &ledger, &mut rejections).await.unwrap();

        assert_eq!(outcome.deaths.len(), 1);
        assert_eq!(outcome.deaths[0].agent, AgentId(5));
        assert!(!s.is_alive(AgentId(5)));

        assert_eq!(rejections.len(), 4);
        assert!(matches!(rejections[0], WolfnetError::InvalidNightTarget { agent: AgentId(1), .. }));
        assert!(matches!(rejections[1], WolfnetError::InvalidNightTarget { agent: AgentId(3), .. }));
        assert!(matches!(rejections[2], WolfnetError::IllegalAction { agent: AgentId(4), .. }));
        assert!(matches!(rejections[3], WolfnetError::InvalidNightTarget { agent: AgentId(4), .. }));

        // Nothing valid from the witch, so both potions remain.
        assert!(s.seat(AgentId(4)).unwrap().can_use(NightActionKind::Poison));

        let events = sink.events();
        let submitted = events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::NightActionSubmitted { .. }))
            .count();
        assert_eq!(submitted, 1);
        assert!(matches!(
            events.last().map(|e| &e.kind),
            Some(EventKind::NightOutcome { .. })
        ));
    }

    #[tokio::test]
    async fn test_only_agents_with_usable_abilities_are_asked() {
        let mut s = fixture::state(&[Role::Werewolf, Role::Villager, Role::Villager, Role::Hunter]);
        s.transition(Phase::Night).unwrap();
        let ledger = TrustLedger::new();
        let sink = MemorySink::default();

        let wolf = Arc::new(Scripted::new().night(NightActionKind::Kill, Some(2)));
        let villager = Arc::new(Scripted::new());
        let adapters = fixture::adapters_from(vec![
            (1, wolf.clone()),
            (2, villager.clone()),
            (3, Arc::new(Scripted::new())),
            (4, Arc::new(Scripted::new())),
        ]);
        let parser = crate::traits::TypedDecisionParser;
        let table = Table {
            adapters: &adapters,
            parser: &parser,
            sink: &sink,
        };

        let mut rejections = Vec::new();
        run_night(&table, &mut s, &ledger, &mut rejections).await.unwrap();

        assert_eq!(wolf.calls(DecisionKind::NightAction), 1);
        assert_eq!(villager.calls(DecisionKind::NightAction), 0);
        assert!(rejections.is_empty());
    }

    #[tokio::test]
    async fn test_second_request_for_the_same_ability_is_rejected() {
        let mut s = six();
        s.transition(Phase::Night).unwrap();
        let ledger = TrustLedger::new();
        let sink = MemorySink::default();

        let adapters = fixture::adapters(vec![
            (1, Scripted::new()),
            (2, Scripted::new()),
            (
                3,
                Scripted::new()
                    .night(NightActionKind::Investigate, Some(1))
                    .night(NightActionKind::Investigate, Some(2)),
            ),
            (4, Scripted::new()),
            (5, Scripted::new()),
            (6, Scripted::new()),
        ]);
        let parser = crate::traits::TypedDecisionParser;
        let table = Table {
            adapters: &adapters,
            parser: &parser,
            sink: &sink,
        };

        let mut rejections = Vec::new();
        run_night(&table, &mut s, &ledger, &mut rejections).await.unwrap();

        assert_eq!(rejections.len(), 1);
        assert!(matches!(rejections[0], WolfnetError::IllegalAction { agent: AgentId(3), .. }));
        let known = &s.seat(AgentId(3)).unwrap().investigations;
        assert_eq!(known.len(), 1);
        assert_eq!(known[0].target, AgentId(1));
    }
}
