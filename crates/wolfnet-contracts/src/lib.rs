//! # wolfnet-contracts
//!
//! Shared types, events, and the error taxonomy for the wolfnet werewolf
//! simulation.
//!
//! All crates in the workspace import from here. No game rules live in this
//! crate: only data definitions, the typed decision parser, and error types.

pub mod action;
pub mod agent;
pub mod decision;
pub mod error;
pub mod event;
pub mod game;
pub mod role;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use action::TrustEntry;
    use agent::{AgentId, GameId};
    use decision::{Decision, DecisionKind, NightChoice, NightPlan, RawDecision, VoteChoice};
    use error::WolfnetError;
    use game::Phase;
    use role::{Faction, NightActionKind, Role};

    // ── Roles ────────────────────────────────────────────────────────────────

    #[test]
    fn test_only_werewolves_belong_to_the_werewolf_faction() {
        for role in Role::ALL {
            let expected = if role == Role::Werewolf {
                Faction::Werewolf
            } else {
                Faction::Village
            };
            assert_eq!(role.faction(), expected, "faction of {role}");
        }
    }

    // ── Phase transitions ────────────────────────────────────────────────────

    #[test]
    fn test_phase_cycle_is_legal() {
        assert!(Phase::Setup.can_transition_to(Phase::Night));
        assert!(Phase::Night.can_transition_to(Phase::DayDiscussion));
        assert!(Phase::DayDiscussion.can_transition_to(Phase::DayVote));
        assert!(Phase::DayVote.can_transition_to(Phase::Night));
        assert!(Phase::Night.can_transition_to(Phase::Ended));
        assert!(Phase::DayVote.can_transition_to(Phase::Ended));
    }

    #[test]
    fn test_phase_shortcuts_and_exits_from_ended_are_illegal() {
        assert!(!Phase::Night.can_transition_to(Phase::DayVote));
        assert!(!Phase::DayVote.can_transition_to(Phase::DayDiscussion));
        assert!(!Phase::Ended.can_transition_to(Phase::Night));
        assert!(!Phase::Ended.can_transition_to(Phase::Ended));
        assert!(!Phase::Setup.can_transition_to(Phase::DayDiscussion));
    }

    // ── Decision parsing ─────────────────────────────────────────────────────

    #[test]
    fn test_night_plan_parses_from_raw() {
        let raw = RawDecision::new(
            "night_action",
            json!({ "actions": [{ "kind": "heal", "target": 3 }, { "kind": "poison", "target": 5 }] }),
        );
        let decision = Decision::from_raw(AgentId(1), DecisionKind::NightAction, &raw).unwrap();

        assert_eq!(
            decision,
            Decision::NightAction(NightPlan {
                actions: vec![
                    NightChoice { kind: NightActionKind::Heal, target: Some(AgentId(3)) },
                    NightChoice { kind: NightActionKind::Poison, target: Some(AgentId(5)) },
                ],
            })
        );
    }

    #[test]
    fn test_kind_mismatch_is_malformed() {
        let raw = RawDecision::new("vote", json!({ "target": 2 }));
        let err = Decision::from_raw(AgentId(4), DecisionKind::NightAction, &raw).unwrap_err();

        match err {
            WolfnetError::AdapterMalformedResponse { agent, reason } => {
                assert_eq!(agent, AgentId(4));
                assert!(reason.contains("night_action"), "reason: {reason}");
            }
            other => panic!("expected AdapterMalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_payload_shape_is_malformed() {
        let raw = RawDecision::new("vote", json!({ "target": "the quiet one" }));
        let err = Decision::from_raw(AgentId(2), DecisionKind::Vote, &raw).unwrap_err();
        assert!(matches!(err, WolfnetError::AdapterMalformedResponse { .. }));
    }

    #[test]
    fn test_missing_vote_fields_default_to_abstain() {
        let raw = RawDecision::new("vote", json!({}));
        let decision = Decision::from_raw(AgentId(2), DecisionKind::Vote, &raw).unwrap();
        assert_eq!(decision, Decision::Vote(VoteChoice::default()));
    }

    #[test]
    fn test_pass_parses_back_as_fallback() {
        for kind in [
            DecisionKind::NightAction,
            DecisionKind::Discussion,
            DecisionKind::TrustScores,
            DecisionKind::Vote,
            DecisionKind::RevengeShot,
        ] {
            let raw = RawDecision::pass(kind);
            assert_eq!(raw.kind, kind.as_str());
            let parsed = Decision::from_raw(AgentId(1), kind, &raw).unwrap();
            assert_eq!(parsed, Decision::fallback(kind), "pass for {kind}");
        }
    }

    // ── Trust score range ────────────────────────────────────────────────────

    #[test]
    fn test_trust_score_range_is_closed() {
        assert!(TrustEntry::score_in_range(0.0));
        assert!(TrustEntry::score_in_range(10.0));
        assert!(TrustEntry::score_in_range(6.5));
        assert!(!TrustEntry::score_in_range(-0.1));
        assert!(!TrustEntry::score_in_range(10.01));
        assert!(!TrustEntry::score_in_range(f64::NAN));
        assert!(!TrustEntry::score_in_range(f64::INFINITY));
    }

    // ── Ids ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_agent_ids_order_numerically() {
        let mut ids = vec![AgentId(10), AgentId(2), AgentId(1)];
        ids.sort();
        assert_eq!(ids, vec![AgentId(1), AgentId(2), AgentId(10)]);
        assert_eq!(AgentId(7).to_string(), "P7");
    }

    #[test]
    fn test_game_id_new_produces_unique_values() {
        let unique: std::collections::HashSet<String> =
            (0..100).map(|_| GameId::new().to_string()).collect();
        assert_eq!(unique.len(), 100);
    }

    // ── Error classification ─────────────────────────────────────────────────

    #[test]
    fn test_structural_errors_are_fatal() {
        assert!(WolfnetError::invariant("winner declared twice").is_fatal());
        assert!(WolfnetError::RecordWriteFailed { reason: "closed".into() }.is_fatal());
        assert!(WolfnetError::ConfigError { reason: "no werewolves".into() }.is_fatal());
    }

    #[test]
    fn test_per_decision_errors_are_recoverable() {
        let recoverable = [
            WolfnetError::IllegalAction {
                agent: AgentId(1),
                action: "poison".into(),
                reason: "villagers have no night ability".into(),
            },
            WolfnetError::InvalidVoteTarget { voter: AgentId(1), target: AgentId(9) },
            WolfnetError::AdapterTimeout {
                agent: AgentId(1),
                operation: "vote".into(),
                budget_ms: 100,
            },
            WolfnetError::DuplicateTrustEntry {
                round: 1,
                observer: AgentId(1),
                observed: AgentId(2),
            },
        ];
        for err in recoverable {
            assert!(!err.is_fatal(), "{err} should be recoverable");
        }
    }

    #[test]
    fn test_error_messages_name_the_agents() {
        let err = WolfnetError::ScoreOutOfRange {
            round: 2,
            observer: AgentId(1),
            observed: AgentId(3),
            score: 11.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("P1"));
        assert!(msg.contains("P3"));
        assert!(msg.contains("out of range"));
    }
}
