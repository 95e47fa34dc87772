//! A deterministic rule-based player.
//!
//! Every answer is a pure function of the decision context, so a table of
//! heuristic players replays identically under parallel and sequential
//! collection. The player keeps a belief score per living agent:
//!
//! - its own latest trust score for that agent, or 5 when it has none;
//! - a seer claim heard today sets the belief to 1 (werewolf) or 8
//!   (villager), unless the claimant is already distrusted;
//! - its own investigations set 0 or 9;
//! - a werewolf trusts its allies fully.
//!
//! Every hostile act (kill, vote, poison, shot) aims at the least trusted
//! eligible agent, lowest id first on ties.

use std::collections::BTreeMap;

use async_trait::async_trait;

use wolfnet_contracts::{
    agent::AgentId,
    decision::{
        Decision, DecisionContext, DiscussionTurn, NightChoice, NightPlan, RawDecision, ShotChoice, TrustBatch,
        TrustScore, VoteChoice,
    },
    error::WolfnetResult,
    role::{Faction, NightActionKind, Role},
};
use wolfnet_core::traits::AgentAdapter;

const NEUTRAL: f64 = 5.0;
/// At or below this a belief counts as a known werewolf.
const CONVICTED: f64 = 2.0;
const CLAIM_PREFIX: &str = "Seer result: ";

/// The discussion line a heuristic seer uses to publish a result.
pub fn seer_claim(target: AgentId, faction: Faction) -> String {
    let verdict = match faction {
        Faction::Werewolf => "a werewolf",
        Faction::Village => "a villager",
    };
    format!("{CLAIM_PREFIX}{target} is {verdict}.")
}

/// Read a line produced by [`seer_claim`] back.
pub fn parse_claim(text: &str) -> Option<(AgentId, Faction)> {
    let rest = text.strip_prefix(CLAIM_PREFIX)?.strip_prefix('P')?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let target = AgentId(digits.parse().ok()?);
    let verdict = &rest[digits.len()..];
    if verdict.starts_with(" is a werewolf") {
        Some((target, Faction::Werewolf))
    } else if verdict.starts_with(" is a villager") {
        Some((target, Faction::Village))
    } else {
        None
    }
}

/// Belief score for every living agent other than the asker.
pub fn beliefs(ctx: &DecisionContext) -> BTreeMap<AgentId, f64> {
    let mut beliefs: BTreeMap<AgentId, f64> = ctx.living_others().map(|id| (id, NEUTRAL)).collect();

    // Oldest first, so the latest score wins.
    for entry in &ctx.own_trust {
        if let Some(b) = beliefs.get_mut(&entry.observed) {
            *b = entry.score;
        }
    }

    for statement in &ctx.discussion {
        let Some((target, faction)) = statement.text.as_deref().and_then(parse_claim) else {
            continue;
        };
        if statement.speaker == ctx.me.id || beliefs.get(&statement.speaker).is_some_and(|b| *b <= CONVICTED) {
            continue;
        }
        if let Some(b) = beliefs.get_mut(&target) {
            *b = match faction {
                Faction::Werewolf => 1.0,
                Faction::Village => 8.0,
            };
        }
    }

    for investigation in &ctx.private.investigations {
        if let Some(b) = beliefs.get_mut(&investigation.target) {
            *b = match investigation.faction {
                Faction::Werewolf => 0.0,
                Faction::Village => 9.0,
            };
        }
    }

    for ally in &ctx.private.allies {
        if let Some(b) = beliefs.get_mut(ally) {
            *b = 10.0;
        }
    }

    beliefs
}

/// The least trusted agent accepted by `eligible`, lowest id on ties.
fn least_trusted(beliefs: &BTreeMap<AgentId, f64>, eligible: impl Fn(AgentId) -> bool) -> Option<(AgentId, f64)> {
    beliefs
        .iter()
        .filter(|(id, _)| eligible(**id))
        .fold(None, |best: Option<(AgentId, f64)>, (&id, &score)| match best {
            Some((_, lowest)) if lowest <= score => best,
            _ => Some((id, score)),
        })
}

/// Deterministic rule-based adapter. Stateless: everything it knows comes
/// from the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAdapter;

impl HeuristicAdapter {
    fn night_plan(ctx: &DecisionContext) -> NightPlan {
        let me = ctx.me.id;
        let beliefs = beliefs(ctx);
        let mut actions = Vec::new();

        match ctx.me.role {
            Role::Werewolf => {
                let allies = &ctx.private.allies;
                if let Some((target, _)) = least_trusted(&beliefs, |id| !allies.contains(&id)) {
                    actions.push(NightChoice {
                        kind: NightActionKind::Kill,
                        target: Some(target),
                    });
                }
            }
            Role::Seer => {
                let unchecked = ctx
                    .living_others()
                    .find(|id| ctx.private.investigations.iter().all(|i| i.target != *id));
                if let Some(target) = unchecked {
                    actions.push(NightChoice {
                        kind: NightActionKind::Investigate,
                        target: Some(target),
                    });
                }
            }
            Role::Witch => {
                if ctx.private.heal_available && ctx.round == 1 {
                    actions.push(NightChoice {
                        kind: NightActionKind::Heal,
                        target: Some(me),
                    });
                }
                if ctx.private.poison_available {
                    if let Some((target, score)) = least_trusted(&beliefs, |_| true) {
                        if score <= CONVICTED {
                            actions.push(NightChoice {
                                kind: NightActionKind::Poison,
                                target: Some(target),
                            });
                        }
                    }
                }
            }
            Role::Villager | Role::Hunter => {}
        }

        NightPlan { actions }
    }

    fn discussion(ctx: &DecisionContext) -> DiscussionTurn {
        let beliefs = beliefs(ctx);

        if ctx.me.role == Role::Seer {
            let living = |id: AgentId| ctx.is_alive(id);
            let investigations = &ctx.private.investigations;
            let exposed = investigations
                .iter()
                .rev()
                .find(|i| i.faction == Faction::Werewolf && living(i.target));
            if let Some(i) = exposed.or_else(|| investigations.iter().rev().find(|i| living(i.target))) {
                return DiscussionTurn {
                    text: Some(seer_claim(i.target, i.faction)),
                };
            }
        }

        let allies = &ctx.private.allies;
        let text = match least_trusted(&beliefs, |id| !allies.contains(&id)) {
            Some((suspect, score)) if score < NEUTRAL || ctx.me.role == Role::Werewolf => {
                format!("I have my doubts about {suspect}.")
            }
            _ => "Nothing stands out to me yet.".to_string(),
        };
        DiscussionTurn { text: Some(text) }
    }

    fn trust_batch(ctx: &DecisionContext) -> TrustBatch {
        TrustBatch {
            scores: beliefs(ctx)
                .into_iter()
                .map(|(target, score)| TrustScore {
                    target,
                    score: score.clamp(0.0, 10.0),
                })
                .collect(),
        }
    }

    fn vote(ctx: &DecisionContext) -> VoteChoice {
        let beliefs = beliefs(ctx);
        let allies = &ctx.private.allies;
        let on_ballot = |id: AgentId| ctx.candidates.as_ref().map_or(true, |c| c.contains(&id));

        match least_trusted(&beliefs, |id| on_ballot(id) && !allies.contains(&id)) {
            Some((target, score)) => VoteChoice {
                target: Some(target),
                rationale: format!("lowest trust at {score:.1}"),
            },
            None => VoteChoice {
                target: None,
                rationale: "no one on the ballot I would vote out".to_string(),
            },
        }
    }

    fn shot(ctx: &DecisionContext) -> ShotChoice {
        let target = least_trusted(&beliefs(ctx), |_| true)
            .filter(|(_, score)| *score < NEUTRAL)
            .map(|(id, _)| id);
        ShotChoice { target }
    }
}

#[async_trait]
impl AgentAdapter for HeuristicAdapter {
    async fn produce_night_action(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Ok(Decision::NightAction(Self::night_plan(ctx)).into_raw())
    }

    async fn produce_discussion_turn(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Ok(Decision::Discussion(Self::discussion(ctx)).into_raw())
    }

    async fn produce_trust_scores(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Ok(Decision::TrustScores(Self::trust_batch(ctx)).into_raw())
    }

    async fn produce_vote(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Ok(Decision::Vote(Self::vote(ctx)).into_raw())
    }

    async fn produce_revenge_shot(&self, ctx: &DecisionContext) -> WolfnetResult<RawDecision> {
        Ok(Decision::RevengeShot(Self::shot(ctx)).into_raw())
    }
}
