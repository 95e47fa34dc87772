//! Game state owned exclusively by the state machine.
//!
//! Phase engines receive `&mut GameState` only for the duration of their
//! own phase. Deaths, ability uses, and private knowledge change here and
//! nowhere else; once a winner is set the state refuses further mutation.

use std::collections::BTreeMap;

use tracing::{debug, info};

use wolfnet_contracts::{
    action::{Death, Investigation, Vote},
    agent::{AgentId, AgentProfile, GameId, PublicAgent},
    decision::{DecisionContext, DecisionKind, PrivateKnowledge, PublicDeath},
    error::{WolfnetError, WolfnetResult},
    game::{EndReason, GameEnd, GameSettings, Phase, Statement},
    role::{Faction, NightActionKind, Role},
};

use crate::{
    ledger::TrustLedger,
    roles::{capabilities_of, REVENGE_SHOTS_PER_GAME},
};

/// Per-agent mutable record.
#[derive(Debug, Clone)]
pub struct Seat {
    pub profile: AgentProfile,
    pub alive: bool,
    /// Uses consumed per night ability.
    pub uses: BTreeMap<NightActionKind, u32>,
    pub shots_fired: u32,
    /// Seer only.
    pub investigations: Vec<Investigation>,
}

impl Seat {
    fn new(profile: AgentProfile) -> Self {
        Self {
            profile,
            alive: true,
            uses: BTreeMap::new(),
            shots_fired: 0,
            investigations: Vec::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.profile.role
    }

    /// Remaining uses of `kind`: `None` means unlimited, `Some(0)` means
    /// exhausted or not held.
    pub fn remaining(&self, kind: NightActionKind) -> Option<u32> {
        match capabilities_of(self.role()).ability(kind) {
            None => Some(0),
            Some(ability) => ability
                .uses_per_game
                .map(|limit| limit.saturating_sub(self.uses.get(&kind).copied().unwrap_or(0))),
        }
    }

    /// True if `kind` is held and has uses left.
    pub fn can_use(&self, kind: NightActionKind) -> bool {
        self.remaining(kind) != Some(0)
    }

    /// True if the seat holds any night ability it can still use.
    pub fn has_usable_night_ability(&self) -> bool {
        capabilities_of(self.role())
            .night_abilities
            .iter()
            .any(|a| self.can_use(a.kind))
    }

    pub fn can_shoot(&self) -> bool {
        capabilities_of(self.role()).on_death.is_some() && self.shots_fired < REVENGE_SHOTS_PER_GAME
    }
}

/// The authoritative state of one game.
#[derive(Debug, Clone)]
pub struct GameState {
    game_id: GameId,
    round: u32,
    phase: Phase,
    settings: GameSettings,
    seats: BTreeMap<AgentId, Seat>,
    deaths: Vec<(Death, Phase)>,
    votes: Vec<Vote>,
    end: Option<GameEnd>,
}

impl GameState {
    /// Build the initial state. Round starts at 1, phase at `Setup`.
    pub fn new(game_id: GameId, roster: Vec<AgentProfile>, settings: GameSettings) -> Self {
        let seats = roster
            .into_iter()
            .map(|profile| (profile.id, Seat::new(profile)))
            .collect();
        Self {
            game_id,
            round: 1,
            phase: Phase::Setup,
            settings,
            seats,
            deaths: Vec::new(),
            votes: Vec::new(),
            end: None,
        }
    }

    // ── Read access ──────────────────────────────────────────────────────────

    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn seat(&self, id: AgentId) -> Option<&Seat> {
        self.seats.get(&id)
    }

    pub fn seats(&self) -> impl Iterator<Item = &Seat> + '_ {
        self.seats.values()
    }

    pub fn is_alive(&self, id: AgentId) -> bool {
        self.seats.get(&id).is_some_and(|s| s.alive)
    }

    pub fn role_of(&self, id: AgentId) -> Option<Role> {
        self.seats.get(&id).map(Seat::role)
    }

    /// Living agents, ascending by id.
    pub fn living(&self) -> Vec<AgentId> {
        self.seats.values().filter(|s| s.alive).map(|s| s.profile.id).collect()
    }

    pub fn living_count(&self, faction: Faction) -> usize {
        self.seats
            .values()
            .filter(|s| s.alive && s.role().faction() == faction)
            .count()
    }

    /// Every death so far, in the order applied.
    pub fn deaths(&self) -> impl Iterator<Item = &Death> + '_ {
        self.deaths.iter().map(|(d, _)| d)
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn end(&self) -> Option<&GameEnd> {
        self.end.as_ref()
    }

    pub fn winner(&self) -> Option<Faction> {
        self.end.as_ref().and_then(|e| e.winner)
    }

    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    // ── Context snapshots ────────────────────────────────────────────────────

    /// Build the immutable snapshot `agent` sees for a `kind` decision.
    pub fn context_for(
        &self,
        agent: AgentId,
        kind: DecisionKind,
        ledger: &TrustLedger,
        discussion: &[Statement],
        candidates: Option<&[AgentId]>,
    ) -> WolfnetResult<DecisionContext> {
        let seat = self
            .seats
            .get(&agent)
            .ok_or_else(|| WolfnetError::invariant(format!("context requested for unknown agent {agent}")))?;
        let role = seat.role();

        let allies = if role == Role::Werewolf {
            self.seats
                .values()
                .filter(|s| s.role() == Role::Werewolf && s.profile.id != agent)
                .map(|s| s.profile.id)
                .collect()
        } else {
            Vec::new()
        };

        let private = PrivateKnowledge {
            investigations: seat.investigations.clone(),
            allies,
            heal_available: role == Role::Witch && seat.can_use(NightActionKind::Heal),
            poison_available: role == Role::Witch && seat.can_use(NightActionKind::Poison),
            shot_available: seat.can_shoot(),
        };

        Ok(DecisionContext {
            game_id: self.game_id.clone(),
            round: self.round,
            phase: self.phase,
            kind,
            me: seat.profile.clone(),
            roster: self
                .seats
                .values()
                .map(|s| PublicAgent {
                    id: s.profile.id,
                    name: s.profile.name.clone(),
                    alive: s.alive,
                })
                .collect(),
            private,
            own_trust: ledger.snapshot_for(agent, self.round).cloned().collect(),
            deaths: self
                .deaths
                .iter()
                .map(|(d, phase)| PublicDeath {
                    round: d.round,
                    agent: d.agent,
                    during: *phase,
                })
                .collect(),
            past_votes: self.votes.clone(),
            discussion: discussion.to_vec(),
            candidates: candidates.map(<[AgentId]>::to_vec),
        })
    }

    // ── Mutation ─────────────────────────────────────────────────────────────

    fn ensure_open(&self) -> WolfnetResult<()> {
        if self.end.is_some() {
            return Err(WolfnetError::invariant("game state mutated after the game ended"));
        }
        Ok(())
    }

    fn seat_mut(&mut self, id: AgentId) -> WolfnetResult<&mut Seat> {
        self.seats
            .get_mut(&id)
            .ok_or_else(|| WolfnetError::invariant(format!("unknown agent {id}")))
    }

    /// Move to `next`, enforcing the legal transition table.
    pub fn transition(&mut self, next: Phase) -> WolfnetResult<()> {
        if !self.phase.can_transition_to(next) {
            return Err(WolfnetError::invariant(format!(
                "illegal phase transition {:?} -> {:?}",
                self.phase, next
            )));
        }
        debug!(round = self.round, from = ?self.phase, to = ?next, "phase transition");
        self.phase = next;
        Ok(())
    }

    /// Advance the round counter after a completed Night→DayVote cycle.
    pub fn advance_round(&mut self) -> WolfnetResult<()> {
        self.ensure_open()?;
        if self.phase != Phase::DayVote {
            return Err(WolfnetError::invariant(format!(
                "round advanced from {:?}; only DayVote completes a round",
                self.phase
            )));
        }
        self.round += 1;
        Ok(())
    }

    /// Mark `death.agent` dead. Killing the dead is a core bug.
    pub fn apply_death(&mut self, death: Death) -> WolfnetResult<()> {
        self.ensure_open()?;
        let phase = self.phase;
        let seat = self.seat_mut(death.agent)?;
        if !seat.alive {
            return Err(WolfnetError::invariant(format!(
                "{} died twice (second cause {:?})",
                death.agent, death.cause
            )));
        }
        seat.alive = false;
        info!(round = death.round, agent = %death.agent, cause = ?death.cause, "agent died");
        self.deaths.push((death, phase));
        Ok(())
    }

    /// Consume one use of `kind` for `agent`.
    pub fn consume(&mut self, agent: AgentId, kind: NightActionKind) -> WolfnetResult<()> {
        self.ensure_open()?;
        let seat = self.seat_mut(agent)?;
        if !seat.can_use(kind) {
            return Err(WolfnetError::invariant(format!("{agent} consumed exhausted ability {kind}")));
        }
        *seat.uses.entry(kind).or_insert(0) += 1;
        Ok(())
    }

    /// Consume the hunter's shot.
    pub fn consume_shot(&mut self, agent: AgentId) -> WolfnetResult<()> {
        self.ensure_open()?;
        let seat = self.seat_mut(agent)?;
        if !seat.can_shoot() {
            return Err(WolfnetError::invariant(format!("{agent} fired a shot it does not hold")));
        }
        seat.shots_fired += 1;
        Ok(())
    }

    /// Attach a seer's private investigation result.
    pub fn record_investigation(&mut self, seer: AgentId, investigation: Investigation) -> WolfnetResult<()> {
        self.ensure_open()?;
        self.seat_mut(seer)?.investigations.push(investigation);
        Ok(())
    }

    /// Keep a counted ballot in the public history.
    pub fn record_vote(&mut self, vote: Vote) -> WolfnetResult<()> {
        self.ensure_open()?;
        self.votes.push(vote);
        Ok(())
    }

    /// Evaluate the win condition against the living roster.
    ///
    /// All werewolves dead → Village. Living werewolves at least matching
    /// living non-werewolves → Werewolf. Otherwise the game continues.
    pub fn check_winner(&self) -> Option<Faction> {
        let wolves = self.living_count(Faction::Werewolf);
        let others = self.living_count(Faction::Village);
        if wolves == 0 {
            Some(Faction::Village)
        } else if wolves >= others {
            Some(Faction::Werewolf)
        } else {
            None
        }
    }

    /// Close the game. Fires exactly once; a second call is a core bug.
    pub fn finish(&mut self, winner: Option<Faction>, reason: EndReason) -> WolfnetResult<GameEnd> {
        if let Some(existing) = &self.end {
            return Err(WolfnetError::invariant(format!(
                "game end declared twice (already {:?}, now {:?})",
                existing.winner, winner
            )));
        }
        self.transition(Phase::Ended)?;
        let end = GameEnd {
            winner,
            reason,
            final_round: self.round,
        };
        info!(round = self.round, winner = ?winner, reason = ?reason, "game ended");
        self.end = Some(end.clone());
        Ok(end)
    }
}
