//! Loading, validation, and conversion into the core `GameSetup`.
//!
//! Validation rules, checked in order (first failure wins):
//!
//! 1. At least one player.
//! 2. `total_players`, when set, equals the number of players.
//! 3. `max_rounds`, when set, lies in `1..=players`; every time limit is
//!    non-zero.
//! 4. Player ids and names are unique; names are non-blank.
//! 5. At least one werewolf and at least one village player.
//! 6. Werewolves are strictly outnumbered at the start.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use tracing::{debug, info};

use wolfnet_contracts::{
    agent::{AgentId, AgentProfile, GameId},
    error::{WolfnetError, WolfnetResult},
    game::{GameSettings, GameSetup, TimeLimits},
    role::{Faction, Role},
};

use crate::model::GameConfig;

fn config_error(reason: impl Into<String>) -> WolfnetError {
    WolfnetError::ConfigError { reason: reason.into() }
}

impl GameConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `ConfigError` if the TOML is malformed or does not match the
    /// expected schema. The result is not validated yet.
    pub fn from_toml_str(s: &str) -> WolfnetResult<Self> {
        toml::from_str(s).map_err(|e| config_error(format!("failed to parse game config TOML: {e}")))
    }

    /// Read the file at `path` and parse it as a game config.
    pub fn from_file(path: &Path) -> WolfnetResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| config_error(format!("failed to read game config '{}': {}", path.display(), e)))?;
        debug!(path = %path.display(), "game config read");
        Self::from_toml_str(&contents)
    }

    /// Check every rule in the module docs.
    pub fn validate(&self) -> WolfnetResult<()> {
        let players = &self.players;
        if players.is_empty() {
            return Err(config_error("no players configured"));
        }

        if let Some(total) = self.settings.total_players {
            if total != players.len() {
                return Err(config_error(format!(
                    "total_players is {total} but {} players are configured",
                    players.len()
                )));
            }
        }

        match self.settings.max_rounds {
            Some(0) => return Err(config_error("max_rounds must be at least 1")),
            Some(rounds) if rounds as usize > players.len() => {
                return Err(config_error(format!(
                    "max_rounds is {rounds} but a game of {} players is bounded by {} rounds",
                    players.len(),
                    players.len()
                )))
            }
            _ => {}
        }
        let limits = &self.settings.time_limits;
        for (name, ms) in [
            ("night_ms", limits.night_ms),
            ("discussion_ms", limits.discussion_ms),
            ("trust_ms", limits.trust_ms),
            ("vote_ms", limits.vote_ms),
            ("ability_ms", limits.ability_ms),
        ] {
            if ms == 0 {
                return Err(config_error(format!("time limit {name} must be non-zero")));
            }
        }

        let mut ids = BTreeSet::new();
        let mut names = BTreeSet::new();
        for player in players {
            if !ids.insert(player.id) {
                return Err(config_error(format!("duplicate player id {}", player.id)));
            }
            let name = player.name.trim();
            if name.is_empty() {
                return Err(config_error(format!("player {} has a blank name", player.id)));
            }
            if !names.insert(name.to_lowercase()) {
                return Err(config_error(format!("duplicate player name '{name}'")));
            }
        }

        let counts = self.role_counts();
        let werewolves = counts.get(&Role::Werewolf).copied().unwrap_or(0);
        let village = players.len() - werewolves;
        if werewolves == 0 {
            return Err(config_error(format!("at least one {} is required", Faction::Werewolf)));
        }
        if village == 0 {
            return Err(config_error(format!("at least one {} player is required", Faction::Village)));
        }
        if werewolves >= village {
            return Err(config_error(format!(
                "{werewolves} werewolves against {village} village players would end the game before it starts"
            )));
        }

        Ok(())
    }

    /// How many seats each role fills.
    pub fn role_counts(&self) -> BTreeMap<Role, usize> {
        let mut counts = BTreeMap::new();
        for player in &self.players {
            *counts.entry(player.role).or_insert(0) += 1;
        }
        counts
    }

    /// Validate and convert into the setup the core consumes.
    ///
    /// The roster is sorted by id and the game gets a fresh `GameId`.
    pub fn into_setup(self) -> WolfnetResult<GameSetup> {
        self.validate()?;

        let total_players = self.players.len();
        let defaults = GameSettings::for_players(total_players);
        let limits = self.settings.time_limits;
        let settings = GameSettings {
            total_players,
            max_rounds: self.settings.max_rounds.unwrap_or(defaults.max_rounds),
            discussion_start_offset: self.settings.discussion_start_offset,
            collection: self.settings.collection,
            time_limits: TimeLimits {
                night_ms: limits.night_ms,
                discussion_ms: limits.discussion_ms,
                trust_ms: limits.trust_ms,
                vote_ms: limits.vote_ms,
                ability_ms: limits.ability_ms,
            },
        };

        let mut roster: Vec<AgentProfile> = self
            .players
            .into_iter()
            .map(|p| AgentProfile {
                id: AgentId(p.id),
                name: p.name.trim().to_string(),
                role: p.role,
                personality: p.personality,
                backend: p.backend,
            })
            .collect();
        roster.sort_by_key(|p| p.id);

        let setup = GameSetup {
            game_id: GameId::new(),
            roster,
            settings,
        };
        info!(
            game_id = %setup.game_id,
            players = total_players,
            max_rounds = setup.settings.max_rounds,
            collection = ?setup.settings.collection,
            "game config loaded"
        );
        Ok(setup)
    }
}
