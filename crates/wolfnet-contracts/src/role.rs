//! Roles, factions, and ability kinds.
//!
//! The set of roles is closed. Capability lookups live in the core role
//! registry; this module only names things.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two sides that can win a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Werewolf,
    Village,
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Werewolf => f.write_str("werewolf"),
            Faction::Village => f.write_str("village"),
        }
    }
}

/// A role assigned at setup. Immutable for the duration of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Werewolf,
    Villager,
    Seer,
    Witch,
    Hunter,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 5] = [
        Role::Werewolf,
        Role::Villager,
        Role::Seer,
        Role::Witch,
        Role::Hunter,
    ];

    /// The faction this role plays for.
    pub fn faction(self) -> Faction {
        match self {
            Role::Werewolf => Faction::Werewolf,
            Role::Villager | Role::Seer | Role::Witch | Role::Hunter => Faction::Village,
        }
    }

    /// Lowercase tag used in configs and exported records.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Werewolf => "werewolf",
            Role::Villager => "villager",
            Role::Seer => "seer",
            Role::Witch => "witch",
            Role::Hunter => "hunter",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The abilities that can be exercised during the night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightActionKind {
    Kill,
    Heal,
    Poison,
    Investigate,
}

impl fmt::Display for NightActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NightActionKind::Kill => "kill",
            NightActionKind::Heal => "heal",
            NightActionKind::Poison => "poison",
            NightActionKind::Investigate => "investigate",
        };
        f.write_str(s)
    }
}

/// Abilities that fire when their holder dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathAbility {
    /// The hunter names one living agent to take down with them.
    RevengeShot,
}
