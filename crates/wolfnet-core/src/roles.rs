//! The role registry: a static capability table per role.
//!
//! Every decision point that depends on a role goes through
//! `capabilities_of`, so adding a role is a compile error everywhere the
//! table is consulted rather than a silent fallthrough.

use wolfnet_contracts::role::{DeathAbility, Faction, NightActionKind, Role};

/// One night ability and how often it may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ability {
    pub kind: NightActionKind,
    /// `None` means unlimited.
    pub uses_per_game: Option<u32>,
}

/// The full capability set of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub night_abilities: &'static [Ability],
    pub faction: Faction,
    pub on_death: Option<DeathAbility>,
}

impl Capabilities {
    /// The ability entry for `kind`, if this role has it.
    pub fn ability(&self, kind: NightActionKind) -> Option<Ability> {
        self.night_abilities.iter().copied().find(|a| a.kind == kind)
    }

    pub fn has_night_action(&self) -> bool {
        !self.night_abilities.is_empty()
    }
}

const WEREWOLF_ABILITIES: &[Ability] = &[Ability {
    kind: NightActionKind::Kill,
    uses_per_game: None,
}];

const SEER_ABILITIES: &[Ability] = &[Ability {
    kind: NightActionKind::Investigate,
    uses_per_game: None,
}];

const WITCH_ABILITIES: &[Ability] = &[
    Ability {
        kind: NightActionKind::Heal,
        uses_per_game: Some(1),
    },
    Ability {
        kind: NightActionKind::Poison,
        uses_per_game: Some(1),
    },
];

/// Hunter revenge shots per game.
pub const REVENGE_SHOTS_PER_GAME: u32 = 1;

/// Look up the capabilities of `role`. Pure; never fails.
pub fn capabilities_of(role: Role) -> Capabilities {
    match role {
        Role::Werewolf => Capabilities {
            night_abilities: WEREWOLF_ABILITIES,
            faction: Faction::Werewolf,
            on_death: None,
        },
        Role::Villager => Capabilities {
            night_abilities: &[],
            faction: Faction::Village,
            on_death: None,
        },
        Role::Seer => Capabilities {
            night_abilities: SEER_ABILITIES,
            faction: Faction::Village,
            on_death: None,
        },
        Role::Witch => Capabilities {
            night_abilities: WITCH_ABILITIES,
            faction: Faction::Village,
            on_death: None,
        },
        Role::Hunter => Capabilities {
            night_abilities: &[],
            faction: Faction::Village,
            on_death: Some(DeathAbility::RevengeShot),
        },
    }
}
