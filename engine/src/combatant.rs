use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{InvalidReason, Stat};

/// Opaque, stable identity of a combatant. Battles compare combatants by id only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombatantId(String);

impl CombatantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CombatantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CombatantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    #[serde(alias = "hp")]
    pub max_hp: i32,
}

impl Combatant {
    pub fn new(
        id: impl Into<CombatantId>,
        name: impl Into<String>,
        attack: i32,
        defense: i32,
        speed: i32,
        max_hp: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attack,
            defense,
            speed,
            max_hp,
        }
    }

    /// Engine invariants: `max_hp > 0` and every stat `>= 1`.
    pub fn validate(&self) -> Result<(), InvalidReason> {
        if self.max_hp <= 0 {
            return Err(InvalidReason::NonPositiveMaxHp(self.max_hp));
        }
        for (stat, value) in [
            (Stat::Attack, self.attack),
            (Stat::Defense, self.defense),
            (Stat::Speed, self.speed),
        ] {
            if value < 1 {
                return Err(InvalidReason::StatBelowOne { stat, value });
            }
        }
        Ok(())
    }
}

/// Which argument of a battle a combatant was passed as.
///
/// Attacker and defender roles flip every round, so a round's attacker is
/// always the previous round's `opponent()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn pick<T>(self, a: T, b: T) -> T {
        match self {
            Side::A => a,
            Side::B => b,
        }
    }

    pub(crate) fn index(self) -> usize {
        self.pick(0, 1)
    }
}
