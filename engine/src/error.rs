use std::fmt;

use thiserror::Error;

use crate::combatant::CombatantId;
use crate::playback::Phase;

/// The three combat stats that must stay at or above 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Attack,
    Defense,
    Speed,
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stat::Attack => "attack",
            Stat::Defense => "defense",
            Stat::Speed => "speed",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("max_hp must be positive (got {0})")]
    NonPositiveMaxHp(i32),
    #[error("{stat} must be at least 1 (got {value})")]
    StatBelowOne { stat: Stat, value: i32 },
}

/// Reasons a battle cannot be resolved. No partial outcome is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("invalid combatant '{id}': {reason}")]
    InvalidCombatant {
        id: CombatantId,
        reason: InvalidReason,
    },
    #[error("combatant '{0}' cannot fight itself")]
    SelfMatch(CombatantId),
}

/// Caller bugs reported by the playback sequencer; the state is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequencerMisuse {
    #[error("no battle outcome is loaded")]
    NoOutcome,
    #[error("playback is already running")]
    AlreadyPlaying,
    #[error("playback is not running (phase: {0:?})")]
    NotPlaying(Phase),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("name is required")]
    EmptyName,
    #[error("name is {len} characters long (max {max})")]
    NameTooLong { len: usize, max: usize },
    #[error("{field} must be within {min}..={max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },
    #[error("combatant id '{0}' is already in the roster")]
    DuplicateId(CombatantId),
    #[error("no combatant matches '{0}'")]
    UnknownCombatant(String),
    #[error("two combatants are already selected")]
    SelectionFull,
    #[error("two combatants must be selected (have {0})")]
    IncompleteSelection(usize),
}
