pub mod api;
pub mod battle;
pub mod combatant;
pub mod content;
pub mod error;
pub mod playback;
pub mod roster;

pub use battle::{BattleOutcome, Round, opening_side, resolve, round_damage};
pub use combatant::{Combatant, CombatantId, Side};
pub use error::{BattleError, InvalidReason, RosterError, SequencerMisuse, Stat};
pub use playback::{
    Clock, MAX_CADENCE_MS, ManualClock, Phase, PlaybackConfig, PlaybackEvent, PlaybackState, Sequencer,
    SystemClock,
};
pub use roster::{NewCombatant, Roster};
