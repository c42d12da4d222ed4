//! Timed replay of a resolved battle for an external renderer.

pub mod clock;

use std::collections::HashSet;
use std::time::Duration;

use anyhow::bail;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::battle::{BattleOutcome, Round};
use crate::combatant::{Combatant, CombatantId};
use crate::error::SequencerMisuse;

pub use clock::{Clock, Cue, ManualClock, SystemClock, TimerId, TimerQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Playing,
    Revealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlaybackState {
    pub current_round_index: usize,
    pub phase: Phase,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_round_index: 0,
            phase: Phase::Idle,
        }
    }
}

/// What the renderer should react to after a `poll`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    RoundAdvanced { index: usize },
    Revealed,
    /// Victory effects (sound, confetti) are due.
    Victory,
}

/// Playback cadence, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct PlaybackConfig {
    /// Pause between `start` and the first round slot.
    pub lead_in_ms: u64,
    pub round_interval_ms: u64,
    /// Pause after the final round before the result is revealed.
    pub reveal_delay_ms: u64,
    pub skip_settle_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            lead_in_ms: 100,
            round_interval_ms: 1500,
            reveal_delay_ms: 1000,
            skip_settle_ms: 500,
        }
    }
}

/// Upper bound for every cadence field: one hour.
pub const MAX_CADENCE_MS: u64 = 3_600_000;

impl PlaybackConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        for (field, value) in [
            ("lead_in_ms", self.lead_in_ms),
            ("round_interval_ms", self.round_interval_ms),
            ("reveal_delay_ms", self.reveal_delay_ms),
            ("skip_settle_ms", self.skip_settle_ms),
        ] {
            if value > MAX_CADENCE_MS {
                bail!("{} ({}) exceeds {} ms", field, value, MAX_CADENCE_MS);
            }
        }
        if self.round_interval_ms == 0 {
            bail!("round_interval_ms must be positive");
        }
        if self.skip_settle_ms >= self.round_interval_ms {
            bail!(
                "skip_settle_ms ({}) must be shorter than round_interval_ms ({})",
                self.skip_settle_ms,
                self.round_interval_ms
            );
        }
        Ok(())
    }

    /// Offset from `start` at which round `n` (1-based) is shown.
    ///
    /// Saturates instead of overflowing, so an absurd round count only pushes
    /// the slot out to the far future.
    pub fn round_at(&self, n: usize) -> Duration {
        let slot = (n as u64)
            .saturating_mul(self.round_interval_ms)
            .saturating_add(self.lead_in_ms);
        Duration::from_millis(slot)
    }

    /// Offset from `start` at which a battle of `rounds` rounds is revealed.
    pub fn reveal_at(&self, rounds: usize) -> Duration {
        self.round_at(rounds)
            .saturating_add(Duration::from_millis(self.reveal_delay_ms))
    }

    pub fn skip_settle(&self) -> Duration {
        Duration::from_millis(self.skip_settle_ms)
    }
}

/// Cancellation tokens for every cue the sequencer still has in flight.
#[derive(Debug, Default)]
pub struct TimerSet {
    tokens: HashSet<TimerId>,
}

impl TimerSet {
    pub fn track(&mut self, id: TimerId) {
        self.tokens.insert(id);
    }

    /// Forget a fired timer. False means the token was not ours (stale).
    pub fn release(&mut self, id: TimerId) -> bool {
        self.tokens.remove(&id)
    }

    /// Cancel everything still pending; returns how many timers were dropped.
    pub fn cancel_all<C: Clock + ?Sized>(&mut self, clock: &mut C) -> usize {
        self.tokens
            .drain()
            .filter(|id| clock.cancel(*id))
            .count()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Terminal view handed to the renderer once the result is revealed.
#[derive(Debug, Clone, Copy)]
pub struct Reveal<'a> {
    pub rounds: &'a [Round],
    pub winner: &'a Combatant,
    pub loser: &'a Combatant,
}

/// Drives `PlaybackState` through `Idle -> Playing -> Revealed` on a [`Clock`].
///
/// Only the sequencer writes the state: directly in `start`/`skip`/`reset`,
/// and from its own cues in `poll`. Every transition cancels the previous
/// timeline first, so at most one is ever live.
pub struct Sequencer<C: Clock> {
    clock: C,
    config: PlaybackConfig,
    state: PlaybackState,
    outcome: Option<BattleOutcome>,
    timers: TimerSet,
}

impl<C: Clock> Sequencer<C> {
    /// Fails if `config` does not pass [`PlaybackConfig::validate`].
    pub fn new(clock: C, config: PlaybackConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            clock,
            config,
            state: PlaybackState::default(),
            outcome: None,
            timers: TimerSet::default(),
        })
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn outcome(&self) -> Option<&BattleOutcome> {
        self.outcome.as_ref()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Replace the loaded battle. Any running playback is abandoned.
    pub fn load(&mut self, outcome: BattleOutcome) {
        let dropped = self.timers.cancel_all(&mut self.clock);
        debug!(rounds = outcome.rounds.len(), dropped, "battle loaded");
        self.outcome = Some(outcome);
        self.state = PlaybackState::default();
    }

    pub fn start(&mut self) -> Result<(), SequencerMisuse> {
        let Some(outcome) = self.outcome.as_ref() else {
            warn!("start without a loaded battle");
            return Err(SequencerMisuse::NoOutcome);
        };
        if self.state.phase == Phase::Playing {
            warn!("start while already playing");
            return Err(SequencerMisuse::AlreadyPlaying);
        }
        let rounds = outcome.rounds.len();

        self.timers.cancel_all(&mut self.clock);
        self.state = PlaybackState {
            current_round_index: 0,
            phase: Phase::Playing,
        };
        for n in 1..=rounds {
            let id = self.clock.schedule(self.config.round_at(n), Cue::Advance(n));
            self.timers.track(id);
        }
        let id = self.clock.schedule(self.config.reveal_at(rounds), Cue::Reveal);
        self.timers.track(id);

        debug!(rounds, "playback started");
        Ok(())
    }

    /// Jump straight to the result. Victory effects follow after the settle delay.
    pub fn skip(&mut self) -> Result<(), SequencerMisuse> {
        let Some(outcome) = self.outcome.as_ref() else {
            warn!("skip without a loaded battle");
            return Err(SequencerMisuse::NoOutcome);
        };
        if self.state.phase != Phase::Playing {
            warn!(phase = ?self.state.phase, "skip while not playing");
            return Err(SequencerMisuse::NotPlaying(self.state.phase));
        }
        let rounds = outcome.rounds.len();

        let dropped = self.timers.cancel_all(&mut self.clock);
        self.state = PlaybackState {
            current_round_index: rounds,
            phase: Phase::Revealed,
        };
        let id = self.clock.schedule(self.config.skip_settle(), Cue::Settle);
        self.timers.track(id);

        debug!(dropped, "playback skipped");
        Ok(())
    }

    /// Back to `Idle` with nothing loaded; a new battle must be loaded before `start`.
    pub fn reset(&mut self) {
        let dropped = self.timers.cancel_all(&mut self.clock);
        self.state = PlaybackState::default();
        self.outcome = None;
        debug!(dropped, "playback reset");
    }

    /// Fire every due cue and report what changed, in firing order.
    pub fn poll(&mut self) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        while let Some((id, cue)) = self.clock.take_due() {
            if !self.timers.release(id) {
                trace!(?cue, "ignoring cue from an abandoned timeline");
                continue;
            }
            self.apply(cue, &mut events);
        }
        events
    }

    fn apply(&mut self, cue: Cue, events: &mut Vec<PlaybackEvent>) {
        trace!(?cue, "cue fired");
        match cue {
            Cue::Advance(index) => {
                if self.state.phase == Phase::Playing {
                    self.state.current_round_index = index;
                    events.push(PlaybackEvent::RoundAdvanced { index });
                }
            }
            Cue::Reveal => {
                let rounds = self.outcome.as_ref().map_or(0, |o| o.rounds.len());
                self.state = PlaybackState {
                    current_round_index: rounds,
                    phase: Phase::Revealed,
                };
                events.push(PlaybackEvent::Revealed);
                events.push(PlaybackEvent::Victory);
            }
            Cue::Settle => events.push(PlaybackEvent::Victory),
        }
    }

    /// The round to highlight while playing: `rounds[current_round_index - 1]`.
    pub fn current_round(&self) -> Option<&Round> {
        if self.state.phase != Phase::Playing {
            return None;
        }
        let index = self.state.current_round_index.checked_sub(1)?;
        self.outcome.as_ref()?.rounds.get(index)
    }

    pub fn reveal(&self) -> Option<Reveal<'_>> {
        if self.state.phase != Phase::Revealed {
            return None;
        }
        let outcome = self.outcome.as_ref()?;
        Some(Reveal {
            rounds: &outcome.rounds,
            winner: &outcome.winner,
            loser: &outcome.loser,
        })
    }

    /// Health to display for `id` at the current point of the replay.
    pub fn displayed_health(&self, id: &CombatantId) -> Option<i32> {
        self.outcome
            .as_ref()?
            .health_after(id, self.state.current_round_index)
    }
}

impl<C: Clock> Drop for Sequencer<C> {
    fn drop(&mut self) {
        self.timers.cancel_all(&mut self.clock);
    }
}
