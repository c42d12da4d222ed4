use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

/// Cancellation token for one scheduled cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Payload delivered back to the sequencer when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Show round `n` (1-based).
    Advance(usize),
    Reveal,
    /// Post-skip pause before the victory effects.
    Settle,
}

/// Presentation clock able to run delayed cues.
///
/// Single-threaded and poll-driven: nothing fires on its own, the owner calls
/// `take_due` and gets cues back in deadline order (ties in scheduling order).
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
    /// Schedule `cue` to fire `delay` from now.
    fn schedule(&mut self, delay: Duration, cue: Cue) -> TimerId;
    /// Returns false if the timer already fired or was cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;
    fn take_due(&mut self) -> Option<(TimerId, Cue)>;
    fn next_deadline(&self) -> Option<Duration>;
    fn pending(&self) -> usize;
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn schedule(&mut self, delay: Duration, cue: Cue) -> TimerId {
        (**self).schedule(delay, cue)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        (**self).cancel(id)
    }

    fn take_due(&mut self) -> Option<(TimerId, Cue)> {
        (**self).take_due()
    }

    fn next_deadline(&self) -> Option<Duration> {
        (**self).next_deadline()
    }

    fn pending(&self) -> usize {
        (**self).pending()
    }
}

/// Deadline-ordered timer storage shared by the clock implementations.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    by_deadline: BTreeMap<(Duration, TimerId), Cue>,
    deadlines: HashMap<TimerId, Duration>,
}

impl TimerQueue {
    pub fn push(&mut self, at: Duration, cue: Cue) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.by_deadline.insert((at, id), cue);
        self.deadlines.insert(id, at);
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(at) => self.by_deadline.remove(&(at, id)).is_some(),
            None => false,
        }
    }

    /// Pop the earliest timer if its deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, Cue)> {
        let (&(at, id), _) = self.by_deadline.first_key_value()?;
        if at > now {
            return None;
        }
        self.deadlines.remove(&id);
        self.by_deadline.remove(&(at, id)).map(|cue| (id, cue))
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.by_deadline.keys().next().map(|&(at, _)| at)
    }

    pub fn len(&self) -> usize {
        self.by_deadline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_deadline.is_empty()
    }
}

/// Virtual time that only moves when told to. Used by tests and headless runs.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Duration,
    queue: TimerQueue,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, delay: Duration, cue: Cue) -> TimerId {
        self.queue.push(self.now + delay, cue)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        self.queue.cancel(id)
    }

    fn take_due(&mut self) -> Option<(TimerId, Cue)> {
        self.queue.pop_due(self.now)
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.queue.next_deadline()
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// Wall-clock time measured from construction.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
    queue: TimerQueue,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            queue: TimerQueue::default(),
        }
    }

    /// How long until the next timer is due, if any is pending.
    pub fn until_next(&self) -> Option<Duration> {
        self.queue
            .next_deadline()
            .map(|at| at.saturating_sub(self.now()))
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn schedule(&mut self, delay: Duration, cue: Cue) -> TimerId {
        let at = self.now() + delay;
        self.queue.push(at, cue)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        self.queue.cancel(id)
    }

    fn take_due(&mut self) -> Option<(TimerId, Cue)> {
        let now = self.now();
        self.queue.pop_due(now)
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.queue.next_deadline()
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}
