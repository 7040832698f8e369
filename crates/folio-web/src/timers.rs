#![forbid(unsafe_code)]

//! Deadline-ordered timer queue.
//!
//! Timers are one-shot (`setTimeout`) or periodic (`setInterval`). The queue
//! never reads a clock; callers ask for everything due at a given instant.
//!
//! # Invariants
//!
//! 1. Due timers pop in `(deadline, id)` order, so timers scheduled for the
//!    same instant fire in scheduling order.
//! 2. A periodic timer keeps its id across firings and is re-armed at
//!    `deadline + period` before it is handed to the caller, so cancelling it
//!    from the callback removes the next firing.
//! 3. Cancelling an unknown or already fired id is a no-op.
//! 4. Without a lag limit every missed firing is replayed at its own
//!    deadline. With one, a timer popped more than the limit after its
//!    deadline fires once at the current instant and a periodic timer
//!    re-arms from there, so a stalled host does not burst through the
//!    backlog.

use std::time::Duration;

/// Opaque handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    owner: usize,
    token: u64,
    deadline: Duration,
    period: Option<Duration>,
}

/// A timer that has come due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Due {
    pub id: TimerId,
    /// Index of the component that scheduled the timer.
    pub owner: usize,
    /// Caller-chosen value passed back to the owner.
    pub token: u64,
    /// Instant the timer was scheduled to fire at.
    pub deadline: Duration,
    /// Instant the callback should treat as "now": the deadline, or the
    /// pop instant when the timer ran later than the lag limit.
    pub fired_at: Duration,
}

#[derive(Debug, Default, Clone)]
pub struct TimerQueue {
    entries: Vec<Entry>,
    next_id: u64,
    max_lag: Option<Duration>,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how far behind a timer may fire before it is resynced to the
    /// pop instant. `None` replays every firing exactly.
    pub fn set_max_lag(&mut self, max_lag: Option<Duration>) {
        self.max_lag = max_lag;
    }

    #[must_use]
    pub const fn max_lag(&self) -> Option<Duration> {
        self.max_lag
    }

    /// Schedule a timer for `deadline`, repeating every `period` if given.
    ///
    /// A zero period is treated as one nanosecond so a periodic timer always
    /// moves forward in time.
    pub fn schedule(
        &mut self,
        owner: usize,
        token: u64,
        deadline: Duration,
        period: Option<Duration>,
    ) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            owner,
            token,
            deadline,
            period: period.map(|p| p.max(Duration::from_nanos(1))),
        });
        id
    }

    /// Remove a timer. Returns whether it was pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Remove every timer belonging to `owner`.
    pub fn cancel_owner(&mut self, owner: usize) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.owner != owner);
        before - self.entries.len()
    }

    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Pop the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<Due> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.id))
            .map(|(i, _)| i)?;

        let lagging = self
            .max_lag
            .is_some_and(|lag| now.saturating_sub(self.entries[idx].deadline) > lag);
        let entry = &mut self.entries[idx];
        let fired_at = if lagging { now } else { entry.deadline };
        let due = Due {
            id: entry.id,
            owner: entry.owner,
            token: entry.token,
            deadline: entry.deadline,
            fired_at,
        };
        match entry.period {
            Some(period) => entry.deadline = fired_at.saturating_add(period),
            None => {
                self.entries.swap_remove(idx);
            }
        }
        Some(due)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
