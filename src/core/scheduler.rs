//! Cooperative virtual-time scheduler.
//!
//! Stands in for one-shot delays and repeating intervals. Nothing runs on its
//! own: the owner advances the clock and pulls due tasks one at a time with
//! [`Scheduler::pop_due`], so every callback is strictly serialized.
//!
//! ```text
//! once(3s, A)   every(1s, B)
//!   now=0 ──────────────── advance ──────────────▶
//!        B@1s  B@2s  A@3s  B@3s ...
//! ```
//!
//! Tasks due at the same instant fire in the order they were scheduled.

use std::collections::BTreeMap;
use std::time::Duration;

/// Handle to a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    id: TimerId,
    task: T,
    period: Option<Duration>,
}

/// A queue of future callbacks on a virtual clock.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    queue: BTreeMap<(Duration, u64), Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            next_seq: 0,
            queue: BTreeMap::new(),
        }
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to fire once after `delay`.
    pub fn once(&mut self, delay: Duration, task: T) -> TimerId {
        let id = self.allocate_id();
        self.insert(self.now + delay, Entry { id, task, period: None });
        id
    }

    /// Schedule `task` to fire every `period`, first at `now + period`.
    ///
    /// A zero period would never let the clock move, so it is bumped to 1ms.
    pub fn every(&mut self, period: Duration, task: T) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        let id = self.allocate_id();
        self.insert(
            self.now + period,
            Entry {
                id,
                task,
                period: Some(period),
            },
        );
        id
    }

    /// Cancel a scheduled task. Returns false if it was not pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|_, entry| entry.id != id);
        self.queue.len() != before
    }

    /// Cancel everything.
    pub fn cancel_all(&mut self) {
        self.queue.clear();
    }

    /// Whether `id` is still scheduled.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.queue.values().any(|entry| entry.id == id)
    }

    /// Number of scheduled tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Deadline of the earliest scheduled task.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Move the clock forward to `t` without firing anything.
    ///
    /// Never moves backwards.
    pub fn advance_to(&mut self, t: Duration) {
        if t > self.now {
            self.now = t;
        }
    }

    fn allocate_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, deadline: Duration, entry: Entry<T>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((deadline, seq), entry);
    }
}

impl<T: Clone> Scheduler<T> {
    /// Pop the earliest task due at or before `until`.
    ///
    /// The clock moves to that task's deadline. Repeating tasks are re-armed
    /// one period later under the same [`TimerId`].
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, T)> {
        let (deadline, _) = *self.queue.keys().next()?;
        if deadline > until {
            return None;
        }
        let (_, entry) = self.queue.pop_first()?;
        self.advance_to(deadline);

        if let Some(period) = entry.period {
            self.insert(
                deadline + period,
                Entry {
                    id: entry.id,
                    task: entry.task.clone(),
                    period: entry.period,
                },
            );
        }

        Some((entry.id, entry.task))
    }
}
