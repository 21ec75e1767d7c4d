//! Cancellable one-shot and repeating timers for a single-threaded event loop.
//!
//! Nothing here sleeps or spawns: the owner asks for the next deadline, waits
//! however it likes, then drains due timers with [`Scheduler::pop_due`].
//! Timers fire in (deadline, issuance) order. Cancelling an id drops every
//! pending firing of it, including repeats that are already overdue.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

/// Opaque handle to a scheduled timer. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// One firing of a timer.
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<T> {
    pub id: TimerId,
    /// The deadline this firing was scheduled for (not the poll time).
    pub at: Instant,
    pub payload: T,
}

type QueueKey = (Instant, u64);

struct Timer<T> {
    payload: T,
    key: QueueKey,
    interval: Option<Duration>,
}

pub struct Scheduler<T> {
    timers: HashMap<TimerId, Timer<T>>,
    queue: BTreeMap<QueueKey, TimerId>,
    next_id: u64,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            timers: HashMap::new(),
            queue: BTreeMap::new(),
            next_id: 0,
            next_seq: 0,
        }
    }

    pub fn schedule_once(&mut self, at: Instant, payload: T) -> TimerId {
        self.insert(at, None, payload)
    }

    /// Fire at `first_at`, then every `interval` until cancelled.
    pub fn schedule_repeating(&mut self, first_at: Instant, interval: Duration, payload: T) -> TimerId {
        // A zero interval would make pop_due spin forever on one timer.
        let interval = interval.max(Duration::from_millis(1));
        self.insert(first_at, Some(interval), payload)
    }

    /// Returns `false` when the timer already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.timers.remove(&id) {
            Some(timer) => {
                self.queue.remove(&timer.key);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.keys().next().map(|(at, _)| *at)
    }

    fn insert(&mut self, at: Instant, interval: Option<Duration>, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let key = self.next_key(at);
        self.queue.insert(key, id);
        self.timers.insert(
            id,
            Timer {
                payload,
                key,
                interval,
            },
        );
        id
    }

    fn next_key(&mut self, at: Instant) -> QueueKey {
        let seq = self.next_seq;
        self.next_seq += 1;
        (at, seq)
    }
}

impl<T: Clone> Scheduler<T> {
    /// Pop the earliest timer due at or before `now`.
    ///
    /// Call in a loop; handlers may cancel or schedule between pops and the
    /// next pop sees the change.
    pub fn pop_due(&mut self, now: Instant) -> Option<Fired<T>> {
        let (&key, &id) = self.queue.iter().next()?;
        if key.0 > now {
            return None;
        }
        self.queue.remove(&key);

        let interval = self.timers.get(&id)?.interval;
        match interval {
            Some(interval) => {
                let next_key = self.next_key(key.0 + interval);
                let timer = self.timers.get_mut(&id)?;
                timer.key = next_key;
                self.queue.insert(next_key, id);
                Some(Fired {
                    id,
                    at: key.0,
                    payload: timer.payload.clone(),
                })
            }
            None => {
                let timer = self.timers.remove(&id)?;
                Some(Fired {
                    id,
                    at: key.0,
                    payload: timer.payload,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn drain(scheduler: &mut Scheduler<&'static str>, now: Instant) -> Vec<&'static str> {
        let mut out = Vec::new();
        while let Some(fired) = scheduler.pop_due(now) {
            out.push(fired.payload);
        }
        out
    }

    #[test]
    fn fires_in_deadline_then_issue_order() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule_once(t0 + ms(30), "late");
        scheduler.schedule_once(t0 + ms(10), "first");
        scheduler.schedule_once(t0 + ms(10), "second");
        assert_eq!(drain(&mut scheduler, t0 + ms(5)), Vec::<&str>::new());
        assert_eq!(drain(&mut scheduler, t0 + ms(30)), vec!["first", "second", "late"]);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn repeating_timer_delivers_every_overdue_tick() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_repeating(t0 + ms(20), ms(20), "tick");
        let mut fired_at = Vec::new();
        while let Some(fired) = scheduler.pop_due(t0 + ms(65)) {
            fired_at.push(fired.at - t0);
        }
        assert_eq!(fired_at, vec![ms(20), ms(40), ms(60)]);
        assert!(scheduler.is_pending(id));
        assert_eq!(scheduler.next_deadline(), Some(t0 + ms(80)));
    }

    #[test]
    fn cancel_invalidates_pending_repeats() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_repeating(t0 + ms(20), ms(20), "tick");
        assert!(scheduler.pop_due(t0 + ms(100)).is_some());
        assert!(scheduler.cancel(id));
        assert!(scheduler.pop_due(t0 + ms(100)).is_none());
        assert!(!scheduler.cancel(id));
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn one_shot_is_not_pending_after_firing() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_once(t0, "now");
        assert_eq!(scheduler.pop_due(t0).map(|f| f.id), Some(id));
        assert!(!scheduler.is_pending(id));
        assert!(!scheduler.cancel(id));
    }

    #[test]
    fn interleaves_independent_repeating_timers() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(t0 + ms(20), ms(20), "a");
        scheduler.schedule_repeating(t0 + ms(30), ms(20), "b");
        assert_eq!(
            drain(&mut scheduler, t0 + ms(65)),
            vec!["a", "b", "a", "b", "a"]
        );
    }
}
