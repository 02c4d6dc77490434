use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::clock::VirtualClock;

/// Repeating timers never fire more often than this.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Identifies one scheduled timer. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl std::fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Scheduling capability handed to a component.
///
/// A component keeps the handle it gets back and cancels it before starting a
/// new tick sequence; that is how it guarantees at most one pending timer.
pub trait Timers {
    /// Fire once after `delay`.
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// Fire every `period` until cancelled.
    fn schedule_every(&mut self, period: Duration) -> TimerHandle;

    /// Cancel a pending timer. Returns `false` if it already fired (one-shot)
    /// or was cancelled before.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired<K> {
    /// The handle returned when the timer was scheduled.
    pub handle: TimerHandle,
    /// The owner key the timer was scheduled under.
    pub key: K,
    /// The virtual time at which it fired.
    pub at: Duration,
}

#[derive(Debug, Clone)]
struct Entry<K> {
    key: K,
    period: Option<Duration>,
}

/// Deterministic virtual-time timer queue.
///
/// Timers fire in deadline order; timers sharing a deadline fire in the
/// order they were scheduled. Each timer carries an owner key `K` so a
/// single queue can serve several independent components.
#[derive(Debug)]
pub struct TimerQueue<K> {
    clock: VirtualClock,
    next_id: u64,
    due: BTreeMap<(Duration, u64), Entry<K>>,
    deadlines: HashMap<u64, Duration>,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TimerQueue<K> {
    /// Create an empty queue at virtual time zero.
    pub fn new() -> Self {
        Self {
            clock: VirtualClock::new(),
            next_id: 0,
            due: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Schedule a one-shot timer for `key`, `delay` from now.
    pub fn schedule(&mut self, key: K, delay: Duration) -> TimerHandle {
        self.insert(key, delay, None)
    }

    /// Schedule a repeating timer for `key`. The first firing is one
    /// `period` from now.
    pub fn schedule_every(&mut self, key: K, period: Duration) -> TimerHandle {
        let period = period.max(MIN_PERIOD);
        self.insert(key, period, Some(period))
    }

    fn insert(&mut self, key: K, delay: Duration, period: Option<Duration>) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        let deadline = self.clock.now() + delay;
        self.due.insert((deadline, id), Entry { key, period });
        self.deadlines.insert(id, deadline);
        TimerHandle(id)
    }

    /// Cancel a pending timer. Returns `true` if it was pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle.0) {
            Some(deadline) => self.due.remove(&(deadline, handle.0)).is_some(),
            None => false,
        }
    }

    /// Whether `handle` is still scheduled to fire.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle.0)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.due.len()
    }

    /// Return `true` if no timer is pending.
    pub fn is_empty(&self) -> bool {
        self.due.is_empty()
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.due.first_key_value().map(|(&(deadline, _), _)| deadline)
    }

    /// Move virtual time forward to `until` without firing anything.
    ///
    /// Call after draining [`pop_due`](Self::pop_due) so the queue's notion
    /// of "now" matches the host's.
    pub fn advance_to(&mut self, until: Duration) {
        self.clock.advance_to(until);
    }

    /// Borrow the queue as a [`Timers`] capability bound to `key`.
    pub fn lane(&mut self, key: K) -> Lane<'_, K> {
        Lane { queue: self, key }
    }
}

impl<K: Clone> TimerQueue<K> {
    /// Pop the earliest timer due at or before `until`, advancing virtual
    /// time to its deadline.
    ///
    /// A repeating timer is re-armed before it is returned, so the handler
    /// can cancel it with the same handle.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<K>> {
        let (&(deadline, _), _) = self.due.first_key_value()?;
        if deadline > until {
            return None;
        }
        let ((deadline, id), entry) = self.due.pop_first()?;
        self.deadlines.remove(&id);
        self.clock.advance(deadline);

        if let Some(period) = entry.period {
            let next = deadline + period;
            self.due.insert(
                (next, id),
                Entry {
                    key: entry.key.clone(),
                    period: Some(period),
                },
            );
            self.deadlines.insert(id, next);
        }

        Some(Fired {
            handle: TimerHandle(id),
            key: entry.key,
            at: deadline,
        })
    }
}

impl Timers for TimerQueue<()> {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        TimerQueue::schedule(self, (), delay)
    }

    fn schedule_every(&mut self, period: Duration) -> TimerHandle {
        TimerQueue::schedule_every(self, (), period)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        TimerQueue::cancel(self, handle)
    }
}

/// A [`TimerQueue`] borrowed for one owner key.
#[derive(Debug)]
pub struct Lane<'a, K> {
    queue: &'a mut TimerQueue<K>,
    key: K,
}

impl<K: Clone> Timers for Lane<'_, K> {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.queue.schedule(self.key.clone(), delay)
    }

    fn schedule_every(&mut self, period: Duration) -> TimerHandle {
        self.queue.schedule_every(self.key.clone(), period)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.queue.cancel(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule("late", ms(50));
        queue.schedule("early", ms(10));
        queue.schedule("middle", ms(30));

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_due(ms(100)))
            .map(|f| f.key)
            .collect();
        assert_eq!(order, vec!["early", "middle", "late"]);
        assert_eq!(queue.now(), ms(50));
    }

    #[test]
    fn equal_deadlines_fire_in_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(1, ms(20));
        queue.schedule(2, ms(20));
        queue.schedule(3, ms(20));
        let order: Vec<_> = std::iter::from_fn(|| queue.pop_due(ms(20)))
            .map(|f| f.key)
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn nothing_fires_before_deadline() {
        let mut queue = TimerQueue::new();
        queue.schedule((), ms(30));
        assert!(queue.pop_due(ms(29)).is_none());
        assert_eq!(queue.next_deadline(), Some(ms(30)));
        assert!(queue.pop_due(ms(30)).is_some());
        assert!(queue.is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule((), ms(10));
        assert!(queue.is_pending(handle));
        assert!(queue.cancel(handle));
        assert!(!queue.is_pending(handle));
        assert!(!queue.cancel(handle));
        assert!(queue.pop_due(ms(100)).is_none());
    }

    #[test]
    fn repeating_timer_rearms_until_cancelled() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule_every((), ms(20));

        let mut fired = Vec::new();
        while let Some(f) = queue.pop_due(ms(100)) {
            assert_eq!(f.handle, handle);
            fired.push(f.at);
            if fired.len() == 3 {
                assert!(queue.cancel(f.handle));
            }
        }
        assert_eq!(fired, vec![ms(20), ms(40), ms(60)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn zero_period_is_clamped() {
        let mut queue = TimerQueue::new();
        queue.schedule_every((), Duration::ZERO);
        let first = queue.pop_due(ms(5)).map(|f| f.at);
        assert_eq!(first, Some(MIN_PERIOD));
    }

    #[test]
    fn schedule_is_relative_to_now() {
        let mut queue = TimerQueue::new();
        queue.advance_to(ms(100));
        queue.schedule((), ms(30));
        assert_eq!(queue.next_deadline(), Some(ms(130)));
    }

    #[test]
    fn lane_schedules_under_its_key() {
        let mut queue = TimerQueue::new();
        let handle = {
            let mut lane = queue.lane('a');
            lane.schedule(ms(5))
        };
        queue.lane('b').schedule(ms(10));

        let first = queue.pop_due(ms(10)).map(|f| (f.handle, f.key));
        assert_eq!(first, Some((handle, 'a')));
        assert_eq!(queue.pop_due(ms(10)).map(|f| f.key), Some('b'));
    }

    #[test]
    fn handles_are_unique() {
        let mut queue: TimerQueue<()> = TimerQueue::new();
        let a = Timers::schedule(&mut queue, ms(1));
        let b = Timers::schedule(&mut queue, ms(1));
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "timer#0");
    }
}
