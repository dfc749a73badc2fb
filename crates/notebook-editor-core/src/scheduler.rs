//! Deadline queue for deferred editor work.
//!
//! The editor never owns a timer. Work that has to wait for the platform to
//! settle (selection updates, focus changes, paste capture) is queued here
//! with a deadline, and the platform calls `tick(now)` on its owner once the
//! earliest deadline has passed. Tasks re-read live state when they fire, so
//! a task made stale by later events degrades to a no-op.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::Instant;

/// Delays used by the editor, in milliseconds when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimingPolicy {
    /// How long a hidden toolbar stays in the DOM before it is removed.
    #[serde(with = "millis")]
    pub hide_debounce: Duration,
    /// Wait before reading the selection after shift+arrow.
    #[serde(with = "millis")]
    pub selection_settle: Duration,
    /// Wait before reading the selection after select-all.
    #[serde(with = "millis")]
    pub select_all_settle: Duration,
    /// Wait before reading the selection after a mouse-up.
    #[serde(with = "millis")]
    pub mouse_settle: Duration,
    /// Wait for pasted text to land in the capture area.
    #[serde(with = "millis")]
    pub paste_capture: Duration,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            hide_debounce: Duration::from_millis(500),
            selection_settle: Duration::from_millis(100),
            select_all_settle: Duration::from_millis(50),
            mouse_settle: Duration::from_millis(50),
            paste_capture: Duration::from_millis(500),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[derive(Debug, Clone)]
struct Scheduled<T> {
    deadline: Instant,
    seq: u64,
    task: T,
}

/// Tasks ordered by deadline, ties broken by scheduling order.
#[derive(Debug, Clone)]
pub struct TaskQueue<T> {
    tasks: Vec<Scheduled<T>>,
    next_seq: u64,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to fire `delay` after `now`. Returns its deadline.
    pub fn schedule(&mut self, now: Instant, delay: Duration, task: T) -> Instant {
        let deadline = now + delay;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(Scheduled {
            deadline,
            seq,
            task,
        });
        self.tasks.sort_by_key(|s| (s.deadline, s.seq));
        deadline
    }

    /// Remove and return every task whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Vec<T> {
        let split = self
            .tasks
            .iter()
            .position(|s| s.deadline > now)
            .unwrap_or(self.tasks.len());
        self.tasks.drain(..split).map(|s| s.task).collect()
    }

    /// Drop queued tasks matching `pred`. Returns how many were dropped.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|s| !pred(&s.task));
        before - self.tasks.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.first().map(|s| s.deadline)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

/// Earliest of two optional deadlines.
pub fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pop_due_in_deadline_order() {
        let t0 = Instant::now();
        let mut queue = TaskQueue::new();
        queue.schedule(t0, ms(100), "late");
        queue.schedule(t0, ms(50), "early");
        queue.schedule(t0, ms(50), "early-second");

        assert!(queue.pop_due(t0 + ms(10)).is_empty());
        assert_eq!(queue.pop_due(t0 + ms(50)), vec!["early", "early-second"]);
        assert_eq!(queue.next_deadline(), Some(t0 + ms(100)));
        assert_eq!(queue.pop_due(t0 + ms(1000)), vec!["late"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_cancel_where() {
        let t0 = Instant::now();
        let mut queue = TaskQueue::new();
        queue.schedule(t0, ms(10), 1);
        queue.schedule(t0, ms(20), 2);
        queue.schedule(t0, ms(30), 1);
        assert_eq!(queue.cancel_where(|t| *t == 1), 2);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_deadline(), Some(t0 + ms(20)));
    }

    #[test]
    fn test_earliest() {
        let t0 = Instant::now();
        assert_eq!(earliest(None, None), None);
        assert_eq!(earliest(Some(t0), None), Some(t0));
        assert_eq!(earliest(Some(t0 + ms(5)), Some(t0)), Some(t0));
    }

    #[test]
    fn test_timing_policy_from_partial_json() {
        let policy: TimingPolicy = serde_json::from_str(r#"{"hideDebounce": 250}"#).unwrap();
        assert_eq!(policy.hide_debounce, ms(250));
        assert_eq!(policy.selection_settle, ms(100));
    }
}
