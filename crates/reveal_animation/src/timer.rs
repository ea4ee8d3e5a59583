//! Timer queue
//!
//! Fixed-delay callbacks, independent of the tween scheduler. Timers carry a
//! payload instead of a closure so the owner decides what firing means.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct TimerId;
}

#[derive(Debug)]
struct Timer<T> {
    due_ms: f64,
    interval_ms: Option<f64>,
    /// Tie-breaker for timers due at the same instant
    seq: u64,
    payload: T,
}

/// Queue of one-shot and repeating timers
#[derive(Debug)]
pub struct TimerQueue<T> {
    timers: SlotMap<TimerId, Timer<T>>,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    /// Fire `payload` once, `delay_ms` after `now_ms`
    pub fn once(&mut self, now_ms: f64, delay_ms: f64, payload: T) -> TimerId {
        self.push(now_ms + delay_ms.max(0.0), None, payload)
    }

    /// Fire `payload` every `interval_ms`, first at `now_ms + interval_ms`.
    ///
    /// Intervals shorter than one millisecond are raised to one millisecond.
    pub fn repeating(&mut self, now_ms: f64, interval_ms: f64, payload: T) -> TimerId {
        let interval = interval_ms.max(1.0);
        self.push(now_ms + interval, Some(interval), payload)
    }

    fn push(&mut self, due_ms: f64, interval_ms: Option<f64>, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Timer {
            due_ms,
            interval_ms,
            seq,
            payload,
        })
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest due time, if any timer is scheduled
    pub fn next_due(&self) -> Option<f64> {
        self.timers.values().map(|t| t.due_ms).reduce(f64::min)
    }
}

impl<T: Clone> TimerQueue<T> {
    /// Collect every payload due at or before `now_ms`, in due order.
    ///
    /// One-shot timers are removed. Repeating timers fire at most once per
    /// call and re-arm on their own cadence, skipping periods that were
    /// missed entirely.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<(TimerId, T)> {
        let mut due: Vec<(f64, u64, TimerId)> = self
            .timers
            .iter()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .map(|(id, t)| (t.due_ms, t.seq, id))
            .collect();
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut fired = Vec::with_capacity(due.len());
        for (_, _, id) in due {
            let Some(timer) = self.timers.get_mut(id) else {
                continue;
            };
            match timer.interval_ms {
                Some(interval) => {
                    let missed = ((now_ms - timer.due_ms) / interval).floor() + 1.0;
                    timer.due_ms += missed * interval;
                    fired.push((id, timer.payload.clone()));
                }
                None => {
                    if let Some(timer) = self.timers.remove(id) {
                        fired.push((id, timer.payload));
                    }
                }
            }
        }
        fired
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payloads(fired: Vec<(TimerId, &'static str)>) -> Vec<&'static str> {
        fired.into_iter().map(|(_, p)| p).collect()
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = TimerQueue::new();
        timers.once(0.0, 100.0, "stagger");

        assert!(timers.take_due(99.0).is_empty());
        assert_eq!(payloads(timers.take_due(100.0)), vec!["stagger"]);
        assert!(timers.take_due(500.0).is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_due_order_then_schedule_order() {
        let mut timers = TimerQueue::new();
        timers.once(0.0, 50.0, "b");
        timers.once(0.0, 10.0, "a");
        timers.once(0.0, 50.0, "c");

        assert_eq!(payloads(timers.take_due(60.0)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_repeating_skips_missed_periods() {
        let mut timers = TimerQueue::new();
        let id = timers.repeating(0.0, 100.0, "tick");

        assert_eq!(timers.take_due(100.0).len(), 1);
        assert_eq!(timers.next_due(), Some(200.0));

        // Several periods late: fire once, then realign
        assert_eq!(timers.take_due(450.0).len(), 1);
        assert_eq!(timers.next_due(), Some(500.0));

        assert!(timers.cancel(id));
        assert!(timers.take_due(10_000.0).is_empty());
    }

    #[test]
    fn test_cancel_one_shot() {
        let mut timers = TimerQueue::new();
        let id = timers.once(0.0, 10.0, "never");
        assert!(timers.is_scheduled(id));
        assert!(timers.cancel(id));
        assert!(!timers.is_scheduled(id));
        assert!(timers.take_due(20.0).is_empty());
    }
}
