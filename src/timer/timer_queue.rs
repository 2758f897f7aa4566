use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Instant;

struct ScheduledTimer<T> {
    deadline: Instant,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for ScheduledTimer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<T> Eq for ScheduledTimer<T> {}

impl<T> PartialOrd for ScheduledTimer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ScheduledTimer<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline
            .cmp(&other.deadline)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// One-shot timers ordered by deadline. Timers sharing a deadline fire in
/// the order they were scheduled.
pub struct TimerQueue<T> {
    timers: BinaryHeap<Reverse<ScheduledTimer<T>>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, deadline: Instant, payload: T) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.timers.push(Reverse(ScheduledTimer { deadline, seq, payload }));
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.peek().map(|Reverse(timer)| timer.deadline)
    }

    /// Removes and returns the earliest timer if it is due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<T> {
        let due = self
            .timers
            .peek()
            .is_some_and(|Reverse(timer)| timer.deadline <= now);
        if !due {
            return None;
        }
        self.timers.pop().map(|Reverse(timer)| timer.payload)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Drops every pending timer and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let dropped = self.timers.len();
        self.timers.clear();
        dropped
    }
}
