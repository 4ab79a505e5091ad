//! Deferred actions keyed by tick
//!
//! Staggered effects (pattern mixing, barrages, delayed volleys) are queued
//! here instead of on wall-clock timers. Entries fire in `(tick, seq)`
//! order, so two actions due on the same tick run in insertion order.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone)]
struct Entry<A> {
    at: u64,
    seq: u64,
    action: A,
}

impl<A> PartialEq for Entry<A> {
    fn eq(&self, other: &Self) -> bool {
        (self.at, self.seq) == (other.at, other.seq)
    }
}

impl<A> Eq for Entry<A> {}

impl<A> PartialOrd for Entry<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Entry<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.at, self.seq).cmp(&(other.at, other.seq))
    }
}

/// Min-heap of `(fire_at_tick, seq, action)`
#[derive(Debug, Clone)]
pub struct Schedule<A> {
    heap: BinaryHeap<Reverse<Entry<A>>>,
    next_seq: u64,
}

impl<A> Default for Schedule<A> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<A> Schedule<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to fire on tick `at`
    pub fn push_at(&mut self, at: u64, action: A) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { at, seq, action }));
    }

    /// Pop the earliest action due on or before `now`
    pub fn pop_due(&mut self, now: u64) -> Option<A> {
        match self.heap.peek() {
            Some(Reverse(entry)) if entry.at <= now => {
                self.heap.pop().map(|Reverse(entry)| entry.action)
            }
            _ => None,
        }
    }

    /// Remove and return every action due on or before `now`, in firing order
    pub fn drain_due(&mut self, now: u64) -> Vec<A> {
        let mut due = Vec::new();
        while let Some(action) = self.pop_due(now) {
            due.push(action);
        }
        due
    }

    /// Tick of the next pending action
    pub fn next_due(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(entry)| entry.at)
    }

    /// Cancel everything still pending
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_drains_only_due_actions() {
        let mut schedule = Schedule::new();
        schedule.push_at(12, "second");
        schedule.push_at(3, "first");
        schedule.push_at(24, "third");

        assert!(schedule.drain_due(2).is_empty());
        assert_eq!(schedule.drain_due(12), vec!["first", "second"]);
        assert_eq!(schedule.next_due(), Some(24));
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn test_ties_fire_in_insertion_order() {
        let mut schedule = Schedule::new();
        for i in 0..5 {
            schedule.push_at(7, i);
        }
        assert_eq!(schedule.drain_due(7), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_clear_cancels_pending() {
        let mut schedule = Schedule::new();
        schedule.push_at(1, ());
        schedule.push_at(2, ());
        schedule.clear();
        assert!(schedule.is_empty());
        assert!(schedule.drain_due(100).is_empty());
    }

    proptest! {
        #[test]
        fn prop_fires_sorted_by_tick_then_seq(ticks in proptest::collection::vec(0u64..50, 0..64)) {
            let mut schedule = Schedule::new();
            for (seq, &at) in ticks.iter().enumerate() {
                schedule.push_at(at, (at, seq));
            }
            let fired = schedule.drain_due(u64::MAX);
            prop_assert_eq!(fired.len(), ticks.len());
            for pair in fired.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
        }
    }
}
