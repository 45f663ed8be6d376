//! Named countdown timers
//!
//! Replaces event-loop timer callbacks with a deadline table that is advanced
//! by the simulation clock. Each id has at most one pending deadline; arming
//! an id again replaces it. An id fires at most once per `advance`, so a
//! handler that re-arms with a zero delay waits for the next step.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot<K> {
    id: K,
    /// Seconds until the timer fires (<= 0 means due)
    remaining: f32,
    /// Re-arm interval for recurring timers
    interval: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timers<K> {
    slots: Vec<Slot<K>>,
    /// Ids already fired since the last `advance`
    #[serde(skip, default = "Vec::new")]
    fired: Vec<K>,
}

impl<K> Default for Timers<K> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            fired: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq> Timers<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot timer, replacing any pending deadline for `id`
    pub fn arm(&mut self, id: K, seconds: f32) {
        self.set(id, seconds, None);
    }

    /// Arm a timer that fires every `interval` seconds until disarmed
    pub fn arm_recurring(&mut self, id: K, interval: f32) {
        self.set(id, interval, Some(interval));
    }

    fn set(&mut self, id: K, remaining: f32, interval: Option<f32>) {
        match self.slots.iter_mut().find(|s| s.id == id) {
            Some(slot) => {
                slot.remaining = remaining;
                slot.interval = interval;
            }
            None => self.slots.push(Slot {
                id,
                remaining,
                interval,
            }),
        }
    }

    /// Cancel a timer; a no-op if it is not armed
    pub fn disarm(&mut self, id: K) {
        self.slots.retain(|s| s.id != id);
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.fired.clear();
    }

    pub fn is_armed(&self, id: K) -> bool {
        self.slots.iter().any(|s| s.id == id)
    }

    /// Seconds left before `id` fires
    pub fn remaining(&self, id: K) -> Option<f32> {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.remaining.max(0.0))
    }

    /// Count every timer down by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.fired.clear();
        for slot in &mut self.slots {
            slot.remaining -= dt;
        }
    }

    /// Take the most overdue timer, if any is due.
    ///
    /// One-shot timers are removed; recurring ones move to their next
    /// deadline. Call in a loop after `advance` so a handler that disarms or
    /// re-arms another due timer is seen by the next pop. Ids that already
    /// fired since the last `advance` are skipped.
    pub fn pop_due(&mut self) -> Option<K> {
        let (index, _) = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.remaining <= 0.0 && !self.fired.contains(&s.id))
            .min_by(|(_, a), (_, b)| a.remaining.total_cmp(&b.remaining))?;

        let slot = &mut self.slots[index];
        let id = slot.id;
        self.fired.push(id);
        match slot.interval {
            Some(interval) => slot.remaining += interval.max(0.0),
            None => {
                self.slots.remove(index);
            }
        }
        Some(id)
    }
}
