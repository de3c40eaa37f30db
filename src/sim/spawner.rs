//! Per-player bullet spawn timers
//!
//! One timer per player, keyed by id. Replacing a timer and dropping all of
//! them are single calls, so there is no handle to forget.

use std::collections::BTreeMap;
use std::time::Duration;

use super::state::PlayerId;

/// A repeating timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SpawnTimer {
    period: Duration,
    elapsed: Duration,
}

/// Owns at most one spawn timer per player
#[derive(Debug, Clone, Default)]
pub struct SpawnScheduler {
    timers: BTreeMap<PlayerId, SpawnTimer>,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `id`'s timer with a fresh one. Elapsed time starts over.
    pub fn reschedule(&mut self, id: PlayerId, period: Duration) {
        if period.is_zero() {
            log::warn!("Refusing zero spawn period for {:?}", id);
            self.timers.remove(&id);
            return;
        }
        self.timers.insert(
            id,
            SpawnTimer {
                period,
                elapsed: Duration::ZERO,
            },
        );
    }

    pub fn cancel(&mut self, id: PlayerId) {
        self.timers.remove(&id);
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    /// Number of live timers
    pub fn active(&self) -> usize {
        self.timers.len()
    }

    pub fn period(&self, id: PlayerId) -> Option<Duration> {
        self.timers.get(&id).map(|t| t.period)
    }

    /// Advance all timers by `dt`; returns one entry per firing, in id order
    pub fn advance(&mut self, dt: Duration) -> Vec<PlayerId> {
        let mut fired = Vec::new();
        for (id, timer) in self.timers.iter_mut() {
            timer.elapsed += dt;
            while timer.elapsed >= timer.period {
                timer.elapsed -= timer.period;
                fired.push(*id);
            }
        }
        fired
    }
}
