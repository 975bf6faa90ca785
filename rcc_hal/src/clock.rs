//! Monotonic tick sources.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rcc_common::hal::driver::{Tick, TickSource};

/// Wall clock, milliseconds since construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SystemClock {
    #[inline]
    fn now(&self) -> Tick {
        self.origin.elapsed().as_millis() as Tick
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    ticks: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: Tick) -> Self {
        Self {
            ticks: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Jump to an absolute tick. Moving backwards is ignored.
    pub fn set(&self, tick: Tick) {
        self.ticks.fetch_max(tick, Ordering::AcqRel);
    }

    /// Advance by `ms` and return the new tick.
    pub fn advance(&self, ms: u64) -> Tick {
        self.ticks.fetch_add(ms, Ordering::AcqRel) + ms
    }
}

impl TickSource for ManualClock {
    #[inline]
    fn now(&self) -> Tick {
        self.ticks.load(Ordering::Acquire)
    }
}
