//! Cycle runner: paces [`Controller::poll`] at the configured interval.
//!
//! The runner sleeps only between polls, never inside one. A shared
//! `AtomicBool` (cleared by the signal handler) ends the loop; the
//! controller is then taken to Shutdown so the actuators end up safe.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rcc_common::control_unit::state::OperationalState;
use rcc_common::hal::driver::{Tick, TickSource};
use tracing::{info, warn};

use crate::controller::Controller;

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-poll timing statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleStats {
    /// Total polls executed.
    pub cycle_count: u64,
    /// Last poll duration [µs].
    pub last_poll_us: u64,
    /// Minimum poll duration [µs].
    pub min_poll_us: u64,
    /// Maximum poll duration [µs].
    pub max_poll_us: u64,
    /// Running sum for average computation.
    pub sum_poll_us: u64,
    /// Polls that took longer than the poll interval.
    pub overruns: u64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_poll_us: 0,
            min_poll_us: u64::MAX,
            max_poll_us: 0,
            sum_poll_us: 0,
            overruns: 0,
        }
    }

    /// Record a poll duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_us: u64) {
        self.cycle_count += 1;
        self.last_poll_us = duration_us;
        self.min_poll_us = self.min_poll_us.min(duration_us);
        self.max_poll_us = self.max_poll_us.max(duration_us);
        self.sum_poll_us = self.sum_poll_us.saturating_add(duration_us);
    }

    /// Average poll time [µs] (0 if no polls).
    #[inline]
    pub fn avg_poll_us(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_poll_us / self.cycle_count
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Runner ─────────────────────────────────────────────────────────

pub struct CycleRunner<C: TickSource> {
    controller: Controller,
    clock: C,
    poll_interval: Duration,
    stats: CycleStats,
}

impl<C: TickSource> CycleRunner<C> {
    pub fn new(controller: Controller, clock: C) -> Self {
        let poll_interval = Duration::from_millis(controller.config().cycle.poll_interval_ms);
        Self {
            controller,
            clock,
            poll_interval,
            stats: CycleStats::new(),
        }
    }

    /// Poll until `running` is cleared, then shut down.
    pub fn run(&mut self, running: &AtomicBool) -> OperationalState {
        self.run_until(running, None)
    }

    /// Like [`run`](Self::run), but also stops once `duration_ms` of clock
    /// time has passed.
    pub fn run_for(&mut self, running: &AtomicBool, duration_ms: u64) -> OperationalState {
        let deadline = self.clock.now().saturating_add(duration_ms);
        self.run_until(running, Some(deadline))
    }

    fn run_until(&mut self, running: &AtomicBool, deadline: Option<Tick>) -> OperationalState {
        info!(
            "Entering control loop (poll interval {} ms)",
            self.poll_interval.as_millis()
        );

        while running.load(Ordering::SeqCst) {
            if deadline.is_some_and(|d| self.clock.now() >= d) {
                info!("Run duration elapsed");
                break;
            }

            let started = Instant::now();
            self.step();
            let elapsed = started.elapsed();

            // Sleep for remaining time.
            if let Some(remaining) = self.poll_interval.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }

        self.shutdown()
    }

    /// Execute one timed poll.
    pub fn step(&mut self) -> OperationalState {
        let started = Instant::now();
        let state = self.controller.poll(self.clock.now());
        let elapsed = started.elapsed();

        self.stats.record(elapsed.as_micros() as u64);
        if elapsed > self.poll_interval {
            self.stats.overruns += 1;
            warn!(
                "Poll overrun: {} µs > {} ms",
                elapsed.as_micros(),
                self.poll_interval.as_millis()
            );
        }
        state
    }

    /// Request Shutdown and apply it with one final poll.
    pub fn shutdown(&mut self) -> OperationalState {
        self.controller.request_shutdown();
        let state = self.controller.poll(self.clock.now());
        info!(
            "Control loop stopped: {} polls, avg {} µs, max {} µs, {} overruns",
            self.stats.cycle_count,
            self.stats.avg_poll_us(),
            self.stats.max_poll_us,
            self.stats.overruns
        );
        state
    }

    #[inline]
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    #[inline]
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    #[inline]
    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn into_controller(self) -> Controller {
        self.controller
    }
}
