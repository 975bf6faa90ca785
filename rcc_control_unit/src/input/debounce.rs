//! Dual-criterion debouncer for one boolean line.
//!
//! The stable value follows the raw value only when both hold:
//! - time since the last raw change is strictly greater than the window
//! - the raw value has been sampled unchanged at least `sample_count` times
//!
//! A bounce restarts both criteria.

use rcc_common::control_unit::config::DebounceConfig;
use rcc_common::hal::driver::Tick;

/// Result of one [`DebouncedInput::sample`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Stable value changed in this sample.
    pub changed: bool,
    /// Stable value after this sample.
    pub value: bool,
}

/// Stabilized view of one input line.
#[derive(Debug, Clone)]
pub struct DebouncedInput {
    window_ms: u64,
    sample_count: u32,
    last_raw: bool,
    stable: bool,
    previous_stable: bool,
    last_change_at: Tick,
    stable_samples: u32,
}

impl DebouncedInput {
    /// Start with `initial` as both raw and stable value, so a line already
    /// held at boot produces no edge.
    pub fn new(config: &DebounceConfig, initial: bool, now: Tick) -> Self {
        Self {
            window_ms: config.window_ms,
            sample_count: config.sample_count,
            last_raw: initial,
            stable: initial,
            previous_stable: initial,
            last_change_at: now,
            stable_samples: 0,
        }
    }

    /// Feed one raw reading.
    pub fn sample(&mut self, raw: bool, now: Tick) -> Sample {
        self.previous_stable = self.stable;

        if raw != self.last_raw {
            self.last_raw = raw;
            self.last_change_at = now;
            self.stable_samples = 0;
        } else {
            self.stable_samples = self.stable_samples.saturating_add(1);
        }

        let settled = now.saturating_sub(self.last_change_at) > self.window_ms
            && self.stable_samples >= self.sample_count;

        let changed = settled && raw != self.stable;
        if changed {
            self.stable = raw;
        }

        Sample {
            changed,
            value: self.stable,
        }
    }

    /// Current stable value.
    #[inline]
    pub const fn value(&self) -> bool {
        self.stable
    }

    /// Stable value went false → true in the last sample.
    #[inline]
    pub const fn rose(&self) -> bool {
        !self.previous_stable && self.stable
    }

    /// Stable value went true → false in the last sample.
    #[inline]
    pub const fn fell(&self) -> bool {
        self.previous_stable && !self.stable
    }
}
