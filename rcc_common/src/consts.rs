//! System-wide constants for the RCC workspace.
//!
//! Single source of truth for fixed capacities and default paths.

use static_assertions::const_assert;

/// Maximum number of steps in one step sequencer.
pub const MAX_STEPS: usize = 8;

/// Upper bound for the configurable state history capacity.
pub const MAX_HISTORY_CAPACITY: usize = 64;

/// Lowest angle the rotary actuator accepts [deg].
pub const ROTARY_ANGLE_MIN: u16 = 0;

/// Highest angle the rotary actuator accepts [deg].
pub const ROTARY_ANGLE_MAX: u16 = 180;

/// Default poll interval of the control loop [ms].
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/rcc/router.toml";

// Flipping is the longest canonical sequence (4 steps).
const_assert!(MAX_STEPS >= 4);
const_assert!(MAX_HISTORY_CAPACITY >= 1);
const_assert!(ROTARY_ANGLE_MIN < ROTARY_ANGLE_MAX);
