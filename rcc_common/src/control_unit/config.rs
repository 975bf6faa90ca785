//! Configuration structures for the router cell controller.
//!
//! All config types use `serde::Deserialize` for TOML loading.
//! Numeric parameters have const `MIN`/`MAX` bounds checked by `validate()`.
//! Every field has a default so a partial file is accepted; unknown keys are
//! rejected so typos do not silently fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SharedConfig};
use crate::consts::{
    DEFAULT_POLL_INTERVAL_MS, MAX_HISTORY_CAPACITY, ROTARY_ANGLE_MAX, ROTARY_ANGLE_MIN,
};
use crate::io::line::SignalLevel;

// ─── Bounds ─────────────────────────────────────────────────────────

pub const START_DELAY_MS_MAX: u64 = 60_000;
pub const FEED_DURATION_MS_MIN: u64 = 1;
pub const FEED_DURATION_MS_MAX: u64 = 60_000;
pub const FEED_SETTLE_MS_MAX: u64 = 10_000;
pub const MOVE_DELAY_MS_MAX: u64 = 10_000;
pub const POLL_INTERVAL_MS_MIN: u64 = 1;
pub const POLL_INTERVAL_MS_MAX: u64 = 1_000;
pub const DEBOUNCE_WINDOW_MS_MAX: u64 = 1_000;
pub const DEBOUNCE_SAMPLE_COUNT_MIN: u32 = 1;
pub const DEBOUNCE_SAMPLE_COUNT_MAX: u32 = 100;
pub const ERROR_RECOVERY_DELAY_MS_MAX: u64 = 600_000;
pub const MAX_STATE_DURATION_MS_MIN: u64 = 1_000;
pub const REMINDER_INTERVAL_MS_MIN: u64 = 1_000;
pub const REMINDER_INTERVAL_MS_MAX: u64 = 600_000;

// ─── Top-Level Config ───────────────────────────────────────────────

/// Top-level controller configuration, one TOML file per cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    #[serde(default)]
    pub shared: SharedConfig,
    #[serde(default)]
    pub cycle: CycleConfig,
    #[serde(default)]
    pub rotary: RotaryConfig,
    #[serde(default)]
    pub cylinder: CylinderConfig,
    #[serde(default)]
    pub debounce: DebounceConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub safety: SafetyConfig,
}

impl ControllerConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.cycle.validate().map_err(ConfigError::ValidationError)?;
        self.rotary.validate().map_err(ConfigError::ValidationError)?;
        self.debounce.validate().map_err(ConfigError::ValidationError)?;
        self.history.validate().map_err(ConfigError::ValidationError)?;
        self.inputs.validate().map_err(ConfigError::ValidationError)?;
        self.safety.validate().map_err(ConfigError::ValidationError)?;
        Ok(())
    }
}

fn check_range(name: &str, value: u64, min: u64, max: u64) -> Result<(), String> {
    if value < min || value > max {
        return Err(format!("{name} {value} out of range [{min}, {max}]"));
    }
    Ok(())
}

// ─── Cycle Timing ───────────────────────────────────────────────────

/// Feed pass timing and loop pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CycleConfig {
    /// Wait before the cylinder pushes [ms].
    pub start_delay_ms: u64,
    /// Cylinder extended time [ms].
    pub feed_duration_ms: u64,
    /// Settle time after retracting [ms].
    pub feed_settle_ms: u64,
    /// Run a second feed pass after flipping.
    pub feeding2_enabled: bool,
    /// Control loop poll interval [ms].
    pub poll_interval_ms: u64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 600,
            feed_duration_ms: 2200,
            feed_settle_ms: 50,
            feeding2_enabled: false,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl CycleConfig {
    pub fn validate(&self) -> Result<(), String> {
        check_range("start_delay_ms", self.start_delay_ms, 0, START_DELAY_MS_MAX)?;
        check_range(
            "feed_duration_ms",
            self.feed_duration_ms,
            FEED_DURATION_MS_MIN,
            FEED_DURATION_MS_MAX,
        )?;
        check_range("feed_settle_ms", self.feed_settle_ms, 0, FEED_SETTLE_MS_MAX)?;
        check_range(
            "poll_interval_ms",
            self.poll_interval_ms,
            POLL_INTERVAL_MS_MIN,
            POLL_INTERVAL_MS_MAX,
        )?;
        Ok(())
    }
}

// ─── Rotary Actuator ────────────────────────────────────────────────

/// Flip servo geometry and timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RotaryConfig {
    /// Angle that flips the workpiece [deg].
    pub flip_angle: u16,
    /// Rest angle [deg].
    pub home_angle: u16,
    /// Lowest commandable angle [deg].
    pub min_angle: u16,
    /// Highest commandable angle [deg].
    pub max_angle: u16,
    /// Time assumed for any commanded move to complete [ms].
    pub move_delay_ms: u64,
}

impl Default for RotaryConfig {
    fn default() -> Self {
        Self {
            flip_angle: 180,
            home_angle: 0,
            min_angle: ROTARY_ANGLE_MIN,
            max_angle: ROTARY_ANGLE_MAX,
            move_delay_ms: 1000,
        }
    }
}

impl RotaryConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_angle >= self.max_angle {
            return Err(format!(
                "min_angle {} must be below max_angle {}",
                self.min_angle, self.max_angle
            ));
        }
        if self.max_angle > ROTARY_ANGLE_MAX {
            return Err(format!(
                "max_angle {} exceeds {ROTARY_ANGLE_MAX}",
                self.max_angle
            ));
        }
        for (name, angle) in [("flip_angle", self.flip_angle), ("home_angle", self.home_angle)] {
            if angle < self.min_angle || angle > self.max_angle {
                return Err(format!(
                    "{name} {angle} outside [{}, {}]",
                    self.min_angle, self.max_angle
                ));
            }
        }
        check_range("move_delay_ms", self.move_delay_ms, 0, MOVE_DELAY_MS_MAX)
    }
}

// ─── Cylinder ───────────────────────────────────────────────────────

/// Feed cylinder valve wiring.
///
/// Installed valves differ in which electrical level extends the cylinder,
/// so the mapping is configuration, never a constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CylinderConfig {
    /// Output level that extends the cylinder. Retract is the opposite level.
    pub extend_level: SignalLevel,
}

impl Default for CylinderConfig {
    fn default() -> Self {
        Self {
            extend_level: SignalLevel::Low,
        }
    }
}

// ─── Debounce ───────────────────────────────────────────────────────

/// Dual time + sample-count debounce thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebounceConfig {
    /// Time the raw value must stay unchanged (strictly exceeded) [ms].
    pub window_ms: u64,
    /// Consecutive unchanged samples required.
    pub sample_count: u32,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            window_ms: 50,
            sample_count: 5,
        }
    }
}

impl DebounceConfig {
    pub fn validate(&self) -> Result<(), String> {
        check_range("debounce.window_ms", self.window_ms, 0, DEBOUNCE_WINDOW_MS_MAX)?;
        check_range(
            "debounce.sample_count",
            self.sample_count as u64,
            DEBOUNCE_SAMPLE_COUNT_MIN as u64,
            DEBOUNCE_SAMPLE_COUNT_MAX as u64,
        )
    }
}

// ─── History ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Number of transitions kept in the history ring.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 10 }
    }
}

impl HistoryConfig {
    pub fn validate(&self) -> Result<(), String> {
        check_range(
            "history.capacity",
            self.capacity as u64,
            1,
            MAX_HISTORY_CAPACITY as u64,
        )
    }
}

// ─── Inputs ─────────────────────────────────────────────────────────

/// Wiring of one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineConfig {
    /// Line reads LOW when asserted (pull-up wiring, NC contacts).
    pub active_low: bool,
    /// Line is wired. Disabled lines always read as not asserted.
    pub enabled: bool,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            active_low: false,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputsConfig {
    pub start_sensor: LineConfig,
    pub manual_start: LineConfig,
    pub emergency_stop: LineConfig,
    pub stop_button: LineConfig,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            start_sensor: LineConfig::default(),
            manual_start: LineConfig::default(),
            emergency_stop: LineConfig::default(),
            stop_button: LineConfig {
                active_low: false,
                enabled: false,
            },
        }
    }
}

impl InputsConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.emergency_stop.enabled {
            return Err("inputs.emergency_stop cannot be disabled".to_string());
        }
        if !self.start_sensor.enabled && !self.manual_start.enabled {
            return Err("at least one of start_sensor / manual_start must be enabled".to_string());
        }
        Ok(())
    }
}

// ─── Safety ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SafetyConfig {
    /// Time spent in Error before returning to Idle [ms].
    pub error_recovery_delay_ms: u64,
    /// Maximum time in a cycle state before declaring it stuck [ms].
    /// `None` disables the check.
    pub max_state_duration_ms: Option<u64>,
    /// Interval of the "emergency stop still active" reminder [ms].
    pub emergency_reminder_interval_ms: u64,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            error_recovery_delay_ms: 5_000,
            max_state_duration_ms: None,
            emergency_reminder_interval_ms: 10_000,
        }
    }
}

impl SafetyConfig {
    pub fn validate(&self) -> Result<(), String> {
        check_range(
            "error_recovery_delay_ms",
            self.error_recovery_delay_ms,
            0,
            ERROR_RECOVERY_DELAY_MS_MAX,
        )?;
        if let Some(limit) = self.max_state_duration_ms {
            check_range("max_state_duration_ms", limit, MAX_STATE_DURATION_MS_MIN, u64::MAX)?;
        }
        check_range(
            "emergency_reminder_interval_ms",
            self.emergency_reminder_interval_ms,
            REMINDER_INTERVAL_MS_MIN,
            REMINDER_INTERVAL_MS_MAX,
        )
    }
}
