//! Prelude module for common re-exports.
//!
//! ```rust
//! use rcc_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};
pub use crate::control_unit::config::ControllerConfig;

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{DEFAULT_POLL_INTERVAL_MS, MAX_HISTORY_CAPACITY, MAX_STEPS};

// ─── State ──────────────────────────────────────────────────────────
pub use crate::control_unit::diagnostics::{CycleRecord, StateHistoryEntry};
pub use crate::control_unit::state::{CylinderPosition, OperationalState};

// ─── I/O & HAL ──────────────────────────────────────────────────────
pub use crate::hal::driver::{
    CycleObserver, HalError, IndicatorPanel, InputReader, OutputPin, ServoChannel, Tick,
    TickSource,
};
pub use crate::io::lights::StatusLights;
pub use crate::io::line::{InputLine, SignalLevel};
