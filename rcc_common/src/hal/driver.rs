//! HAL traits and error types.
//!
//! This module defines:
//! - `Tick` - monotonic millisecond timestamp used by all timing logic
//! - `HalError` - error types for hardware operations
//! - one trait per hardware seam the controller consumes
//!
//! All traits are object safe. The controller stores them boxed so a
//! simulation backend and a real I/O board can be swapped at startup.

use thiserror::Error;

use crate::control_unit::diagnostics::CycleRecord;
use crate::io::lights::StatusLights;
use crate::io::line::{InputLine, SignalLevel};

/// Monotonic time in milliseconds since controller start.
pub type Tick = u64;

/// Error types for HAL operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HalError {
    /// Servo (or other PWM channel) could not be attached.
    #[error("Attach failed: {0}")]
    AttachFailed(String),

    /// Hardware communication error.
    #[error("Hardware communication error: {0}")]
    CommunicationError(String),
}

/// Raw digital input lines.
///
/// `read` returns the electrical level (`true` = HIGH). Polarity and
/// debouncing are applied by the controller, never by the backend.
pub trait InputReader: Send {
    /// Called once per poll before any `read`, with the poll timestamp.
    /// Backends that latch inputs or replay scripted changes hook in here.
    fn begin_cycle(&mut self, _now: Tick) {}

    /// Current electrical level of `line`.
    fn read(&mut self, line: InputLine) -> bool;
}

/// A single digital output (valve coil).
pub trait OutputPin: Send {
    /// Configure the pin as an output. Idempotent.
    fn configure(&mut self);

    /// Drive the pin to `level`.
    fn write(&mut self, level: SignalLevel);
}

/// A positional servo channel.
///
/// # Contract
///
/// - `write_angle` on a detached channel has no physical effect
/// - `attach` after `detach` restores holding torque at the last angle
///   written by the caller
pub trait ServoChannel: Send {
    /// Enable the PWM output.
    fn attach(&mut self) -> Result<(), HalError>;

    /// Disable the PWM output. The servo goes limp.
    fn detach(&mut self);

    /// Command a target angle [deg].
    fn write_angle(&mut self, deg: u16);
}

/// Operator status lights.
pub trait IndicatorPanel: Send {
    fn show(&mut self, lights: StatusLights);
}

/// Monotonic millisecond clock.
pub trait TickSource {
    fn now(&self) -> Tick;
}

/// Receiver of "cycle completed" notifications.
///
/// Called synchronously from the control loop; implementations must
/// return quickly.
pub trait CycleObserver: Send {
    fn cycle_completed(&mut self, record: &CycleRecord);
}
