//! Construction-time error type.
//!
//! Nothing in the running poll path returns an error; faults there become
//! state transitions. Only building a controller can fail.

use rcc_common::config::ConfigError;
use rcc_common::hal::driver::HalError;
use thiserror::Error;

use crate::sequence::SequenceError;

/// Errors raised while building or starting the controller.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A step list does not fit the sequencer.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// Hardware refused initialization.
    #[error("actuator init failed: {0}")]
    Hal(#[from] HalError),
}
