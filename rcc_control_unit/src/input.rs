//! Input module root.
//!
//! Raw line reads → polarity → dual-criterion debounce → edge/level view
//! consumed by the supervisor and the state handlers.

pub mod debounce;
pub mod monitor;

pub use debounce::{DebouncedInput, Sample};
pub use monitor::{InputMonitor, InputSnapshot};
