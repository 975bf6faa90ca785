//! # RCC HAL Library
//!
//! Hardware backends for the router cell controller. The control engine only
//! sees the traits in `rcc_common::hal::driver`; this crate provides
//! implementations of them.
//!
//! # Module Structure
//!
//! - [`clock`] - Monotonic tick sources (wall clock and manually driven)
//! - [`drivers`] - Backend implementations
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                     SimulatedIo (shared bus)              │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────┐ ┌──────┐  │
//! │  │SimInputReader│ │SimCylinderPin│ │ SimServo │ │Panel │  │
//! │  └──────┬───────┘ └──────┬───────┘ └────┬─────┘ └──┬───┘  │
//! └─────────┼────────────────┼──────────────┼──────────┼──────┘
//!           ▼                ▼              ▼          ▼
//!      InputReader       OutputPin    ServoChannel IndicatorPanel
//! ```

pub mod clock;
pub mod drivers;

pub use clock::{ManualClock, SystemClock};
pub use drivers::simulation::SimulatedIo;
