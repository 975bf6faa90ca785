//! # RCC Control Unit Library
//!
//! Control engine for a woodworking router cell: feed a workpiece with a
//! pneumatic cylinder, flip it with a rotary actuator, optionally feed it
//! again, and return to idle. An emergency stop overrides everything.
//!
//! ## Architecture Levels
//!
//! 1. **SafetySupervisor**: polled first; seizes the actuators on E-stop
//! 2. **OperationalStateMachine**: Idle → Feeding → Flipping → (Feeding2) → Idle
//! 3. **StepSequencer**: timed actuation steps nested inside each cycle state
//! 4. **InputMonitor**: dual-criterion debouncing of every input line
//!
//! ## Cooperative Polling
//!
//! Every wait is a stored tick compared against the current one on a later
//! poll. Nothing inside [`Controller::poll`](controller::Controller::poll)
//! sleeps; the [`cycle::CycleRunner`] paces polls from outside.

pub mod actuator;
pub mod config;
pub mod controller;
pub mod cycle;
pub mod error;
pub mod input;
pub mod safety;
pub mod sequence;
pub mod state;
