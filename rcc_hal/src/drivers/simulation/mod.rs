//! Simulation backend.
//!
//! A single in-memory I/O bus shared by cheap handle types, so a test (or
//! the binary's simulated operator) can drive inputs and inspect outputs
//! while the controller owns the trait objects.

mod io;

pub use io::{SimCylinderPin, SimIndicatorPanel, SimInputReader, SimServo, SimulatedIo};
