//! HAL backend implementations.
//!
//! - [`simulation`] - Software simulation for development and testing
//!
//! # Adding New Backends
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the traits from `rcc_common::hal::driver`
//! 3. Wire the handles into `Controller::new` in the binary

pub mod simulation;
