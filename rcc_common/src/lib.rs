//! Router Cell Controller common library
//!
//! Shared constants, configuration loading and hardware-facing traits for
//! all RCC workspace crates.
//!
//! # Module Structure
//!
//! - [`control_unit`] - Operational state types, diagnostics records and the
//!   controller configuration
//! - [`io`] - Input lines, signal levels and status lights
//! - [`hal`] - Traits the control engine consumes from hardware backends
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use rcc_common::prelude::*;
//!
//! let cfg = ControllerConfig::default();
//! assert!(cfg.validate().is_ok());
//! ```

pub mod config;
pub mod consts;
pub mod control_unit;
pub mod hal;
pub mod io;
pub mod prelude;
