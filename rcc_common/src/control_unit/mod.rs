//! Control Unit shared types.
//!
//! All types shared between the control engine and its collaborators
//! (dashboard, telemetry, HAL backends) live here: the operational state
//! enum, diagnostic records and the controller configuration.

pub mod config;
pub mod diagnostics;
pub mod state;
