//! Safety module root.
//!
//! Emergency-stop supervision. Polled before any state dispatch.

pub mod supervisor;

pub use supervisor::{SafetySupervisor, SafetyVerdict};
