//! State module root.
//!
//! - [`machine`]: the operational state machine and its dispatch table
//! - [`handlers`]: one handler per operational state
//! - [`history`]: fixed-capacity transition log

pub mod handlers;
pub mod history;
pub mod machine;

pub use handlers::{StateContext, StateHandler};
pub use history::StateHistory;
pub use machine::{OperationalStateMachine, TransitionResult};
