//! Sequence module root.
//!
//! Non-blocking step sequencers and the canonical step lists for the
//! Feeding and Flipping states.

pub mod feeding;
pub mod flipping;
pub mod step;

pub use feeding::feeding_sequence;
pub use flipping::flipping_sequence;
pub use step::{Completion, SequenceError, SequenceStatus, Step, StepAction, StepSequencer};
