//! Feeding: wait, push the workpiece, retract and settle.
//!
//! Used for both feed passes; Feeding2 has the same shape and timing.

use rcc_common::control_unit::config::CycleConfig;

use super::step::{Completion, SequenceError, Step, StepAction, StepSequencer};

pub fn feeding_steps(config: &CycleConfig) -> [Step; 3] {
    [
        Step::new(
            "start_delay",
            StepAction::None,
            Completion::Elapsed(config.start_delay_ms),
        ),
        Step::new(
            "push",
            StepAction::ExtendCylinder,
            Completion::Elapsed(config.feed_duration_ms),
        ),
        Step::new(
            "retract",
            StepAction::RetractCylinder,
            Completion::Elapsed(config.feed_settle_ms),
        ),
    ]
}

pub fn feeding_sequence(
    name: &'static str,
    config: &CycleConfig,
) -> Result<StepSequencer, SequenceError> {
    StepSequencer::new(name, &feeding_steps(config))
}
