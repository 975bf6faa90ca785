//! Flipping: rotate to the flip angle, wait, return home, wait, and leave
//! the cylinder retracted.

use rcc_common::control_unit::config::RotaryConfig;

use super::step::{Completion, SequenceError, Step, StepAction, StepSequencer};

pub fn flipping_steps(config: &RotaryConfig) -> [Step; 4] {
    [
        Step::new(
            "rotate_flip",
            StepAction::RotateTo(config.flip_angle),
            Completion::Elapsed(0),
        ),
        Step::new("settle_flip", StepAction::None, Completion::RotarySettled),
        Step::new("rotate_home", StepAction::RotateHome, Completion::Elapsed(0)),
        Step::new("settle_home", StepAction::None, Completion::RotarySettled)
            .then(StepAction::RetractCylinder),
    ]
}

pub fn flipping_sequence(config: &RotaryConfig) -> Result<StepSequencer, SequenceError> {
    StepSequencer::new("FLIPPING", &flipping_steps(config))
}
