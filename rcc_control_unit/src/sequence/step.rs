//! Generic step sequencer.
//!
//! A step issues at most one actuator command on entry, then waits for its
//! completion predicate. The next step's entry action runs on the poll after
//! the predicate first holds; nothing ever blocks.

use heapless::Vec;
use rcc_common::consts::MAX_STEPS;
use rcc_common::hal::driver::Tick;
use thiserror::Error;
use tracing::{debug, trace};

use crate::actuator::Actuators;

/// Sequencer construction error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("sequence '{name}' has {count} steps, capacity is {capacity}")]
    TooManySteps {
        name: &'static str,
        count: usize,
        capacity: usize,
    },

    #[error("sequence '{0}' has no steps")]
    Empty(&'static str),
}

/// Actuator command issued by a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    None,
    ExtendCylinder,
    RetractCylinder,
    RotateTo(u16),
    RotateHome,
}

impl StepAction {
    pub fn apply(self, actuators: &mut Actuators, now: Tick) {
        match self {
            Self::None => {}
            Self::ExtendCylinder => actuators.cylinder.extend(),
            Self::RetractCylinder => actuators.cylinder.retract(),
            Self::RotateTo(angle) => {
                actuators.rotary.move_to(angle, now);
            }
            Self::RotateHome => {
                actuators.rotary.move_to_home(now);
            }
        }
    }
}

/// Step completion predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// At least this many ms since step entry.
    Elapsed(u64),
    /// The rotary's last move has settled.
    RotarySettled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub name: &'static str,
    /// Issued once, on the first poll of the step.
    pub entry: StepAction,
    pub until: Completion,
    /// Issued once, in the poll where `until` first holds.
    pub then: StepAction,
}

impl Step {
    pub const fn new(name: &'static str, entry: StepAction, until: Completion) -> Self {
        Self {
            name,
            entry,
            until,
            then: StepAction::None,
        }
    }

    pub const fn then(mut self, action: StepAction) -> Self {
        self.then = action;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStatus {
    Running,
    Complete,
}

/// Ordered, fixed-capacity list of steps with its cursor.
#[derive(Debug, Clone)]
pub struct StepSequencer {
    name: &'static str,
    steps: Vec<Step, MAX_STEPS>,
    index: usize,
    /// Set on the first poll of the current step.
    step_entered_at: Option<Tick>,
    complete: bool,
}

impl StepSequencer {
    pub fn new(name: &'static str, steps: &[Step]) -> Result<Self, SequenceError> {
        if steps.is_empty() {
            return Err(SequenceError::Empty(name));
        }
        let steps = Vec::from_slice(steps).map_err(|_| SequenceError::TooManySteps {
            name,
            count: steps.len(),
            capacity: MAX_STEPS,
        })?;
        Ok(Self {
            name,
            steps,
            index: 0,
            step_entered_at: None,
            complete: false,
        })
    }

    /// Advance as far as `now` allows. At most one step completes per poll.
    pub fn poll(&mut self, now: Tick, actuators: &mut Actuators) -> SequenceStatus {
        if self.complete {
            return SequenceStatus::Complete;
        }
        let Some(step) = self.steps.get(self.index).copied() else {
            self.complete = true;
            return SequenceStatus::Complete;
        };

        let entered_at = match self.step_entered_at {
            Some(at) => at,
            None => {
                debug!("{}: step {} '{}'", self.name, self.index, step.name);
                step.entry.apply(actuators, now);
                self.step_entered_at = Some(now);
                now
            }
        };

        let done = match step.until {
            Completion::Elapsed(ms) => now.saturating_sub(entered_at) >= ms,
            Completion::RotarySettled => actuators.rotary.has_settled(now),
        };
        if !done {
            return SequenceStatus::Running;
        }

        step.then.apply(actuators, now);
        trace!(
            "{}: step '{}' done after {} ms",
            self.name,
            step.name,
            now.saturating_sub(entered_at)
        );
        self.index += 1;
        self.step_entered_at = None;

        if self.index >= self.steps.len() {
            self.complete = true;
            return SequenceStatus::Complete;
        }
        SequenceStatus::Running
    }

    /// Back to the first step; the entry action will run again.
    pub fn reset(&mut self) {
        self.index = 0;
        self.step_entered_at = None;
        self.complete = false;
    }

    #[inline]
    pub fn step_index(&self) -> usize {
        self.index
    }

    /// Name of the step the cursor is on, `None` once complete.
    pub fn current_step(&self) -> Option<&'static str> {
        if self.complete {
            return None;
        }
        self.steps.get(self.index).map(|s| s.name)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
