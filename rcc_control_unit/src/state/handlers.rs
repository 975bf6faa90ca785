//! Per-state handlers.
//!
//! Every operational state implements [`StateHandler`]. The machine calls
//! `on_exit` of the old state and `on_enter` of the new one on each
//! transition, and `poll` of the current one on every dispatch. A handler
//! requests a transition by returning the next state from `poll`.
//!
//! Every handler leaves the cylinder retracted on entry. Idle and Error
//! also bring the rotary back home, so a cycle cut short mid-flip does not
//! leave the workpiece held over.

use rcc_common::control_unit::state::OperationalState;
use rcc_common::hal::driver::Tick;
use tracing::{info, warn};

use crate::actuator::Actuators;
use crate::input::InputSnapshot;
use crate::sequence::{SequenceStatus, StepSequencer};

/// Everything a handler may touch during one call.
pub struct StateContext<'a> {
    pub now: Tick,
    /// Tick at which the current state was entered.
    pub entered_at: Tick,
    pub actuators: &'a mut Actuators,
    pub inputs: &'a InputSnapshot,
}

impl StateContext<'_> {
    #[inline]
    pub fn time_in_state(&self) -> u64 {
        self.now.saturating_sub(self.entered_at)
    }
}

pub trait StateHandler: Send {
    fn on_enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.actuators.park(ctx.now);
    }

    /// Returns the next state, or `None` to stay.
    fn poll(&mut self, ctx: &mut StateContext<'_>) -> Option<OperationalState>;

    fn on_exit(&mut self, _ctx: &mut StateContext<'_>) {}
}

// ─── Idle ───────────────────────────────────────────────────────────

/// Waits for a start edge.
#[derive(Debug, Default)]
pub struct IdleHandler;

impl StateHandler for IdleHandler {
    fn poll(&mut self, ctx: &mut StateContext<'_>) -> Option<OperationalState> {
        if ctx.inputs.start_requested {
            info!("Start signal received");
            return Some(OperationalState::Feeding);
        }
        None
    }
}

// ─── Feeding / Flipping / Feeding2 ──────────────────────────────────

/// Runs a step sequencer and moves to `next` when it completes.
#[derive(Debug)]
pub struct SequenceHandler {
    sequencer: StepSequencer,
    next: OperationalState,
    /// Re-attach and home the rotary on entry (first feed pass).
    home_rotary_on_enter: bool,
}

impl SequenceHandler {
    pub fn new(sequencer: StepSequencer, next: OperationalState) -> Self {
        Self {
            sequencer,
            next,
            home_rotary_on_enter: false,
        }
    }

    pub fn homing_rotary_on_enter(mut self) -> Self {
        self.home_rotary_on_enter = true;
        self
    }

    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }
}

impl StateHandler for SequenceHandler {
    fn on_enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.actuators.cylinder.retract();
        if self.home_rotary_on_enter {
            ctx.actuators.rotary.move_to_home(ctx.now);
        }
        self.sequencer.reset();
    }

    fn poll(&mut self, ctx: &mut StateContext<'_>) -> Option<OperationalState> {
        match self.sequencer.poll(ctx.now, ctx.actuators) {
            SequenceStatus::Complete => Some(self.next),
            SequenceStatus::Running => None,
        }
    }

    fn on_exit(&mut self, ctx: &mut StateContext<'_>) {
        self.sequencer.reset();
        ctx.actuators.cylinder.retract();
    }
}

// ─── Error ──────────────────────────────────────────────────────────

/// Holds the safe posture, then returns to Idle after a fixed delay.
#[derive(Debug)]
pub struct ErrorHandler {
    recovery_delay_ms: u64,
}

impl ErrorHandler {
    pub fn new(recovery_delay_ms: u64) -> Self {
        Self { recovery_delay_ms }
    }
}

impl StateHandler for ErrorHandler {
    fn on_enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.actuators.park(ctx.now);
        warn!(
            "Error state entered, recovering to IDLE in {} ms",
            self.recovery_delay_ms
        );
    }

    fn poll(&mut self, ctx: &mut StateContext<'_>) -> Option<OperationalState> {
        if ctx.time_in_state() >= self.recovery_delay_ms {
            info!("Error recovery delay elapsed");
            return Some(OperationalState::Idle);
        }
        None
    }
}

// ─── EmergencyStop ──────────────────────────────────────────────────

/// Waits for the emergency stop to be released.
#[derive(Debug)]
pub struct EmergencyStopHandler {
    reminder_interval_ms: u64,
    last_reminder_at: Tick,
}

impl EmergencyStopHandler {
    pub fn new(reminder_interval_ms: u64) -> Self {
        Self {
            reminder_interval_ms,
            last_reminder_at: 0,
        }
    }
}

impl StateHandler for EmergencyStopHandler {
    fn on_enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.actuators.cylinder.emergency_retract();
        self.last_reminder_at = ctx.now;
    }

    fn poll(&mut self, ctx: &mut StateContext<'_>) -> Option<OperationalState> {
        if !ctx.inputs.emergency_stop {
            info!("Emergency stop released after {} ms", ctx.time_in_state());
            return Some(OperationalState::Idle);
        }
        if ctx.now.saturating_sub(self.last_reminder_at) >= self.reminder_interval_ms {
            warn!(
                "Emergency stop still active ({} s)",
                ctx.time_in_state() / 1_000
            );
            self.last_reminder_at = ctx.now;
        }
        None
    }
}

// ─── Shutdown ───────────────────────────────────────────────────────

/// Terminal: actuators safe, no further transitions.
#[derive(Debug, Default)]
pub struct ShutdownHandler;

impl StateHandler for ShutdownHandler {
    fn on_enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.actuators.force_safe(ctx.now);
        info!("Shutdown: actuators safe");
    }

    fn poll(&mut self, _ctx: &mut StateContext<'_>) -> Option<OperationalState> {
        None
    }
}
