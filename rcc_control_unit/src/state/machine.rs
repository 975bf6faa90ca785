//! Operational state machine.
//!
//! Idle → Feeding → Flipping → (Feeding2) → Idle, plus Error, EmergencyStop
//! and Shutdown. Dispatch goes through a table of [`StateHandler`]s indexed
//! by state. [`OperationalStateMachine::transition`] is the only code path
//! that changes the current state.

use rcc_common::control_unit::config::ControllerConfig;
use rcc_common::control_unit::diagnostics::CycleRecord;
use rcc_common::control_unit::state::OperationalState;
use rcc_common::hal::driver::Tick;
use tracing::{debug, error, info};

use super::handlers::{
    EmergencyStopHandler, ErrorHandler, IdleHandler, SequenceHandler, ShutdownHandler,
    StateContext, StateHandler,
};
use super::history::StateHistory;
use crate::actuator::Actuators;
use crate::input::InputSnapshot;
use crate::sequence::{SequenceError, feeding_sequence, flipping_sequence};

/// Result of a transition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition applied, new state.
    Ok(OperationalState),
    /// Transition not applied, with the reason.
    Rejected(&'static str),
}

/// Handler lookup table, one slot per [`OperationalState`].
pub type HandlerTable = [Option<Box<dyn StateHandler>>; OperationalState::COUNT];

/// In-flight production cycle.
#[derive(Debug, Clone, Copy)]
struct ActiveCycle {
    started_at: Tick,
    feed_passes: u8,
}

pub struct OperationalStateMachine {
    state: OperationalState,
    entered_at: Tick,
    handlers: HandlerTable,
    history: StateHistory,
    max_state_duration_ms: Option<u64>,
    cycle: Option<ActiveCycle>,
    cycles_completed: u64,
    completed: Option<CycleRecord>,
}

impl std::fmt::Debug for OperationalStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationalStateMachine")
            .field("state", &self.state)
            .field("entered_at", &self.entered_at)
            .field("cycles_completed", &self.cycles_completed)
            .field("history_len", &self.history.len())
            .finish()
    }
}

impl OperationalStateMachine {
    /// Build the standard handler table from configuration. Feeding2 only
    /// gets a handler when `feeding2_enabled` is set.
    pub fn new(config: &ControllerConfig, now: Tick) -> Result<Self, SequenceError> {
        let after_flip = if config.cycle.feeding2_enabled {
            OperationalState::Feeding2
        } else {
            OperationalState::Idle
        };

        let mut handlers = empty_table();
        handlers[OperationalState::Idle.index()] = Some(Box::new(IdleHandler));
        handlers[OperationalState::Feeding.index()] = Some(Box::new(
            SequenceHandler::new(
                feeding_sequence("FEEDING", &config.cycle)?,
                OperationalState::Flipping,
            )
            .homing_rotary_on_enter(),
        ));
        handlers[OperationalState::Flipping.index()] = Some(Box::new(SequenceHandler::new(
            flipping_sequence(&config.rotary)?,
            after_flip,
        )));
        if config.cycle.feeding2_enabled {
            handlers[OperationalState::Feeding2.index()] = Some(Box::new(SequenceHandler::new(
                feeding_sequence("FEEDING2", &config.cycle)?,
                OperationalState::Idle,
            )));
        }
        handlers[OperationalState::Error.index()] = Some(Box::new(ErrorHandler::new(
            config.safety.error_recovery_delay_ms,
        )));
        handlers[OperationalState::EmergencyStop.index()] = Some(Box::new(
            EmergencyStopHandler::new(config.safety.emergency_reminder_interval_ms),
        ));
        handlers[OperationalState::Shutdown.index()] = Some(Box::new(ShutdownHandler));

        Ok(Self::with_handlers(
            handlers,
            config.history.capacity,
            config.safety.max_state_duration_ms,
            now,
        ))
    }

    /// Build from an explicit handler table. Starts in Idle; the initial
    /// Idle is recorded in the history.
    pub fn with_handlers(
        handlers: HandlerTable,
        history_capacity: usize,
        max_state_duration_ms: Option<u64>,
        now: Tick,
    ) -> Self {
        let mut history = StateHistory::new(history_capacity);
        history.record(OperationalState::Idle, now);
        Self {
            state: OperationalState::Idle,
            entered_at: now,
            handlers,
            history,
            max_state_duration_ms,
            cycle: None,
            cycles_completed: 0,
            completed: None,
        }
    }

    /// Run the initial state's entry hook. Call once after construction.
    pub fn start(&mut self, actuators: &mut Actuators, inputs: &InputSnapshot, now: Tick) {
        let entered_at = self.entered_at;
        if let Some(handler) = self.handlers[self.state.index()].as_mut() {
            let mut ctx = StateContext {
                now,
                entered_at,
                actuators,
                inputs,
            };
            handler.on_enter(&mut ctx);
        }
        info!("State machine started in {}", self.state);
    }

    #[inline]
    pub const fn state(&self) -> OperationalState {
        self.state
    }

    #[inline]
    pub const fn entered_at(&self) -> Tick {
        self.entered_at
    }

    #[inline]
    pub const fn time_in_state(&self, now: Tick) -> u64 {
        now.saturating_sub(self.entered_at)
    }

    #[inline]
    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    #[inline]
    pub const fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    /// A production cycle is in progress.
    #[inline]
    pub const fn cycle_active(&self) -> bool {
        self.cycle.is_some()
    }

    /// Record of a cycle that completed since the last call.
    pub fn take_completed_cycle(&mut self) -> Option<CycleRecord> {
        self.completed.take()
    }

    /// Drop the in-flight cycle so the next return to Idle does not count
    /// as a completion.
    pub fn abort_cycle(&mut self, reason: &str) {
        if let Some(cycle) = self.cycle.take() {
            info!(
                "Cycle aborted ({reason}) after {} feed pass(es)",
                cycle.feed_passes
            );
        }
    }

    /// Poll the current state's handler and apply any transition it asks
    /// for. A state without a handler goes to Error.
    pub fn dispatch(&mut self, actuators: &mut Actuators, inputs: &InputSnapshot, now: Tick) {
        if let Some(limit) = self.max_state_duration_ms {
            if self.state.is_cycle_state() && self.time_in_state(now) > limit {
                error!(
                    "{} exceeded {} ms (in state {} ms)",
                    self.state,
                    limit,
                    self.time_in_state(now)
                );
                self.transition(OperationalState::Error, actuators, inputs, now);
                return;
            }
        }

        let entered_at = self.entered_at;
        let next = match self.handlers[self.state.index()].as_mut() {
            Some(handler) => {
                let mut ctx = StateContext {
                    now,
                    entered_at,
                    actuators: &mut *actuators,
                    inputs,
                };
                handler.poll(&mut ctx)
            }
            None => {
                error!("No handler registered for state {}", self.state);
                Some(OperationalState::Error)
            }
        };

        if let Some(next) = next {
            self.transition(next, actuators, inputs, now);
        }
    }

    /// Move to `next`: exit hook → history → state and entry tick → entry
    /// hook. Transition to the current state is a no-op and Shutdown is
    /// never left.
    pub fn transition(
        &mut self,
        next: OperationalState,
        actuators: &mut Actuators,
        inputs: &InputSnapshot,
        now: Tick,
    ) -> TransitionResult {
        let from = self.state;
        if next == from {
            return TransitionResult::Rejected("already in requested state");
        }
        if from == OperationalState::Shutdown {
            debug!("Ignoring transition {from} -> {next}: shutdown is terminal");
            return TransitionResult::Rejected("shutdown is terminal");
        }

        if let Some(handler) = self.handlers[from.index()].as_mut() {
            let mut ctx = StateContext {
                now,
                entered_at: self.entered_at,
                actuators: &mut *actuators,
                inputs,
            };
            handler.on_exit(&mut ctx);
        }

        self.account_cycle(from, next, now);
        self.history.record(next, now);
        info!(
            "State {from} -> {next} (after {} ms)",
            now.saturating_sub(self.entered_at)
        );
        self.state = next;
        self.entered_at = now;

        if let Some(handler) = self.handlers[next.index()].as_mut() {
            let mut ctx = StateContext {
                now,
                entered_at: now,
                actuators,
                inputs,
            };
            handler.on_enter(&mut ctx);
        }

        TransitionResult::Ok(next)
    }

    fn account_cycle(&mut self, from: OperationalState, next: OperationalState, now: Tick) {
        use OperationalState::*;

        match (from, next) {
            (Idle, Feeding) => {
                self.cycle = Some(ActiveCycle {
                    started_at: now,
                    feed_passes: 1,
                });
            }
            (_, Feeding2) => {
                if let Some(cycle) = self.cycle.as_mut() {
                    cycle.feed_passes += 1;
                }
            }
            (Flipping | Feeding2, Idle) => {
                if let Some(cycle) = self.cycle.take() {
                    self.cycles_completed += 1;
                    let record = CycleRecord {
                        sequence: self.cycles_completed,
                        started_at: cycle.started_at,
                        completed_at: now,
                        feed_passes: cycle.feed_passes,
                    };
                    info!(
                        "Cycle #{} complete in {} ms ({} feed pass(es))",
                        record.sequence,
                        record.duration_ms(),
                        record.feed_passes
                    );
                    self.completed = Some(record);
                }
            }
            (_, Error | EmergencyStop | Shutdown) => self.abort_cycle(next.name()),
            _ => {}
        }
    }
}

fn empty_table() -> HandlerTable {
    std::array::from_fn(|_| None)
}
