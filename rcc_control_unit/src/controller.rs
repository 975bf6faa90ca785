//! Top-level controller: one call to [`Controller::poll`] is one iteration
//! of the cooperative control loop.
//!
//! Per-poll order:
//! 1. sample and debounce all inputs
//! 2. safety supervisor (a trip skips the rest of the poll)
//! 3. pending shutdown command, then the stop button
//! 4. dispatch of the current state
//! 5. cycle-completed notifications and status lights

use rcc_common::control_unit::config::ControllerConfig;
use rcc_common::control_unit::diagnostics::StateHistoryEntry;
use rcc_common::control_unit::state::{CylinderPosition, OperationalState};
use rcc_common::hal::driver::{
    CycleObserver, IndicatorPanel, InputReader, OutputPin, ServoChannel, Tick,
};
use rcc_common::io::lights::StatusLights;
use serde::Serialize;
use tracing::{debug, info};

use crate::actuator::Actuators;
use crate::error::ControlError;
use crate::input::{InputMonitor, InputSnapshot};
use crate::safety::{SafetySupervisor, SafetyVerdict};
use crate::state::{OperationalStateMachine, StateHistory};

/// Hardware handles the controller takes ownership of.
pub struct ControllerIo {
    pub inputs: Box<dyn InputReader>,
    pub cylinder: Box<dyn OutputPin>,
    pub servo: Box<dyn ServoChannel>,
    pub panel: Box<dyn IndicatorPanel>,
}

/// Serializable point-in-time view for dashboards and exit reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerSnapshot {
    pub service_name: String,
    pub state: OperationalState,
    pub time_in_state_ms: u64,
    pub cycles_completed: u64,
    pub cylinder: CylinderPosition,
    pub rotary_angle: Option<u16>,
    pub rotary_attached: bool,
    pub emergency_latched: bool,
    pub emergency_trips: u64,
    pub lights: StatusLights,
    pub inputs: InputSnapshot,
    pub history: Vec<StateHistoryEntry>,
    pub polls: u64,
}

pub struct Controller {
    config: ControllerConfig,
    reader: Box<dyn InputReader>,
    panel: Box<dyn IndicatorPanel>,
    monitor: InputMonitor,
    actuators: Actuators,
    machine: OperationalStateMachine,
    supervisor: SafetySupervisor,
    observers: Vec<Box<dyn CycleObserver>>,
    shutdown_requested: bool,
    last_inputs: InputSnapshot,
    lights: StatusLights,
    polls: u64,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("machine", &self.machine)
            .field("actuators", &self.actuators)
            .field("supervisor", &self.supervisor)
            .field("polls", &self.polls)
            .finish()
    }
}

impl Controller {
    /// Validate the configuration, initialize the actuators and enter Idle.
    pub fn new(config: ControllerConfig, io: ControllerIo, now: Tick) -> Result<Self, ControlError> {
        config.validate()?;

        let ControllerIo {
            inputs: mut reader,
            cylinder,
            servo,
            mut panel,
        } = io;

        let mut actuators = Actuators::new(&config, cylinder, servo);
        actuators.init(now)?;

        let monitor = InputMonitor::new(&config.inputs, &config.debounce, reader.as_mut(), now);
        let mut machine = OperationalStateMachine::new(&config, now)?;
        let last_inputs = InputSnapshot::default();
        machine.start(&mut actuators, &last_inputs, now);

        let lights = StatusLights::for_state(machine.state());
        panel.show(lights);

        info!(
            "Controller ready: {} (feeding2={}, history={})",
            config.shared.service_name, config.cycle.feeding2_enabled, config.history.capacity
        );

        Ok(Self {
            config,
            reader,
            panel,
            monitor,
            actuators,
            machine,
            supervisor: SafetySupervisor::new(),
            observers: Vec::new(),
            shutdown_requested: false,
            last_inputs,
            lights,
            polls: 0,
        })
    }

    pub fn add_observer(&mut self, observer: Box<dyn CycleObserver>) {
        self.observers.push(observer);
    }

    /// Enter Shutdown on the next poll.
    pub fn request_shutdown(&mut self) {
        if !self.shutdown_requested {
            info!("Shutdown requested");
        }
        self.shutdown_requested = true;
    }

    /// One control loop iteration. Never blocks.
    pub fn poll(&mut self, now: Tick) -> OperationalState {
        self.polls += 1;

        let inputs = self.monitor.sample_all(self.reader.as_mut(), now);
        self.last_inputs = inputs;

        let verdict = self
            .supervisor
            .check(&inputs, &mut self.machine, &mut self.actuators, now);

        if verdict != SafetyVerdict::Tripped {
            let state = self.machine.state();
            if self.shutdown_requested && state != OperationalState::Shutdown {
                self.machine.abort_cycle("shutdown");
                self.machine
                    .transition(OperationalState::Shutdown, &mut self.actuators, &inputs, now);
            } else if inputs.stop_requested && state.is_cycle_state() {
                info!("Stop button pressed in {state}");
                self.machine.abort_cycle("stop button");
                self.machine
                    .transition(OperationalState::Idle, &mut self.actuators, &inputs, now);
            } else {
                self.machine.dispatch(&mut self.actuators, &inputs, now);
            }
        }

        if let Some(record) = self.machine.take_completed_cycle() {
            for observer in self.observers.iter_mut() {
                observer.cycle_completed(&record);
            }
        }

        let lights = StatusLights::for_state(self.machine.state());
        if lights != self.lights {
            debug!("Lights {:?} -> {:?}", self.lights, lights);
            self.panel.show(lights);
            self.lights = lights;
        }

        self.machine.state()
    }

    #[inline]
    pub fn state(&self) -> OperationalState {
        self.machine.state()
    }

    #[inline]
    pub fn time_in_state(&self, now: Tick) -> u64 {
        self.machine.time_in_state(now)
    }

    #[inline]
    pub fn history(&self) -> &StateHistory {
        self.machine.history()
    }

    #[inline]
    pub fn cycles_completed(&self) -> u64 {
        self.machine.cycles_completed()
    }

    #[inline]
    pub fn actuators(&self) -> &Actuators {
        &self.actuators
    }

    #[inline]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[inline]
    pub fn emergency_latched(&self) -> bool {
        self.supervisor.is_latched()
    }

    #[inline]
    pub fn last_inputs(&self) -> &InputSnapshot {
        &self.last_inputs
    }

    #[inline]
    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn snapshot(&self, now: Tick) -> ControllerSnapshot {
        ControllerSnapshot {
            service_name: self.config.shared.service_name.clone(),
            state: self.machine.state(),
            time_in_state_ms: self.machine.time_in_state(now),
            cycles_completed: self.machine.cycles_completed(),
            cylinder: self.actuators.cylinder.position(),
            rotary_angle: self.actuators.rotary.angle(),
            rotary_attached: self.actuators.rotary.is_attached(),
            emergency_latched: self.supervisor.is_latched(),
            emergency_trips: self.supervisor.trips(),
            lights: self.lights,
            inputs: self.last_inputs,
            history: self.machine.history().to_vec(),
            polls: self.polls,
        }
    }
}
