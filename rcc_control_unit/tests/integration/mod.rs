//! Shared rig for the integration tests.

mod debounce;
mod emergency_stop;
mod full_cycle;
mod polarity;
mod sequence_timing;

use std::sync::Arc;

use parking_lot::Mutex;
use rcc_common::control_unit::config::ControllerConfig;
use rcc_common::control_unit::diagnostics::CycleRecord;
use rcc_common::control_unit::state::OperationalState;
use rcc_common::hal::driver::{CycleObserver, Tick, TickSource};
use rcc_common::io::line::SignalLevel;
use rcc_control_unit::controller::{Controller, ControllerIo};
use rcc_hal::{ManualClock, SimulatedIo};

/// Poll granularity used by every rig [ms].
pub const POLL_MS: u64 = 5;

/// One observation taken after a poll.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub now: Tick,
    pub state: OperationalState,
    pub cylinder: Option<SignalLevel>,
    pub angle: Option<u16>,
    pub servo_attached: bool,
}

/// Collects cycle notifications.
#[derive(Clone, Default)]
pub struct Recorder(pub Arc<Mutex<Vec<CycleRecord>>>);

impl CycleObserver for Recorder {
    fn cycle_completed(&mut self, record: &CycleRecord) {
        self.0.lock().push(*record);
    }
}

pub struct Rig {
    pub io: SimulatedIo,
    pub clock: ManualClock,
    pub controller: Controller,
    pub cycles: Recorder,
    pub frames: Vec<Frame>,
}

impl Rig {
    pub fn new(config: ControllerConfig) -> Self {
        Self::with_io(SimulatedIo::new(), config)
    }

    /// Build with a pre-scripted bus (inputs already set before boot).
    pub fn with_io(io: SimulatedIo, config: ControllerConfig) -> Self {
        let clock = ManualClock::new(0);
        let mut controller = Controller::new(
            config,
            ControllerIo {
                inputs: Box::new(io.input_reader()),
                cylinder: Box::new(io.cylinder_pin()),
                servo: Box::new(io.servo()),
                panel: Box::new(io.indicator_panel()),
            },
            clock.now(),
        )
        .unwrap();
        let cycles = Recorder::default();
        controller.add_observer(Box::new(cycles.clone()));
        Self {
            io,
            clock,
            controller,
            cycles,
            frames: Vec::new(),
        }
    }

    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    /// Advance one poll interval and poll.
    pub fn poll(&mut self) -> OperationalState {
        let now = self.clock.advance(POLL_MS);
        let state = self.controller.poll(now);
        self.frames.push(Frame {
            now,
            state,
            cylinder: self.io.cylinder_level(),
            angle: self.io.servo_angle(),
            servo_attached: self.io.servo_attached(),
        });
        state
    }

    /// Poll until `until` (inclusive).
    pub fn run_until(&mut self, until: Tick) {
        while self.now() + POLL_MS <= until {
            self.poll();
        }
    }

    /// Poll until the controller reports `state`; returns the tick.
    pub fn run_until_state(&mut self, state: OperationalState, limit_ms: u64) -> Tick {
        let limit = self.now() + limit_ms;
        while self.controller.state() != state {
            assert!(
                self.now() < limit,
                "{state} not reached within {limit_ms} ms (stuck in {})",
                self.controller.state()
            );
            self.poll();
        }
        self.now()
    }

    pub fn completed_cycles(&self) -> Vec<CycleRecord> {
        self.cycles.0.lock().clone()
    }

    /// First frame tick at which `pred` holds, searching from `from`.
    pub fn first_frame(&self, from: Tick, pred: impl Fn(&Frame) -> bool) -> Option<Tick> {
        self.frames
            .iter()
            .filter(|f| f.now >= from)
            .find(|f| pred(f))
            .map(|f| f.now)
    }

    /// Last frame tick at which `pred` holds.
    pub fn last_frame(&self, pred: impl Fn(&Frame) -> bool) -> Option<Tick> {
        self.frames.iter().rev().find(|f| pred(f)).map(|f| f.now)
    }
}
