//! Simulated I/O bus for the router cell.
//!
//! `SimulatedIo` manages:
//! - Electrical levels of the four input lines
//! - A time-ordered queue of scripted input changes
//! - Optional periodic start-sensor pulses (simulated conveyor)
//! - The last level written to the cylinder valve
//! - Servo attach state and angle
//! - The status lamp pattern

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use rcc_common::hal::driver::{
    HalError, IndicatorPanel, InputReader, OutputPin, ServoChannel, Tick,
};
use rcc_common::io::lights::StatusLights;
use rcc_common::io::line::{InputLine, SignalLevel};
use tracing::{debug, trace};

/// Input change queued for a future tick.
#[derive(Debug, Clone, Copy)]
struct PendingInputChange {
    /// When this change should be applied
    at: Tick,
    line: InputLine,
    high: bool,
}

/// Periodic start-sensor pulse generator.
#[derive(Debug, Clone, Copy)]
struct AutoStart {
    period_ms: u64,
    pulse_ms: u64,
    next_at: Tick,
}

#[derive(Debug, Default)]
struct SimState {
    inputs: [bool; InputLine::COUNT],
    pending: VecDeque<PendingInputChange>,
    auto_start: Option<AutoStart>,

    cylinder_configured: bool,
    cylinder_level: Option<SignalLevel>,
    cylinder_writes: u64,

    servo_attached: bool,
    servo_angle: Option<u16>,
    servo_fail_attach: bool,

    lights: StatusLights,
}

impl SimState {
    fn apply_pending(&mut self, now: Tick) {
        if let Some(auto) = self.auto_start.as_mut() {
            while auto.next_at <= now {
                let at = auto.next_at;
                let pulse = auto.pulse_ms;
                auto.next_at += auto.period_ms;
                Self::insert_sorted(&mut self.pending, PendingInputChange {
                    at,
                    line: InputLine::StartSensor,
                    high: true,
                });
                Self::insert_sorted(&mut self.pending, PendingInputChange {
                    at: at + pulse,
                    line: InputLine::StartSensor,
                    high: false,
                });
            }
        }

        while let Some(change) = self.pending.front().copied() {
            if change.at > now {
                break;
            }
            self.pending.pop_front();
            let old = self.inputs[change.line.index()];
            self.inputs[change.line.index()] = change.high;
            if old != change.high {
                debug!(
                    "{} changed: {} -> {}",
                    change.line,
                    SignalLevel::from_bool(old),
                    SignalLevel::from_bool(change.high)
                );
            }
        }
    }

    fn insert_sorted(queue: &mut VecDeque<PendingInputChange>, change: PendingInputChange) {
        // Stable for equal ticks: later inserts apply after earlier ones.
        let pos = queue.partition_point(|p| p.at <= change.at);
        queue.insert(pos, change);
    }
}

/// Shared simulated I/O bus.
///
/// Clones refer to the same bus. Hand the trait handles to the controller
/// and keep a clone to script inputs and observe outputs.
#[derive(Debug, Clone, Default)]
pub struct SimulatedIo {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedIo {
    /// Create a bus with every input LOW and no outputs written.
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Handles ────────────────────────────────────────────────────

    pub fn input_reader(&self) -> SimInputReader {
        SimInputReader {
            state: Arc::clone(&self.state),
        }
    }

    pub fn cylinder_pin(&self) -> SimCylinderPin {
        SimCylinderPin {
            state: Arc::clone(&self.state),
        }
    }

    pub fn servo(&self) -> SimServo {
        SimServo {
            state: Arc::clone(&self.state),
        }
    }

    pub fn indicator_panel(&self) -> SimIndicatorPanel {
        SimIndicatorPanel {
            state: Arc::clone(&self.state),
        }
    }

    // ─── Input scripting ────────────────────────────────────────────

    /// Set an input's electrical level immediately.
    pub fn set_input(&self, line: InputLine, high: bool) {
        self.state.lock().inputs[line.index()] = high;
    }

    /// Queue an input change applied at the first poll with `now >= at`.
    pub fn schedule(&self, at: Tick, line: InputLine, high: bool) {
        let mut state = self.state.lock();
        SimState::insert_sorted(&mut state.pending, PendingInputChange { at, line, high });
        trace!("scheduled {} = {} at {}", line, SignalLevel::from_bool(high), at);
    }

    /// Queue a HIGH pulse of `width_ms` on `line` starting at `at`.
    pub fn schedule_pulse(&self, at: Tick, width_ms: u64, line: InputLine) {
        self.schedule(at, line, true);
        self.schedule(at + width_ms, line, false);
    }

    /// Pulse the start sensor every `period_ms`, first at `first_at`.
    pub fn set_auto_start(&self, first_at: Tick, period_ms: u64, pulse_ms: u64) {
        self.state.lock().auto_start = Some(AutoStart {
            period_ms: period_ms.max(1),
            pulse_ms,
            next_at: first_at,
        });
    }

    /// Make the next servo `attach` fail.
    pub fn fail_next_attach(&self) {
        self.state.lock().servo_fail_attach = true;
    }

    // ─── Observation ────────────────────────────────────────────────

    pub fn input(&self, line: InputLine) -> bool {
        self.state.lock().inputs[line.index()]
    }

    /// Number of scripted input changes not yet applied.
    pub fn pending_changes(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn cylinder_configured(&self) -> bool {
        self.state.lock().cylinder_configured
    }

    /// Last level written to the valve, `None` before the first write.
    pub fn cylinder_level(&self) -> Option<SignalLevel> {
        self.state.lock().cylinder_level
    }

    pub fn cylinder_writes(&self) -> u64 {
        self.state.lock().cylinder_writes
    }

    pub fn servo_attached(&self) -> bool {
        self.state.lock().servo_attached
    }

    /// Last angle written while attached.
    pub fn servo_angle(&self) -> Option<u16> {
        self.state.lock().servo_angle
    }

    pub fn lights(&self) -> StatusLights {
        self.state.lock().lights
    }
}

/// Input handle. Applies scripted changes in `begin_cycle`.
#[derive(Debug)]
pub struct SimInputReader {
    state: Arc<Mutex<SimState>>,
}

impl InputReader for SimInputReader {
    fn begin_cycle(&mut self, now: Tick) {
        self.state.lock().apply_pending(now);
    }

    fn read(&mut self, line: InputLine) -> bool {
        self.state.lock().inputs[line.index()]
    }
}

/// Cylinder valve output handle.
#[derive(Debug)]
pub struct SimCylinderPin {
    state: Arc<Mutex<SimState>>,
}

impl OutputPin for SimCylinderPin {
    fn configure(&mut self) {
        self.state.lock().cylinder_configured = true;
    }

    fn write(&mut self, level: SignalLevel) {
        let mut state = self.state.lock();
        if !state.cylinder_configured {
            // Unconfigured pins do not drive the line.
            return;
        }
        if state.cylinder_level != Some(level) {
            trace!("cylinder valve -> {}", level);
        }
        state.cylinder_level = Some(level);
        state.cylinder_writes += 1;
    }
}

/// Servo channel handle.
#[derive(Debug)]
pub struct SimServo {
    state: Arc<Mutex<SimState>>,
}

impl ServoChannel for SimServo {
    fn attach(&mut self) -> Result<(), HalError> {
        let mut state = self.state.lock();
        if state.servo_fail_attach {
            state.servo_fail_attach = false;
            return Err(HalError::AttachFailed("simulated servo".to_string()));
        }
        state.servo_attached = true;
        Ok(())
    }

    fn detach(&mut self) {
        self.state.lock().servo_attached = false;
    }

    fn write_angle(&mut self, deg: u16) {
        let mut state = self.state.lock();
        if state.servo_attached {
            state.servo_angle = Some(deg);
        }
    }
}

/// Status lamp handle.
#[derive(Debug)]
pub struct SimIndicatorPanel {
    state: Arc<Mutex<SimState>>,
}

impl IndicatorPanel for SimIndicatorPanel {
    fn show(&mut self, lights: StatusLights) {
        self.state.lock().lights = lights;
    }
}
