//! Integration test: emergency stop override and recovery.
//!
//! 1. Assertion at any point of a cycle → EmergencyStop + retracted
//!    cylinder within one poll of the debounced edge
//! 2. Release → Idle on the same debounced poll
//! 3. A held input at boot trips immediately
//! 4. Shutdown is never left

use rcc_common::control_unit::config::ControllerConfig;
use rcc_common::control_unit::state::OperationalState;
use rcc_common::io::lights::StatusLights;
use rcc_common::io::line::{InputLine, SignalLevel};
use rcc_hal::SimulatedIo;

use super::{POLL_MS, Rig};

/// Debounced edge for a raw change at `t` with 50 ms / 5 samples at 5 ms.
fn debounced(t: u64) -> u64 {
    t + 50 + POLL_MS
}

fn frame_at(rig: &Rig, t: u64) -> super::Frame {
    *rig.frames.iter().find(|f| f.now == t).unwrap()
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn emergency_mid_feed_then_recover() {
    let mut rig = Rig::new(ControllerConfig::default());
    rig.io.schedule_pulse(100, 200, InputLine::StartSensor);
    rig.io.schedule(1_000, InputLine::EmergencyStop, true);
    rig.io.schedule(3_000, InputLine::EmergencyStop, false);

    rig.run_until(debounced(1_000) - POLL_MS);
    assert_eq!(rig.controller.state(), OperationalState::Feeding);
    assert_eq!(rig.io.cylinder_level(), Some(SignalLevel::Low));

    rig.poll();
    assert_eq!(rig.controller.state(), OperationalState::EmergencyStop);
    assert_eq!(rig.io.cylinder_level(), Some(SignalLevel::High));
    assert!(!rig.io.servo_attached());
    assert_eq!(rig.io.lights(), StatusLights::FAULT);
    assert!(rig.controller.emergency_latched());

    // Nothing moves while stopped.
    let writes = rig.io.cylinder_writes();
    rig.run_until(debounced(3_000) - POLL_MS);
    assert_eq!(rig.controller.state(), OperationalState::EmergencyStop);
    assert_eq!(rig.io.cylinder_writes(), writes);

    rig.poll();
    assert_eq!(rig.controller.state(), OperationalState::Idle);
    assert!(!rig.controller.emergency_latched());
    assert!(rig.completed_cycles().is_empty());

    // A fresh start re-attaches the rotary and completes normally.
    rig.io.schedule_pulse(4_000, 200, InputLine::StartSensor);
    rig.run_until_state(OperationalState::Feeding, 1_000);
    assert!(rig.io.servo_attached());
    assert_eq!(rig.io.servo_angle(), Some(0));
    rig.run_until_state(OperationalState::Idle, 10_000);
    assert_eq!(rig.completed_cycles().len(), 1);
}

#[test]
fn emergency_at_any_point_retracts_within_one_poll() {
    for trip_at in (200..5_200).step_by(250) {
        let mut rig = Rig::new(ControllerConfig::default());
        rig.io.schedule_pulse(100, 200, InputLine::StartSensor);
        rig.io.schedule(trip_at, InputLine::EmergencyStop, true);
        rig.run_until(debounced(trip_at) + 10 * POLL_MS);

        let frame = frame_at(&rig, debounced(trip_at));
        assert_eq!(frame.state, OperationalState::EmergencyStop, "trip at {trip_at}");
        assert_eq!(frame.cylinder, Some(SignalLevel::High), "trip at {trip_at}");
        assert!(!frame.servo_attached, "trip at {trip_at}");
        assert_eq!(rig.controller.state(), OperationalState::EmergencyStop);
    }
}

#[test]
fn emergency_held_at_boot_trips_first_poll() {
    let io = SimulatedIo::new();
    io.set_input(InputLine::EmergencyStop, true);
    let mut rig = Rig::with_io(io, ControllerConfig::default());

    assert_eq!(rig.poll(), OperationalState::EmergencyStop);
    assert!(!rig.io.servo_attached());

    rig.io.schedule_pulse(100, 200, InputLine::StartSensor);
    rig.io.schedule(1_000, InputLine::EmergencyStop, false);
    rig.run_until(1_000);
    assert_eq!(rig.controller.state(), OperationalState::EmergencyStop);

    let idle_at = rig.run_until_state(OperationalState::Idle, 500);
    assert_eq!(idle_at, debounced(1_000));
}

#[test]
fn normally_closed_emergency_contact() {
    let mut config = ControllerConfig::default();
    config.inputs.emergency_stop.active_low = true;
    let io = SimulatedIo::new();
    // Healthy NC loop reads HIGH.
    io.set_input(InputLine::EmergencyStop, true);
    let mut rig = Rig::with_io(io, config);

    rig.run_until(500);
    assert_eq!(rig.controller.state(), OperationalState::Idle);

    // Broken wire reads LOW and must stop the cell.
    rig.io.schedule(1_000, InputLine::EmergencyStop, false);
    rig.run_until(debounced(1_000));
    assert_eq!(rig.controller.state(), OperationalState::EmergencyStop);
}

#[test]
fn shutdown_survives_emergency() {
    let mut rig = Rig::new(ControllerConfig::default());
    rig.io.schedule_pulse(100, 200, InputLine::StartSensor);
    rig.run_until_state(OperationalState::Feeding, 1_000);

    rig.controller.request_shutdown();
    assert_eq!(rig.poll(), OperationalState::Shutdown);
    assert_eq!(rig.io.cylinder_level(), Some(SignalLevel::High));

    let t = rig.now();
    rig.io.schedule(t + POLL_MS, InputLine::EmergencyStop, true);
    rig.io.schedule(t + 1_000, InputLine::EmergencyStop, false);
    rig.run_until(t + 2_000);
    assert_eq!(rig.controller.state(), OperationalState::Shutdown);
    assert!(!rig.io.servo_attached());
    assert!(rig.completed_cycles().is_empty());
}
