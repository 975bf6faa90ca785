//! Integration test: complete production cycles with default timing.
//!
//! Timeline (600 / 2200 / 50 / 1000 ms): cylinder safe during the start
//! delay, extended for the feed window, safe afterwards; rotary at the
//! flip angle for ~1000 ms, then home for ~1000 ms; then Idle or Feeding2.
//! Boundaries hold within a few polls.

use rcc_common::control_unit::config::ControllerConfig;
use rcc_common::control_unit::state::OperationalState;
use rcc_common::io::lights::StatusLights;
use rcc_common::io::line::{InputLine, SignalLevel};

use super::{POLL_MS, Rig};

const TOLERANCE_MS: u64 = 3 * POLL_MS;

fn within(actual: u64, expected: u64) -> bool {
    actual >= expected && actual <= expected + TOLERANCE_MS
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn default_cycle_timeline() {
    let mut rig = Rig::new(ControllerConfig::default());
    // Default valve extends on LOW.
    let extended = |f: &super::Frame| f.cylinder == Some(SignalLevel::Low);

    rig.io.schedule_pulse(100, 200, InputLine::StartSensor);
    let feeding_at = rig.run_until_state(OperationalState::Feeding, 1_000);
    let flipping_at = rig.run_until_state(OperationalState::Flipping, 5_000);
    let idle_at = rig.run_until_state(OperationalState::Idle, 5_000);
    rig.run_until(idle_at + 500);

    // Feed window.
    let ext_first = rig.first_frame(0, extended).unwrap();
    let ext_last = rig.last_frame(extended).unwrap();
    assert!(within(ext_first - feeding_at, 600), "push began {} ms after entry", ext_first - feeding_at);
    assert!(within(ext_last + POLL_MS - ext_first, 2_200));
    assert!(flipping_at >= ext_last + POLL_MS + 50);

    // Cylinder never extended outside the feed window.
    assert!(rig.frames.iter().filter(|f| f.now < ext_first).all(|f| !extended(f)));
    assert!(rig.frames.iter().filter(|f| f.now > ext_last).all(|f| !extended(f)));

    // Flip window.
    let flip_first = rig.first_frame(flipping_at, |f| f.angle == Some(180)).unwrap();
    let flip_last = rig.last_frame(|f| f.angle == Some(180)).unwrap();
    let home_at = flip_last + POLL_MS;
    assert!(within(flip_first - flipping_at, 0));
    assert!(within(home_at - flip_first, 1_000));
    assert!(within(idle_at - home_at, 1_000));
    assert_eq!(rig.io.servo_angle(), Some(0));

    // Notification.
    let cycles = rig.completed_cycles();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].sequence, 1);
    assert_eq!(cycles[0].started_at, feeding_at);
    assert_eq!(cycles[0].completed_at, idle_at);
    assert_eq!(cycles[0].feed_passes, 1);
    assert_eq!(rig.controller.cycles_completed(), 1);
    assert_eq!(rig.io.lights(), StatusLights::READY);
}

#[test]
fn feeding2_runs_second_pass() {
    let mut config = ControllerConfig::default();
    config.cycle.feeding2_enabled = true;
    let mut rig = Rig::new(config);

    rig.io.schedule_pulse(100, 200, InputLine::ManualStart);
    rig.run_until_state(OperationalState::Feeding, 1_000);
    rig.run_until_state(OperationalState::Flipping, 5_000);
    let feeding2_at = rig.run_until_state(OperationalState::Feeding2, 5_000);
    let idle_at = rig.run_until_state(OperationalState::Idle, 5_000);

    let second_push = rig
        .first_frame(feeding2_at, |f| f.cylinder == Some(SignalLevel::Low))
        .unwrap();
    assert!(within(second_push - feeding2_at, 600));
    assert!(idle_at - feeding2_at >= 600 + 2_200 + 50);

    let cycles = rig.completed_cycles();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].feed_passes, 2);
}

#[test]
fn consecutive_cycles_are_numbered() {
    let mut rig = Rig::new(ControllerConfig::default());
    rig.io.schedule_pulse(100, 200, InputLine::StartSensor);
    rig.io.schedule_pulse(6_000, 200, InputLine::StartSensor);
    rig.run_until(12_000);

    let cycles = rig.completed_cycles();
    assert_eq!(cycles.len(), 2);
    assert_eq!(cycles[0].sequence, 1);
    assert_eq!(cycles[1].sequence, 2);
    assert!(cycles[1].started_at > cycles[0].completed_at);
}

#[test]
fn start_during_cycle_is_ignored() {
    let mut rig = Rig::new(ControllerConfig::default());
    rig.io.schedule_pulse(100, 200, InputLine::StartSensor);
    rig.io.schedule_pulse(1_500, 200, InputLine::ManualStart);
    rig.run_until(8_000);

    assert_eq!(rig.completed_cycles().len(), 1);
    let feeding_entries = rig
        .controller
        .history()
        .iter()
        .filter(|e| e.state == OperationalState::Feeding)
        .count();
    assert_eq!(feeding_entries, 1);
}

#[test]
fn stop_button_aborts_cycle() {
    let mut config = ControllerConfig::default();
    config.inputs.stop_button.enabled = true;
    let mut rig = Rig::new(config);

    rig.io.schedule_pulse(100, 200, InputLine::StartSensor);
    rig.io.schedule_pulse(1_500, 200, InputLine::StopButton);
    rig.run_until_state(OperationalState::Feeding, 1_000);
    let idle_at = rig.run_until_state(OperationalState::Idle, 3_000);

    assert!(within(idle_at, 1_550));
    assert_eq!(rig.io.cylinder_level(), Some(SignalLevel::High));
    rig.run_until(idle_at + 3_000);
    assert!(rig.completed_cycles().is_empty());
    assert_eq!(rig.controller.cycles_completed(), 0);
}

#[test]
fn stop_during_flip_returns_rotary_home() {
    let mut config = ControllerConfig::default();
    config.inputs.stop_button.enabled = true;
    let mut rig = Rig::new(config);

    rig.io.schedule_pulse(100, 200, InputLine::StartSensor);
    rig.run_until_state(OperationalState::Feeding, 1_000);
    let flipping_at = rig.run_until_state(OperationalState::Flipping, 5_000);
    rig.io.schedule_pulse(flipping_at + 100, 200, InputLine::StopButton);

    let idle_at = rig.run_until_state(OperationalState::Idle, 1_000);
    assert!(within(idle_at, flipping_at + 155));
    let before = rig.frames.iter().rev().nth(1).unwrap();
    assert_eq!(before.state, OperationalState::Flipping);
    assert_eq!(before.angle, Some(180));

    assert_eq!(rig.io.servo_angle(), Some(0));
    assert!(rig.io.servo_attached());
    assert_eq!(rig.io.cylinder_level(), Some(SignalLevel::High));

    rig.run_until(idle_at + 3_000);
    assert_eq!(rig.controller.state(), OperationalState::Idle);
    assert_eq!(rig.io.servo_angle(), Some(0));
    assert!(rig.completed_cycles().is_empty());
}

#[test]
fn flip_timeout_recovers_with_rotary_home() {
    let mut config = ControllerConfig::default();
    config.cycle.start_delay_ms = 100;
    config.cycle.feed_duration_ms = 300;
    config.rotary.move_delay_ms = 1_500;
    config.safety.max_state_duration_ms = Some(1_000);
    let mut rig = Rig::new(config);

    rig.io.schedule_pulse(100, 200, InputLine::StartSensor);
    rig.run_until_state(OperationalState::Feeding, 1_000);
    let flipping_at = rig.run_until_state(OperationalState::Flipping, 2_000);

    let error_at = rig.run_until_state(OperationalState::Error, 2_000);
    assert!(within(error_at, flipping_at + 1_000));
    let before = rig.frames.iter().rev().nth(1).unwrap();
    assert_eq!(before.angle, Some(180));
    assert_eq!(rig.io.servo_angle(), Some(0));
    assert_eq!(rig.io.lights(), StatusLights::FAULT);

    let idle_at = rig.run_until_state(OperationalState::Idle, 6_000);
    assert!(within(idle_at, error_at + 5_000));
    assert_eq!(rig.io.servo_angle(), Some(0));
    assert!(rig.io.servo_attached());
    assert_eq!(rig.io.cylinder_level(), Some(SignalLevel::High));
    assert!(rig.completed_cycles().is_empty());
}

#[test]
fn history_keeps_latest_transitions() {
    let mut config = ControllerConfig::default();
    config.history.capacity = 3;
    let mut rig = Rig::new(config);

    assert_eq!(rig.controller.history().len(), 1);
    rig.io.schedule_pulse(100, 200, InputLine::StartSensor);
    let idle_at = {
        rig.run_until_state(OperationalState::Feeding, 1_000);
        rig.run_until_state(OperationalState::Idle, 10_000)
    };

    let history = rig.controller.history();
    assert_eq!(history.len(), 3);
    let states: Vec<_> = history.iter().map(|e| e.state).collect();
    assert_eq!(
        states,
        vec![
            OperationalState::Feeding,
            OperationalState::Flipping,
            OperationalState::Idle
        ]
    );
    assert_eq!(history.latest().unwrap().entered_at, idle_at);
}
