//! Integration test: both cylinder valve polarities.
//!
//! The same cycle is run with `extend_level = low` and `extend_level =
//! high`; the electrical levels must mirror each other exactly.

use rcc_common::control_unit::config::ControllerConfig;
use rcc_common::control_unit::state::OperationalState;
use rcc_common::io::line::{InputLine, SignalLevel};

use super::Rig;

fn run_cycle(extend_level: SignalLevel) -> Rig {
    let mut config = ControllerConfig::default();
    config.cylinder.extend_level = extend_level;
    let mut rig = Rig::new(config);
    rig.io.schedule_pulse(100, 200, InputLine::StartSensor);
    rig.run_until_state(OperationalState::Feeding, 1_000);
    rig.run_until_state(OperationalState::Idle, 10_000);
    rig
}

fn check_polarity(extend_level: SignalLevel) {
    let retract_level = extend_level.inverted();
    let rig = run_cycle(extend_level);

    // Boot and end of cycle: retracted.
    assert_eq!(rig.frames[0].cylinder, Some(retract_level));
    assert_eq!(rig.io.cylinder_level(), Some(retract_level));

    let pushing: Vec<_> = rig
        .frames
        .iter()
        .filter(|f| f.cylinder == Some(extend_level))
        .collect();
    assert!(!pushing.is_empty());
    assert!(pushing.iter().all(|f| f.state == OperationalState::Feeding));
    assert!(rig.controller.actuators().cylinder.commanded_level() == Some(retract_level));
}

#[test]
fn extend_on_low() {
    check_polarity(SignalLevel::Low);
}

#[test]
fn extend_on_high() {
    check_polarity(SignalLevel::High);
}

#[test]
fn polarities_mirror_each_other() {
    let low = run_cycle(SignalLevel::Low);
    let high = run_cycle(SignalLevel::High);
    assert_eq!(low.frames.len(), high.frames.len());
    for (a, b) in low.frames.iter().zip(high.frames.iter()) {
        assert_eq!(a.now, b.now);
        assert_eq!(a.state, b.state);
        assert_eq!(a.cylinder.map(SignalLevel::inverted), b.cylinder);
    }
}

#[test]
fn emergency_retract_uses_configured_level() {
    for extend_level in [SignalLevel::Low, SignalLevel::High] {
        let mut config = ControllerConfig::default();
        config.cylinder.extend_level = extend_level;
        let mut rig = Rig::new(config);
        rig.io.schedule_pulse(100, 200, InputLine::StartSensor);
        rig.io.schedule(1_000, InputLine::EmergencyStop, true);
        rig.run_until(1_200);
        assert_eq!(rig.controller.state(), OperationalState::EmergencyStop);
        assert_eq!(rig.io.cylinder_level(), Some(extend_level.inverted()));
    }
}
