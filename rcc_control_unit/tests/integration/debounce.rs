//! Integration test: start inputs are debounced end to end.
//!
//! A pulse shorter than the window never starts a cycle; one held past the
//! window and sampled often enough starts exactly one. The same two edge
//! counts are checked as properties directly on the debouncer, over window,
//! sample count, sampling period and pulse width.

use proptest::prelude::*;
use rcc_common::control_unit::config::{ControllerConfig, DebounceConfig};
use rcc_common::control_unit::state::OperationalState;
use rcc_common::hal::driver::Tick;
use rcc_common::io::line::InputLine;
use rcc_control_unit::input::DebouncedInput;

use super::Rig;

fn feeding_entries(rig: &Rig) -> usize {
    rig.controller
        .history()
        .iter()
        .filter(|e| e.state == OperationalState::Feeding)
        .count()
}

#[test]
fn short_glitch_is_ignored() {
    let mut rig = Rig::new(ControllerConfig::default());
    rig.io.schedule_pulse(100, 30, InputLine::StartSensor);
    rig.io.schedule_pulse(500, 50, InputLine::ManualStart);
    rig.run_until(2_000);
    assert_eq!(rig.controller.state(), OperationalState::Idle);
    assert_eq!(feeding_entries(&rig), 0);
}

#[test]
fn held_pulse_starts_exactly_one_cycle() {
    let mut rig = Rig::new(ControllerConfig::default());
    rig.io.schedule_pulse(100, 60, InputLine::StartSensor);
    rig.run_until(8_000);
    assert_eq!(feeding_entries(&rig), 1);
    assert_eq!(rig.completed_cycles().len(), 1);
}

#[test]
fn bouncing_contact_settles_to_one_start() {
    let mut rig = Rig::new(ControllerConfig::default());
    let mut t = 100;
    for _ in 0..6 {
        rig.io.schedule(t, InputLine::ManualStart, true);
        rig.io.schedule(t + 10, InputLine::ManualStart, false);
        t += 20;
    }
    rig.io.schedule(t, InputLine::ManualStart, true);
    rig.io.schedule(t + 1_000, InputLine::ManualStart, false);

    let feeding_at = rig.run_until_state(OperationalState::Feeding, 1_000);
    assert_eq!(feeding_at, t + 55);
    rig.run_until(8_000);
    assert_eq!(feeding_entries(&rig), 1);
}

#[test]
fn sample_count_dominates_with_short_window() {
    let mut config = ControllerConfig::default();
    config.debounce.window_ms = 10;
    config.debounce.sample_count = 20;
    let mut rig = Rig::new(config);
    rig.io.schedule(100, InputLine::StartSensor, true);

    let feeding_at = rig.run_until_state(OperationalState::Feeding, 1_000);
    // Change seen at 100, twenty unchanged samples later.
    assert_eq!(feeding_at, 200);
}

#[test]
fn held_start_does_not_retrigger() {
    let mut rig = Rig::new(ControllerConfig::default());
    rig.io.schedule(100, InputLine::StartSensor, true);
    rig.run_until(15_000);
    assert_eq!(feeding_entries(&rig), 1);
    assert_eq!(rig.controller.state(), OperationalState::Idle);
}

// ── Properties ──────────────────────────────────────────────────────

/// Sample a HIGH pulse on `[start, start + width)` every `period` ms from 0
/// to `end`. Returns (rising, falling) stable edge counts.
fn count_edges(config: &DebounceConfig, start: Tick, width: u64, period: u64, end: Tick) -> (usize, usize) {
    let mut input = DebouncedInput::new(config, false, 0);
    let (mut rising, mut falling) = (0, 0);
    let mut now = 0;
    while now <= end {
        let raw = now >= start && now < start + width;
        let sample = input.sample(raw, now);
        if sample.changed {
            if sample.value {
                rising += 1;
            } else {
                falling += 1;
            }
        }
        now += period;
    }
    (rising, falling)
}

proptest! {
    #[test]
    fn pulse_within_window_never_edges(
        window_ms in 1u64..500,
        sample_count in 1u32..20,
        period in 1u64..50,
        start in 0u64..1_000,
        width_pct in 0u64..=100,
    ) {
        let config = DebounceConfig { window_ms, sample_count };
        let width = window_ms * width_pct / 100;
        let end = start + width + window_ms + (sample_count as u64 + 2) * period;
        prop_assert_eq!(count_edges(&config, start, width, period, end), (0, 0));
    }

    #[test]
    fn held_pulse_edges_exactly_once(
        window_ms in 0u64..500,
        sample_count in 1u32..20,
        period in 1u64..50,
        start in 0u64..1_000,
        extra in 0u64..500,
    ) {
        let config = DebounceConfig { window_ms, sample_count };
        let settle = window_ms + (sample_count as u64 + 2) * period;
        let width = settle + extra;
        let end = start + width + settle;
        prop_assert_eq!(count_edges(&config, start, width, period, end), (1, 1));
    }
}
