//! Property tests: time-gated steps never complete early, at any poll rate.

use proptest::prelude::*;
use rcc_common::control_unit::config::ControllerConfig;
use rcc_control_unit::actuator::Actuators;
use rcc_control_unit::sequence::{
    Completion, SequenceStatus, Step, StepAction, StepSequencer, feeding_sequence,
};
use rcc_hal::SimulatedIo;

fn actuators(io: &SimulatedIo) -> Actuators {
    let mut act = Actuators::new(
        &ControllerConfig::default(),
        Box::new(io.cylinder_pin()),
        Box::new(io.servo()),
    );
    act.init(0).unwrap();
    act
}

proptest! {
    #[test]
    fn elapsed_step_never_completes_early(
        duration in 0u64..5_000,
        poll_ms in 1u64..100,
        start in 0u64..10_000,
    ) {
        let io = SimulatedIo::new();
        let mut act = actuators(&io);
        let mut seq = StepSequencer::new(
            "wait",
            &[Step::new("wait", StepAction::None, Completion::Elapsed(duration))],
        ).unwrap();

        let mut now = start;
        while seq.poll(now, &mut act) == SequenceStatus::Running {
            now += poll_ms;
        }
        let waited = now - start;
        prop_assert!(waited >= duration);
        prop_assert!(waited < duration + poll_ms);
    }

    #[test]
    fn feed_push_lasts_at_least_feed_duration(
        start_delay in 0u64..2_000,
        feed in 1u64..5_000,
        poll_ms in 1u64..50,
    ) {
        let mut config = ControllerConfig::default();
        config.cycle.start_delay_ms = start_delay;
        config.cycle.feed_duration_ms = feed;

        let io = SimulatedIo::new();
        let mut act = actuators(&io);
        let mut seq = feeding_sequence("FEEDING", &config.cycle).unwrap();

        let mut now = 0;
        let mut extended_at = None;
        let mut retracted_at = None;
        while seq.poll(now, &mut act) == SequenceStatus::Running {
            match (act.cylinder.is_extended(), extended_at, retracted_at) {
                (true, None, _) => extended_at = Some(now),
                (false, Some(_), None) => retracted_at = Some(now),
                _ => {}
            }
            now += poll_ms;
        }

        let extended_at = extended_at.unwrap();
        let retracted_at = retracted_at.unwrap();
        prop_assert!(extended_at >= start_delay);
        prop_assert!(retracted_at - extended_at >= feed);
    }
}
