//! Emergency-stop supervisor.
//!
//! Latches on the first poll that sees the debounced emergency stop
//! asserted, including one already held at boot. On trip it seizes both
//! actuators and forces EmergencyStop; the state dispatch for that poll is
//! skipped. The latch clears when the input is released, and the
//! EmergencyStop handler then returns to Idle.

use rcc_common::control_unit::state::OperationalState;
use rcc_common::hal::driver::Tick;
use tracing::{info, warn};

use crate::actuator::Actuators;
use crate::input::InputSnapshot;
use crate::state::OperationalStateMachine;

/// Outcome of one supervisor check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyVerdict {
    /// Emergency stop not asserted.
    Clear,
    /// Tripped in this poll; skip dispatch.
    Tripped,
    /// Still asserted since an earlier trip.
    Latched,
}

#[derive(Debug, Default)]
pub struct SafetySupervisor {
    latched: bool,
    trips: u64,
}

impl SafetySupervisor {
    pub const fn new() -> Self {
        Self {
            latched: false,
            trips: 0,
        }
    }

    pub fn check(
        &mut self,
        inputs: &InputSnapshot,
        machine: &mut OperationalStateMachine,
        actuators: &mut Actuators,
        now: Tick,
    ) -> SafetyVerdict {
        if inputs.emergency_stop {
            if self.latched {
                return SafetyVerdict::Latched;
            }
            self.latched = true;
            self.trips += 1;
            warn!("EMERGENCY STOP in {}", machine.state());

            actuators.force_safe(now);
            if machine.state() != OperationalState::Shutdown {
                machine.transition(OperationalState::EmergencyStop, actuators, inputs, now);
            }
            return SafetyVerdict::Tripped;
        }

        if self.latched {
            self.latched = false;
            info!("Emergency stop input released");
        }
        SafetyVerdict::Clear
    }

    #[inline]
    pub const fn is_latched(&self) -> bool {
        self.latched
    }

    /// Number of trips since boot.
    #[inline]
    pub const fn trips(&self) -> u64 {
        self.trips
    }
}
