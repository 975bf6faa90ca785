//! Actuator drivers.
//!
//! The cell has exactly one binary pneumatic valve and one angle-controlled
//! rotary actuator. Both drivers are idempotent and remember the last
//! command, which is taken as the physical position.

pub mod cylinder;
pub mod rotary;

use rcc_common::control_unit::config::ControllerConfig;
use rcc_common::hal::driver::{HalError, OutputPin, ServoChannel, Tick};

pub use cylinder::CylinderDriver;
pub use rotary::RotaryDriver;

/// The fixed actuator set, passed explicitly to sequencers and handlers.
#[derive(Debug)]
pub struct Actuators {
    pub cylinder: CylinderDriver,
    pub rotary: RotaryDriver,
}

impl Actuators {
    pub fn new(
        config: &ControllerConfig,
        cylinder_pin: Box<dyn OutputPin>,
        servo: Box<dyn ServoChannel>,
    ) -> Self {
        Self {
            cylinder: CylinderDriver::new(cylinder_pin, &config.cylinder),
            rotary: RotaryDriver::new(servo, &config.rotary),
        }
    }

    /// Bring both actuators to their rest posture.
    pub fn init(&mut self, now: Tick) -> Result<(), HalError> {
        self.cylinder.init();
        self.rotary.init(now)
    }

    /// Rest posture for Idle and Error: cylinder retracted, rotary back at
    /// home. A rotary already at home is left alone, detached or not.
    pub fn park(&mut self, now: Tick) {
        self.cylinder.retract();
        if !self.rotary.is_home() {
            self.rotary.move_to_home(now);
        }
    }

    /// Retract the cylinder and park the rotary, from any lifecycle state.
    pub fn force_safe(&mut self, now: Tick) {
        self.cylinder.emergency_retract();
        self.rotary.emergency_home(now);
    }
}
