//! Status light bitflags (ready / running / fault lamps on the cell panel).

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::control_unit::state::OperationalState;

bitflags! {
    /// Lamps lit on the operator panel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct StatusLights: u8 {
        /// Cell idle and ready for a start signal.
        const READY   = 0x01;
        /// Production cycle in progress.
        const RUNNING = 0x02;
        /// Error, emergency stop or shutdown.
        const FAULT   = 0x04;
    }
}

impl StatusLights {
    /// Lamp pattern for an operational state.
    pub const fn for_state(state: OperationalState) -> Self {
        match state {
            OperationalState::Idle => Self::READY,
            OperationalState::Feeding
            | OperationalState::Flipping
            | OperationalState::Feeding2 => Self::RUNNING,
            OperationalState::Error
            | OperationalState::EmergencyStop
            | OperationalState::Shutdown => Self::FAULT,
        }
    }
}
