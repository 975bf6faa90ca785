//! State enums for the router cell.
//!
//! `#[repr(u8)]` keeps the values compact for diagnostics export.

use serde::{Deserialize, Serialize};

/// Operational state of the production cycle.
///
/// Exactly one state is active at any time and it changes only through the
/// state machine's transition operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum OperationalState {
    /// Waiting for a start signal.
    #[default]
    Idle = 0,
    /// First feed pass: cylinder pushes the workpiece through the router.
    Feeding = 1,
    /// Rotary actuator flips the workpiece.
    Flipping = 2,
    /// Optional second feed pass.
    Feeding2 = 3,
    /// Defensive fallback; returns to Idle after a delay.
    Error = 4,
    /// Emergency stop latched; returns to Idle on release.
    EmergencyStop = 5,
    /// Terminal state after an explicit shutdown command.
    Shutdown = 6,
}

impl OperationalState {
    /// Number of states.
    pub const COUNT: usize = 7;

    /// All states, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Idle,
        Self::Feeding,
        Self::Flipping,
        Self::Feeding2,
        Self::Error,
        Self::EmergencyStop,
        Self::Shutdown,
    ];

    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Idle),
            1 => Some(Self::Feeding),
            2 => Some(Self::Flipping),
            3 => Some(Self::Feeding2),
            4 => Some(Self::Error),
            5 => Some(Self::EmergencyStop),
            6 => Some(Self::Shutdown),
            _ => None,
        }
    }

    /// Lookup-table index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// States that belong to a running production cycle.
    #[inline]
    pub const fn is_cycle_state(self) -> bool {
        matches!(self, Self::Feeding | Self::Flipping | Self::Feeding2)
    }

    /// Upper-case name used in logs and on the dashboard.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Feeding => "FEEDING",
            Self::Flipping => "FLIPPING",
            Self::Feeding2 => "FEEDING2",
            Self::Error => "ERROR",
            Self::EmergencyStop => "EMERGENCY_STOP",
            Self::Shutdown => "SHUTDOWN",
        }
    }
}

impl std::fmt::Display for OperationalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Commanded position of the feed cylinder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CylinderPosition {
    /// Safe position, out of the material path.
    #[default]
    Retracted = 0,
    /// Pushing material through the router.
    Extended = 1,
}

impl std::fmt::Display for CylinderPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Retracted => f.write_str("RETRACTED"),
            Self::Extended => f.write_str("EXTENDED"),
        }
    }
}
