//! Named input lines and electrical signal levels.

use serde::{Deserialize, Serialize};

/// A digital input line consumed by the control engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum InputLine {
    /// Part-present sensor that starts a production cycle.
    StartSensor = 0,
    /// Operator start push-button.
    ManualStart = 1,
    /// Emergency-stop mushroom button.
    EmergencyStop = 2,
    /// Operator stop push-button (aborts the running cycle).
    StopButton = 3,
}

impl InputLine {
    /// Number of input lines.
    pub const COUNT: usize = 4;

    /// All lines, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::StartSensor,
        Self::ManualStart,
        Self::EmergencyStop,
        Self::StopButton,
    ];

    /// Array index of this line.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::StartSensor),
            1 => Some(Self::ManualStart),
            2 => Some(Self::EmergencyStop),
            3 => Some(Self::StopButton),
            _ => None,
        }
    }

    /// Human-readable name used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::StartSensor => "start_sensor",
            Self::ManualStart => "manual_start",
            Self::EmergencyStop => "emergency_stop",
            Self::StopButton => "stop_button",
        }
    }
}

impl std::fmt::Display for InputLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Electrical level of a digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalLevel {
    Low,
    High,
}

impl SignalLevel {
    /// The opposite level.
    #[inline]
    pub const fn inverted(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }

    /// `true` for `High`.
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }

    #[inline]
    pub const fn from_bool(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

impl std::fmt::Display for SignalLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => f.write_str("LOW"),
            Self::High => f.write_str("HIGH"),
        }
    }
}
