//! Diagnostic records exposed to collaborators (dashboard, telemetry).

use serde::{Deserialize, Serialize};

use super::state::OperationalState;
use crate::hal::driver::Tick;

/// One recorded state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateHistoryEntry {
    /// State that was entered.
    pub state: OperationalState,
    /// Tick at which it was entered [ms].
    pub entered_at: Tick,
}

/// Summary of one completed Idle → … → Idle production cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRecord {
    /// 1-based count of completed cycles since boot.
    pub sequence: u64,
    /// Tick at which Feeding was entered [ms].
    pub started_at: Tick,
    /// Tick at which Idle was re-entered [ms].
    pub completed_at: Tick,
    /// Number of feed passes performed (1 or 2).
    pub feed_passes: u8,
}

impl CycleRecord {
    /// Cycle duration [ms].
    #[inline]
    pub const fn duration_ms(&self) -> u64 {
        self.completed_at.saturating_sub(self.started_at)
    }
}
