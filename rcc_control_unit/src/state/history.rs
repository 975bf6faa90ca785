//! Circular log of recent state transitions (diagnostics only).

use heapless::Deque;
use rcc_common::consts::MAX_HISTORY_CAPACITY;
use rcc_common::control_unit::diagnostics::StateHistoryEntry;
use rcc_common::control_unit::state::OperationalState;
use rcc_common::hal::driver::Tick;

/// Ring of the last `capacity` transitions; the oldest entry is dropped
/// when a new one arrives at capacity.
#[derive(Debug, Clone)]
pub struct StateHistory {
    entries: Deque<StateHistoryEntry, MAX_HISTORY_CAPACITY>,
    capacity: usize,
}

impl StateHistory {
    /// Capacity is clamped to `1..=MAX_HISTORY_CAPACITY`.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Deque::new(),
            capacity: capacity.clamp(1, MAX_HISTORY_CAPACITY),
        }
    }

    pub fn record(&mut self, state: OperationalState, entered_at: Tick) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        // Cannot fail: len < capacity <= MAX_HISTORY_CAPACITY.
        let _ = self.entries.push_back(StateHistoryEntry { state, entered_at });
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &StateHistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&StateHistoryEntry> {
        self.entries.back()
    }

    pub fn oldest(&self) -> Option<&StateHistoryEntry> {
        self.entries.front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn to_vec(&self) -> Vec<StateHistoryEntry> {
        self.entries.iter().copied().collect()
    }
}
