//! Input monitor: one debouncer per line plus polarity handling.

use rcc_common::control_unit::config::{DebounceConfig, InputsConfig, LineConfig};
use rcc_common::hal::driver::{InputReader, Tick};
use rcc_common::io::line::InputLine;
use serde::Serialize;
use tracing::debug;

use super::debounce::DebouncedInput;

/// Debounced view of all inputs for one poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InputSnapshot {
    /// Start sensor or manual start rose in this poll.
    pub start_requested: bool,
    /// Emergency stop is asserted (level, not edge).
    pub emergency_stop: bool,
    /// Stop button rose in this poll.
    pub stop_requested: bool,
    /// Stable asserted level per line, indexed by [`InputLine::index`].
    pub asserted: [bool; InputLine::COUNT],
}

/// Owns the debouncers for every input line.
#[derive(Debug)]
pub struct InputMonitor {
    lines: [DebouncedInput; InputLine::COUNT],
    wiring: [LineConfig; InputLine::COUNT],
}

impl InputMonitor {
    /// Read every line once and seed its debouncer with the result.
    pub fn new(
        inputs: &InputsConfig,
        debounce: &DebounceConfig,
        reader: &mut dyn InputReader,
        now: Tick,
    ) -> Self {
        let wiring = [
            inputs.start_sensor,
            inputs.manual_start,
            inputs.emergency_stop,
            inputs.stop_button,
        ];
        reader.begin_cycle(now);
        let lines = InputLine::ALL.map(|line| {
            let initial = asserted(reader, line, &wiring[line.index()]);
            if initial {
                debug!("{line} asserted at startup");
            }
            DebouncedInput::new(debounce, initial, now)
        });
        Self { lines, wiring }
    }

    /// Sample every line once.
    pub fn sample_all(&mut self, reader: &mut dyn InputReader, now: Tick) -> InputSnapshot {
        reader.begin_cycle(now);

        let mut snapshot = InputSnapshot::default();
        for line in InputLine::ALL {
            let idx = line.index();
            let raw = asserted(reader, line, &self.wiring[idx]);
            let sample = self.lines[idx].sample(raw, now);
            if sample.changed {
                debug!("{line} -> {}", if sample.value { "asserted" } else { "released" });
            }
            snapshot.asserted[idx] = sample.value;
        }

        snapshot.start_requested = self.rose(InputLine::StartSensor) || self.rose(InputLine::ManualStart);
        snapshot.emergency_stop = self.is_asserted(InputLine::EmergencyStop);
        snapshot.stop_requested = self.rose(InputLine::StopButton);
        snapshot
    }

    #[inline]
    pub fn is_asserted(&self, line: InputLine) -> bool {
        self.lines[line.index()].value()
    }

    #[inline]
    pub fn rose(&self, line: InputLine) -> bool {
        self.lines[line.index()].rose()
    }
}

/// Logical "asserted" for one line. Disabled lines never assert.
fn asserted(reader: &mut dyn InputReader, line: InputLine, wiring: &LineConfig) -> bool {
    if !wiring.enabled {
        return false;
    }
    reader.read(line) != wiring.active_low
}
