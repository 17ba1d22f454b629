//! In-memory reading accumulator.
//!
//! Owns the [`Session`] for one run. Lines that do not parse as a base-10
//! integer are sensor noise and are dropped without error.

use lcs_core::clock::{Clock, SystemClock};
use lcs_core::models::{Reading, Session, CSV_HEADER};
use tracing::trace;

/// Accumulates readings against a fixed session start time.
pub struct Accumulator<C: Clock = SystemClock> {
    clock: C,
    session: Session,
}

impl Accumulator<SystemClock> {
    /// Start a session now, using the system clock.
    pub fn start() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> Accumulator<C> {
    /// Start a session at `clock.now_ms()`.
    pub fn with_clock(clock: C) -> Self {
        let session = Session::new(clock.now_ms());
        Self { clock, session }
    }

    /// Parse `raw_line` and append it as a reading.
    ///
    /// Surrounding whitespace is trimmed. Empty or non-integer text is a
    /// no-op and returns `None`; otherwise the appended reading is returned.
    pub fn append(&mut self, raw_line: &str) -> Option<Reading> {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let value: i64 = match trimmed.parse() {
            Ok(v) => v,
            Err(_) => {
                trace!(line = trimmed, "dropping non-numeric line");
                return None;
            }
        };

        let reading = Reading::new(self.elapsed_ms(), value);
        self.session.readings.push(reading);
        Some(reading)
    }

    /// Render the session as a CSV document.
    ///
    /// Header first, then one `<elapsed_ms>,<value>` row per reading in
    /// arrival order. Every line ends with `\n`.
    pub fn serialize(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for reading in &self.session.readings {
            out.push_str(&reading.to_csv_row());
            out.push('\n');
        }
        out
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn readings(&self) -> &[Reading] {
        &self.session.readings
    }

    pub fn len(&self) -> usize {
        self.session.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.session.readings.is_empty()
    }

    /// Milliseconds since session start, clamped so a wall clock stepping
    /// backwards never produces a value below zero or below the previous
    /// reading.
    fn elapsed_ms(&self) -> u64 {
        let raw = self.clock.now_ms().saturating_sub(self.session.start_epoch_ms);
        let raw = u64::try_from(raw).unwrap_or(0);
        raw.max(self.session.last_elapsed_ms())
    }
}
