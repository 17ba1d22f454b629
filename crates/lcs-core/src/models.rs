use std::fmt;

/// Header line of every persisted CSV file.
pub const CSV_HEADER: &str = "Time_Ms,LoadCellReading_Grams";

/// A single load cell sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// Milliseconds since the session started.
    pub elapsed_ms: u64,
    /// Raw reading reported by the load cell, in grams.
    pub value: i64,
}

impl Reading {
    pub fn new(elapsed_ms: u64, value: i64) -> Self {
        Self { elapsed_ms, value }
    }

    /// Render this reading as a CSV data row, without the line terminator.
    pub fn to_csv_row(&self) -> String {
        format!("{},{}", self.elapsed_ms, self.value)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ms: {} grams", self.elapsed_ms, self.value)
    }
}

/// The in-memory record of one run: when the device connected and every
/// reading received since, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Unix epoch milliseconds at connect time. Fixed for the session.
    pub start_epoch_ms: i64,
    /// Append-only readings, `elapsed_ms` non-decreasing.
    pub readings: Vec<Reading>,
}

impl Session {
    pub fn new(start_epoch_ms: i64) -> Self {
        Self {
            start_epoch_ms,
            readings: Vec::new(),
        }
    }

    /// Elapsed time of the most recent reading, or zero before the first one.
    pub fn last_elapsed_ms(&self) -> u64 {
        self.readings.last().map(|r| r.elapsed_ms).unwrap_or(0)
    }
}
