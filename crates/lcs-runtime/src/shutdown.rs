//! Interrupt-driven shutdown and persistence.
//!
//! The first CTRL+C closes the transport and writes the session to the next
//! free data file. A second CTRL+C before the write finishes abandons it.

use std::path::PathBuf;

use lcs_core::error::{LcsError, Result};
use lcs_data::output::OutputDirectory;
use tracing::{debug, info};

use crate::interrupts::Interrupts;
use crate::transport::TransportHandle;

// ── State machine ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    /// No interrupt seen yet.
    Armed,
    /// First interrupt seen; saving.
    ShuttingDown,
    /// Second interrupt seen; exiting without saving.
    Terminal,
}

/// What the caller must do after an interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownAction {
    /// Close the transport and persist the session.
    Persist,
    /// Exit immediately with a failure status.
    ForceExit,
}

/// Counts interrupts and decides how to react to each one.
#[derive(Debug)]
pub struct ShutdownSequence {
    state: ShutdownState,
}

impl Default for ShutdownSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSequence {
    pub fn new() -> Self {
        Self {
            state: ShutdownState::Armed,
        }
    }

    pub fn state(&self) -> ShutdownState {
        self.state
    }

    /// Advance on an interrupt.
    pub fn on_interrupt(&mut self) -> ShutdownAction {
        match self.state {
            ShutdownState::Armed => {
                self.state = ShutdownState::ShuttingDown;
                ShutdownAction::Persist
            }
            ShutdownState::ShuttingDown | ShutdownState::Terminal => {
                self.state = ShutdownState::Terminal;
                ShutdownAction::ForceExit
            }
        }
    }
}

// ── Persistence ───────────────────────────────────────────────────────────────

/// Where a finished session is written. Runs on a blocking thread.
pub trait SessionStore: Clone + Send + 'static {
    /// Persist `csv` and return the path it was written to.
    fn store(&self, csv: &str) -> Result<PathBuf>;
}

impl SessionStore for OutputDirectory {
    fn store(&self, csv: &str) -> Result<PathBuf> {
        self.write_next(csv)
    }
}

/// Handle an interrupt delivered to `sequence`.
///
/// On the first interrupt: closes `transport`, writes `csv` to `output` (the
/// next data file for an [`OutputDirectory`]) and returns its path. Any
/// further interrupt, before or during the write, returns
/// [`LcsError::ForcedExit`]; whether a partial file is left behind in that
/// case is unspecified.
pub async fn handle_interrupt<S: SessionStore>(
    sequence: &mut ShutdownSequence,
    transport: &TransportHandle,
    csv: String,
    output: &S,
    interrupts: &mut Interrupts,
) -> Result<PathBuf> {
    if sequence.on_interrupt() == ShutdownAction::ForceExit {
        return Err(LcsError::ForcedExit);
    }

    info!("SIGINT received. Closing serial connection, saving data, and exiting.");
    info!("Press CTRL+C again to force exit.");

    transport.close();

    if interrupts.take_pending() {
        sequence.on_interrupt();
        return Err(LcsError::ForcedExit);
    }

    let out = output.clone();
    let mut write = tokio::task::spawn_blocking(move || out.store(&csv));

    tokio::select! {
        biased;

        Some(()) = interrupts.recv() => {
            sequence.on_interrupt();
            Err(LcsError::ForcedExit)
        }

        joined = &mut write => {
            let path = joined.map_err(|e| LcsError::Other(e.into()))??;
            debug!(path = %path.display(), "session persisted");
            Ok(path)
        }
    }
}
