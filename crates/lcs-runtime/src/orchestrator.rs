//! Session orchestrator.
//!
//! Owns the accumulator for one run and sequences the two phases: ingest
//! until interrupted, then shut down and persist. Because the session is only
//! serialized after the ingestion loop has returned, the two phases never
//! touch it concurrently and no lock is needed.

use std::io::Write;
use std::path::PathBuf;

use lcs_core::clock::Clock;
use lcs_core::error::Result;
use lcs_data::accumulator::Accumulator;
use lcs_data::output::OutputDirectory;
use tracing::debug;

use crate::ingestion::ingest;
use crate::interrupts::Interrupts;
use crate::shutdown::{handle_interrupt, ShutdownSequence};
use crate::transport::{spawn_reader, LineTransport};

/// Drives one recording session from connect to saved file.
pub struct SessionOrchestrator<C: Clock> {
    accumulator: Accumulator<C>,
    output: OutputDirectory,
    echo: Option<Box<dyn Write + Send>>,
}

impl<C: Clock> SessionOrchestrator<C> {
    /// `accumulator` should be created right after the transport connects so
    /// elapsed times count from connection. Accepted readings are echoed to
    /// `echo` when one is given (stdout in verbose mode).
    pub fn new(
        accumulator: Accumulator<C>,
        output: OutputDirectory,
        echo: Option<Box<dyn Write + Send>>,
    ) -> Self {
        Self {
            accumulator,
            output,
            echo,
        }
    }

    /// Record from `transport` until interrupted, then persist.
    ///
    /// Returns the path of the written CSV file, or the fatal error that
    /// ended the run.
    pub async fn run<T: LineTransport>(
        mut self,
        transport: T,
        mut interrupts: Interrupts,
    ) -> Result<PathBuf> {
        let (handle, mut lines) = spawn_reader(transport)?;
        let mut sequence = ShutdownSequence::new();

        ingest(
            &mut self.accumulator,
            &mut lines,
            &handle,
            &mut interrupts,
            self.echo.as_mut().map(|e| &mut **e as &mut (dyn Write + Send)),
        )
        .await?;

        debug!(readings = self.accumulator.len(), "ingestion stopped");
        let csv = self.accumulator.serialize();

        handle_interrupt(&mut sequence, &handle, csv, &self.output, &mut interrupts).await
    }
}
