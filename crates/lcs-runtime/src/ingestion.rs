//! The read-filter-accumulate loop.
//!
//! Runs until the first interrupt (returns `Ok`) or a fatal transport
//! condition (returns the error). It never closes the transport and never
//! touches the disk.
//!
//! The verbose echo is console output, not a log record: it goes straight to
//! the writer it is given and is unaffected by `--log-level`.

use std::io::Write;

use lcs_core::clock::Clock;
use lcs_core::error::{LcsError, Result};
use lcs_data::accumulator::Accumulator;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::interrupts::Interrupts;
use crate::transport::{LineEvent, TransportHandle};

/// Feed lines into `accumulator` until interrupted.
///
/// Lines still queued when the interrupt is observed are left out of the
/// session entirely. When `echo` is set every accepted reading is written to
/// it as `<elapsed_ms> ms: <value> grams`.
pub async fn ingest<C: Clock>(
    accumulator: &mut Accumulator<C>,
    lines: &mut mpsc::Receiver<LineEvent>,
    transport: &TransportHandle,
    interrupts: &mut Interrupts,
    mut echo: Option<&mut (dyn Write + Send)>,
) -> Result<()> {
    loop {
        if !transport.is_open() {
            // Prefer the reader's own report if it left one.
            let err = loop {
                match lines.try_recv() {
                    Ok(Err(e)) => break e,
                    Ok(Ok(_)) => continue,
                    Err(_) => break LcsError::TransportClosed,
                }
            };
            return Err(err);
        }

        tokio::select! {
            biased;

            Some(()) = interrupts.recv() => {
                debug!(readings = accumulator.len(), "ingestion interrupted");
                return Ok(());
            }

            event = lines.recv() => {
                let bytes = match event {
                    Some(Ok(bytes)) => bytes,
                    Some(Err(e)) => return Err(e),
                    None => return Err(LcsError::TransportClosed),
                };

                let line = String::from_utf8(bytes)?;
                if let (Some(reading), Some(out)) =
                    (accumulator.append(&line), echo.as_deref_mut())
                {
                    if let Err(e) = writeln!(out, "{reading}").and_then(|()| out.flush()) {
                        warn!(error = %e, "failed to echo reading");
                    }
                }
            }
        }
    }
}
