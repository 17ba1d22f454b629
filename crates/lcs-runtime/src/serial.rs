//! Serial port transport built on the `serialport` crate.

use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::time::Duration;

use lcs_core::error::{LcsError, Result};
use serialport::SerialPort;
use tracing::debug;

use crate::transport::{LineTransport, ReadOutcome};

/// How long a single read may block before the reader thread gets a chance
/// to notice a close request. Not a user-visible timeout: idle polls are
/// retried forever.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Newline-framed reader over a serial port (or any `Read`).
pub struct SerialTransport<R: Read + Send = Box<dyn SerialPort>> {
    reader: BufReader<R>,
    pending: Vec<u8>,
}

impl SerialTransport<Box<dyn SerialPort>> {
    /// Open `port` at `baud`.
    pub fn open(port: &str, baud: u32) -> Result<Self> {
        let serial = serialport::new(port, baud)
            .timeout(POLL_INTERVAL)
            .open()
            .map_err(|e| LcsError::TransportOpen {
                port: port.to_string(),
                baud,
                reason: e.to_string(),
            })?;
        debug!(port, baud, "serial port opened");
        Ok(Self::from_reader(serial))
    }
}

impl<R: Read + Send> SerialTransport<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            pending: Vec::new(),
        }
    }
}

impl<R: Read + Send + 'static> LineTransport for SerialTransport<R> {
    fn read_line(&mut self) -> std::io::Result<ReadOutcome> {
        // On timeout `read_until` leaves whatever it consumed in `pending`,
        // so a line split across polls is reassembled on the next call.
        match self.reader.read_until(b'\n', &mut self.pending) {
            Ok(0) => Ok(ReadOutcome::Disconnected),
            Ok(_) if self.pending.ends_with(b"\n") => {
                Ok(ReadOutcome::Line(std::mem::take(&mut self.pending)))
            }
            // Stream ended mid-line.
            Ok(_) => Ok(ReadOutcome::Disconnected),
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                Ok(ReadOutcome::Idle)
            }
            Err(e) => Err(e),
        }
    }
}
