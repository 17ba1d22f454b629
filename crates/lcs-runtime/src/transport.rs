//! Line-oriented transport abstraction.
//!
//! A [`LineTransport`] is driven by a dedicated reader thread that forwards
//! complete lines to the async side over a bounded channel. The thread owns
//! the transport; everyone else holds a [`TransportHandle`] to observe or
//! request closure.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lcs_core::error::LcsError;
use tokio::sync::mpsc;
use tracing::debug;

/// Number of complete lines buffered between the reader thread and the loop.
pub const LINE_BUFFER: usize = 256;

/// Result of one bounded wait on the transport.
#[derive(Debug)]
pub enum ReadOutcome {
    /// A complete line, terminator included.
    Line(Vec<u8>),
    /// No complete line arrived within the poll interval.
    Idle,
    /// The device went away (end of stream).
    Disconnected,
}

/// A blocking source of newline-delimited bytes.
pub trait LineTransport: Send + 'static {
    /// Wait up to one poll interval for the next complete line.
    ///
    /// Implementations must keep any partial line across `Idle` returns.
    fn read_line(&mut self) -> std::io::Result<ReadOutcome>;
}

/// Item forwarded by the reader thread.
pub type LineEvent = lcs_core::Result<Vec<u8>>;

// ── TransportHandle ───────────────────────────────────────────────────────────

/// Shared view of the transport's open/closed state.
///
/// Cloning shares state. Closing is one-way.
#[derive(Debug, Clone)]
pub struct TransportHandle {
    open: Arc<AtomicBool>,
}

impl TransportHandle {
    fn new() -> Self {
        Self {
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Ask the reader thread to release the transport.
    ///
    /// Takes effect within one poll interval; the port is closed when the
    /// thread drops it.
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }
}

// ── Reader thread ─────────────────────────────────────────────────────────────

/// Move `transport` onto its own thread and start forwarding lines.
pub fn spawn_reader<T: LineTransport>(
    transport: T,
) -> std::io::Result<(TransportHandle, mpsc::Receiver<LineEvent>)> {
    let handle = TransportHandle::new();
    let (tx, rx) = mpsc::channel(LINE_BUFFER);

    let thread_handle = handle.clone();
    std::thread::Builder::new()
        .name("serial-reader".to_string())
        .spawn(move || reader_loop(transport, thread_handle, tx))?;

    Ok((handle, rx))
}

fn reader_loop<T: LineTransport>(
    mut transport: T,
    handle: TransportHandle,
    tx: mpsc::Sender<LineEvent>,
) {
    while handle.is_open() {
        match transport.read_line() {
            Ok(ReadOutcome::Line(bytes)) => {
                if tx.blocking_send(Ok(bytes)).is_err() {
                    debug!("line receiver dropped; stopping reader");
                    break;
                }
            }
            Ok(ReadOutcome::Idle) => {}
            Ok(ReadOutcome::Disconnected) => {
                let _ = tx.blocking_send(Err(LcsError::TransportClosed));
                handle.close();
                break;
            }
            Err(e) => {
                let _ = tx.blocking_send(Err(LcsError::TransportRead(e)));
                handle.close();
                break;
            }
        }
    }

    drop(transport);
    debug!("serial reader stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{wait_for, ScriptedTransport};
    use std::time::Duration;

    #[test]
    fn test_handle_starts_open_and_close_is_shared() {
        let handle = TransportHandle::new();
        let other = handle.clone();
        assert!(other.is_open());
        handle.close();
        assert!(!other.is_open());
    }

    #[tokio::test]
    async fn test_reader_forwards_lines_in_order() {
        let (script, transport) = ScriptedTransport::new();
        let (_handle, mut rx) = spawn_reader(transport).unwrap();

        script.line("1\n");
        script.line("2\n");

        assert_eq!(rx.recv().await.unwrap().unwrap(), b"1\n".to_vec());
        assert_eq!(rx.recv().await.unwrap().unwrap(), b"2\n".to_vec());
    }

    #[tokio::test]
    async fn test_reader_reports_disconnect_and_marks_closed() {
        let (script, transport) = ScriptedTransport::new();
        let (handle, mut rx) = spawn_reader(transport).unwrap();

        script.disconnect();

        let event = rx.recv().await.expect("event");
        assert!(matches!(event, Err(LcsError::TransportClosed)));
        assert!(rx.recv().await.is_none(), "sender must be gone");
        assert!(!handle.is_open());
    }

    #[tokio::test]
    async fn test_reader_reports_io_error() {
        let (script, transport) = ScriptedTransport::new();
        let (_handle, mut rx) = spawn_reader(transport).unwrap();

        script.fail(std::io::ErrorKind::BrokenPipe);

        let event = rx.recv().await.expect("event");
        assert!(matches!(
            event,
            Err(LcsError::TransportRead(e)) if e.kind() == std::io::ErrorKind::BrokenPipe
        ));
    }

    #[tokio::test]
    async fn test_close_releases_transport() {
        let (script, transport) = ScriptedTransport::new();
        let (handle, _rx) = spawn_reader(transport).unwrap();

        handle.close();

        assert!(
            wait_for(Duration::from_secs(2), || script.is_dropped()).await,
            "reader must drop the transport after close"
        );
    }
}
