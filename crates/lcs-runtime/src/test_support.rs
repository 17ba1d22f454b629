//! Test doubles shared by the runtime tests.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::transport::{LineTransport, ReadOutcome};

const POLL: Duration = Duration::from_millis(5);

enum Step {
    Line(Vec<u8>),
    Disconnect,
    Fail(io::ErrorKind),
}

/// Test-side control for a [`ScriptedTransport`].
pub(crate) struct Script {
    tx: Sender<Step>,
    dropped: Arc<AtomicBool>,
}

impl Script {
    pub(crate) fn line(&self, text: &str) {
        self.raw(text.as_bytes());
    }

    pub(crate) fn raw(&self, bytes: &[u8]) {
        let _ = self.tx.send(Step::Line(bytes.to_vec()));
    }

    pub(crate) fn disconnect(&self) {
        let _ = self.tx.send(Step::Disconnect);
    }

    pub(crate) fn fail(&self, kind: io::ErrorKind) {
        let _ = self.tx.send(Step::Fail(kind));
    }

    /// `true` once the reader thread has released the transport.
    pub(crate) fn is_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

/// In-memory transport fed line by line from the test body. Silent (idle)
/// whenever the script is empty.
pub(crate) struct ScriptedTransport {
    rx: Receiver<Step>,
    dropped: Arc<AtomicBool>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> (Script, Self) {
        let (tx, rx) = mpsc::channel();
        let dropped = Arc::new(AtomicBool::new(false));
        (
            Script {
                tx,
                dropped: dropped.clone(),
            },
            Self { rx, dropped },
        )
    }
}

impl LineTransport for ScriptedTransport {
    fn read_line(&mut self) -> io::Result<ReadOutcome> {
        match self.rx.recv_timeout(POLL) {
            Ok(Step::Line(bytes)) => Ok(ReadOutcome::Line(bytes)),
            Ok(Step::Disconnect) => Ok(ReadOutcome::Disconnected),
            Ok(Step::Fail(kind)) => Err(io::Error::new(kind, "scripted failure")),
            Err(RecvTimeoutError::Timeout) => Ok(ReadOutcome::Idle),
            Err(RecvTimeoutError::Disconnected) => {
                std::thread::sleep(POLL);
                Ok(ReadOutcome::Idle)
            }
        }
    }
}

impl Drop for ScriptedTransport {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

/// Poll `condition` until it holds or `timeout` elapses.
pub(crate) async fn wait_for(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(POLL).await;
    }
    condition()
}

/// Cloneable in-memory writer; every clone appends to the same buffer.
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).expect("utf-8 output")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
