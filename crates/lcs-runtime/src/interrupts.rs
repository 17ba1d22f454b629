//! Operator interrupts (CTRL+C).
//!
//! Every SIGINT becomes one message on a channel, so the ingestion loop and
//! the shutdown sequence can `select!` on it and a second CTRL+C is never
//! lost while the first is being handled.

use tokio::sync::mpsc;
use tracing::warn;

/// Receiving end of the interrupt stream.
#[derive(Debug)]
pub struct Interrupts {
    rx: mpsc::UnboundedReceiver<()>,
}

/// Sending end; fires one interrupt per call.
#[derive(Debug, Clone)]
pub struct InterruptTrigger {
    tx: mpsc::UnboundedSender<()>,
}

impl Interrupts {
    /// Listen for SIGINT / CTRL+C. Must be called inside a tokio runtime.
    pub fn ctrl_c() -> Self {
        let (trigger, interrupts) = Self::manual();
        tokio::spawn(forward_ctrl_c(trigger));
        interrupts
    }

    /// Interrupt stream driven only by the returned trigger.
    pub fn manual() -> (InterruptTrigger, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (InterruptTrigger { tx }, Self { rx })
    }

    /// Wait for the next interrupt. `None` once every trigger is gone.
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Consume an interrupt that has already arrived, without waiting.
    pub fn take_pending(&mut self) -> bool {
        self.rx.try_recv().is_ok()
    }
}

impl InterruptTrigger {
    /// Deliver one interrupt. Returns `false` if nobody is listening anymore.
    pub fn trigger(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

#[cfg(unix)]
async fn forward_ctrl_c(trigger: InterruptTrigger) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "failed to install SIGINT handler");
            return;
        }
    };
    while sigint.recv().await.is_some() {
        if !trigger.trigger() {
            break;
        }
    }
}

#[cfg(not(unix))]
async fn forward_ctrl_c(trigger: InterruptTrigger) {
    loop {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for CTRL+C");
            return;
        }
        if !trigger.trigger() {
            break;
        }
    }
}
