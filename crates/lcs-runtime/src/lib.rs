//! Runtime layer for Load Cell Savior.
//!
//! Runs the serial reader thread, the async ingestion loop, and the
//! interrupt-driven shutdown that persists the session to disk.

pub mod ingestion;
pub mod interrupts;
pub mod orchestrator;
pub mod serial;
pub mod shutdown;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use lcs_core as core;
pub use lcs_data as data;
