//! Core types for Load Cell Savior.
//!
//! Holds the domain model (readings and sessions), the wall-clock abstraction
//! used to timestamp readings, the shared error type with its exit-code
//! mapping, and command-line settings.

pub mod clock;
pub mod error;
pub mod exit;
pub mod models;
pub mod settings;

pub use error::{LcsError, Result};
