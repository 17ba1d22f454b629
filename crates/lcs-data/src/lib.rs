//! Data layer for Load Cell Savior.
//!
//! Turns raw serial lines into timestamped readings, renders the session as
//! CSV, and picks the next free `LoadCellData_<N>.csv` file in the output
//! directory.

pub mod accumulator;
pub mod output;

pub use lcs_core as core;
