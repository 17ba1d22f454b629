use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by Load Cell Savior.
#[derive(Error, Debug)]
pub enum LcsError {
    /// The serial port could not be opened.
    #[error("Could not connect to {port} at {baud} baud: {reason}")]
    TransportOpen {
        port: String,
        baud: u32,
        reason: String,
    },

    /// The transport was found closed while the ingestion loop was running.
    #[error("Serial connection closed unexpectedly")]
    TransportClosed,

    /// Reading from the transport failed.
    #[error("Serial read failed: {0}")]
    TransportRead(#[source] std::io::Error),

    /// A line received from the transport was not valid UTF-8.
    #[error("Failed to decode serial line: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// The configured output directory does not exist.
    #[error("Output directory does not exist: {0}")]
    OutputDirMissing(PathBuf),

    /// The output directory could not be listed.
    #[error("Failed to scan output directory {path}: {source}")]
    DirectoryScan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data file in the output directory carries an index that is not a
    /// non-negative integer.
    #[error("Ambiguous output file index in {0}")]
    AmbiguousIndex(String),

    /// The CSV output file could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A second interrupt arrived while the first was still being handled.
    #[error("SIGINT received twice, exiting")]
    ForcedExit,

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, LcsError>;
