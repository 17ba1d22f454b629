//! Process exit codes.
//!
//! Every fatal condition maps to its own non-zero status so wrapper scripts
//! can tell a missing device apart from a failed write.

use crate::error::LcsError;

/// Exit code constants.
pub mod codes {
    /// Data saved, clean shutdown.
    pub const SUCCESS: i32 = 0;
    /// Invalid configuration: bad command-line arguments or a missing output
    /// directory.
    pub const INVALID_CONFIG: i32 = 1;
    /// Serial transport could not be opened, was lost, or sent undecodable bytes.
    pub const TRANSPORT_ERROR: i32 = 2;
    /// Output directory could not be scanned or the CSV could not be written.
    pub const IO_ERROR: i32 = 3;
    /// An existing data file carries an unparsable index.
    pub const AMBIGUOUS_INDEX: i32 = 4;
    /// Forced exit on the second interrupt (128 + SIGINT).
    pub const FORCED_EXIT: i32 = 130;
}

/// Map an [`LcsError`] to an exit code.
pub fn exit_code(error: &LcsError) -> i32 {
    match error {
        LcsError::OutputDirMissing(_) => codes::INVALID_CONFIG,
        LcsError::TransportOpen { .. }
        | LcsError::TransportClosed
        | LcsError::TransportRead(_)
        | LcsError::Decode(_) => codes::TRANSPORT_ERROR,
        LcsError::DirectoryScan { .. }
        | LcsError::FileWrite { .. }
        | LcsError::Io(_)
        | LcsError::Other(_) => codes::IO_ERROR,
        LcsError::AmbiguousIndex(_) => codes::AMBIGUOUS_INDEX,
        LcsError::ForcedExit => codes::FORCED_EXIT,
    }
}

/// Map a command-line parse failure to an exit code.
///
/// `--help` and `--version` surface as clap errors that print to stdout;
/// those exit 0. Anything clap reports on stderr is a bad argument.
pub fn cli_exit_code(error: &clap::Error) -> i32 {
    if error.use_stderr() {
        codes::INVALID_CONFIG
    } else {
        codes::SUCCESS
    }
}
