use clap::{CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Default folder the CSV files are written into.
pub const DEFAULT_OUTPUT_DIR: &str = "./OutputData";

/// Default serial baud rate.
pub const DEFAULT_BAUD: u32 = 9600;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Logs incoming serial data from the load cell to a CSV file along with time
/// info. Time is stored in milliseconds and is counted from the moment this
/// program establishes a connection to the load cell.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "load-cell-savior",
    about = "Logs load cell readings from a serial port to CSV",
    version
)]
pub struct Settings {
    /// Folder to write the CSV data into
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Baud rate for the serial connection
    #[arg(short, long, default_value_t = DEFAULT_BAUD)]
    pub baud: u32,

    /// Serial port to use (defaults depend on --os)
    #[arg(short, long)]
    pub port: Option<String>,

    /// Echo every reading as it arrives
    #[arg(short, long)]
    pub verbose: bool,

    /// Operating system, used to pick the default port
    #[arg(long, default_value = "auto", value_parser = ["windows", "mac", "linux", "auto"])]
    pub os: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Set when both --port and --os were given and --os was ignored.
    #[arg(skip)]
    pub port_overrides_os: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and resolve the port.
    ///
    /// Returns clap's error instead of exiting so the caller picks the exit
    /// code (`--help` and `--version` also come back as errors).
    pub fn load() -> Result<Self, clap::Error> {
        Self::load_from(std::env::args_os())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        // Raw ArgMatches let us query ValueSource.
        let matches = Settings::command().try_get_matches_from(args)?;
        let settings = Settings::from_arg_matches(&matches)?;
        Ok(Self::resolve(settings, &matches))
    }

    /// The serial port to open.
    pub fn port_name(&self) -> &str {
        self.port
            .as_deref()
            .unwrap_or_else(|| default_port_for_os(&self.os))
    }

    /// Resolve `"auto"` OS, fill in the default port and apply `--debug`.
    fn resolve(mut settings: Settings, matches: &clap::ArgMatches) -> Settings {
        if settings.os == "auto" {
            settings.os = current_os().to_string();
        }

        if settings.port.is_some() && is_arg_explicitly_set(matches, "os") {
            settings.port_overrides_os = true;
        }

        if settings.port.is_none() {
            settings.port = Some(default_port_for_os(&settings.os).to_string());
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }
}

// ── Platform defaults ──────────────────────────────────────────────────────────

/// Default serial port for an OS name (`windows`, `mac`, `linux`).
pub fn default_port_for_os(os: &str) -> &'static str {
    match os {
        "windows" => "COM4",
        _ => "/dev/ttyUSB0",
    }
}

/// OS name of the running platform in the spelling `--os` accepts.
pub fn current_os() -> &'static str {
    if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "macos") {
        "mac"
    } else {
        "linux"
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
