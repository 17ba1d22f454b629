use lcs_core::settings::Settings;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Banner ─────────────────────────────────────────────────────────────────────

/// Startup banner shown before anything else.
pub fn banner() -> String {
    format!(
        "Load Cell Savior v{}\n\
         LoadCellSavior by Ethan Hanlon\n\
         (c) 2023 Fog City Rocketry at San Francisco State University\n\
         Logs load cell readings from a serial port to CSV. Press CTRL+C to save and exit.",
        env!("CARGO_PKG_VERSION")
    )
}

pub fn print_banner() {
    println!("{}", banner());
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to a `tracing` filter directive.
fn level_directive(log_level: &str) -> &str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is one of the `--log-level` names; anything else falls back
/// to `info`.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

// ── Settings report ────────────────────────────────────────────────────────────

/// Log the resolved settings. Details are only shown in verbose mode.
pub fn log_settings(settings: &Settings) {
    if settings.verbose {
        tracing::info!("Verbose logging enabled.");
        tracing::info!("Output directory set to {}", settings.output.display());
        tracing::info!("Baud set to {}", settings.baud);
        tracing::info!("OS set to {}", settings.os);
        tracing::info!("Port set to {}", settings.port_name());
    }
    if settings.port_overrides_os {
        tracing::info!("Port specified, ignoring OS parameter.");
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directive_maps_cli_names() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("INFO"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("ERROR"), "error");
        assert_eq!(level_directive("CRITICAL"), "error");
    }

    #[test]
    fn test_level_directive_is_case_insensitive() {
        assert_eq!(level_directive("warning"), "warn");
        assert_eq!(level_directive("Debug"), "debug");
    }

    #[test]
    fn test_level_directive_unknown_falls_back_to_info() {
        assert_eq!(level_directive("verbose"), "info");
        assert_eq!(level_directive(""), "info");
    }

    #[test]
    fn test_banner_mentions_version_and_exit_key() {
        let text = banner();
        assert!(text.starts_with("Load Cell Savior v"));
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
        assert!(text.contains("CTRL+C"));
    }

    #[test]
    fn test_banner_carries_attribution() {
        let text = banner();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "LoadCellSavior by Ethan Hanlon");
        assert_eq!(
            lines[2],
            "(c) 2023 Fog City Rocketry at San Francisco State University"
        );
    }
}
