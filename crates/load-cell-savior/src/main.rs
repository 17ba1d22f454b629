mod bootstrap;

use std::io::Write;
use std::path::PathBuf;

use lcs_core::clock::format_epoch_ms;
use lcs_core::error::LcsError;
use lcs_core::exit::{cli_exit_code, codes, exit_code};
use lcs_core::settings::Settings;
use lcs_data::accumulator::Accumulator;
use lcs_data::output::OutputDirectory;
use lcs_runtime::interrupts::Interrupts;
use lcs_runtime::orchestrator::SessionOrchestrator;
use lcs_runtime::serial::SerialTransport;

#[tokio::main]
async fn main() {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            // Help and version text print here too.
            let _ = e.print();
            std::process::exit(cli_exit_code(&e));
        }
    };

    if let Err(e) = bootstrap::setup_logging(&settings.log_level) {
        eprintln!("Failed to initialise logging: {e}");
        std::process::exit(codes::INVALID_CONFIG);
    }
    bootstrap::print_banner();

    let code = match run(&settings).await {
        Ok(path) => {
            tracing::info!("Saved data to {}", path.display());
            tracing::info!("Exiting.");
            codes::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            if matches!(e, LcsError::TransportOpen { .. }) {
                tracing::error!("Check your connections and try again.");
            }
            exit_code(&e)
        }
    };

    // Exit directly: a forced exit must not wait on an in-flight write.
    std::process::exit(code);
}

async fn run(settings: &Settings) -> Result<PathBuf, LcsError> {
    tracing::debug!("Load Cell Savior v{} starting", env!("CARGO_PKG_VERSION"));
    bootstrap::log_settings(settings);

    let output = OutputDirectory::new(&settings.output);
    output.validate()?;

    let port = settings.port_name();
    let transport = SerialTransport::open(port, settings.baud)?;
    tracing::info!("Connected to {} at {} baud.", port, settings.baud);

    let accumulator = Accumulator::start();
    tracing::debug!(
        "Session started at {}",
        format_epoch_ms(accumulator.session().start_epoch_ms)
    );

    let echo = settings
        .verbose
        .then(|| Box::new(std::io::stdout()) as Box<dyn Write + Send>);

    let interrupts = Interrupts::ctrl_c();
    SessionOrchestrator::new(accumulator, output, echo)
        .run(transport, interrupts)
        .await
}
