//! CardioRisk: Cardiovascular risk assessment
//!
//! Main entry point for the terminal application.

use std::time::Duration;

use anyhow::Result;

use cardiorisk::tui::App;
use cardiorisk::{logging, AppConfig};

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    // Writing logs to the terminal would corrupt the TUI (alternate screen),
    // so an interactive session logs to a file unless told otherwise.
    let _guard = logging::init(&config, true)?;

    tracing::info!(api = %config.api_base_url(), "Starting CardioRisk...");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let mut app = App::new(&config, runtime.handle().clone());
    let result = app.run();

    // Requests still in flight are abandoned; their results would be stale.
    runtime.shutdown_timeout(Duration::from_secs(1));

    tracing::info!("CardioRisk shutdown complete.");
    result
}
