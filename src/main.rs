// Entrypoint for the CLI application: load configuration, build the API
// client and hand it to the UI loop.

use anyhow::Context;
use resumen_cli::{api::AnalysisClient, config::Config, ui::main_menu};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they stay out of the prompts.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        api_url = %config.api_url,
        api_prefix = %config.api_prefix,
        timeout_secs = config.timeout.as_secs(),
        "configuration loaded"
    );
    let api = AnalysisClient::new(config).context("Failed to build HTTP client")?;

    // Blocks until the user exits.
    main_menu(api)?;
    Ok(())
}
