use std::io::IsTerminal;

use color_eyre::{Report, Result, Section};
use tracing_subscriber::EnvFilter;

use converse::cli::{parse_args, run_command};
use converse::config::ClientConfig;

/// Log filter variable, e.g. `CONVERSE_LOG=converse=debug`
const LOG_ENV: &str = "CONVERSE_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(err) => {
            let hint = err.recovery_hint();
            return Err(Report::new(err).suggestion(hint));
        }
    };

    let config = ClientConfig::from_env();
    tracing::debug!(api = %config.api_base_url, scope = %config.mode_scope, "Loaded configuration");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        match run_command(command, &config).await {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::debug!(code = err.error_code(), category = %err.category(), "Command failed");
                let hint = err.recovery_hint();
                Err(Report::msg(err.user_message()).suggestion(hint))
            }
        }
    })
}
