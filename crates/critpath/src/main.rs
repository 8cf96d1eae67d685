//! Critpath CLI binary.

use anyhow::Result;
use critpath::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the critpath CLI.
///
/// Uses tokio's current_thread runtime: input is read line by line and every
/// command runs to completion before the next one is read.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Initialize tracing subscriber
    // Can be controlled via RUST_LOG environment variable
    // Example: RUST_LOG=critpath=debug critpath commands.txt
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting critpath CLI");

    let summary = cli.execute().await?;

    tracing::debug!(?summary, "Critpath CLI completed successfully");
    Ok(())
}
