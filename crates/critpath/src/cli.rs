//! CLI argument parsing and session startup.
//!
//! The binary reads protocol commands from a file or stdin and writes
//! responses to stdout. Logs go to stderr so they never mix with responses.
//!
//! # Example
//!
//! ```bash
//! critpath commands.txt
//! printf 'ADD_NODE A\nROOT A\nPRINT_RPO\nEND\n' | critpath --json
//! RUST_LOG=critpath=debug critpath --color never commands.txt
//! ```

use crate::config::{ColorChoice, OutputFormat, SessionConfig};
use crate::session::{Session, SessionSummary};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::BufReader;

/// Critpath - graph reachability order and critical path analysis
///
/// Reads commands line by line (ADD_NODE, ADD_EDGE, REMOVE_NODE, REMOVE_EDGE,
/// ROOT, PRINT_RPO, FIND_CRITICAL_PATH) until the sentinel line `END`.
#[derive(Parser, Debug)]
#[command(name = "critpath")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File to read commands from (defaults to stdin)
    pub input: Option<PathBuf>,

    /// Output in JSON format for programmatic use
    #[arg(long)]
    pub json: bool,

    /// When to colour error messages
    #[arg(long, value_enum)]
    pub color: Option<ColorChoice>,

    /// Input line that ends the session
    #[arg(long)]
    pub sentinel: Option<String>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Log filter used when `RUST_LOG` is not set.
    #[must_use]
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "critpath=warn",
            1 => "critpath=debug",
            _ => "critpath=trace",
        }
    }

    /// Session configuration: environment first, flags on top.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::from_env();

        if self.json {
            config.format = OutputFormat::Json;
        }
        if let Some(color) = self.color {
            config.use_colors = color.use_colors();
        }
        if let Some(sentinel) = self.sentinel.as_deref().map(str::trim) {
            if sentinel.is_empty() {
                tracing::warn!("Ignoring empty --sentinel, keeping {:?}", config.sentinel);
            } else {
                config.sentinel = sentinel.to_string();
            }
        }

        config
    }

    /// Run a session over the selected input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be opened or read, or if writing
    /// to stdout fails. Command failures are reported inline and do not make
    /// the session fail.
    pub async fn execute(&self) -> Result<SessionSummary> {
        let config = self.session_config();
        colored::control::set_override(config.use_colors);
        tracing::debug!(?config, input = ?self.input, "Starting session");

        let mut session = Session::new(config, std::io::stdout().lock());

        let summary = match &self.input {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                session.run(BufReader::new(file)).await?
            }
            None => session.run(BufReader::new(tokio::io::stdin())).await?,
        };

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_args_reads_stdin() {
        let cli = Cli::try_parse_from(["critpath"]).unwrap();
        assert!(cli.input.is_none());
        assert!(!cli.json);
        assert!(cli.color.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_input_file() {
        let cli = Cli::try_parse_from(["critpath", "graph.txt"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("graph.txt")));
    }

    #[test]
    fn test_parse_json_and_color() {
        let cli = Cli::try_parse_from(["critpath", "--json", "--color", "never"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.color, Some(ColorChoice::Never));

        let config = cli.session_config();
        assert_eq!(config.format, OutputFormat::Json);
        assert!(!config.use_colors);
    }

    #[test]
    fn test_parse_rejects_unknown_color() {
        assert!(Cli::try_parse_from(["critpath", "--color", "rainbow"]).is_err());
    }

    #[test]
    fn test_sentinel_flag_overrides_default() {
        let cli = Cli::try_parse_from(["critpath", "--sentinel", " QUIT "]).unwrap();
        assert_eq!(cli.session_config().sentinel, "QUIT");
    }

    #[test]
    fn test_verbosity_raises_log_filter() {
        let quiet = Cli::try_parse_from(["critpath"]).unwrap();
        let debug = Cli::try_parse_from(["critpath", "-v"]).unwrap();
        let trace = Cli::try_parse_from(["critpath", "-vvv"]).unwrap();

        assert_eq!(quiet.default_log_filter(), "critpath=warn");
        assert_eq!(debug.default_log_filter(), "critpath=debug");
        assert_eq!(trace.default_log_filter(), "critpath=trace");
    }
}
