//! Session configuration.
//!
//! Settings come from two layers, later layers winning:
//!
//! 1. Environment variables (see [`SessionConfig::from_env`])
//! 2. Command-line flags (applied by the CLI on top of the environment)

use std::env;
use std::io::IsTerminal;

/// Line that ends a session unless configured otherwise.
pub const DEFAULT_SENTINEL: &str = "END";

/// How responses are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text lines
    #[default]
    Text,

    /// One JSON object per command
    Json,
}

/// When to colour error lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Colour only when stdout is a terminal
    #[default]
    Auto,

    /// Always colour
    Always,

    /// Never colour
    Never,
}

impl ColorChoice {
    /// Resolve the choice against the current stdout.
    #[must_use]
    pub fn use_colors(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal(),
        }
    }
}

/// Configuration for a command session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Response rendering
    pub format: OutputFormat,

    /// Whether error lines are coloured
    pub use_colors: bool,

    /// Input line that ends the session
    pub sentinel: String,
}

impl SessionConfig {
    /// Create a config with explicit values.
    pub fn new(format: OutputFormat, use_colors: bool, sentinel: impl Into<String>) -> Self {
        Self {
            format,
            use_colors,
            sentinel: sentinel.into(),
        }
    }

    /// Create a config by reading environment variables.
    ///
    /// Reads:
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `CRITPATH_COLOR`: `always`, `never` or `auto` (default: auto)
    /// - `CRITPATH_SENTINEL`: Line that ends the session (default: `END`)
    pub fn from_env() -> Self {
        let color = match env::var("CRITPATH_COLOR") {
            Ok(v) if v.eq_ignore_ascii_case("always") || v == "1" => ColorChoice::Always,
            Ok(v) if v.eq_ignore_ascii_case("never") || v == "0" => ColorChoice::Never,
            Ok(v) if v.is_empty() || v.eq_ignore_ascii_case("auto") => ColorChoice::Auto,
            Ok(v) => {
                tracing::warn!(
                    env_var = "CRITPATH_COLOR",
                    value = %v,
                    "Invalid value (expected 'always', 'never' or 'auto'), using default"
                );
                ColorChoice::Auto
            }
            Err(_) => ColorChoice::Auto,
        };

        // Respect NO_COLOR standard (https://no-color.org/)
        let use_colors = env::var_os("NO_COLOR").is_none() && color.use_colors();

        let sentinel = match env::var("CRITPATH_SENTINEL") {
            Ok(s) if !s.trim().is_empty() => s.trim().to_string(),
            Ok(_) => {
                tracing::warn!(
                    env_var = "CRITPATH_SENTINEL",
                    default = DEFAULT_SENTINEL,
                    "Empty sentinel, using default"
                );
                DEFAULT_SENTINEL.to_string()
            }
            Err(_) => DEFAULT_SENTINEL.to_string(),
        };

        Self {
            format: OutputFormat::Text,
            use_colors,
            sentinel,
        }
    }

    /// Whether `line` ends the session.
    ///
    /// Surrounding whitespace (including a trailing `\r`) is ignored.
    #[must_use]
    pub fn is_sentinel(&self, line: &str) -> bool {
        line.trim() == self.sentinel
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            use_colors: false,
            sentinel: DEFAULT_SENTINEL.to_string(),
        }
    }
}
