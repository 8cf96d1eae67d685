//! Response rendering.
//!
//! Every executed command produces an [`Outcome`]; this module turns it into
//! the bytes written back to the caller, either as plain text or as one JSON
//! object per line.
//!
//! # Text format
//!
//! - Mutations print nothing on success.
//! - `PRINT_RPO` prints each node followed by a space, a newline, then one
//!   `Found back edge: X->Y` line per back-edge.
//! - `FIND_CRITICAL_PATH` prints the nodes joined by `->`.
//! - Failures print their message on a single line (red when colours are on).

use crate::config::{OutputFormat, SessionConfig};
use crate::domain::{BackEdge, NodeName};
use crate::error::SessionError;
use crate::protocol::CommandKind;
use crate::session::Outcome;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;

/// Render an outcome in the configured format.
///
/// The returned string is empty or ends with a newline.
///
/// # Errors
///
/// Returns [`SessionError::Json`] if JSON encoding fails.
pub fn render(outcome: &Outcome, config: &SessionConfig) -> Result<String, SessionError> {
    match config.format {
        OutputFormat::Text => Ok(render_text(outcome, config.use_colors)),
        OutputFormat::Json => render_json(outcome),
    }
}

fn render_text(outcome: &Outcome, use_colors: bool) -> String {
    let mut out = String::new();
    match outcome {
        Outcome::Done(_) => {}
        Outcome::Order(traversal) => {
            for node in traversal.post_order.iter().rev() {
                // writing into a String cannot fail
                let _ = write!(out, "{node} ");
            }
            out.push('\n');
            for edge in &traversal.back_edges {
                let _ = writeln!(out, "Found back edge: {edge}");
            }
        }
        Outcome::Path(path) => {
            let _ = writeln!(out, "{path}");
        }
        Outcome::Failed { failure, .. } => {
            let message = failure.to_string();
            if use_colors {
                let _ = writeln!(out, "{}", message.red());
            } else {
                let _ = writeln!(out, "{message}");
            }
        }
    }
    out
}

/// One JSON response line. Absent fields are omitted.
#[derive(Debug, Serialize)]
struct JsonResponse<'a> {
    command: Option<&'static str>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    order: Option<Vec<&'a NodeName>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    back_edges: Option<&'a [BackEdge]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a [NodeName]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_weight: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing: Vec<&'a NodeName>,
}

impl JsonResponse<'_> {
    fn ok(command: &'static str) -> Self {
        Self {
            command: Some(command),
            status: "ok",
            order: None,
            back_edges: None,
            path: None,
            total_weight: None,
            message: None,
            missing: Vec::new(),
        }
    }
}

fn render_json(outcome: &Outcome) -> Result<String, SessionError> {
    let response = match outcome {
        Outcome::Done(kind) => JsonResponse::ok(kind.as_str()),
        Outcome::Order(traversal) => JsonResponse {
            order: Some(traversal.post_order.iter().rev().collect()),
            back_edges: Some(&traversal.back_edges),
            ..JsonResponse::ok(CommandKind::PrintRpo.as_str())
        },
        Outcome::Path(path) => JsonResponse {
            path: Some(&path.nodes),
            total_weight: Some(path.total_weight),
            ..JsonResponse::ok(CommandKind::FindCriticalPath.as_str())
        },
        Outcome::Failed { command, failure } => JsonResponse {
            command: command.map(CommandKind::as_str),
            status: "error",
            order: None,
            back_edges: None,
            path: None,
            total_weight: None,
            message: Some(failure.to_string()),
            missing: failure.missing_nodes(),
        },
    };

    let mut line = serde_json::to_string(&response)?;
    line.push('\n');
    Ok(line)
}
