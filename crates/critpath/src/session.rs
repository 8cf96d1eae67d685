//! Command session: the read loop around a single graph.
//!
//! A [`Session`] owns one [`GraphStore`] for its whole lifetime. It reads
//! lines, parses them, executes the resulting commands and writes rendered
//! responses. Command failures are reported and the loop continues; only
//! the sentinel line, end of input or an I/O failure stop it.
//!
//! # Example
//!
//! ```
//! use critpath::config::SessionConfig;
//! use critpath::session::Session;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let script = "ADD_NODE A\nADD_NODE B\nADD_EDGE A B 2\nROOT A\nPRINT_RPO\nEND\n";
//!     let mut session = Session::new(SessionConfig::default(), Vec::new());
//!     session.run(script.as_bytes()).await?;
//!
//!     assert_eq!(String::from_utf8(session.into_output())?, "A B \n");
//!     Ok(())
//! }
//! ```

use crate::config::SessionConfig;
use crate::domain::{CriticalPath, NodeName, Traversal};
use crate::error::{Error, SessionError};
use crate::graph::GraphStore;
use crate::output::render;
use crate::protocol::{parse_line, Command, CommandKind, ParseError};
use std::io::Write;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Why a line could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// The line did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The graph rejected the command.
    #[error(transparent)]
    Graph(#[from] Error),
}

impl Failure {
    /// Nodes reported as missing by the failure, if any.
    #[must_use]
    pub fn missing_nodes(&self) -> Vec<&NodeName> {
        match self {
            Self::Graph(err) => err.missing_nodes(),
            Self::Parse(_) => Vec::new(),
        }
    }
}

/// Result of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A mutation succeeded
    Done(CommandKind),

    /// `PRINT_RPO` result
    Order(Traversal),

    /// `FIND_CRITICAL_PATH` result
    Path(CriticalPath),

    /// The line failed; `command` is `None` when the keyword itself was bad
    Failed {
        /// Command the line was parsed as, if known
        command: Option<CommandKind>,
        /// Reason for the failure
        failure: Failure,
    },
}

impl Outcome {
    /// True for [`Outcome::Failed`].
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Counters collected over one [`Session::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Lines read, including the sentinel
    pub lines: usize,

    /// Commands executed (blank lines excluded)
    pub commands: usize,

    /// Commands that failed
    pub failures: usize,

    /// Whether the session ended on the sentinel rather than end of input
    pub stopped_by_sentinel: bool,
}

/// A command session writing responses to `W`.
#[derive(Debug)]
pub struct Session<W> {
    graph: GraphStore,
    config: SessionConfig,
    out: W,
}

impl<W: Write> Session<W> {
    /// Create a session with an empty graph.
    pub fn new(config: SessionConfig, out: W) -> Self {
        Self {
            graph: GraphStore::new(),
            config,
            out,
        }
    }

    /// The graph built so far.
    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Consume the session, returning the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Execute a parsed command against the graph.
    pub fn execute(&mut self, command: Command) -> Outcome {
        let kind = command.kind();
        tracing::debug!(command = %kind, "Executing command");

        let result = match command {
            Command::AddNode { name } => self
                .graph
                .add_node(name.as_str())
                .map(|()| Outcome::Done(kind)),
            Command::AddEdge { from, to, weight } => self
                .graph
                .add_edge(from.as_str(), to.as_str(), weight)
                .map(|()| Outcome::Done(kind)),
            Command::RemoveNode { name } => self
                .graph
                .remove_node(name.as_str())
                .map(|()| Outcome::Done(kind)),
            Command::RemoveEdge { from, to } => self
                .graph
                .remove_edge(from.as_str(), to.as_str())
                .map(|()| Outcome::Done(kind)),
            Command::SetRoot { name } => self
                .graph
                .set_root(name.as_str())
                .map(|()| Outcome::Done(kind)),
            Command::PrintRpo => self.graph.traverse_from_root().map(Outcome::Order),
            Command::FindCriticalPath { from, to } => self
                .graph
                .critical_path(from.as_str(), to.as_str())
                .map(Outcome::Path),
        };

        result.unwrap_or_else(|err| {
            tracing::debug!(command = %kind, error = %err, "Command failed");
            Outcome::Failed {
                command: Some(kind),
                failure: Failure::Graph(err),
            }
        })
    }

    /// Parse and execute one line.
    ///
    /// Returns `None` for blank lines, which are skipped without output.
    pub fn evaluate(&mut self, line: &str) -> Option<Outcome> {
        match parse_line(line) {
            Ok(Some(command)) => Some(self.execute(command)),
            Ok(None) => None,
            Err(err) => {
                tracing::debug!(line, error = %err, "Rejected input line");
                let command = match &err {
                    ParseError::MissingArgument { command, .. } => Some(*command),
                    _ => None,
                };
                Some(Outcome::Failed {
                    command,
                    failure: Failure::Parse(err),
                })
            }
        }
    }

    /// Evaluate one line and write its response.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the response cannot be encoded or written.
    pub fn handle_line(&mut self, line: &str) -> Result<Option<Outcome>, SessionError> {
        let Some(outcome) = self.evaluate(line) else {
            return Ok(None);
        };

        let rendered = render(&outcome, &self.config)?;
        self.out.write_all(rendered.as_bytes())?;
        Ok(Some(outcome))
    }

    /// Read lines until the sentinel or end of input.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if reading input or writing output fails.
    /// Command failures are not errors; they are written and counted.
    pub async fn run<R>(&mut self, input: R) -> Result<SessionSummary, SessionError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut summary = SessionSummary::default();
        let mut lines = input.lines();

        while let Some(line) = lines.next_line().await? {
            summary.lines += 1;

            if self.config.is_sentinel(&line) {
                summary.stopped_by_sentinel = true;
                break;
            }

            if let Some(outcome) = self.handle_line(&line)? {
                summary.commands += 1;
                if outcome.is_failure() {
                    summary.failures += 1;
                }
            }
        }

        self.out.flush()?;

        tracing::debug!(
            lines = summary.lines,
            commands = summary.commands,
            failures = summary.failures,
            stopped_by_sentinel = summary.stopped_by_sentinel,
            "Session finished"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MissingEndpoint;

    fn session() -> Session<Vec<u8>> {
        Session::new(SessionConfig::default(), Vec::new())
    }

    #[test]
    fn execute_reports_graph_failures() {
        let mut session = session();
        let outcome = session.execute(Command::SetRoot { name: "A".into() });
        assert_eq!(
            outcome,
            Outcome::Failed {
                command: Some(CommandKind::Root),
                failure: Failure::Graph(Error::NodeNotFound("A".into())),
            }
        );
    }

    #[test]
    fn evaluate_skips_blank_lines() {
        let mut session = session();
        assert_eq!(session.evaluate("   "), None);
    }

    #[test]
    fn missing_argument_keeps_command_kind() {
        let mut session = session();
        let outcome = session.evaluate("ADD_EDGE A").unwrap();
        assert!(matches!(
            outcome,
            Outcome::Failed {
                command: Some(CommandKind::AddEdge),
                failure: Failure::Parse(ParseError::MissingArgument { .. }),
            }
        ));
    }

    #[test]
    fn both_endpoints_missing_is_one_failure() {
        let mut session = session();
        let outcome = session.evaluate("ADD_EDGE X Y 3").unwrap();
        match outcome {
            Outcome::Failed {
                failure: Failure::Graph(Error::EndpointsNotFound { missing, .. }),
                ..
            } => assert_eq!(missing, MissingEndpoint::Both),
            other => panic!("expected missing endpoints, got {other:?}"),
        }
    }

    #[test]
    fn handle_line_writes_rendered_output() {
        let mut session = session();
        session.handle_line("ADD_NODE A").unwrap();
        session.handle_line("ADD_NODE A").unwrap();
        let out = String::from_utf8(session.into_output()).unwrap();
        assert_eq!(out, "Node \"A\" already exists\n");
    }

    #[tokio::test]
    async fn run_counts_commands_and_failures() {
        let mut session = session();
        let script = "ADD_NODE A\n\nADD_NODE A\nBOGUS\nEND\nADD_NODE B\n";
        let summary = session.run(script.as_bytes()).await.unwrap();

        assert_eq!(
            summary,
            SessionSummary {
                lines: 5,
                commands: 3,
                failures: 2,
                stopped_by_sentinel: true,
            }
        );
        assert!(!session.graph().contains_node("B"));
    }

    #[tokio::test]
    async fn run_stops_at_end_of_input_without_sentinel() {
        let mut session = session();
        let summary = session.run("ADD_NODE A\nADD_NODE B".as_bytes()).await.unwrap();
        assert!(!summary.stopped_by_sentinel);
        assert_eq!(session.graph().node_count(), 2);
    }
}
