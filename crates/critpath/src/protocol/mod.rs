//! Line-oriented command protocol.
//!
//! Each input line holds one whitespace-separated command:
//!
//! | Command              | Arguments              |
//! |----------------------|------------------------|
//! | `ADD_NODE`           | name                   |
//! | `ADD_EDGE`           | from, to, [weight = 1] |
//! | `REMOVE_NODE`        | name                   |
//! | `REMOVE_EDGE`        | from, to               |
//! | `ROOT`               | name                   |
//! | `PRINT_RPO`          |                        |
//! | `FIND_CRITICAL_PATH` | from, to               |
//!
//! Arguments are validated here, before anything reaches the graph: missing
//! names and non-positive weights never get to the store. Tokens beyond the
//! ones a command uses are ignored.

use crate::domain::{NodeName, Weight};
use std::fmt;
use std::str::{FromStr, SplitWhitespace};
use thiserror::Error;

/// Weight used when `ADD_EDGE` omits one.
pub const DEFAULT_WEIGHT: Weight = Weight::MIN;

/// Errors produced while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The first token is not a known command.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A required argument is absent.
    #[error("{command} requires {argument}")]
    MissingArgument {
        /// Command keyword
        command: CommandKind,
        /// Description of the missing argument
        argument: &'static str,
    },

    /// The weight parsed as an integer below 1.
    #[error("Edge weight must be greater than 0")]
    NonPositiveWeight(i128),

    /// The weight is not an integer at all.
    #[error("Edge weight must be a positive integer, got \"{0}\"")]
    InvalidWeight(String),
}

/// Command keywords understood by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// `ADD_NODE`
    AddNode,
    /// `ADD_EDGE`
    AddEdge,
    /// `REMOVE_NODE`
    RemoveNode,
    /// `REMOVE_EDGE`
    RemoveEdge,
    /// `ROOT`
    Root,
    /// `PRINT_RPO`
    PrintRpo,
    /// `FIND_CRITICAL_PATH`
    FindCriticalPath,
}

impl CommandKind {
    /// The keyword as written on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddNode => "ADD_NODE",
            Self::AddEdge => "ADD_EDGE",
            Self::RemoveNode => "REMOVE_NODE",
            Self::RemoveEdge => "REMOVE_EDGE",
            Self::Root => "ROOT",
            Self::PrintRpo => "PRINT_RPO",
            Self::FindCriticalPath => "FIND_CRITICAL_PATH",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADD_NODE" => Ok(Self::AddNode),
            "ADD_EDGE" => Ok(Self::AddEdge),
            "REMOVE_NODE" => Ok(Self::RemoveNode),
            "REMOVE_EDGE" => Ok(Self::RemoveEdge),
            "ROOT" => Ok(Self::Root),
            "PRINT_RPO" => Ok(Self::PrintRpo),
            "FIND_CRITICAL_PATH" => Ok(Self::FindCriticalPath),
            _ => Err(()),
        }
    }
}

/// A parsed, validated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert a node
    AddNode {
        /// New node
        name: NodeName,
    },

    /// Insert a weighted edge
    AddEdge {
        /// Source node
        from: NodeName,
        /// Target node
        to: NodeName,
        /// Edge weight (at least 1)
        weight: Weight,
    },

    /// Remove a node and its edges
    RemoveNode {
        /// Node to remove
        name: NodeName,
    },

    /// Remove an edge
    RemoveEdge {
        /// Source node
        from: NodeName,
        /// Target node
        to: NodeName,
    },

    /// Designate the root
    SetRoot {
        /// New root
        name: NodeName,
    },

    /// Print the reverse post-order from the root
    PrintRpo,

    /// Print the longest path between two nodes
    FindCriticalPath {
        /// Source node
        from: NodeName,
        /// Target node
        to: NodeName,
    },
}

impl Command {
    /// The keyword this command was parsed from.
    #[must_use]
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::AddNode { .. } => CommandKind::AddNode,
            Self::AddEdge { .. } => CommandKind::AddEdge,
            Self::RemoveNode { .. } => CommandKind::RemoveNode,
            Self::RemoveEdge { .. } => CommandKind::RemoveEdge,
            Self::SetRoot { .. } => CommandKind::Root,
            Self::PrintRpo => CommandKind::PrintRpo,
            Self::FindCriticalPath { .. } => CommandKind::FindCriticalPath,
        }
    }
}

/// Parse one input line.
///
/// Returns `Ok(None)` for blank lines.
///
/// # Errors
///
/// Returns a [`ParseError`] for unknown keywords, missing arguments and
/// invalid weights. `UnknownCommand` carries the whole line as received.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let mut tokens = line.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Ok(None);
    };

    let kind = keyword
        .parse::<CommandKind>()
        .map_err(|()| ParseError::UnknownCommand(line.to_string()))?;
    let mut args = Args { kind, tokens };

    let command = match kind {
        CommandKind::AddNode => Command::AddNode {
            name: args.node("a node name")?,
        },
        CommandKind::AddEdge => Command::AddEdge {
            from: args.node("a source node")?,
            to: args.node("a target node")?,
            weight: args.weight()?,
        },
        CommandKind::RemoveNode => Command::RemoveNode {
            name: args.node("a node name")?,
        },
        CommandKind::RemoveEdge => Command::RemoveEdge {
            from: args.node("a source node")?,
            to: args.node("a target node")?,
        },
        CommandKind::Root => Command::SetRoot {
            name: args.node("a node name")?,
        },
        CommandKind::PrintRpo => Command::PrintRpo,
        CommandKind::FindCriticalPath => Command::FindCriticalPath {
            from: args.node("a source node")?,
            to: args.node("a target node")?,
        },
    };

    Ok(Some(command))
}

/// Validate an edge weight token.
///
/// # Errors
///
/// - [`ParseError::NonPositiveWeight`] for integers below 1
/// - [`ParseError::InvalidWeight`] for anything that is not an integer
pub fn parse_weight(token: &str) -> Result<Weight, ParseError> {
    match token.parse::<i128>() {
        Ok(value) if value < 1 => Err(ParseError::NonPositiveWeight(value)),
        Ok(value) => u64::try_from(value)
            .ok()
            .and_then(Weight::new)
            .ok_or_else(|| ParseError::InvalidWeight(token.to_string())),
        Err(_) => Err(ParseError::InvalidWeight(token.to_string())),
    }
}

/// Remaining tokens of a line, tagged with the command they belong to.
struct Args<'a> {
    kind: CommandKind,
    tokens: SplitWhitespace<'a>,
}

impl Args<'_> {
    fn node(&mut self, argument: &'static str) -> Result<NodeName, ParseError> {
        self.tokens
            .next()
            .map(NodeName::from)
            .ok_or(ParseError::MissingArgument {
                command: self.kind,
                argument,
            })
    }

    fn weight(&mut self) -> Result<Weight, ParseError> {
        self.tokens.next().map_or(Ok(DEFAULT_WEIGHT), parse_weight)
    }
}
