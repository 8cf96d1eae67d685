//! Error types for critpath operations.
//!
//! Errors are split by layer:
//!
//! - **`Error`**: graph mutation and analysis failures. Every variant is
//!   recoverable; a session reports it and keeps reading commands.
//! - **`SessionError`**: infrastructure failures (I/O, JSON encoding) that
//!   end the session.
//!
//! Command parsing errors live next to the parser in
//! [`crate::protocol::ParseError`].

use crate::domain::{MissingEndpoint, NodeName};
use std::io;
use thiserror::Error;

/// The error type for graph operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A node with this name already exists.
    #[error("Node \"{0}\" already exists")]
    DuplicateNode(NodeName),

    /// A single node lookup failed.
    #[error("Node \"{0}\" does not exist")]
    NodeNotFound(NodeName),

    /// One or both endpoints of a two-node operation are missing.
    #[error("{}", describe_missing(.from, .to, .missing))]
    EndpointsNotFound {
        /// Requested source node
        from: NodeName,
        /// Requested target node
        to: NodeName,
        /// Which of the two is absent
        missing: MissingEndpoint,
    },

    /// Edges from a node to itself are not allowed.
    #[error("Self-loop on node \"{0}\" is not allowed")]
    SelfLoop(NodeName),

    /// An edge between these nodes already exists.
    #[error("Edge between nodes \"{from}\" and \"{to}\" already exists")]
    DuplicateEdge {
        /// Source node
        from: NodeName,
        /// Target node
        to: NodeName,
    },

    /// Both nodes exist but are not connected by an edge.
    #[error("Edge between nodes \"{from}\" and \"{to}\" does not exist")]
    EdgeNotFound {
        /// Source node
        from: NodeName,
        /// Target node
        to: NodeName,
    },

    /// A root-based traversal was requested before a root was assigned.
    #[error("Root is not set")]
    RootNotSet,

    /// Longest path is unbounded because a cycle is reachable from the source.
    #[error("Cycle detected in graph reachable from node \"{from}\"")]
    CycleDetected {
        /// Source node of the failed analysis
        from: NodeName,
        /// Number of back-edges found
        back_edges: usize,
    },

    /// No path leads from the source to the target.
    #[error("Node \"{to}\" is not reachable from node \"{from}\"")]
    Unreachable {
        /// Source node
        from: NodeName,
        /// Target node
        to: NodeName,
    },
}

fn describe_missing(from: &NodeName, to: &NodeName, missing: &MissingEndpoint) -> String {
    match missing {
        MissingEndpoint::From => format!("Node \"{from}\" does not exist"),
        MissingEndpoint::To => format!("Node \"{to}\" does not exist"),
        MissingEndpoint::Both if from == to => format!("Node \"{from}\" does not exist"),
        MissingEndpoint::Both => format!("Nodes \"{from}\" and \"{to}\" do not exist"),
    }
}

impl Error {
    /// Names of the nodes this error reports as missing.
    ///
    /// Empty for errors that are not about missing nodes.
    #[must_use]
    pub fn missing_nodes(&self) -> Vec<&NodeName> {
        match self {
            Self::NodeNotFound(name) => vec![name],
            Self::EndpointsNotFound { from, to, missing } => match missing {
                MissingEndpoint::From => vec![from],
                MissingEndpoint::To => vec![to],
                MissingEndpoint::Both if from == to => vec![from],
                MissingEndpoint::Both => vec![from, to],
            },
            _ => Vec::new(),
        }
    }
}

/// A specialized Result type for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that stop a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading input or writing output failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A response could not be encoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
