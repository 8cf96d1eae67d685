//! Domain types for the graph engine.
//!
//! This module contains the value types shared by the store, the traversal
//! engine and the path analyzer.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::num::NonZeroU64;

/// Weight carried by an edge.
///
/// Edge weights are positive integers; zero and negative weights are rejected
/// by the protocol layer before they can reach the store.
pub type Weight = NonZeroU64;

/// Unique name of a node. The name is the node's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeName(pub String);

impl NodeName {
    /// Create a new node name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Borrow<str> for NodeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of checking both endpoints of an edge in a single lookup.
///
/// Callers report per-node errors, so "both missing" is kept distinct from
/// either single-endpoint case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointCheck {
    /// Both endpoints exist
    Ok,

    /// Only the source node is missing
    FromMissing,

    /// Only the target node is missing
    ToMissing,

    /// Neither endpoint exists
    BothMissing,
}

impl EndpointCheck {
    /// Build the check result from the existence of each endpoint.
    #[must_use]
    pub fn from_presence(from_exists: bool, to_exists: bool) -> Self {
        match (from_exists, to_exists) {
            (true, true) => Self::Ok,
            (false, true) => Self::FromMissing,
            (true, false) => Self::ToMissing,
            (false, false) => Self::BothMissing,
        }
    }

    /// The missing endpoint(s), or `None` when both exist.
    #[must_use]
    pub fn missing(self) -> Option<MissingEndpoint> {
        match self {
            Self::Ok => None,
            Self::FromMissing => Some(MissingEndpoint::From),
            Self::ToMissing => Some(MissingEndpoint::To),
            Self::BothMissing => Some(MissingEndpoint::Both),
        }
    }
}

/// Which endpoint(s) of an edge operation do not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingEndpoint {
    /// The source node
    From,

    /// The target node
    To,

    /// Both nodes
    Both,
}

/// An edge that points back into a node still open on the DFS path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BackEdge {
    /// Source of the edge (the deeper node)
    pub from: NodeName,

    /// Target of the edge (an ancestor on the current path)
    pub to: NodeName,
}

impl fmt::Display for BackEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// Result of a depth-first post-order walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traversal {
    /// Reachable nodes in order of completion
    pub post_order: Vec<NodeName>,

    /// Back-edges in discovery order
    pub back_edges: Vec<BackEdge>,
}

impl Traversal {
    /// The post-order read backwards.
    ///
    /// This is a topological order of the reachable subgraph only when
    /// [`Traversal::is_acyclic`] holds.
    #[must_use]
    pub fn reverse_post_order(&self) -> Vec<NodeName> {
        self.post_order.iter().rev().cloned().collect()
    }

    /// True when no back-edge was found.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        self.back_edges.is_empty()
    }
}

/// A maximum-weight path between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalPath {
    /// Nodes from source to target, both inclusive
    pub nodes: Vec<NodeName>,

    /// Sum of the edge weights along `nodes`
    pub total_weight: u128,
}

impl fmt::Display for CriticalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.nodes.iter();
        if let Some(first) = iter.next() {
            write!(f, "{first}")?;
            for node in iter {
                write!(f, "->{node}")?;
            }
        }
        Ok(())
    }
}
