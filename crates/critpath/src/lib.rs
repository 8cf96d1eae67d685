//! Critpath - an in-memory weighted graph engine.
//!
//! This crate provides both a CLI application and a library for building a
//! directed, weighted graph through a line-oriented command protocol and
//! analysing it:
//!
//! - reverse post-order from a root, with back-edge (cycle) reporting
//! - critical (maximum-weight) path between two nodes
//!
//! # Example
//!
//! ```
//! use critpath::domain::Weight;
//! use critpath::graph::GraphStore;
//!
//! # fn main() -> critpath::error::Result<()> {
//! let mut graph = GraphStore::new();
//! for node in ["A", "B", "C"] {
//!     graph.add_node(node)?;
//! }
//! graph.add_edge("A", "B", Weight::new(3).unwrap())?;
//! graph.add_edge("A", "C", Weight::new(1).unwrap())?;
//! graph.add_edge("C", "B", Weight::new(5).unwrap())?;
//!
//! let path = graph.critical_path("A", "B")?;
//! assert_eq!(path.to_string(), "A->C->B");
//! assert_eq!(path.total_weight, 6);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod domain;
pub mod error;
pub mod graph;
pub mod protocol;

// Session and output layers
pub mod output;
pub mod session;

// Public CLI module (needed by binary)
pub mod cli;
pub mod config;
