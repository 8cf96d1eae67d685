//! In-memory weighted graph store using petgraph.
//!
//! [`GraphStore`] owns the node set, the weighted adjacency and the optional
//! root label. The analyses in the submodules only read it:
//!
//! - [`traversal`]: depth-first post-order walk with back-edge detection
//! - [`critical_path`]: longest path over the topological order
//!
//! # Architecture
//!
//! The implementation uses:
//! - `petgraph::StableDiGraph` for the adjacency, with edge weights as payload
//! - `HashMap<NodeName, NodeIndex>` for mapping names to graph nodes
//!
//! `StableDiGraph` keeps indices valid across removals, so the name map never
//! needs rebuilding after `remove_node`.
//!
//! ## Edge Order
//!
//! Outgoing edges are visited in the order they were added. petgraph links
//! new edges at the head of each node's list, so [`outgoing`] reverses the
//! list it reads.
//!
//! # Failure Atomicity
//!
//! Every mutator validates before it mutates. A failed call leaves the store
//! unchanged.

pub mod critical_path;
pub mod traversal;

use crate::domain::{CriticalPath, EndpointCheck, NodeName, Traversal, Weight};
use crate::error::{Error, Result};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Adjacency storage: node payload is the name, edge payload is the weight.
pub(crate) type Adjacency = StableDiGraph<NodeName, Weight>;

/// A directed, weighted graph with an optional root.
///
/// # Invariants
///
/// - `node_map` has exactly one entry per graph node.
/// - Every edge connects two nodes in `node_map` (removing a node removes
///   all of its edges).
/// - `root`, when set, names a node in `node_map`.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    /// Adjacency with names as node weights and edge weights as payload.
    graph: Adjacency,

    /// Mapping from node name to graph index.
    node_map: HashMap<NodeName, NodeIndex>,

    /// Node used by root-based traversals.
    root: Option<NodeName>,
}

impl GraphStore {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node with no edges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateNode`] if a node with this name exists.
    pub fn add_node(&mut self, name: &str) -> Result<()> {
        if self.node_map.contains_key(name) {
            return Err(Error::DuplicateNode(name.into()));
        }

        let name = NodeName::from(name);
        let index = self.graph.add_node(name.clone());
        tracing::debug!(node = %name, "Added node");
        self.node_map.insert(name, index);
        Ok(())
    }

    /// Insert a weighted edge `from -> to`.
    ///
    /// Checks run in this order: endpoint existence, self-loop, duplicate.
    /// `add_edge("x", "x", w)` on a graph without `x` therefore reports the
    /// missing node, not the self-loop.
    ///
    /// # Errors
    ///
    /// - [`Error::EndpointsNotFound`] naming the missing endpoint(s)
    /// - [`Error::SelfLoop`] if `from == to`
    /// - [`Error::DuplicateEdge`] if the edge already exists
    pub fn add_edge(&mut self, from: &str, to: &str, weight: Weight) -> Result<()> {
        let (from_node, to_node) = self.resolve_endpoints(from, to)?;

        if from_node == to_node {
            return Err(Error::SelfLoop(from.into()));
        }

        if self.graph.find_edge(from_node, to_node).is_some() {
            return Err(Error::DuplicateEdge {
                from: from.into(),
                to: to.into(),
            });
        }

        self.graph.add_edge(from_node, to_node, weight);
        tracing::debug!(from, to, weight = weight.get(), "Added edge");
        Ok(())
    }

    /// Remove a node together with every edge into or out of it.
    ///
    /// If the node is the current root, the root is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if the node does not exist.
    pub fn remove_node(&mut self, name: &str) -> Result<()> {
        let index = self
            .node_map
            .remove(name)
            .ok_or_else(|| Error::NodeNotFound(name.into()))?;

        // petgraph drops incident edges in both directions
        self.graph.remove_node(index);

        if self.root.as_ref().is_some_and(|root| root.as_str() == name) {
            tracing::debug!(node = name, "Removed node was the root, clearing root");
            self.root = None;
        }

        tracing::debug!(node = name, "Removed node");
        Ok(())
    }

    /// Remove the edge `from -> to`.
    ///
    /// # Errors
    ///
    /// - [`Error::EndpointsNotFound`] naming the missing endpoint(s)
    /// - [`Error::EdgeNotFound`] if both nodes exist but are not connected
    pub fn remove_edge(&mut self, from: &str, to: &str) -> Result<()> {
        let (from_node, to_node) = self.resolve_endpoints(from, to)?;

        let edge = self
            .graph
            .find_edge(from_node, to_node)
            .ok_or_else(|| Error::EdgeNotFound {
                from: from.into(),
                to: to.into(),
            })?;

        self.graph.remove_edge(edge);
        tracing::debug!(from, to, "Removed edge");
        Ok(())
    }

    /// Designate `name` as the root, replacing any previous root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if the node does not exist.
    pub fn set_root(&mut self, name: &str) -> Result<()> {
        let index = self.index_of(name)?;
        self.root = Some(self.graph[index].clone());
        tracing::debug!(node = name, "Set root");
        Ok(())
    }

    /// The current root, if one is set.
    #[must_use]
    pub fn root(&self) -> Option<&NodeName> {
        self.root.as_ref()
    }

    /// Check both endpoints of an edge in one lookup.
    #[must_use]
    pub fn check_endpoints(&self, from: &str, to: &str) -> EndpointCheck {
        EndpointCheck::from_presence(self.contains_node(from), self.contains_node(to))
    }

    /// Whether a node with this name exists.
    #[must_use]
    pub fn contains_node(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Weight of the edge `from -> to`, if both nodes and the edge exist.
    #[must_use]
    pub fn edge_weight(&self, from: &str, to: &str) -> Option<Weight> {
        let from_node = *self.node_map.get(from)?;
        let to_node = *self.node_map.get(to)?;
        let edge = self.graph.find_edge(from_node, to_node)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Outgoing neighbours of a node with edge weights, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if the node does not exist.
    pub fn successors(&self, name: &str) -> Result<Vec<(NodeName, Weight)>> {
        let index = self.index_of(name)?;
        Ok(outgoing(&self.graph, index)
            .into_iter()
            .map(|(target, weight)| (self.graph[target].clone(), weight))
            .collect())
    }

    /// Iterate over all node names (in no particular order).
    pub fn nodes(&self) -> impl Iterator<Item = &NodeName> {
        self.node_map.keys()
    }

    /// Number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// True when the graph has no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Depth-first post-order walk from `start`, with back-edges.
    ///
    /// Only nodes reachable from `start` are visited.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if `start` does not exist.
    pub fn traverse(&self, start: &str) -> Result<Traversal> {
        let start = self.index_of(start)?;
        let walk = traversal::post_order_impl(&self.graph, start);
        Ok(walk.into_named(&self.graph))
    }

    /// [`GraphStore::traverse`] starting at the root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RootNotSet`] if no root has been assigned.
    pub fn traverse_from_root(&self) -> Result<Traversal> {
        let root = self.root.as_ref().ok_or(Error::RootNotSet)?;
        self.traverse(root.as_str())
    }

    /// Maximum-weight path from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - [`Error::EndpointsNotFound`] naming the missing endpoint(s)
    /// - [`Error::CycleDetected`] if a cycle is reachable from `from`
    /// - [`Error::Unreachable`] if `to` cannot be reached from `from`
    pub fn critical_path(&self, from: &str, to: &str) -> Result<CriticalPath> {
        let (from_node, to_node) = self.resolve_endpoints(from, to)?;
        critical_path::critical_path_impl(&self.graph, from_node, to_node)
    }

    fn index_of(&self, name: &str) -> Result<NodeIndex> {
        self.node_map
            .get(name)
            .copied()
            .ok_or_else(|| Error::NodeNotFound(name.into()))
    }

    fn resolve_endpoints(&self, from: &str, to: &str) -> Result<(NodeIndex, NodeIndex)> {
        match self.check_endpoints(from, to).missing() {
            None => Ok((self.node_map[from], self.node_map[to])),
            Some(missing) => Err(Error::EndpointsNotFound {
                from: from.into(),
                to: to.into(),
                missing,
            }),
        }
    }
}

/// Outgoing edges of `node` as `(target, weight)`, oldest edge first.
pub(crate) fn outgoing(graph: &Adjacency, node: NodeIndex) -> Vec<(NodeIndex, Weight)> {
    let mut edges: Vec<(NodeIndex, Weight)> = graph
        .edges(node)
        .map(|edge| (edge.target(), *edge.weight()))
        .collect();
    edges.reverse();
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MissingEndpoint;

    fn w(value: u64) -> Weight {
        Weight::new(value).unwrap()
    }

    fn store_with(nodes: &[&str]) -> GraphStore {
        let mut store = GraphStore::new();
        for node in nodes {
            store.add_node(node).unwrap();
        }
        store
    }

    #[test]
    fn add_node_rejects_duplicates() {
        let mut store = store_with(&["A"]);
        assert_eq!(store.add_node("A"), Err(Error::DuplicateNode("A".into())));
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn add_edge_reports_which_endpoint_is_missing() {
        let mut store = store_with(&["A"]);

        let missing = |result: Result<()>| match result {
            Err(Error::EndpointsNotFound { missing, .. }) => missing,
            other => panic!("expected EndpointsNotFound, got {other:?}"),
        };

        assert_eq!(missing(store.add_edge("X", "A", w(1))), MissingEndpoint::From);
        assert_eq!(missing(store.add_edge("A", "Y", w(1))), MissingEndpoint::To);
        assert_eq!(missing(store.add_edge("X", "Y", w(1))), MissingEndpoint::Both);
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn existence_is_checked_before_self_loop() {
        let mut store = GraphStore::new();
        assert!(matches!(
            store.add_edge("x", "x", w(1)),
            Err(Error::EndpointsNotFound {
                missing: MissingEndpoint::Both,
                ..
            })
        ));

        store.add_node("x").unwrap();
        assert_eq!(store.add_edge("x", "x", w(1)), Err(Error::SelfLoop("x".into())));
    }

    #[test]
    fn duplicate_edge_fails_regardless_of_weight() {
        let mut store = store_with(&["A", "B"]);
        store.add_edge("A", "B", w(2)).unwrap();
        assert_eq!(
            store.add_edge("A", "B", w(7)),
            Err(Error::DuplicateEdge {
                from: "A".into(),
                to: "B".into()
            })
        );
        assert_eq!(store.edge_weight("A", "B"), Some(w(2)));
    }

    #[test]
    fn reverse_edge_is_not_a_duplicate() {
        let mut store = store_with(&["A", "B"]);
        store.add_edge("A", "B", w(1)).unwrap();
        store.add_edge("B", "A", w(1)).unwrap();
        assert_eq!(store.edge_count(), 2);
    }

    #[test]
    fn remove_node_cascades_to_incoming_and_outgoing_edges() {
        let mut store = store_with(&["A", "B", "C"]);
        store.add_edge("A", "B", w(1)).unwrap();
        store.add_edge("B", "C", w(1)).unwrap();
        store.add_edge("C", "B", w(1)).unwrap();

        store.remove_node("B").unwrap();

        assert!(!store.contains_node("B"));
        assert_eq!(store.edge_count(), 0);
        assert!(store.successors("A").unwrap().is_empty());
        assert!(store.successors("C").unwrap().is_empty());
    }

    #[test]
    fn remove_missing_node_fails() {
        let mut store = GraphStore::new();
        assert_eq!(store.remove_node("A"), Err(Error::NodeNotFound("A".into())));
    }

    #[test]
    fn removing_root_clears_it() {
        let mut store = store_with(&["A", "B"]);
        store.set_root("A").unwrap();
        store.remove_node("B").unwrap();
        assert_eq!(store.root(), Some(&NodeName::new("A")));

        store.remove_node("A").unwrap();
        assert_eq!(store.root(), None);
        assert_eq!(store.traverse_from_root(), Err(Error::RootNotSet));
    }

    #[test]
    fn remove_edge_distinguishes_missing_edge_from_missing_node() {
        let mut store = store_with(&["A", "B"]);
        assert_eq!(
            store.remove_edge("A", "B"),
            Err(Error::EdgeNotFound {
                from: "A".into(),
                to: "B".into()
            })
        );
        assert!(matches!(
            store.remove_edge("A", "Z"),
            Err(Error::EndpointsNotFound {
                missing: MissingEndpoint::To,
                ..
            })
        ));

        store.add_edge("A", "B", w(1)).unwrap();
        store.remove_edge("A", "B").unwrap();
        assert_eq!(store.edge_weight("A", "B"), None);
    }

    #[test]
    fn set_root_requires_existing_node() {
        let mut store = store_with(&["A", "B"]);
        assert_eq!(store.set_root("Z"), Err(Error::NodeNotFound("Z".into())));
        assert_eq!(store.root(), None);

        store.set_root("A").unwrap();
        store.set_root("B").unwrap();
        assert_eq!(store.root(), Some(&NodeName::new("B")));
    }

    #[test]
    fn successors_follow_insertion_order() {
        let mut store = store_with(&["A", "B", "C", "D"]);
        store.add_edge("A", "C", w(1)).unwrap();
        store.add_edge("A", "B", w(2)).unwrap();
        store.add_edge("A", "D", w(3)).unwrap();

        let names: Vec<String> = store
            .successors("A")
            .unwrap()
            .into_iter()
            .map(|(name, _)| name.0)
            .collect();
        assert_eq!(names, vec!["C", "B", "D"]);
    }

    #[test]
    fn node_names_are_reusable_after_removal() {
        let mut store = store_with(&["A", "B"]);
        store.add_edge("A", "B", w(1)).unwrap();
        store.remove_node("B").unwrap();
        store.add_node("B").unwrap();

        assert_eq!(store.edge_weight("A", "B"), None);
        store.add_edge("A", "B", w(4)).unwrap();
        assert_eq!(store.edge_weight("A", "B"), Some(w(4)));
    }

    #[test]
    fn check_endpoints_matches_presence() {
        let store = store_with(&["A"]);
        assert_eq!(store.check_endpoints("A", "A"), EndpointCheck::Ok);
        assert_eq!(store.check_endpoints("B", "A"), EndpointCheck::FromMissing);
        assert_eq!(store.check_endpoints("A", "B"), EndpointCheck::ToMissing);
        assert_eq!(store.check_endpoints("B", "C"), EndpointCheck::BothMissing);
    }
}
