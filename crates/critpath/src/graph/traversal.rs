//! Depth-first post-order traversal with back-edge detection.
//!
//! The walk visits only the subgraph reachable from its start node. Each
//! node moves through three states:
//!
//! - `Unvisited`: not seen yet
//! - `Open`: on the current DFS path, some outgoing edges still unexplored
//! - `Closed`: all outgoing edges explored, node appended to the post-order
//!
//! An edge into an `Open` node is a back-edge and proves a cycle. Edges into
//! `Closed` nodes are forward or cross edges and are not reported.
//!
//! The search keeps an explicit stack of frames instead of recursing, so long
//! chains cannot overflow the call stack. Frames resume their successor list
//! where they left off, which yields exactly the recursive visiting order.

use super::{outgoing, Adjacency};
use crate::domain::{BackEdge, Traversal, Weight};
use petgraph::stable_graph::NodeIndex;
use petgraph::visit::NodeIndexable;

/// Visitation state of a node during one walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visit {
    /// Not reached yet
    #[default]
    Unvisited,

    /// Reached, still on the DFS path
    Open,

    /// Finished
    Closed,
}

/// Traversal result in terms of graph indices.
#[derive(Debug, Default)]
pub(crate) struct IndexTraversal {
    /// Nodes in order of completion
    pub(crate) post_order: Vec<NodeIndex>,

    /// `(source, target)` pairs in discovery order
    pub(crate) back_edges: Vec<(NodeIndex, NodeIndex)>,
}

impl IndexTraversal {
    /// Resolve indices to node names.
    pub(crate) fn into_named(self, graph: &Adjacency) -> Traversal {
        Traversal {
            post_order: self
                .post_order
                .into_iter()
                .map(|node| graph[node].clone())
                .collect(),
            back_edges: self
                .back_edges
                .into_iter()
                .map(|(from, to)| BackEdge {
                    from: graph[from].clone(),
                    to: graph[to].clone(),
                })
                .collect(),
        }
    }
}

/// One node on the explicit DFS stack.
struct Frame {
    node: NodeIndex,
    successors: Vec<(NodeIndex, Weight)>,
    next: usize,
}

impl Frame {
    fn open(graph: &Adjacency, node: NodeIndex) -> Self {
        Self {
            node,
            successors: outgoing(graph, node),
            next: 0,
        }
    }
}

/// Walk the subgraph reachable from `start` in depth-first post-order.
///
/// `start` must be a node of `graph`.
pub(crate) fn post_order_impl(graph: &Adjacency, start: NodeIndex) -> IndexTraversal {
    let mut marks = vec![Visit::Unvisited; graph.node_bound()];
    let mut result = IndexTraversal::default();

    marks[start.index()] = Visit::Open;
    let mut stack = vec![Frame::open(graph, start)];

    while let Some(frame) = stack.last_mut() {
        let Some(&(neighbor, _)) = frame.successors.get(frame.next) else {
            let node = frame.node;
            stack.pop();
            result.post_order.push(node);
            marks[node.index()] = Visit::Closed;
            continue;
        };
        frame.next += 1;

        match marks[neighbor.index()] {
            Visit::Unvisited => {
                marks[neighbor.index()] = Visit::Open;
                stack.push(Frame::open(graph, neighbor));
            }
            Visit::Open => result.back_edges.push((frame.node, neighbor)),
            Visit::Closed => {}
        }
    }

    tracing::debug!(
        start = %graph[start],
        visited = result.post_order.len(),
        back_edges = result.back_edges.len(),
        "Finished post-order traversal"
    );

    result
}
