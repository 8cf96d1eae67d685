//! Longest ("critical") path between two nodes.
//!
//! # Algorithm
//!
//! 1. Run the post-order walk from the source. Any back-edge means a cycle
//!    is reachable and the longest path is unbounded, so the analysis fails.
//! 2. Relax edges once, visiting nodes in reverse post-order (a topological
//!    order of the reachable subgraph). Every predecessor of a node is
//!    finalized before the node itself, so a single pass suffices.
//! 3. Follow the recorded predecessors back from the target.
//!
//! Distances start unreached (`None`) rather than at a negative sentinel.
//! Weights are positive, so any reached node has a distance of at least 0.
//! Sums are kept in `u128`: a path has fewer edges than `u64::MAX`, so the
//! total of `u64` weights along it cannot overflow.
//!
//! Ties between equally heavy paths go to whichever edge reached the target
//! first in relaxation order.

use super::traversal::post_order_impl;
use super::{outgoing, Adjacency};
use crate::domain::CriticalPath;
use crate::error::{Error, Result};
use petgraph::stable_graph::NodeIndex;
use petgraph::visit::NodeIndexable;

/// Compute the maximum-weight path from `from` to `to`.
///
/// Both indices must be nodes of `graph`.
pub(crate) fn critical_path_impl(
    graph: &Adjacency,
    from: NodeIndex,
    to: NodeIndex,
) -> Result<CriticalPath> {
    let walk = post_order_impl(graph, from);
    if !walk.back_edges.is_empty() {
        return Err(Error::CycleDetected {
            from: graph[from].clone(),
            back_edges: walk.back_edges.len(),
        });
    }

    let bound = graph.node_bound();
    let mut distance: Vec<Option<u128>> = vec![None; bound];
    let mut predecessor: Vec<Option<NodeIndex>> = vec![None; bound];
    distance[from.index()] = Some(0);

    for &node in walk.post_order.iter().rev() {
        let Some(base) = distance[node.index()] else {
            continue;
        };

        for (target, weight) in outgoing(graph, node) {
            let candidate = base + u128::from(weight.get());
            if distance[target.index()].is_none_or(|current| current < candidate) {
                distance[target.index()] = Some(candidate);
                predecessor[target.index()] = Some(node);
            }
        }
    }

    let unreachable = || Error::Unreachable {
        from: graph[from].clone(),
        to: graph[to].clone(),
    };

    let total_weight = distance[to.index()].ok_or_else(unreachable)?;

    let mut path = vec![to];
    let mut current = to;
    while current != from {
        current = predecessor[current.index()].ok_or_else(unreachable)?;
        path.push(current);
    }
    path.reverse();

    tracing::debug!(
        from = %graph[from],
        to = %graph[to],
        total_weight,
        length = path.len(),
        "Computed critical path"
    );

    Ok(CriticalPath {
        nodes: path.into_iter().map(|node| graph[node].clone()).collect(),
        total_weight,
    })
}
