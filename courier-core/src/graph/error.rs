use thiserror::Error;

use super::NodeId;

/// Errors returned by [`WeightedGraph`](super::WeightedGraph) operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// An edge or path query referenced a node that was never registered.
    #[error("node {id} is not registered in the graph")]
    UnknownNode {
        /// Identifier that failed to resolve.
        id: NodeId,
    },
    /// An edge weight was negative, NaN or infinite.
    ///
    /// Dijkstra relaxation is only correct for finite, non-negative weights,
    /// so these are rejected before they reach the adjacency lists.
    #[error("edge {from} -> {to} has invalid weight {weight}")]
    InvalidWeight {
        /// Edge tail.
        from: NodeId,
        /// Edge head.
        to: NodeId,
        /// Rejected weight.
        weight: f64,
    },
}
