//! Weighted road graph.
//!
//! Nodes are addressed by opaque [`NodeId`] keys and carry a display label.
//! Edges are directed, weighted and deduplicated per direction: registering
//! an edge that already exists keeps the first weight. Node identities are
//! interned to dense indices so shortest-path searches work on plain vectors.

mod error;
mod shortest_path;

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use error::GraphError;
pub use shortest_path::{Path, ShortestPaths};

/// Opaque identifier of a graph node.
///
/// # Examples
/// ```
/// use courier_core::NodeId;
///
/// let id = NodeId::from("DEPOT");
/// assert_eq!(id.as_str(), "DEPOT");
/// assert_eq!(id.to_string(), "DEPOT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(String);

impl NodeId {
    /// Construct an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A registered location in the road graph.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// Human-readable label used for display.
    pub label: String,
}

/// A directed, weighted connection between two nodes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    /// Tail of the edge.
    pub from: NodeId,
    /// Head of the edge.
    pub to: NodeId,
    /// Non-negative travel cost.
    pub weight: f64,
}

/// Snapshot of every node and directed edge, for diagnostic display.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphDescription {
    /// Nodes in registration order.
    pub nodes: Vec<Node>,
    /// Directed edges grouped by tail, in registration order.
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Adjacent {
    to: usize,
    weight: f64,
}

/// Adjacency-list graph with shortest-path queries.
///
/// The graph is append-only: nodes and edges are registered once, typically
/// from a [`Topology`](crate::Topology), and path queries never mutate it.
///
/// # Examples
/// ```
/// use courier_core::{NodeId, WeightedGraph};
///
/// # fn main() -> Result<(), courier_core::GraphError> {
/// let mut graph = WeightedGraph::new();
/// graph.add_node("A", "Alpha");
/// graph.add_node("B", "Beta");
/// graph.add_edge(&NodeId::from("A"), &NodeId::from("B"), 2.5, true)?;
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    adjacency: Vec<Vec<Adjacent>>,
}

impl WeightedGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node, or relabel it when `id` is already present.
    ///
    /// Relabelling never touches the node's edges.
    pub fn add_node(&mut self, id: impl Into<NodeId>, label: impl Into<String>) {
        let node_id = id.into();
        let text = label.into();
        if let Some(node) = self
            .index
            .get(&node_id)
            .and_then(|&slot| self.nodes.get_mut(slot))
        {
            debug!("relabelling node {node_id} as {text:?}");
            node.label = text;
            return;
        }
        let slot = self.nodes.len();
        self.index.insert(node_id.clone(), slot);
        self.nodes.push(Node {
            id: node_id,
            label: text,
        });
        self.adjacency.push(Vec::new());
    }

    /// Register a weighted edge from `from` to `to`.
    ///
    /// When `bidirectional` is set the reverse edge is registered too. Each
    /// direction is deduplicated independently: an existing edge keeps its
    /// original weight.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] when either endpoint is
    /// unregistered and [`GraphError::InvalidWeight`] when `weight` is
    /// negative or not finite. The graph is unchanged on error.
    pub fn add_edge(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        weight: f64,
        bidirectional: bool,
    ) -> Result<(), GraphError> {
        let tail = self.index_of(from)?;
        let head = self.index_of(to)?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidWeight {
                from: from.clone(),
                to: to.clone(),
                weight,
            });
        }
        self.push_adjacent(tail, head, weight);
        if bidirectional {
            self.push_adjacent(head, tail, weight);
        }
        Ok(())
    }

    fn push_adjacent(&mut self, tail: usize, head: usize, weight: f64) {
        let Some(list) = self.adjacency.get_mut(tail) else {
            return;
        };
        if list.iter().any(|adjacent| adjacent.to == head) {
            warn!(
                "ignoring duplicate edge {} -> {}",
                describe_slot(&self.nodes, tail),
                describe_slot(&self.nodes, head)
            );
            return;
        }
        list.push(Adjacent { to: head, weight });
    }

    /// Whether `id` names a registered node.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Look up a registered node.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).and_then(|&slot| self.nodes.get(slot))
    }

    /// Display label for `id`, if registered.
    #[must_use]
    pub fn label(&self, id: &NodeId) -> Option<&str> {
        self.node(id).map(|node| node.label.as_str())
    }

    /// Registered nodes in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    /// Identifiers of every registered node, in registration order.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.nodes.iter().map(|node| &node.id)
    }

    /// Every directed edge, grouped by tail in registration order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.nodes
            .iter()
            .zip(&self.adjacency)
            .flat_map(move |(tail, list)| {
                list.iter().filter_map(move |adjacent| {
                    self.nodes.get(adjacent.to).map(|head| Edge {
                        from: tail.id.clone(),
                        to: head.id.clone(),
                        weight: adjacent.weight,
                    })
                })
            })
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Collect nodes and edges for display.
    #[must_use]
    pub fn describe(&self) -> GraphDescription {
        GraphDescription {
            nodes: self.nodes.clone(),
            edges: self.edges().collect(),
        }
    }

    pub(crate) fn index_of(&self, id: &NodeId) -> Result<usize, GraphError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode { id: id.clone() })
    }

    pub(crate) fn id_at(&self, slot: usize) -> Option<&NodeId> {
        self.nodes.get(slot).map(|node| &node.id)
    }

    fn neighbours(&self, slot: usize) -> &[Adjacent] {
        self.adjacency.get(slot).map_or(&[], Vec::as_slice)
    }
}

fn describe_slot(nodes: &[Node], slot: usize) -> &str {
    nodes.get(slot).map_or("?", |node| node.id.as_str())
}
