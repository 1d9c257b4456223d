//! Dijkstra single-source shortest paths over a [`WeightedGraph`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{GraphError, NodeId, WeightedGraph};

/// Frontier entry ordered so that [`BinaryHeap`] pops the smallest distance.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frontier {
    distance: f64,
    slot: usize,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.slot.cmp(&self.slot))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of a single-source shortest-path search.
///
/// Holds, for every registered node, the minimal distance from the source
/// (`f64::INFINITY` when unreachable) and the predecessor on one shortest
/// path. When several shortest paths exist the first one discovered wins.
#[derive(Debug, Clone)]
pub struct ShortestPaths<'g> {
    graph: &'g WeightedGraph,
    source: usize,
    distances: Vec<f64>,
    predecessors: Vec<Option<usize>>,
}

impl<'g> ShortestPaths<'g> {
    /// Node the search started from.
    #[must_use]
    pub fn source(&self) -> Option<&'g NodeId> {
        self.graph.id_at(self.source)
    }

    /// Minimal distance from the source to `target`.
    ///
    /// Returns `None` when `target` is not registered and
    /// `Some(f64::INFINITY)` when it is unreachable.
    #[must_use]
    pub fn distance_to(&self, target: &NodeId) -> Option<f64> {
        let slot = self.graph.index_of(target).ok()?;
        self.distances.get(slot).copied()
    }

    /// Predecessor of `target` on the recorded shortest path.
    ///
    /// `None` for the source itself, unreachable nodes and unknown nodes.
    #[must_use]
    pub fn predecessor_of(&self, target: &NodeId) -> Option<&'g NodeId> {
        let slot = self.graph.index_of(target).ok()?;
        let previous = self.predecessors.get(slot).copied().flatten()?;
        self.graph.id_at(previous)
    }

    /// Whether `target` can be reached from the source.
    #[must_use]
    pub fn is_reachable(&self, target: &NodeId) -> bool {
        self.distance_to(target).is_some_and(f64::is_finite)
    }

    /// Reconstruct the node sequence from the source to `target`.
    ///
    /// Returns `None` when `target` is unknown or unreachable. The path to the
    /// source itself is the single-element sequence `[source]`.
    #[must_use]
    pub fn path_to(&self, target: &NodeId) -> Option<Vec<NodeId>> {
        let slot = self.graph.index_of(target).ok()?;
        if !self.distances.get(slot).is_some_and(|d| d.is_finite()) {
            return None;
        }
        let mut reversed = Vec::new();
        let mut cursor = Some(slot);
        while let Some(current) = cursor {
            reversed.push(self.graph.id_at(current)?.clone());
            if current == self.source {
                break;
            }
            cursor = self.predecessors.get(current).copied().flatten();
        }
        reversed.reverse();
        Some(reversed)
    }

    /// Iterate over `(node, distance)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'g NodeId, f64)> + '_ {
        self.graph.node_ids().zip(self.distances.iter().copied())
    }
}

/// A shortest path between two nodes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Path {
    /// Total path weight, `f64::INFINITY` when no path exists.
    pub distance: f64,
    /// Nodes from start to end inclusive; empty when no path exists.
    pub nodes: Vec<NodeId>,
}

impl Path {
    /// Path value returned when the destination cannot be reached.
    #[must_use]
    pub const fn unreachable() -> Self {
        Self {
            distance: f64::INFINITY,
            nodes: Vec::new(),
        }
    }

    /// Whether the path connects its endpoints.
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        self.distance.is_finite()
    }
}

impl WeightedGraph {
    /// Run Dijkstra from `start` over the whole graph.
    ///
    /// Costs `O((V + E) log V)` using a binary-heap frontier. The graph is
    /// not modified.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] when `start` is not registered.
    ///
    /// # Examples
    /// ```
    /// use courier_core::{NodeId, WeightedGraph};
    ///
    /// # fn main() -> Result<(), courier_core::GraphError> {
    /// let mut graph = WeightedGraph::new();
    /// for id in ["A", "B", "C"] {
    ///     graph.add_node(id, id);
    /// }
    /// graph.add_edge(&"A".into(), &"B".into(), 1.0, true)?;
    /// let paths = graph.shortest_distances(&NodeId::from("A"))?;
    /// assert_eq!(paths.distance_to(&"B".into()), Some(1.0));
    /// assert_eq!(paths.distance_to(&"C".into()), Some(f64::INFINITY));
    /// # Ok(())
    /// # }
    /// ```
    #[expect(
        clippy::float_arithmetic,
        reason = "edge relaxation sums floating-point weights"
    )]
    pub fn shortest_distances(&self, start: &NodeId) -> Result<ShortestPaths<'_>, GraphError> {
        let source = self.index_of(start)?;
        let mut distances = vec![f64::INFINITY; self.node_count()];
        let mut predecessors = vec![None; self.node_count()];
        let mut frontier = BinaryHeap::new();

        if let Some(origin) = distances.get_mut(source) {
            *origin = 0.0;
        }
        frontier.push(Frontier {
            distance: 0.0,
            slot: source,
        });

        while let Some(Frontier { distance, slot }) = frontier.pop() {
            if distances.get(slot).is_some_and(|&best| distance > best) {
                continue;
            }
            for adjacent in self.neighbours(slot) {
                let candidate = distance + adjacent.weight;
                let Some(best) = distances.get_mut(adjacent.to) else {
                    continue;
                };
                if candidate < *best {
                    *best = candidate;
                    if let Some(previous) = predecessors.get_mut(adjacent.to) {
                        *previous = Some(slot);
                    }
                    frontier.push(Frontier {
                        distance: candidate,
                        slot: adjacent.to,
                    });
                }
            }
        }

        debug!(
            "shortest distances from {start}: {} of {} nodes reachable",
            distances.iter().filter(|d| d.is_finite()).count(),
            distances.len()
        );
        Ok(ShortestPaths {
            graph: self,
            source,
            distances,
            predecessors,
        })
    }

    /// Minimal distance and node sequence from `from` to `to`.
    ///
    /// Returns [`Path::unreachable`] when no path exists.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] when either endpoint is not
    /// registered.
    pub fn shortest_path(&self, from: &NodeId, to: &NodeId) -> Result<Path, GraphError> {
        self.index_of(to)?;
        let paths = self.shortest_distances(from)?;
        match (paths.distance_to(to), paths.path_to(to)) {
            (Some(distance), Some(nodes)) if distance.is_finite() => Ok(Path { distance, nodes }),
            _ => Ok(Path::unreachable()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn id(value: &str) -> NodeId {
        NodeId::from(value)
    }

    /// Depot connected to X and Y at cost 1; X and Y joined at cost 10; Z isolated.
    #[fixture]
    fn diamond() -> WeightedGraph {
        let mut graph = WeightedGraph::new();
        for node in ["Depot", "X", "Y", "Z"] {
            graph.add_node(node, node);
        }
        for (from, to, weight) in [("Depot", "X", 1.0), ("Depot", "Y", 1.0), ("X", "Y", 10.0)] {
            graph
                .add_edge(&id(from), &id(to), weight, true)
                .expect("fixture edge");
        }
        graph
    }

    #[rstest]
    fn source_has_zero_distance(diamond: WeightedGraph) {
        let paths = diamond.shortest_distances(&id("X")).expect("known start");
        assert_eq!(paths.distance_to(&id("X")), Some(0.0));
        assert_eq!(paths.predecessor_of(&id("X")), None);
        assert_eq!(paths.source(), Some(&id("X")));
    }

    #[rstest]
    fn detour_beats_expensive_direct_edge(diamond: WeightedGraph) {
        let path = diamond
            .shortest_path(&id("X"), &id("Y"))
            .expect("known endpoints");
        assert_eq!(path.distance, 2.0);
        assert_eq!(path.nodes, vec![id("X"), id("Depot"), id("Y")]);
    }

    #[rstest]
    fn unreachable_node_has_infinite_distance(diamond: WeightedGraph) {
        let path = diamond
            .shortest_path(&id("Depot"), &id("Z"))
            .expect("known endpoints");
        assert_eq!(path, Path::unreachable());
        assert!(!path.is_reachable());

        let paths = diamond.shortest_distances(&id("Depot")).expect("known start");
        assert!(!paths.is_reachable(&id("Z")));
        assert_eq!(paths.path_to(&id("Z")), None);
    }

    #[rstest]
    fn path_to_self_is_single_node(diamond: WeightedGraph) {
        let path = diamond
            .shortest_path(&id("Y"), &id("Y"))
            .expect("known endpoints");
        assert_eq!(path.distance, 0.0);
        assert_eq!(path.nodes, vec![id("Y")]);
    }

    #[rstest]
    #[case("Nowhere", "X")]
    #[case("X", "Nowhere")]
    fn unknown_endpoints_fail(diamond: WeightedGraph, #[case] from: &str, #[case] to: &str) {
        let err = diamond
            .shortest_path(&id(from), &id(to))
            .expect_err("unknown endpoint");
        assert_eq!(err, GraphError::UnknownNode { id: id("Nowhere") });
    }

    #[rstest]
    fn one_way_edges_are_respected() {
        let mut graph = WeightedGraph::new();
        graph.add_node("A", "A");
        graph.add_node("B", "B");
        graph
            .add_edge(&id("A"), &id("B"), 4.0, false)
            .expect("one-way edge");

        let forward = graph.shortest_path(&id("A"), &id("B")).expect("known");
        let backward = graph.shortest_path(&id("B"), &id("A")).expect("known");
        assert_eq!(forward.distance, 4.0);
        assert!(!backward.is_reachable());
    }

    #[rstest]
    fn iter_reports_every_node(diamond: WeightedGraph) {
        let paths = diamond.shortest_distances(&id("Depot")).expect("known start");
        let distances: Vec<(&NodeId, f64)> = paths.iter().collect();
        assert_eq!(distances.len(), 4);
        assert_eq!(distances.first(), Some(&(&id("Depot"), 0.0)));
    }
}
