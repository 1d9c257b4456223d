//! Nearest-neighbour route planning over live shortest distances.
//!
//! From the current position the planner runs a full Dijkstra search, moves
//! to the closest remaining destination along its shortest path and repeats
//! from there. Distances are recomputed at every step because they depend
//! entirely on the new position. Ties are broken by the smallest
//! [`NodeId`], so the same inputs always produce the same route.

use std::collections::BTreeSet;

use log::{debug, warn};

use crate::{GraphError, NodeId, Route, WeightedGraph};

/// Plans a multi-stop route from a fixed depot.
///
/// The planner is stateless apart from its depot; every call reads the graph
/// and destinations it is given and returns a fresh [`Route`].
///
/// # Examples
/// ```
/// use courier_core::{NodeId, RoutePlanner, WeightedGraph};
///
/// # fn main() -> Result<(), courier_core::GraphError> {
/// let mut graph = WeightedGraph::new();
/// for id in ["Depot", "X", "Y"] {
///     graph.add_node(id, id);
/// }
/// graph.add_edge(&"Depot".into(), &"X".into(), 1.0, true)?;
/// graph.add_edge(&"Depot".into(), &"Y".into(), 1.0, true)?;
/// graph.add_edge(&"X".into(), &"Y".into(), 10.0, true)?;
///
/// let planner = RoutePlanner::new("Depot");
/// let route = planner.plan(&graph, [&NodeId::from("X"), &NodeId::from("Y")])?;
/// let stops: Vec<&str> = route.stops().iter().map(NodeId::as_str).collect();
/// assert_eq!(stops, ["Depot", "X", "Depot", "Y"]);
/// assert_eq!(route.total_distance(), 3.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePlanner {
    depot: NodeId,
}

impl RoutePlanner {
    /// Create a planner whose routes start at `depot`.
    pub fn new(depot: impl Into<NodeId>) -> Self {
        Self {
            depot: depot.into(),
        }
    }

    /// Origin of every planned route.
    #[must_use]
    pub const fn depot(&self) -> &NodeId {
        &self.depot
    }

    /// Plan a route visiting every distinct reachable destination once.
    ///
    /// Duplicate destinations collapse into a single stop. An empty input
    /// yields [`Route::empty`]. Destinations that cannot be reached, including
    /// identifiers the graph does not know, end the walk: the returned route
    /// covers everything reached so far and lists the rest in
    /// [`Route::unreachable`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] when the depot is not registered in
    /// `graph`.
    #[expect(
        clippy::float_arithmetic,
        reason = "route length accumulates floating-point leg distances"
    )]
    pub fn plan<'a, I>(&self, graph: &WeightedGraph, destinations: I) -> Result<Route, GraphError>
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        let mut remaining: BTreeSet<&NodeId> = destinations.into_iter().collect();
        if remaining.is_empty() {
            return Ok(Route::empty());
        }
        graph.index_of(&self.depot)?;

        let mut current = self.depot.clone();
        let mut stops = vec![current.clone()];
        let mut total_distance = 0.0;

        while !remaining.is_empty() {
            let paths = graph.shortest_distances(&current)?;
            let Some((next, distance)) = nearest(&remaining, |id| paths.distance_to(id)) else {
                break;
            };
            let Some(leg) = paths.path_to(next) else {
                break;
            };
            debug!("leg {current} -> {next}: distance {distance}, {} hops", leg.len());
            stops.extend(leg.into_iter().skip(1));
            total_distance += distance;
            remaining.remove(next);
            current = next.clone();
        }

        let unreachable: Vec<NodeId> = remaining.into_iter().cloned().collect();
        if !unreachable.is_empty() {
            warn!(
                "route from {} omits {} unreachable destination(s): {}",
                self.depot,
                unreachable.len(),
                join_ids(&unreachable)
            );
        }
        Ok(Route::new(stops, total_distance, unreachable))
    }
}

/// Closest reachable candidate; earlier (smaller) identifiers win ties.
fn nearest<'a>(
    candidates: &BTreeSet<&'a NodeId>,
    distance_of: impl Fn(&NodeId) -> Option<f64>,
) -> Option<(&'a NodeId, f64)> {
    candidates
        .iter()
        .filter_map(|&id| {
            distance_of(id)
                .filter(|distance| distance.is_finite())
                .map(|distance| (id, distance))
        })
        .min_by(|left, right| left.1.total_cmp(&right.1))
}

fn join_ids(ids: &[NodeId]) -> String {
    ids.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
