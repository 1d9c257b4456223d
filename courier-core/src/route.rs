//! Planned multi-stop routes.
//!
//! A route starts at the depot and concatenates the shortest path of every
//! leg. Destinations the planner could not reach are listed separately, so a
//! partial route is always distinguishable from a complete one.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{NodeId, WeightedGraph};

/// An ordered node sequence from the depot plus its total distance.
///
/// # Examples
/// ```
/// use courier_core::{NodeId, Route};
///
/// let route = Route::new(vec![NodeId::from("DEPOT"), NodeId::from("A")], 4.0, Vec::new());
/// assert_eq!(route.depot(), Some(&NodeId::from("DEPOT")));
/// assert_eq!(route.total_distance(), 4.0);
/// assert!(!route.is_partial());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Route {
    stops: Vec<NodeId>,
    total_distance: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    unreachable: Vec<NodeId>,
}

impl Route {
    /// Construct a route from its stops, distance and skipped destinations.
    #[must_use]
    pub const fn new(stops: Vec<NodeId>, total_distance: f64, unreachable: Vec<NodeId>) -> Self {
        Self {
            stops,
            total_distance,
            unreachable,
        }
    }

    /// The route planned when nothing is pending.
    ///
    /// # Examples
    /// ```
    /// use courier_core::Route;
    ///
    /// let route = Route::empty();
    /// assert!(route.is_empty());
    /// assert_eq!(route.total_distance(), 0.0);
    /// ```
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(Vec::new(), 0.0, Vec::new())
    }

    /// Visited nodes in order, starting at the depot.
    #[must_use]
    pub fn stops(&self) -> &[NodeId] {
        &self.stops
    }

    /// Sum of the shortest-path distance of every leg.
    #[must_use]
    pub const fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Pending destinations left out because no path reaches them.
    #[must_use]
    pub fn unreachable(&self) -> &[NodeId] {
        &self.unreachable
    }

    /// First stop of the route.
    #[must_use]
    pub fn depot(&self) -> Option<&NodeId> {
        self.stops.first()
    }

    /// Whether the route has no stops at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Whether some pending destinations could not be reached.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.unreachable.is_empty()
    }

    /// Display labels of the stops, falling back to the identifier for nodes
    /// the graph does not know.
    #[must_use]
    pub fn labels<'a>(&'a self, graph: &'a WeightedGraph) -> Vec<&'a str> {
        self.stops
            .iter()
            .map(|stop| graph.label(stop).unwrap_or(stop.as_str()))
            .collect()
    }
}
