//! Deterministic clocks and small topologies used by unit, behaviour and
//! property tests and by the benchmarks.

use chrono::{DateTime, Utc};

use crate::{Clock, EdgeSpec, GraphError, NodeId, NodeSpec, Topology, WeightedGraph};

/// [`Clock`] that always reports the same instant.
///
/// The default instant is the Unix epoch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// `Depot`, `X` and `Y` with `Depot–X = 1`, `Depot–Y = 1` and `X–Y = 10`,
/// all two-way, served from `Depot`.
#[must_use]
pub fn diamond_topology() -> Topology {
    let node = |id: &str| NodeSpec {
        id: NodeId::from(id),
        label: id.to_owned(),
    };
    let edge = |from: &str, to: &str, weight: f64| EdgeSpec {
        from: NodeId::from(from),
        to: NodeId::from(to),
        weight,
        bidirectional: true,
    };
    Topology {
        depot: NodeId::from("Depot"),
        nodes: vec![node("Depot"), node("X"), node("Y")],
        edges: vec![
            edge("Depot", "X", 1.0),
            edge("Depot", "Y", 1.0),
            edge("X", "Y", 10.0),
        ],
        districts: Vec::new(),
    }
}

/// Identifier of the grid node at `column`, `row`.
#[must_use]
pub fn grid_node(column: usize, row: usize) -> NodeId {
    NodeId::new(format!("r{row}c{column}"))
}

/// A `columns` by `rows` grid of two-way streets.
///
/// Each node links to its right and lower neighbour; `weight` is called once
/// per street in row-major order.
///
/// # Errors
///
/// Returns [`GraphError::InvalidWeight`] when `weight` yields a negative or
/// non-finite value.
pub fn grid_graph(
    columns: usize,
    rows: usize,
    mut weight: impl FnMut() -> f64,
) -> Result<WeightedGraph, GraphError> {
    let mut graph = WeightedGraph::new();
    for row in 0..rows {
        for column in 0..columns {
            let id = grid_node(column, row);
            let label = format!("Row {row}, column {column}");
            graph.add_node(id, label);
        }
    }
    for row in 0..rows {
        for column in 0..columns {
            let here = grid_node(column, row);
            if column + 1 < columns {
                graph.add_edge(&here, &grid_node(column + 1, row), weight(), true)?;
            }
            if row + 1 < rows {
                graph.add_edge(&here, &grid_node(column, row + 1), weight(), true)?;
            }
        }
    }
    Ok(graph)
}
