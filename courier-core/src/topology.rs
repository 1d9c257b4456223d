//! Road topology feed.
//!
//! A [`Topology`] is the data the dispatch service is built from: node
//! registrations, edge registrations, the depot and an optional district and
//! street directory. It is applied once at start-up; nothing in it changes
//! afterwards.

use std::collections::HashSet;

use log::info;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AddressBook, GraphError, NodeId, WeightedGraph};

/// Errors raised while turning a [`Topology`] into a graph and directory.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// A node identifier was registered more than once.
    #[error("node {id} is declared more than once")]
    DuplicateNode {
        /// Repeated identifier.
        id: NodeId,
    },
    /// An edge was rejected by the graph.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// The depot does not name a declared node.
    #[error("depot {depot} is not a declared node")]
    UnknownDepot {
        /// Depot identifier.
        depot: NodeId,
    },
    /// A street points at a node that was never declared.
    #[error("street {street} in district {district} points at unknown node {node}")]
    UnknownStreetNode {
        /// District name.
        district: String,
        /// Street name.
        street: String,
        /// Missing node.
        node: NodeId,
    },
    /// The topology document could not be decoded.
    #[cfg(feature = "serde")]
    #[error("failed to parse topology JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Node registration record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeSpec {
    /// Node identifier.
    pub id: NodeId,
    /// Display label.
    pub label: String,
}

/// Edge registration record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeSpec {
    /// Edge tail.
    pub from: NodeId,
    /// Edge head.
    pub to: NodeId,
    /// Non-negative travel cost.
    pub weight: f64,
    /// Register the reverse direction too. Defaults to `true`.
    #[cfg_attr(feature = "serde", serde(default = "two_way"))]
    pub bidirectional: bool,
}

#[cfg(feature = "serde")]
const fn two_way() -> bool {
    true
}

/// Street entry of a district.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StreetSpec {
    /// Street name.
    pub name: String,
    /// Node the street maps to.
    pub node: NodeId,
}

/// District entry of the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistrictSpec {
    /// District name.
    pub name: String,
    /// Streets served in the district.
    pub streets: Vec<StreetSpec>,
}

/// Complete description of the road network served from one depot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Topology {
    /// Origin of every route.
    pub depot: NodeId,
    /// Node registrations, applied in order.
    pub nodes: Vec<NodeSpec>,
    /// Edge registrations, applied in order after the nodes.
    pub edges: Vec<EdgeSpec>,
    /// Optional district and street directory.
    #[cfg_attr(feature = "serde", serde(default))]
    pub districts: Vec<DistrictSpec>,
}

impl Topology {
    /// Decode a topology from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::Parse`] when the document is malformed.
    #[cfg(feature = "serde")]
    pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Self, TopologyError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Register every node and edge in a fresh graph.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DuplicateNode`] for repeated node ids,
    /// [`TopologyError::Graph`] for edges with unknown endpoints or invalid
    /// weights and [`TopologyError::UnknownDepot`] when the depot is missing.
    pub fn build_graph(&self) -> Result<WeightedGraph, TopologyError> {
        let mut graph = WeightedGraph::new();
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(&node.id) {
                return Err(TopologyError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
            graph.add_node(node.id.clone(), node.label.clone());
        }
        for edge in &self.edges {
            graph.add_edge(&edge.from, &edge.to, edge.weight, edge.bidirectional)?;
        }
        if !graph.contains(&self.depot) {
            return Err(TopologyError::UnknownDepot {
                depot: self.depot.clone(),
            });
        }
        info!(
            "loaded topology with {} nodes and {} directed edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Build the district and street directory, checking it against `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::UnknownStreetNode`] when a street maps to a
    /// node missing from `graph`.
    pub fn address_book(&self, graph: &WeightedGraph) -> Result<AddressBook, TopologyError> {
        let mut book = AddressBook::new();
        for district in &self.districts {
            for street in &district.streets {
                if !graph.contains(&street.node) {
                    return Err(TopologyError::UnknownStreetNode {
                        district: district.name.clone(),
                        street: street.name.clone(),
                        node: street.node.clone(),
                    });
                }
                book.add_street(&district.name, &street.name, street.node.clone());
            }
        }
        Ok(book)
    }

    /// The built-in city: five districts, eleven streets, served from the
    /// central street of the centre district.
    ///
    /// # Examples
    /// ```
    /// use courier_core::{NodeId, Topology};
    ///
    /// let city = Topology::sample_city();
    /// assert_eq!(city.depot, NodeId::from("CENTRO_CENTRAL"));
    /// assert_eq!(city.nodes.len(), 11);
    /// ```
    #[must_use]
    pub fn sample_city() -> Self {
        const NODES: [(&str, &str); 11] = [
            ("CENTRO_ESPERANCA", "Centro - Rua Esperança"),
            ("CENTRO_AGUAS", "Centro - Rua Águas"),
            ("CENTRO_CENTRAL", "Centro - Rua Central (Depósito)"),
            ("SM_NOVA", "SM - Rua Nova"),
            ("SM_VITORIA", "SM - Rua da Vitória"),
            ("SP_AZUL", "SP - Rua Azul"),
            ("SP_IPE", "SP - Rua Ipê"),
            ("SJ_FLORES", "SJ - Rua das Flores"),
            ("SJ_SOL", "SJ - Rua Sol"),
            ("SPD_PALMEIRAS", "SPD - Rua Palmeiras"),
            ("SPD_CEDRO", "SPD - Rua Cedro"),
        ];
        const EDGES: [(&str, &str, f64); 12] = [
            ("CENTRO_CENTRAL", "CENTRO_ESPERANCA", 1.0),
            ("CENTRO_CENTRAL", "CENTRO_AGUAS", 1.0),
            ("SM_NOVA", "SM_VITORIA", 10.0),
            ("SP_AZUL", "SP_IPE", 10.0),
            ("SJ_SOL", "SJ_FLORES", 6.0),
            ("SPD_PALMEIRAS", "SPD_CEDRO", 10.0),
            ("SM_NOVA", "SP_AZUL", 8.0),
            ("SJ_SOL", "SPD_PALMEIRAS", 1.0),
            ("CENTRO_CENTRAL", "SM_NOVA", 1.0),
            ("CENTRO_CENTRAL", "SP_AZUL", 1.0),
            ("CENTRO_CENTRAL", "SJ_SOL", 1.0),
            ("CENTRO_CENTRAL", "SPD_PALMEIRAS", 1.0),
        ];
        const DISTRICTS: [(&str, &[(&str, &str)]); 5] = [
            (
                "CENTRO",
                &[
                    ("Esperanca", "CENTRO_ESPERANCA"),
                    ("Aguas", "CENTRO_AGUAS"),
                    ("Central", "CENTRO_CENTRAL"),
                ],
            ),
            ("SM", &[("Nova", "SM_NOVA"), ("Vitoria", "SM_VITORIA")]),
            ("SP", &[("Azul", "SP_AZUL"), ("Ipe", "SP_IPE")]),
            ("SJ", &[("Flores", "SJ_FLORES"), ("Sol", "SJ_SOL")]),
            (
                "SPD",
                &[("Palmeiras", "SPD_PALMEIRAS"), ("Cedro", "SPD_CEDRO")],
            ),
        ];

        Self {
            depot: NodeId::from("CENTRO_CENTRAL"),
            nodes: NODES
                .iter()
                .map(|&(id, label)| NodeSpec {
                    id: NodeId::from(id),
                    label: label.to_owned(),
                })
                .collect(),
            edges: EDGES
                .iter()
                .map(|&(from, to, weight)| EdgeSpec {
                    from: NodeId::from(from),
                    to: NodeId::from(to),
                    weight,
                    bidirectional: true,
                })
                .collect(),
            districts: DISTRICTS
                .iter()
                .map(|&(name, streets)| DistrictSpec {
                    name: name.to_owned(),
                    streets: streets
                        .iter()
                        .map(|&(street, node)| StreetSpec {
                            name: street.to_owned(),
                            node: NodeId::from(node),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn sample_city_builds() {
        let city = Topology::sample_city();
        let graph = city.build_graph().expect("sample city is valid");
        assert_eq!(graph.node_count(), 11);
        assert_eq!(graph.edge_count(), 24);

        let book = city.address_book(&graph).expect("streets map to nodes");
        assert_eq!(
            book.districts().collect::<Vec<_>>(),
            vec!["CENTRO", "SM", "SP", "SJ", "SPD"]
        );
        assert_eq!(book.resolve("sj", "sol"), Ok(&NodeId::from("SJ_SOL")));
    }

    #[rstest]
    fn duplicate_nodes_are_rejected() {
        let mut city = Topology::sample_city();
        city.nodes.push(NodeSpec {
            id: NodeId::from("SM_NOVA"),
            label: "again".to_owned(),
        });
        let err = city.build_graph().expect_err("duplicate node");
        assert!(matches!(err, TopologyError::DuplicateNode { id } if id.as_str() == "SM_NOVA"));
    }

    #[rstest]
    fn missing_depot_is_rejected() {
        let mut city = Topology::sample_city();
        city.depot = NodeId::from("NOWHERE");
        let err = city.build_graph().expect_err("unknown depot");
        assert!(matches!(err, TopologyError::UnknownDepot { .. }));
    }

    #[rstest]
    fn dangling_street_is_rejected() {
        let mut city = Topology::sample_city();
        city.districts.push(DistrictSpec {
            name: "NEW".to_owned(),
            streets: vec![StreetSpec {
                name: "Ghost".to_owned(),
                node: NodeId::from("NEW_GHOST"),
            }],
        });
        let graph = city.build_graph().expect("graph is valid");
        let err = city.address_book(&graph).expect_err("dangling street");
        assert!(matches!(err, TopologyError::UnknownStreetNode { .. }));
    }

    #[rstest]
    fn negative_edge_weight_is_rejected() {
        let mut city = Topology::sample_city();
        city.edges.push(EdgeSpec {
            from: NodeId::from("SM_NOVA"),
            to: NodeId::from("SJ_SOL"),
            weight: -2.0,
            bidirectional: false,
        });
        let err = city.build_graph().expect_err("negative weight");
        assert!(matches!(
            err,
            TopologyError::Graph(GraphError::InvalidWeight { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn json_edges_default_to_two_way() {
        let json = r#"{
            "depot": "D",
            "nodes": [{ "id": "D", "label": "Depot" }, { "id": "A", "label": "A" }],
            "edges": [{ "from": "D", "to": "A", "weight": 2.5 }]
        }"#;
        let topology = Topology::from_json_reader(json.as_bytes()).expect("valid JSON");
        assert!(topology.districts.is_empty());
        let graph = topology.build_graph().expect("valid graph");
        assert_eq!(graph.edge_count(), 2);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn malformed_json_is_reported() {
        let err = Topology::from_json_reader(&b"{ nope"[..]).expect_err("malformed JSON");
        assert!(matches!(err, TopologyError::Parse(_)));
    }
}
