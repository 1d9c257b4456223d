//! Core dispatch engine for the courier depot.
//!
//! The crate combines three pieces:
//!
//! - [`WeightedGraph`], an adjacency-list road graph with Dijkstra shortest
//!   paths;
//! - [`OrderedQueue`], an AVL tree holding pending deliveries keyed by their
//!   arrival [`SequenceNumber`];
//! - [`RoutePlanner`], a nearest-neighbour heuristic that recomputes shortest
//!   distances from the current position after every stop.
//!
//! [`DispatchService`] ties them together behind the request surface used by
//! callers: submit a delivery, deliver the oldest one, plan the route, list
//! what is pending and describe the graph.
//!
//! All operations are synchronous and run to completion. The service owns its
//! state exclusively; callers that share it across threads must wrap the whole
//! service in a single lock.
//!
//! # Examples
//! ```
//! use courier_core::{DispatchService, NodeId, Topology};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut service = DispatchService::from_topology(&Topology::sample_city())?;
//! let submission = service.submit_delivery("Ana", &NodeId::from("SM_NOVA"))?;
//! assert_eq!(submission.sequence.get(), 1);
//! assert_eq!(submission.route.total_distance(), 1.0);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod address;
pub mod clock;
pub mod delivery;
pub mod graph;
pub mod planner;
pub mod queue;
pub mod route;
pub mod service;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;
pub mod topology;

pub use address::{AddressBook, AddressError};
pub use clock::{Clock, SystemClock};
pub use delivery::{DeliveryRecord, SequenceNumber, StreetAddress};
pub use graph::{
    Edge, GraphDescription, GraphError, Node, NodeId, Path, ShortestPaths, WeightedGraph,
};
pub use planner::RoutePlanner;
pub use queue::{OrderedQueue, QueueError};
pub use route::Route;
pub use service::{DispatchError, DispatchService, Submission};
pub use topology::{DistrictSpec, EdgeSpec, NodeSpec, StreetSpec, Topology, TopologyError};
