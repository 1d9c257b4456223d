//! Facade crate for the courier dispatch engine.
//!
//! This crate re-exports the road graph, the pending-delivery queue, the route
//! planner and the dispatch service, with test fixtures behind the
//! `test-support` feature.

#![forbid(unsafe_code)]

pub use courier_core::{
    AddressBook, AddressError, Clock, DeliveryRecord, DispatchError, DispatchService,
    DistrictSpec, Edge, EdgeSpec, GraphDescription, GraphError, Node, NodeId, NodeSpec,
    OrderedQueue, Path, QueueError, Route, RoutePlanner, SequenceNumber, ShortestPaths,
    StreetAddress, StreetSpec, Submission, SystemClock, Topology, TopologyError, WeightedGraph,
};

#[cfg(feature = "test-support")]
pub use courier_core::test_support;
