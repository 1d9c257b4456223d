//! Dispatch service: the request surface over graph, queue and planner.
//!
//! The service owns the road graph, the pending queue, the route planner and
//! the sequence counter. Every request runs to completion before returning.
//! Submitting a delivery re-plans the whole route so callers always see the
//! route implied by the current pending set.

use log::info;
use thiserror::Error;

use crate::{
    AddressBook, AddressError, Clock, DeliveryRecord, GraphDescription, GraphError, NodeId,
    OrderedQueue, QueueError, Route, RoutePlanner, SequenceNumber, StreetAddress, SystemClock,
    Topology, TopologyError, WeightedGraph,
};

/// Errors returned by [`DispatchService`] requests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// The destination is not a node of the road graph.
    #[error(
        "destination {destination} is not in the topology; valid destinations: {}",
        .known.iter().map(NodeId::as_str).collect::<Vec<_>>().join(", ")
    )]
    UnknownDestination {
        /// Destination as supplied by the caller.
        destination: NodeId,
        /// Every node of the graph, in registration order.
        known: Vec<NodeId>,
    },
    /// A district and street could not be resolved.
    #[error(transparent)]
    Address(#[from] AddressError),
    /// The graph rejected a query.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// The pending queue rejected an insertion.
    #[error(transparent)]
    Queue(#[from] QueueError),
    /// Every sequence number has been handed out.
    #[error("no sequence numbers left to assign")]
    SequenceExhausted,
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Sequence number assigned to the new delivery.
    pub sequence: SequenceNumber,
    /// Route re-planned over every pending delivery, the new one included.
    pub route: Route,
}

/// Accepts deliveries, hands them out in arrival order and plans routes.
///
/// # Examples
/// ```
/// use courier_core::{DispatchService, NodeId, WeightedGraph};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut graph = WeightedGraph::new();
/// graph.add_node("DEPOT", "Depot");
/// graph.add_node("A", "Alpha");
/// graph.add_edge(&"DEPOT".into(), &"A".into(), 3.0, true)?;
///
/// let mut service = DispatchService::new(graph, NodeId::from("DEPOT"))?;
/// service.submit_delivery("Ana", &NodeId::from("A"))?;
/// assert_eq!(service.list_pending().len(), 1);
///
/// let delivered = service.deliver_next().expect("one pending delivery");
/// assert_eq!(delivered.customer, "Ana");
/// assert!(service.deliver_next().is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DispatchService<C = SystemClock> {
    graph: WeightedGraph,
    pending: OrderedQueue<DeliveryRecord>,
    planner: RoutePlanner,
    addresses: AddressBook,
    next_sequence: Option<SequenceNumber>,
    clock: C,
}

impl DispatchService<SystemClock> {
    /// Serve `graph` from `depot`, stamping records with the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Graph`] when `depot` is not a node of `graph`.
    pub fn new(graph: WeightedGraph, depot: NodeId) -> Result<Self, DispatchError> {
        graph.index_of(&depot)?;
        Ok(Self::assemble(graph, depot, AddressBook::new(), SystemClock))
    }

    /// Build the graph and address book described by `topology`.
    ///
    /// # Errors
    ///
    /// Propagates any [`TopologyError`] raised while building the graph or
    /// the address book.
    pub fn from_topology(topology: &Topology) -> Result<Self, TopologyError> {
        let graph = topology.build_graph()?;
        let addresses = topology.address_book(&graph)?;
        Ok(Self::assemble(
            graph,
            topology.depot.clone(),
            addresses,
            SystemClock,
        ))
    }
}

impl<C: Clock> DispatchService<C> {
    fn assemble(graph: WeightedGraph, depot: NodeId, addresses: AddressBook, clock: C) -> Self {
        Self {
            graph,
            pending: OrderedQueue::new(),
            planner: RoutePlanner::new(depot),
            addresses,
            next_sequence: Some(SequenceNumber::FIRST),
            clock,
        }
    }

    /// Replace the timestamp source.
    #[must_use]
    pub fn with_clock<D: Clock>(self, clock: D) -> DispatchService<D> {
        DispatchService {
            graph: self.graph,
            pending: self.pending,
            planner: self.planner,
            addresses: self.addresses,
            next_sequence: self.next_sequence,
            clock,
        }
    }

    /// Queue a delivery to `destination` and re-plan the route.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownDestination`] when `destination` is
    /// not a graph node; the pending queue is left unchanged.
    pub fn submit_delivery(
        &mut self,
        customer: impl Into<String>,
        destination: &NodeId,
    ) -> Result<Submission, DispatchError> {
        self.enqueue(customer.into(), destination.clone(), None)
    }

    /// Queue a delivery addressed by district and street.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Address`] when the district or street is not
    /// in the address book.
    pub fn submit_to_address(
        &mut self,
        customer: impl Into<String>,
        district: &str,
        street: &str,
    ) -> Result<Submission, DispatchError> {
        let destination = self.addresses.resolve(district, street)?.clone();
        let address = StreetAddress {
            district: district.trim().to_owned(),
            street: street.trim().to_owned(),
        };
        self.enqueue(customer.into(), destination, Some(address))
    }

    /// Remove and return the oldest pending delivery.
    pub fn deliver_next(&mut self) -> Option<DeliveryRecord> {
        let (sequence, record) = self.pending.pop_min()?;
        info!(
            "delivered #{sequence} for {} at {}",
            record.customer, record.destination
        );
        Some(record)
    }

    /// Plan a route over every pending destination without changing state.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Graph`] if the depot is missing from the
    /// graph, which construction rules out.
    pub fn plan_route(&self) -> Result<Route, DispatchError> {
        let destinations = self.pending.iter().map(|(_, record)| &record.destination);
        Ok(self.planner.plan(&self.graph, destinations)?)
    }

    /// Pending deliveries in arrival order.
    #[must_use]
    pub fn list_pending(&self) -> Vec<&DeliveryRecord> {
        self.pending.iter().map(|(_, record)| record).collect()
    }

    /// Nodes and directed edges of the road graph.
    #[must_use]
    pub fn describe_graph(&self) -> GraphDescription {
        self.graph.describe()
    }

    /// District names served by the address book.
    pub fn districts(&self) -> impl Iterator<Item = &str> + '_ {
        self.addresses.districts()
    }

    /// Street names of `district`; empty for unknown districts.
    #[must_use]
    pub fn streets(&self, district: &str) -> Vec<&str> {
        self.addresses.streets(district)
    }

    /// The road graph.
    #[must_use]
    pub const fn graph(&self) -> &WeightedGraph {
        &self.graph
    }

    /// Origin of every route.
    #[must_use]
    pub const fn depot(&self) -> &NodeId {
        self.planner.depot()
    }

    fn enqueue(
        &mut self,
        customer: String,
        destination: NodeId,
        address: Option<StreetAddress>,
    ) -> Result<Submission, DispatchError> {
        if !self.graph.contains(&destination) {
            return Err(DispatchError::UnknownDestination {
                destination,
                known: self.graph.node_ids().cloned().collect(),
            });
        }
        let sequence = self
            .next_sequence
            .ok_or(DispatchError::SequenceExhausted)?;
        let record = DeliveryRecord {
            sequence,
            customer,
            destination,
            address,
            created_at: self.clock.now(),
        };
        info!(
            "queued #{sequence} for {} at {}",
            record.customer, record.destination
        );
        self.pending.insert(sequence, record)?;
        self.next_sequence = sequence.checked_next();
        let route = self.plan_route()?;
        Ok(Submission { sequence, route })
    }
}
