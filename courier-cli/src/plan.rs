//! Plan command implementation for the courier CLI.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use courier_core::{
    Clock, DeliveryRecord, DispatchError, DispatchService, NodeId, Route, SequenceNumber,
    Submission,
};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::input::{load_topology, open_utf8_file};
use crate::{
    ARG_DELIVER, ARG_DELIVERIES, ARG_DEPOT, ARG_TOPOLOGY, CliError, ENV_DELIVERIES, write_json,
};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Submit every delivery in a JSON file to the dispatch \
                 service in file order, hand out the oldest deliveries and \
                 print the routes planned along the way. Each delivery names \
                 a customer and either a destination node or a district and \
                 street.",
    about = "Plan the route for a batch of deliveries"
)]
#[ortho_config(prefix = "COURIER")]
pub(crate) struct PlanArgs {
    /// Path to a JSON file containing a list of deliveries.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) deliveries_path: Option<Utf8PathBuf>,
    /// Path to a JSON topology file; the sample city is used when absent.
    #[arg(long = ARG_TOPOLOGY, value_name = "path")]
    #[serde(default)]
    pub(crate) topology: Option<Utf8PathBuf>,
    /// Override the depot named by the topology.
    #[arg(long = ARG_DEPOT, value_name = "node")]
    #[serde(default)]
    pub(crate) depot: Option<String>,
    /// Number of deliveries to hand out after submitting the batch.
    #[arg(long = ARG_DELIVER, value_name = "count")]
    #[serde(default)]
    pub(crate) deliver: Option<usize>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanConfig {
    /// Path to the deliveries file.
    pub(crate) deliveries_path: Utf8PathBuf,
    /// Optional topology file.
    pub(crate) topology: Option<Utf8PathBuf>,
    /// Depot override.
    pub(crate) depot: Option<NodeId>,
    /// Deliveries to hand out; zero keeps everything pending.
    pub(crate) deliver: usize,
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let deliveries_path = args.deliveries_path.ok_or(CliError::MissingArgument {
            field: ARG_DELIVERIES,
            env: ENV_DELIVERIES,
        })?;
        Ok(Self {
            deliveries_path,
            topology: args.topology,
            depot: args.depot.map(NodeId::from),
            deliver: args.deliver.unwrap_or_default(),
        })
    }
}

/// One entry of the deliveries file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum DeliveryRequest {
    /// Delivery addressed to a graph node.
    Node {
        customer: String,
        destination: NodeId,
    },
    /// Delivery addressed by district and street.
    Address {
        customer: String,
        district: String,
        street: String,
    },
}

impl DeliveryRequest {
    fn customer(&self) -> &str {
        match self {
            Self::Node { customer, .. } | Self::Address { customer, .. } => customer,
        }
    }

    fn submit<C: Clock>(
        &self,
        service: &mut DispatchService<C>,
    ) -> Result<Submission, DispatchError> {
        match self {
            Self::Node {
                customer,
                destination,
            } => service.submit_delivery(customer.as_str(), destination),
            Self::Address {
                customer,
                district,
                street,
            } => service.submit_to_address(customer.as_str(), district, street),
        }
    }
}

/// Outcome of a single submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SubmissionReport {
    pub(crate) sequence: SequenceNumber,
    pub(crate) customer: String,
    pub(crate) route: Route,
}

/// Final route with display labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RouteReport {
    pub(crate) stops: Vec<NodeId>,
    pub(crate) labels: Vec<String>,
    pub(crate) total_distance: f64,
    pub(crate) unreachable: Vec<NodeId>,
}

/// JSON document printed by `courier plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PlanReport {
    pub(crate) depot: NodeId,
    pub(crate) submissions: Vec<SubmissionReport>,
    pub(crate) delivered: Vec<DeliveryRecord>,
    pub(crate) pending: Vec<DeliveryRecord>,
    pub(crate) route: RouteReport,
}

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_plan_with(args, &mut stdout)
}

pub(crate) fn run_plan_with(args: PlanArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_plan(&config)?;
    write_json(writer, &report)
}

pub(crate) fn execute_plan(config: &PlanConfig) -> Result<PlanReport, CliError> {
    let mut topology = load_topology(config.topology.as_deref())?;
    if let Some(depot) = &config.depot {
        topology.depot = depot.clone();
    }
    let mut service = DispatchService::from_topology(&topology)?;
    let requests = load_deliveries(&config.deliveries_path)?;
    info!(
        "planning {} deliveries from {}",
        requests.len(),
        service.depot()
    );

    let mut submissions = Vec::with_capacity(requests.len());
    for (position, request) in requests.iter().enumerate() {
        let submission = request
            .submit(&mut service)
            .map_err(|source| CliError::Dispatch {
                index: position + 1,
                customer: request.customer().to_owned(),
                source: Box::new(source),
            })?;
        submissions.push(SubmissionReport {
            sequence: submission.sequence,
            customer: request.customer().to_owned(),
            route: submission.route,
        });
    }

    let delivered: Vec<DeliveryRecord> = std::iter::from_fn(|| service.deliver_next())
        .take(config.deliver)
        .collect();
    let route = service
        .plan_route()
        .map_err(|source| CliError::Plan(Box::new(source)))?;

    Ok(PlanReport {
        depot: service.depot().clone(),
        submissions,
        delivered,
        pending: service.list_pending().into_iter().cloned().collect(),
        route: RouteReport {
            labels: route
                .labels(service.graph())
                .into_iter()
                .map(str::to_owned)
                .collect(),
            stops: route.stops().to_vec(),
            total_distance: route.total_distance(),
            unreachable: route.unreachable().to_vec(),
        },
    })
}

/// Loads the JSON-encoded list of deliveries from disk.
pub(crate) fn load_deliveries(path: &Utf8Path) -> Result<Vec<DeliveryRequest>, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
        field: ARG_DELIVERIES,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseDeliveries {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
