//! Describe command implementation for the courier CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use courier_core::{Clock, DispatchService, Edge, Node, NodeId};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::input::load_topology;
use crate::{ARG_TOPOLOGY, CliError, write_json};

/// CLI arguments for the `describe` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Print the depot, every node with its label, every directed \
                 edge and the district directory of a topology as JSON. The \
                 built-in sample city is used when no topology file is given.",
    about = "Describe the road network"
)]
#[ortho_config(prefix = "COURIER")]
pub(crate) struct DescribeArgs {
    /// Path to a JSON topology file.
    #[arg(long = ARG_TOPOLOGY, value_name = "path")]
    #[serde(default)]
    pub(crate) topology: Option<Utf8PathBuf>,
}

/// District entry of the describe output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct DistrictReport {
    pub(crate) name: String,
    pub(crate) streets: Vec<String>,
}

/// JSON document printed by `courier describe`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct DescribeReport {
    pub(crate) depot: NodeId,
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) districts: Vec<DistrictReport>,
}

pub(crate) fn run_describe(args: DescribeArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_describe_with(args, &mut stdout)
}

pub(crate) fn run_describe_with(args: DescribeArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let topology = load_topology(merged.topology.as_deref())?;
    let service = DispatchService::from_topology(&topology)?;
    write_json(writer, &describe(&service))
}

fn describe<C: Clock>(service: &DispatchService<C>) -> DescribeReport {
    let description = service.describe_graph();
    let districts = service
        .districts()
        .map(|name| DistrictReport {
            name: name.to_owned(),
            streets: service.streets(name).into_iter().map(str::to_owned).collect(),
        })
        .collect();
    DescribeReport {
        depot: service.depot().clone(),
        nodes: description.nodes,
        edges: description.edges,
        districts,
    }
}
