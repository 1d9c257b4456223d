//! Command-line interface for the courier dispatch engine.
//!
//! `courier describe` prints the road graph of a topology and `courier plan`
//! replays a batch of deliveries through the dispatch service, printing the
//! routes it plans along the way. Both read the built-in sample city unless a
//! topology file is supplied.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod describe;
mod error;
mod input;
mod plan;

pub use error::CliError;

use describe::{DescribeArgs, run_describe};
use plan::{PlanArgs, run_plan};

pub(crate) const ARG_TOPOLOGY: &str = "topology";
pub(crate) const ARG_DEPOT: &str = "depot";
pub(crate) const ARG_DELIVER: &str = "deliver";
pub(crate) const ARG_DELIVERIES: &str = "deliveries";
pub(crate) const ENV_DELIVERIES: &str = "COURIER_CMDS_PLAN_DELIVERIES_PATH";

/// Run the courier CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] when argument parsing, configuration layering,
/// input loading, dispatching or writing the output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Describe(args) => run_describe(args),
        Command::Plan(args) => run_plan(args),
    }
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "courier",
    about = "Plan courier routes over a weighted road network",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the nodes and directed edges of the road network.
    Describe(DescribeArgs),
    /// Submit a batch of deliveries and print the planned routes.
    Plan(PlanArgs),
}

#[cfg(test)]
mod tests;
