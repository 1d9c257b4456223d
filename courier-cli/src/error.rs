//! Error types emitted by the courier CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use courier_core::{DispatchError, TopologyError};
use thiserror::Error;

/// Errors emitted by the courier CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable name.
        env: &'static str,
    },
    /// An input file could not be opened.
    #[error("failed to open {field} file at {path:?}: {source}")]
    OpenInput {
        /// Flag the path came from.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The deliveries file is not valid JSON.
    #[error("failed to parse deliveries JSON at {path:?}: {source}")]
    ParseDeliveries {
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// The topology file could not be decoded or built.
    #[error("invalid topology: {0}")]
    Topology(#[from] Box<TopologyError>),
    /// The dispatch service rejected a delivery.
    #[error("delivery {index} for {customer} was rejected: {source}")]
    Dispatch {
        /// Position of the delivery in the input file, starting at one.
        index: usize,
        /// Customer named by the delivery.
        customer: String,
        /// Underlying dispatch failure.
        #[source]
        source: Box<DispatchError>,
    },
    /// Planning the final route failed.
    #[error("failed to plan route: {0}")]
    Plan(#[source] Box<DispatchError>),
    /// Serializing the report failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing to the output stream failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl From<TopologyError> for CliError {
    fn from(source: TopologyError) -> Self {
        Self::Topology(Box::new(source))
    }
}
