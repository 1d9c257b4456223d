//! Input file access built on `cap-std` and `camino`.

use std::io::{self, BufReader};

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use courier_core::Topology;
use log::debug;

use crate::{ARG_TOPOLOGY, CliError};

/// Open a UTF-8 file path using ambient authority.
pub(crate) fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Load the topology at `path`, or the built-in sample city when absent.
pub(crate) fn load_topology(path: Option<&Utf8Path>) -> Result<Topology, CliError> {
    let Some(topology_path) = path else {
        debug!("no topology file given; using the sample city");
        return Ok(Topology::sample_city());
    };
    let file = open_utf8_file(topology_path).map_err(|source| CliError::OpenInput {
        field: ARG_TOPOLOGY,
        path: topology_path.to_path_buf(),
        source,
    })?;
    Ok(Topology::from_json_reader(BufReader::new(file))?)
}
