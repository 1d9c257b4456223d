//! Test helpers for writing CLI input files into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Temporary directory exposed as a UTF-8 path.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write test input");
}

/// `HUB` joined to `EDGE` by a two-way street of length 4, plus an
/// unconnected `ISLAND`.
pub(super) const SMALL_TOPOLOGY: &str = r#"{
    "depot": "HUB",
    "nodes": [
        { "id": "HUB", "label": "Hub" },
        { "id": "EDGE", "label": "Edge street" },
        { "id": "ISLAND", "label": "Island" }
    ],
    "edges": [
        { "from": "HUB", "to": "EDGE", "weight": 4.0 }
    ],
    "districts": [
        { "name": "Town", "streets": [{ "name": "Edge", "node": "EDGE" }] }
    ]
}"#;
