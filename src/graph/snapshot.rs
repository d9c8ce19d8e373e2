//! Snapshot codec and the persistence boundary.
//!
//! The snapshot is a human-readable JSON object keyed by package name:
//!
//! ```json
//! {
//!   "requests": {
//!     "version": "2.31.0",
//!     "dependencies": ["certifi", "idna", "urllib3"]
//!   }
//! }
//! ```
//!
//! Keys and dependency lists are name-sorted, so re-serializing an
//! unchanged graph is byte-identical and snapshots diff cleanly.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::runtime::Runtime;

use super::{DependencyGraph, GraphError, Package, normalize_name};

/// Value under each package-name key. Extra fields are tolerated on load;
/// the two required ones must be present and well-typed.
#[derive(Serialize, Deserialize, Debug)]
struct SnapshotEntry {
    version: String,
    dependencies: Vec<String>,
}

/// Serialize a graph to snapshot JSON. Lossless and deterministic.
pub fn to_json(graph: &DependencyGraph) -> Result<String> {
    let entries: BTreeMap<&str, SnapshotEntry> = graph
        .packages()
        .map(|package| {
            (
                package.name.as_str(),
                SnapshotEntry {
                    version: package.version.clone(),
                    dependencies: package.dependencies.iter().cloned().collect(),
                },
            )
        })
        .collect();
    let mut json = serde_json::to_string_pretty(&entries)?;
    json.push('\n');
    Ok(json)
}

/// Decode snapshot JSON into a graph.
///
/// Fails with [`GraphError::MalformedSnapshot`] when the structure does
/// not match: unparseable JSON, a missing or mistyped field, or two keys
/// that collide after normalization. Duplicates inside one dependency
/// list are semantically a set and collapse silently.
pub fn from_json(content: &str) -> Result<DependencyGraph, GraphError> {
    let entries: BTreeMap<String, SnapshotEntry> =
        serde_json::from_str(content).map_err(|e| GraphError::MalformedSnapshot(e.to_string()))?;

    let mut packages = BTreeMap::new();
    for (raw_name, entry) in entries {
        let name = normalize_name(&raw_name);
        let package = Package {
            name: name.clone(),
            version: entry.version,
            dependencies: entry
                .dependencies
                .iter()
                .map(|dep| normalize_name(dep))
                .filter(|dep| !dep.is_empty())
                .collect(),
        };
        if packages.insert(name, package).is_some() {
            return Err(GraphError::MalformedSnapshot(format!(
                "duplicate package entry `{}`",
                raw_name
            )));
        }
    }
    Ok(DependencyGraph::new(packages))
}

/// Load a graph from the snapshot at `path`.
#[tracing::instrument(skip(runtime, path))]
pub fn load_graph<R: Runtime>(runtime: &R, path: &Path) -> Result<DependencyGraph> {
    if !runtime.exists(path) {
        anyhow::bail!(
            "No snapshot found at {:?}. Run `pipdeps refresh` first.",
            path
        );
    }
    let content = runtime.read_to_string(path)?;
    let graph = from_json(&content)?;
    Ok(graph)
}

/// Write snapshot JSON to `path` atomically: the content goes to a
/// temporary sibling first and is renamed into place, so a failed write
/// never truncates an existing snapshot.
#[tracing::instrument(skip(runtime, json))]
pub fn save_snapshot<R: Runtime>(runtime: &R, path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !runtime.exists(parent)
    {
        runtime.create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    runtime.write(&tmp_path, json.as_bytes())?;
    runtime.rename(&tmp_path, path)?;
    Ok(())
}
