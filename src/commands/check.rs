//! Check: report packages that nothing else depends on.

use std::path::PathBuf;

use anyhow::Result;
use log::debug;

use crate::graph::{load_graph, orphan_roots};
use crate::runtime::Runtime;

use super::BASE_PACKAGES;
use super::paths::resolve_snapshot_path;

/// Print the packages that are not a dependency of anything else: the
/// ones somebody must have asked for directly.
#[tracing::instrument(skip(runtime, snapshot))]
pub fn check<R: Runtime>(runtime: &R, snapshot: Option<PathBuf>) -> Result<()> {
    let path = resolve_snapshot_path(runtime, snapshot)?;
    let graph = load_graph(runtime, &path)?;
    debug!("loaded {} package(s) from {:?}", graph.len(), path);

    let mut roots = orphan_roots(&graph);
    roots.retain(|name| !BASE_PACKAGES.contains(&name.as_str()));

    if roots.is_empty() {
        println!("Every installed package is required by another package.");
        return Ok(());
    }

    println!("Packages not required by anything else:");
    for name in &roots {
        if let Some(package) = graph.package(name) {
            println!("  {} {}", package.name, package.version);
        }
    }
    Ok(())
}
