//! Refresh: rebuild the snapshot from the metadata source.

use std::path::PathBuf;

use anyhow::Result;
use log::info;

use crate::graph::{build, save_snapshot, to_json};
use crate::provider::MetadataSource;
use crate::runtime::Runtime;

use super::paths::resolve_snapshot_path;

/// Query the metadata source and write a fresh snapshot.
///
/// The source is queried before anything touches the file system, and the
/// write itself is atomic, so a failed refresh leaves an existing snapshot
/// exactly as it was.
#[tracing::instrument(skip(runtime, source, snapshot))]
pub async fn refresh<R: Runtime, S: MetadataSource>(
    runtime: &R,
    source: &S,
    snapshot: Option<PathBuf>,
) -> Result<()> {
    let path = resolve_snapshot_path(runtime, snapshot)?;

    println!("   querying installed packages...");
    let records = source.installed_packages().await?;
    info!("metadata source returned {} record(s)", records.len());

    let graph = build(records);
    let json = to_json(&graph)?;
    save_snapshot(runtime, &path, &json)?;

    println!("    snapshot {} ({} packages)", path.display(), graph.len());
    Ok(())
}
