//! Plan-delete: compute what else could go if a package were removed.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use log::debug;

use crate::graph::{load_graph, removal_closure};
use crate::runtime::Runtime;

use super::BASE_PACKAGES;
use super::paths::resolve_snapshot_path;

/// Report whether `package` can be removed and which of its dependencies
/// would become removable with it. This only plans; nothing is
/// uninstalled.
#[tracing::instrument(skip(runtime, snapshot))]
pub fn plan_delete<R: Runtime>(runtime: &R, package: &str, snapshot: Option<PathBuf>) -> Result<()> {
    let path = resolve_snapshot_path(runtime, snapshot)?;
    let graph = load_graph(runtime, &path)?;
    let plan = removal_closure(&graph, package)?;
    debug!("removal plan for {}: {:?}", plan.target, plan);

    if let Some(target) = graph.package(&plan.target) {
        if target.dependencies.is_empty() {
            println!("`{}` has no dependencies.", target.name);
        } else {
            println!(
                "Dependencies of `{}`: {}",
                target.name,
                join(&target.dependencies)
            );
        }
    }

    if plan.target_in_use() {
        println!("`{}` is required by: {}", plan.target, join(&plan.blockers));
        println!("Removing it would break those packages.");
        return Ok(());
    }

    println!("No package requires `{}`; it is safe to remove.", plan.target);

    let extra: BTreeSet<String> = plan
        .removable
        .iter()
        .filter(|name| *name != &plan.target && !BASE_PACKAGES.contains(&name.as_str()))
        .cloned()
        .collect();
    if extra.is_empty() {
        println!("No other packages become removable.");
    } else {
        println!("Also removable with it: {}", join(&extra));
    }
    Ok(())
}

fn join(names: &BTreeSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
