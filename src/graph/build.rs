//! Graph construction from installed-package records.

use std::collections::BTreeMap;

use log::debug;

use crate::provider::PackageRecord;

use super::{DependencyGraph, Package, normalize_name};

/// Build a dependency graph from the records the metadata source returned.
///
/// The source is trusted: if two records normalize to the same name the
/// later one silently wins. Dependency lists are normalized and collapse
/// into sets; references to packages that are not installed stay in the
/// edge set as dangling references.
#[tracing::instrument(skip(records))]
pub fn build(records: Vec<PackageRecord>) -> DependencyGraph {
    let mut packages = BTreeMap::new();
    for record in records {
        let name = normalize_name(&record.name);
        if name.is_empty() {
            debug!("skipping record with empty name (version {})", record.version);
            continue;
        }
        let dependencies = record
            .declared_dependencies
            .iter()
            .map(|dep| normalize_name(dep))
            .filter(|dep| !dep.is_empty())
            .collect();
        let package = Package {
            name: name.clone(),
            version: record.version,
            dependencies,
        };
        if packages.insert(name.clone(), package).is_some() {
            debug!("duplicate record for {}, keeping the later one", name);
        }
    }

    let graph = DependencyGraph::new(packages);
    for name in graph.dangling_references() {
        debug!("dependency {} is not installed, kept as a dangling reference", name);
    }
    graph
}
