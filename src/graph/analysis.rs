//! Read-only queries over a loaded dependency graph.
//!
//! Every function here is a pure function of the graph and its arguments:
//! no internal state, no mutation, no I/O. Removal is computed, never
//! applied.

use std::collections::BTreeSet;

use super::{DependencyGraph, GraphError, normalize_name};

/// Packages with zero referrers: whatever the user (or some collaborator)
/// installed directly rather than as a dependency of something else.
pub fn orphan_roots(graph: &DependencyGraph) -> BTreeSet<String> {
    graph
        .packages()
        .filter(|package| graph.referrers_of(&package.name).is_empty())
        .map(|package| package.name.clone())
        .collect()
}

/// The outcome of planning a removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalPlan {
    /// Normalized name of the package the caller wants to remove.
    pub target: String,
    /// Everything safe to remove together, the target included. Empty when
    /// the target itself is still needed by something.
    pub removable: BTreeSet<String>,
    /// Referrers of the target outside the removable set: the packages
    /// that keep it installed.
    pub blockers: BTreeSet<String>,
}

impl RemovalPlan {
    pub fn target_in_use(&self) -> bool {
        !self.blockers.is_empty()
    }
}

/// Compute the set of packages that can be removed together with `target`
/// without breaking anything outside the set.
///
/// Starts from the packages reachable from `target` along forward edges
/// and iterates to a fixed point, dropping any member that some package
/// outside the current set still refers to. The result does not depend on
/// drop order: membership is decided by the external-referrer condition,
/// not by traversal order, which also makes cycles unremarkable.
pub fn removal_closure(graph: &DependencyGraph, target: &str) -> Result<RemovalPlan, GraphError> {
    let target = normalize_name(target);
    if !graph.contains(&target) {
        return Err(GraphError::UnknownPackage(target));
    }

    // Candidate set: the target plus everything reachable from it.
    // Reachability stops at dangling names; they are not installed, so
    // there is nothing to remove there.
    let mut candidates: BTreeSet<String> = BTreeSet::new();
    let mut pending = vec![target.clone()];
    while let Some(name) = pending.pop() {
        let Some(package) = graph.package(&name) else {
            continue;
        };
        if !candidates.insert(name) {
            continue;
        }
        pending.extend(package.dependencies.iter().cloned());
    }

    let mut removable = candidates;
    loop {
        let dropped: Vec<String> = removable
            .iter()
            .filter(|name| {
                graph
                    .referrers_of(name)
                    .iter()
                    .any(|referrer| !removable.contains(referrer))
            })
            .cloned()
            .collect();
        if dropped.is_empty() {
            break;
        }
        for name in dropped {
            removable.remove(&name);
        }
    }

    // Every candidate is reachable from the target, so once the target is
    // dropped no other member can keep all of its referrers in the set.
    if !removable.contains(&target) {
        debug_assert!(removable.is_empty());
        removable.clear();
    }

    let blockers = graph
        .referrers_of(&target)
        .into_iter()
        .filter(|referrer| !removable.contains(referrer))
        .collect();

    Ok(RemovalPlan {
        target,
        removable,
        blockers,
    })
}
