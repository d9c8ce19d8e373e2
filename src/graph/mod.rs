//! Dependency graph domain model.
//!
//! A graph is built once per refresh from installed-package records and is
//! immutable afterwards; analysis only ever reads it. The forward edges
//! (each package's `dependencies` set) are the single source of truth; the
//! referrer index is derived from them in the constructor and is never
//! mutated independently.

mod analysis;
mod build;
mod snapshot;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub use analysis::{RemovalPlan, orphan_roots, removal_closure};
pub use build::build;
pub use snapshot::{from_json, load_graph, save_snapshot, to_json};

/// Normalize a distribution name the way pip compares them: ASCII
/// lowercase, with runs of `-`, `_` and `.` collapsed to a single `-`
/// (PEP 503). `Typing_Extensions` and `typing-extensions` are the same
/// package.
pub fn normalize_name(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut separator_pending = false;
    for c in raw.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            separator_pending = !normalized.is_empty();
        } else {
            if separator_pending {
                normalized.push('-');
                separator_pending = false;
            }
            normalized.push(c.to_ascii_lowercase());
        }
    }
    normalized
}

/// One installed package and its declared direct dependencies.
///
/// `version` is informational only; nothing compares version strings. The
/// `dependencies` set holds normalized names and may reference packages
/// that are not installed (see [`DependencyGraph::dangling_references`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub dependencies: BTreeSet<String>,
}

/// The full collection of installed packages plus the derived reverse
/// index. Read-only after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    packages: BTreeMap<String, Package>,
    referrers: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Build a graph from an already-normalized package map, deriving the
    /// referrer index as the transpose of the forward edges.
    pub fn new(packages: BTreeMap<String, Package>) -> Self {
        let mut referrers: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (name, package) in &packages {
            for dependency in &package.dependencies {
                referrers
                    .entry(dependency.clone())
                    .or_default()
                    .insert(name.clone());
            }
        }
        DependencyGraph {
            packages,
            referrers,
        }
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(&normalize_name(name))
    }

    /// Look up a package; the query name is normalized first.
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.get(&normalize_name(name))
    }

    /// Iterate packages in name order.
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// Names of the packages that directly declare `name` as a dependency.
    ///
    /// An unknown name has no referrers; that is indistinguishable from
    /// "installed but required by nothing" and is not an error.
    pub fn referrers_of(&self, name: &str) -> BTreeSet<String> {
        self.referrers
            .get(&normalize_name(name))
            .cloned()
            .unwrap_or_default()
    }

    /// Dependency names declared by some package but not installed
    /// themselves. The metadata source is authoritative and may be
    /// incomplete, so these are tolerated rather than rejected.
    pub fn dangling_references(&self) -> BTreeSet<String> {
        self.referrers
            .keys()
            .filter(|name| !self.packages.contains_key(*name))
            .cloned()
            .collect()
    }
}

/// Errors surfaced by snapshot decoding, graph queries and the installed
/// package metadata source.
#[derive(Debug)]
pub enum GraphError {
    /// Persisted snapshot does not parse into the expected shape.
    MalformedSnapshot(String),
    /// A query target that is not present in the loaded graph.
    UnknownPackage(String),
    /// The installed-package metadata source could not be queried.
    SourceUnavailable(String),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::MalformedSnapshot(detail) => {
                write!(
                    f,
                    "Snapshot is malformed: {}. Run `pipdeps refresh` to rebuild it.",
                    detail
                )
            }
            GraphError::UnknownPackage(name) => {
                write!(
                    f,
                    "Package `{}` is not in the snapshot. Make sure the snapshot is up to date.",
                    name
                )
            }
            GraphError::SourceUnavailable(detail) => {
                write!(f, "Could not query installed packages: {}", detail)
            }
        }
    }
}

impl std::error::Error for GraphError {}
