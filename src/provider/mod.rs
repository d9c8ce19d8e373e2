//! Installed-package metadata source abstraction.
//!
//! The source is an external collaborator: it reports what is installed
//! and what each package declares it requires. Everything downstream
//! reasons only over the flat records it returns, never over version
//! constraints.

mod pip;

use anyhow::Result;
use async_trait::async_trait;

pub use pip::PipSource;

/// One installed package as reported by the metadata source.
///
/// Names and dependency names are raw here; the graph builder normalizes
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    pub declared_dependencies: Vec<String>,
}

/// Source of installed-package metadata.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Return the full set of currently installed packages with their
    /// declared direct dependencies.
    async fn installed_packages(&self) -> Result<Vec<PackageRecord>>;
}
