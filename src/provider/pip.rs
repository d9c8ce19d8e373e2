//! pip-backed metadata source.
//!
//! `pip list --format=json` enumerates the installed distributions and a
//! `pip show` per distribution yields its `Requires:` line. The show
//! queries fan out with bounded concurrency: a large environment means
//! hundreds of short-lived pip processes, and running them one by one is
//! what made this workflow slow.

use anyhow::Result;
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use log::{debug, warn};
use serde::Deserialize;
use tokio::process::Command;

use crate::graph::GraphError;

use super::{MetadataSource, PackageRecord};

/// How many `pip show` processes may run at once.
const SHOW_CONCURRENCY: usize = 8;

/// Metadata source backed by a pip executable.
pub struct PipSource {
    program: String,
}

/// One element of `pip list --format=json` output.
#[derive(Deserialize, Debug)]
struct ListedPackage {
    name: String,
    version: String,
}

impl PipSource {
    /// `program` is the pip executable to drive. The default is a bare
    /// `pip` so the one on PATH wins, which is what makes the same binary
    /// usable across virtualenvs.
    pub fn new(program: impl Into<String>) -> Self {
        PipSource {
            program: program.into(),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list_installed(&self) -> Result<Vec<ListedPackage>> {
        let output = Command::new(&self.program)
            .args(["list", "--format=json", "--disable-pip-version-check"])
            .output()
            .await
            .map_err(|e| {
                GraphError::SourceUnavailable(format!(
                    "failed to run `{} list`: {}",
                    self.program, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GraphError::SourceUnavailable(format!(
                "`{} list` exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            ))
            .into());
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            GraphError::SourceUnavailable(format!(
                "unexpected `{} list` output: {}",
                self.program, e
            ))
            .into()
        })
    }

    #[tracing::instrument(skip(self, listed))]
    async fn query_record(&self, listed: ListedPackage) -> Result<PackageRecord> {
        let output = Command::new(&self.program)
            .args(["show", &listed.name])
            .output()
            .await
            .map_err(|e| {
                GraphError::SourceUnavailable(format!(
                    "failed to run `{} show`: {}",
                    self.program, e
                ))
            })?;

        let declared_dependencies = if output.status.success() {
            parse_requires(&String::from_utf8_lossy(&output.stdout))
        } else {
            // The listing is authoritative for what exists; a failed show
            // for one package degrades to "no declared dependencies".
            warn!(
                "`{} show {}` exited with {}, recording no dependencies",
                self.program, listed.name, output.status
            );
            Vec::new()
        };
        debug!(
            "{} {} requires {:?}",
            listed.name, listed.version, declared_dependencies
        );

        Ok(PackageRecord {
            name: listed.name,
            version: listed.version,
            declared_dependencies,
        })
    }
}

#[async_trait]
impl MetadataSource for PipSource {
    #[tracing::instrument(skip(self))]
    async fn installed_packages(&self) -> Result<Vec<PackageRecord>> {
        let listed = self.list_installed().await?;
        debug!("pip reports {} installed package(s)", listed.len());

        stream::iter(listed)
            .map(|package| self.query_record(package))
            .buffer_unordered(SHOW_CONCURRENCY)
            .try_collect()
            .await
    }
}

/// Extract the dependency names from a `pip show` output block.
fn parse_requires(output: &str) -> Vec<String> {
    for line in output.lines() {
        if let Some(rest) = line.strip_prefix("Requires:") {
            return rest
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
        }
    }
    Vec::new()
}
