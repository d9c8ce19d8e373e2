//! File system operations (read, write, rename, directory).

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self, contents))]
    pub(crate) fn write_impl(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).context("Failed to write to file")?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).context("Failed to read file to string")
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn rename_impl(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).context("Failed to rename file")?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn create_dir_all_impl(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).context("Failed to create directory")?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn exists_impl(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_write_read_rename() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let renamed = dir.path().join("renamed.json");

        assert!(!runtime.exists(&path));
        runtime.write(&path, b"{}").unwrap();
        assert!(runtime.exists(&path));
        assert_eq!(runtime.read_to_string(&path).unwrap(), "{}");

        runtime.rename(&path, &renamed).unwrap();
        assert!(!runtime.exists(&path));
        assert_eq!(runtime.read_to_string(&renamed).unwrap(), "{}");
    }

    #[test]
    fn test_real_runtime_create_dir_all() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        runtime.create_dir_all(&nested).unwrap();
        assert!(runtime.exists(&nested));
    }

    #[test]
    fn test_real_runtime_read_missing_file() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();

        let result = runtime.read_to_string(&dir.path().join("missing.json"));
        assert!(result.is_err());
    }
}
