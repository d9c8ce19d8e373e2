use std::path::PathBuf;

use anyhow::Result;

use crate::runtime::Runtime;

/// Default snapshot file name, kept in the working directory so each
/// project (or virtualenv checkout) carries its own.
pub(crate) const SNAPSHOT_FILE: &str = "requirements.json";

/// Resolve the snapshot path: an explicit path wins, otherwise
/// `<current dir>/requirements.json`.
pub(crate) fn resolve_snapshot_path<R: Runtime>(
    runtime: &R,
    snapshot: Option<PathBuf>,
) -> Result<PathBuf> {
    match snapshot {
        Some(path) => Ok(path),
        None => Ok(runtime.current_dir()?.join(SNAPSHOT_FILE)),
    }
}
