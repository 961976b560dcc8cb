//! Session workspace: directory layout, sandboxed writes and revision history

mod history;
mod writer;

pub use history::RevisionHistory;
pub use writer::RevisionedWriter;

use crate::error::{WorkforceError, WorkforceResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory holding per-speaker turn logs
pub const LOGS_DIR: &str = "logs";
/// Directory created for generated sources
pub const SRC_DIR: &str = "src";

/// An initialized workspace for a single session
#[derive(Debug, Clone)]
pub struct Workspace {
    writer: RevisionedWriter,
}

impl Workspace {
    /// Create the workspace layout and its revision history
    ///
    /// A failing `git init` leaves the workspace usable without history.
    pub fn init(root: impl AsRef<Path>) -> WorkforceResult<Self> {
        let writer = RevisionedWriter::new(root);
        let root = writer.root().to_path_buf();

        for dir in [root.join(LOGS_DIR), root.join(SRC_DIR)] {
            fs::create_dir_all(&dir).map_err(|e| {
                WorkforceError::io_at(
                    format!("failed to create workspace directory: {}", e),
                    dir.display().to_string(),
                )
            })?;
        }

        if let Err(e) = writer.history().init() {
            warn!(error = %e, "revision history unavailable, continuing without it");
        }

        info!("Initialized workspace at: {}", root.display());
        Ok(Self { writer })
    }

    /// Open an existing directory as a workspace without touching it
    pub fn open(root: impl AsRef<Path>) -> Self {
        Self {
            writer: RevisionedWriter::new(root),
        }
    }

    /// Workspace root
    pub fn root(&self) -> &Path {
        self.writer.root()
    }

    /// Directory holding turn logs
    pub fn logs_dir(&self) -> PathBuf {
        self.root().join(LOGS_DIR)
    }

    /// Sandboxed writer for this workspace
    pub fn writer(&self) -> &RevisionedWriter {
        &self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_layout() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::init(dir.path().join("demo/workspace")).unwrap();

        assert!(workspace.logs_dir().is_dir());
        assert!(workspace.root().join(SRC_DIR).is_dir());
    }

    #[test]
    fn test_init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        Workspace::init(dir.path()).unwrap();
        fs::write(dir.path().join("logs/keep.md"), "x").unwrap();

        let workspace = Workspace::init(dir.path()).unwrap();

        assert!(workspace.logs_dir().join("keep.md").exists());
    }
}
