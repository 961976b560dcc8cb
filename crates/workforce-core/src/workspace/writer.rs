//! Sandboxed, revisioned file writes

use super::history::RevisionHistory;
use crate::error::{WorkforceError, WorkforceResult};
use crate::sandbox::PathSandbox;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Repository metadata directory at the workspace root
const GIT_DIR: &str = ".git";

/// Writes files into the workspace and snapshots each write
#[derive(Debug, Clone)]
pub struct RevisionedWriter {
    sandbox: PathSandbox,
    history: RevisionHistory,
}

impl RevisionedWriter {
    /// Create a writer for the workspace at `root`
    pub fn new(root: impl AsRef<Path>) -> Self {
        let sandbox = PathSandbox::new(root);
        let history = RevisionHistory::new(sandbox.root());
        Self { sandbox, history }
    }

    /// Workspace root
    pub fn root(&self) -> &Path {
        self.sandbox.root()
    }

    /// Path policy used by this writer
    pub fn sandbox(&self) -> &PathSandbox {
        &self.sandbox
    }

    /// Revision history used by this writer
    pub fn history(&self) -> &RevisionHistory {
        &self.history
    }

    /// Write `content` to `relative`, overwriting any previous content
    ///
    /// The commit that follows is best-effort: its failure is logged and the
    /// write still counts as successful.
    pub fn write(&self, relative: &str, content: &str) -> WorkforceResult<PathBuf> {
        let target = self.resolve(relative)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                WorkforceError::io_at(
                    format!("failed to create directory: {}", e),
                    parent.display().to_string(),
                )
            })?;
        }
        fs::write(&target, content).map_err(|e| {
            WorkforceError::io_at(
                format!("failed to write file: {}", e),
                target.display().to_string(),
            )
        })?;
        info!("Saved: {}", relative);

        match self.history.commit_all(&format!("Auto-save: {}", relative)) {
            Ok(true) => debug!(path = relative, "committed workspace snapshot"),
            Ok(false) => debug!(path = relative, "no revision history, snapshot skipped"),
            Err(e) => warn!(path = relative, error = %e, "workspace snapshot failed"),
        }

        Ok(target)
    }

    /// Write and describe the outcome as a message for an agent tool call
    pub fn save_file(&self, relative: &str, content: &str) -> String {
        match self.write(relative, content) {
            Ok(_) => format!("Successfully saved to {}", relative),
            Err(e) => e.to_string(),
        }
    }

    /// Read a workspace file as text
    pub fn read(&self, relative: &str) -> WorkforceResult<String> {
        let target = self.resolve(relative)?;
        fs::read_to_string(&target).map_err(|e| match e.kind() {
            ErrorKind::NotFound => WorkforceError::not_found(format!("file {}", relative)),
            _ => WorkforceError::io_at(
                format!("failed to read file: {}", e),
                target.display().to_string(),
            ),
        })
    }

    /// Sandbox check, plus the repository metadata under the root
    ///
    /// Git executes commands named in `.git/config` and `.git/hooks`, so
    /// nothing in there may come from turn content.
    fn resolve(&self, relative: &str) -> WorkforceResult<PathBuf> {
        let target = self.sandbox.resolve(relative)?;

        let first = target
            .strip_prefix(self.root())
            .ok()
            .and_then(|rest| rest.components().next());
        if let Some(Component::Normal(name)) = first {
            if name.to_string_lossy().eq_ignore_ascii_case(GIT_DIR) {
                warn!(path = relative, "rejected path inside revision metadata");
                return Err(WorkforceError::security_violation(relative));
            }
        }
        Ok(target)
    }
}
