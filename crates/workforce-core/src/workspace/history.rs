//! Git-backed revision history for the workspace

use crate::error::{WorkforceError, WorkforceResult};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Committer identity used for workspace snapshots
const COMMITTER_NAME: &str = "AI-Collab";
const COMMITTER_EMAIL: &str = "ai@example.com";

/// Best-effort revision trail rooted at the workspace directory
#[derive(Debug, Clone)]
pub struct RevisionHistory {
    root: PathBuf,
}

impl RevisionHistory {
    /// Create a history handle for `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Whether the workspace root holds its own repository
    ///
    /// Commits are only attempted when this is true, so snapshots never land
    /// in an enclosing repository.
    pub fn is_initialized(&self) -> bool {
        self.root.join(".git").exists()
    }

    /// Initialize the repository and committer identity if missing
    pub fn init(&self) -> WorkforceResult<()> {
        if self.is_initialized() {
            return Ok(());
        }
        self.git(&["init"])?;
        self.git(&["config", "user.name", COMMITTER_NAME])?;
        self.git(&["config", "user.email", COMMITTER_EMAIL])?;
        debug!(root = %self.root.display(), "initialized revision history");
        Ok(())
    }

    /// Stage the whole tree and commit it
    ///
    /// Returns `Ok(false)` when the workspace has no repository.
    pub fn commit_all(&self, message: &str) -> WorkforceResult<bool> {
        if !self.is_initialized() {
            return Ok(false);
        }
        self.git(&["add", "."])?;
        self.git(&["commit", "-m", message])?;
        Ok(true)
    }

    /// Number of commits reachable from HEAD
    pub fn commit_count(&self) -> WorkforceResult<usize> {
        let out = self.git(&["rev-list", "--count", "HEAD"])?;
        out.trim()
            .parse()
            .map_err(|e| WorkforceError::revision(format!("unexpected rev-list output: {}", e)))
    }

    fn git(&self, args: &[&str]) -> WorkforceResult<String> {
        run_git(&self.root, args)
    }
}

fn run_git(cwd: &Path, args: &[&str]) -> WorkforceResult<String> {
    debug!("Executing git command: git {}", args.join(" "));

    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|e| WorkforceError::revision(format!("failed to execute git: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        return Err(WorkforceError::revision(format!(
            "git {} failed: {}{}",
            args.first().copied().unwrap_or_default(),
            stderr.trim(),
            stdout.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
