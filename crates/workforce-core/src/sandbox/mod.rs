//! Workspace path containment
//!
//! Every filesystem side effect driven by model output goes through
//! [`PathSandbox`]. Paths are normalized lexically: `.` and `..` segments are
//! folded, symlinks are not followed.

use crate::error::{WorkforceError, WorkforceResult};
use std::path::{Component, Path, PathBuf};

/// Path containment policy for a single workspace root
#[derive(Debug, Clone)]
pub struct PathSandbox {
    /// Normalized absolute root
    root: PathBuf,
}

impl PathSandbox {
    /// Create a sandbox rooted at `root`
    ///
    /// A relative root is resolved against the current directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: absolute(root.as_ref()),
        }
    }

    /// Normalized workspace root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check whether `relative` stays inside the root
    pub fn is_safe(&self, relative: impl AsRef<Path>) -> bool {
        self.contains(&normalize(&self.root.join(relative.as_ref())))
    }

    /// Resolve `relative` to an absolute path inside the root
    pub fn resolve(&self, relative: impl AsRef<Path>) -> WorkforceResult<PathBuf> {
        let relative = relative.as_ref();
        let resolved = normalize(&self.root.join(relative));
        if self.contains(&resolved) {
            Ok(resolved)
        } else {
            tracing::warn!(path = %relative.display(), "rejected path outside workspace");
            Err(WorkforceError::security_violation(
                relative.display().to_string(),
            ))
        }
    }

    // Component-wise: "/ws" does not contain "/ws-evil".
    fn contains(&self, resolved: &Path) -> bool {
        resolved.starts_with(&self.root)
    }
}

/// Check whether `relative` resolves inside `root`
pub fn is_safe(root: impl AsRef<Path>, relative: impl AsRef<Path>) -> bool {
    PathSandbox::new(root).is_safe(relative)
}

/// Make a path absolute and normalize it
fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        normalize(&base.join(path))
    }
}

/// Lexically fold `.` and `..` components
///
/// `..` at the filesystem root stays at the root, matching how the OS
/// resolves `/..`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}
