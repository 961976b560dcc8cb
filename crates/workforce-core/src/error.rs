//! Error types for Workforce

use thiserror::Error;

/// Result type alias for Workforce operations
pub type WorkforceResult<T> = Result<T, WorkforceError>;

/// Main error type for the Workforce pipeline
///
/// Every variant is recoverable: pipeline steps report these and move on,
/// nothing here is meant to terminate a session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkforceError {
    /// Write or read target resolves outside the workspace root
    #[error("Security violation: cannot access '{path}' (outside workspace)")]
    SecurityViolation { path: String },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Revision history (git) errors
    #[error("Revision history error: {0}")]
    Revision(String),
}

impl WorkforceError {
    /// Create a new security violation for the rejected path
    pub fn security_violation(path: impl Into<String>) -> Self {
        Self::SecurityViolation { path: path.into() }
    }

    /// Create a new IO error without path information
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
        }
    }

    /// Create a new IO error attached to a path
    pub fn io_at(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a new not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new revision history error
    pub fn revision(message: impl Into<String>) -> Self {
        Self::Revision(message.into())
    }

    /// Whether this is a sandbox rejection
    pub fn is_security_violation(&self) -> bool {
        matches!(self, Self::SecurityViolation { .. })
    }
}

impl From<std::io::Error> for WorkforceError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for WorkforceError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_violation_message() {
        let err = WorkforceError::security_violation("../etc/passwd");
        assert!(err.is_security_violation());
        assert_eq!(
            err.to_string(),
            "Security violation: cannot access '../etc/passwd' (outside workspace)"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: WorkforceError = io.into();
        assert!(matches!(err, WorkforceError::Io { path: None, .. }));
        assert!(!err.is_security_violation());
    }
}
