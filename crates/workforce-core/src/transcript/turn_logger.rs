//! Per-speaker versioned turn logs

use crate::error::{WorkforceError, WorkforceResult};
use crate::sandbox::PathSandbox;
use crate::utils::preview;
use crate::workspace::{LOGS_DIR, Workspace};
use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{Span, debug, info, info_span};

/// Characters of turn content shown on the console
const PREVIEW_CHARS: usize = 200;

/// Speaker name used when the engine reports none
const UNKNOWN_SPEAKER: &str = "Unknown";

/// A single persisted turn
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub speaker: String,
    pub version: u32,
    pub timestamp: DateTime<Local>,
    pub content: String,
}

impl LogRecord {
    /// Create a record stamped with the current time
    pub fn new(speaker: impl Into<String>, version: u32, content: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            version,
            timestamp: Local::now(),
            content: content.into(),
        }
    }

    /// Markdown form written to disk
    pub fn render(&self) -> String {
        format!(
            "# {} - Version {}\n\n**Time**: {}\n\n{}",
            self.speaker,
            self.version,
            self.timestamp.to_rfc3339(),
            self.content
        )
    }
}

/// Writes every turn to `logs/<speaker>_v<N>.md` inside the workspace
///
/// Owns the session span so all turn events carry the project name.
#[derive(Debug)]
pub struct TurnLogger {
    sandbox: PathSandbox,
    logs_dir: PathBuf,
    span: Span,
}

impl TurnLogger {
    /// Create a logger for `workspace`, tagging events with `project`
    pub fn new(workspace: &Workspace, project: &str) -> Self {
        Self {
            sandbox: workspace.writer().sandbox().clone(),
            logs_dir: workspace.logs_dir(),
            span: info_span!("session", project = %project),
        }
    }

    /// Span under which turn events are emitted
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Persist one turn and return the artifact path
    ///
    /// Versions are append-only: an existing file is never overwritten.
    pub fn log_turn(&self, speaker: &str, content: &str) -> WorkforceResult<PathBuf> {
        let _entered = self.span.enter();

        let speaker = if speaker.trim().is_empty() {
            UNKNOWN_SPEAKER
        } else {
            speaker
        };
        info!("[{}] {}", speaker, preview(content, PREVIEW_CHARS));
        debug!("[{}] Full Message:\n{}", speaker, content);

        fs::create_dir_all(&self.logs_dir).map_err(|e| {
            WorkforceError::io_at(
                format!("failed to create log directory: {}", e),
                self.logs_dir.display().to_string(),
            )
        })?;

        let stem = file_stem(speaker);
        let mut version = count_matching(&self.logs_dir, &stem)? + 1;

        loop {
            let relative = format!("{}/{}_v{}.md", LOGS_DIR, stem, version);
            let path = self.sandbox.resolve(&relative)?;
            let record = LogRecord::new(speaker, version, content);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(record.render().as_bytes()).map_err(|e| {
                        WorkforceError::io_at(
                            format!("failed to write log: {}", e),
                            path.display().to_string(),
                        )
                    })?;
                    info!("Log saved: {}", path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => version += 1,
                Err(e) => {
                    return Err(WorkforceError::io_at(
                        format!("failed to create log: {}", e),
                        path.display().to_string(),
                    ));
                }
            }
        }
    }
}

/// File name stem for a speaker; separators would create directories
fn file_stem(speaker: &str) -> String {
    speaker.replace(['/', '\\'], "_")
}

/// Count entries whose name contains `stem`, ignoring case
fn count_matching(dir: &Path, stem: &str) -> WorkforceResult<u32> {
    let needle = stem.to_lowercase();
    let entries = fs::read_dir(dir).map_err(|e| {
        WorkforceError::io_at(
            format!("failed to list log directory: {}", e),
            dir.display().to_string(),
        )
    })?;

    let count = entries
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .to_lowercase()
                .contains(&needle)
        })
        .count();
    Ok(count as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, TurnLogger) {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::open(dir.path());
        let logger = TurnLogger::new(&workspace, "demo");
        (dir, logger)
    }

    fn file_name(path: &Path) -> String {
        path.file_name().unwrap().to_string_lossy().to_string()
    }

    #[test]
    fn test_versions_are_monotonic_per_speaker() {
        let (_dir, logger) = setup();

        let v1 = logger.log_turn("Alice", "one").unwrap();
        let v2 = logger.log_turn("Alice", "two").unwrap();
        let bob = logger.log_turn("Bob", "hi").unwrap();
        let v3 = logger.log_turn("Alice", "three").unwrap();

        assert_eq!(file_name(&v1), "Alice_v1.md");
        assert_eq!(file_name(&v2), "Alice_v2.md");
        assert_eq!(file_name(&v3), "Alice_v3.md");
        assert_eq!(file_name(&bob), "Bob_v1.md");
    }

    #[test]
    fn test_record_contents() {
        let (_dir, logger) = setup();

        let path = logger.log_turn("Reviewer", "LGTM\n\n```\ncode\n```").unwrap();
        let text = fs::read_to_string(path).unwrap();

        assert!(text.starts_with("# Reviewer - Version 1\n\n**Time**: "));
        assert!(text.ends_with("\n\nLGTM\n\n```\ncode\n```"));
    }

    #[test]
    fn test_count_is_case_insensitive() {
        let (_dir, logger) = setup();

        logger.log_turn("Alice", "a").unwrap();
        logger.log_turn("Alice", "b").unwrap();
        let path = logger.log_turn("alice", "c").unwrap();

        assert_eq!(file_name(&path), "alice_v3.md");
    }

    #[test]
    fn test_existing_version_is_never_overwritten() {
        let (dir, logger) = setup();

        logger.log_turn("Alice", "first").unwrap();
        let second = logger.log_turn("Alice", "second").unwrap();
        fs::remove_file(dir.path().join("logs/Alice_v1.md")).unwrap();

        let third = logger.log_turn("Alice", "third").unwrap();

        assert_eq!(file_name(&third), "Alice_v3.md");
        assert!(fs::read_to_string(second).unwrap().ends_with("second"));
    }

    #[test]
    fn test_speaker_with_separators_stays_in_logs() {
        let (dir, logger) = setup();

        let path = logger.log_turn("../team/lead", "x").unwrap();

        assert_eq!(path.parent().unwrap(), dir.path().join("logs"));
        assert_eq!(file_name(&path), ".._team_lead_v1.md");
    }

    #[test]
    fn test_blank_speaker_is_unknown() {
        let (_dir, logger) = setup();

        let path = logger.log_turn("  ", "x").unwrap();

        assert_eq!(file_name(&path), "Unknown_v1.md");
    }
}
