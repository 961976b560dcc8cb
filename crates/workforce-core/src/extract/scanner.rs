//! Line-oriented scan for path markers followed by fenced blocks
//!
//! The convention models are prompted with is:
//!
//! ````text
//! #### src/main.py
//! ```python
//! print("hello")
//! ```
//! ````
//!
//! The scan is a three-state machine over the indexed lines of a turn and
//! visits each line exactly once.

use regex::Regex;
use std::sync::LazyLock;

/// `#`..`####`, whitespace, optional backtick, text, optional backtick
static PATH_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,4}\s+`?(.+?)`?\s*$").expect("valid path marker regex"));

const FENCE: &str = "```";

/// Prefixes models tend to repeat from the workspace layout
const WORKSPACE_PREFIXES: [&str; 2] = ["workspace/", "workspace\\"];

/// A file found in turn content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Path relative to the workspace root
    pub relative_path: String,
    /// Lines between the fences, joined with `\n`
    pub content: String,
}

impl ExtractedFile {
    pub fn new(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ScanState<'a> {
    SeekMarker,
    SeekFenceOpen { path: &'a str },
    InBlock { path: &'a str, first_line: usize },
}

/// Find every marker + fenced block pair in `content`
///
/// Unterminated and empty blocks yield nothing. A second marker seen while
/// waiting for an opening fence replaces the pending one.
pub fn scan(content: &str) -> Vec<ExtractedFile> {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut files = Vec::new();
    let mut state = ScanState::SeekMarker;

    for (index, line) in lines.iter().enumerate() {
        state = match state {
            ScanState::SeekMarker => match path_marker(line) {
                Some(path) => ScanState::SeekFenceOpen { path },
                None => ScanState::SeekMarker,
            },
            ScanState::SeekFenceOpen { path } => {
                if is_fence(line) {
                    ScanState::InBlock {
                        path,
                        first_line: index + 1,
                    }
                } else if let Some(next) = path_marker(line) {
                    ScanState::SeekFenceOpen { path: next }
                } else {
                    ScanState::SeekFenceOpen { path }
                }
            }
            ScanState::InBlock { path, first_line } => {
                if is_fence(line) {
                    let body = &lines[first_line..index];
                    if !body.is_empty() {
                        files.push(ExtractedFile::new(
                            strip_workspace_prefix(path),
                            body.join("\n"),
                        ));
                    }
                    ScanState::SeekMarker
                } else {
                    ScanState::InBlock { path, first_line }
                }
            }
        };
    }

    files
}

/// Path named by a marker line, if the line is one and the text looks like a path
pub fn path_marker(line: &str) -> Option<&str> {
    let captures = PATH_MARKER.captures(line.trim())?;
    let candidate = captures.get(1)?.as_str().trim();
    looks_like_path(candidate).then_some(candidate)
}

/// Headings are prose unless they carry a dot or a separator
fn looks_like_path(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.contains(['.', '/', '\\'])
}

fn is_fence(line: &str) -> bool {
    line.trim().starts_with(FENCE)
}

fn strip_workspace_prefix(path: &str) -> &str {
    WORKSPACE_PREFIXES
        .iter()
        .find_map(|prefix| path.strip_prefix(prefix))
        .unwrap_or(path)
}
