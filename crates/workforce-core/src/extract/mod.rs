//! Harvest files embedded in conversation turns

mod scanner;

pub use scanner::{ExtractedFile, path_marker, scan};

use crate::workspace::RevisionedWriter;
use tracing::{debug, warn};

/// Scans turn text and materializes every embedded file in the workspace
#[derive(Debug, Clone)]
pub struct CodeExtractor {
    writer: RevisionedWriter,
}

impl CodeExtractor {
    pub fn new(writer: RevisionedWriter) -> Self {
        Self { writer }
    }

    /// Extract and save files from `content`, returning the saved paths
    ///
    /// A rejected or failed write is reported and the scan carries on with
    /// the next block.
    pub fn extract(&self, content: &str) -> Vec<String> {
        let files = scan(content);
        debug!(candidates = files.len(), "scanned turn for file blocks");

        let mut saved = Vec::with_capacity(files.len());
        for file in files {
            match self.writer.write(&file.relative_path, &file.content) {
                Ok(_) => saved.push(file.relative_path),
                Err(e) => warn!("Skipped invalid path: {} ({})", file.relative_path, e),
            }
        }
        saved
    }
}
