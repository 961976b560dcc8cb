//! Logging configuration

use serde::{Deserialize, Serialize};

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
pub const LOG_FORMATS: [&str; 3] = ["compact", "pretty", "json"];

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Console log level (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to write the DEBUG run log file
    #[serde(rename = "logToFile")]
    pub log_to_file: bool,
    /// Console format (compact, pretty, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: true,
            format: "compact".to_string(),
        }
    }
}
