//! CLI commands

pub mod pricing;
pub mod replay;

use anyhow::Context;
use workforce_core::config::{ConfigLoader, WorkforceConfig};

/// Defaults, then the config file, then `WORKFORCE_*` variables
pub fn load_config(config_file: &str) -> anyhow::Result<WorkforceConfig> {
    ConfigLoader::new()
        .with_defaults()
        .with_file(config_file)
        .with_env()
        .load()
        .with_context(|| format!("failed to load configuration from {}", config_file))
}
