//! Configuration loading from layered sources

use super::WorkforceConfig;
use crate::error::{WorkforceError, WorkforceResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ENV_PROJECT: &str = "WORKFORCE_PROJECT";
pub const ENV_OUTPUT_DIR: &str = "WORKFORCE_OUTPUT_DIR";
pub const ENV_BUDGET_ENABLED: &str = "WORKFORCE_BUDGET_ENABLED";
pub const ENV_MAX_COST_CNY: &str = "WORKFORCE_MAX_COST_CNY";
pub const ENV_MAX_ROUNDS: &str = "WORKFORCE_MAX_ROUNDS";
pub const ENV_WARNING_THRESHOLD: &str = "WORKFORCE_WARNING_THRESHOLD";

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Built-in defaults; resets everything loaded before it
    Default,
    /// JSON file; a missing file contributes nothing
    File(PathBuf),
    /// `WORKFORCE_*` process environment variables
    Environment,
    /// Explicit variables with the same names as the environment
    Variables(HashMap<String, String>),
}

/// Loads configuration by applying sources in order
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration source
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add default configuration source
    pub fn with_defaults(self) -> Self {
        self.add_source(ConfigSource::Default)
    }

    /// Add a file source
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    /// Add environment variables source
    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    /// Load and validate configuration from all sources
    pub fn load(self) -> WorkforceResult<WorkforceConfig> {
        let mut config = WorkforceConfig::default();

        for source in &self.sources {
            match source {
                ConfigSource::Default => {
                    tracing::debug!("Loading default config");
                    config = WorkforceConfig::default();
                }
                ConfigSource::File(path) => {
                    if let Some(file_config) = load_from_file(path)? {
                        tracing::debug!("Loaded config from file: {}", path.display());
                        config = file_config;
                    }
                }
                ConfigSource::Environment => {
                    tracing::debug!("Loading config from environment");
                    apply_variables(&mut config, std::env::vars())?;
                }
                ConfigSource::Variables(vars) => {
                    apply_variables(&mut config, vars.clone())?;
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

fn load_from_file(path: &Path) -> WorkforceResult<Option<WorkforceConfig>> {
    if !path.exists() {
        tracing::debug!("Config file not found, skipping: {}", path.display());
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        WorkforceError::config(format!(
            "failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    let config = serde_json::from_str(&content).map_err(|e| {
        WorkforceError::config(format!(
            "failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    Ok(Some(config))
}

fn apply_variables(
    config: &mut WorkforceConfig,
    vars: impl IntoIterator<Item = (String, String)>,
) -> WorkforceResult<()> {
    for (key, value) in vars {
        match key.as_str() {
            ENV_PROJECT => config.project = Some(value),
            ENV_OUTPUT_DIR => config.output_dir = PathBuf::from(value),
            ENV_BUDGET_ENABLED => config.budget.enabled = parse_flag(&key, &value)?,
            ENV_MAX_COST_CNY => config.budget.max_cost_cny = parse_value(&key, &value)?,
            ENV_MAX_ROUNDS => config.budget.max_rounds = parse_value(&key, &value)?,
            ENV_WARNING_THRESHOLD => {
                config.budget.warning_threshold = parse_value(&key, &value)?
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_flag(key: &str, value: &str) -> WorkforceResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(WorkforceError::config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> WorkforceResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| WorkforceError::config(format!("invalid {} '{}': {}", key, value, e)))
}
