//! Configuration for a Workforce session

mod budget;
mod loader;
mod logging_config;

pub use budget::BudgetConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use logging_config::{LOG_FORMATS, LOG_LEVELS, LoggingConfig};

use crate::cost::{PricingRegistry, TokenPrice};
use crate::error::{WorkforceError, WorkforceResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "workforce.json";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkforceConfig {
    /// Project name; the CLI falls back to the transcript file stem
    pub project: Option<String>,
    /// Directory holding one sub-directory per project
    #[serde(rename = "outputDir")]
    pub output_dir: PathBuf,
    pub budget: BudgetConfig,
    /// Extra or replacement prices, per million tokens
    pub pricing: HashMap<String, TokenPrice>,
    pub logging: LoggingConfig,
}

impl Default for WorkforceConfig {
    fn default() -> Self {
        Self {
            project: None,
            output_dir: PathBuf::from("output"),
            budget: BudgetConfig::default(),
            pricing: HashMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl WorkforceConfig {
    /// Default price table with configured overrides applied
    pub fn pricing_registry(&self) -> PricingRegistry {
        let mut registry = PricingRegistry::with_defaults();
        registry.apply_overrides(&self.pricing);
        registry
    }

    /// Check value ranges
    pub fn validate(&self) -> WorkforceResult<()> {
        let budget = &self.budget;
        if !(0.0..=1.0).contains(&budget.warning_threshold) {
            return Err(WorkforceError::config(format!(
                "budget.warningThreshold must be within [0, 1], got {}",
                budget.warning_threshold
            )));
        }
        if !budget.max_cost_cny.is_finite() || budget.max_cost_cny < 0.0 {
            return Err(WorkforceError::config(format!(
                "budget.maxCostCNY must be a non-negative number, got {}",
                budget.max_cost_cny
            )));
        }
        for (model, price) in &self.pricing {
            if price.input < 0.0 || price.output < 0.0 {
                return Err(WorkforceError::config(format!(
                    "pricing for '{}' must not be negative",
                    model
                )));
            }
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(WorkforceError::config(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(WorkforceError::config(format!(
                "unknown log format '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }
}
