//! Running token, cost and round accounting for one session

use super::pricing::PricingRegistry;
use super::summary::{ModelSummary, SessionSummary};
use crate::error::{WorkforceError, WorkforceResult};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Accumulated usage for one model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageEntry {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub calls: u64,
    /// Accumulated cost (CNY)
    pub cost: f64,
}

impl UsageEntry {
    /// Total tokens (input + output)
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Result of a budget check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetStatus {
    /// Total cost reached the limit
    pub exceeded: bool,
    /// Limit minus total cost; `None` when no limit is set
    pub remaining: Option<f64>,
}

impl BudgetStatus {
    pub const UNLIMITED: BudgetStatus = BudgetStatus {
        exceeded: false,
        remaining: None,
    };
}

/// Token and cost ledger for a session
///
/// Budget enforcement reads only in-memory state; [`CostLedger::persist`] is
/// reporting.
#[derive(Debug)]
pub struct CostLedger {
    project: String,
    pricing: PricingRegistry,
    usage: BTreeMap<String, UsageEntry>,
    total_cost: f64,
    round_count: u64,
    started: Instant,
    budget_limit: Option<f64>,
    report_path: PathBuf,
}

impl CostLedger {
    /// Create a ledger whose report goes to `report_dir`
    pub fn new(project: impl Into<String>, report_dir: impl AsRef<Path>) -> Self {
        let project = project.into();
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let report_path = report_dir
            .as_ref()
            .join(format!("token_usage_{}_{}.json", timestamp, project));

        Self {
            project,
            pricing: PricingRegistry::with_defaults(),
            usage: BTreeMap::new(),
            total_cost: 0.0,
            round_count: 0,
            started: Instant::now(),
            budget_limit: None,
            report_path,
        }
    }

    /// Replace the pricing table
    pub fn with_pricing(mut self, pricing: PricingRegistry) -> Self {
        self.pricing = pricing;
        self
    }

    /// Set the budget limit (CNY)
    pub fn with_budget_limit(mut self, limit: Option<f64>) -> Self {
        self.budget_limit = limit;
        self
    }

    /// Record one model call and return its cost
    pub fn track_usage(&mut self, model: &str, input_tokens: u64, output_tokens: u64) -> f64 {
        let cost = self
            .pricing
            .calculate_cost(model, input_tokens, output_tokens)
            .unwrap_or_else(|| {
                debug!("Unknown model for cost tracking: {}", model);
                0.0
            });

        // Counts come straight from transcript data and may be arbitrarily large.
        let entry = self.usage.entry(model.to_string()).or_default();
        entry.input_tokens = entry.input_tokens.saturating_add(input_tokens);
        entry.output_tokens = entry.output_tokens.saturating_add(output_tokens);
        entry.calls = entry.calls.saturating_add(1);
        entry.cost += cost;
        self.total_cost += cost;

        cost
    }

    /// Count one conversation round
    pub fn increment_round(&mut self) {
        self.round_count = self.round_count.saturating_add(1);
    }

    /// Compare the running total with the limit
    pub fn check_budget(&self) -> BudgetStatus {
        match self.budget_limit {
            None => BudgetStatus::UNLIMITED,
            Some(limit) => BudgetStatus {
                exceeded: self.total_cost >= limit,
                remaining: Some(limit - self.total_cost),
            },
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn round_count(&self) -> u64 {
        self.round_count
    }

    pub fn budget_limit(&self) -> Option<f64> {
        self.budget_limit
    }

    /// Usage for a model, if it was ever tracked
    pub fn usage(&self, model: &str) -> Option<&UsageEntry> {
        self.usage.get(model)
    }

    /// Where [`CostLedger::persist`] writes
    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Aggregate the session so far
    pub fn summary(&self) -> SessionSummary {
        let models = self
            .usage
            .iter()
            .map(|(model, entry)| {
                (
                    model.clone(),
                    ModelSummary {
                        calls: entry.calls,
                        input_tokens: entry.input_tokens,
                        output_tokens: entry.output_tokens,
                        total_tokens: entry.total_tokens(),
                        cost_cny: round_to(entry.cost, 4),
                    },
                )
            })
            .collect();

        SessionSummary {
            project: self.project.clone(),
            duration_seconds: round_to(self.started.elapsed().as_secs_f64(), 2),
            total_rounds: self.round_count,
            total_cost_cny: round_to(self.total_cost, 4),
            budget_limit_cny: self.budget_limit,
            models,
        }
    }

    /// Write the summary as JSON and return the file path
    pub fn persist(&self) -> WorkforceResult<PathBuf> {
        if let Some(parent) = self.report_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                WorkforceError::io_at(
                    format!("failed to create report directory: {}", e),
                    parent.display().to_string(),
                )
            })?;
        }

        let json = serde_json::to_string_pretty(&self.summary())?;
        fs::write(&self.report_path, json).map_err(|e| {
            WorkforceError::io_at(
                format!("failed to write usage report: {}", e),
                self.report_path.display().to_string(),
            )
        })?;

        info!("Usage report saved: {}", self.report_path.display());
        Ok(self.report_path.clone())
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
