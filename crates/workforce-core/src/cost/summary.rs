//! Session usage report

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Per-model section of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSummary {
    pub calls: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    #[serde(rename = "costCNY")]
    pub cost_cny: f64,
}

/// Aggregated usage for a whole session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub project: String,
    pub duration_seconds: f64,
    pub total_rounds: u64,
    #[serde(rename = "totalCostCNY")]
    pub total_cost_cny: f64,
    #[serde(rename = "budgetLimitCNY")]
    pub budget_limit_cny: Option<f64>,
    pub models: BTreeMap<String, ModelSummary>,
}

impl SessionSummary {
    /// Budget left, negative once exceeded
    pub fn remaining_budget(&self) -> Option<f64> {
        self.budget_limit_cny.map(|limit| limit - self.total_cost_cny)
    }

    /// Human-readable report for the console
    pub fn render(&self) -> String {
        let rule = "=".repeat(60);
        let mut out = String::new();

        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "Token usage report - {}", self.project);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "Duration:     {}s", self.duration_seconds);
        let _ = writeln!(out, "Total rounds: {}", self.total_rounds);
        let _ = writeln!(out, "Total cost:   {}", format_cny(self.total_cost_cny));
        if let (Some(limit), Some(remaining)) = (self.budget_limit_cny, self.remaining_budget()) {
            let _ = writeln!(out, "Budget limit: {}", format_cny(limit));
            let _ = writeln!(out, "Remaining:    {}", format_cny(remaining));
        }

        if !self.models.is_empty() {
            let _ = writeln!(out, "\nModels:");
        }
        for (model, stats) in &self.models {
            let _ = writeln!(out, "  {}:", model);
            let _ = writeln!(out, "     calls:         {}", stats.calls);
            let _ = writeln!(out, "     input tokens:  {}", stats.input_tokens);
            let _ = writeln!(out, "     output tokens: {}", stats.output_tokens);
            let _ = writeln!(out, "     cost:          {}", format_cny(stats.cost_cny));
        }
        let _ = write!(out, "{}", rule);
        out
    }
}

/// Format an amount in CNY with four decimals
pub fn format_cny(amount: f64) -> String {
    if amount < 0.0 {
        format!("-¥{:.4}", -amount)
    } else {
        format!("¥{:.4}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SessionSummary {
        SessionSummary {
            project: "todo-app".to_string(),
            duration_seconds: 12.5,
            total_rounds: 3,
            total_cost_cny: 0.0001,
            budget_limit_cny: Some(5.0),
            models: BTreeMap::from([(
                "qwen-max".to_string(),
                ModelSummary {
                    calls: 2,
                    input_tokens: 1500,
                    output_tokens: 300,
                    total_tokens: 1800,
                    cost_cny: 0.0001,
                },
            )]),
        }
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(sample()).unwrap();

        assert_eq!(value["project"], "todo-app");
        assert_eq!(value["durationSeconds"], 12.5);
        assert_eq!(value["totalRounds"], 3);
        assert_eq!(value["totalCostCNY"], 0.0001);
        assert_eq!(value["budgetLimitCNY"], 5.0);
        assert_eq!(value["models"]["qwen-max"]["totalTokens"], 1800);
        assert_eq!(value["models"]["qwen-max"]["costCNY"], 0.0001);
        assert_eq!(value["models"]["qwen-max"]["inputTokens"], 1500);
    }

    #[test]
    fn test_no_budget_serializes_null() {
        let mut summary = sample();
        summary.budget_limit_cny = None;

        let value = serde_json::to_value(&summary).unwrap();

        assert!(value["budgetLimitCNY"].is_null());
        assert_eq!(summary.remaining_budget(), None);
    }

    #[test]
    fn test_render() {
        let text = sample().render();

        assert!(text.contains("Token usage report - todo-app"));
        assert!(text.contains("Total cost:   ¥0.0001"));
        assert!(text.contains("Remaining:    ¥4.9999"));
        assert!(text.contains("  qwen-max:"));
    }

    #[test]
    fn test_format_cny() {
        assert_eq!(format_cny(1.5), "¥1.5000");
        assert_eq!(format_cny(-0.25), "-¥0.2500");
    }
}
