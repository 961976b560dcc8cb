//! Budget configuration

use serde::{Deserialize, Serialize};

/// Budget circuit-breaker settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Whether the budget is checked at all
    pub enabled: bool,
    /// Cost limit (CNY)
    #[serde(rename = "maxCostCNY")]
    pub max_cost_cny: f64,
    /// Round limit, 0 for none
    #[serde(rename = "maxRounds")]
    pub max_rounds: u64,
    /// Fraction of the limit after which low-budget warnings start, in [0, 1]
    #[serde(rename = "warningThreshold")]
    pub warning_threshold: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_cost_cny: 10.0,
            max_rounds: 0,
            warning_threshold: 0.8,
        }
    }
}

impl BudgetConfig {
    /// Enabled budget with the given cost limit
    pub fn with_limit(max_cost_cny: f64) -> Self {
        Self {
            enabled: true,
            max_cost_cny,
            ..Self::default()
        }
    }

    /// Cost limit handed to the ledger
    pub fn cost_limit(&self) -> Option<f64> {
        self.enabled.then_some(self.max_cost_cny)
    }

    /// Round limit, if any
    pub fn round_limit(&self) -> Option<u64> {
        (self.enabled && self.max_rounds > 0).then_some(self.max_rounds)
    }

    /// Remaining budget below which every turn warns
    pub fn low_budget_floor(&self) -> f64 {
        self.max_cost_cny * (1.0 - self.warning_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_has_no_limits() {
        let config = BudgetConfig {
            max_rounds: 5,
            ..BudgetConfig::default()
        };
        assert_eq!(config.cost_limit(), None);
        assert_eq!(config.round_limit(), None);
    }

    #[test]
    fn test_enabled_limits() {
        let config = BudgetConfig {
            max_rounds: 20,
            ..BudgetConfig::with_limit(5.0)
        };
        assert_eq!(config.cost_limit(), Some(5.0));
        assert_eq!(config.round_limit(), Some(20));
        assert!((config.low_budget_floor() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_deserialize_external_names() {
        let config: BudgetConfig = serde_json::from_str(
            r#"{"enabled": true, "maxCostCNY": 2.5, "maxRounds": 30, "warningThreshold": 0.9}"#,
        )
        .unwrap();
        assert_eq!(config.max_cost_cny, 2.5);
        assert_eq!(config.max_rounds, 30);
        assert_eq!(config.warning_threshold, 0.9);
    }
}
