//! Model pricing definitions
//!
//! Prices are per million tokens, in CNY.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Price per 1M tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenPrice {
    /// Price per 1M input tokens (CNY)
    pub input: f64,
    /// Price per 1M output tokens (CNY)
    pub output: f64,
}

impl TokenPrice {
    pub const FREE: TokenPrice = TokenPrice::new(0.0, 0.0);

    /// Create new token price
    pub const fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }

    /// Calculate cost for given token counts
    pub fn calculate(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        let input_cost = (input_tokens as f64 / 1_000_000.0) * self.input;
        let output_cost = (output_tokens as f64 / 1_000_000.0) * self.output;
        input_cost + output_cost
    }
}

/// Model pricing information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Model identifier as reported in usage data
    pub model_id: String,
    /// Provider name
    pub provider: String,
    /// Token pricing
    pub price: TokenPrice,
}

impl ModelPricing {
    pub fn new(model_id: impl Into<String>, provider: impl Into<String>, price: TokenPrice) -> Self {
        Self {
            model_id: model_id.into(),
            provider: provider.into(),
            price,
        }
    }
}

/// Pricing table for all known models
///
/// Lookups are exact (or through a registered alias); anything else is
/// unknown and the ledger prices it at zero.
#[derive(Debug, Clone, Default)]
pub struct PricingRegistry {
    models: HashMap<String, ModelPricing>,
    aliases: HashMap<String, String>,
}

impl PricingRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create registry with default pricing
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }

    /// Register a model, replacing any previous price for it
    pub fn register(&mut self, pricing: ModelPricing) {
        self.models.insert(pricing.model_id.clone(), pricing);
    }

    /// Register an alias
    pub fn register_alias(&mut self, alias: impl Into<String>, model_id: impl Into<String>) {
        self.aliases.insert(alias.into(), model_id.into());
    }

    /// Add or replace prices from configuration
    pub fn apply_overrides<'a>(&mut self, overrides: impl IntoIterator<Item = (&'a String, &'a TokenPrice)>) {
        for (model_id, price) in overrides {
            let provider = self
                .get(model_id)
                .map(|p| p.provider.clone())
                .unwrap_or_else(|| "custom".to_string());
            self.register(ModelPricing::new(model_id.clone(), provider, *price));
        }
    }

    /// Get pricing for a model
    pub fn get(&self, model_id: &str) -> Option<&ModelPricing> {
        self.models.get(model_id).or_else(|| {
            self.aliases
                .get(model_id)
                .and_then(|actual| self.models.get(actual))
        })
    }

    /// Price for a model, zero when unknown
    pub fn price_of(&self, model_id: &str) -> TokenPrice {
        self.get(model_id).map(|p| p.price).unwrap_or(TokenPrice::FREE)
    }

    /// Calculate cost for a model
    pub fn calculate_cost(&self, model_id: &str, input_tokens: u64, output_tokens: u64) -> Option<f64> {
        self.get(model_id)
            .map(|p| p.price.calculate(input_tokens, output_tokens))
    }

    /// All registered models, sorted by id
    pub fn list_models(&self) -> Vec<&ModelPricing> {
        let mut models: Vec<_> = self.models.values().collect();
        models.sort_by(|a, b| a.model_id.cmp(&b.model_id));
        models
    }

    fn register_defaults(&mut self) {
        // DashScope models
        self.register(ModelPricing::new("qwen-max", "dashscope", TokenPrice::new(0.04, 0.12)));
        self.register(ModelPricing::new("qwen-plus", "dashscope", TokenPrice::new(0.008, 0.024)));
        self.register(ModelPricing::new("qwen-turbo", "dashscope", TokenPrice::new(0.003, 0.006)));
        self.register_alias("qwen_max", "qwen-max");
        self.register_alias("qwen_plus", "qwen-plus");
        self.register_alias("qwen_turbo", "qwen-turbo");

        // Local models
        self.register(ModelPricing::new("ollama", "local", TokenPrice::FREE));
        self.register(ModelPricing::new("local", "local", TokenPrice::FREE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_price_calculate() {
        let price = TokenPrice::new(0.04, 0.12);
        let cost = price.calculate(1_000_000, 1_000_000);
        assert!((cost - 0.16).abs() < 1e-12);
    }

    #[test]
    fn test_token_price_small_usage() {
        let price = TokenPrice::new(0.04, 0.12);
        let cost = price.calculate(1000, 200);
        assert!((cost - (0.00004 + 0.000024)).abs() < 1e-15);
    }

    #[test]
    fn test_defaults() {
        let registry = PricingRegistry::with_defaults();

        assert_eq!(registry.price_of("qwen-max"), TokenPrice::new(0.04, 0.12));
        assert_eq!(registry.price_of("qwen-turbo"), TokenPrice::new(0.003, 0.006));
        assert_eq!(registry.price_of("qwen-plus"), TokenPrice::new(0.008, 0.024));
        assert_eq!(registry.price_of("ollama"), TokenPrice::FREE);
        assert_eq!(registry.list_models().len(), 5);
    }

    #[test]
    fn test_alias() {
        let registry = PricingRegistry::with_defaults();
        assert_eq!(registry.get("qwen_max").unwrap().model_id, "qwen-max");
    }

    #[test]
    fn test_unknown_model_is_free() {
        let registry = PricingRegistry::with_defaults();

        assert!(registry.get("qwen-max-latest").is_none());
        assert_eq!(registry.price_of("gpt-unknown"), TokenPrice::FREE);
        assert_eq!(registry.calculate_cost("gpt-unknown", 10, 10), None);
    }

    #[test]
    fn test_overrides() {
        let mut registry = PricingRegistry::with_defaults();
        let overrides = HashMap::from([
            ("qwen-max".to_string(), TokenPrice::new(0.02, 0.06)),
            ("deepseek-chat".to_string(), TokenPrice::new(1.0, 2.0)),
        ]);

        registry.apply_overrides(&overrides);

        assert_eq!(registry.price_of("qwen-max"), TokenPrice::new(0.02, 0.06));
        assert_eq!(registry.get("qwen-max").unwrap().provider, "dashscope");
        assert_eq!(registry.get("deepseek-chat").unwrap().provider, "custom");
    }
}
