//! Cost tracking and budgeting for LLM usage
//!
//! Prices every reported model call, keeps per-model totals and the round
//! count, and answers budget checks from live in-memory state.
//!
//! # Example
//!
//! ```rust
//! use workforce_core::cost::CostLedger;
//!
//! let mut ledger = CostLedger::new("demo", std::env::temp_dir()).with_budget_limit(Some(1.0));
//! let cost = ledger.track_usage("qwen-max", 1000, 200);
//! ledger.increment_round();
//!
//! let status = ledger.check_budget();
//! assert!(!status.exceeded);
//! assert!((ledger.total_cost() - cost).abs() < f64::EPSILON);
//! ```

pub mod ledger;
pub mod pricing;
pub mod summary;


pub use ledger::{BudgetStatus, CostLedger, UsageEntry};
pub use pricing::{ModelPricing, PricingRegistry, TokenPrice};
pub use summary::{ModelSummary, SessionSummary, format_cny};
