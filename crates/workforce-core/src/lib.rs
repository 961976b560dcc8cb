//! Workforce Core Library
//!
//! Turn-level pipeline for multi-agent coding sessions. Every message the
//! conversation engine commits is logged per speaker, scanned for embedded
//! source files which are written into a sandboxed, revision-tracked
//! workspace, and accounted against a per-session cost budget.

pub mod config;
pub mod cost;
pub mod error;
pub mod extract;
pub mod hooks;
pub mod sandbox;
pub mod transcript;
pub mod utils;
pub mod workspace;

// Re-export commonly used types
pub use config::{BudgetConfig, ConfigLoader, WorkforceConfig};
pub use cost::{CostLedger, PricingRegistry, SessionSummary};
pub use error::{WorkforceError, WorkforceResult};
pub use extract::CodeExtractor;
pub use hooks::{HookOutcome, SessionHook, TurnObserver, TurnRelay};
pub use sandbox::PathSandbox;
pub use transcript::{TokenUsage, Turn, TurnLogger};
pub use workspace::Workspace;
