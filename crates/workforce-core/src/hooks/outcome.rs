//! What a turn hook reports back to the engine

use crate::error::WorkforceError;
use std::path::PathBuf;

/// Budget alert raised while processing a turn
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetWarning {
    /// First turn on which the cost limit was reached
    Exceeded { total_cost: f64, limit: f64 },
    /// Remaining budget is below the warning floor
    LowBudget { remaining: f64 },
    /// First turn on which the round limit was reached
    RoundLimitReached { rounds: u64, limit: u64 },
}

/// Result of processing one turn
#[derive(Debug, Clone, Default)]
pub struct HookOutcome {
    /// Advisory: the controlling process should stop requesting turns
    pub halt_requested: bool,
    /// Turn log artifact, if it was written
    pub log_path: Option<PathBuf>,
    /// Workspace-relative paths of extracted files that were saved
    pub saved_files: Vec<String>,
    /// Cost of the model call behind the turn
    pub turn_cost: Option<f64>,
    pub warnings: Vec<BudgetWarning>,
    /// Step failures, reported and otherwise ignored
    pub failures: Vec<WorkforceError>,
}
