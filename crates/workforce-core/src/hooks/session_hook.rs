//! Per-turn pipeline: log, extract, account, check budget

use super::observer::TurnObserver;
use super::outcome::{BudgetWarning, HookOutcome};
use crate::config::{BudgetConfig, WorkforceConfig};
use crate::cost::{CostLedger, SessionSummary, format_cny};
use crate::error::WorkforceResult;
use crate::extract::CodeExtractor;
use crate::transcript::{Turn, TurnLogger};
use crate::workspace::Workspace;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Composition point of the pipeline for a single session
///
/// Steps run in a fixed order on every turn and each one isolates its own
/// failures. Budget enforcement happens after the turn is fully processed,
/// so a halt always comes one turn late.
#[derive(Debug)]
pub struct SessionHook {
    logger: TurnLogger,
    extractor: CodeExtractor,
    ledger: CostLedger,
    budget: BudgetConfig,
    exceeded_warned: bool,
    round_limit_warned: bool,
}

impl SessionHook {
    /// Create a hook; the ledger's limit is taken from `budget`
    pub fn new(project: &str, workspace: &Workspace, ledger: CostLedger, budget: BudgetConfig) -> Self {
        Self {
            logger: TurnLogger::new(workspace, project),
            extractor: CodeExtractor::new(workspace.writer().clone()),
            ledger: ledger.with_budget_limit(budget.cost_limit()),
            budget,
            exceeded_warned: false,
            round_limit_warned: false,
        }
    }

    /// Create a hook from loaded configuration
    pub fn from_config(
        config: &WorkforceConfig,
        project: &str,
        workspace: &Workspace,
        report_dir: impl AsRef<Path>,
    ) -> Self {
        let ledger = CostLedger::new(project, report_dir).with_pricing(config.pricing_registry());
        Self::new(project, workspace, ledger, config.budget.clone())
    }

    pub fn ledger(&self) -> &CostLedger {
        &self.ledger
    }

    /// Summary of the session so far
    pub fn summary(&self) -> SessionSummary {
        self.ledger.summary()
    }

    /// Close the session: record the rendered summary in the run log and
    /// persist the usage report
    pub fn finish(&self) -> WorkforceResult<PathBuf> {
        let _entered = self.logger.span().enter();
        debug!("Session summary:\n{}", self.ledger.summary().render());
        self.ledger.persist()
    }

    /// Process one turn
    pub fn on_turn(&mut self, turn: &Turn) -> HookOutcome {
        let span = self.logger.span().clone();
        let _entered = span.enter();
        let mut outcome = HookOutcome::default();

        match self.logger.log_turn(&turn.speaker, &turn.content) {
            Ok(path) => outcome.log_path = Some(path),
            Err(e) => {
                error!("Failed to save log: {}", e);
                outcome.failures.push(e);
            }
        }

        outcome.saved_files = self.extractor.extract(&turn.content);
        if !outcome.saved_files.is_empty() {
            info!(
                "Extracted & saved {} files: {:?}",
                outcome.saved_files.len(),
                outcome.saved_files
            );
        }

        if let Some(usage) = &turn.usage {
            let cost = self
                .ledger
                .track_usage(&usage.model, usage.input_tokens, usage.output_tokens);
            debug!(
                model = %usage.model,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "turn cost {}",
                format_cny(cost)
            );
            outcome.turn_cost = Some(cost);
        }

        self.ledger.increment_round();

        if self.budget.enabled {
            outcome.halt_requested = self.evaluate_budget(&mut outcome.warnings);
        }

        outcome
    }

    fn evaluate_budget(&mut self, warnings: &mut Vec<BudgetWarning>) -> bool {
        let mut halt = false;
        let status = self.ledger.check_budget();

        if let Some(remaining) = status.remaining {
            if status.exceeded {
                halt = true;
                if !self.exceeded_warned {
                    self.exceeded_warned = true;
                    let limit = self.budget.max_cost_cny;
                    warn!(
                        "Budget exceeded: spent {} of {}",
                        format_cny(self.ledger.total_cost()),
                        format_cny(limit)
                    );
                    warnings.push(BudgetWarning::Exceeded {
                        total_cost: self.ledger.total_cost(),
                        limit,
                    });
                }
            }

            // Independent of the exceeded alert; repeats every turn.
            if remaining < self.budget.low_budget_floor() {
                warn!("Low budget: {} remaining", format_cny(remaining));
                warnings.push(BudgetWarning::LowBudget { remaining });
            }
        }

        if let Some(limit) = self.budget.round_limit() {
            let rounds = self.ledger.round_count();
            if rounds >= limit {
                halt = true;
                if !self.round_limit_warned {
                    self.round_limit_warned = true;
                    warn!("Round limit reached: {} of {}", rounds, limit);
                    warnings.push(BudgetWarning::RoundLimitReached { rounds, limit });
                }
            }
        }

        halt
    }
}

impl TurnObserver for SessionHook {
    fn on_turn(&mut self, turn: &Turn) -> HookOutcome {
        SessionHook::on_turn(self, turn)
    }
}
