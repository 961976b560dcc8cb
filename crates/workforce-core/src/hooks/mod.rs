//! Turn hooks
//!
//! The conversation engine owns a [`TurnRelay`] and registers a
//! [`SessionHook`] on it. Each committed turn flows through the hook, which
//! logs it, harvests embedded files, accounts its usage and reports whether
//! the budget asks for the session to stop.
//!
//! ```rust,no_run
//! use workforce_core::config::BudgetConfig;
//! use workforce_core::cost::CostLedger;
//! use workforce_core::hooks::{SessionHook, TurnRelay};
//! use workforce_core::transcript::{TokenUsage, Turn};
//! use workforce_core::workspace::Workspace;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let workspace = Workspace::init("output/demo/workspace")?;
//! let ledger = CostLedger::new("demo", "output/demo/logs");
//! let mut hook = SessionHook::new("demo", &workspace, ledger, BudgetConfig::with_limit(5.0));
//!
//! let mut relay = TurnRelay::new();
//! relay.register(&mut hook);
//! let halt = relay.commit(
//!     Turn::new("Coder", "#### main.py\n```python\nprint('hi')\n```")
//!         .with_usage(TokenUsage::new("qwen-max", 1000, 200)),
//! );
//! drop(relay);
//!
//! println!("halt requested: {}", halt);
//! println!("{}", hook.summary().render());
//! # Ok(())
//! # }
//! ```

mod observer;
mod outcome;
mod session_hook;


pub use observer::{TurnObserver, TurnRelay};
pub use outcome::{BudgetWarning, HookOutcome};
pub use session_hook::SessionHook;
