//! Integration tests for the turn pipeline
//!
//! Drives a full session through the engine-side relay, the way a
//! conversation engine would.

use std::fs;
use tempfile::TempDir;
use workforce_core::{
    BudgetConfig, CostLedger, SessionHook, SessionSummary, TokenUsage, Turn, TurnRelay,
    Workspace, WorkforceResult,
};

fn transcript() -> Vec<Turn> {
    vec![
        Turn::new("UserProxy", "Build a tiny flask app with a home page."),
        Turn::new(
            "WebArchitect",
            "Here is the plan.\n\n#### app.py\n```python\nfrom flask import Flask\napp = Flask(__name__)\n```\n",
        )
        .with_usage(TokenUsage::new("qwen-max", 1000, 200)),
        Turn::new(
            "WebArchitect",
            "#### workspace/templates/index.html\n```html\n<h1>Home</h1>\n```",
        )
        .with_usage(TokenUsage::new("qwen-max", 2000, 400)),
        Turn::new("Reviewer", "LGTM").with_usage(TokenUsage::new("qwen-turbo", 500, 50)),
    ]
}

#[test]
fn test_full_session() -> WorkforceResult<()> {
    let dir = TempDir::new().unwrap();
    let workspace = Workspace::init(dir.path().join("demo/workspace"))?;
    let ledger = CostLedger::new("demo", dir.path().join("demo/logs"));
    let mut hook = SessionHook::new("demo", &workspace, ledger, BudgetConfig::with_limit(10.0));

    let mut relay = TurnRelay::new();
    relay.register(&mut hook);
    let mut halted = false;
    for turn in transcript() {
        halted |= relay.commit(turn);
    }
    assert_eq!(relay.history().len(), 4);
    drop(relay);

    assert!(!halted);

    let root = workspace.root();
    assert!(root.join("app.py").exists());
    assert_eq!(
        fs::read_to_string(root.join("templates/index.html"))?,
        "<h1>Home</h1>"
    );
    assert!(root.join("logs/UserProxy_v1.md").exists());
    assert!(root.join("logs/WebArchitect_v1.md").exists());
    assert!(root.join("logs/WebArchitect_v2.md").exists());
    assert!(root.join("logs/Reviewer_v1.md").exists());

    let summary = hook.summary();
    assert_eq!(summary.total_rounds, 4);
    assert_eq!(summary.models["qwen-max"].calls, 2);
    assert_eq!(summary.models["qwen-max"].input_tokens, 3000);
    assert_eq!(summary.models["qwen-turbo"].output_tokens, 50);

    let report = hook.finish()?;
    let parsed: SessionSummary = serde_json::from_str(&fs::read_to_string(&report)?)?;
    assert_eq!(parsed.project, "demo");
    assert_eq!(parsed.total_rounds, 4);
    assert_eq!(parsed.budget_limit_cny, Some(10.0));
    Ok(())
}

#[test]
fn test_session_halts_once_budget_is_spent() -> WorkforceResult<()> {
    let dir = TempDir::new().unwrap();
    let workspace = Workspace::init(dir.path().join("workspace"))?;
    let ledger = CostLedger::new("pricey", dir.path().join("logs"));
    let mut hook = SessionHook::new(
        "pricey",
        &workspace,
        ledger,
        BudgetConfig::with_limit(0.00005),
    );

    let mut relay = TurnRelay::new();
    relay.register(&mut hook);

    let mut consumed = 0;
    for turn in transcript() {
        consumed += 1;
        if relay.commit(turn) {
            break;
        }
    }
    drop(relay);

    // The first priced turn already costs more than the limit.
    assert_eq!(consumed, 2);
    assert!(hook.ledger().check_budget().exceeded);
    assert_eq!(hook.ledger().round_count(), 2);
    Ok(())
}

#[test]
fn test_escaping_block_is_contained() -> WorkforceResult<()> {
    let dir = TempDir::new().unwrap();
    let workspace = Workspace::init(dir.path().join("workspace"))?;
    let ledger = CostLedger::new("demo", dir.path().join("logs"));
    let mut hook = SessionHook::new("demo", &workspace, ledger, BudgetConfig::default());

    let outcome = hook.on_turn(&Turn::new(
        "Coder",
        "#### ../../../etc/evil.conf\n```\nowned\n```\n#### safe.txt\n```\nok\n```",
    ));

    assert_eq!(outcome.saved_files, vec!["safe.txt"]);
    assert!(!dir.path().join("etc").exists());
    assert!(outcome.failures.is_empty());
    Ok(())
}

#[test]
fn test_turn_cannot_reconfigure_revision_history() -> WorkforceResult<()> {
    let dir = TempDir::new().unwrap();
    let workspace = Workspace::init(dir.path().join("workspace"))?;
    let ledger = CostLedger::new("demo", dir.path().join("logs"));
    let mut hook = SessionHook::new("demo", &workspace, ledger, BudgetConfig::default());
    let marker = dir.path().join("PWNED");
    let git_config = workspace.root().join(".git/config");
    let config_before = fs::read_to_string(&git_config).ok();

    let content = format!(
        "#### .git/config\n```ini\n[core]\n\tfsmonitor = \"touch {}\"\n```\n\
         #### next.txt\n```\nhello\n```",
        marker.display()
    );
    let outcome = hook.on_turn(&Turn::new("Coder", content));

    assert_eq!(outcome.saved_files, vec!["next.txt"]);
    assert!(!marker.exists());
    assert_eq!(fs::read_to_string(&git_config).ok(), config_before);
    Ok(())
}
