//! Transcript replay command
//!
//! Feeds a recorded conversation, one JSON turn per line, through the same
//! relay a live conversation engine would use. Reading stops as soon as the
//! session hook asks for a halt. Malformed lines are skipped and reported;
//! the usage report is written for whatever was replayed.

use super::load_config;
use crate::args::ReplayArgs;
use crate::console::CliConsole;
use crate::logging;
use anyhow::{Context, bail};
use chrono::Local;
use colored::*;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Component, Path};
use workforce_core::config::WorkforceConfig;
use workforce_core::hooks::{BudgetWarning, HookOutcome, SessionHook, TurnObserver, TurnRelay};
use workforce_core::transcript::Turn;
use workforce_core::utils::preview;
use workforce_core::workspace::Workspace;
use tracing::{error, warn};

/// Project name used when nothing else provides one
const FALLBACK_PROJECT: &str = "session";

/// Characters of turn content echoed per turn
const ECHO_CHARS: usize = 80;

pub fn execute(args: ReplayArgs, config_file: &str, quiet: bool) -> anyhow::Result<()> {
    let mut config = load_config(config_file)?;
    apply_overrides(&mut config, &args)?;

    let project = project_name(&args, &config)?;
    let session_dir = config.output_dir.join(&project);
    let logs_dir = session_dir.join("logs");
    fs::create_dir_all(&logs_dir)
        .with_context(|| format!("failed to create {}", logs_dir.display()))?;

    let run_log = config.logging.log_to_file.then(|| {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        logs_dir.join(format!("run_{}_{}.log", timestamp, project))
    });
    let _log_guard = logging::init(&config.logging, run_log.as_deref())?;

    let console = CliConsole::new(!quiet);
    console.print_header(&format!("Workforce session: {}", project));

    let workspace = Workspace::init(session_dir.join("workspace"))?;
    console.info(&format!("Workspace: {}", workspace.root().display()));
    if let Some(path) = &run_log {
        console.info(&format!("Run log: {}", path.display()));
    }

    let mut hook = SessionHook::from_config(&config, &project, &workspace, &logs_dir);
    let turns = replay(open_transcript(&args.transcript)?, &mut hook, &console);

    println!();
    println!("{}", hook.summary().render().cyan());

    let report = hook.finish()?;
    console.success(&format!("Replayed {} turn(s)", turns.played));
    println!("Usage report: {}", report.display().to_string().bold());
    if !turns.skipped.is_empty() {
        console.warn(&format!(
            "Skipped {} malformed line(s): {:?}",
            turns.skipped.len(),
            turns.skipped
        ));
    }
    if turns.halted {
        console.warn("Session halted by budget; remaining turns were not replayed");
    }
    if let Some(e) = turns.read_error {
        bail!("transcript read stopped early at {}", e);
    }
    Ok(())
}

/// What happened to the transcript during a replay
#[derive(Debug, Default, PartialEq)]
struct ReplayStats {
    played: usize,
    halted: bool,
    /// 1-based numbers of lines that were not valid turns
    skipped: Vec<usize>,
    /// Read failure that ended the transcript early
    read_error: Option<String>,
}

fn replay(reader: Box<dyn BufRead>, hook: &mut SessionHook, console: &CliConsole) -> ReplayStats {
    let mut observer = ConsoleObserver { hook, console };
    let mut relay = TurnRelay::new();
    relay.register(&mut observer);

    let mut stats = ReplayStats::default();
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!(line = line_number, error = %e, "transcript read failed");
                stats.read_error = Some(format!("line {}: {}", line_number, e));
                break;
            }
        };

        let turn = match parse_turn(&line) {
            Ok(Some(turn)) => turn,
            Ok(None) => continue,
            Err(e) => {
                warn!(line = line_number, "Skipping malformed turn: {:#}", e);
                console.warn(&format!("Skipped line {}: {:#}", line_number, e));
                stats.skipped.push(line_number);
                continue;
            }
        };

        stats.played += 1;
        if relay.commit(turn) {
            stats.halted = true;
            break;
        }
    }
    stats
}

/// Parse one transcript line; blank lines carry no turn
fn parse_turn(line: &str) -> anyhow::Result<Option<Turn>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let turn = serde_json::from_str(line).context("malformed turn")?;
    Ok(Some(turn))
}

fn open_transcript(source: &str) -> anyhow::Result<Box<dyn BufRead>> {
    if source == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(source).with_context(|| format!("failed to open transcript {}", source))?;
    Ok(Box::new(BufReader::new(file)))
}

fn apply_overrides(config: &mut WorkforceConfig, args: &ReplayArgs) -> anyhow::Result<()> {
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(limit) = args.max_cost {
        config.budget.enabled = true;
        config.budget.max_cost_cny = limit;
    }
    config.validate()?;
    Ok(())
}

/// `--name`, then the configured project, then the transcript file stem
fn project_name(args: &ReplayArgs, config: &WorkforceConfig) -> anyhow::Result<String> {
    let name = args
        .name
        .clone()
        .or_else(|| config.project.clone())
        .or_else(|| {
            (args.transcript != "-")
                .then(|| Path::new(&args.transcript).file_stem())
                .flatten()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| FALLBACK_PROJECT.to_string());

    let mut components = Path::new(&name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_normal {
        bail!("invalid project name: {:?}", name);
    }
    Ok(name)
}

/// Forwards turns to the session hook and echoes each outcome
struct ConsoleObserver<'a> {
    hook: &'a mut SessionHook,
    console: &'a CliConsole,
}

impl TurnObserver for ConsoleObserver<'_> {
    fn on_turn(&mut self, turn: &Turn) -> HookOutcome {
        let outcome = self.hook.on_turn(turn);

        self.console.info(&format!(
            "{} {}",
            format!("[{}]", turn.speaker).magenta().bold(),
            preview(&turn.content, ECHO_CHARS).dimmed()
        ));
        for path in &outcome.saved_files {
            self.console.success(&format!("Saved {}", path));
        }
        for failure in &outcome.failures {
            self.console.error(&failure.to_string());
        }
        for warning in &outcome.warnings {
            self.console.warn(&describe(warning));
        }
        outcome
    }
}

fn describe(warning: &BudgetWarning) -> String {
    match warning {
        BudgetWarning::Exceeded { total_cost, limit } => format!(
            "Budget exceeded: ¥{:.4} spent of ¥{:.4}",
            total_cost, limit
        ),
        BudgetWarning::LowBudget { remaining } => {
            format!("Low budget: ¥{:.4} remaining", remaining)
        }
        BudgetWarning::RoundLimitReached { rounds, limit } => {
            format!("Round limit reached: {} of {}", rounds, limit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use workforce_core::config::BudgetConfig;
    use workforce_core::cost::CostLedger;

    fn args(transcript: &str, name: Option<&str>) -> ReplayArgs {
        ReplayArgs {
            transcript: transcript.to_string(),
            name: name.map(str::to_string),
            output_dir: None,
            max_cost: None,
        }
    }

    fn reader(text: &'static str) -> Box<dyn BufRead> {
        Box::new(io::Cursor::new(text))
    }

    fn hook_in(dir: &TempDir, budget: BudgetConfig) -> SessionHook {
        let workspace = Workspace::open(dir.path().join("workspace"));
        let ledger = CostLedger::new("demo", dir.path().join("logs"));
        SessionHook::new("demo", &workspace, ledger, budget)
    }

    #[test]
    fn test_parse_turn_accepts_engine_field_names() {
        let turn = parse_turn(
            r#"{"name":"Coder","content":"hi","usage":{"model":"qwen-max","prompt_tokens":10,"completion_tokens":2}}"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(turn.speaker, "Coder");
        assert_eq!(turn.usage.unwrap().output_tokens, 2);
    }

    #[test]
    fn test_parse_turn_blank_and_malformed() {
        assert!(parse_turn("   ").unwrap().is_none());
        assert!(parse_turn("{not json").is_err());
    }

    #[test]
    fn test_project_name_precedence() {
        let config = WorkforceConfig {
            project: Some("configured".to_string()),
            ..WorkforceConfig::default()
        };

        assert_eq!(project_name(&args("a.jsonl", Some("cli")), &config).unwrap(), "cli");
        assert_eq!(project_name(&args("a.jsonl", None), &config).unwrap(), "configured");
        assert_eq!(
            project_name(&args("runs/todo.jsonl", None), &WorkforceConfig::default()).unwrap(),
            "todo"
        );
        assert_eq!(
            project_name(&args("-", None), &WorkforceConfig::default()).unwrap(),
            FALLBACK_PROJECT
        );
    }

    #[test]
    fn test_project_name_must_be_one_component() {
        let config = WorkforceConfig::default();
        assert!(project_name(&args("-", Some("../escape")), &config).is_err());
        assert!(project_name(&args("-", Some("a/b")), &config).is_err());
        assert!(project_name(&args("-", Some("")), &config).is_err());
    }

    #[test]
    fn test_max_cost_enables_budget() {
        let mut config = WorkforceConfig::default();
        let mut replay_args = args("-", None);
        replay_args.max_cost = Some(3.0);

        apply_overrides(&mut config, &replay_args).unwrap();

        assert!(config.budget.enabled);
        assert_eq!(config.budget.max_cost_cny, 3.0);

        replay_args.max_cost = Some(-1.0);
        assert!(apply_overrides(&mut config, &replay_args).is_err());
    }

    #[test]
    fn test_replay_stops_at_halt() {
        let dir = TempDir::new().unwrap();
        let budget = BudgetConfig {
            max_rounds: 2,
            ..BudgetConfig::with_limit(100.0)
        };
        let mut hook = hook_in(&dir, budget);

        let stats = replay(
            reader(
                "{\"speaker\":\"A\",\"content\":\"one\"}\n\n\
                 {\"speaker\":\"B\",\"content\":\"#### b.txt\\n```\\nB\\n```\"}\n\
                 {\"speaker\":\"A\",\"content\":\"never seen\"}\n",
            ),
            &mut hook,
            &CliConsole::new(false),
        );

        assert_eq!(
            stats,
            ReplayStats {
                played: 2,
                halted: true,
                ..ReplayStats::default()
            }
        );
        assert_eq!(hook.ledger().round_count(), 2);
        assert!(dir.path().join("workspace/b.txt").exists());
    }

    #[test]
    fn test_malformed_lines_are_skipped_and_reported() {
        let dir = TempDir::new().unwrap();
        let mut hook = hook_in(&dir, BudgetConfig::default());

        let stats = replay(
            reader(
                "{\"speaker\":\"A\",\"content\":\"#### a.txt\\n```\\nA\\n```\",\
                 \"usage\":{\"model\":\"qwen-max\",\"input_tokens\":1000,\"output_tokens\":200}}\n\
                 {truncated\n\
                 {\"speaker\":\"B\",\"content\":\"still here\"}\n",
            ),
            &mut hook,
            &CliConsole::new(false),
        );

        assert_eq!(stats.played, 2);
        assert_eq!(stats.skipped, vec![2]);
        assert!(stats.read_error.is_none());
        assert!(dir.path().join("workspace/a.txt").exists());
        assert_eq!(hook.ledger().round_count(), 2);
    }

    #[test]
    fn test_unreadable_transcript_still_leaves_a_report() {
        let dir = TempDir::new().unwrap();
        let mut hook = hook_in(&dir, BudgetConfig::default());
        let bytes: &'static [u8] = b"{\"speaker\":\"A\",\"content\":\"ok\",\
            \"usage\":{\"model\":\"qwen-max\",\"input_tokens\":1000,\"output_tokens\":200}}\n\
            \xff\xfe\n\
            {\"speaker\":\"B\",\"content\":\"unreached\"}\n";

        let stats = replay(Box::new(io::Cursor::new(bytes)), &mut hook, &CliConsole::new(false));

        assert_eq!(stats.played, 1);
        assert!(stats.read_error.unwrap().starts_with("line 2"));

        let report = hook.finish().unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
        assert_eq!(value["totalRounds"], 1);
        assert_eq!(value["models"]["qwen-max"]["calls"], 1);
    }
}
