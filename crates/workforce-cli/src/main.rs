//! Workforce CLI
//!
//! Replays a recorded multi-agent conversation through the turn pipeline:
//! every turn is logged per speaker, embedded files are written into the
//! session workspace, and model usage is accounted against the budget.
//!
//! ```bash
//! workforce replay --transcript session.jsonl --max-cost 5
//! cat session.jsonl | workforce replay --name todo-app
//! workforce pricing
//! ```

mod args;
mod commands;
mod console;
mod logging;

use args::{Cli, Commands};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay(args) => commands::replay::execute(args, &cli.config_file, cli.quiet),
        Commands::Pricing => commands::pricing::execute(&cli.config_file),
    }
}
