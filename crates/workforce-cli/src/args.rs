//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use workforce_core::config::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = "workforce")]
#[command(about = "Workforce - turn logging, code extraction and cost control for multi-agent sessions")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long = "config", global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: String,

    /// Only print the final summary
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a recorded transcript through the pipeline
    Replay(ReplayArgs),

    /// Show the model price table
    Pricing,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Transcript in JSON Lines format, `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub transcript: String,

    /// Project name (defaults to the transcript file name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Directory holding one sub-directory per project
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Enable the budget with this cost limit (CNY)
    #[arg(long)]
    pub max_cost: Option<f64>,
}
