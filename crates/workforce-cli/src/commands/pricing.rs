//! Price table listing command

use super::load_config;
use crate::console::CliConsole;
use colored::*;

/// Print every known model with its per-million-token prices
pub fn execute(config_file: &str) -> anyhow::Result<()> {
    let config = load_config(config_file)?;
    let registry = config.pricing_registry();
    let console = CliConsole::new(true);

    console.print_header("Model Pricing (CNY per 1M tokens)");
    println!(
        "{:<16} {:<12} {:>10} {:>10}",
        "model".bold(),
        "provider".bold(),
        "input".bold(),
        "output".bold()
    );
    for model in registry.list_models() {
        println!(
            "{:<16} {:<12} {:>10.4} {:>10.4}",
            model.model_id.green(),
            model.provider.dimmed(),
            model.price.input,
            model.price.output
        );
    }

    if !config.pricing.is_empty() {
        console.info(&format!(
            "{} price override(s) from {}",
            config.pricing.len(),
            config_file
        ));
    }
    Ok(())
}
