//! Setup Wizard
//!
//! Interactive first-run setup. Asks for the completion endpoint, API
//! key, and model, then writes `~/.toolsmith/config.json`.

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Input;

use crate::config::save_config;
use crate::types::{default_config, AgentConfig};

/// Prompt for a required string value. Repeats until non-empty.
fn prompt_required(label: &str) -> Result<String> {
    loop {
        let value: String = Input::new()
            .with_prompt(format!("  {} {}", "\u{2192}".cyan(), label.white()))
            .allow_empty(true)
            .interact_text()?;

        let trimmed = value.trim().to_string();
        if !trimmed.is_empty() {
            return Ok(trimmed);
        }
        println!("{}", "  This field is required.".yellow());
    }
}

/// Prompt for a value with a default, accepted on empty input.
fn prompt_with_default(label: &str, default: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(format!("  {} {}", "\u{2192}".cyan(), label.white()))
        .default(default.to_string())
        .interact_text()?;
    Ok(value.trim().to_string())
}

/// Run the interactive setup wizard and persist the resulting config.
pub fn run_setup_wizard() -> Result<AgentConfig> {
    println!();
    println!("{}", "  toolsmith -- first-run setup".cyan().bold());
    println!(
        "{}",
        "  A conversational agent that forges its own tools.\n".white()
    );

    let defaults = default_config();

    let api_url = prompt_with_default(
        "Completion API base URL (OpenAI-compatible)",
        &defaults.api_url,
    )?;
    let api_key = prompt_required("API key")?;
    let model = prompt_with_default("Model", &defaults.model)?;

    let config = AgentConfig {
        api_url,
        api_key,
        model,
        ..defaults
    };

    save_config(&config).context("Failed to save config")?;

    println!();
    println!(
        "{}",
        format!(
            "  Config saved to {}",
            crate::config::get_config_path().display()
        )
        .green()
    );
    println!("{}", "  Run `toolsmith --run` to start chatting.\n".dimmed());

    Ok(config)
}
