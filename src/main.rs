//! Toolsmith Runtime
//!
//! The entry point for the self-extending agent. Handles CLI args,
//! bootstrapping, and the interactive chat loop.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use toolsmith::agent::{Driver, Orchestrator, TurnOutcome};
use toolsmith::config::{self, resolve_path};
use toolsmith::provider::ChatCompletionProvider;
use toolsmith::restart;
use toolsmith::store::{tool_store, HistoryStore};
use toolsmith::tools::Executor;
use toolsmith::types::LogLevel;

const VERSION: &str = "0.1.0";

/// Toolsmith -- Self-Extending Conversational Agent
#[derive(Parser, Debug)]
#[command(
    name = "toolsmith",
    version = VERSION,
    about = "Toolsmith -- Self-Extending Conversational Agent",
    long_about = "A chat agent that forges new tools at runtime, persists them, and restarts to wield them."
)]
struct Cli {
    /// Start the agent (first run triggers the setup wizard)
    #[arg(long)]
    run: bool,

    /// Re-run the interactive setup wizard
    #[arg(long)]
    setup: bool,

    /// Show current agent status
    #[arg(long)]
    status: bool,
}

// ---- Status Command ---------------------------------------------------------

/// Display the current agent status.
fn show_status() {
    let config = match config::load_config() {
        Some(c) => c,
        None => {
            println!("Toolsmith is not configured. Run: toolsmith --setup");
            return;
        }
    };

    let tools_path = resolve_path(&config.tools_path);
    let history_path = resolve_path(&config.history_path);

    let tools_line = registry_status_line(&tools_path);
    let turn_count = HistoryStore::load(&history_path).len();

    println!(
        r#"
=== TOOLSMITH STATUS ===
Name:       {}
Model:      {}
API URL:    {}
Tools:      {}
History:    {} turns ({})
Version:    {}
========================
"#,
        config.name,
        config.model,
        config.api_url,
        tools_line,
        turn_count,
        history_path,
        config.version,
    );
}

/// One status line for the tool registry. A seed that exists but cannot
/// be loaded is reported as unreadable, never as an empty registry; `run`
/// treats the same condition as fatal.
fn registry_status_line(tools_path: &str) -> String {
    match tool_store::load_registry(tools_path) {
        Ok(registry) => format!("{} ({})", registry.len(), tools_path),
        Err(err) => format!("UNREADABLE ({}): {}", tools_path, err),
    }
}

// ---- Main Run ---------------------------------------------------------------

fn init_tracing(level: &LogLevel) {
    let default = match level {
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("toolsmith={}", default)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The main run loop: load config, wire up the subsystems, replay any
/// pending turn, then read input lines until EOF.
async fn run() -> Result<()> {
    let config = match config::load_config() {
        Some(c) => c,
        None => toolsmith::setup::run_setup_wizard()?,
    };

    init_tracing(&config.log_level);

    if config.api_key.is_empty() {
        eprintln!("No API key configured. Run: toolsmith --setup");
        std::process::exit(1);
    }

    let history_path = resolve_path(&config.history_path);
    let tools_path = resolve_path(&config.tools_path);

    // A corrupt registry seed is fatal: silently dropping forged tools
    // would undo the agent's own work.
    let registry = tool_store::load_registry(&tools_path)
        .context("Failed to load tool registry")?;
    let history = HistoryStore::load(&history_path);

    let provider = Arc::new(ChatCompletionProvider::from_config(&config));
    let mut driver = Driver::new(
        registry,
        history,
        Orchestrator::new(provider),
        Executor::default(),
        tools_path,
    );

    println!(
        "{}",
        format!(
            "toolsmith v{} | model {} | {} tools loaded",
            VERSION,
            config.model,
            driver.registry().len()
        )
        .dimmed()
    );

    // Answer the turn a mid-conversation restart left behind.
    if let Some(outcome) = driver.replay_pending().await? {
        match outcome {
            TurnOutcome::Replied(response) => {
                println!("{} {}", "toolsmith:".cyan().bold(), response);
            }
            TurnOutcome::RestartRequested { committed } => {
                println!(
                    "{}",
                    format!("[forged {} new tool(s), restarting]", committed).yellow()
                );
                restart::flush_and_exit(driver.history());
            }
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", "you:".green().bold());
        std::io::stdout().flush().ok();

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                None
            }
        };

        let input = match line {
            Some(l) => l.trim().to_string(),
            None => break,
        };
        if input.is_empty() {
            continue;
        }

        match driver.handle_input(&input).await? {
            TurnOutcome::Replied(response) => {
                println!("{} {}", "toolsmith:".cyan().bold(), response);
            }
            TurnOutcome::RestartRequested { committed } => {
                println!(
                    "{}",
                    format!("[forged {} new tool(s), restarting]", committed).yellow()
                );
                restart::flush_and_exit(driver.history());
            }
        }
    }

    driver.history().save().context("Failed to save history")?;
    println!("{}", "goodbye".dimmed());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.status {
        show_status();
        return Ok(());
    }

    if cli.setup {
        toolsmith::setup::run_setup_wizard()?;
        return Ok(());
    }

    // Default action is --run.
    run().await
}
