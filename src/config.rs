//! Toolsmith Configuration
//!
//! Loads and saves the agent's configuration from `~/.toolsmith/config.json`.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::types::{default_config, AgentConfig};

/// Config file name within the toolsmith directory.
const CONFIG_FILENAME: &str = "config.json";

/// Returns the agent's home directory: `~/.toolsmith`.
pub fn get_toolsmith_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/root"));
    home.join(".toolsmith")
}

/// Returns the full path to the config file: `~/.toolsmith/config.json`.
pub fn get_config_path() -> PathBuf {
    get_toolsmith_dir().join(CONFIG_FILENAME)
}

/// Load the config from disk, merging missing fields with defaults.
///
/// Returns `None` if the config file does not exist or cannot be parsed.
pub fn load_config() -> Option<AgentConfig> {
    let config_path = get_config_path();
    if !config_path.exists() {
        return None;
    }

    let contents = fs::read_to_string(&config_path).ok()?;
    let mut config: AgentConfig = serde_json::from_str(&contents).ok()?;

    // Merge defaults for unset fields
    let defaults = default_config();

    if config.name.is_empty() {
        config.name = defaults.name;
    }
    if config.api_url.is_empty() {
        config.api_url = defaults.api_url;
    }
    if config.model.is_empty() {
        config.model = defaults.model;
    }
    if config.max_tokens_per_turn == 0 {
        config.max_tokens_per_turn = defaults.max_tokens_per_turn;
    }
    if config.history_path.is_empty() {
        config.history_path = defaults.history_path;
    }
    if config.tools_path.is_empty() {
        config.tools_path = defaults.tools_path;
    }
    if config.version.is_empty() {
        config.version = defaults.version;
    }

    Some(config)
}

/// Save the config to disk at `~/.toolsmith/config.json`.
///
/// Creates the toolsmith directory with mode 0o700 if it does not exist.
/// The config file is written with mode 0o600 since it contains an API key.
pub fn save_config(config: &AgentConfig) -> Result<()> {
    let dir = get_toolsmith_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir).context("Failed to create toolsmith directory")?;
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o700))?;
    }

    let config_path = get_config_path();
    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&config_path, &json).context("Failed to write config file")?;
    fs::set_permissions(&config_path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}

/// Resolve a path that may start with `~` to an absolute path.
pub fn resolve_path(p: &str) -> String {
    if let Some(rest) = p.strip_prefix('~') {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/root"));
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        home.join(rest).to_string_lossy().to_string()
    } else {
        p.to_string()
    }
}
