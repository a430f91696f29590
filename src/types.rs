//! Toolsmith - Type Definitions
//!
//! Shared types for the self-extending conversational agent.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ─── Conversation ────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in the conversation. Turns are append-only and totally
/// ordered by insertion; ephemeral system turns built for a single prompt
/// are never persisted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Turn { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Turn { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Turn { role: Role::Assistant, content: content.into() }
    }
}

// ─── Tools ───────────────────────────────────────────────────────

/// A named unit of executable behavior. The implementation is a script body
/// that reads its positional parameters as `arg0, arg1, ...` and whose final
/// expression is the tool's value. It is opaque text until executed; no
/// validation happens at registration time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub implementation: String,
}

/// Outcome of one tool invocation. `result` is present iff `success`,
/// `error` iff not. Owned by the invocation that produced it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn ok(value: serde_json::Value) -> Self {
        ToolResult { success: true, result: Some(value), error: None }
    }

    pub fn err(message: impl Into<String>) -> Self {
        ToolResult { success: false, result: None, error: Some(message.into()) }
    }
}

// ─── Decisions ───────────────────────────────────────────────────

/// One requested tool invocation: a registered tool name plus positional
/// argument values bound to `arg0..argN`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolAction {
    pub tool: String,
    pub args: Vec<serde_json::Value>,
}

/// The structured output of one completion round.
///
/// Parsed strictly: all four keys must be present, and `actions` /
/// `newTools` must be arrays even when empty. Anything else is treated as
/// a malformed completion by the orchestrator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub reasoning: String,
    pub actions: Vec<ToolAction>,
    pub new_tools: Vec<ToolSpec>,
    pub response: String,
}

// ─── Configuration ───────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub name: String,
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens_per_turn: u32,
    pub history_path: String,
    pub tools_path: String,
    pub log_level: LogLevel,
    pub version: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Returns a default `AgentConfig`. Fields with no sensible default are
/// set to empty strings so callers can override them.
pub fn default_config() -> AgentConfig {
    AgentConfig {
        name: "toolsmith".to_string(),
        api_url: "https://api.openai.com".to_string(),
        api_key: String::new(),
        model: "gpt-4o".to_string(),
        max_tokens_per_turn: 4096,
        history_path: "~/.toolsmith/history.json".to_string(),
        tools_path: "~/.toolsmith/tools.json".to_string(),
        log_level: LogLevel::Info,
        version: "0.1.0".to_string(),
    }
}

// ─── Completion Provider ─────────────────────────────────────────

/// The external capability that turns an ordered prompt into model text.
/// The orchestrator depends only on this trait, not on any transport.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: Vec<Turn>) -> anyhow::Result<String>;
}
