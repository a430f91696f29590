//! Completion Provider
//!
//! Wraps an OpenAI-compatible /v1/chat/completions endpoint. The agent
//! speaks to one model over one endpoint; everything else in the crate
//! only sees the `CompletionProvider` trait.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::types::{AgentConfig, CompletionProvider, Turn};

pub struct ChatCompletionProvider {
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    http: Client,
}

impl ChatCompletionProvider {
    pub fn new(api_url: String, api_key: String, model: String, max_tokens: u32) -> Self {
        Self {
            api_url,
            api_key,
            model,
            max_tokens,
            http: Client::new(),
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.model.clone(),
            config.max_tokens_per_turn,
        )
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionProvider {
    async fn complete(&self, prompt: Vec<Turn>) -> Result<String> {
        let messages: Vec<Value> = prompt
            .iter()
            .map(|turn| {
                serde_json::json!({
                    "role": turn.role,
                    "content": turn.content,
                })
            })
            .collect();

        // Newer models (o-series, gpt-5.x, gpt-4.1) use max_completion_tokens
        let uses_completion_tokens = regex::Regex::new(r"^(o[1-9]|gpt-5|gpt-4\.1)")
            .map(|re| re.is_match(&self.model))
            .unwrap_or(false);

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
        });

        if uses_completion_tokens {
            body["max_completion_tokens"] = serde_json::json!(self.max_tokens);
        } else {
            body["max_tokens"] = serde_json::json!(self.max_tokens);
        }

        let url = format!("{}/v1/chat/completions", self.api_url);
        let resp = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("Completion request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Completion error: {}: {}", status.as_u16(), text);
        }

        let data: Value = resp.json().await.context("Failed to parse completion response")?;

        let content = data["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str())
            .ok_or_else(|| anyhow::anyhow!("No completion choice returned"))?;

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_models_use_completion_tokens() {
        let re = regex::Regex::new(r"^(o[1-9]|gpt-5|gpt-4\.1)").unwrap();
        assert!(re.is_match("gpt-5-mini"));
        assert!(re.is_match("o3"));
        assert!(re.is_match("gpt-4.1"));
        assert!(!re.is_match("gpt-4o"));
        assert!(!re.is_match("llama-3.1-70b"));
    }
}
