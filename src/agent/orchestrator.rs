//! Completion Orchestrator
//!
//! Builds the ordered prompt, invokes the completion provider once, and
//! parses the returned text into a `Decision`. A provider failure or a
//! malformed completion never raises: the orchestrator falls back to a
//! fixed apologetic decision and logs the raw output for diagnosis.

use std::sync::Arc;

use regex::Regex;
use tracing::warn;

use crate::tools::registry::ToolRegistry;
use crate::types::{CompletionProvider, Decision, ToolResult, Turn};

use super::system_prompt::{build_system_prompt, build_tool_results_prompt};

/// The user-visible reply when the provider's output cannot be parsed.
pub const FALLBACK_RESPONSE: &str =
    "I'm sorry - I wasn't able to put together a proper reply this time. Could you try again?";

pub struct Orchestrator {
    provider: Arc<dyn CompletionProvider>,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Orchestrator { provider }
    }

    /// One completion round. The prompt is: a system turn (instructions +
    /// catalog + output contract), the prior history in order, the current
    /// input as a user turn, and - on the second pass - a system turn
    /// embedding the serialized tool results.
    ///
    /// Always returns a well-formed `Decision`; never retries the provider.
    pub async fn decide(
        &self,
        registry: &ToolRegistry,
        prior_turns: &[Turn],
        input: &str,
        tool_results: Option<&[(String, ToolResult)]>,
    ) -> Decision {
        let mut prompt: Vec<Turn> = Vec::with_capacity(prior_turns.len() + 3);
        prompt.push(Turn::system(build_system_prompt(registry.catalog())));
        prompt.extend_from_slice(prior_turns);
        prompt.push(Turn::user(input));
        if let Some(results) = tool_results {
            prompt.push(Turn::system(build_tool_results_prompt(results)));
        }

        let raw = match self.provider.complete(prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, "completion provider call failed");
                return fallback_decision();
            }
        };

        match parse_decision(&raw) {
            Ok(decision) => decision,
            Err(err) => {
                warn!(%err, %raw, "malformed completion, using fallback decision");
                fallback_decision()
            }
        }
    }
}

/// The fixed decision used when the provider output is unusable: empty
/// actions and newTools, apologetic response.
pub fn fallback_decision() -> Decision {
    Decision {
        reasoning: String::new(),
        actions: Vec::new(),
        new_tools: Vec::new(),
        response: FALLBACK_RESPONSE.to_string(),
    }
}

/// Parse provider text as a `Decision`. Code-fence wrapping (with or
/// without surrounding prose) is stripped before parsing; the schema
/// itself is strict - all four keys required.
pub fn parse_decision(raw: &str) -> Result<Decision, serde_json::Error> {
    serde_json::from_str(&extract_json_payload(raw))
}

/// Providers sometimes wrap the object in ``` fences, occasionally with
/// prose around them. Prefer the first fenced block; otherwise use the
/// trimmed text as-is.
fn extract_json_payload(raw: &str) -> String {
    let fence = Regex::new(r"(?s)```[a-zA-Z]*\s*(.*?)```").expect("static regex");
    if let Some(captures) = fence.captures(raw) {
        return captures[1].trim().to_string();
    }
    raw.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtins::builtin_tools;
    use crate::types::Role;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const WELL_FORMED: &str = r#"{
        "reasoning": "simple greeting",
        "actions": [],
        "newTools": [],
        "response": "hi there"
    }"#;

    /// Provider double that returns a canned reply and records the prompt
    /// it was handed.
    struct Canned {
        reply: String,
        seen: Mutex<Vec<Vec<Turn>>>,
    }

    impl Canned {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Canned { reply: reply.to_string(), seen: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl CompletionProvider for Canned {
        async fn complete(&self, prompt: Vec<Turn>) -> anyhow::Result<String> {
            self.seen.lock().unwrap().push(prompt);
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn test_parse_bare_object() {
        let decision = parse_decision(WELL_FORMED).unwrap();
        assert_eq!(decision.response, "hi there");
        assert!(decision.actions.is_empty());
        assert!(decision.new_tools.is_empty());
    }

    #[test]
    fn test_parse_fenced_object() {
        let fenced = format!("```json\n{WELL_FORMED}\n```");
        let decision = parse_decision(&fenced).unwrap();
        assert_eq!(decision.response, "hi there");
    }

    #[test]
    fn test_parse_fenced_object_with_prose() {
        let wrapped = format!("Sure, here is the decision:\n```json\n{WELL_FORMED}\n```\nDone!");
        let decision = parse_decision(&wrapped).unwrap();
        assert_eq!(decision.response, "hi there");
    }

    #[test]
    fn test_parse_rejects_missing_keys() {
        // No "actions" array: syntactic presence is required, even empty.
        let missing = r#"{"reasoning": "", "newTools": [], "response": "hi"}"#;
        assert!(parse_decision(missing).is_err());
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(parse_decision("this is not json").is_err());
    }

    #[tokio::test]
    async fn test_decide_prompt_shape() {
        let provider = Canned::new(WELL_FORMED);
        let orchestrator = Orchestrator::new(provider.clone());
        let registry = ToolRegistry::new(builtin_tools());
        let prior = vec![Turn::user("earlier"), Turn::assistant("noted")];

        orchestrator.decide(&registry, &prior, "hello", None).await;

        let seen = provider.seen.lock().unwrap();
        let prompt = &seen[0];
        assert_eq!(prompt.len(), 4);
        assert_eq!(prompt[0].role, Role::System);
        assert!(prompt[0].content.contains("read_file"));
        assert_eq!(prompt[1], prior[0]);
        assert_eq!(prompt[2], prior[1]);
        assert_eq!(prompt[3], Turn::user("hello"));
    }

    #[tokio::test]
    async fn test_decide_appends_tool_results_turn() {
        let provider = Canned::new(WELL_FORMED);
        let orchestrator = Orchestrator::new(provider.clone());
        let registry = ToolRegistry::new(builtin_tools());
        let results = vec![("sum".to_string(), ToolResult::ok(serde_json::json!(5)))];

        orchestrator
            .decide(&registry, &[], "hello", Some(&results))
            .await;

        let seen = provider.seen.lock().unwrap();
        let prompt = &seen[0];
        let last = prompt.last().unwrap();
        assert_eq!(last.role, Role::System);
        assert!(last.content.contains("\"sum\""));
    }

    #[tokio::test]
    async fn test_decide_falls_back_on_garbage() {
        let provider = Canned::new("complete nonsense, no json here");
        let orchestrator = Orchestrator::new(provider);
        let registry = ToolRegistry::new(builtin_tools());

        let decision = orchestrator.decide(&registry, &[], "hello", None).await;
        assert_eq!(decision.response, FALLBACK_RESPONSE);
        assert!(decision.actions.is_empty());
        assert!(decision.new_tools.is_empty());
    }
}
