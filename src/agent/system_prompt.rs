//! System Prompt Builder
//!
//! Constructs the system turn that carries the static instructions, the
//! current tool catalog, and the output-format contract. Rebuilt each turn
//! so newly registered tools appear immediately.

use crate::types::ToolResult;

// --- Immutable Constants ---

pub const CORE_INSTRUCTIONS: &str = r#"You are Toolsmith, a conversational assistant that can extend itself.

You answer the user directly when you can. When a task needs a capability you
do not have, you may do two things:
- Call tools you already have by listing them under "actions".
- Forge new tools by listing them under "newTools". A new tool becomes part of
  your permanent toolset after a restart; prefer small, reusable tools with a
  clear single purpose.

Tool implementations are Rhai script bodies. They read their positional
parameters as arg0, arg1, arg2, ... and their final expression is the tool's
return value. Host functions available inside scripts: read_file(path),
write_file(path, content), list_dir(path)."#;

pub const OUTPUT_CONTRACT: &str = r#"Respond with EXACTLY ONE JSON object and nothing else. No prose before or
after it, no code fences. Required keys:
- "reasoning": string. Your private reasoning; never shown to the user.
- "actions": array of { "tool": string, "args": array }. The tools to run
  before you answer. Use [] when none.
- "newTools": array of { "name": string, "description": string,
  "implementation": string }. Tools to add to your permanent toolset.
  Use [] when none.
- "response": string. The reply shown to the user. Always required.
All four keys must be present. Arrays must be present even when empty."#;

// --- Builders ---

/// Build the leading system turn: instructions, tool catalog (name and
/// description only), and the output contract.
pub fn build_system_prompt<'a>(catalog: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let tool_lines: Vec<String> = catalog
        .map(|(name, description)| format!("- {}: {}", name, description))
        .collect();

    format!(
        "{}\n\nYour current tools:\n{}\n\n{}",
        CORE_INSTRUCTIONS,
        if tool_lines.is_empty() {
            "(none)".to_string()
        } else {
            tool_lines.join("\n")
        },
        OUTPUT_CONTRACT,
    )
}

/// Build the trailing system turn for the second orchestrator pass: the
/// serialized tool results plus a reminder of the required output shape.
pub fn build_tool_results_prompt(results: &[(String, ToolResult)]) -> String {
    let serialized: Vec<serde_json::Value> = results
        .iter()
        .map(|(name, result)| {
            serde_json::json!({
                "tool": name,
                "result": result,
            })
        })
        .collect();

    format!(
        "Tool results for your requested actions, in execution order:\n{}\n\n\
         Use them to produce your final answer. Respond with exactly one JSON \
         object with the keys reasoning, actions, newTools, response; arrays \
         present even when empty.",
        serde_json::to_string_pretty(&serialized).unwrap_or_else(|_| "[]".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_system_prompt_lists_catalog_without_implementations() {
        let catalog = vec![("greet", "Say hello"), ("sum", "Add numbers")];
        let prompt = build_system_prompt(catalog.into_iter());

        assert!(prompt.contains("- greet: Say hello"));
        assert!(prompt.contains("- sum: Add numbers"));
        assert!(prompt.contains("newTools"));
    }

    #[test]
    fn test_tool_results_prompt_embeds_results() {
        let results = vec![
            ("sum".to_string(), crate::types::ToolResult::ok(json!(5))),
            ("bad".to_string(), crate::types::ToolResult::err("boom")),
        ];
        let prompt = build_tool_results_prompt(&results);

        assert!(prompt.contains("\"sum\""));
        assert!(prompt.contains("\"boom\""));
    }
}
