//! Conversation Driver
//!
//! The top-level turn cycle: accept input, drive the orchestrator, execute
//! requested tool calls, commit newly forged tools, and append the reply
//! to history. When a commit lands, the driver hands control back with a
//! restart request instead of replying; the replay on the next process
//! start re-derives the reply with the new tools available.

use anyhow::Result;
use tracing::{error, info};

use crate::store::{tool_store, HistoryStore};
use crate::tools::{Executor, ToolRegistry};
use crate::types::{ToolAction, ToolResult, Turn};

use super::orchestrator::Orchestrator;

/// How a completed turn hands control back to the caller.
#[derive(Debug)]
pub enum TurnOutcome {
    /// Normal turn: the reply was appended to history and persisted.
    Replied(String),
    /// New tools were committed. The caller must flush history and exit;
    /// the supervisor relaunch picks up the rewritten registry seed.
    RestartRequested { committed: usize },
}

pub struct Driver {
    registry: ToolRegistry,
    history: HistoryStore,
    orchestrator: Orchestrator,
    executor: Executor,
    tools_path: String,
}

impl Driver {
    pub fn new(
        registry: ToolRegistry,
        history: HistoryStore,
        orchestrator: Orchestrator,
        executor: Executor,
        tools_path: String,
    ) -> Self {
        Driver { registry, history, orchestrator, executor, tools_path }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// On process start: a trailing user turn means a prior invocation
    /// restarted before producing a reply. Replay it through the full
    /// cycle before accepting new input, so the restart is invisible.
    pub async fn replay_pending(&mut self) -> Result<Option<TurnOutcome>> {
        if !self.history.ends_with_user_turn() {
            return Ok(None);
        }

        let input = self
            .history
            .last()
            .map(|t| t.content.clone())
            .unwrap_or_default();
        info!("replaying last unanswered user turn");
        self.run_turn(input, false).await.map(Some)
    }

    /// One full conversational turn for fresh input.
    pub async fn handle_input(&mut self, input: &str) -> Result<TurnOutcome> {
        self.run_turn(input.to_string(), true).await
    }

    async fn run_turn(&mut self, input: String, record_input: bool) -> Result<TurnOutcome> {
        if record_input {
            self.history.push(Turn::user(&input));
        }

        // The prompt history excludes the current input; the orchestrator
        // appends it as the trailing user turn itself.
        let prior: Vec<Turn> = {
            let turns = self.history.turns();
            turns[..turns.len().saturating_sub(1)].to_vec()
        };

        let mut decision = self
            .orchestrator
            .decide(&self.registry, &prior, &input, None)
            .await;

        // Run requested actions sequentially, in array order, then ask for
        // a refreshed decision with the results embedded.
        if !decision.actions.is_empty() {
            let results = self.execute_actions(&decision.actions);
            decision = self
                .orchestrator
                .decide(&self.registry, &prior, &input, Some(&results))
                .await;
        }

        if !decision.new_tools.is_empty() {
            match tool_store::commit(&self.tools_path, &mut self.registry, &decision.new_tools) {
                Ok(committed) if committed > 0 => {
                    // This turn's reply is intentionally not recorded: the
                    // post-relaunch replay re-derives it.
                    return Ok(TurnOutcome::RestartRequested { committed });
                }
                Ok(_) => {
                    // Every proposal duplicated an existing name; nothing
                    // for a restart to pick up.
                }
                Err(err) => {
                    error!(%err, "tool commit aborted; replying without the new tools");
                }
            }
        }

        self.history.push(Turn::assistant(&decision.response));
        self.history.save()?;
        Ok(TurnOutcome::Replied(decision.response))
    }

    fn execute_actions(&self, actions: &[ToolAction]) -> Vec<(String, ToolResult)> {
        actions
            .iter()
            .map(|action| {
                info!(tool = %action.tool, args = action.args.len(), "executing tool");
                let result = match self.registry.find(&action.tool) {
                    Some(tool) => self.executor.execute(tool, &action.args),
                    None => ToolResult::err(format!("unknown tool: {}", action.tool)),
                };
                if let Some(ref err) = result.error {
                    info!(tool = %action.tool, %err, "tool failed");
                }
                (action.tool.clone(), result)
            })
            .collect()
    }
}
