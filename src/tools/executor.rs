//! Dynamic Executor
//!
//! Compiles a tool's script body with an embedded Rhai engine and invokes
//! it with positional arguments bound as `arg0..argN`. Every compile or
//! runtime error is contained in the returned `ToolResult`; nothing
//! escapes to the caller and nothing is ever fatal.

use std::fs;
use std::time::{Duration, Instant};

use rhai::{Dynamic, Engine, EvalAltResult, Scope};

use crate::types::{ToolResult, ToolSpec};

/// Wall-clock deadline for a single tool invocation.
const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

/// Expression nesting and call depth limits for tool scripts.
const MAX_EXPR_DEPTH: usize = 64;
const MAX_CALL_LEVELS: usize = 64;

pub struct Executor {
    deadline: Duration,
}

impl Default for Executor {
    fn default() -> Self {
        Executor { deadline: DEFAULT_DEADLINE }
    }
}

impl Executor {
    pub fn new(deadline: Duration) -> Self {
        Executor { deadline }
    }

    /// Run `tool.implementation` with `args` bound to `arg0..argN` and the
    /// script's final expression converted back to JSON. Compilation and
    /// execution failures are reported identically as unsuccessful results.
    pub fn execute(&self, tool: &ToolSpec, args: &[serde_json::Value]) -> ToolResult {
        let engine = self.build_engine();

        let mut scope = Scope::new();
        for (i, value) in args.iter().enumerate() {
            let dynamic = match rhai::serde::to_dynamic(value) {
                Ok(d) => d,
                Err(err) => {
                    return ToolResult::err(format!(
                        "tool '{}': argument arg{} is not bindable: {}",
                        tool.name, i, err
                    ));
                }
            };
            scope.push_dynamic(format!("arg{i}"), dynamic);
        }

        match engine.eval_with_scope::<Dynamic>(&mut scope, &tool.implementation) {
            Ok(value) => match rhai::serde::from_dynamic::<serde_json::Value>(&value) {
                Ok(json) => ToolResult::ok(json),
                Err(err) => ToolResult::err(format!(
                    "tool '{}' produced a value that cannot be serialized: {}",
                    tool.name, err
                )),
            },
            Err(err) => {
                if matches!(*err, EvalAltResult::ErrorTerminated(..)) {
                    ToolResult::err(format!(
                        "tool '{}' exceeded the {}s execution deadline",
                        tool.name,
                        self.deadline.as_secs_f64()
                    ))
                } else {
                    ToolResult::err(format!("tool '{}' failed: {}", tool.name, err))
                }
            }
        }
    }

    /// A fresh engine per invocation: execution state never leaks between
    /// tools, and the progress hook carries this invocation's deadline.
    fn build_engine(&self) -> Engine {
        let mut engine = Engine::new();
        engine.set_max_expr_depths(MAX_EXPR_DEPTH, MAX_EXPR_DEPTH);
        engine.set_max_call_levels(MAX_CALL_LEVELS);

        let deadline = Instant::now() + self.deadline;
        engine.on_progress(move |_| {
            if Instant::now() > deadline {
                Some(Dynamic::UNIT)
            } else {
                None
            }
        });

        register_host_functions(&mut engine);
        engine
    }
}

/// Host capabilities every tool script can call. These back the built-in
/// tools and are available to generated tools as well; side effects are
/// unconstrained by design.
fn register_host_functions(engine: &mut Engine) {
    engine.register_fn(
        "read_file",
        |path: &str| -> Result<String, Box<EvalAltResult>> {
            fs::read_to_string(path).map_err(|e| format!("read_file({path}): {e}").into())
        },
    );

    engine.register_fn(
        "write_file",
        |path: &str, content: &str| -> Result<(), Box<EvalAltResult>> {
            fs::write(path, content).map_err(|e| format!("write_file({path}): {e}").into())
        },
    );

    engine.register_fn(
        "list_dir",
        |path: &str| -> Result<rhai::Array, Box<EvalAltResult>> {
            let entries = fs::read_dir(path)
                .map_err(|e| Into::<Box<EvalAltResult>>::into(format!("list_dir({path}): {e}")))?;

            let mut names: Vec<String> = Vec::new();
            for entry in entries {
                let entry =
                    entry.map_err(|e| Into::<Box<EvalAltResult>>::into(format!("list_dir({path}): {e}")))?;
                names.push(entry.file_name().to_string_lossy().to_string());
            }
            names.sort();
            Ok(names.into_iter().map(Dynamic::from).collect())
        },
    );
}
