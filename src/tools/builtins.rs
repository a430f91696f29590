//! Built-in Tools
//!
//! The seed set every fresh registry starts from. Each built-in is an
//! ordinary `ToolSpec` whose one-line script body calls a host function
//! the executor registers into every engine.

use crate::types::ToolSpec;

/// Create the built-in tool set, in a fixed order.
pub fn builtin_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "read_file".to_string(),
            description: "Read a text file. arg0: file path. Returns the file contents as a string.".to_string(),
            implementation: "read_file(arg0)".to_string(),
        },
        ToolSpec {
            name: "write_file".to_string(),
            description: "Write a text file. arg0: file path, arg1: content. Returns true on success.".to_string(),
            implementation: "write_file(arg0, arg1); true".to_string(),
        },
        ToolSpec {
            name: "list_dir".to_string(),
            description: "List a directory. arg0: directory path (use \".\" for the current directory). Returns the entry names as an array.".to_string(),
            implementation: "list_dir(arg0)".to_string(),
        },
    ]
}
