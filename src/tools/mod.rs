//! Tool System
//!
//! The registry of named tools, the built-in seed set, and the dynamic
//! executor that turns a tool's script body into a value.

pub mod builtins;
pub mod executor;
pub mod registry;

pub use executor::Executor;
pub use registry::ToolRegistry;
