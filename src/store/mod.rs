//! Persistent State
//!
//! Two single-writer files carry all state across restarts: the history
//! file (conversation turns) and the tool registry file (the seed the
//! registry is rebuilt from on the next start).

pub mod history;
pub mod tool_store;

pub use history::HistoryStore;
