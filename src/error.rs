//! Storage-Layer Errors
//!
//! The only failures that are candidates for fatal treatment. Tool and
//! completion failures are absorbed into `ToolResult` / fallback decisions
//! and never surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The persisted registry file exists but cannot be read. A commit
    /// against it would be rewriting an unknown seed, so the commit aborts.
    #[error("tool registry file {path} is unreadable: {source}")]
    SeedUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The persisted registry file exists but does not parse as a tool
    /// list. Same treatment: abort the commit, keep the old persisted set.
    #[error("tool registry file {path} is not a valid tool list: {source}")]
    SeedCorrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize tool list for {path}: {source}")]
    SeedSerialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to persist {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
