//! Toolsmith -- Self-Extending Conversational Agent
//!
//! A chat agent that forges new tools for itself at runtime, commits them
//! to its persisted registry, and restarts so the capability is permanent.

pub mod types;
pub mod error;
pub mod config;
pub mod provider;
pub mod tools;
pub mod store;
pub mod agent;
pub mod restart;
pub mod setup;
