//! Agent Core
//!
//! The conversation driver, the completion orchestrator, and the system
//! prompt builder.

pub mod driver;
pub mod orchestrator;
pub mod system_prompt;

pub use driver::{Driver, TurnOutcome};
pub use orchestrator::Orchestrator;
