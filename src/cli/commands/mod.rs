//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod card;
pub mod completions;
pub mod config;
pub mod mine;

// Re-export argument types for use in mod.rs
pub use card::CardArgs;
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use mine::MineArgs;
