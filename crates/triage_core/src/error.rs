//! Error types for the core module.

use thiserror::Error;

use triage_agents::AgentError;
use triage_events::EventError;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur during core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid workflow state: {0}")]
    InvalidState(String),

    #[error("Orchestration failed: {0}")]
    Orchestration(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Event error: {0}")]
    Event(#[from] EventError),
}
