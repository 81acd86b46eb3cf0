//! Error types for agents module.

use thiserror::Error;

use crate::roles::AgentRole;

/// Result type alias for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;

/// Errors that can occur during agent operations.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Agent not found: {0}")]
    NotFound(AgentRole),

    #[error("Unknown agent role: {0}")]
    UnknownRole(String),

    #[error("Invalid capability table: {0}")]
    InvalidCapability(String),

    #[error("Agent execution failed: {agent} - {message}")]
    ExecutionFailed { agent: AgentRole, message: String },

    #[error("Agent {role} exceeded its {budget_ms}ms processing budget")]
    Timeout { role: AgentRole, budget_ms: u64 },

    #[error("Audit trail error: {0}")]
    Audit(String),
}

impl AgentError {
    /// Create an execution failed error.
    pub fn execution_failed(agent: AgentRole, message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            agent,
            message: message.into(),
        }
    }

    /// Whether this is a per-step timeout rather than a hard failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
