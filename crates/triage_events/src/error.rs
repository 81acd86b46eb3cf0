//! Error types for the events module.

use thiserror::Error;

use crate::models::EventSource;

/// Result type alias for event operations.
pub type EventResult<T> = Result<T, EventError>;

/// Errors that can occur while normalizing inbound webhook payloads.
#[derive(Error, Debug)]
pub enum EventError {
    #[error("Normalization failed for {source_kind} payload: {message}")]
    Normalization {
        source_kind: EventSource,
        message: String,
    },

    #[error("Missing required field in {source_kind} payload: {field}")]
    MissingField {
        source_kind: EventSource,
        field: String,
    },

    #[error("Unknown event source: {0}")]
    UnknownSource(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EventError {
    /// Create a normalization error.
    pub fn normalization(source_kind: EventSource, message: impl Into<String>) -> Self {
        Self::Normalization {
            source_kind,
            message: message.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(source_kind: EventSource, field: impl Into<String>) -> Self {
        Self::MissingField {
            source_kind,
            field: field.into(),
        }
    }

    /// Whether the error stems from the payload itself (client error at the route boundary).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::UnknownSource(_))
    }
}
