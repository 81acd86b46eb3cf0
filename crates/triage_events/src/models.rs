//! Canonical ticket event model.
//!
//! Every inbound webhook, whatever platform it comes from, is translated into a
//! [`NormalizedTicketEvent`] before it reaches the routing engine.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EventError;

/// Platform an inbound event originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Helpdesk / ticketing system
    Ticketing,
    /// Task tracker (work items)
    TaskTracker,
}

impl EventSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSource::Ticketing => "ticketing",
            EventSource::TaskTracker => "task_tracker",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![EventSource::Ticketing, EventSource::TaskTracker]
    }
}

impl std::fmt::Display for EventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EventSource {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "ticketing" | "helpdesk" => Ok(EventSource::Ticketing),
            "task_tracker" | "tasks" => Ok(EventSource::TaskTracker),
            other => Err(EventError::UnknownSource(other.to_string())),
        }
    }
}

/// Canonical ticket status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    New,
    #[default]
    Open,
    Pending,
    OnHold,
    Solved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "new",
            TicketStatus::Open => "open",
            TicketStatus::Pending => "pending",
            TicketStatus::OnHold => "on_hold",
            TicketStatus::Solved => "solved",
            TicketStatus::Closed => "closed",
        }
    }

    /// Whether the ticket no longer needs work.
    pub fn is_resolved(&self) -> bool {
        matches!(self, TicketStatus::Solved | TicketStatus::Closed)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority levels shared by tickets and agent analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// Parse a priority label, returning `None` for unrecognized values.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "normal" | "medium" => Some(Priority::Normal),
            "high" => Some(Priority::High),
            "urgent" | "critical" => Some(Priority::Urgent),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source-agnostic ticket fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub subject: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: Priority,
    pub tags: BTreeSet<String>,
    pub requester_id: Option<String>,
    pub assignee_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Create a ticket with the given id, subject and description.
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            description: description.into(),
            status: TicketStatus::default(),
            priority: Priority::default(),
            tags: BTreeSet::new(),
            requester_id: None,
            assignee_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into().to_lowercase());
        self
    }

    /// Lowercased `subject + " " + description`, the text agents match keywords against.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.subject, self.description).to_lowercase()
    }
}

/// Canonical event consumed by the routing engine.
///
/// Created once per inbound webhook and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTicketEvent {
    pub id: String,
    pub source: EventSource,
    pub event_type: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub ticket: Ticket,
}

impl NormalizedTicketEvent {
    /// Build an event directly from a ticket, stamped with the current time.
    pub fn new(source: EventSource, event_type: impl Into<String>, ticket: Ticket) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source,
            event_type: event_type.into(),
            timestamp: Utc::now().timestamp_millis(),
            ticket,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}
