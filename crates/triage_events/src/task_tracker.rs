//! Adapter for task tracker webhooks.
//!
//! Task trackers send camelCase event names (`taskCreated`) and nest the work
//! item under `task`. Statuses and priorities come either as plain values or as
//! `{ "status": ... }` / `{ "priority": ... }` objects.

use chrono::Utc;
use regex::Regex;
use serde_json::Value;

use crate::error::{EventError, EventResult};
use crate::models::{EventSource, NormalizedTicketEvent, Priority, Ticket, TicketStatus};
use crate::normalizer::{fill_text, lookup, tags, text, timestamp, SourceAdapter};

/// Normalizes task tracker events.
#[derive(Debug, Default, Clone)]
pub struct TaskTrackerAdapter;

impl TaskTrackerAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Canonical event type for a task tracker event name.
    ///
    /// `taskCreated` → `task.created`, `taskStatusUpdated` → `task.status_changed`,
    /// anything else → `task.<snake_case>`.
    pub fn event_type(raw: &str) -> String {
        let snake = if let Ok(re) = Regex::new(r"([a-z0-9])([A-Z])") {
            re.replace_all(raw.trim(), "${1}_${2}").to_lowercase()
        } else {
            raw.trim().to_lowercase()
        };
        let snake = snake.replace([' ', '-', '.'], "_");
        let name = snake.strip_prefix("task_").unwrap_or(&snake);

        match name {
            "status_updated" => "task.status_changed".to_string(),
            other => format!("task.{}", other),
        }
    }

    /// Map a task status label; unknown labels become [`TicketStatus::Open`].
    pub fn map_status(label: Option<&str>) -> TicketStatus {
        match label.map(|l| l.trim().to_lowercase()).as_deref() {
            Some("to do") | Some("todo") | Some("open") => TicketStatus::Open,
            Some("in progress") | Some("review") => TicketStatus::Pending,
            Some("blocked") => TicketStatus::OnHold,
            Some("complete") | Some("done") | Some("closed") => TicketStatus::Closed,
            _ => TicketStatus::Open,
        }
    }

    /// Map a task priority. Numeric priorities run 1 (urgent) to 4 (low).
    pub fn map_priority(value: Option<&Value>) -> Priority {
        let value = match value {
            Some(Value::Object(_)) => value.and_then(|v| v.get("priority")),
            other => other,
        };

        match value {
            Some(Value::Number(n)) => match n.as_u64() {
                Some(1) => Priority::Urgent,
                Some(2) => Priority::High,
                Some(3) => Priority::Normal,
                Some(4) => Priority::Low,
                _ => Priority::Normal,
            },
            Some(Value::String(s)) => match s.trim().parse::<u64>() {
                Ok(n) => Self::map_priority(Some(&Value::from(n))),
                Err(_) => Priority::parse(s).unwrap_or_default(),
            },
            _ => Priority::Normal,
        }
    }
}

impl SourceAdapter for TaskTrackerAdapter {
    fn source(&self) -> EventSource {
        EventSource::TaskTracker
    }

    fn normalize(&self, payload: &Value) -> EventResult<NormalizedTicketEvent> {
        let source = self.source();

        let raw_event = text(payload, &["event", "event_type"])
            .ok_or_else(|| EventError::missing_field(source, "event"))?;
        let task_id = text(payload, &["task.id", "task_id"])
            .ok_or_else(|| EventError::missing_field(source, "task.id"))?;

        let (subject, description) = fill_text(
            &task_id,
            text(payload, &["task.name", "task.title"]),
            text(payload, &["task.description", "task.text_content"]),
        );

        let status = match lookup(payload, "task.status") {
            Some(Value::Object(_)) => text(payload, &["task.status.status"]),
            _ => text(payload, &["task.status"]),
        };

        let assignee_id = match lookup(payload, "task.assignees") {
            Some(Value::Array(items)) => items.first().and_then(|a| text(a, &["id"])),
            _ => None,
        };

        let created_at = timestamp(payload, &["task.date_created"]);
        let updated_at = timestamp(payload, &["task.date_updated"]);

        let ticket = Ticket {
            id: task_id,
            subject,
            description,
            status: Self::map_status(status.as_deref()),
            priority: Self::map_priority(lookup(payload, "task.priority")),
            tags: tags(lookup(payload, "task.tags")),
            requester_id: text(payload, &["task.creator.id", "task.creator"]),
            assignee_id,
            created_at,
            updated_at,
        };

        let event_time = timestamp(payload, &["timestamp", "date"])
            .or(updated_at)
            .unwrap_or_else(Utc::now);

        Ok(NormalizedTicketEvent {
            id: text(payload, &["webhook_id", "id"]).unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            source,
            event_type: Self::event_type(&raw_event),
            timestamp: event_time.timestamp_millis(),
            ticket,
        })
    }
}
