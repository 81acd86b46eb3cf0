//! Source-agnostic normalization entry point and shared payload helpers.
//!
//! Each platform gets a [`SourceAdapter`]; the [`Normalizer`] dispatches a raw
//! payload to the adapter registered for its [`EventSource`].

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tracing::debug;

use crate::error::{EventError, EventResult};
use crate::models::{EventSource, NormalizedTicketEvent};
use crate::task_tracker::TaskTrackerAdapter;
use crate::ticketing::TicketingAdapter;

/// Translates one platform's webhook payload into the canonical event.
pub trait SourceAdapter: Send + Sync {
    /// The platform this adapter understands.
    fn source(&self) -> EventSource;

    /// Normalize a raw payload, failing when `ticket.id` or the event type cannot be derived.
    fn normalize(&self, payload: &Value) -> EventResult<NormalizedTicketEvent>;
}

/// Dispatches raw payloads to the matching adapter.
pub struct Normalizer {
    ticketing: TicketingAdapter,
    task_tracker: TaskTrackerAdapter,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            ticketing: TicketingAdapter::new(),
            task_tracker: TaskTrackerAdapter::new(),
        }
    }

    /// Adapter for a given source.
    pub fn adapter(&self, source: EventSource) -> &dyn SourceAdapter {
        match source {
            EventSource::Ticketing => &self.ticketing,
            EventSource::TaskTracker => &self.task_tracker,
        }
    }

    /// Normalize an already-parsed payload.
    pub fn normalize(&self, source: EventSource, payload: &Value) -> EventResult<NormalizedTicketEvent> {
        let event = self.adapter(source).normalize(payload)?;
        debug!(
            "Normalized {} event {} ({}) for ticket {}",
            source, event.id, event.event_type, event.ticket.id
        );
        Ok(event)
    }

    /// Parse a raw request body and normalize it.
    pub fn from_json_str(&self, source: EventSource, body: &str) -> EventResult<NormalizedTicketEvent> {
        let payload: Value = serde_json::from_str(body)?;
        self.normalize(source, &payload)
    }
}

/// Walk a dotted path (`ticket.requester.id`) through nested objects.
pub(crate) fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

/// First non-empty string found at any of the paths. Numbers and booleans are stringified.
pub(crate) fn text(value: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| match lookup(value, path)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Parse a timestamp given either as RFC 3339 text or as epoch milliseconds (number or digits).
pub(crate) fn timestamp(value: &Value, paths: &[&str]) -> Option<DateTime<Utc>> {
    paths.iter().find_map(|path| match lookup(value, path)? {
        Value::Number(n) => n.as_i64().and_then(from_millis),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(ms) = s.parse::<i64>() {
                from_millis(ms)
            } else {
                DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            }
        }
        _ => None,
    })
}

fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

/// Collect tags from an array of strings or `{ "name": ... }` objects, lowercased.
pub(crate) fn tags(value: Option<&Value>) -> BTreeSet<String> {
    let Some(Value::Array(items)) = value else {
        return BTreeSet::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.as_str()),
            Value::Object(_) => item.get("name").and_then(Value::as_str),
            _ => None,
        })
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Guarantee non-empty subject and description.
///
/// The subject falls back to the first description line, then to `Ticket <id>`;
/// the description falls back to the subject.
pub(crate) fn fill_text(
    ticket_id: &str,
    subject: Option<String>,
    description: Option<String>,
) -> (String, String) {
    let subject = subject
        .or_else(|| {
            description.as_deref().and_then(|d| {
                d.lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| format!("Ticket {}", ticket_id));
    let description = description.unwrap_or_else(|| subject.clone());
    (subject, description)
}
