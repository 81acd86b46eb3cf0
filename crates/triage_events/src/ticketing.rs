//! Adapter for helpdesk (ticketing system) webhooks.
//!
//! Expected shape (ids may be numbers or strings):
//!
//! ```json
//! {
//!   "id": "evt-1",
//!   "type": "ticket.created",
//!   "timestamp": "2024-03-01T10:00:00Z",
//!   "ticket": {
//!     "id": 1234, "subject": "...", "description": "...",
//!     "status": "open", "priority": "high", "tags": ["vip"],
//!     "requester_id": 1, "assignee_id": 2,
//!     "created_at": "...", "updated_at": "..."
//!   }
//! }
//! ```

use chrono::Utc;
use serde_json::Value;

use crate::error::{EventError, EventResult};
use crate::models::{EventSource, NormalizedTicketEvent, Priority, Ticket, TicketStatus};
use crate::normalizer::{fill_text, lookup, tags, text, timestamp, SourceAdapter};

/// Normalizes helpdesk ticket events.
#[derive(Debug, Default, Clone)]
pub struct TicketingAdapter;

impl TicketingAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Map a helpdesk status label; unknown labels become [`TicketStatus::Open`].
    pub fn map_status(label: Option<&str>) -> TicketStatus {
        match label.map(|l| l.trim().to_lowercase()).as_deref() {
            Some("new") => TicketStatus::New,
            Some("open") => TicketStatus::Open,
            Some("pending") => TicketStatus::Pending,
            Some("hold") | Some("on-hold") | Some("on_hold") => TicketStatus::OnHold,
            Some("solved") => TicketStatus::Solved,
            Some("closed") => TicketStatus::Closed,
            _ => TicketStatus::Open,
        }
    }
}

impl SourceAdapter for TicketingAdapter {
    fn source(&self) -> EventSource {
        EventSource::Ticketing
    }

    fn normalize(&self, payload: &Value) -> EventResult<NormalizedTicketEvent> {
        let source = self.source();

        if lookup(payload, "ticket").map_or(true, |t| !t.is_object()) {
            return Err(EventError::normalization(source, "payload has no ticket object"));
        }

        let event_type = text(payload, &["type", "event_type", "event"])
            .ok_or_else(|| EventError::missing_field(source, "type"))?;
        let ticket_id = text(payload, &["ticket.id"])
            .ok_or_else(|| EventError::missing_field(source, "ticket.id"))?;

        let (subject, description) = fill_text(
            &ticket_id,
            text(payload, &["ticket.subject", "ticket.title"]),
            text(payload, &["ticket.description", "ticket.comment.body"]),
        );

        let status = Self::map_status(text(payload, &["ticket.status"]).as_deref());
        let priority = text(payload, &["ticket.priority"])
            .and_then(|p| Priority::parse(&p))
            .unwrap_or_default();

        let created_at = timestamp(payload, &["ticket.created_at"]);
        let updated_at = timestamp(payload, &["ticket.updated_at"]);

        let ticket = Ticket {
            id: ticket_id,
            subject,
            description,
            status,
            priority,
            tags: tags(lookup(payload, "ticket.tags")),
            requester_id: text(payload, &["ticket.requester_id", "ticket.requester.id"]),
            assignee_id: text(payload, &["ticket.assignee_id", "ticket.assignee.id"]),
            created_at,
            updated_at,
        };

        let event_time = timestamp(payload, &["timestamp", "created_at"])
            .or(updated_at)
            .unwrap_or_else(Utc::now);

        Ok(NormalizedTicketEvent {
            id: text(payload, &["id", "event_id"]).unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            source,
            event_type: event_type.to_lowercase(),
            timestamp: event_time.timestamp_millis(),
            ticket,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "id": "evt-100",
            "type": "ticket.created",
            "timestamp": "2024-03-01T10:00:00Z",
            "ticket": {
                "id": 1234,
                "subject": "WordPress plugin conflict",
                "description": "Checkout errors on WooCommerce",
                "status": "open",
                "priority": "high",
                "tags": ["VIP", "billing"],
                "requester_id": 11,
                "assignee_id": "22",
                "created_at": "2024-03-01T09:00:00Z",
                "updated_at": "2024-03-01T09:30:00Z"
            }
        })
    }

    #[test]
    fn test_normalize_full_payload() {
        let event = TicketingAdapter::new().normalize(&sample_payload()).unwrap();

        assert_eq!(event.id, "evt-100");
        assert_eq!(event.source, EventSource::Ticketing);
        assert_eq!(event.event_type, "ticket.created");
        assert_eq!(event.timestamp, 1709287200000);
        assert_eq!(event.ticket.id, "1234");
        assert_eq!(event.ticket.status, TicketStatus::Open);
        assert_eq!(event.ticket.priority, Priority::High);
        assert_eq!(event.ticket.requester_id.as_deref(), Some("11"));
        assert_eq!(event.ticket.assignee_id.as_deref(), Some("22"));
        assert!(event.ticket.tags.contains("vip"));
        assert!(event.ticket.created_at.is_some());
    }

    #[test]
    fn test_unknown_status_maps_to_default() {
        let mut payload = sample_payload();
        payload["ticket"]["status"] = json!("escalated-to-mars");
        payload["ticket"]["priority"] = json!("someday");

        let event = TicketingAdapter::new().normalize(&payload).unwrap();
        assert_eq!(event.ticket.status, TicketStatus::Open);
        assert_eq!(event.ticket.priority, Priority::Normal);
    }

    #[test]
    fn test_missing_ticket_id_fails() {
        let mut payload = sample_payload();
        payload["ticket"].as_object_mut().unwrap().remove("id");

        let err = TicketingAdapter::new().normalize(&payload).unwrap_err();
        assert!(matches!(err, EventError::MissingField { ref field, .. } if field == "ticket.id"));
    }

    #[test]
    fn test_missing_event_type_fails() {
        let mut payload = sample_payload();
        payload.as_object_mut().unwrap().remove("type");

        let err = TicketingAdapter::new().normalize(&payload).unwrap_err();
        assert!(matches!(err, EventError::MissingField { ref field, .. } if field == "type"));
    }

    #[test]
    fn test_missing_ticket_object_fails() {
        let payload = json!({ "type": "ticket.created" });
        let err = TicketingAdapter::new().normalize(&payload).unwrap_err();
        assert!(matches!(err, EventError::Normalization { .. }));
    }

    #[test]
    fn test_missing_text_is_filled() {
        let payload = json!({
            "type": "ticket.updated",
            "ticket": { "id": "9", "description": "Site is down" }
        });

        let event = TicketingAdapter::new().normalize(&payload).unwrap();
        assert_eq!(event.ticket.subject, "Site is down");
        assert_eq!(event.ticket.description, "Site is down");
        assert!(!event.id.is_empty());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(TicketingAdapter::map_status(Some("hold")), TicketStatus::OnHold);
        assert_eq!(TicketingAdapter::map_status(Some("Solved")), TicketStatus::Solved);
        assert_eq!(TicketingAdapter::map_status(None), TicketStatus::Open);
    }
}
