//! # triage_events
//!
//! Canonical event model and source adapters for the triage routing engine.
//!
//! Inbound webhooks arrive in platform-specific shapes. This crate turns them
//! into a single [`NormalizedTicketEvent`] that the orchestrator consumes.
//!
//! ## Sources
//!
//! | Source | Adapter | Event names |
//! |--------|---------|-------------|
//! | Helpdesk | [`TicketingAdapter`] | `ticket.created`, `ticket.status_changed`, ... |
//! | Task tracker | [`TaskTrackerAdapter`] | `taskCreated` → `task.created`, ... |
//!
//! ## Example
//!
//! ```rust
//! use triage_events::{EventSource, Normalizer};
//!
//! let body = r#"{"type":"ticket.created","ticket":{"id":1,"subject":"Site down"}}"#;
//! let event = Normalizer::new().from_json_str(EventSource::Ticketing, body).unwrap();
//! assert_eq!(event.ticket.id, "1");
//! assert_eq!(event.ticket.description, "Site down");
//! ```

pub mod error;
pub mod models;
pub mod normalizer;
pub mod task_tracker;
pub mod ticketing;

pub use error::{EventError, EventResult};
pub use models::*;
pub use normalizer::{Normalizer, SourceAdapter};
pub use task_tracker::TaskTrackerAdapter;
pub use ticketing::TicketingAdapter;
