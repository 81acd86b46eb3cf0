//! # triage_core
//!
//! Routing engine for support tickets.
//!
//! This crate selects the agent for a normalized ticket event, lets agents hand
//! the ticket to one another under bounded conditions, and tracks every run as a
//! workflow execution with aggregate metrics.
//!
//! # Architecture
//!
//! - **Selector**: scores agents by weighted keyword overlap above a confidence floor
//! - **Handoff controller**: stops chains on cycles, depth, timeouts or no suggestion
//! - **Execution**: forward-only state machine recording visited agents and analyses
//! - **Orchestrator**: drives the loop, aggregates recommendations, updates metrics
//!
//! # Example
//!
//! ```rust,no_run
//! use triage_core::{Orchestrator, RoutingConfig};
//! use triage_events::{EventSource, Normalizer};
//!
//! # async fn run(body: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Orchestrator::new(RoutingConfig::default())?;
//! let event = Normalizer::new().from_json_str(EventSource::Ticketing, body)?;
//!
//! let result = orchestrator.process_webhook_event(event).await;
//! println!("{} -> {:?}", result.status, result.agents_involved);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod execution;
pub mod handoff;
pub mod metrics;
pub mod orchestrator;
pub mod selector;

// Re-export main types for convenience
pub use config::{
    AgentOverride, RoutingConfig, DEFAULT_CONFIDENCE_FLOOR, DEFAULT_FALLBACK_ROLE,
    DEFAULT_MAX_HANDOFFS, DEFAULT_WORKFLOW_ID,
};
pub use error::{CoreError, CoreResult};
pub use execution::{ExecutionStatus, ProcessingResult, WorkflowExecution};
pub use handoff::{HandoffController, HandoffDecision, StopReason};
pub use metrics::{MetricsRecorder, WorkflowMetrics};
pub use orchestrator::{Dispatched, Orchestrator};
pub use selector::{AgentSelector, CandidateScore};
