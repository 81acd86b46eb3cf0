//! Shared helpers for orchestrator integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use triage_agents::{
    Agent, AgentAnalysis, AgentCapability, AgentError, AgentRegistry, AgentResult, AgentRole,
    CapabilityRegistry, Complexity,
};
use triage_core::{Orchestrator, RoutingConfig};
use triage_events::{EventSource, NormalizedTicketEvent, Priority, Ticket};

/// Ticket text that selects the software engineer (4 of 10 keywords).
pub const ENGINEERING_TEXT: &str = "API database backend code";

pub fn event(subject: &str, description: &str) -> NormalizedTicketEvent {
    NormalizedTicketEvent::new(
        EventSource::Ticketing,
        "ticket.created",
        Ticket::new("T-1", subject, description),
    )
}

/// Agent with scripted behaviour.
pub struct StubAgent {
    capability: AgentCapability,
    next: Option<AgentRole>,
    cue: Option<AgentRole>,
    delay: Option<Duration>,
    failure: Option<String>,
    report_as: Option<AgentRole>,
    panic: Option<String>,
}

impl StubAgent {
    pub fn new(role: AgentRole) -> Self {
        let capability = CapabilityRegistry::standard()
            .get(role)
            .expect("standard capability")
            .clone();
        Self {
            capability,
            next: None,
            cue: None,
            delay: None,
            failure: None,
            report_as: None,
            panic: None,
        }
    }

    /// `next_agent` returned by `analyze`.
    pub fn next(mut self, role: AgentRole) -> Self {
        self.next = Some(role);
        self
    }

    /// Suggestion returned by `should_handoff`.
    pub fn cue(mut self, role: AgentRole) -> Self {
        self.cue = Some(role);
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn budget_ms(mut self, ms: u64) -> Self {
        self.capability = self.capability.with_max_processing_time_ms(ms);
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn report_as(mut self, role: AgentRole) -> Self {
        self.report_as = Some(role);
        self
    }

    /// Panic inside `analyze`.
    pub fn panicking(mut self, message: &str) -> Self {
        self.panic = Some(message.to_string());
        self
    }
}

#[async_trait]
impl Agent for StubAgent {
    fn capability(&self) -> &AgentCapability {
        &self.capability
    }

    async fn analyze(&self, _ticket: &Ticket) -> AgentResult<AgentAnalysis> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.panic {
            panic!("{}", message);
        }
        if let Some(message) = &self.failure {
            return Err(AgentError::execution_failed(self.role(), message.clone()));
        }
        let role = self.report_as.unwrap_or(self.role());
        Ok(
            AgentAnalysis::new(role, Complexity::Simple, Priority::Normal)
                .with_confidence(0.9)
                .with_action(format!("{} follow-up", self.role()))
                .with_action("Notify the requester")
                .with_next_agent(self.next),
        )
    }

    fn should_handoff(&self, _ticket: &Ticket) -> Option<AgentRole> {
        self.cue
    }
}

/// Standard agents with the given stubs registered over them.
pub fn registry_with(stubs: Vec<StubAgent>) -> AgentRegistry {
    let mut registry =
        AgentRegistry::standard(&CapabilityRegistry::standard()).expect("standard registry");
    for stub in stubs {
        registry.register(Arc::new(stub));
    }
    registry
}

pub fn orchestrator_with(config: RoutingConfig, stubs: Vec<StubAgent>) -> Orchestrator {
    Orchestrator::with_agents(config, CapabilityRegistry::standard(), registry_with(stubs))
        .expect("orchestrator")
}
