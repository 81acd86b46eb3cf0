//! Project manager agent.
//!
//! Besides planning tickets, this is the coordinator role: tickets no specialist
//! qualifies for land here and receive a generic triage analysis.

use async_trait::async_trait;

use triage_events::{Priority, Ticket};

use crate::error::AgentResult;
use crate::roles::{AgentCapability, AgentRole};
use crate::rules::{analysis_from_rule, classify, handoff_target, ClassificationRule, HandoffTrigger};
use crate::traits::{Agent, AgentAnalysis, Complexity};

const RULES: &[ClassificationRule] = &[
    ClassificationRule {
        name: "deadline risk",
        keywords: &["deadline", "overdue", "asap", "behind schedule", "launch date"],
        complexity: Complexity::Medium,
        priority: Priority::High,
        estimated_time: "1-2 hours",
        actions: &[
            "Confirm the committed date with the client",
            "Re-plan remaining work against the deadline",
        ],
    },
    ClassificationRule {
        name: "planning request",
        keywords: &["timeline", "milestone", "roadmap", "planning", "estimate", "budget", "scope"],
        complexity: Complexity::Medium,
        priority: Priority::Normal,
        estimated_time: "2-4 hours",
        actions: &[
            "Break the request into milestones",
            "Share a timeline and budget estimate",
        ],
    },
    ClassificationRule {
        name: "coordination",
        keywords: &["meeting", "coordination", "status update", "handover", "project"],
        complexity: Complexity::Simple,
        priority: Priority::Normal,
        estimated_time: "30-60 minutes",
        actions: &["Schedule a sync with the people involved"],
    },
];

/// Generic triage outcome for tickets nobody else claimed.
const FALLBACK: ClassificationRule = ClassificationRule {
    name: "general triage",
    keywords: &[],
    complexity: Complexity::Simple,
    priority: Priority::Normal,
    estimated_time: "1-2 hours",
    actions: &[
        "Review ticket details and assign an owner",
        "Request additional context from the requester",
    ],
};

const HANDOFFS: &[HandoffTrigger] = &[
    HandoffTrigger {
        keywords: &["requirements gathering", "user stories", "business case"],
        target: AgentRole::BusinessAnalyst,
    },
    HandoffTrigger {
        keywords: &["release plan", "deployment schedule"],
        target: AgentRole::DevOps,
    },
];

const HANDOFF_CUES: &[HandoffTrigger] = &[HandoffTrigger {
    keywords: &["acceptance testing", "comprehensive testing"],
    target: AgentRole::QaTester,
}];

/// Coordinator and fallback agent.
pub struct ProjectManagerAgent {
    capability: AgentCapability,
}

impl ProjectManagerAgent {
    pub fn new(capability: AgentCapability) -> Self {
        Self { capability }
    }
}

#[async_trait]
impl Agent for ProjectManagerAgent {
    fn capability(&self) -> &AgentCapability {
        &self.capability
    }

    async fn analyze(&self, ticket: &Ticket) -> AgentResult<AgentAnalysis> {
        let text = ticket.searchable_text();
        let rule = classify(&text, RULES, &FALLBACK);

        Ok(analysis_from_rule(&self.capability, ticket, &text, rule)
            .with_next_agent(handoff_target(&text, HANDOFFS, self.role())))
    }

    fn should_handoff(&self, ticket: &Ticket) -> Option<AgentRole> {
        handoff_target(&ticket.searchable_text(), HANDOFF_CUES, self.role())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::CapabilityRegistry;

    fn agent() -> ProjectManagerAgent {
        let registry = CapabilityRegistry::standard();
        ProjectManagerAgent::new(registry.get(AgentRole::ProjectManager).unwrap().clone())
    }

    #[tokio::test]
    async fn test_unrecognized_ticket_gets_generic_triage() {
        let ticket = Ticket::new("1", "Thanks for the great support", "see you next week");
        let analysis = agent().analyze(&ticket).await.unwrap();

        assert_eq!(analysis.complexity, Complexity::Simple);
        assert!(analysis.summary.contains("general triage"));
        assert_eq!(analysis.recommended_actions.len(), 2);
        assert!(analysis.next_agent.is_none());
        assert!(agent().should_handoff(&ticket).is_none());
        assert!(!agent().can_handle(&ticket));
    }

    #[tokio::test]
    async fn test_deadline_risk_raises_priority() {
        let ticket = Ticket::new("2", "Launch date slipping", "we are behind schedule");
        let analysis = agent().analyze(&ticket).await.unwrap();

        assert_eq!(analysis.priority, Priority::High);
    }

    #[tokio::test]
    async fn test_user_stories_go_to_analyst() {
        let ticket = Ticket::new("3", "Project kickoff", "we need user stories first");
        let analysis = agent().analyze(&ticket).await.unwrap();

        assert_eq!(analysis.next_agent, Some(AgentRole::BusinessAnalyst));
    }
}
