//! Software engineer agent for custom code, APIs, data and defects.

use async_trait::async_trait;

use triage_events::{Priority, Ticket};

use crate::error::AgentResult;
use crate::roles::{AgentCapability, AgentRole};
use crate::rules::{analysis_from_rule, classify, handoff_target, ClassificationRule, HandoffTrigger};
use crate::traits::{Agent, AgentAnalysis, Complexity};

// Security is checked before performance: a slow endpoint with an injection
// hole is a security ticket first.
const RULES: &[ClassificationRule] = &[
    ClassificationRule {
        name: "security defect",
        keywords: &["security", "vulnerability", "xss", "sql injection", "csrf", "exploit"],
        complexity: Complexity::Complex,
        priority: Priority::Urgent,
        estimated_time: "1-2 days",
        actions: &[
            "Assess exposure and patch the vulnerability",
            "Rotate any credentials that may be affected",
            "Add a regression test for the exploit path",
        ],
    },
    ClassificationRule {
        name: "performance problem",
        keywords: &["performance", "slow", "memory leak", "timeout", "latency"],
        complexity: Complexity::Complex,
        priority: Priority::High,
        estimated_time: "2-3 days",
        actions: &[
            "Profile the slow code path",
            "Review database queries and indexes",
        ],
    },
    ClassificationRule {
        name: "data modelling",
        keywords: &["database design", "schema", "migration script", "data model"],
        complexity: Complexity::Complex,
        priority: Priority::Normal,
        estimated_time: "2-4 days",
        actions: &[
            "Draft the data model and review it with stakeholders",
            "Plan the schema migration",
        ],
    },
    ClassificationRule {
        name: "api or integration work",
        keywords: &["api", "integration", "webhook", "endpoint", "sdk"],
        complexity: Complexity::Medium,
        priority: Priority::Normal,
        estimated_time: "1-2 days",
        actions: &[
            "Define the API contract",
            "Implement the endpoint with input validation",
        ],
    },
    ClassificationRule {
        name: "defect",
        keywords: &["bug", "error", "exception", "crash", "broken"],
        complexity: Complexity::Medium,
        priority: Priority::High,
        estimated_time: "4-8 hours",
        actions: &[
            "Reproduce the defect locally",
            "Write a failing test before fixing",
        ],
    },
];

const FALLBACK: ClassificationRule = ClassificationRule {
    name: "engineering review",
    keywords: &[],
    complexity: Complexity::Simple,
    priority: Priority::Normal,
    estimated_time: "2-4 hours",
    actions: &["Review the code paths mentioned in the ticket"],
};

const HANDOFFS: &[HandoffTrigger] = &[
    HandoffTrigger {
        keywords: &["deploy", "ci/cd", "docker", "infrastructure", "kubernetes"],
        target: AgentRole::DevOps,
    },
    HandoffTrigger {
        keywords: &["test coverage", "regression suite", "test plan"],
        target: AgentRole::QaTester,
    },
];

const HANDOFF_CUES: &[HandoffTrigger] = &[
    HandoffTrigger {
        keywords: &["comprehensive testing", "qa sign-off"],
        target: AgentRole::QaTester,
    },
    HandoffTrigger {
        keywords: &["unclear requirements", "business rules"],
        target: AgentRole::BusinessAnalyst,
    },
];

/// Custom development and defect analysis agent.
pub struct SoftwareEngineerAgent {
    capability: AgentCapability,
}

impl SoftwareEngineerAgent {
    pub fn new(capability: AgentCapability) -> Self {
        Self { capability }
    }
}

#[async_trait]
impl Agent for SoftwareEngineerAgent {
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

    fn agent() -> SoftwareEngineerAgent {
        let registry = CapabilityRegistry::standard();
        SoftwareEngineerAgent::new(registry.get(AgentRole::SoftwareEngineer).unwrap().clone())
    }

    #[tokio::test]
    async fn test_security_wins_over_performance() {
        let ticket = Ticket::new("1", "Slow search page", "also found an XSS vulnerability");
        let analysis = agent().analyze(&ticket).await.unwrap();

        assert_eq!(analysis.complexity, Complexity::Complex);
        assert_eq!(analysis.priority, Priority::Urgent);
        assert!(analysis.summary.contains("security"));
    }

    #[tokio::test]
    async fn test_api_work_is_medium() {
        let ticket = Ticket::new("2", "Custom API development", "database design required");
        let analysis = agent().analyze(&ticket).await.unwrap();

        // Data modelling is listed before API work.
        assert_eq!(analysis.complexity, Complexity::Complex);
        assert!(analysis.next_agent.is_none());

        let ticket = Ticket::new("3", "Partner integration", "expose a webhook endpoint");
        let analysis = agent().analyze(&ticket).await.unwrap();
        assert_eq!(analysis.complexity, Complexity::Medium);
    }

    #[tokio::test]
    async fn test_deploy_mentions_hand_off_to_devops() {
        let ticket = Ticket::new("4", "Bug in checkout code", "fix and deploy to production");
        let analysis = agent().analyze(&ticket).await.unwrap();

        assert_eq!(analysis.next_agent, Some(AgentRole::DevOps));
        assert!(analysis.confidence > 0.5);
    }

    #[test]
    fn test_should_handoff_cues() {
        let ticket = Ticket::new("5", "Refactor billing", "needs comprehensive testing");
        assert_eq!(agent().should_handoff(&ticket), Some(AgentRole::QaTester));

        let ticket = Ticket::new("6", "Refactor billing", "straightforward");
        assert_eq!(agent().should_handoff(&ticket), None);
    }
}
