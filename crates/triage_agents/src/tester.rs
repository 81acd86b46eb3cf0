//! QA tester agent for reproduction, regression and automation tickets.

use async_trait::async_trait;

use triage_events::{Priority, Ticket};

use crate::error::AgentResult;
use crate::roles::{AgentCapability, AgentRole};
use crate::rules::{analysis_from_rule, classify, handoff_target, ClassificationRule, HandoffTrigger};
use crate::traits::{Agent, AgentAnalysis, Complexity};

const RULES: &[ClassificationRule] = &[
    ClassificationRule {
        name: "regression",
        keywords: &["regression", "used to work", "stopped working after"],
        complexity: Complexity::Medium,
        priority: Priority::High,
        estimated_time: "4-6 hours",
        actions: &[
            "Bisect releases to find where the regression started",
            "Add the scenario to the regression suite",
        ],
    },
    ClassificationRule {
        name: "test automation",
        keywords: &["automation", "test suite", "e2e", "end-to-end", "comprehensive testing"],
        complexity: Complexity::Complex,
        priority: Priority::Normal,
        estimated_time: "3-5 days",
        actions: &[
            "Define the test matrix and coverage goals",
            "Automate the critical user journeys",
        ],
    },
    ClassificationRule {
        name: "manual verification",
        keywords: &["verify", "reproduce", "uat", "acceptance", "test"],
        complexity: Complexity::Simple,
        priority: Priority::Normal,
        estimated_time: "1-3 hours",
        actions: &[
            "Reproduce the issue and record exact steps",
            "Attach screenshots and environment details",
        ],
    },
];

const FALLBACK: ClassificationRule = ClassificationRule {
    name: "quality review",
    keywords: &[],
    complexity: Complexity::Simple,
    priority: Priority::Normal,
    estimated_time: "1-2 hours",
    actions: &["Perform an exploratory test of the affected area"],
};

const HANDOFFS: &[HandoffTrigger] = &[
    HandoffTrigger {
        keywords: &["fix required", "root cause", "stack trace"],
        target: AgentRole::SoftwareEngineer,
    },
    HandoffTrigger {
        keywords: &["staging environment", "test environment down"],
        target: AgentRole::DevOps,
    },
];

const HANDOFF_CUES: &[HandoffTrigger] = &[HandoffTrigger {
    keywords: &["acceptance criteria", "expected behaviour unclear", "expected behavior unclear"],
    target: AgentRole::BusinessAnalyst,
}];

/// Quality assurance agent.
pub struct TesterAgent {
    capability: AgentCapability,
}

impl TesterAgent {
    pub fn new(capability: AgentCapability) -> Self {
        Self { capability }
    }
}

#[async_trait]
impl Agent for TesterAgent {
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
