//! Core agent trait and analysis types.
//!
//! Agents are deterministic: the same ticket and capability table always produce
//! the same [`AgentAnalysis`]. They never perform I/O on the routing path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use triage_events::{Priority, Ticket};

use crate::error::AgentResult;
use crate::roles::{AgentCapability, AgentRole};

/// Upper bound on recommended actions per analysis.
pub const MAX_RECOMMENDED_ACTIONS: usize = 3;

/// Estimated effort class for a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Medium => "medium",
            Complexity::Complex => "complex",
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an agent step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisOutcome {
    #[default]
    Completed,
    /// The step exceeded the agent's processing budget
    TimedOut,
}

/// Result of one agent evaluating one ticket. Never mutated after it is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAnalysis {
    pub agent_role: AgentRole,
    pub outcome: AnalysisOutcome,
    pub confidence: f64,
    pub complexity: Complexity,
    pub priority: Priority,
    pub estimated_time: String,
    pub recommended_actions: Vec<String>,
    pub next_agent: Option<AgentRole>,
    pub summary: String,
    pub matched_keywords: Vec<String>,
}

impl AgentAnalysis {
    pub fn new(agent_role: AgentRole, complexity: Complexity, priority: Priority) -> Self {
        Self {
            agent_role,
            outcome: AnalysisOutcome::Completed,
            confidence: 0.0,
            complexity,
            priority,
            estimated_time: String::new(),
            recommended_actions: Vec::new(),
            next_agent: None,
            summary: String::new(),
            matched_keywords: Vec::new(),
        }
    }

    /// Placeholder analysis for a step that ran out of time.
    pub fn timed_out(agent_role: AgentRole, budget_ms: u64) -> Self {
        let mut analysis = Self::new(agent_role, Complexity::Simple, Priority::Normal);
        analysis.outcome = AnalysisOutcome::TimedOut;
        analysis.summary = format!("Analysis exceeded {}ms budget", budget_ms);
        analysis
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_estimated_time(mut self, estimate: impl Into<String>) -> Self {
        self.estimated_time = estimate.into();
        self
    }

    /// Append an action, ignoring duplicates and anything past [`MAX_RECOMMENDED_ACTIONS`].
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        let action = action.into();
        if self.recommended_actions.len() < MAX_RECOMMENDED_ACTIONS
            && !self.recommended_actions.contains(&action)
        {
            self.recommended_actions.push(action);
        }
        self
    }

    pub fn with_actions<I, S>(self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        actions.into_iter().fold(self, |a, action| a.with_action(action))
    }

    pub fn with_next_agent(mut self, next: Option<AgentRole>) -> Self {
        self.next_agent = next;
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_matched_keywords(mut self, keywords: Vec<String>) -> Self {
        self.matched_keywords = keywords;
        self
    }

    pub fn is_timed_out(&self) -> bool {
        self.outcome == AnalysisOutcome::TimedOut
    }

    /// Whether confidence reaches the agent's configured threshold.
    pub fn meets_threshold(&self, capability: &AgentCapability) -> bool {
        self.confidence >= capability.confidence_threshold
    }
}

/// A domain expert that can classify a ticket and suggest a handoff.
///
/// `analyze` is async so the orchestrator can bound it with the agent's
/// processing budget; built-in agents complete without awaiting anything.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Static capability data this agent was built from.
    fn capability(&self) -> &AgentCapability;

    fn role(&self) -> AgentRole {
        self.capability().role
    }

    /// True when any capability keyword occurs in the ticket text.
    fn can_handle(&self, ticket: &Ticket) -> bool {
        let text = ticket.searchable_text();
        self.capability()
            .keywords
            .iter()
            .any(|k| text.contains(k.as_str()))
    }

    /// Classify the ticket.
    async fn analyze(&self, ticket: &Ticket) -> AgentResult<AgentAnalysis>;

    /// Handoff suggestion independent of `analyze`.
    fn should_handoff(&self, ticket: &Ticket) -> Option<AgentRole>;
}
