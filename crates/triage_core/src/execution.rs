//! Workflow execution records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use triage_agents::{AgentAnalysis, AgentRole};
use triage_events::NormalizedTicketEvent;

use crate::error::{CoreError, CoreResult};
use crate::handoff::StopReason;

/// Execution state. Moves forward only: pending, running, then completed or failed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Created, not yet started
    #[default]
    Pending,
    /// Agents are being visited
    Running,
    /// Handoff chain finished
    Completed,
    /// An unexpected error ended the execution
    Failed,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Pending => "pending",
            ExecutionStatus::Running => "running",
            ExecutionStatus::Completed => "completed",
            ExecutionStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionStatus::Completed | ExecutionStatus::Failed)
    }

    pub fn can_transition_to(&self, next: ExecutionStatus) -> bool {
        use ExecutionStatus::*;
        matches!(
            (self, next),
            (Pending, Running) | (Running, Completed) | (Running, Failed)
        )
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One run of the routing pipeline for one inbound event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowExecution {
    pub execution_id: String,
    pub workflow_id: String,
    pub status: ExecutionStatus,
    /// Visit order; never contains a role twice
    pub visited_agents: Vec<AgentRole>,
    pub analysis_history: Vec<AgentAnalysis>,
    pub final_recommendations: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Why the handoff chain ended
    pub stop_reason: Option<StopReason>,
    /// Error message if failed
    pub error: Option<String>,
    pub trigger_data: NormalizedTicketEvent,
}

impl WorkflowExecution {
    pub fn new(workflow_id: impl Into<String>, trigger_data: NormalizedTicketEvent) -> Self {
        let now = Utc::now();
        Self {
            execution_id: Uuid::new_v4().to_string(),
            workflow_id: workflow_id.into(),
            status: ExecutionStatus::Pending,
            visited_agents: Vec::new(),
            analysis_history: Vec::new(),
            final_recommendations: Vec::new(),
            started_at: now,
            updated_at: now,
            completed_at: None,
            stop_reason: None,
            error: None,
            trigger_data,
        }
    }

    pub fn ticket_id(&self) -> &str {
        &self.trigger_data.ticket.id
    }

    /// Move to `next`, rejecting any backward or skipping transition.
    pub fn transition(&mut self, next: ExecutionStatus) -> CoreResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidState(format!(
                "execution {} cannot move from {} to {}",
                self.execution_id, self.status, next
            )));
        }
        let now = Utc::now();
        self.status = next;
        self.updated_at = now;
        if next.is_terminal() {
            self.completed_at = Some(now);
        }
        Ok(())
    }

    /// Append an analysis and mark its agent visited.
    pub fn record_analysis(&mut self, analysis: AgentAnalysis) -> CoreResult<()> {
        if self.status != ExecutionStatus::Running {
            return Err(CoreError::InvalidState(format!(
                "execution {} is {}, cannot record analyses",
                self.execution_id, self.status
            )));
        }
        let role = analysis.agent_role;
        if self.visited_agents.contains(&role) {
            return Err(CoreError::InvalidState(format!(
                "agent {} already visited in execution {}",
                role, self.execution_id
            )));
        }
        self.visited_agents.push(role);
        self.analysis_history.push(analysis);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Order-preserving deduplicated union of every recorded action.
    pub fn aggregate_recommendations(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.analysis_history
            .iter()
            .flat_map(|a| a.recommended_actions.iter())
            .filter(|action| seen.insert(action.as_str()))
            .cloned()
            .collect()
    }

    /// Finish successfully.
    pub fn complete(&mut self, stop_reason: StopReason) -> CoreResult<()> {
        self.transition(ExecutionStatus::Completed)?;
        self.final_recommendations = self.aggregate_recommendations();
        self.stop_reason = Some(stop_reason);
        Ok(())
    }

    /// Finish with an error. Recommendations gathered so far are kept.
    pub fn fail(&mut self, message: impl Into<String>) -> CoreResult<()> {
        self.transition(ExecutionStatus::Failed)?;
        self.final_recommendations = self.aggregate_recommendations();
        self.error = Some(message.into());
        Ok(())
    }

    pub fn duration_ms(&self) -> u64 {
        let end = self.completed_at.unwrap_or(self.updated_at);
        (end - self.started_at).num_milliseconds().max(0) as u64
    }
}

/// Outcome returned to callers of the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub execution_id: String,
    pub workflow_id: String,
    pub status: ExecutionStatus,
    pub final_recommendations: Vec<String>,
    pub agents_involved: Vec<AgentRole>,
    pub analysis_history: Vec<AgentAnalysis>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingResult {
    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Completed
    }
}

impl From<&WorkflowExecution> for ProcessingResult {
    fn from(execution: &WorkflowExecution) -> Self {
        Self {
            execution_id: execution.execution_id.clone(),
            workflow_id: execution.workflow_id.clone(),
            status: execution.status,
            final_recommendations: execution.final_recommendations.clone(),
            agents_involved: execution.visited_agents.clone(),
            analysis_history: execution.analysis_history.clone(),
            duration_ms: execution.duration_ms(),
            stop_reason: execution.stop_reason,
            error: execution.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_agents::Complexity;
    use triage_events::{EventSource, Priority, Ticket};

    fn execution() -> WorkflowExecution {
        let event = NormalizedTicketEvent::new(
            EventSource::Ticketing,
            "ticket.created",
            Ticket::new("42", "Subject", "Description"),
        );
        WorkflowExecution::new("ticket-routing", event)
    }

    fn analysis(role: AgentRole, actions: &[&str]) -> AgentAnalysis {
        AgentAnalysis::new(role, Complexity::Simple, Priority::Normal).with_actions(actions.iter().copied())
    }

    #[test]
    fn test_status_only_moves_forward() {
        let mut exec = execution();
        assert_eq!(exec.status, ExecutionStatus::Pending);
        assert!(exec.transition(ExecutionStatus::Completed).is_err());

        exec.transition(ExecutionStatus::Running).unwrap();
        assert!(exec.transition(ExecutionStatus::Pending).is_err());
        assert!(exec.transition(ExecutionStatus::Running).is_err());

        exec.transition(ExecutionStatus::Completed).unwrap();
        assert!(exec.completed_at.is_some());
        for next in [
            ExecutionStatus::Pending,
            ExecutionStatus::Running,
            ExecutionStatus::Failed,
            ExecutionStatus::Completed,
        ] {
            assert!(matches!(exec.transition(next), Err(CoreError::InvalidState(_))));
        }
        assert_eq!(exec.status, ExecutionStatus::Completed);
    }

    #[test]
    fn test_record_analysis_rejects_revisits() {
        let mut exec = execution();
        assert!(exec.record_analysis(analysis(AgentRole::DevOps, &[])).is_err());

        exec.transition(ExecutionStatus::Running).unwrap();
        exec.record_analysis(analysis(AgentRole::DevOps, &[])).unwrap();
        assert!(exec.record_analysis(analysis(AgentRole::DevOps, &[])).is_err());
        assert_eq!(exec.visited_agents, vec![AgentRole::DevOps]);
        assert_eq!(exec.analysis_history.len(), 1);
    }

    #[test]
    fn test_recommendations_are_deduplicated_in_order() {
        let mut exec = execution();
        exec.transition(ExecutionStatus::Running).unwrap();
        exec.record_analysis(analysis(AgentRole::WordPressDeveloper, &["b", "a"]))
            .unwrap();
        exec.record_analysis(analysis(AgentRole::SoftwareEngineer, &["a", "c", "b"]))
            .unwrap();
        exec.complete(StopReason::Terminal).unwrap();

        assert_eq!(exec.final_recommendations, vec!["b", "a", "c"]);
        assert_eq!(exec.stop_reason, Some(StopReason::Terminal));

        let result = ProcessingResult::from(&exec);
        assert!(result.is_success());
        assert_eq!(
            result.agents_involved,
            vec![AgentRole::WordPressDeveloper, AgentRole::SoftwareEngineer]
        );
        assert_eq!(result.execution_id, exec.execution_id);
    }

    #[test]
    fn test_fail_records_error() {
        let mut exec = execution();
        exec.transition(ExecutionStatus::Running).unwrap();
        exec.fail("boom").unwrap();

        assert_eq!(exec.status, ExecutionStatus::Failed);
        assert_eq!(exec.error.as_deref(), Some("boom"));
        assert!(exec.fail("again").is_err());
        assert!(!ProcessingResult::from(&exec).is_success());
    }
}
