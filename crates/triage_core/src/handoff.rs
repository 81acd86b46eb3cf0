//! Handoff control between agents.
//!
//! Rules are evaluated in a fixed order:
//! 1. no suggested next agent: stop
//! 2. suggested agent already visited: stop (cycle)
//! 3. one more visit would exceed `max_handoffs`: stop (depth)
//! 4. otherwise continue with the suggested agent

use serde::{Deserialize, Serialize};
use tracing::debug;

use triage_agents::{AgentAnalysis, AgentRole};

use crate::config::DEFAULT_MAX_HANDOFFS;

/// Why a handoff chain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The last agent suggested no further handoff
    Terminal,
    /// The last agent ran out of time
    TimedOut,
    /// The suggested agent was already visited
    CycleDetected,
    /// The visit limit was reached
    DepthExceeded,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::Terminal => "terminal",
            StopReason::TimedOut => "timed_out",
            StopReason::CycleDetected => "cycle_detected",
            StopReason::DepthExceeded => "depth_exceeded",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffDecision {
    Continue(AgentRole),
    Stop(StopReason),
}

#[derive(Debug, Clone, Copy)]
pub struct HandoffController {
    max_handoffs: usize,
}

impl Default for HandoffController {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HANDOFFS)
    }
}

impl HandoffController {
    pub fn new(max_handoffs: usize) -> Self {
        Self { max_handoffs }
    }

    pub fn max_handoffs(&self) -> usize {
        self.max_handoffs
    }

    /// Decide the next step given the agents visited so far (including the
    /// one that produced `analysis`).
    pub fn next_step(&self, visited: &[AgentRole], analysis: &AgentAnalysis) -> HandoffDecision {
        // A timed-out step never hands off.
        if analysis.is_timed_out() {
            return HandoffDecision::Stop(StopReason::TimedOut);
        }
        let Some(next) = analysis.next_agent else {
            return HandoffDecision::Stop(StopReason::Terminal);
        };

        if visited.contains(&next) {
            debug!(
                "Handoff from {} to {} stopped: already visited",
                analysis.agent_role, next
            );
            return HandoffDecision::Stop(StopReason::CycleDetected);
        }

        if visited.len() + 1 > self.max_handoffs {
            debug!(
                "Handoff from {} to {} stopped: limit of {} agents reached",
                analysis.agent_role, next, self.max_handoffs
            );
            return HandoffDecision::Stop(StopReason::DepthExceeded);
        }

        HandoffDecision::Continue(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_agents::Complexity;
    use triage_events::Priority;

    fn analysis(role: AgentRole, next: Option<AgentRole>) -> AgentAnalysis {
        AgentAnalysis::new(role, Complexity::Simple, Priority::Normal).with_next_agent(next)
    }

    #[test]
    fn test_no_suggestion_is_terminal() {
        let controller = HandoffController::default();
        let decision = controller.next_step(
            &[AgentRole::DevOps],
            &analysis(AgentRole::DevOps, None),
        );
        assert_eq!(decision, HandoffDecision::Stop(StopReason::Terminal));
    }

    #[test]
    fn test_timeout_stops() {
        let controller = HandoffController::default();
        let timed_out = AgentAnalysis::timed_out(AgentRole::DevOps, 10);
        assert_eq!(
            controller.next_step(&[AgentRole::DevOps], &timed_out),
            HandoffDecision::Stop(StopReason::TimedOut)
        );

        // A suggestion attached to a timed-out step is ignored.
        let with_next = timed_out.with_next_agent(Some(AgentRole::QaTester));
        assert_eq!(
            controller.next_step(&[AgentRole::DevOps], &with_next),
            HandoffDecision::Stop(StopReason::TimedOut)
        );
    }

    #[test]
    fn test_continue() {
        let controller = HandoffController::default();
        let decision = controller.next_step(
            &[AgentRole::WordPressDeveloper],
            &analysis(AgentRole::WordPressDeveloper, Some(AgentRole::SoftwareEngineer)),
        );
        assert_eq!(decision, HandoffDecision::Continue(AgentRole::SoftwareEngineer));
    }

    #[test]
    fn test_cycle_detected() {
        let controller = HandoffController::default();
        let visited = [AgentRole::SoftwareEngineer, AgentRole::QaTester];
        let decision = controller.next_step(
            &visited,
            &analysis(AgentRole::QaTester, Some(AgentRole::SoftwareEngineer)),
        );
        assert_eq!(decision, HandoffDecision::Stop(StopReason::CycleDetected));
    }

    #[test]
    fn test_self_suggestion_is_a_cycle() {
        let controller = HandoffController::default();
        let decision = controller.next_step(
            &[AgentRole::DevOps],
            &analysis(AgentRole::DevOps, Some(AgentRole::DevOps)),
        );
        assert_eq!(decision, HandoffDecision::Stop(StopReason::CycleDetected));
    }

    #[test]
    fn test_depth_exceeded() {
        let controller = HandoffController::new(2);
        let visited = [AgentRole::WordPressDeveloper, AgentRole::SoftwareEngineer];
        let decision = controller.next_step(
            &visited,
            &analysis(AgentRole::SoftwareEngineer, Some(AgentRole::DevOps)),
        );
        assert_eq!(decision, HandoffDecision::Stop(StopReason::DepthExceeded));
    }

    #[test]
    fn test_cycle_checked_before_depth() {
        let controller = HandoffController::new(1);
        let decision = controller.next_step(
            &[AgentRole::DevOps],
            &analysis(AgentRole::DevOps, Some(AgentRole::DevOps)),
        );
        assert_eq!(decision, HandoffDecision::Stop(StopReason::CycleDetected));
    }
}
