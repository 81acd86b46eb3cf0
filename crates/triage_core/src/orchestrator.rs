//! Workflow orchestrator.
//!
//! Drives one execution per inbound event: select an agent, analyze, consult the
//! handoff controller, repeat until it says stop. Failures never escape
//! [`Orchestrator::process_webhook_event`]; they end the execution as failed.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use triage_agents::{
    record_detached, Agent, AgentAnalysis, AgentError, AgentRegistry, AgentResult, AgentRole,
    AuditEntry, AuditKind, AuditTrail, CapabilityRegistry, DetachedTasks, InMemoryAuditTrail,
};
use triage_events::{NormalizedTicketEvent, Ticket};

use crate::config::RoutingConfig;
use crate::error::{CoreError, CoreResult};
use crate::execution::{ExecutionStatus, ProcessingResult, WorkflowExecution};
use crate::handoff::{HandoffController, HandoffDecision, StopReason};
use crate::metrics::{MetricsRecorder, WorkflowMetrics};
use crate::selector::AgentSelector;

/// An execution started with [`Orchestrator::dispatch`].
#[derive(Debug)]
pub struct Dispatched {
    pub execution_id: String,
    pub handle: JoinHandle<ProcessingResult>,
}

/// Routes normalized ticket events through the agent panel.
pub struct Orchestrator {
    config: RoutingConfig,
    agents: AgentRegistry,
    selector: AgentSelector,
    handoff: HandoffController,
    executions: Arc<RwLock<HashMap<String, WorkflowExecution>>>,
    metrics: Arc<MetricsRecorder>,
    audit: Option<Arc<dyn AuditTrail>>,
    audit_tasks: Arc<DetachedTasks>,
}

impl Orchestrator {
    /// Orchestrator with the built-in agents and the config's capability overrides.
    pub fn new(config: RoutingConfig) -> CoreResult<Self> {
        let capabilities = config.capabilities()?;
        let agents = AgentRegistry::standard(&capabilities)?;
        Self::with_agents(config, capabilities, agents)
    }

    /// Orchestrator over a custom agent registry.
    ///
    /// The fallback role must be registered.
    pub fn with_agents(
        config: RoutingConfig,
        capabilities: CapabilityRegistry,
        agents: AgentRegistry,
    ) -> CoreResult<Self> {
        config.validate()?;
        agents.get_required(config.fallback_role)?;

        let audit: Option<Arc<dyn AuditTrail>> = if config.audit_enabled {
            Some(Arc::new(InMemoryAuditTrail::new()))
        } else {
            None
        };

        Ok(Self {
            selector: AgentSelector::new(capabilities).with_floor(config.confidence_floor),
            handoff: HandoffController::new(config.max_handoffs),
            agents,
            config,
            executions: Arc::new(RwLock::new(HashMap::new())),
            metrics: Arc::new(MetricsRecorder::new()),
            audit,
            audit_tasks: Arc::new(DetachedTasks::new()),
        })
    }

    /// Replace the audit destination. Ignored when auditing is disabled.
    pub fn with_audit_trail(mut self, trail: Arc<dyn AuditTrail>) -> Self {
        if self.config.audit_enabled {
            self.audit = Some(trail);
        }
        self
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    /// Background audit writes, for callers that need to wait on them.
    pub fn audit_tasks(&self) -> &DetachedTasks {
        &self.audit_tasks
    }

    /// Run the full pipeline for one event and return its outcome.
    pub async fn process_webhook_event(&self, event: NormalizedTicketEvent) -> ProcessingResult {
        let execution = WorkflowExecution::new(&self.config.workflow_id, event);
        self.store(&execution).await;
        self.run(execution).await
    }

    /// Register the execution and run it on a spawned task.
    ///
    /// Returns as soon as the pending record is stored.
    pub async fn dispatch(self: &Arc<Self>, event: NormalizedTicketEvent) -> Dispatched {
        let execution = WorkflowExecution::new(&self.config.workflow_id, event);
        let execution_id = execution.execution_id.clone();
        self.store(&execution).await;

        let orchestrator = Arc::clone(self);
        let handle = tokio::spawn(async move { orchestrator.run(execution).await });

        Dispatched {
            execution_id,
            handle,
        }
    }

    /// Executions currently running.
    pub async fn get_active_workflows(&self) -> Vec<WorkflowExecution> {
        let executions = self.executions.read().await;
        let mut active: Vec<_> = executions
            .values()
            .filter(|e| e.status == ExecutionStatus::Running)
            .cloned()
            .collect();
        active.sort_by_key(|e| e.started_at);
        active
    }

    /// Snapshot of a retained execution.
    pub async fn get_execution(&self, execution_id: &str) -> Option<WorkflowExecution> {
        self.executions.read().await.get(execution_id).cloned()
    }

    pub fn get_workflow_metrics(&self) -> WorkflowMetrics {
        self.metrics.snapshot()
    }

    /// Zero the metrics. Intended for test harnesses only.
    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }

    async fn store(&self, execution: &WorkflowExecution) {
        self.executions
            .write()
            .await
            .insert(execution.execution_id.clone(), execution.clone());
    }

    async fn run(&self, mut execution: WorkflowExecution) -> ProcessingResult {
        info!(
            "Starting execution {} for ticket {}",
            execution.execution_id,
            execution.ticket_id()
        );

        let outcome = match execution.transition(ExecutionStatus::Running) {
            Ok(()) => {
                self.store(&execution).await;
                self.drive(&mut execution).await
            }
            Err(e) => Err(e),
        };

        let finished = outcome.and_then(|reason| execution.complete(reason));
        match finished {
            Ok(()) => {
                self.metrics.record_success(execution.duration_ms());
                info!(
                    "Execution {} completed: agents [{}], stop {}",
                    execution.execution_id,
                    execution
                        .visited_agents
                        .iter()
                        .map(|r| r.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                    execution
                        .stop_reason
                        .map(|r| r.as_str())
                        .unwrap_or("none")
                );
            }
            Err(e) => {
                error!("Execution {} failed: {}", execution.execution_id, e);
                if let Err(state) = execution.fail(e.to_string()) {
                    warn!("Could not mark execution failed: {}", state);
                }
                self.metrics.record_failure(execution.duration_ms());
            }
        }

        self.store(&execution).await;
        let result = ProcessingResult::from(&execution);
        self.audit(
            execution.ticket_id(),
            AuditKind::Execution,
            serde_json::to_value(&result),
        );
        result
    }

    /// The handoff loop. Returns why the chain ended.
    async fn drive(&self, execution: &mut WorkflowExecution) -> CoreResult<StopReason> {
        let ticket = execution.trigger_data.ticket.clone();
        let mut role = self.initial_agent(&ticket, execution);

        loop {
            let analysis = self.analyze_step(role, &ticket).await?;
            self.audit(
                &ticket.id,
                AuditKind::Analysis(role),
                serde_json::to_value(&analysis),
            );
            execution.record_analysis(analysis)?;
            self.store(execution).await;

            let last = execution
                .analysis_history
                .last()
                .ok_or_else(|| CoreError::Orchestration("analysis was not recorded".into()))?;

            match self.handoff.next_step(&execution.visited_agents, last) {
                HandoffDecision::Continue(next) => {
                    debug!("Handing ticket {} from {} to {}", ticket.id, role, next);
                    role = next;
                }
                HandoffDecision::Stop(reason) => return Ok(reason),
            }
        }
    }

    fn initial_agent(&self, ticket: &Ticket, execution: &WorkflowExecution) -> AgentRole {
        let candidates: BTreeSet<AgentRole> = self
            .agents
            .roles()
            .into_iter()
            .filter(|r| !execution.visited_agents.contains(r))
            .collect();

        self.selector.select(ticket, &candidates).unwrap_or_else(|| {
            debug!(
                "Ticket {} falls back to {}",
                ticket.id, self.config.fallback_role
            );
            self.config.fallback_role
        })
    }

    /// Run one agent within its time budget.
    ///
    /// The agent runs on its own task so a panic surfaces as an error. A
    /// timeout yields a timed-out analysis rather than an error.
    async fn analyze_step(&self, role: AgentRole, ticket: &Ticket) -> CoreResult<AgentAnalysis> {
        let agent = self.agents.get_required(role)?;
        let budget_ms = agent.capability().max_processing_time_ms;
        let mut step = tokio::spawn(run_agent(agent, ticket.clone()));

        let outcome = tokio::time::timeout(Duration::from_millis(budget_ms), &mut step).await;
        let analysis = match outcome {
            Ok(Ok(result)) => result?,
            Ok(Err(e)) => {
                return Err(CoreError::Orchestration(format!(
                    "agent {} did not finish: {}",
                    role, e
                )));
            }
            Err(_) => {
                step.abort();
                warn!("{}", AgentError::Timeout { role, budget_ms });
                return Ok(AgentAnalysis::timed_out(role, budget_ms));
            }
        };

        if analysis.agent_role != role {
            return Err(CoreError::Orchestration(format!(
                "agent {} returned an analysis for {}",
                role, analysis.agent_role
            )));
        }
        Ok(analysis)
    }

    fn audit(
        &self,
        ticket_id: &str,
        kind: AuditKind,
        payload: Result<serde_json::Value, serde_json::Error>,
    ) {
        let Some(trail) = &self.audit else {
            return;
        };
        match payload {
            Ok(payload) => record_detached(
                &self.audit_tasks,
                Arc::clone(trail),
                AuditEntry::new(ticket_id, kind, payload),
            ),
            Err(e) => warn!("Skipping audit entry {} for ticket {}: {}", kind, ticket_id, e),
        }
    }
}

/// Analyze, then let `should_handoff` fill in a missing next agent.
async fn run_agent(agent: Arc<dyn Agent>, ticket: Ticket) -> AgentResult<AgentAnalysis> {
    let analysis = agent.analyze(&ticket).await?;
    if analysis.next_agent.is_some() {
        return Ok(analysis);
    }
    let cue = agent.should_handoff(&ticket);
    Ok(analysis.with_next_agent(cue))
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("agents", &self.agents)
            .finish()
    }
}
