//! # triage_agents
//!
//! Deterministic support agents for ticket triage.
//!
//! Agents are responsible for:
//! - Classifying a ticket (complexity, priority, effort)
//! - Recommending next actions
//! - Suggesting a handoff to another role
//!
//! ## Architecture
//!
//! All agents implement the [`Agent`] trait:
//! - **Deterministic analysis**: ordered keyword rules, first match wins
//! - **Capability driven**: keywords, thresholds and time budgets come from the
//!   [`CapabilityRegistry`]
//! - **Pluggable**: [`AgentRegistry::register`] swaps in any implementation
//!
//! ## Available Agents
//!
//! | Agent | Role | Handles |
//! |-------|------|---------|
//! | [`WordPressAgent`] | WordPressDeveloper | Plugins, themes, WooCommerce |
//! | [`ProjectManagerAgent`] | ProjectManager | Planning, deadlines, fallback triage |
//! | [`SoftwareEngineerAgent`] | SoftwareEngineer | APIs, defects, data modelling |
//! | [`DevOpsAgent`] | DevOps | Outages, certificates, pipelines |
//! | [`TesterAgent`] | QaTester | Reproduction, regression, automation |
//! | [`AnalystAgent`] | BusinessAnalyst | Requirements, reporting, process |

pub mod analyst;
pub mod audit;
pub mod devops;
pub mod error;
pub mod project_manager;
pub mod registry;
pub mod roles;
pub mod rules;
pub mod software_engineer;
pub mod tester;
pub mod traits;
pub mod wordpress;

pub use analyst::AnalystAgent;
pub use audit::{
    record_detached, AuditEntry, AuditKind, AuditTrail, DetachedTasks, InMemoryAuditTrail,
};
pub use devops::DevOpsAgent;
pub use error::{AgentError, AgentResult};
pub use project_manager::ProjectManagerAgent;
pub use registry::AgentRegistry;
pub use roles::{AgentCapability, AgentRole, CapabilityRegistry};
pub use software_engineer::SoftwareEngineerAgent;
pub use tester::TesterAgent;
pub use traits::{Agent, AgentAnalysis, AnalysisOutcome, Complexity, MAX_RECOMMENDED_ACTIONS};
pub use wordpress::WordPressAgent;
