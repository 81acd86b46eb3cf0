//! CLI command definitions.

use clap::{Parser, Subcommand};

pub mod roles;
pub mod route;

/// triage - route support tickets through a panel of specialist agents
#[derive(Parser)]
#[command(name = "triage")]
#[command(version, about = "triage - route support tickets to specialist agents")]
#[command(long_about = r#"
triage normalizes helpdesk and task-tracker webhook payloads, selects the
best-fit specialist agent, follows bounded handoffs between agents and reports
the resulting workflow execution.

COMMANDS:
  route   → Route a webhook payload file and print the execution
  roles   → List agent roles and their capabilities

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Normalization failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Route a webhook payload through the agents
    Route(route::RouteArgs),

    /// List agent roles and capabilities
    Roles(roles::RolesArgs),
}
