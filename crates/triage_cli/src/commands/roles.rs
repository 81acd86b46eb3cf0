//! Roles command - List agent roles and their capabilities.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use triage_agents::AgentCapability;
use triage_core::RoutingConfig;

#[derive(Args)]
pub struct RolesArgs {
    /// Routing config (TOML) whose agent overrides should be applied
    #[arg(short, long, env = "TRIAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Print the capability table as JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: RolesArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => RoutingConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => RoutingConfig::default(),
    };
    let capabilities = config.capabilities()?;
    let mut table: Vec<&AgentCapability> = capabilities.iter().collect();
    table.sort_by_key(|c| (c.priority, c.role));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!("🤖 Agent roles (fallback: {})", config.fallback_role);
    println!();
    for capability in table {
        println!(
            "{} [{}] priority {} · weight {} · budget {}ms",
            capability.display_name,
            capability.role,
            capability.priority,
            capability.weight,
            capability.max_processing_time_ms
        );
        println!("   {}", capability.role.description());
        println!(
            "   Keywords: {}",
            capability
                .keywords
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
        if !capability.specialties.is_empty() {
            println!("   Specialties: {}", capability.specialties.join(", "));
        }
        println!();
    }

    Ok(())
}
