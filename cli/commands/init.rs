use crate::cli_args::InitArgs;
use anyhow::{Context, Result};
use colored::*;
use log;
use snipcode_core::{Config, ScaffoldScope, write_scaffold};

pub fn handle_init_command(args: &InitArgs, scope: ScaffoldScope, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::debug!("Scaffolding {:?} config for {}", scope, project_root.display());

    let path = write_scaffold(scope, &project_root, args.force)
        .with_context(|| format!("Failed to write {:?} config", scope))?;

    if !quiet {
        let label = match scope {
            ScaffoldScope::Local => "local",
            ScaffoldScope::Global => "global",
        };
        println!(
            "{} Created {} config at {}",
            "✅".green(),
            label,
            path.display().to_string().blue()
        );
    }
    Ok(())
}
