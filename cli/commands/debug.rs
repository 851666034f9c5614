use crate::cli_args::DebugArgs;
use crate::load_config_for_command;
use crate::output::{print_path_list, print_section};
use anyhow::{Context, Result};
use colored::*;
use log;
use snipcode_core::{self as core, Collector, Config};
use std::path::Path;

pub fn handle_debug_command(args: DebugArgs) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let layers = load_config_for_command(&project_root, &args.project_config)?;
    let config = layers.effective();

    print_section("Config Files");
    if layers.is_empty() {
        println!("{}", "(None, using built-in defaults)".dimmed());
    }
    if let Some(global) = &layers.global {
        println!("{} {}", "global:".bold(), global.path.display());
    }
    if let Some(local) = &layers.local {
        println!("{} {}", "local: ".bold(), local.path.display());
    }

    print_section("Effective Configuration");
    let yaml = serde_yml::to_string(&config)
        .context("Failed to serialize effective config to YAML")?;
    print!("{}", yaml);

    let collector = Collector::new(
        &project_root,
        &config.ignore_patterns,
        args.project_config.strict_patterns,
    )
    .context("Failed to compile ignore patterns")?;
    if !collector.matcher().skipped().is_empty() {
        print_section("Skipped Invalid Patterns");
        print_path_list(collector.matcher().skipped());
    }

    log::debug!("Debug: Gathering file list...");
    let files = collector
        .collect()
        .context("Failed to collect file list for debug")?;
    let output_path = project_root.join(&config.default_name);
    let mut excluded: Vec<&Path> = layers.sources().map(|s| s.path.as_path()).collect();
    excluded.push(&output_path);
    let files = core::without_paths(files, &project_root, &excluded);

    print_section(&format!("Files Included ({})", files.len()));
    print_path_list(&files);

    print_section("File Tree");
    print!("{}", core::render_tree(&files));

    println!("{}", "\n--- End Debug Info ---".green().bold());
    Ok(())
}
