mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use log;
use std::path::Path;
use std::process;

use cli_args::{Cli, Commands, ProjectConfigOpts};
use snipcode_core::{AppError, ConfigLayers, ScaffoldScope};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = exit_code_for(&e);
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(AppError::Config(_)) => 1,
        Some(AppError::ConfigParse { .. }) => 1,
        Some(AppError::YamlError(_)) => 1,
        Some(AppError::InvalidArgument(_)) => 1,
        Some(AppError::Io(_)) => 2,
        Some(AppError::FileRead { .. }) => 2,
        Some(AppError::FileWrite { .. }) => 2,
        Some(AppError::DirCreation { .. }) => 2,
        Some(AppError::WalkDir { .. }) => 2,
        Some(AppError::Glob(_)) => 2,
        Some(_) => 1,
        None => 1,
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    match cli.command {
        None => {
            Cli::command().print_help()?;
        }
        Some(command) => match command {
            Commands::Init(args) => {
                log::debug!("Executing 'init' command...");
                commands::init::handle_init_command(&args, ScaffoldScope::Local, quiet)?;
            }
            Commands::InitGlobal(args) => {
                log::debug!("Executing 'init-global' command...");
                commands::init::handle_init_command(&args, ScaffoldScope::Global, quiet)?;
            }
            Commands::Compile(args) => {
                log::debug!("Executing 'compile' command...");
                commands::compile::handle_compile_command(args, quiet)?;
            }
            Commands::Debug(args) => {
                log::debug!("Executing 'debug' command...");
                commands::debug::handle_debug_command(args)?;
            }
            Commands::Completion(args) => {
                log::debug!("Executing 'completion' command...");
                commands::completion::handle_completion_command(&args)?;
            }
        },
    }
    Ok(())
}

/// Loads the global and local config scopes the way every command sees them.
pub fn load_config_for_command(
    project_root: &Path,
    project_opts: &ProjectConfigOpts,
) -> Result<ConfigLayers> {
    let layers = ConfigLayers::resolve(
        project_root,
        project_opts.config.as_deref(),
        !project_opts.no_global,
    )
    .context("Failed to load configuration")?;

    for source in layers.sources() {
        log::info!("Loaded config from {}", source.path.display());
    }
    Ok(layers)
}
