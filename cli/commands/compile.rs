use crate::cli_args::CompileArgs;
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use log;
use snipcode_core::{self as core, Collector, Config, EffectiveConfig, Packager};
use std::path::{Path, PathBuf};

pub fn handle_compile_command(args: CompileArgs, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let layers = load_config_for_command(&project_root, &args.project_config)?;
    let config = layers.effective();
    let output_path = resolve_output_path(&project_root, args.output.as_deref(), &config);

    log::info!(
        "Collecting files (skipping any named {:?})...",
        output_path.display().to_string()
    );
    let collector = Collector::new(
        &project_root,
        &config.ignore_patterns,
        args.project_config.strict_patterns,
    )
    .context("Failed to compile ignore patterns")?;
    let files = collector
        .collect()
        .context("Failed to collect project files")?;
    let mut excluded: Vec<&Path> = layers.sources().map(|s| s.path.as_path()).collect();
    excluded.push(&output_path);
    let files = core::without_paths(files, &project_root, &excluded);
    log::info!("Found {} files", files.len());

    let package = Packager::new(&project_root)
        .with_tree(args.with_tree)
        .write(&output_path, &files)
        .with_context(|| format!("Failed to build {}", output_path.display()))?;

    if !quiet {
        output::print_compile_report(&package, &output_path);
    }
    Ok(())
}

/// `--output` wins over the configured name; relative paths hang off the
/// project root.
fn resolve_output_path(
    project_root: &Path,
    cli_output: Option<&Path>,
    config: &EffectiveConfig,
) -> PathBuf {
    let chosen = cli_output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.default_name));
    if chosen.is_absolute() {
        chosen
    } else {
        project_root.join(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_output_overrides_config_name() {
        let config = EffectiveConfig::default();
        let root = Path::new("/proj");
        assert_eq!(
            resolve_output_path(root, None, &config),
            PathBuf::from("/proj/comp_code.txt")
        );
        assert_eq!(
            resolve_output_path(root, Some(Path::new("out/all.txt")), &config),
            PathBuf::from("/proj/out/all.txt")
        );
        assert_eq!(
            resolve_output_path(root, Some(Path::new("/tmp/all.txt")), &config),
            PathBuf::from("/tmp/all.txt")
        );
    }
}
