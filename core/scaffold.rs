use crate::config::{Config, DEFAULT_OUTPUT_NAME};
use crate::error::{AppError, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultIgnores {
    #[serde(default)]
    pub media_and_vcs: Vec<String>,
    #[serde(default)]
    pub extended: Vec<String>,
}

static DEFAULT_IGNORE_PATTERNS: Lazy<DefaultIgnores> = Lazy::new(|| {
    let yaml_content = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../data/default_ignores.yaml"
    ));
    serde_yml::from_str(yaml_content).expect("Failed to parse embedded data/default_ignores.yaml")
});

pub fn get_default_ignore_patterns() -> &'static DefaultIgnores {
    &DEFAULT_IGNORE_PATTERNS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldScope {
    /// Project config: media and VCS ignores only.
    Local,
    /// User-wide config: the extended list followed by the media and VCS ignores.
    Global,
}

pub fn scaffold_config(scope: ScaffoldScope) -> Config {
    let defaults = get_default_ignore_patterns();
    let ignore_patterns = match scope {
        ScaffoldScope::Local => defaults.media_and_vcs.clone(),
        ScaffoldScope::Global => defaults
            .extended
            .iter()
            .chain(defaults.media_and_vcs.iter())
            .cloned()
            .collect(),
    };
    Config {
        default_name: Some(DEFAULT_OUTPUT_NAME.to_string()),
        ignore_patterns,
    }
}

pub fn scaffold_target(scope: ScaffoldScope, project_root: &Path) -> Result<PathBuf> {
    match scope {
        ScaffoldScope::Local => Ok(Config::local_config_path(project_root)),
        ScaffoldScope::Global => Config::global_config_path().ok_or_else(|| {
            AppError::Config("Could not determine the user configuration directory".to_string())
        }),
    }
}

/// Writes the default config for `scope` and returns where it went.
pub fn write_scaffold(scope: ScaffoldScope, project_root: &Path, force: bool) -> Result<PathBuf> {
    let target = scaffold_target(scope, project_root)?;
    scaffold_config(scope).write_to_path(&target, force)?;
    log::info!("Created {:?} config at {}", scope, target.display());
    Ok(target)
}
