use crate::error::{AppError, Result};
use log;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".grepattern.yaml";
pub const GLOBAL_CONFIG_DIR: &str = "snipcode";
pub const GLOBAL_CONFIG_DIR_ENV: &str = "SNIPCODE_GLOBAL_CONFIG_DIR";
pub const DEFAULT_OUTPUT_NAME: &str = "comp_code.txt";

/// One `.grepattern.yaml` file as written on disk.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_name: Option<String>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

impl Config {
    pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_to_resolve = match cli_project_root {
            Some(p) => PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).as_ref()),
            None => env::current_dir().map_err(AppError::Io)?,
        };

        path_to_resolve.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to canonicalize project root '{}': {}",
                    path_to_resolve.display(),
                    e
                ),
            ))
        })
    }

    /// `$SNIPCODE_GLOBAL_CONFIG_DIR/.grepattern.yaml` when the variable is set,
    /// otherwise `<user config dir>/snipcode/.grepattern.yaml`.
    pub fn global_config_path() -> Option<PathBuf> {
        let dir = env::var(GLOBAL_CONFIG_DIR_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .map(|s| PathBuf::from(shellexpand::tilde(&s).as_ref()))
            .or_else(|| dirs::config_dir().map(|d| d.join(GLOBAL_CONFIG_DIR)))?;
        Some(dir.join(CONFIG_FILENAME))
    }

    pub fn local_config_path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_FILENAME)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, config_path)
    }

    fn parse(content: &str, origin: &Path) -> Result<Self> {
        let has_content = content.lines().any(|l| {
            let t = l.trim();
            !t.is_empty() && !t.starts_with('#')
        });
        if !has_content {
            log::debug!("Config file {} is empty, using defaults", origin.display());
            return Ok(Self::default());
        }
        serde_yml::from_str::<Config>(content).map_err(|e| AppError::ConfigParse {
            path: origin.to_path_buf(),
            message: format!(
                "{}. Expected a mapping with optional 'default_name' (string) and 'ignore_patterns' (list of strings).",
                e
            ),
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yml::to_string(self).map_err(AppError::YamlError)
    }

    /// Writes the config as YAML, creating parent directories. Refuses to
    /// replace an existing file unless `force` is set.
    pub fn write_to_path(&self, path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(AppError::InvalidArgument(format!(
                "Config file already exists at {} (use --force to overwrite)",
                path.display()
            )));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::DirCreation {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let yaml = self.to_yaml()?;
        fs::write(path, yaml).map_err(|e| AppError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::debug!("Wrote config to {}", path.display());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub config: Config,
}

/// Global and local config scopes as found on disk. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigLayers {
    pub global: Option<ConfigSource>,
    pub local: Option<ConfigSource>,
}

/// The merged view handed to the collector and packager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveConfig {
    pub default_name: String,
    pub ignore_patterns: Vec<String>,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            default_name: DEFAULT_OUTPUT_NAME.to_string(),
            ignore_patterns: Vec::new(),
        }
    }
}

impl ConfigLayers {
    /// Loads the global scope (unless `include_global` is false) and the local
    /// scope. An explicit local path must exist; the implicit one is optional.
    pub fn resolve(
        project_root: &Path,
        explicit_local: Option<&Path>,
        include_global: bool,
    ) -> Result<Self> {
        let global = if include_global {
            match Config::global_config_path() {
                Some(path) => load_optional(&path)?,
                None => {
                    log::debug!("No user config directory available, skipping global config");
                    None
                }
            }
        } else {
            log::debug!("Global config disabled.");
            None
        };

        let local = match explicit_local {
            Some(p) => {
                let expanded = PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).as_ref());
                if !expanded.is_file() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found at path: {}",
                        expanded.display()
                    )));
                }
                let expanded = expanded.canonicalize().unwrap_or(expanded);
                let config = Config::load_from_path(&expanded)?;
                Some(ConfigSource {
                    path: expanded,
                    config,
                })
            }
            None => load_optional(&Config::local_config_path(project_root))?,
        };

        Ok(Self { global, local })
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_none() && self.local.is_none()
    }

    /// Local `default_name` wins over global; ignore patterns are the global
    /// list followed by the local list, without deduplication.
    pub fn effective(&self) -> EffectiveConfig {
        if self.is_empty() {
            log::info!("No config found; using defaults");
            return EffectiveConfig::default();
        }

        let layers = [self.global.as_ref(), self.local.as_ref()];
        let default_name = layers
            .iter()
            .rev()
            .flatten()
            .find_map(|s| {
                s.config
                    .default_name
                    .clone()
                    .filter(|n| !n.trim().is_empty())
            })
            .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string());
        let ignore_patterns = layers
            .iter()
            .flatten()
            .flat_map(|s| s.config.ignore_patterns.iter().cloned())
            .collect();

        EffectiveConfig {
            default_name,
            ignore_patterns,
        }
    }

    pub fn sources(&self) -> impl Iterator<Item = &ConfigSource> {
        self.global.iter().chain(self.local.iter())
    }
}

fn load_optional(path: &Path) -> Result<Option<ConfigSource>> {
    if !path.is_file() {
        log::debug!("No config file at {}", path.display());
        return Ok(None);
    }
    let config = Config::load_from_path(path)?;
    Ok(Some(ConfigSource {
        path: path.to_path_buf(),
        config,
    }))
}
