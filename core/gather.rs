use crate::config::CONFIG_FILENAME;
use crate::error::{AppError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use log;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Compiled ignore patterns.
///
/// Paths are matched root-relative with `/` separators and no leading `./`.
/// `*` stays within one segment, `**` spans any number of segments. A pattern
/// without a `/` also matches the basename at any depth, and a trailing `/`
/// stands for everything below that directory.
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    files: GlobSet,
    subtrees: GlobSet,
    skipped: Vec<String>,
}

impl IgnoreMatcher {
    /// With `strict` unset, a pattern that fails to compile is logged and
    /// matches nothing. With `strict` set it is an error.
    pub fn new(patterns: &[String], strict: bool) -> Result<Self> {
        let mut files = GlobSetBuilder::new();
        let mut subtrees = GlobSetBuilder::new();
        let mut skipped = Vec::new();

        for pattern_str in patterns {
            let mut processed = pattern_str.trim().to_string();
            if processed.is_empty() {
                continue;
            }
            if processed.ends_with('/') && processed.len() > 1 {
                processed.push_str("**");
            }

            let mut variants = vec![processed.clone()];
            if !processed.contains('/') {
                variants.push(format!("**/{}", processed));
            }

            let compiled: std::result::Result<Vec<_>, globset::Error> =
                variants.iter().map(|v| compile(v)).collect();
            let globs = match compiled {
                Ok(globs) => globs,
                Err(e) if strict => {
                    log::error!("Invalid glob pattern \"{}\": {}", pattern_str, e);
                    return Err(AppError::Glob(format!(
                        "Invalid glob pattern \"{}\" (processed as \"{}\"): {}",
                        pattern_str, processed, e
                    )));
                }
                Err(e) => {
                    log::warn!(
                        "Ignoring invalid glob pattern \"{}\": {}. It will match nothing.",
                        pattern_str,
                        e
                    );
                    skipped.push(pattern_str.clone());
                    continue;
                }
            };
            log::trace!(
                "Adding ignore pattern: {} (processed as {})",
                pattern_str,
                processed
            );
            for glob in globs {
                files.add(glob);
            }

            // `X/**` excludes every file under a directory matching `X`, so the
            // walk never needs to enter it.
            if let Some(prefix) = processed.strip_suffix("/**").filter(|p| !p.is_empty()) {
                if let Ok(glob) = compile(prefix) {
                    subtrees.add(glob);
                }
            }
        }

        Ok(Self {
            files: files.build()?,
            subtrees: subtrees.build()?,
            skipped,
        })
    }

    pub fn is_ignored(&self, relative_path: &str) -> bool {
        self.files.is_match(relative_path)
    }

    fn prunes_dir(&self, relative_dir: &str) -> bool {
        self.subtrees.is_match(relative_dir)
    }

    /// Patterns dropped because they failed to compile.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }
}

fn compile(pattern: &str) -> std::result::Result<globset::Glob, globset::Error> {
    GlobBuilder::new(pattern).literal_separator(true).build()
}

/// Walks a root directory and returns the sorted, deduplicated list of
/// root-relative file paths that survive the ignore patterns.
#[derive(Debug)]
pub struct Collector<'a> {
    root: &'a Path,
    matcher: IgnoreMatcher,
}

impl<'a> Collector<'a> {
    pub fn new(root: &'a Path, patterns: &[String], strict: bool) -> Result<Self> {
        Ok(Self {
            root,
            matcher: IgnoreMatcher::new(patterns, strict)?,
        })
    }

    pub fn matcher(&self) -> &IgnoreMatcher {
        &self.matcher
    }

    pub fn collect(&self) -> Result<Vec<String>> {
        log::info!("Walking project directory: {}", self.root.display());
        let root = self.root;
        let matcher = &self.matcher;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                match relative_path_string(root, entry.path()) {
                    Some(rel) if matcher.prunes_dir(&rel) => {
                        log::trace!("Skipping ignored directory: {}", rel);
                        false
                    }
                    _ => true,
                }
            });

        let mut files = Vec::new();
        for entry_result in walker {
            let entry = entry_result?;
            if entry.depth() == 0 || entry.file_type().is_dir() {
                continue;
            }
            let Some(rel) = relative_path_string(root, entry.path()) else {
                log::warn!("Could not get relative path for: {}", entry.path().display());
                continue;
            };
            if entry.file_name() == CONFIG_FILENAME {
                log::trace!("Skipping config file: {}", rel);
                continue;
            }
            if matcher.is_ignored(&rel) {
                log::trace!("Excluding file: {}", rel);
                continue;
            }
            log::trace!("Including file: {}", rel);
            files.push(rel);
        }

        files.sort();
        files.dedup();
        log::info!("Directory walk complete. Found {} files.", files.len());
        Ok(files)
    }
}

/// Collects with lenient pattern handling.
pub fn collect_files(root: &Path, patterns: &[String]) -> Result<Vec<String>> {
    Collector::new(root, patterns, false)?.collect()
}

/// `path` relative to `root`, `/`-joined. `None` when `path` is not below `root`.
pub fn relative_path_string(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    normalize_relative(rel)
}

/// Folds `.` and `..` lexically. `None` when the path is empty or climbs
/// above its starting point.
fn normalize_relative(rel: &Path) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Removes `.` and `..` from an absolute path without touching the disk.
fn lexical_clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    cleaned.push(component);
                }
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}

/// Where `path` sits below `root`, `/`-joined. Relative paths are taken as
/// root-relative. The parent directory of an absolute path is resolved on disk
/// when it exists so symlinked roots still compare equal.
fn root_relative(root: &Path, path: &Path) -> Option<String> {
    if !path.is_absolute() {
        return normalize_relative(path);
    }
    let resolved = match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => parent
            .canonicalize()
            .map(|p| p.join(name))
            .unwrap_or_else(|_| lexical_clean(path)),
        _ => lexical_clean(path),
    };
    pathdiff::diff_paths(resolved, lexical_clean(root)).and_then(|p| normalize_relative(&p))
}

/// Drops every collected path that names one of `excluded`. Entries of
/// `excluded` may be absolute or relative to `root`; those outside `root` are
/// ignored.
pub fn without_paths<P: AsRef<Path>>(
    files: Vec<String>,
    root: &Path,
    excluded: &[P],
) -> Vec<String> {
    let targets: Vec<String> = excluded
        .iter()
        .filter_map(|p| {
            let rel = root_relative(root, p.as_ref());
            if rel.is_none() {
                log::debug!("{} is outside the project root", p.as_ref().display());
            }
            rel
        })
        .collect();
    if targets.is_empty() {
        return files;
    }
    files
        .into_iter()
        .filter(|f| {
            if targets.contains(f) {
                log::info!("Skipping from collection: {}", f);
                false
            } else {
                true
            }
        })
        .collect()
}

/// Drops the output artifact from the collected paths so a run never reads
/// the file it is about to replace.
pub fn without_output(files: Vec<String>, root: &Path, output: &Path) -> Vec<String> {
    without_paths(files, root, &[output])
}
