use crate::error::{AppError, Result};
use crate::tree::render_tree;
use log;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const HEREDOC_MARKER: &str = "SNIPCODE_HEREDOC";
pub const BLOCK_SEPARATOR: &str = "---";
pub const TREE_HEADER: &str = "## File Tree";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludedFile {
    pub path: String,
    pub size: usize,
}

/// The assembled artifact plus what went into it.
#[derive(Debug, Clone, Default)]
pub struct Package {
    pub content: Vec<u8>,
    pub files: Vec<IncludedFile>,
    pub total_chars: usize,
    pub tree_included: bool,
}

/// Reads the collected files below `root` and lays them out as heredoc blocks,
/// optionally followed by the file tree.
#[derive(Debug, Clone)]
pub struct Packager<'a> {
    root: &'a Path,
    include_tree: bool,
}

impl<'a> Packager<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self {
            root,
            include_tree: false,
        }
    }

    pub fn with_tree(mut self, include_tree: bool) -> Self {
        self.include_tree = include_tree;
        self
    }

    /// Builds the whole artifact in memory. Any unreadable file fails the build.
    pub fn build(&self, files: &[String]) -> Result<Package> {
        let mut package = Package {
            tree_included: self.include_tree,
            ..Package::default()
        };

        for rel in files {
            let path = self.root.join(rel);
            let data = fs::read(&path).map_err(|e| {
                log::error!("Error reading file {}: {}", path.display(), e);
                AppError::FileRead {
                    path: path.clone(),
                    source: e,
                }
            })?;
            write_block(&mut package.content, rel, &data);

            package.total_chars += data.len();
            package.files.push(IncludedFile {
                path: rel.clone(),
                size: data.len(),
            });
            log::debug!("Included {} ({} chars)", rel, data.len());
        }

        if self.include_tree {
            log::debug!("Generating file tree...");
            write_tree_section(&mut package.content, &render_tree(files));
        }

        Ok(package)
    }

    /// Builds the artifact and replaces `output` with it in one step.
    /// Nothing is written when any input fails to read.
    pub fn write(&self, output: &Path, files: &[String]) -> Result<Package> {
        let package = self.build(files)?;
        persist_atomically(output, &package.content)?;
        log::info!(
            "Wrote {}: {} files, {} total content chars",
            output.display(),
            package.files.len(),
            package.total_chars
        );
        Ok(package)
    }
}

/// One file as `## <path>`, a blank line, then the content between heredoc
/// markers. A newline is added before the closing marker when the content
/// does not already end with one.
pub fn write_block(buf: &mut Vec<u8>, display_path: &str, data: &[u8]) {
    buf.extend_from_slice(format!("## {}\n\ncat <<{}\n", display_path, HEREDOC_MARKER).as_bytes());
    buf.extend_from_slice(data);
    if data.last().is_some_and(|b| *b != b'\n') {
        buf.push(b'\n');
    }
    buf.extend_from_slice(format!("{}\n\n{}\n\n", HEREDOC_MARKER, BLOCK_SEPARATOR).as_bytes());
}

pub fn write_tree_section(buf: &mut Vec<u8>, tree: &str) {
    buf.extend_from_slice(format!("{}\n\n", TREE_HEADER).as_bytes());
    buf.extend_from_slice(tree.as_bytes());
    if !tree.is_empty() && !tree.ends_with('\n') {
        buf.push(b'\n');
    }
}

/// Writes through a temporary file in the destination directory and renames
/// it over `path`, so readers see either the old file or the complete new one.
pub fn persist_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| AppError::DirCreation {
        path: parent.clone(),
        source: e,
    })?;

    let write_err = |e: std::io::Error| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    };
    let mut tmp = NamedTempFile::new_in(&parent).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o644)).map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| {
        log::error!("Error writing output file {}: {}", path.display(), e.error);
        write_err(e.error)
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn block(path: &str, data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        write_block(&mut buf, path, data);
        buf
    }

    /// Returns the bytes between the opening and closing marker lines.
    fn extract_body(block: &[u8]) -> &[u8] {
        let open = format!("cat <<{}\n", HEREDOC_MARKER);
        let close = format!("{}\n\n{}\n\n", HEREDOC_MARKER, BLOCK_SEPARATOR);
        let start = block
            .windows(open.len())
            .position(|w| w == open.as_bytes())
            .unwrap()
            + open.len();
        &block[start..block.len() - close.len()]
    }

    #[test]
    fn block_layout_is_stable() {
        assert_eq!(
            block("src/main.rs", b"fn main() {}\n"),
            b"## src/main.rs\n\ncat <<SNIPCODE_HEREDOC\nfn main() {}\nSNIPCODE_HEREDOC\n\n---\n\n"
        );
    }

    #[test]
    fn missing_trailing_newline_is_added_once() {
        let out = block("a.txt", b"hi");
        assert_eq!(extract_body(&out), b"hi\n");

        let out = block("a.txt", b"yo\n");
        assert_eq!(extract_body(&out), b"yo\n");
    }

    #[test]
    fn empty_file_gets_no_padding() {
        let out = block("empty", b"");
        assert_eq!(
            out,
            b"## empty\n\ncat <<SNIPCODE_HEREDOC\nSNIPCODE_HEREDOC\n\n---\n\n"
        );
    }

    #[test]
    fn content_is_embedded_verbatim() {
        let tricky: &[u8] = b"line\nSNIPCODE_HEREDOC inside\n\xff\xfe raw\r\nend";
        let out = block("bin.dat", tricky);
        let body = extract_body(&out);
        assert_eq!(&body[..tricky.len()], tricky);
        assert_eq!(body.len(), tricky.len() + 1);
    }

    #[test]
    fn tree_section_ends_with_newline() {
        let mut buf = Vec::new();
        write_tree_section(&mut buf, ".\n└── a\n");
        assert_eq!(buf, "## File Tree\n\n.\n└── a\n".as_bytes());

        let mut buf = Vec::new();
        write_tree_section(&mut buf, ".");
        assert_eq!(buf, b"## File Tree\n\n.\n");
    }

    #[test]
    fn build_counts_content_and_appends_tree() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/one.txt"), "hi").unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        let files = vec!["a/one.txt".to_string(), "b.txt".to_string()];

        let package = Packager::new(dir.path()).with_tree(true).build(&files).unwrap();
        assert_eq!(package.total_chars, 2);
        assert_eq!(
            package.files,
            vec![
                IncludedFile { path: "a/one.txt".into(), size: 2 },
                IncludedFile { path: "b.txt".into(), size: 0 },
            ]
        );
        let text = String::from_utf8(package.content).unwrap();
        assert!(text.starts_with("## a/one.txt\n\ncat <<SNIPCODE_HEREDOC\nhi\nSNIPCODE_HEREDOC\n"));
        assert!(text.ends_with("## File Tree\n\n.\n├── a\n│   └── one.txt\n└── b.txt\n"));
    }

    #[test]
    fn missing_file_aborts_without_writing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ok.txt"), "fine").unwrap();
        let out = dir.path().join("out.txt");
        let files = vec!["ok.txt".to_string(), "gone.txt".to_string()];

        let err = Packager::new(dir.path()).write(&out, &files).unwrap_err();
        assert!(matches!(err, AppError::FileRead { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn failed_run_leaves_previous_artifact_untouched() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.txt");
        fs::write(&out, "previous").unwrap();
        let files = vec!["gone.txt".to_string()];

        assert!(Packager::new(dir.path()).write(&out, &files).is_err());
        assert_eq!(fs::read_to_string(&out).unwrap(), "previous");
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("x.rs"), "x").unwrap();
        let out = dir.path().join("build/out/all.txt");
        Packager::new(dir.path())
            .write(&out, &["x.rs".to_string()])
            .unwrap();
        assert!(fs::read_to_string(out).unwrap().contains("## x.rs"));
    }
}
