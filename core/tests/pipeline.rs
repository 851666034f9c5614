//! Collector → packager → tree on real directories.

use snipcode_core::{
    AppError, CONFIG_FILENAME, Collector, Packager, collect_files, render_tree, without_output,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn add_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dirs");
    }
    fs::write(path, content).expect("Failed to write file");
}

fn sample_project() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    add_file(dir.path(), "a/one.txt", "hi");
    add_file(dir.path(), "a/two.txt", "yo\n");
    add_file(dir.path(), "b.txt", "");
    dir
}

#[test]
fn end_to_end_scenario() {
    let project = sample_project();
    let files = collect_files(project.path(), &[]).unwrap();
    assert_eq!(files, vec!["a/one.txt", "a/two.txt", "b.txt"]);

    assert_eq!(
        render_tree(&files),
        ".\n├── a\n│   ├── one.txt\n│   └── two.txt\n└── b.txt\n"
    );

    let out = project.path().join("comp_code.txt");
    let package = Packager::new(project.path())
        .with_tree(true)
        .write(&out, &files)
        .unwrap();
    assert_eq!(package.files.len(), 3);
    assert_eq!(package.total_chars, 5);

    let expected = "\
## a/one.txt

cat <<SNIPCODE_HEREDOC
hi
SNIPCODE_HEREDOC

---

## a/two.txt

cat <<SNIPCODE_HEREDOC
yo
SNIPCODE_HEREDOC

---

## b.txt

cat <<SNIPCODE_HEREDOC
SNIPCODE_HEREDOC

---

## File Tree

.
├── a
│   ├── one.txt
│   └── two.txt
└── b.txt
";
    assert_eq!(fs::read_to_string(&out).unwrap(), expected);
}

#[test]
fn second_run_does_not_ingest_previous_artifact() {
    let project = sample_project();
    let out = project.path().join("comp_code.txt");

    for _ in 0..2 {
        let files = collect_files(project.path(), &[]).unwrap();
        let files = without_output(files, project.path(), &out);
        assert!(!files.iter().any(|f| f == "comp_code.txt"));
        Packager::new(project.path()).write(&out, &files).unwrap();
    }
    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(text.matches("## ").count(), 3);
}

#[test]
fn config_file_is_never_collected() {
    let project = sample_project();
    add_file(project.path(), CONFIG_FILENAME, "ignore_patterns: []\n");
    let files = collect_files(project.path(), &[]).unwrap();
    assert!(!files.iter().any(|f| f.ends_with(CONFIG_FILENAME)));
}

#[test]
fn ignored_directories_vanish_from_tree() {
    let project = sample_project();
    add_file(project.path(), "dist/bundle/app.js", "x");
    add_file(project.path(), "assets/logo.png", "png");
    let patterns = vec!["dist/**".to_string(), "*.png".to_string()];
    let files = Collector::new(project.path(), &patterns, true)
        .unwrap()
        .collect()
        .unwrap();

    let tree = render_tree(&files);
    assert!(!tree.contains("dist"));
    assert!(!tree.contains("assets"));
}

#[cfg(unix)]
#[test]
fn unreadable_file_leaves_no_artifact() {
    let project = sample_project();
    std::os::unix::fs::symlink(project.path().join("missing"), project.path().join("c.txt"))
        .unwrap();
    let files = collect_files(project.path(), &[]).unwrap();
    assert!(files.contains(&"c.txt".to_string()));

    let out = project.path().join("comp_code.txt");
    let err = Packager::new(project.path()).write(&out, &files).unwrap_err();
    assert!(matches!(err, AppError::FileRead { .. }));
    assert!(!out.exists());
}

#[test]
fn missing_root_is_a_traversal_error() {
    let project = sample_project();
    let missing = project.path().join("nope");
    let err = collect_files(&missing, &[]).unwrap_err();
    match err {
        AppError::WalkDir { path, .. } => assert_eq!(path, missing),
        other => panic!("expected a walk error, got {other:?}"),
    }
}
