//! `tree`-style rendering of the included paths.
//!
//! The hierarchy is never read from disk. It is rebuilt on each call from the
//! flat path list, so a directory only shows up when at least one included
//! file lives somewhere below it.

use std::collections::{BTreeMap, BTreeSet};

pub const ROOT: &str = ".";

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TreeNode {
    /// Basenames of the immediate children, kept in sorted order.
    children: BTreeSet<String>,
    is_dir: bool,
}

/// Arena of nodes keyed by their `/`-joined path (`"."` for the root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTree {
    nodes: BTreeMap<String, TreeNode>,
}

impl FileTree {
    pub fn from_paths<S: AsRef<str>>(paths: &[S]) -> Self {
        log::debug!("Building tree structure from {} paths...", paths.len());
        let mut nodes = BTreeMap::new();
        nodes.insert(
            ROOT.to_string(),
            TreeNode {
                children: BTreeSet::new(),
                is_dir: true,
            },
        );

        for path in paths {
            let segments: Vec<&str> = path
                .as_ref()
                .split('/')
                .filter(|s| !s.is_empty() && *s != ".")
                .collect();
            let mut current = ROOT.to_string();

            for (i, segment) in segments.iter().enumerate() {
                let child = join(&current, segment);
                nodes
                    .entry(current)
                    .or_insert_with(|| TreeNode {
                        children: BTreeSet::new(),
                        is_dir: true,
                    })
                    .children
                    .insert(segment.to_string());

                let child_node = nodes.entry(child.clone()).or_default();
                if i < segments.len() - 1 {
                    child_node.is_dir = true;
                }
                current = child;
            }
        }

        Self { nodes }
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.nodes.get(path).is_some_and(|n| n.is_dir)
    }

    /// Sorted child basenames of `path`; empty for files and unknown paths.
    pub fn children(&self, path: &str) -> impl Iterator<Item = &str> {
        self.nodes
            .get(path)
            .into_iter()
            .flat_map(|n| n.children.iter().map(String::as_str))
    }

    pub fn render(&self) -> String {
        let mut out = String::from(ROOT);
        out.push('\n');
        self.render_level(ROOT, "", &mut out);
        out
    }

    fn render_level(&self, dir: &str, prefix: &str, out: &mut String) {
        let Some(node) = self.nodes.get(dir) else {
            return;
        };
        let last_index = node.children.len().saturating_sub(1);

        for (i, name) in node.children.iter().enumerate() {
            let is_last = i == last_index;
            let (connector, indent) = if is_last {
                (LAST_BRANCH, SPACE_INDENT)
            } else {
                (BRANCH, PIPE_INDENT)
            };

            out.push_str(prefix);
            out.push_str(connector);
            out.push_str(name);
            out.push('\n');

            let child = join(dir, name);
            if self.is_dir(&child) {
                let next_prefix = format!("{}{}", prefix, indent);
                self.render_level(&child, &next_prefix, out);
            }
        }
    }
}

/// Renders the tree for a list of root-relative paths.
pub fn render_tree<S: AsRef<str>>(paths: &[S]) -> String {
    FileTree::from_paths(paths).render()
}

fn join(parent: &str, name: &str) -> String {
    if parent == ROOT {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_renders_root_only() {
        let empty: [&str; 0] = [];
        assert_eq!(render_tree(&empty), ".\n");
    }

    #[test]
    fn renders_nested_tree() {
        let tree = render_tree(&["a/one.txt", "a/two.txt", "b.txt"]);
        assert_eq!(
            tree,
            ".\n├── a\n│   ├── one.txt\n│   └── two.txt\n└── b.txt\n"
        );
    }

    #[test]
    fn siblings_are_sorted_regardless_of_input_order() {
        let tree = render_tree(&["b/x.txt", "a/z.txt", "a/y.txt"]);
        assert_eq!(
            tree,
            ".\n├── a\n│   ├── y.txt\n│   └── z.txt\n└── b\n    └── x.txt\n"
        );
    }

    #[test]
    fn last_child_gets_blank_indent_for_descendants() {
        let tree = render_tree(&["d/p/1", "d/q/2", "d/r/3"]);
        let expected = "\
.
└── d
    ├── p
    │   └── 1
    ├── q
    │   └── 2
    └── r
        └── 3
";
        assert_eq!(tree, expected);
    }

    #[test]
    fn deep_paths_carry_prefixes_down() {
        let tree = render_tree(&["a/b/c/d.rs", "a/e.rs", "z.rs"]);
        let expected = "\
.
├── a
│   ├── b
│   │   └── c
│   │       └── d.rs
│   └── e.rs
└── z.rs
";
        assert_eq!(tree, expected);
    }

    #[test]
    fn files_are_leaves_and_directories_are_flagged() {
        let tree = FileTree::from_paths(&["src/lib.rs", "src/bin/main.rs", "README"]);
        assert!(tree.is_dir(ROOT));
        assert!(tree.is_dir("src"));
        assert!(tree.is_dir("src/bin"));
        assert!(!tree.is_dir("src/lib.rs"));
        assert!(!tree.is_dir("README"));
        assert_eq!(tree.children("src").collect::<Vec<_>>(), vec!["bin", "lib.rs"]);
        assert_eq!(tree.children("README").count(), 0);
    }

    #[test]
    fn only_directories_with_files_appear() {
        let tree = render_tree(&["keep/a.txt"]);
        assert!(!tree.contains("empty"));
        assert_eq!(tree.lines().count(), 3);
    }

    #[test]
    fn duplicate_and_dotted_segments_collapse() {
        let tree = render_tree(&["./a/x", "a/x", "a//y"]);
        assert_eq!(tree, ".\n└── a\n    ├── x\n    └── y\n");
    }

    #[test]
    fn backslash_is_part_of_the_name() {
        assert_eq!(render_tree(&["a\\b.txt"]), ".\n└── a\\b.txt\n");
        assert_eq!(
            render_tree(&["d/x\\y", "d/z"]),
            ".\n└── d\n    ├── x\\y\n    └── z\n"
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let paths = ["m/n.txt", "a.txt", "m/o/p.txt"];
        let reversed = ["m/o/p.txt", "a.txt", "m/n.txt"];
        assert_eq!(render_tree(&paths), render_tree(&paths));
        assert_eq!(render_tree(&paths), render_tree(&reversed));
    }
}
