pub mod config;
pub mod error;
pub mod gather;
pub mod package;
pub mod scaffold;
pub mod tree;

pub use config::{
    CONFIG_FILENAME, Config, ConfigLayers, ConfigSource, DEFAULT_OUTPUT_NAME, EffectiveConfig,
};
pub use error::{AppError, Result};
pub use gather::{Collector, IgnoreMatcher, collect_files, without_output, without_paths};
pub use package::{IncludedFile, Package, Packager};
pub use scaffold::{ScaffoldScope, scaffold_config, write_scaffold};
pub use tree::{FileTree, render_tree};
