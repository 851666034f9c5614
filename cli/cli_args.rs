use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        long,
        help = "Specify the directory to collect (default: current dir).",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Use this file as the local config instead of <PROJECT_ROOT>/.grepattern.yaml.",
        value_name = "CONFIG_FILE",
        help_heading = "Project Setup"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        help = "Do not load the global config from the user config directory.",
        help_heading = "Project Setup"
    )]
    pub no_global: bool,

    #[arg(
        long,
        help = "Fail on malformed ignore patterns instead of skipping them.",
        help_heading = "Pattern Handling"
    )]
    pub strict_patterns: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "snipcode",
    author,
    version,
    about = "Collect & format code for LLM consumption.",
    long_about = "snipcode walks a project directory, skips paths matching the ignore patterns \nfrom .grepattern.yaml, and concatenates every remaining file into one text \nfile, optionally followed by a tree view of the included paths.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  snipcode init\n  snipcode compile --with-tree\n  snipcode compile -o context.txt --project-root ~/src/app\n  snipcode debug",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(about = "Generate .grepattern.yaml in the project root.")]
    Init(InitArgs),

    #[command(
        visible_alias = "init-admin",
        about = "Generate the global .grepattern.yaml with an exhaustive ignore list."
    )]
    InitGlobal(InitArgs),

    #[command(visible_alias = "c", about = "Build the compilation file.")]
    Compile(CompileArgs),

    #[command(
        visible_alias = "d",
        about = "Show the loaded configuration and the files compile would include."
    )]
    Debug(DebugArgs),

    #[command(about = "Print shell completion scripts.")]
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    #[arg(
        long,
        help = "Directory to write the local config into (default: current dir).",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(short, long, help = "Overwrite an existing config file.")]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompileArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,

    #[arg(
        short = 'o',
        long,
        help = "Override the output file (default: default_name from config).",
        value_name = "FILE",
        help_heading = "Output Control"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        help = "Append a file tree listing of the included paths.",
        help_heading = "Output Control"
    )]
    pub with_tree: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DebugArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        long,
        value_name = "SHELL",
        help = "Shell to generate completions for (fish, bash, zsh) [default: fish]"
    )]
    pub shell: Option<String>,
}
