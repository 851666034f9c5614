use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use snipcode_core::AppError;
use std::io;

use crate::cli_args::{Cli, CompletionArgs};

pub fn handle_completion_command(args: &CompletionArgs) -> Result<()> {
    let shell_str = args.shell.as_deref().unwrap_or("fish");

    let shell_enum: Shell = match shell_str.to_lowercase().as_str() {
        "fish" => Shell::Fish,
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        _ => {
            anyhow::bail!(AppError::InvalidArgument(format!(
                "Unsupported shell for completion: {}",
                shell_str
            )));
        }
    };

    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();
    generate(shell_enum, &mut command, bin_name, &mut io::stdout());
    Ok(())
}
