//! Shell completions for the `forgeweb` binary.

use anyhow::{Context, Result};
use clap::{Args, CommandFactory};
use clap_complete::Shell;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

use super::CommandStatus;
use crate::cli::Cli;

/// Arguments for the completions command.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute the completions command.
pub fn execute(args: CompletionsArgs) -> Result<CommandStatus> {
    match args.output {
        Some(path) => {
            let mut file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            render(args.shell, &mut file)?;
            info!(shell = %args.shell, path = %path.display(), "Wrote completions");
        }
        None => render(args.shell, &mut io::stdout().lock())?,
    }
    Ok(CommandStatus::Done)
}

/// Render the completion script for `shell` into `out`.
fn render(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, bin, out);
    out.flush()?;
    Ok(())
}
