//! CLI argument definitions using clap.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use forgeweb_config::DEFAULT_MODE;
use std::path::PathBuf;

use crate::commands::{self, CommandStatus};

/// Forgeweb - web application scaffolding and tooling
#[derive(Parser, Debug)]
#[command(name = "forgeweb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Application root directory
    #[arg(long, env = "FORGEWEB_APP_ROOT", default_value = ".", global = true)]
    pub app_root: PathBuf,

    /// Environment mode (dev, test, prod, ...)
    #[arg(short = 'e', long = "env", env = "FORGEWEB_ENV", default_value = DEFAULT_MODE, global = true)]
    pub mode: String,

    #[command(subcommand)]
    pub command: Commands,
}

const MIGRATE_LONG_ABOUT: &str = "Database migration management.

Pipes out to the external migration engine (goose by default), which runs from
the application's migrations/ directory. Migrations are generated into
migrations/.";

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Database migration management
    #[command(long_about = MIGRATE_LONG_ABOUT)]
    Migrate(commands::migrate::MigrateArgs),

    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Migrate(_) => "migrate",
            Self::Completions(_) => "completions",
        }
    }
}

impl Cli {
    /// Usage line of the selected command.
    pub fn usage(&self) -> String {
        let mut cmd = Self::command();
        cmd.build();
        match cmd.find_subcommand_mut(self.command.name()) {
            Some(sub) => sub.render_usage().to_string(),
            None => cmd.render_usage().to_string(),
        }
    }

    /// Execute the CLI command.
    pub async fn execute(self) -> Result<CommandStatus> {
        match self.command {
            Commands::Migrate(args) => {
                commands::migrate::execute(args, &self.app_root, &self.mode).await
            }
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
