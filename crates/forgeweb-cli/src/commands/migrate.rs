//! Migrate command - database migration management.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use forgeweb_config::SettingsLoader;
use forgeweb_migrate::{keys, pipeline, EngineOutcome, MigrationEngine, DEFAULT_ENGINE};
use std::io;
use std::path::Path;
use tracing::debug;

use super::CommandStatus;

/// Arguments for the migrate command.
#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommand,

    /// Database dialect (postgres or mysql), overriding config/database.toml
    #[arg(short = 'd', long = "db", global = true)]
    pub db: Option<String>,

    /// Migration engine program
    #[arg(long, env = "FORGEWEB_MIGRATE_ENGINE", default_value = DEFAULT_ENGINE, global = true)]
    pub engine: String,
}

/// Migrate subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateCommand {
    /// Migrate the DB to the most recent version available
    Up,

    /// Roll back the version by 1
    Down,

    /// Re-run the latest migration
    Redo,

    /// Dump the migration status for the current DB
    Status,

    /// Print the current version of the database
    Version,
}

impl From<MigrateCommand> for forgeweb_migrate::Subcommand {
    fn from(command: MigrateCommand) -> Self {
        match command {
            MigrateCommand::Up => Self::Up,
            MigrateCommand::Down => Self::Down,
            MigrateCommand::Redo => Self::Redo,
            MigrateCommand::Status => Self::Status,
            MigrateCommand::Version => Self::Version,
        }
    }
}

/// Execute the migrate command.
pub async fn execute(args: MigrateArgs, app_root: &Path, mode: &str) -> Result<CommandStatus> {
    let engine = MigrationEngine::locate(&args.engine, app_root)?;
    debug!(program = %engine.program().display(), "Migration engine found");

    let mut store = SettingsLoader::database(app_root)
        .mode(mode)
        .load()
        .with_context(|| format!("Failed to load database settings for '{mode}'"))?;

    if let Some(db) = args.db {
        store.set(keys::DB, db);
    }

    let outcome = pipeline::run(&mut store, &engine, args.command.into(), &mut io::stdout()).await?;

    Ok(match outcome {
        EngineOutcome::Completed => CommandStatus::Done,
        EngineOutcome::Fatal { code, message } => CommandStatus::Terminate { code, message },
    })
}
