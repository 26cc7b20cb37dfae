//! External migration engine invocation.
//!
//! The engine is called as `<program> <dialect> <connection> <subcommand>`
//! from the application's `migrations/` directory. Its stdout and stderr share
//! one pipe, so the captured output keeps the order the engine wrote it in.

use crate::config::Dialect;
use crate::error::{MigrationError, Result};
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::{debug, info};

/// Engine program used when none is configured.
pub const DEFAULT_ENGINE: &str = "goose";

/// Directory holding migration files, relative to the application root.
pub const MIGRATIONS_DIR: &str = "migrations";

/// Exit code used when the engine exits unsuccessfully.
pub const ENGINE_FAILURE_EXIT_CODE: i32 = 1;

/// Operation forwarded to the migration engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subcommand {
    /// Migrate to the most recent version.
    Up,
    /// Roll back one version.
    Down,
    /// Re-run the latest migration.
    Redo,
    /// Dump migration status.
    Status,
    /// Print the current database version.
    Version,
}

impl Subcommand {
    /// All subcommands.
    pub const ALL: [Self; 5] = [Self::Up, Self::Down, Self::Redo, Self::Status, Self::Version];

    /// Token passed to the engine.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Redo => "redo",
            Self::Status => "status",
            Self::Version => "version",
        }
    }
}

impl std::fmt::Display for Subcommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a migrate command ended once the engine ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOutcome {
    /// The engine exited successfully.
    Completed,
    /// The engine exited unsuccessfully; the host process must terminate
    /// with `code` without showing usage.
    Fatal {
        /// Exit code for the host process.
        code: i32,
        /// Engine status description.
        message: String,
    },
}

impl EngineOutcome {
    /// Whether the outcome requires terminating the process.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }
}

/// Captured result of one engine run.
#[derive(Debug, Clone)]
pub struct EngineReport {
    /// Combined stdout and stderr.
    pub output: Vec<u8>,
    /// Exit status.
    pub status: ExitStatus,
}

impl EngineReport {
    /// Combined output as text.
    #[must_use]
    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Map the exit status onto the command outcome.
    #[must_use]
    pub fn outcome(&self) -> EngineOutcome {
        if self.status.success() {
            EngineOutcome::Completed
        } else {
            EngineOutcome::Fatal {
                code: ENGINE_FAILURE_EXIT_CODE,
                message: self.status.to_string(),
            }
        }
    }
}

/// Handle on the external migration engine.
#[derive(Debug, Clone)]
pub struct MigrationEngine {
    program: PathBuf,
    working_dir: PathBuf,
}

impl MigrationEngine {
    /// Create an engine handle without checking that the program exists.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Resolve `program` on `PATH` and target `<app_root>/migrations`.
    pub fn locate(program: &str, app_root: &Path) -> Result<Self> {
        let program = resolve_program(program)?;
        Ok(Self::new(program, app_root.join(MIGRATIONS_DIR)))
    }

    /// Resolved program path.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Directory the engine runs in.
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Positional arguments for one invocation.
    #[must_use]
    pub fn arguments(dialect: Dialect, connection: &str, subcommand: Subcommand) -> [String; 3] {
        [
            dialect.as_str().to_string(),
            connection.to_string(),
            subcommand.as_str().to_string(),
        ]
    }

    /// Run the engine to completion and capture its combined output.
    ///
    /// A non-zero exit is reported through [`EngineReport::outcome`], not as
    /// an error. No timeout is applied. The engine is killed if the returned
    /// future is dropped or capture fails.
    pub async fn invoke(
        &self,
        dialect: Dialect,
        connection: &str,
        subcommand: Subcommand,
    ) -> Result<EngineReport> {
        info!(
            program = %self.program.display(),
            dir = %self.working_dir.display(),
            %dialect,
            %subcommand,
            "Running migration engine"
        );

        let (mut reader, writer) = os_pipe::pipe()?;

        let mut command = Command::new(&self.program);
        command
            .args(Self::arguments(dialect, connection, subcommand))
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer)
            .kill_on_drop(true);

        let spawned = command.spawn();
        // The command holds the parent's write ends until dropped.
        drop(command);
        let mut child = spawned.map_err(|source| MigrationError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let output = tokio::task::spawn_blocking(move || {
            let mut output = Vec::new();
            reader.read_to_end(&mut output).map(|_| output)
        })
        .await
        .map_err(std::io::Error::other)??;

        let status = child.wait().await?;
        debug!(%status, bytes = output.len(), "Migration engine exited");

        Ok(EngineReport { output, status })
    }
}

/// Find an executable for `program`.
///
/// Names containing a path separator are checked directly; bare names are
/// searched for on `PATH`.
pub fn resolve_program(program: &str) -> Result<PathBuf> {
    resolve_program_in(program, std::env::var_os("PATH"))
}

/// Like [`resolve_program`], searching the given `PATH` value.
pub fn resolve_program_in(program: &str, path_var: Option<OsString>) -> Result<PathBuf> {
    if program.is_empty() {
        return Err(MigrationError::unresolved(program));
    }

    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return if is_executable(candidate) {
            Ok(candidate.to_path_buf())
        } else {
            Err(MigrationError::unresolved(program))
        };
    }

    path_var
        .iter()
        .flat_map(|paths| std::env::split_paths(paths).collect::<Vec<_>>())
        .flat_map(|dir| executable_names(program).map(move |name| dir.join(name)))
        .find(|path| is_executable(path))
        .ok_or_else(|| MigrationError::unresolved(program))
}

fn executable_names(program: &str) -> impl Iterator<Item = String> {
    let mut names = vec![program.to_string()];
    if cfg!(windows) {
        names.push(format!("{program}.exe"));
    }
    names.into_iter()
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
