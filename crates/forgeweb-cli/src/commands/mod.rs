//! CLI commands module.

pub mod completions;
pub mod migrate;

/// How a command finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStatus {
    /// The command completed.
    Done,
    /// The process must exit immediately with `code`, without usage text.
    Terminate {
        /// Process exit code.
        code: i32,
        /// Message printed before exiting.
        message: String,
    },
}
