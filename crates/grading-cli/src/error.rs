// crates/grading-cli/src/error.rs
// ============================================================================
// Module: CLI Error
// Description: Error wrapper and output helpers shared by every subcommand.
// Purpose: Give every fallible command one error type and one exit path.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every subcommand returns [`CliResult`]. [`main`](crate::main) turns an
//! `Err` into a stderr line and [`ExitCode::FAILURE`]; there is no i18n
//! catalog here, since this CLI has a single fixed audience (the operator
//! running the pipeline locally).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write as _;
use std::process::ExitCode;

use thiserror::Error;

// ============================================================================
// SECTION: Error
// ============================================================================

/// CLI error wrapper carrying a single human-readable message.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// CLI result alias for fallible operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
pub fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}").map_err(|err| CliError::new(format!("failed to write stdout: {err}")))
}

/// Writes a single line to stderr.
pub fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
pub fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
