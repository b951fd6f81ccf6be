// crates/grading-cli/src/main.rs
// ============================================================================
// Module: Grading Pipeline CLI Entry Point
// Description: Command dispatcher for local problem/submission intake and
//   pipeline runs.
// Purpose: Provide an operator-facing CLI substitute for the out-of-scope
//          HTTP/upload surface, plus run/replay/config commands.
// Dependencies: clap, grading-agents, grading-config, grading-contract,
//   grading-core, grading-driver, grading-store-sqlite, serde_json, tokio.
// ============================================================================

//! ## Overview
//! Five subcommands cover everything an operator needs to exercise the
//! pipeline locally without the HTTP API this workspace's spec puts out of
//! scope:
//! - `config validate` checks a TOML config file.
//! - `problem upsert` loads a `Problem` JSON file into the catalog.
//! - `submission create` loads a submission + its four artifacts from a
//!   JSON file and queues it.
//! - `run` drives one queued submission to a terminal state.
//! - `replay` prints a submission's event log as JSON lines.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod error;
mod intake;
mod prompts;
mod wiring;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use grading_config::GradingConfig;
use grading_core::domain::Problem;
use grading_core::identifiers::SubmissionId;
use grading_core::interfaces::EventSink;
use grading_core::interfaces::SubmissionStore;
use grading_core::Clock;
use grading_core::SystemClock;
use grading_store_sqlite::SqliteStore;

use crate::error::emit_error;
use crate::error::write_stdout_line;
use crate::error::CliError;
use crate::error::CliResult;
use crate::intake::validate_problem;
use crate::intake::SubmissionIntake;

// ============================================================================
// SECTION: CLI Surface
// ============================================================================

/// Local operator CLI for the grading pipeline.
#[derive(Parser, Debug)]
#[command(name = "grading-cli", disable_help_subcommand = true)]
struct Cli {
    /// Path to a TOML config file; defaults built in when absent.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration utilities.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Problem catalog utilities.
    Problem {
        #[command(subcommand)]
        command: ProblemCommand,
    },
    /// Submission intake utilities.
    Submission {
        #[command(subcommand)]
        command: SubmissionCommand,
    },
    /// Drives a queued submission through the pipeline.
    Run(RunCommand),
    /// Prints a submission's event log.
    Replay(ReplayCommand),
}

/// `config` subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validates a config file (or the built-in defaults).
    Validate,
}

/// `problem` subcommands.
#[derive(Subcommand, Debug)]
enum ProblemCommand {
    /// Inserts or replaces a catalog entry from a JSON file.
    Upsert(ProblemUpsertCommand),
}

/// `submission` subcommands.
#[derive(Subcommand, Debug)]
enum SubmissionCommand {
    /// Queues a submission and its four phase artifacts from a JSON file.
    Create(SubmissionCreateCommand),
}

/// Arguments for `problem upsert`.
#[derive(Args, Debug)]
struct ProblemUpsertCommand {
    /// Path to a `Problem` JSON file.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
}

/// Arguments for `submission create`.
#[derive(Args, Debug)]
struct SubmissionCreateCommand {
    /// Path to a submission intake JSON file.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Submission identifier to drive.
    #[arg(long, value_name = "ID")]
    submission_id: String,
}

/// Arguments for `replay`.
#[derive(Args, Debug)]
struct ReplayCommand {
    /// Submission identifier whose event log should be printed.
    #[arg(long, value_name = "ID")]
    submission_id: String,
    /// Only print events after this ordinal (exclusive).
    #[arg(long, value_name = "ORDINAL", action = ArgAction::Set)]
    after: Option<u64>,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = GradingConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;

    match cli.command {
        Commands::Config { command } => command_config(command, &config),
        Commands::Problem { command } => command_problem(command, &config),
        Commands::Submission { command } => command_submission(command, &config).await,
        Commands::Run(args) => command_run(args, &config).await,
        Commands::Replay(args) => command_replay(args, &config).await,
    }
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches `config` subcommands.
fn command_config(command: ConfigCommand, config: &GradingConfig) -> CliResult<()> {
    match command {
        ConfigCommand::Validate => {
            config.validate().map_err(|err| CliError::new(format!("config is invalid: {err}")))?;
            write_stdout_line("config is valid")
        }
    }
}

// ============================================================================
// SECTION: Problem Commands
// ============================================================================

/// Dispatches `problem` subcommands.
fn command_problem(command: ProblemCommand, config: &GradingConfig) -> CliResult<()> {
    match command {
        ProblemCommand::Upsert(args) => command_problem_upsert(args, config),
    }
}

/// Reads a `Problem` JSON file, re-validates its rubric, and upserts it.
fn command_problem_upsert(args: ProblemUpsertCommand, config: &GradingConfig) -> CliResult<()> {
    let bytes = std::fs::read(&args.input)
        .map_err(|err| CliError::new(format!("failed to read {}: {err}", args.input.display())))?;
    let problem: Problem = serde_json::from_slice(&bytes)
        .map_err(|err| CliError::new(format!("failed to parse {}: {err}", args.input.display())))?;
    validate_problem(&problem)?;

    let store = open_store(config)?;
    store.upsert_problem(&problem).map_err(|err| CliError::new(format!("failed to upsert problem: {err}")))?;
    write_stdout_line(&format!("upserted problem {}", problem.id))
}

// ============================================================================
// SECTION: Submission Commands
// ============================================================================

/// Dispatches `submission` subcommands.
async fn command_submission(command: SubmissionCommand, config: &GradingConfig) -> CliResult<()> {
    match command {
        SubmissionCommand::Create(args) => command_submission_create(args, config).await,
    }
}

/// Reads a submission intake JSON file and persists it in the `queued` state.
async fn command_submission_create(args: SubmissionCreateCommand, config: &GradingConfig) -> CliResult<()> {
    let bytes = std::fs::read(&args.input)
        .map_err(|err| CliError::new(format!("failed to read {}: {err}", args.input.display())))?;
    let intake: SubmissionIntake = serde_json::from_slice(&bytes)
        .map_err(|err| CliError::new(format!("failed to parse {}: {err}", args.input.display())))?;
    let (submission, artifacts) = intake.into_submission(SystemClock.now())?;

    let store = open_store(config)?;
    let submission_id = submission.id.clone();
    store
        .create(&submission, &artifacts)
        .await
        .map_err(|err| CliError::new(format!("failed to create submission: {err}")))?;
    write_stdout_line(&format!("queued submission {submission_id}"))
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Drives one queued submission to a terminal state.
async fn command_run(args: RunCommand, config: &GradingConfig) -> CliResult<()> {
    let store = Arc::new(open_store(config)?);
    let driver = wiring::build_driver(config, Arc::clone(&store))?;
    let id = SubmissionId::new(args.submission_id);
    driver.run(&id).await.map_err(|err| CliError::new(format!("pipeline run failed: {err}")))?;
    write_stdout_line(&format!("submission {id} reached a terminal state"))
}

// ============================================================================
// SECTION: Replay Command
// ============================================================================

/// Prints a submission's event log as JSON lines, in ordinal order.
async fn command_replay(args: ReplayCommand, config: &GradingConfig) -> CliResult<()> {
    let store = open_store(config)?;
    let id = SubmissionId::new(args.submission_id);
    let after = args.after.map(grading_core::identifiers::EventOrdinal::new);
    let events =
        store.list_since(&id, after).await.map_err(|err| CliError::new(format!("failed to replay events: {err}")))?;
    for event in &events {
        let line = serde_json::to_string(event)
            .map_err(|err| CliError::new(format!("failed to serialize event: {err}")))?;
        write_stdout_line(&line)?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Opens the SQLite store at `config.store_path`.
fn open_store(config: &GradingConfig) -> CliResult<SqliteStore> {
    SqliteStore::open(&config.store_path)
        .map_err(|err| CliError::new(format!("failed to open store at {}: {err}", config.store_path.display())))
}
