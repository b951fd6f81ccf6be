// crates/grading-driver/src/error.rs
// ============================================================================
// Module: Driver Errors
// Description: The top-level error taxonomy a CLI or embedder matches on.
// Purpose: Give every fatal pipeline failure a stable kind and reason tag.
// Dependencies: grading-core, thiserror
// ============================================================================

//! ## Overview
//! Every variant here corresponds to exactly one of the driver-level error
//! kinds: an unknown submission, a malformed intake, a failed external
//! call, a missing scratch slot, a contract violation, or a storage write
//! failure. [`DriverError::reason_tag`] renders the short string recorded
//! on a submission's terminal `failed` event; it is not the `Display`
//! message, which stays human-readable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use grading_core::domain::Phase;
use thiserror::Error;

// ============================================================================
// SECTION: Driver Error
// ============================================================================

/// Fatal errors raised while driving one submission through the pipeline.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The submission (or a problem it references) does not exist.
    #[error("not found")]
    NotFound,
    /// The submission's stored data does not meet the pipeline's
    /// preconditions (e.g. a phase is missing its captured artifact).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The transcription stage failed for `Phase`, including a stall past
    /// the stage's budget.
    #[error("transcription failed for phase {0}")]
    TranscriptionFailed(Phase),
    /// An agent call failed, returned unparseable output, or timed out.
    #[error("agent execution failed at stage {stage}")]
    AgentExecutionFailed {
        /// Name of the stage that failed.
        stage: &'static str,
    },
    /// A scratch slot expected to hold a stage's output was empty.
    #[error("missing intermediate result in slot {slot}")]
    MissingIntermediate {
        /// Name of the empty slot.
        slot: &'static str,
    },
    /// The Contract Guard found an unrepairable violation.
    #[error("contract violation: {field}")]
    ContractViolation {
        /// Dotted path of the offending field.
        field: String,
    },
    /// A write to the submission store or event log failed.
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),
    /// Releasing the run's scratch session failed. Non-fatal: this never
    /// aborts a run or triggers a `failed` transition, it is only surfaced
    /// through [`grading_core::metrics::PipelineMetrics`].
    #[error("session cleanup failed: {0}")]
    SessionCleanupFailed(String),
}

impl DriverError {
    /// Renders the short, stable reason string recorded on the terminal
    /// `failed` event for this error.
    #[must_use]
    pub fn reason_tag(&self) -> String {
        match self {
            Self::NotFound => "not_found".to_owned(),
            Self::InvalidInput(_) => "invalid_input".to_owned(),
            Self::TranscriptionFailed(phase) => format!("transcription_failed: {phase}"),
            Self::AgentExecutionFailed { stage } => format!("agent_execution_failed: {stage}"),
            Self::MissingIntermediate { slot } => format!("missing_phase_output: {slot}"),
            Self::ContractViolation { field } => format!("contract_violation: {field}"),
            Self::PersistenceFailed(_) => "persistence_failed".to_owned(),
            Self::SessionCleanupFailed(_) => "session_cleanup_failed".to_owned(),
        }
    }
}
