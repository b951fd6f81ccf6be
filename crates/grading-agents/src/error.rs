// crates/grading-agents/src/error.rs
// ============================================================================
// Module: Agent Errors
// Description: Errors raised by LLM-backed agents and the transcription client.
// Purpose: Give the driver a stable, matchable error taxonomy per agent call.
// Dependencies: thiserror
// ============================================================================

// ============================================================================
// SECTION: Agent Error
// ============================================================================

use thiserror::Error;

/// Errors raised by an LLM-backed agent call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// The agent's prompt template failed to render from its inputs.
    #[error("prompt template failed to render")]
    PromptRender,
    /// The underlying transport (HTTP request) failed.
    #[error("agent transport failure: {0}")]
    Transport(String),
    /// The agent call did not complete within its budget.
    #[error("agent call timed out")]
    Timeout,
    /// The model's response could not be parsed as JSON for this stage.
    #[error("malformed output from stage {stage}")]
    MalformedOutput {
        /// Name of the stage whose output failed to parse.
        stage: &'static str,
    },
    /// The model's JSON response did not satisfy the stage's output schema.
    #[error("schema violation in field {field}")]
    SchemaViolation {
        /// Dotted path of the offending field.
        field: String,
    },
}

// ============================================================================
// SECTION: Transcription Error
// ============================================================================

/// Errors raised by a [`crate::transcription::TranscriptionClient`] call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranscriptionError {
    /// The transcription provider returned an error for one phase.
    #[error("transcription provider failed for phase {phase}")]
    ProviderError {
        /// Phase whose audio failed to transcribe.
        phase: grading_core::domain::Phase,
    },
    /// The transcription call did not complete within its budget.
    #[error("transcription timed out")]
    Timeout,
}
