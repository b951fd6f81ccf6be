// crates/grading-core/src/interfaces/mod.rs
// ============================================================================
// Module: Interfaces
// Description: Backend-agnostic seams between the driver and its dependencies.
// Purpose: Let storage, transcription, and evaluation backends vary freely.
// Dependencies: async-trait, chrono, serde_json
// ============================================================================

//! ## Overview
//! Every external dependency the driver touches is expressed as a trait
//! here, following the same registry-friendly shape the rest of this
//! workspace uses for backend-agnostic interfaces: a small `#[async_trait]`
//! trait, implementations boxed as `Box<dyn Trait + Send + Sync>`, and a
//! single boxed error type so heterogeneous backends can share a registry
//! without a shared concrete error enum.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use serde_json::Value;

use crate::domain::Event;
use crate::domain::LifecycleState;
use crate::domain::Phase;
use crate::domain::PhaseArtifact;
use crate::domain::PhaseJudgement;
use crate::domain::Problem;
use crate::domain::Submission;
use crate::domain::TranscriptSnippet;
use crate::identifiers::EventOrdinal;
use crate::identifiers::ProblemId;
use crate::identifiers::SubmissionId;

// ============================================================================
// SECTION: Shared Error Type
// ============================================================================

/// Type-erased error shared by every interface in this module.
///
/// Concrete backends keep their own `thiserror` enum and box it here; this
/// lets the driver hold a registry of heterogeneous backends (e.g. a SQLite
/// store next to an in-memory one used in tests) behind one trait object
/// without forcing a shared error hierarchy.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ============================================================================
// SECTION: Submission Store
// ============================================================================

/// Durable storage for submissions.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persists a newly created submission together with its four phase
    /// artifacts, captured atomically at intake.
    async fn create(&self, submission: &Submission, artifacts: &[PhaseArtifact]) -> Result<(), BoxError>;

    /// Loads a submission by id, if it exists.
    async fn get(&self, id: &SubmissionId) -> Result<Option<Submission>, BoxError>;

    /// Atomically transitions a submission's lifecycle state.
    ///
    /// Implementations reject any transition out of a terminal state.
    async fn transition(
        &self,
        id: &SubmissionId,
        new_state: LifecycleState,
        completed_at: Option<DateTime<Utc>>,
        result_cache: Option<Value>,
    ) -> Result<(), BoxError>;

    /// Loads the artifacts captured for a submission, across all phases.
    async fn artifacts(&self, id: &SubmissionId) -> Result<Vec<PhaseArtifact>, BoxError>;

    /// Loads the transcript snippets captured for a submission.
    async fn transcripts(&self, id: &SubmissionId) -> Result<Vec<TranscriptSnippet>, BoxError>;

    /// Appends transcript snippets produced by the Transcription Provider.
    async fn append_transcripts(
        &self,
        id: &SubmissionId,
        snippets: &[TranscriptSnippet],
    ) -> Result<(), BoxError>;
}

// ============================================================================
// SECTION: Event Sink
// ============================================================================

/// Append-only, replayable event log for submissions.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Appends an event, assigning it the next ordinal for its submission.
    async fn append(&self, event: &Event) -> Result<(), BoxError>;

    /// Lists events for a submission starting at `after` (exclusive).
    async fn list_since(
        &self,
        id: &SubmissionId,
        after: Option<EventOrdinal>,
    ) -> Result<Vec<Event>, BoxError>;
}

// ============================================================================
// SECTION: Problem Catalog
// ============================================================================

/// Read-only access to the problem catalog.
#[async_trait]
pub trait ProblemCatalog: Send + Sync {
    /// Loads a problem definition by id.
    async fn get(&self, id: &ProblemId) -> Result<Option<Problem>, BoxError>;
}

// ============================================================================
// SECTION: Transcription Provider
// ============================================================================

/// Speech-to-text backend used during the transcription stage.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribes the audio captured for one phase of a submission.
    ///
    /// Implementations apply their own timeout and report it through
    /// [`BoxError`]; the driver additionally bounds the whole transcription
    /// stage with its own hard timeout.
    async fn transcribe(
        &self,
        submission_id: &SubmissionId,
        phase: Phase,
        audio_url: &str,
    ) -> Result<Vec<TranscriptSnippet>, BoxError>;
}

// ============================================================================
// SECTION: Phase Evaluator
// ============================================================================

/// One of the four phase-specific grading agents.
#[async_trait]
pub trait PhaseEvaluator: Send + Sync {
    /// The phase this evaluator grades.
    fn phase(&self) -> Phase;

    /// Produces a judgement for one phase of one submission.
    async fn evaluate(
        &self,
        problem: &Problem,
        artifact: &PhaseArtifact,
        transcripts: &[TranscriptSnippet],
    ) -> Result<PhaseJudgement, BoxError>;
}
