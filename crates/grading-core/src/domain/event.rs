// crates/grading-core/src/domain/event.rs
// ============================================================================
// Module: Event
// Description: One entry in a submission's append-only, replayable event log.
// Purpose: Let clients poll or replay pipeline progress in strict order.
// Dependencies: serde, chrono
// ============================================================================

//! ## Overview
//! Events are appended in strictly increasing [`crate::identifiers::EventOrdinal`]
//! order per submission. The four phase-named statuses are always emitted in
//! canonical phase order even though the Phase Panel runs the four evaluators
//! concurrently (the driver serializes emission, not execution).

// ============================================================================
// SECTION: Imports
// ============================================================================

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::Phase;
use crate::identifiers::EventOrdinal;
use crate::identifiers::SubmissionId;

// ============================================================================
// SECTION: Event Status
// ============================================================================

/// The lifecycle/progress status carried by one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Submission accepted, not yet picked up.
    Queued,
    /// Driver has begun processing.
    Processing,
    /// Clarify phase evaluator has produced its judgement.
    Clarify,
    /// Estimate phase evaluator has produced its judgement.
    Estimate,
    /// Design phase evaluator has produced its judgement.
    Design,
    /// Explain phase evaluator has produced its judgement.
    Explain,
    /// Aggregator and Plan/Outline Generator are synthesizing the result.
    Synthesizing,
    /// Pipeline finished successfully.
    Complete,
    /// Pipeline finished with an unrecoverable error.
    Failed,
}

// ============================================================================
// SECTION: Event
// ============================================================================

/// One entry in a submission's event log.
///
/// # Invariants
/// - `ordinal` is strictly increasing within a submission, starting at
///   [`EventOrdinal::FIRST`], with no gaps.
/// - `progress`, when present, lies in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Submission this event belongs to.
    pub submission_id: SubmissionId,
    /// Strictly increasing position of this event in the submission's log.
    pub ordinal: EventOrdinal,
    /// Status this event reports.
    pub status: EventStatus,
    /// Human-readable progress message.
    pub message: String,
    /// Phase this event concerns, when the status is phase-specific.
    pub phase: Option<Phase>,
    /// Fractional progress indicator, when meaningful for the status.
    pub progress: Option<f64>,
    /// Time the event was recorded.
    pub created_at: DateTime<Utc>,
}
