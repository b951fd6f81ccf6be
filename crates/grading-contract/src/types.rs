// crates/grading-contract/src/types.rs
// ============================================================================
// Module: Contract Types
// Description: The exact shape of FinalResult as published to API clients.
// Purpose: Give the Final Assembler and Contract Guard one canonical type.
// Dependencies: grading-core, serde, serde_json, chrono
// ============================================================================

//! ## Overview
//! `FinalResult` is the only document the Contract Guard ever certifies and
//! the Submission Store ever caches. `result_version` is pinned to
//! [`RESULT_VERSION`] for every result produced by this workspace; the v1
//! shape a [`grading_core::runtime::legacy`] uplift produces is read-path
//! only and never constructed here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::Utc;
use grading_core::domain::NextAttemptItem;
use grading_core::domain::Noticed;
use grading_core::domain::Phase;
use grading_core::domain::Radar;
use grading_core::domain::ReferenceOutline;
use grading_core::domain::RubricItemScore;
use grading_core::domain::TranscriptCitation;
use grading_core::domain::Verdict;
use grading_core::identifiers::ProblemId;
use grading_core::identifiers::SubmissionId;
use serde::Deserialize;
use serde::Serialize;

/// The `result_version` every `FinalResult` produced by this workspace
/// carries. Historical v1 rows are uplifted for display, never written
/// back at this version.
pub const RESULT_VERSION: u32 = 2;

// ============================================================================
// SECTION: Problem Summary
// ============================================================================

/// The slice of a `Problem` published alongside a graded result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSummary {
    /// Problem identifier.
    pub id: ProblemId,
    /// Human-readable problem name.
    pub name: String,
    /// Difficulty tag (e.g. "easy", "medium", "hard").
    pub difficulty: String,
}

// ============================================================================
// SECTION: Per-Phase Score and Evidence
// ============================================================================

/// One phase's score and bullet observations in the final result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseScore {
    /// Score in `[0, 10]`.
    pub score: f64,
    /// Bullet observations from the phase evaluator.
    pub bullets: Vec<String>,
}

/// The evidence published for one phase in the final result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseEvidence {
    /// URL of the canvas snapshot cited as evidence.
    pub snapshot_url: String,
    /// Transcript excerpts cited as evidence, each with its timestamp.
    pub transcripts: Vec<TranscriptCitation>,
    /// Strength/issue pair the evaluator noticed in this phase.
    pub noticed: Noticed,
}

// ============================================================================
// SECTION: Tagged Notes
// ============================================================================

/// One strength or weakness, tagged with the phase it was observed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedNote {
    /// Phase the note was observed in.
    pub phase: Phase,
    /// Note text.
    pub text: String,
    /// Timestamp the note refers to, when it is tied to a specific moment.
    pub timestamp_sec: Option<u32>,
}

// ============================================================================
// SECTION: Final Result
// ============================================================================

/// The complete, contract-exact graded result for one submission.
///
/// # Invariants
/// - `result_version` equals [`RESULT_VERSION`].
/// - `phase_scores` and `evidence` each have exactly the four
///   [`Phase`] keys.
/// - `rubric` is non-empty.
/// - `next_attempt_plan` has exactly 3 entries.
/// - `follow_up_questions` has at least 3 entries.
/// - `reference_outline.sections` has between 4 and 6 entries.
/// - `graded_at` is not earlier than `submitted_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalResult {
    /// Contract version; always [`RESULT_VERSION`] for results this
    /// workspace produces.
    pub result_version: u32,
    /// Submission this result grades.
    pub submission_id: SubmissionId,
    /// Problem the submission targeted.
    pub problem: ProblemSummary,
    /// Score and bullets in `[0, 10]` for each of the four phases.
    pub phase_scores: BTreeMap<Phase, PhaseScore>,
    /// Cited evidence for each of the four phases.
    pub evidence: BTreeMap<Phase, PhaseEvidence>,
    /// Scored rubric criteria.
    pub rubric: Vec<RubricItemScore>,
    /// Four-axis skill radar.
    pub radar: Radar,
    /// Mean of the four phase scores, rounded to one decimal place.
    pub overall_score: f64,
    /// Hiring recommendation.
    pub verdict: Verdict,
    /// Overall strengths observed across all phases, tagged by phase.
    pub strengths: Vec<TaggedNote>,
    /// Overall weaknesses observed across all phases, tagged by phase.
    pub weaknesses: Vec<TaggedNote>,
    /// Exactly 3 corrective actions for the candidate's next attempt.
    pub next_attempt_plan: Vec<NextAttemptItem>,
    /// At least 3 follow-up study questions.
    pub follow_up_questions: Vec<String>,
    /// Reference solution outline.
    pub reference_outline: ReferenceOutline,
    /// Time the submission was accepted.
    pub submitted_at: DateTime<Utc>,
    /// Time grading completed.
    pub graded_at: DateTime<Utc>,
}
