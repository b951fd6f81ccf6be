// crates/grading-core/src/domain/judgement.rs
// ============================================================================
// Module: Phase Judgement
// Description: One Phase Evaluator's verdict for a single phase.
// Purpose: Carry a phase score plus the cited evidence into the Aggregator.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`PhaseJudgement`] is the output slot each of the four concurrent
//! Phase Evaluators writes into. Its `bullets` and evidence citations are
//! what the Aggregator and Contract Guard later fold into the public
//! `FinalResult` evidence section.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::domain::Phase;

// ============================================================================
// SECTION: Evidence
// ============================================================================

/// A strength/issue pair the evaluator noticed while grading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Noticed {
    /// What the candidate did well.
    pub strength: String,
    /// What the candidate could have done better.
    pub issue: String,
}

/// One transcript excerpt an evaluator cites, with the timestamp it refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptCitation {
    /// Offset in seconds the cited excerpt was spoken at.
    pub timestamp_sec: u32,
    /// Cited excerpt text.
    pub text: String,
}

/// Evidence backing a [`PhaseJudgement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// URL of the canvas snapshot the evaluator cites.
    pub snapshot_url: String,
    /// Transcript excerpts the evaluator cites.
    pub transcripts: Vec<TranscriptCitation>,
    /// Strength/issue pair extracted from the phase.
    pub noticed: Noticed,
}

// ============================================================================
// SECTION: Phase Judgement
// ============================================================================

/// One Phase Evaluator's assessment of a single phase.
///
/// # Invariants
/// - `score` lies in the closed interval `[0, 10]`.
/// - `bullets` has between 3 and 6 entries inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseJudgement {
    /// Phase this judgement covers.
    pub phase: Phase,
    /// Score in `[0, 10]`.
    pub score: f64,
    /// Between 3 and 6 bullet observations.
    pub bullets: Vec<String>,
    /// Cited evidence.
    pub evidence: Evidence,
    /// What the candidate did well in this phase.
    pub strengths: Vec<String>,
    /// What the candidate could improve in this phase.
    pub weaknesses: Vec<String>,
    /// Notable moments worth surfacing verbatim.
    pub highlights: Vec<String>,
}
