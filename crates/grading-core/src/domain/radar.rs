// crates/grading-core/src/domain/radar.rs
// ============================================================================
// Module: Rubric Radar
// Description: The aggregated rubric scoring and four-axis skill radar.
// Purpose: Shape the Aggregator's output and the public hire/no-hire verdict.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! `RubricRadar` is produced by `grading_core::runtime::aggregator` from the
//! four [`super::judgement::PhaseJudgement`]s and a [`super::problem::Problem`]'s
//! rubric. The radar's four dimensions and their weight formulas are fixed
//! (see `runtime::aggregator`); this module only carries the resulting data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Rubric Item Status
// ============================================================================

/// Pass/partial/fail classification derived from a rubric item's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricStatus {
    /// Score at or above the pass threshold.
    Pass,
    /// Score at or above the partial threshold but below pass.
    Partial,
    /// Score below the partial threshold.
    Fail,
}

// ============================================================================
// SECTION: Rubric Item Score
// ============================================================================

/// One scored rubric criterion in the final result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricItemScore {
    /// Criterion label, matching the catalog's `RubricItemDef::label`.
    pub label: String,
    /// Longer description, copied from the catalog's `RubricItemDef::description`.
    pub description: String,
    /// Weighted score in `[0, 10]`.
    pub score: f64,
    /// Status derived from `score`.
    pub status: RubricStatus,
    /// Phases whose weights were non-zero in computing this score.
    pub computed_from: Vec<crate::domain::Phase>,
}

// ============================================================================
// SECTION: Radar
// ============================================================================

/// The four fixed skill dimensions of the interview radar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Radar {
    /// Requirements clarification skill.
    pub clarity: f64,
    /// System decomposition and component layout skill.
    pub structure: f64,
    /// Capacity estimation and scaling judgement.
    pub power: f64,
    /// Tradeoff reasoning and depth of explanation.
    pub wisdom: f64,
}

impl Radar {
    /// Returns the four dimension values in the fixed display order
    /// `[clarity, structure, power, wisdom]`.
    #[must_use]
    pub const fn as_array(&self) -> [f64; 4] {
        [self.clarity, self.structure, self.power, self.wisdom]
    }
}

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Overall hiring recommendation derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// Overall score at or above the hire threshold.
    Hire,
    /// Overall score in the maybe band.
    Maybe,
    /// Overall score below the maybe threshold.
    NoHire,
}

// ============================================================================
// SECTION: Rubric Radar
// ============================================================================

/// Aggregated rubric scoring and skill radar for a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricRadar {
    /// Scored rubric criteria, in catalog order.
    pub rubric: Vec<RubricItemScore>,
    /// Four-axis skill radar.
    pub radar: Radar,
    /// Mean of the four phase scores, rounded to one decimal place.
    pub overall_score: f64,
    /// Hiring recommendation derived from `overall_score`.
    pub verdict: Verdict,
    /// Short prose summary of the verdict.
    pub summary: String,
}
