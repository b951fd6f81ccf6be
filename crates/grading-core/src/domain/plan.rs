// crates/grading-core/src/domain/plan.rs
// ============================================================================
// Module: Plan Outline
// Description: The forward-looking study plan attached to a final result.
// Purpose: Carry the Plan/Outline Generator's output into the contract.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! `PlanOutline` is produced once per submission by the Plan/Outline
//! Generator from the four [`super::judgement::PhaseJudgement`]s. Its three
//! lists each carry an exact or minimum cardinality enforced by the
//! Contract Guard, not by this type itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Next Attempt Plan
// ============================================================================

/// One corrective action for the candidate's next attempt.
///
/// # Invariants
/// - `do_next_time` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextAttemptItem {
    /// What went wrong in this attempt.
    pub what_went_wrong: String,
    /// Concrete actions to take next time.
    pub do_next_time: Vec<String>,
}

// ============================================================================
// SECTION: Reference Outline
// ============================================================================

/// One section of the reference solution outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineSection {
    /// Section title, e.g. "Requirements" or "Data Model".
    pub section: String,
    /// Bullet points covering that section.
    pub bullets: Vec<String>,
}

/// The reference solution outline shown alongside the candidate's attempt.
///
/// # Invariants
/// - `sections` has between 4 and 6 entries inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceOutline {
    /// Outline sections, 4 to 6 entries.
    pub sections: Vec<OutlineSection>,
}

// ============================================================================
// SECTION: Plan Outline
// ============================================================================

/// The forward-looking plan generated for one submission.
///
/// # Invariants
/// - `next_attempt_plan` has exactly 3 entries.
/// - `follow_up_questions` has at least 3 entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOutline {
    /// Exactly 3 corrective actions for the next attempt.
    pub next_attempt_plan: Vec<NextAttemptItem>,
    /// At least 3 follow-up questions for further study.
    pub follow_up_questions: Vec<String>,
    /// The reference solution outline.
    pub reference_outline: ReferenceOutline,
}
