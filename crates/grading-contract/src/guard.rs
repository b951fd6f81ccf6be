// crates/grading-contract/src/guard.rs
// ============================================================================
// Module: Contract Guard
// Description: Last-line-of-defense validator/normalizer before persistence.
// Purpose: Guarantee every persisted FinalResult is contract-exact.
// Dependencies: grading-core, jsonschema, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The Contract Guard runs once, synchronously, right before the driver
//! hands a `FinalResult` to the Submission Store. It performs four checks
//! in order:
//! 1. Schema-validate the document and repair anything mechanically fixable
//!    (a `result_version` that drifted from [`RESULT_VERSION`]).
//! 2. Recompute the radar, overall score, and verdict from `phase_scores`
//!    and overwrite the supplied values if they disagree — these three
//!    fields are pure functions of `phase_scores`, so they are always
//!    repairable, never a reason to fail the submission.
//! 3. Check the cardinality and ordering invariants the schema check
//!    cannot express (exactly four phases, exactly three next-attempt
//!    items, at least three follow-up questions, four to six reference
//!    outline sections, `graded_at >= submitted_at`), repairing where a
//!    deterministic repair exists (truncating an over-long list) and
//!    failing where it does not (a missing phase, too few items).
//! 4. Any failure at step 1 or 3 becomes [`GuardError::Unrepairable`],
//!    identifying the offending field; the submission is marked `failed`
//!    rather than persisting a result that does not honor the contract.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use jsonschema::validator_for;
use jsonschema::Validator;
use serde_json::json;
use serde_json::Value;
use thiserror::Error;

use grading_core::domain::Phase;
use grading_core::runtime::aggregator;

use crate::types::FinalResult;
use crate::types::RESULT_VERSION;

/// Tolerance used when comparing a supplied score to a recomputed one.
const SCORE_TOLERANCE: f64 = 1e-6;

// ============================================================================
// SECTION: Guard Error
// ============================================================================

/// Errors raised while checking a [`FinalResult`] against the contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// The document failed JSON Schema validation and could not be
    /// mechanically repaired.
    #[error("contract_violation: {field} (schema invalid)")]
    SchemaInvalid {
        /// Dotted path of the offending field.
        field: String,
    },
    /// A cardinality or ordering invariant failed and had no deterministic
    /// repair.
    #[error("contract_violation: {field}")]
    Unrepairable {
        /// Dotted path of the offending field.
        field: String,
    },
}

// ============================================================================
// SECTION: Schema
// ============================================================================

/// Returns the top-level JSON Schema `FinalResult` is checked against.
///
/// This schema covers the outer shape (presence, type, and the `verdict`
/// enum); the cardinality invariants on `next_attempt_plan`,
/// `follow_up_questions`, and `reference_outline.sections` are checked
/// separately since they differ per field and some are repairable.
fn schema() -> Value {
    json!({
        "type": "object",
        "required": [
            "result_version", "submission_id", "problem", "phase_scores",
            "evidence", "rubric", "radar", "overall_score", "verdict",
            "strengths", "weaknesses", "next_attempt_plan",
            "follow_up_questions", "reference_outline", "submitted_at",
            "graded_at"
        ],
        "properties": {
            "result_version": { "type": "integer" },
            "submission_id": { "type": "string" },
            "problem": {
                "type": "object",
                "required": ["id", "name", "difficulty"],
                "properties": {
                    "id": { "type": "string" },
                    "name": { "type": "string" },
                    "difficulty": { "type": "string" }
                }
            },
            "phase_scores": { "type": "object" },
            "evidence": { "type": "object" },
            "rubric": { "type": "array" },
            "radar": {
                "type": "object",
                "required": ["clarity", "structure", "power", "wisdom"],
                "properties": {
                    "clarity": { "type": "number" },
                    "structure": { "type": "number" },
                    "power": { "type": "number" },
                    "wisdom": { "type": "number" }
                }
            },
            "overall_score": { "type": "number" },
            "verdict": { "enum": ["hire", "maybe", "no-hire"] },
            "strengths": { "type": "array" },
            "weaknesses": { "type": "array" },
            "next_attempt_plan": { "type": "array" },
            "follow_up_questions": { "type": "array", "items": { "type": "string" } },
            "reference_outline": { "type": "object" },
            "submitted_at": { "type": "string" },
            "graded_at": { "type": "string" }
        }
    })
}

// ============================================================================
// SECTION: Contract Guard
// ============================================================================

/// Validates and normalizes a [`FinalResult`] before it is persisted.
pub struct ContractGuard {
    /// Compiled schema checked in step 1.
    validator: Validator,
}

impl ContractGuard {
    /// Builds a guard from the fixed top-level schema.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::SchemaInvalid`] only if the guard's own fixed
    /// schema fails to compile, which would indicate a programming error
    /// in this crate rather than a bad `FinalResult`.
    pub fn new() -> Result<Self, GuardError> {
        let validator = validator_for(&schema())
            .map_err(|_err| GuardError::SchemaInvalid { field: "<guard-schema>".to_owned() })?;
        Ok(Self { validator })
    }

    /// Runs the full four-step check, repairing what is mechanically
    /// repairable and mutating `result` in place.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError`] identifying the first unrepairable
    /// violation found.
    pub fn check(&self, result: &mut FinalResult) -> Result<(), GuardError> {
        self.repair_result_version(result);
        self.validate_schema(result)?;
        self.recheck_math(result);
        self.check_cardinalities(result)?;
        Ok(())
    }

    /// Step 1a: mechanically repair a drifted `result_version`.
    fn repair_result_version(&self, result: &mut FinalResult) {
        if result.result_version != RESULT_VERSION {
            result.result_version = RESULT_VERSION;
        }
    }

    /// Step 1b: schema-validate the document's outer shape.
    fn validate_schema(&self, result: &FinalResult) -> Result<(), GuardError> {
        let value = serde_json::to_value(result).unwrap_or(Value::Null);
        if let Some(error) = self.validator.iter_errors(&value).next() {
            return Err(GuardError::SchemaInvalid { field: error.instance_path.to_string() });
        }
        Ok(())
    }

    /// Step 2: recompute radar/overall_score/verdict and overwrite on
    /// mismatch. These fields are pure functions of `phase_scores`, so
    /// disagreement is always repaired, never a failure.
    fn recheck_math(&self, result: &mut FinalResult) {
        let scores: BTreeMap<Phase, f64> =
            result.phase_scores.iter().map(|(phase, phase_score)| (*phase, phase_score.score)).collect();
        let radar = aggregator::compute_radar(&scores);
        let overall = aggregator::overall_score(&scores);
        let verdict = aggregator::verdict_for_score(overall);

        if (result.overall_score - overall).abs() > SCORE_TOLERANCE {
            result.overall_score = overall;
        }
        if result.verdict != verdict {
            result.verdict = verdict;
        }
        let radar_matches = (result.radar.clarity - radar.clarity).abs() < SCORE_TOLERANCE
            && (result.radar.structure - radar.structure).abs() < SCORE_TOLERANCE
            && (result.radar.power - radar.power).abs() < SCORE_TOLERANCE
            && (result.radar.wisdom - radar.wisdom).abs() < SCORE_TOLERANCE;
        if !radar_matches {
            result.radar = radar;
        }
    }

    /// Step 3: cardinality and ordering invariants the schema cannot
    /// express.
    fn check_cardinalities(&self, result: &mut FinalResult) -> Result<(), GuardError> {
        for phase in Phase::ALL {
            if !result.phase_scores.contains_key(&phase) {
                return Err(GuardError::Unrepairable { field: "phase_scores".to_owned() });
            }
            if !result.evidence.contains_key(&phase) {
                return Err(GuardError::Unrepairable { field: "evidence".to_owned() });
            }
        }

        if result.rubric.is_empty() {
            return Err(GuardError::Unrepairable { field: "rubric".to_owned() });
        }

        match result.next_attempt_plan.len() {
            3 => {}
            n if n > 3 => result.next_attempt_plan.truncate(3),
            _ => return Err(GuardError::Unrepairable { field: "next_attempt_plan".to_owned() }),
        }

        if result.follow_up_questions.len() < 3 {
            return Err(GuardError::Unrepairable { field: "follow_up_questions".to_owned() });
        }

        let sections = result.reference_outline.sections.len();
        if sections > 6 {
            result.reference_outline.sections.truncate(6);
        } else if sections < 4 {
            return Err(GuardError::Unrepairable { field: "reference_outline.sections".to_owned() });
        }

        if result.graded_at < result.submitted_at {
            return Err(GuardError::Unrepairable { field: "graded_at".to_owned() });
        }

        Ok(())
    }
}
