// crates/grading-core/src/domain/problem.rs
// ============================================================================
// Module: Problem
// Description: Read-only problem catalog entry with rubric definition.
// Purpose: Model the fixed input the Phase Panel and Aggregator grade against.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A `Problem` is never written by the pipeline; it is loaded from the
//! external, read-only catalog (§2 component 2) and referenced by every
//! submission that targets it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::domain::Phase;
use crate::error::DomainError;

/// Tolerance used when checking that rubric phase weights sum to 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

// ============================================================================
// SECTION: Rubric Item Definition
// ============================================================================

/// One rubric criterion as defined by the problem catalog.
///
/// # Invariants
/// - `phase_weights` is non-empty and every weight is non-negative.
/// - `phase_weights` values sum to `1.0` within `1e-6`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricItemDef {
    /// Short display label for the criterion.
    pub label: String,
    /// Longer description of what the criterion evaluates.
    pub description: String,
    /// Weight each phase contributes to this criterion's score.
    pub phase_weights: BTreeMap<Phase, f64>,
}

impl RubricItemDef {
    /// Constructs a rubric item definition, validating weight invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::WeightsDoNotSumToOne`] when the weights do not
    /// sum to `1.0` within tolerance.
    pub fn new(
        label: impl Into<String>,
        description: impl Into<String>,
        phase_weights: BTreeMap<Phase, f64>,
    ) -> Result<Self, DomainError> {
        let sum: f64 = phase_weights.values().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(DomainError::WeightsDoNotSumToOne {
                sum,
            });
        }
        Ok(Self {
            label: label.into(),
            description: description.into(),
            phase_weights,
        })
    }
}

// ============================================================================
// SECTION: Problem
// ============================================================================

/// A system-design interview problem from the read-only catalog.
///
/// # Invariants
/// - `rubric` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Problem identifier string as used by [`crate::identifiers::ProblemId`].
    pub id: String,
    /// Human-readable problem name.
    pub name: String,
    /// Difficulty tag (e.g. "easy", "medium", "hard").
    pub difficulty: String,
    /// Full prompt text shown to the candidate.
    pub prompt: String,
    /// Optional additional constraints.
    pub constraints: Option<String>,
    /// Ordered rubric criteria used by the Aggregator.
    pub rubric: Vec<RubricItemDef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights(pairs: &[(Phase, f64)]) -> BTreeMap<Phase, f64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn rubric_item_accepts_weights_summing_to_one() {
        let item = RubricItemDef::new(
            "Requirements",
            "Clarifies scope",
            weights(&[(Phase::Clarify, 0.7), (Phase::Estimate, 0.3)]),
        );
        assert!(item.is_ok());
    }

    #[test]
    fn rubric_item_rejects_weights_not_summing_to_one() {
        let item =
            RubricItemDef::new("Requirements", "Clarifies scope", weights(&[(Phase::Clarify, 0.5)]));
        assert!(matches!(item, Err(DomainError::WeightsDoNotSumToOne { .. })));
    }

    #[test]
    fn rubric_item_accepts_weights_within_tolerance() {
        let item = RubricItemDef::new(
            "Requirements",
            "Clarifies scope",
            weights(&[(Phase::Clarify, 0.700_000_5), (Phase::Estimate, 0.3)]),
        );
        assert!(item.is_ok());
    }
}
