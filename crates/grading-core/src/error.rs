// crates/grading-core/src/error.rs
// ============================================================================
// Module: Domain Errors
// Description: Validation errors raised constructing or checking domain types.
// Purpose: Give every domain invariant violation a stable, matchable kind.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! `DomainError` covers failures that can be detected purely from the shape
//! of a value (a rubric's weights don't sum to 1, a score is out of range).
//! It is distinct from the driver-level error taxonomy in `grading-driver`,
//! which also covers external/transport failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::domain::Phase;

// ============================================================================
// SECTION: Domain Error
// ============================================================================

/// Errors raised when constructing or validating a domain value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A score fell outside the closed interval `[0, 10]`.
    #[error("score {0} out of range [0, 10]")]
    ScoreOutOfRange(f64),
    /// A rubric item's phase weights did not sum to 1.0 within tolerance.
    #[error("phase weights sum to {sum}, expected 1.0 (+/- 1e-6)")]
    WeightsDoNotSumToOne {
        /// The observed sum of the weights.
        sum: f64,
    },
    /// A phase-indexed mapping was missing one of the four required phases.
    #[error("missing phase {0} in phase-indexed mapping")]
    MissingPhase(Phase),
    /// A list had fewer entries than the schema's required minimum.
    #[error("{field} has {actual} items, expected at least {minimum}")]
    TooFewItems {
        /// Field name for diagnostics.
        field: &'static str,
        /// Observed item count.
        actual: usize,
        /// Minimum required item count.
        minimum: usize,
    },
    /// A list had more entries than the schema's allowed maximum.
    #[error("{field} has {actual} items, expected at most {maximum}")]
    TooManyItems {
        /// Field name for diagnostics.
        field: &'static str,
        /// Observed item count.
        actual: usize,
        /// Maximum allowed item count.
        maximum: usize,
    },
    /// A list had a different length than the schema's exact requirement.
    #[error("{field} has {actual} items, expected exactly {expected}")]
    WrongItemCount {
        /// Field name for diagnostics.
        field: &'static str,
        /// Observed item count.
        actual: usize,
        /// Exact required item count.
        expected: usize,
    },
    /// A timestamp sequence within a phase was not non-decreasing.
    #[error("transcript timestamps for phase {0} are not non-decreasing")]
    TimestampsNotOrdered(Phase),
}
