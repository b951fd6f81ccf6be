// crates/grading-core/src/identifiers.rs
// ============================================================================
// Module: Identifiers
// Description: Newtype identifiers for submissions, problems, and events.
// Purpose: Avoid accidental mixing of opaque string/numeric ids across entities.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Identifiers are newtypes rather than bare `String`/`u64` so that a
//! submission id can never be passed where a problem id is expected. Opaque
//! identifiers (assigned by the intake layer, not generated here) use the
//! string-newtype shape; the event ordinal, which this crate itself
//! generates as a monotonic counter, uses a plain `u64` newtype.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Submission Identifier
// ============================================================================

/// Opaque identifier for a submission.
///
/// # Invariants
/// - Assigned once at intake and never reused.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(String);

impl SubmissionId {
    /// Creates a new submission identifier from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubmissionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SubmissionId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Problem Identifier
// ============================================================================

/// Opaque identifier for a problem in the read-only catalog.
///
/// # Invariants
/// - Stable for the lifetime of the catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemId(String);

impl ProblemId {
    /// Creates a new problem identifier from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProblemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProblemId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Event Ordinal
// ============================================================================

/// Strictly increasing position of an event within one submission's trace.
///
/// # Invariants
/// - The first event for a submission has ordinal 0.
/// - Ordinals for a submission are gap-free and monotonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventOrdinal(u64);

impl EventOrdinal {
    /// The first ordinal in a submission's trace.
    pub const FIRST: Self = Self(0);

    /// Wraps a raw ordinal value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ordinal value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the next ordinal in sequence.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for EventOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_id_round_trips_through_string() {
        let id = SubmissionId::from("sub-123".to_string());
        assert_eq!(id.as_str(), "sub-123");
        assert_eq!(id.to_string(), "sub-123");
    }

    #[test]
    fn event_ordinal_sequence_is_gap_free() {
        let first = EventOrdinal::FIRST;
        let second = first.next();
        let third = second.next();
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        assert_eq!(third.get(), 2);
    }
}
