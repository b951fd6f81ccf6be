// crates/grading-core/src/domain/submission.rs
// ============================================================================
// Module: Submission
// Description: The submission lifecycle state machine and durable record.
// Purpose: Model a candidate's graded attempt end to end.
// Dependencies: serde, chrono
// ============================================================================

//! ## Overview
//! A submission moves `queued -> processing -> {complete | failed}`.
//! Terminal states are absorbing: once a submission reaches `complete` or
//! `failed`, no further transition is accepted by the registry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::domain::Phase;
use crate::identifiers::ProblemId;
use crate::identifiers::SubmissionId;

// ============================================================================
// SECTION: Lifecycle State
// ============================================================================

/// Lifecycle state of a submission.
///
/// # Invariants
/// - `Complete` and `Failed` are absorbing: [`LifecycleState::is_terminal`]
///   returns `true` and the registry rejects any further transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Accepted, not yet picked up by a driver.
    Queued,
    /// A driver has begun processing this submission.
    Processing,
    /// Pipeline finished successfully; a cached result is present.
    Complete,
    /// Pipeline finished with an unrecoverable error.
    Failed,
}

impl LifecycleState {
    /// Returns true for the absorbing terminal states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

// ============================================================================
// SECTION: Phase Times
// ============================================================================

/// Per-phase elapsed time in seconds, exactly the four fixed phases.
///
/// # Invariants
/// - Every field is a non-negative integer number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTimes {
    /// Seconds spent in the clarify phase.
    pub clarify: u32,
    /// Seconds spent in the estimate phase.
    pub estimate: u32,
    /// Seconds spent in the design phase.
    pub design: u32,
    /// Seconds spent in the explain phase.
    pub explain: u32,
}

impl PhaseTimes {
    /// Returns the elapsed seconds for the given phase.
    #[must_use]
    pub const fn get(self, phase: Phase) -> u32 {
        match phase {
            Phase::Clarify => self.clarify,
            Phase::Estimate => self.estimate,
            Phase::Design => self.design,
            Phase::Explain => self.explain,
        }
    }
}

// ============================================================================
// SECTION: Submission
// ============================================================================

/// Durable record of one candidate's graded attempt.
///
/// # Invariants
/// - `completed_at` is `Some` if and only if `state.is_terminal()`.
/// - `result_cache` is `Some` only when `state == LifecycleState::Complete`,
///   and then holds a value that has passed the Contract Guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Submission identifier.
    pub id: SubmissionId,
    /// Referenced problem identifier.
    pub problem_id: ProblemId,
    /// Current lifecycle state.
    pub state: LifecycleState,
    /// Per-phase elapsed time as reported at intake.
    pub phase_times: PhaseTimes,
    /// Time the submission was accepted.
    pub created_at: DateTime<Utc>,
    /// Time the submission reached a terminal state, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Cached `FinalResult` JSON once graded successfully.
    pub result_cache: Option<Value>,
}

impl Submission {
    /// Constructs a freshly intake submission in the `queued` state.
    #[must_use]
    pub fn new(
        id: SubmissionId,
        problem_id: ProblemId,
        phase_times: PhaseTimes,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            problem_id,
            state: LifecycleState::Queued,
            phase_times,
            created_at,
            completed_at: None,
            result_cache: None,
        }
    }

    /// Returns true when this submission has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_submission_is_queued_and_not_terminal() {
        let sub = Submission::new(
            SubmissionId::new("sub-1"),
            ProblemId::new("url-shortener"),
            PhaseTimes {
                clarify: 180,
                estimate: 240,
                design: 480,
                explain: 300,
            },
            Utc::now(),
        );
        assert_eq!(sub.state, LifecycleState::Queued);
        assert!(!sub.is_terminal());
        assert!(sub.completed_at.is_none());
        assert!(sub.result_cache.is_none());
    }

    #[test]
    fn terminal_states_are_absorbing() {
        assert!(LifecycleState::Complete.is_terminal());
        assert!(LifecycleState::Failed.is_terminal());
        assert!(!LifecycleState::Queued.is_terminal());
        assert!(!LifecycleState::Processing.is_terminal());
    }
}
