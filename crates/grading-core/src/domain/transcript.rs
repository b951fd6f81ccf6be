// crates/grading-core/src/domain/transcript.rs
// ============================================================================
// Module: Transcript Snippet
// Description: One timestamped chunk of transcribed speech for a phase.
// Purpose: Give Phase Evaluators ordered, timestamped evidence to cite.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Transcript snippets are ordered first by phase (canonical [`Phase`]
//! order), then by `timestamp_sec` within a phase. The Transcription
//! Provider guarantees the within-phase ordering invariant at production
//! time; [`validate_ordering`] lets callers re-check it on ingestion.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::domain::Phase;
use crate::error::DomainError;
use crate::identifiers::SubmissionId;

// ============================================================================
// SECTION: Transcript Snippet
// ============================================================================

/// One transcribed chunk of candidate speech during a phase.
///
/// # Invariants
/// - `timestamp_sec` is non-negative.
/// - Within a phase, snippets are ordered by non-decreasing `timestamp_sec`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSnippet {
    /// Submission this snippet belongs to.
    pub submission_id: SubmissionId,
    /// Phase this snippet was spoken during.
    pub phase: Phase,
    /// Offset in seconds from the start of the phase's audio.
    pub timestamp_sec: u32,
    /// Transcribed text.
    pub text: String,
    /// Whether an evaluator flagged this snippet as noteworthy evidence.
    pub is_highlight: bool,
}

/// Checks that `snippets` are non-decreasing in `timestamp_sec` for `phase`.
///
/// Snippets belonging to other phases are ignored; callers typically filter
/// to one phase before validating, but passing a mixed slice is harmless.
///
/// # Errors
///
/// Returns [`DomainError::TimestampsNotOrdered`] if any snippet in `phase`
/// has a `timestamp_sec` smaller than the snippet before it.
pub fn validate_ordering(snippets: &[TranscriptSnippet], phase: Phase) -> Result<(), DomainError> {
    let mut last = None;
    for snippet in snippets.iter().filter(|s| s.phase == phase) {
        if let Some(prev) = last {
            if snippet.timestamp_sec < prev {
                return Err(DomainError::TimestampsNotOrdered(phase));
            }
        }
        last = Some(snippet.timestamp_sec);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(phase: Phase, timestamp_sec: u32) -> TranscriptSnippet {
        TranscriptSnippet {
            submission_id: SubmissionId::new("sub-1"),
            phase,
            timestamp_sec,
            text: "ok".to_owned(),
            is_highlight: false,
        }
    }

    #[test]
    fn accepts_non_decreasing_sequence() {
        let snippets = vec![snippet(Phase::Design, 0), snippet(Phase::Design, 5), snippet(Phase::Design, 5)];
        assert!(validate_ordering(&snippets, Phase::Design).is_ok());
    }

    #[test]
    fn rejects_out_of_order_sequence() {
        let snippets = vec![snippet(Phase::Design, 10), snippet(Phase::Design, 2)];
        assert_eq!(
            validate_ordering(&snippets, Phase::Design),
            Err(DomainError::TimestampsNotOrdered(Phase::Design))
        );
    }

    #[test]
    fn ignores_other_phases() {
        let snippets = vec![snippet(Phase::Design, 10), snippet(Phase::Clarify, 0)];
        assert!(validate_ordering(&snippets, Phase::Design).is_ok());
    }
}
