// crates/grading-core/src/domain/artifact.rs
// ============================================================================
// Module: Phase Artifact
// Description: The canvas/audio capture recorded for one phase of a submission.
// Purpose: Give Phase Evaluators a typed handle on what they are grading.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Exactly one [`PhaseArtifact`] exists per `(submission, phase)` pair. The
//! canvas capture is mandatory; the audio capture is optional since a
//! candidate may have muted or skipped narration for a phase.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::domain::Phase;
use crate::identifiers::SubmissionId;

// ============================================================================
// SECTION: Phase Artifact
// ============================================================================

/// Canvas (and optional audio) capture for one phase of a submission.
///
/// # Invariants
/// - Unique per `(submission, phase)`.
/// - `canvas_url` is always present; `audio_url` may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseArtifact {
    /// Submission this artifact belongs to.
    pub submission_id: SubmissionId,
    /// Phase this artifact was captured during.
    pub phase: Phase,
    /// Location of the canvas snapshot.
    pub canvas_url: String,
    /// MIME type of the canvas snapshot.
    pub canvas_mime: String,
    /// Location of the phase's audio recording, if captured.
    pub audio_url: Option<String>,
    /// MIME type of the audio recording, if present.
    pub audio_mime: Option<String>,
}

impl PhaseArtifact {
    /// Constructs an artifact with no audio capture.
    #[must_use]
    pub fn canvas_only(
        submission_id: SubmissionId,
        phase: Phase,
        canvas_url: impl Into<String>,
        canvas_mime: impl Into<String>,
    ) -> Self {
        Self {
            submission_id,
            phase,
            canvas_url: canvas_url.into(),
            canvas_mime: canvas_mime.into(),
            audio_url: None,
            audio_mime: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_only_artifact_has_no_audio() {
        let artifact = PhaseArtifact::canvas_only(
            SubmissionId::new("sub-1"),
            Phase::Design,
            "https://cdn.example/sub-1/design.png",
            "image/png",
        );
        assert!(artifact.audio_url.is_none());
        assert!(artifact.audio_mime.is_none());
    }
}
