// crates/grading-cli/src/intake.rs
// ============================================================================
// Module: Intake
// Description: File-driven deserialization for problem/submission intake.
// Purpose: Stand in for the HTTP multipart intake surface (out of scope)
//          with a local, auditable "read file, validate, persist" command.
// Dependencies: grading-core, serde, serde_json
// ============================================================================

//! ## Overview
//! `problem upsert` and `submission create` read a JSON file from disk and
//! deserialize it directly into [`grading_core::domain::Problem`] and
//! [`SubmissionIntake`] respectively. `Problem`/`RubricItemDef` derive
//! `Deserialize` with public fields, which bypasses
//! [`grading_core::domain::RubricItemDef::new`]'s weight-sum check, so
//! [`validate_problem`] re-runs that invariant by hand before the problem
//! reaches the store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use grading_core::domain::Phase;
use grading_core::domain::PhaseArtifact;
use grading_core::domain::PhaseTimes;
use grading_core::domain::Problem;
use grading_core::domain::Submission;
use grading_core::identifiers::ProblemId;
use grading_core::identifiers::SubmissionId;
use serde::Deserialize;

use crate::error::CliError;

/// Tolerance used when re-checking that rubric phase weights sum to 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

// ============================================================================
// SECTION: Problem Validation
// ============================================================================

/// Re-checks the invariants [`grading_core::domain::RubricItemDef::new`]
/// normally enforces, since a `problem upsert` file is deserialized
/// straight into the public-field struct.
///
/// # Errors
///
/// Returns [`CliError`] when the rubric is empty or any item's phase
/// weights do not sum to `1.0` within tolerance.
pub fn validate_problem(problem: &Problem) -> Result<(), CliError> {
    if problem.rubric.is_empty() {
        return Err(CliError::new(format!("problem {} has an empty rubric", problem.id)));
    }
    for item in &problem.rubric {
        let sum: f64 = item.phase_weights.values().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(CliError::new(format!(
                "problem {}: rubric item \"{}\" phase weights sum to {sum}, expected 1.0",
                problem.id, item.label
            )));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Submission Intake
// ============================================================================

/// One phase's captured artifact, as supplied by a `submission create` file.
#[derive(Debug, Deserialize)]
pub struct ArtifactIntake {
    /// Phase this artifact was captured during.
    pub phase: Phase,
    /// Location of the canvas snapshot.
    pub canvas_url: String,
    /// MIME type of the canvas snapshot.
    pub canvas_mime: String,
    /// Location of the phase's audio recording, if captured.
    #[serde(default)]
    pub audio_url: Option<String>,
    /// MIME type of the audio recording, if present.
    #[serde(default)]
    pub audio_mime: Option<String>,
}

/// The shape a `submission create` input file is deserialized into.
#[derive(Debug, Deserialize)]
pub struct SubmissionIntake {
    /// Submission identifier assigned by the caller.
    pub id: String,
    /// Problem the submission targets.
    pub problem_id: String,
    /// Per-phase elapsed time reported at intake.
    pub phase_times: PhaseTimes,
    /// Exactly four artifacts, one per phase.
    pub artifacts: Vec<ArtifactIntake>,
}

impl SubmissionIntake {
    /// Splits the intake file into a fresh [`Submission`] and its artifacts.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] unless `artifacts` has exactly one entry per
    /// [`Phase`].
    pub fn into_submission(
        self,
        created_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(Submission, Vec<PhaseArtifact>), CliError> {
        if self.artifacts.len() != Phase::ALL.len() {
            return Err(CliError::new(format!(
                "submission {} must carry exactly {} artifacts, found {}",
                self.id,
                Phase::ALL.len(),
                self.artifacts.len()
            )));
        }
        for phase in Phase::ALL {
            if !self.artifacts.iter().any(|artifact| artifact.phase == phase) {
                return Err(CliError::new(format!("submission {} is missing a {phase} artifact", self.id)));
            }
        }

        let submission_id = SubmissionId::new(self.id);
        let submission =
            Submission::new(submission_id.clone(), ProblemId::new(self.problem_id), self.phase_times, created_at);
        let artifacts = self
            .artifacts
            .into_iter()
            .map(|artifact| PhaseArtifact {
                submission_id: submission_id.clone(),
                phase: artifact.phase,
                canvas_url: artifact.canvas_url,
                canvas_mime: artifact.canvas_mime,
                audio_url: artifact.audio_url,
                audio_mime: artifact.audio_mime,
            })
            .collect();
        Ok((submission, artifacts))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, reason = "Test-only assertions and helpers are permitted.")]
mod tests {
    use std::collections::BTreeMap;

    use grading_core::domain::RubricItemDef;

    use super::*;

    fn problem_with_weights(weights: BTreeMap<Phase, f64>) -> Problem {
        Problem {
            id: "url-shortener".to_owned(),
            name: "Design a URL Shortener".to_owned(),
            difficulty: "medium".to_owned(),
            prompt: "Design a service that shortens long URLs.".to_owned(),
            constraints: None,
            rubric: vec![RubricItemDef { label: "Overall".to_owned(), description: "Everything".to_owned(), phase_weights: weights }],
        }
    }

    #[test]
    fn validate_problem_accepts_weights_summing_to_one() {
        let weights = BTreeMap::from([(Phase::Clarify, 0.5), (Phase::Estimate, 0.5)]);
        assert!(validate_problem(&problem_with_weights(weights)).is_ok());
    }

    #[test]
    fn validate_problem_rejects_weights_not_summing_to_one() {
        let weights = BTreeMap::from([(Phase::Clarify, 0.5)]);
        let err = validate_problem(&problem_with_weights(weights)).expect_err("bad weights are rejected");
        assert!(err.to_string().contains("sum to"));
    }

    #[test]
    fn validate_problem_rejects_empty_rubric() {
        let problem = Problem {
            id: "empty".to_owned(),
            name: "Empty".to_owned(),
            difficulty: "easy".to_owned(),
            prompt: "No rubric.".to_owned(),
            constraints: None,
            rubric: Vec::new(),
        };
        assert!(validate_problem(&problem).is_err());
    }

    fn artifact_intake(phase: Phase) -> ArtifactIntake {
        ArtifactIntake {
            phase,
            canvas_url: format!("https://cdn.example/sub-1/{phase}.png"),
            canvas_mime: "image/png".to_owned(),
            audio_url: None,
            audio_mime: None,
        }
    }

    #[test]
    fn into_submission_requires_exactly_one_artifact_per_phase() {
        let intake = SubmissionIntake {
            id: "sub-1".to_owned(),
            problem_id: "url-shortener".to_owned(),
            phase_times: PhaseTimes { clarify: 180, estimate: 240, design: 480, explain: 300 },
            artifacts: vec![artifact_intake(Phase::Clarify), artifact_intake(Phase::Estimate)],
        };
        assert!(intake.into_submission(chrono::Utc::now()).is_err());
    }

    #[test]
    fn into_submission_builds_one_artifact_per_phase() {
        let intake = SubmissionIntake {
            id: "sub-1".to_owned(),
            problem_id: "url-shortener".to_owned(),
            phase_times: PhaseTimes { clarify: 180, estimate: 240, design: 480, explain: 300 },
            artifacts: Phase::ALL.into_iter().map(artifact_intake).collect(),
        };
        let (submission, artifacts) = intake.into_submission(chrono::Utc::now()).expect("complete intake parses");
        assert_eq!(submission.id.as_str(), "sub-1");
        assert_eq!(artifacts.len(), Phase::ALL.len());
        assert!(artifacts.iter().all(|artifact| artifact.submission_id == submission.id));
    }
}
