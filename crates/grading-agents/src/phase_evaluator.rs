// crates/grading-agents/src/phase_evaluator.rs
// ============================================================================
// Module: LLM Phase Evaluator
// Description: An LlmClient-backed implementation of grading_core::interfaces::PhaseEvaluator.
// Purpose: Grade one phase of a submission from its canvas and transcript.
// Dependencies: async-trait, grading-core, serde, serde_json
// ============================================================================

//! ## Overview
//! One [`LlmPhaseEvaluator`] is configured per phase with that phase's
//! prompt template. Evaluation is a single LLM round trip: render the
//! prompt from the problem, artifact, and transcript; call the model;
//! parse its JSON response into a [`PhaseJudgement`], validating the score
//! range and bullet count the schema promises.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use grading_core::domain::Evidence;
use grading_core::domain::Phase;
use grading_core::domain::PhaseArtifact;
use grading_core::domain::PhaseJudgement;
use grading_core::domain::Problem;
use grading_core::domain::TranscriptSnippet;
use grading_core::interfaces::BoxError;
use serde::Deserialize;

use crate::error::AgentError;
use crate::llm::extract_json;
use crate::llm::LlmClient;

const MIN_BULLETS: usize = 3;
const MAX_BULLETS: usize = 6;
const SCORE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;

// ============================================================================
// SECTION: Raw Model Output
// ============================================================================

/// The shape the model's JSON response is parsed into, before validation.
#[derive(Debug, Deserialize)]
struct RawJudgement {
    score: f64,
    bullets: Vec<String>,
    evidence: Evidence,
    strengths: Vec<String>,
    weaknesses: Vec<String>,
    highlights: Vec<String>,
}

// ============================================================================
// SECTION: Phase Evaluator
// ============================================================================

/// Grades one fixed phase using a prompt template and an [`LlmClient`].
pub struct LlmPhaseEvaluator {
    /// Phase this evaluator grades.
    phase: Phase,
    /// Model backend used to generate the judgement.
    client: Arc<dyn LlmClient>,
    /// Prompt template; `{prompt}`, `{phase}`, `{canvas_url}`, and
    /// `{transcript}` are substituted before the call.
    prompt_template: String,
}

impl LlmPhaseEvaluator {
    /// Builds an evaluator for `phase` using `prompt_template`.
    #[must_use]
    pub fn new(phase: Phase, client: Arc<dyn LlmClient>, prompt_template: impl Into<String>) -> Self {
        Self { phase, client, prompt_template: prompt_template.into() }
    }

    /// Renders the prompt for one evaluation call.
    fn render_prompt(
        &self,
        problem: &Problem,
        artifact: &PhaseArtifact,
        transcripts: &[TranscriptSnippet],
    ) -> Result<String, AgentError> {
        if artifact.phase != self.phase {
            return Err(AgentError::PromptRender);
        }
        let transcript = transcripts
            .iter()
            .filter(|snippet| snippet.phase == self.phase)
            .map(|snippet| format!("[{}s] {}", snippet.timestamp_sec, snippet.text))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(self
            .prompt_template
            .replace("{prompt}", &problem.prompt)
            .replace("{phase}", self.phase.as_str())
            .replace("{canvas_url}", &artifact.canvas_url)
            .replace("{transcript}", &transcript))
    }

    /// Validates and converts the model's raw output into a judgement.
    fn into_judgement(&self, raw: RawJudgement) -> Result<PhaseJudgement, AgentError> {
        if !SCORE_RANGE.contains(&raw.score) {
            return Err(AgentError::SchemaViolation { field: "score".to_owned() });
        }
        if raw.bullets.len() < MIN_BULLETS || raw.bullets.len() > MAX_BULLETS {
            return Err(AgentError::SchemaViolation { field: "bullets".to_owned() });
        }
        Ok(PhaseJudgement {
            phase: self.phase,
            score: raw.score,
            bullets: raw.bullets,
            evidence: raw.evidence,
            strengths: raw.strengths,
            weaknesses: raw.weaknesses,
            highlights: raw.highlights,
        })
    }
}

#[async_trait]
impl grading_core::interfaces::PhaseEvaluator for LlmPhaseEvaluator {
    fn phase(&self) -> Phase {
        self.phase
    }

    async fn evaluate(
        &self,
        problem: &Problem,
        artifact: &PhaseArtifact,
        transcripts: &[TranscriptSnippet],
    ) -> Result<PhaseJudgement, BoxError> {
        let prompt = self.render_prompt(problem, artifact, transcripts)?;
        let response = self.client.complete(&prompt).await?;
        let value = extract_json(phase_stage_name(self.phase), &response)?;
        let raw: RawJudgement = serde_json::from_value(value)
            .map_err(|_err| AgentError::MalformedOutput { stage: phase_stage_name(self.phase) })?;
        Ok(self.into_judgement(raw)?)
    }
}

/// Returns the stable stage name used in error reporting for `phase`.
const fn phase_stage_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Clarify => "clarify_evaluator",
        Phase::Estimate => "estimate_evaluator",
        Phase::Design => "design_evaluator",
        Phase::Explain => "explain_evaluator",
    }
}

#[cfg(test)]
mod tests {
    use grading_core::domain::Noticed;
    use grading_core::identifiers::SubmissionId;

    use super::*;

    struct StubClient(String);

    #[async_trait]
    impl LlmClient for StubClient {
        async fn complete(&self, _prompt: &str) -> Result<String, AgentError> {
            Ok(self.0.clone())
        }
    }

    fn problem() -> Problem {
        Problem {
            id: "url-shortener".to_owned(),
            name: "Design a URL Shortener".to_owned(),
            difficulty: "medium".to_owned(),
            prompt: "Design a service that shortens long URLs.".to_owned(),
            constraints: None,
            rubric: Vec::new(),
        }
    }

    fn artifact(phase: Phase) -> PhaseArtifact {
        PhaseArtifact::canvas_only(
            SubmissionId::new("sub-1"),
            phase,
            "https://cdn.example/sub-1/canvas.png",
            "image/png",
        )
    }

    fn valid_response() -> String {
        serde_json::json!({
            "score": 8.0,
            "bullets": ["one", "two", "three"],
            "evidence": {
                "snapshot_url": "https://cdn.example/sub-1/canvas.png",
                "transcripts": [{ "timestamp_sec": 12, "text": "said something" }],
                "noticed": { "strength": "clear scope", "issue": "missed an edge case" },
            },
            "strengths": ["clear scope"],
            "weaknesses": ["missed an edge case"],
            "highlights": [],
        })
        .to_string()
    }

    #[tokio::test]
    async fn evaluates_a_well_formed_response() {
        let evaluator = LlmPhaseEvaluator::new(
            Phase::Clarify,
            Arc::new(StubClient(valid_response())),
            "Grade {phase} for: {prompt}\nCanvas: {canvas_url}\nTranscript:\n{transcript}",
        );
        let judgement = grading_core::interfaces::PhaseEvaluator::evaluate(
            &evaluator,
            &problem(),
            &artifact(Phase::Clarify),
            &[],
        )
        .await
        .expect("valid response parses");
        assert_eq!(judgement.phase, Phase::Clarify);
        assert!((judgement.score - 8.0).abs() < f64::EPSILON);
        assert_eq!(judgement.bullets.len(), 3);
    }

    #[tokio::test]
    async fn rejects_mismatched_artifact_phase() {
        let evaluator =
            LlmPhaseEvaluator::new(Phase::Clarify, Arc::new(StubClient(valid_response())), "{prompt}");
        let err = grading_core::interfaces::PhaseEvaluator::evaluate(
            &evaluator,
            &problem(),
            &artifact(Phase::Design),
            &[],
        )
        .await
        .expect_err("phase mismatch is rejected");
        assert_eq!(err.to_string(), AgentError::PromptRender.to_string());
    }

    #[tokio::test]
    async fn rejects_score_out_of_range() {
        let response = serde_json::json!({
            "score": 11.0,
            "bullets": ["one", "two", "three"],
            "evidence": {
                "snapshot_url": "https://cdn.example/sub-1/canvas.png",
                "transcripts": [],
                "noticed": { "strength": "a", "issue": "b" },
            },
            "strengths": [],
            "weaknesses": [],
            "highlights": [],
        })
        .to_string();
        let evaluator = LlmPhaseEvaluator::new(Phase::Clarify, Arc::new(StubClient(response)), "{prompt}");
        let err = grading_core::interfaces::PhaseEvaluator::evaluate(
            &evaluator,
            &problem(),
            &artifact(Phase::Clarify),
            &[],
        )
        .await
        .expect_err("out-of-range score is rejected");
        assert_eq!(err.to_string(), AgentError::SchemaViolation { field: "score".to_owned() }.to_string());
    }

    #[allow(dead_code, reason = "keeps Noticed import used across cfg(test) builds without a field")]
    fn _unused(n: Noticed) -> Noticed {
        n
    }
}
