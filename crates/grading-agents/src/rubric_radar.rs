// crates/grading-agents/src/rubric_radar.rs
// ============================================================================
// Module: Rubric/Radar Synthesis Agent
// Description: Combines deterministic aggregation with an LLM-authored summary.
// Purpose: Produce the RubricRadar stage of the pipeline from four judgements.
// Dependencies: async-trait, grading-core, serde_json
// ============================================================================

//! ## Overview
//! The rubric scores, radar, overall score, and verdict are all pure
//! arithmetic (`grading_core::runtime::aggregator`) and never touch the
//! model. The only part of this stage that is genuinely generative is the
//! one-paragraph `summary`; [`RubricRadarAgent`] asks the model for that
//! paragraph and falls back to the aggregator's own deterministic summary
//! if the model call fails or returns something unusable, the same
//! fail-safe-to-deterministic posture the Contract Guard takes later in
//! the pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use grading_core::domain::Phase;
use grading_core::domain::PhaseJudgement;
use grading_core::domain::Problem;
use grading_core::domain::RubricRadar;
use grading_core::interfaces::BoxError;
use grading_core::runtime::aggregator;

use crate::llm::extract_json;
use crate::llm::LlmClient;

const STAGE: &str = "rubric_radar_summary";

// ============================================================================
// SECTION: Rubric/Radar Agent
// ============================================================================

/// Synthesizes a [`RubricRadar`] from four phase judgements.
pub struct RubricRadarAgent {
    /// Model backend used to draft the prose summary.
    client: Arc<dyn LlmClient>,
}

impl RubricRadarAgent {
    /// Builds an agent backed by `client`.
    #[must_use]
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Aggregates `judgements` for `problem`, then asks the model to draft
    /// the summary. The deterministic rubric, radar, overall score, and
    /// verdict are never influenced by the model; only `summary` can
    /// change, and only when the model produces a well-formed one.
    ///
    /// # Errors
    ///
    /// Never fails on its own; this method only returns `Err` if
    /// `judgements` is malformed in a way that would make the phase
    /// scores unusable, which a caller should treat as a defect upstream.
    pub async fn synthesize(&self, problem: &Problem, judgements: &[PhaseJudgement]) -> Result<RubricRadar, BoxError> {
        let phase_scores: BTreeMap<Phase, f64> =
            judgements.iter().map(|judgement| (judgement.phase, judgement.score)).collect();
        let mut radar = aggregator::aggregate(problem, &phase_scores);

        if let Some(summary) = self.draft_summary(problem, judgements, &radar).await {
            radar.summary = summary;
        }
        Ok(radar)
    }

    /// Attempts to draft a replacement summary, returning `None` on any
    /// transport, parse, or schema failure so the deterministic summary
    /// survives unchanged.
    async fn draft_summary(
        &self,
        problem: &Problem,
        judgements: &[PhaseJudgement],
        radar: &RubricRadar,
    ) -> Option<String> {
        let prompt = render_prompt(problem, judgements, radar);
        let response = self.client.complete(&prompt).await.ok()?;
        let value = extract_json(STAGE, &response).ok()?;
        let summary = value.get("summary")?.as_str()?.trim();
        if summary.is_empty() {
            return None;
        }
        Some(summary.to_owned())
    }
}

/// Renders the prompt asking the model for a one-paragraph summary.
fn render_prompt(problem: &Problem, judgements: &[PhaseJudgement], radar: &RubricRadar) -> String {
    let bullets: Vec<String> = judgements
        .iter()
        .flat_map(|judgement| judgement.bullets.iter().map(|bullet| format!("- ({}) {bullet}", judgement.phase)))
        .collect();
    format!(
        "Write one short paragraph summarizing this candidate's interview for \"{}\".\n\
         Overall score: {:.1}, verdict: {:?}.\n\
         Observations:\n{}\n\
         Respond as JSON: {{\"summary\": \"...\"}}",
        problem.name,
        radar.overall_score,
        radar.verdict,
        bullets.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use grading_core::domain::Evidence;
    use grading_core::domain::Noticed;
    use grading_core::domain::RubricItemDef;

    use super::*;
    use crate::error::AgentError;

    struct StubClient(Result<String, ()>);

    #[async_trait]
    impl LlmClient for StubClient {
        async fn complete(&self, _prompt: &str) -> Result<String, AgentError> {
            self.0.clone().map_err(|()| AgentError::Transport("stub failure".to_owned()))
        }
    }

    fn problem() -> Problem {
        Problem {
            id: "url-shortener".to_owned(),
            name: "Design a URL Shortener".to_owned(),
            difficulty: "medium".to_owned(),
            prompt: "Design a service that shortens long URLs.".to_owned(),
            constraints: None,
            rubric: vec![RubricItemDef::new(
                "Requirements",
                "Clarifies scope",
                [(Phase::Clarify, 1.0)].into_iter().collect(),
            )
            .expect("weights sum to 1.0")],
        }
    }

    fn judgement(phase: Phase, score: f64) -> PhaseJudgement {
        PhaseJudgement {
            phase,
            score,
            bullets: vec!["asked about scale".to_owned(), "missed TTL".to_owned(), "good scoping".to_owned()],
            evidence: Evidence {
                snapshot_url: "https://cdn.example/canvas.png".to_owned(),
                transcripts: Vec::new(),
                noticed: Noticed { strength: "clear scope".to_owned(), issue: "missed an edge case".to_owned() },
            },
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            highlights: Vec::new(),
        }
    }

    fn all_judgements() -> Vec<PhaseJudgement> {
        vec![
            judgement(Phase::Clarify, 8.0),
            judgement(Phase::Estimate, 7.0),
            judgement(Phase::Design, 6.0),
            judgement(Phase::Explain, 9.0),
        ]
    }

    #[tokio::test]
    async fn uses_model_summary_when_well_formed() {
        let response = serde_json::json!({ "summary": "Strong showing on scoping." }).to_string();
        let agent = RubricRadarAgent::new(Arc::new(StubClient(Ok(response))));
        let radar = agent.synthesize(&problem(), &all_judgements()).await.expect("synthesis succeeds");
        assert_eq!(radar.summary, "Strong showing on scoping.");
    }

    #[tokio::test]
    async fn falls_back_to_deterministic_summary_on_transport_failure() {
        let agent = RubricRadarAgent::new(Arc::new(StubClient(Err(()))));
        let radar = agent.synthesize(&problem(), &all_judgements()).await.expect("synthesis succeeds");
        assert!(radar.summary.contains("score"));
    }

    #[tokio::test]
    async fn falls_back_to_deterministic_summary_on_malformed_model_output() {
        let agent = RubricRadarAgent::new(Arc::new(StubClient(Ok("not json".to_owned()))));
        let radar = agent.synthesize(&problem(), &all_judgements()).await.expect("synthesis succeeds");
        assert!(radar.summary.contains("score"));
    }

    #[tokio::test]
    async fn deterministic_fields_never_change_regardless_of_model_output() {
        let with_model =
            RubricRadarAgent::new(Arc::new(StubClient(Ok(serde_json::json!({"summary": "x"}).to_string()))))
                .synthesize(&problem(), &all_judgements())
                .await
                .expect("synthesis succeeds");
        let without_model = RubricRadarAgent::new(Arc::new(StubClient(Err(()))))
            .synthesize(&problem(), &all_judgements())
            .await
            .expect("synthesis succeeds");
        assert_eq!(with_model.radar, without_model.radar);
        assert_eq!(with_model.overall_score, without_model.overall_score);
        assert_eq!(with_model.verdict, without_model.verdict);
        assert_eq!(with_model.rubric, without_model.rubric);
    }
}
