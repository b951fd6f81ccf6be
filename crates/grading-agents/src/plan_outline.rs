// crates/grading-agents/src/plan_outline.rs
// ============================================================================
// Module: Plan/Outline Generator Agent
// Description: LLM-backed generator of the forward-looking study plan.
// Purpose: Produce the PlanOutline stage from the four phase judgements.
// Dependencies: async-trait, grading-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Unlike the rubric/radar stage, nothing here is deterministic: the next
//! attempt plan, follow-up questions, and reference outline are all
//! generative. [`LlmPlanOutlineAgent`] asks for a best-effort response
//! shaped to the contract's cardinalities; the Contract Guard downstream
//! is the actual enforcement point (truncating what it can, failing what
//! it can't), so this agent validates only enough to catch a badly
//! malformed response early and fail fast.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use grading_core::domain::PhaseJudgement;
use grading_core::domain::PlanOutline;
use grading_core::domain::Problem;
use grading_core::interfaces::BoxError;
use serde::Deserialize;

use crate::error::AgentError;
use crate::llm::extract_json;
use crate::llm::LlmClient;

const STAGE: &str = "plan_outline_generator";
const MIN_FOLLOW_UP_QUESTIONS: usize = 1;
const MIN_OUTLINE_SECTIONS: usize = 1;

#[derive(Debug, Deserialize)]
struct RawPlanOutline {
    next_attempt_plan: Vec<grading_core::domain::NextAttemptItem>,
    follow_up_questions: Vec<String>,
    reference_outline: grading_core::domain::ReferenceOutline,
}

// ============================================================================
// SECTION: Plan/Outline Agent
// ============================================================================

/// Generates a [`PlanOutline`] from the candidate's four phase judgements.
pub struct LlmPlanOutlineAgent {
    client: Arc<dyn LlmClient>,
    prompt_template: String,
}

impl LlmPlanOutlineAgent {
    /// Builds an agent backed by `client`, using `prompt_template` with
    /// `{prompt}` and `{observations}` substituted before the call.
    #[must_use]
    pub fn new(client: Arc<dyn LlmClient>, prompt_template: impl Into<String>) -> Self {
        Self { client, prompt_template: prompt_template.into() }
    }

    fn render_prompt(&self, problem: &Problem, judgements: &[PhaseJudgement]) -> String {
        let observations: Vec<String> = judgements
            .iter()
            .map(|judgement| {
                format!(
                    "{} (score {:.1}): strengths={:?}, weaknesses={:?}",
                    judgement.phase, judgement.score, judgement.strengths, judgement.weaknesses
                )
            })
            .collect();
        self.prompt_template
            .replace("{prompt}", &problem.prompt)
            .replace("{observations}", &observations.join("\n"))
    }

    /// Generates the plan outline.
    ///
    /// # Errors
    ///
    /// Returns an error when the model call fails, its response is not
    /// parseable JSON, or it is missing any of the three required lists.
    pub async fn generate(&self, problem: &Problem, judgements: &[PhaseJudgement]) -> Result<PlanOutline, BoxError> {
        let prompt = self.render_prompt(problem, judgements);
        let response = self.client.complete(&prompt).await?;
        let value = extract_json(STAGE, &response)?;
        let raw: RawPlanOutline =
            serde_json::from_value(value).map_err(|_err| AgentError::MalformedOutput { stage: STAGE })?;

        if raw.next_attempt_plan.is_empty() {
            return Err(Box::new(AgentError::SchemaViolation { field: "next_attempt_plan".to_owned() }));
        }
        if raw.follow_up_questions.len() < MIN_FOLLOW_UP_QUESTIONS {
            return Err(Box::new(AgentError::SchemaViolation { field: "follow_up_questions".to_owned() }));
        }
        if raw.reference_outline.sections.len() < MIN_OUTLINE_SECTIONS {
            return Err(Box::new(AgentError::SchemaViolation { field: "reference_outline.sections".to_owned() }));
        }

        Ok(PlanOutline {
            next_attempt_plan: raw.next_attempt_plan,
            follow_up_questions: raw.follow_up_questions,
            reference_outline: raw.reference_outline,
        })
    }
}
