// crates/grading-cli/src/prompts.rs
// ============================================================================
// Module: Default Prompt Templates
// Description: Operator-overridable prompt text for the LLM-backed agents.
// Purpose: Give `grading-cli run` a working set of templates out of the box.
// Dependencies: none
// ============================================================================

//! ## Overview
//! [`grading_agents::LlmPhaseEvaluator`] and
//! [`grading_agents::LlmPlanOutlineAgent`] take their prompt template as a
//! plain string with `{placeholder}` substitutions; neither crate ships a
//! default. These constants are this CLI's defaults, used unless an
//! operator supplies their own via `--phase-prompt`/`--plan-prompt`.

/// Default template for the four phase evaluators.
///
/// Substituted placeholders: `{phase}`, `{prompt}`, `{canvas_url}`,
/// `{transcript}`.
pub const DEFAULT_PHASE_PROMPT: &str = concat!(
    "You are grading the {phase} phase of a system design interview.\n",
    "Problem prompt:\n{prompt}\n\n",
    "Canvas snapshot: {canvas_url}\n",
    "Transcript for this phase:\n{transcript}\n\n",
    "Respond as JSON with this exact shape: {{\"score\": <0-10>, ",
    "\"bullets\": [<3 to 6 short strings>], ",
    "\"evidence\": {{\"snapshot_url\": <string>, ",
    "\"transcripts\": [{{\"timestamp_sec\": <0+>, \"text\": <string>}}, ...], ",
    "\"noticed\": {{\"strength\": <string>, \"issue\": <string>}}}}, ",
    "\"strengths\": [<string>, ...], \"weaknesses\": [<string>, ...], ",
    "\"highlights\": [<string>, ...]}}",
);

/// Default template for the plan/outline generator.
///
/// Substituted placeholders: `{prompt}`, `{observations}`.
pub const DEFAULT_PLAN_PROMPT: &str = concat!(
    "You are writing a study plan for a candidate after a system design interview.\n",
    "Problem prompt:\n{prompt}\n\n",
    "Phase observations:\n{observations}\n\n",
    "Respond as JSON with this exact shape: ",
    "{{\"next_attempt_plan\": [<exactly 3 items, each ",
    "{{\"what_went_wrong\": <string>, \"do_next_time\": [<string>, ...]}}>], ",
    "\"follow_up_questions\": [<at least 3 strings>], ",
    "\"reference_outline\": {{\"sections\": [<4 to 6 items, each ",
    "{{\"section\": <string>, \"bullets\": [<string>, ...]}}>]}}}}",
);
