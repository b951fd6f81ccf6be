// crates/grading-agents/src/lib.rs
// ============================================================================
// Crate: grading-agents
// Description: LLM-backed agents and hardened transport for the grading pipeline.
// Purpose: Implement grading-core's evaluator/transcription seams.
// ============================================================================

//! ## Overview
//! This crate supplies the concrete, model-calling implementations of the
//! trait seams `grading-core` defines: an [`LlmClient`](llm::LlmClient) for
//! phase evaluation and plan/outline generation, and a
//! [`TranscriptionProvider`](grading_core::interfaces::TranscriptionProvider)
//! for turning phase audio into transcript text. Deterministic math (rubric
//! scoring, the radar, thresholds) stays in `grading-core::runtime`; agents
//! here only produce judgements, prose, and plans, and the final assembly
//! of those into a contract document.

pub mod error;
pub mod final_assembler;
pub mod http;
pub mod llm;
pub mod phase_evaluator;
pub mod plan_outline;
pub mod registry;
pub mod rubric_radar;
pub mod transcription;

pub use error::AgentError;
pub use error::TranscriptionError;
pub use final_assembler::assemble;
pub use http::HostAllowlist;
pub use http::HttpLlmClient;
pub use llm::extract_json;
pub use llm::LlmClient;
pub use phase_evaluator::LlmPhaseEvaluator;
pub use plan_outline::LlmPlanOutlineAgent;
pub use registry::PhaseEvaluatorRegistry;
pub use rubric_radar::RubricRadarAgent;
pub use transcription::HttpTranscriptionClient;
