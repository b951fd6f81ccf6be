// crates/grading-agents/src/llm.rs
// ============================================================================
// Module: LLM Client
// Description: Backend-agnostic interface to an LLM completion endpoint.
// Purpose: Let every grading agent share one prompt-in/JSON-out seam.
// Dependencies: async-trait, serde_json
// ============================================================================

//! ## Overview
//! Every grading agent (phase evaluator, plan/outline generator) is a thin
//! prompt template wrapped around an [`LlmClient`] call. This mirrors the
//! source/sink split the rest of this workspace uses for other untrusted
//! external dependencies: a small trait, one hardened implementation
//! ([`crate::http::HttpLlmClient`]), and callers that never talk to the
//! transport directly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;

// ============================================================================
// SECTION: LLM Client
// ============================================================================

/// A single LLM completion round trip: a rendered prompt in, raw text out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends `prompt` to the model and returns its raw text response.
    async fn complete(&self, prompt: &str) -> Result<String, crate::error::AgentError>;
}

// ============================================================================
// SECTION: JSON Extraction
// ============================================================================

/// Extracts a JSON value from a model response, tolerating a markdown code
/// fence (` ```json ... ``` ` or ` ``` ... ``` `) wrapped around the payload.
///
/// # Errors
///
/// Returns [`crate::error::AgentError::MalformedOutput`] when no fenced or
/// bare JSON value can be parsed from `response`.
pub fn extract_json(stage: &'static str, response: &str) -> Result<Value, crate::error::AgentError> {
    let candidate = strip_code_fence(response);
    serde_json::from_str(candidate).map_err(|_err| crate::error::AgentError::MalformedOutput { stage })
}

/// Strips a leading/trailing markdown code fence, if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(without_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let without_open = without_open.strip_prefix("json").unwrap_or(without_open);
    let without_open = without_open.trim_start_matches(['\n', '\r']);
    without_open.strip_suffix("```").map_or(without_open, str::trim_end)
}
