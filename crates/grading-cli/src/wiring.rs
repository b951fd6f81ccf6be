// crates/grading-cli/src/wiring.rs
// ============================================================================
// Module: Driver Wiring
// Description: Assembles a PipelineDriver from a GradingConfig.
// Purpose: Keep `run`'s backend construction out of the command dispatcher.
// Dependencies: grading-agents, grading-config, grading-contract, grading-core,
//   grading-driver, grading-store-sqlite
// ============================================================================

//! ## Overview
//! [`build_driver`] wires the real, network-calling backends
//! ([`HttpLlmClient`], [`HttpTranscriptionClient`]) and the real
//! [`SqliteStore`] into one [`PipelineDriver`], the same assembly
//! `tests/pipeline.rs` in `grading-driver` does with fakes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use grading_agents::HostAllowlist;
use grading_agents::HttpLlmClient;
use grading_agents::HttpTranscriptionClient;
use grading_agents::LlmClient;
use grading_agents::LlmPhaseEvaluator;
use grading_agents::LlmPlanOutlineAgent;
use grading_agents::PhaseEvaluatorRegistry;
use grading_agents::RubricRadarAgent;
use grading_config::GradingConfig;
use grading_contract::ContractGuard;
use grading_core::NoopMetrics;
use grading_core::SystemClock;
use grading_core::domain::Phase;
use grading_driver::PipelineDriver;
use grading_store_sqlite::SqliteStore;

use crate::error::CliError;
use crate::prompts::DEFAULT_PHASE_PROMPT;
use crate::prompts::DEFAULT_PLAN_PROMPT;

/// Builds a fully wired [`PipelineDriver`] over `store`, using `config` for
/// every endpoint, allowlist, and timeout.
///
/// # Errors
///
/// Returns [`CliError`] when an API key environment variable is unset, an
/// HTTP client cannot be constructed, the contract guard's schema fails to
/// compile, or the evaluator registry ends up incomplete.
pub fn build_driver(config: &GradingConfig, store: Arc<SqliteStore>) -> Result<PipelineDriver, CliError> {
    let llm_client = build_llm_client(config)?;
    let transcription = build_transcription_client(config)?;

    let mut evaluators = PhaseEvaluatorRegistry::new();
    for phase in Phase::ALL {
        evaluators = evaluators.register(LlmPhaseEvaluator::new(phase, Arc::clone(&llm_client), DEFAULT_PHASE_PROMPT));
    }

    let rubric_radar = RubricRadarAgent::new(Arc::clone(&llm_client));
    let plan_outline = LlmPlanOutlineAgent::new(llm_client, DEFAULT_PLAN_PROMPT);
    let guard = ContractGuard::new().map_err(|err| CliError::new(format!("failed to build contract guard: {err}")))?;

    PipelineDriver::new(
        store.clone(),
        store.clone(),
        store,
        Arc::new(transcription),
        evaluators,
        rubric_radar,
        plan_outline,
        guard,
        Arc::new(SystemClock),
        Arc::new(NoopMetrics),
        Duration::from_secs(config.transcription_timeout_s),
        Duration::from_secs(config.pipeline_timeout_s),
    )
    .map_err(|err| CliError::new(format!("failed to build pipeline driver: {err}")))
}

/// Builds the HTTP-backed LLM client from `config.llm`.
fn build_llm_client(config: &GradingConfig) -> Result<Arc<dyn LlmClient>, CliError> {
    let api_key = std::env::var(&config.llm.api_key_env)
        .map_err(|_err| CliError::new(format!("environment variable {} is not set", config.llm.api_key_env)))?;
    let allowlist = HostAllowlist::new(config.llm.allowed_hosts.iter());
    let client = HttpLlmClient::new(config.llm.endpoint.clone(), allowlist, api_key)
        .map_err(|err| CliError::new(format!("failed to build llm client: {err}")))?
        .with_max_response_bytes(config.llm.max_response_bytes);
    Ok(Arc::new(client))
}

/// Builds the HTTP-backed transcription client from `config.transcription`.
fn build_transcription_client(config: &GradingConfig) -> Result<HttpTranscriptionClient, CliError> {
    let allowlist = HostAllowlist::new(config.transcription.allowed_hosts.iter());
    HttpTranscriptionClient::new(config.transcription.endpoint.clone(), allowlist)
        .map_err(|err| CliError::new(format!("failed to build transcription client: {err}")))
}
