// crates/grading-core/src/metrics.rs
// ============================================================================
// Module: Pipeline Telemetry
// Description: Observability hooks for the grading pipeline driver.
// Purpose: Provide metric events and stage latencies without a hard dep.
// Dependencies: (none beyond std)
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for pipeline stage counters
//! and latencies, deliberately dependency-free so a host can wire in
//! Prometheus or OpenTelemetry without redesign. Only identifiers and stable
//! status labels cross this seam; raw evidence (transcript text, canvas
//! bytes) and secret material (API keys) never do.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use crate::identifiers::SubmissionId;

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// A named stage of the pipeline, for latency and event labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// The transcription fan-out stage.
    Transcription,
    /// One phase evaluator's run.
    PhaseEvaluation,
    /// The rubric/radar aggregator stage.
    RubricRadar,
    /// The plan/outline generator stage.
    PlanOutline,
    /// Final assembly into a contract document.
    FinalAssembly,
    /// The Contract Guard's validate-and-repair pass.
    ContractGuard,
}

impl PipelineStage {
    /// Returns a stable label for the stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transcription => "transcription",
            Self::PhaseEvaluation => "phase_evaluation",
            Self::RubricRadar => "rubric_radar",
            Self::PlanOutline => "plan_outline",
            Self::FinalAssembly => "final_assembly",
            Self::ContractGuard => "contract_guard",
        }
    }
}

/// Outcome classification for a pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The stage completed successfully.
    Ok,
    /// The stage failed.
    Err,
}

impl PipelineOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Err => "err",
        }
    }
}

/// One pipeline metric event.
///
/// # Invariants
/// - Never carries transcript text, canvas bytes, or secret material.
#[derive(Debug, Clone)]
pub struct PipelineMetricEvent {
    /// Submission the event concerns.
    pub submission_id: SubmissionId,
    /// Stage the event concerns.
    pub stage: PipelineStage,
    /// Stage outcome.
    pub outcome: PipelineOutcome,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for the pipeline driver.
pub trait PipelineMetrics: Send + Sync {
    /// Records a stage transition event.
    fn record_event(&self, event: &PipelineMetricEvent);
    /// Records a latency observation for a completed stage.
    fn record_stage_latency(&self, stage: PipelineStage, latency: Duration);
}

/// No-op metrics sink, the default when a host wires in nothing.
pub struct NoopMetrics;

impl PipelineMetrics for NoopMetrics {
    fn record_event(&self, _event: &PipelineMetricEvent) {}

    fn record_stage_latency(&self, _stage: PipelineStage, _latency: Duration) {}
}
