// crates/grading-driver/src/driver.rs
// ============================================================================
// Module: Pipeline Driver
// Description: Drives one submission through intake, evaluation, and assembly.
// Purpose: Own every state transition, event emission, and scratch slot.
// Dependencies: grading-core, grading-agents, grading-contract, tokio
// ============================================================================

//! ## Overview
//! [`PipelineDriver`] is the sole writer of a submission's lifecycle state,
//! its event log, and its cached result. `run` is idempotent on a terminal
//! submission and single-flight per id within one driver instance; two
//! hard timeouts bound the transcription stage and the run as a whole.
//! Stage failures are fatal to that run — there is no per-stage retry here,
//! only a single terminal event and a best-effort `failed` transition.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use grading_agents::LlmPlanOutlineAgent;
use grading_agents::PhaseEvaluatorRegistry;
use grading_agents::RubricRadarAgent;
use grading_contract::ContractGuard;
use grading_contract::GuardError;
use grading_core::domain::EventStatus;
use grading_core::domain::LifecycleState;
use grading_core::domain::Phase;
use grading_core::domain::PhaseArtifact;
use grading_core::domain::PhaseJudgement;
use grading_core::domain::Problem;
use grading_core::domain::Submission;
use grading_core::domain::TranscriptSnippet;
use grading_core::domain::Event;
use grading_core::identifiers::EventOrdinal;
use grading_core::identifiers::SubmissionId;
use grading_core::interfaces::BoxError;
use grading_core::interfaces::EventSink;
use grading_core::interfaces::ProblemCatalog;
use grading_core::interfaces::SubmissionStore;
use grading_core::interfaces::TranscriptionProvider;
use grading_core::metrics::PipelineMetricEvent;
use grading_core::metrics::PipelineMetrics;
use grading_core::metrics::PipelineOutcome;
use grading_core::metrics::PipelineStage;
use grading_core::Clock;

use crate::error::DriverError;
use crate::scratch::ScratchSession;

// ============================================================================
// SECTION: Cancellation Handle
// ============================================================================

/// Shared cooperative-cancellation flag for one in-flight run.
type CancelFlag = Arc<AtomicBool>;

// ============================================================================
// SECTION: Pipeline Driver
// ============================================================================

/// Drives submissions through transcription, phase evaluation, aggregation,
/// plan generation, assembly, and the contract guard.
///
/// # Invariants
/// - At most one `run` call is actively driving a given submission id at a
///   time; a concurrent call for the same id is a no-op.
/// - `run` never returns `Ok` without the submission reaching a terminal
///   state, and never leaves more than one terminal event recorded.
pub struct PipelineDriver {
    /// Durable submission storage.
    store: Arc<dyn SubmissionStore>,
    /// Append-only event log.
    events: Arc<dyn EventSink>,
    /// Read-only problem catalog.
    problems: Arc<dyn ProblemCatalog>,
    /// Speech-to-text backend for the transcription stage.
    transcription: Arc<dyn TranscriptionProvider>,
    /// The four phase evaluators, one per [`Phase`].
    evaluators: PhaseEvaluatorRegistry,
    /// Rubric/Radar Aggregator.
    rubric_radar: RubricRadarAgent,
    /// Plan/Outline Generator.
    plan_outline: LlmPlanOutlineAgent,
    /// Last-line-of-defense contract validator.
    guard: ContractGuard,
    /// Clock used for every timestamp this driver stamps.
    clock: Arc<dyn Clock>,
    /// Telemetry sink for stage events and latencies.
    metrics: Arc<dyn PipelineMetrics>,
    /// Hard budget for the transcription stage, per phase.
    transcription_timeout: Duration,
    /// Hard budget for one whole pipeline run.
    pipeline_timeout: Duration,
    /// Submission ids currently being driven, with their cancel flags.
    in_flight: Mutex<HashMap<SubmissionId, CancelFlag>>,
}

impl PipelineDriver {
    /// Builds a driver from its dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidInput`] when `evaluators` does not
    /// have all four phases registered.
    #[allow(clippy::too_many_arguments, reason = "every field is a distinct required dependency")]
    pub fn new(
        store: Arc<dyn SubmissionStore>,
        events: Arc<dyn EventSink>,
        problems: Arc<dyn ProblemCatalog>,
        transcription: Arc<dyn TranscriptionProvider>,
        evaluators: PhaseEvaluatorRegistry,
        rubric_radar: RubricRadarAgent,
        plan_outline: LlmPlanOutlineAgent,
        guard: ContractGuard,
        clock: Arc<dyn Clock>,
        metrics: Arc<dyn PipelineMetrics>,
        transcription_timeout: Duration,
        pipeline_timeout: Duration,
    ) -> Result<Self, DriverError> {
        if !evaluators.is_complete() {
            return Err(DriverError::InvalidInput("phase evaluator registry is incomplete".to_owned()));
        }
        Ok(Self {
            store,
            events,
            problems,
            transcription,
            evaluators,
            rubric_radar,
            plan_outline,
            guard,
            clock,
            metrics,
            transcription_timeout,
            pipeline_timeout,
            in_flight: Mutex::new(HashMap::new()),
        })
    }

    /// Requests cooperative cancellation of an in-flight run.
    ///
    /// No-op if `id` is not currently being driven by this instance.
    pub fn cancel(&self, id: &SubmissionId) {
        if let Ok(guard) = self.in_flight.lock() {
            if let Some(flag) = guard.get(id) {
                flag.store(true, Ordering::SeqCst);
            }
        }
    }

    /// Drives `id` through the pipeline.
    ///
    /// Idempotent: a no-op if the submission is already terminal or is
    /// already being driven by a concurrent call.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError`] on any fatal stage failure. The submission
    /// is always left in a terminal state before this returns `Err`,
    /// except when the error itself is [`DriverError::NotFound`] or a
    /// [`DriverError::PersistenceFailed`] raised before a state transition
    /// to `processing` was durably recorded.
    pub async fn run(&self, id: &SubmissionId) -> Result<(), DriverError> {
        let submission = self.store.get(id).await.map_err(persistence_failed)?;
        let Some(submission) = submission else {
            return Err(DriverError::NotFound);
        };
        if submission.is_terminal() {
            return Ok(());
        }

        let Some(cancel_flag) = self.claim(id) else {
            return Ok(());
        };
        let outcome = self.run_claimed(id, &submission, &cancel_flag).await;
        self.release(id);

        if let Err(ref err) = outcome {
            self.finalize_failure(id, err).await;
        }
        outcome
    }

    /// Registers `id` as in-flight, returning its cancel flag, or `None`
    /// if another call already holds it.
    fn claim(&self, id: &SubmissionId) -> Option<CancelFlag> {
        let mut guard = self.in_flight.lock().ok()?;
        if guard.contains_key(id) {
            return None;
        }
        let flag: CancelFlag = Arc::new(AtomicBool::new(false));
        guard.insert(id.clone(), Arc::clone(&flag));
        Some(flag)
    }

    /// Releases `id`'s single-flight claim.
    fn release(&self, id: &SubmissionId) {
        if let Ok(mut guard) = self.in_flight.lock() {
            guard.remove(id);
        }
    }

    /// Runs the pipeline under the overall pipeline timeout budget.
    async fn run_claimed(
        &self,
        id: &SubmissionId,
        submission: &Submission,
        cancel_flag: &CancelFlag,
    ) -> Result<(), DriverError> {
        match tokio::time::timeout(self.pipeline_timeout, self.execute(id, submission, cancel_flag)).await {
            Ok(outcome) => outcome,
            Err(_elapsed) => Err(DriverError::AgentExecutionFailed { stage: "pipeline_timeout" }),
        }
    }

    /// Best-effort terminal cleanup after a fatal error: transitions the
    /// submission to `failed` and appends a `failed` event, swallowing any
    /// further failure (logged only through metrics, per
    /// [`DriverError::SessionCleanupFailed`]'s non-fatal posture).
    async fn finalize_failure(&self, id: &SubmissionId, err: &DriverError) {
        let now = self.clock.now();
        if self.store.transition(id, LifecycleState::Failed, Some(now), None).await.is_err() {
            self.metrics.record_event(&PipelineMetricEvent {
                submission_id: id.clone(),
                stage: PipelineStage::FinalAssembly,
                outcome: PipelineOutcome::Err,
            });
        }
        let ordinal = self.next_ordinal(id).await.unwrap_or(EventOrdinal::FIRST);
        let event = Event {
            submission_id: id.clone(),
            ordinal,
            status: EventStatus::Failed,
            message: err.reason_tag(),
            phase: None,
            progress: None,
            created_at: now,
        };
        let _ignored = self.events.append(&event).await;
    }

    /// Returns the next event ordinal for `id`, continuing from whatever
    /// has already been appended.
    async fn next_ordinal(&self, id: &SubmissionId) -> Result<EventOrdinal, DriverError> {
        let existing = self.events.list_since(id, None).await.map_err(persistence_failed)?;
        Ok(existing.last().map_or(EventOrdinal::FIRST, |event| event.ordinal.next()))
    }

    /// Appends one event at `ordinal`, then advances `ordinal` in place.
    async fn emit(
        &self,
        ordinal: &mut EventOrdinal,
        id: &SubmissionId,
        status: EventStatus,
        message: impl Into<String>,
        phase: Option<Phase>,
        progress: Option<f64>,
    ) -> Result<(), DriverError> {
        let event = Event {
            submission_id: id.clone(),
            ordinal: *ordinal,
            status,
            message: message.into(),
            phase,
            progress,
            created_at: self.clock.now(),
        };
        self.events.append(&event).await.map_err(persistence_failed)?;
        *ordinal = ordinal.next();
        Ok(())
    }

    /// Returns an error if cancellation has been requested for this run.
    fn check_cancelled(cancel_flag: &CancelFlag) -> Result<(), DriverError> {
        if cancel_flag.load(Ordering::SeqCst) {
            return Err(DriverError::InvalidInput("run cancelled".to_owned()));
        }
        Ok(())
    }

    /// Runs the full pipeline for an already-claimed, non-terminal
    /// submission: transcription, phase panel, aggregation, plan
    /// generation, assembly, and the contract guard.
    async fn execute(
        &self,
        id: &SubmissionId,
        submission: &Submission,
        cancel_flag: &CancelFlag,
    ) -> Result<(), DriverError> {
        let problem = self
            .problems
            .get(&submission.problem_id)
            .await
            .map_err(persistence_failed)?
            .ok_or(DriverError::NotFound)?;

        let artifacts = self.artifacts_by_phase(id).await?;
        let mut ordinal = self.next_ordinal(id).await?;
        let mut scratch = ScratchSession::new();

        self.store.transition(id, LifecycleState::Processing, None, None).await.map_err(persistence_failed)?;
        self.emit(&mut ordinal, id, EventStatus::Processing, "processing started", None, Some(0.0)).await?;

        let started = Instant::now();
        let transcription_outcome = self.run_transcription(id, &artifacts, &mut scratch).await;
        self.record_stage(PipelineStage::Transcription, id, started.elapsed(), &transcription_outcome);
        transcription_outcome?;
        self.store.append_transcripts(id, &scratch.all_transcripts()).await.map_err(persistence_failed)?;
        self.emit(&mut ordinal, id, EventStatus::Processing, "transcription complete", None, Some(0.1)).await?;
        self.emit(&mut ordinal, id, EventStatus::Processing, "starting phase panel", None, Some(0.2)).await?;
        Self::check_cancelled(cancel_flag)?;

        let started = Instant::now();
        let panel_outcome = self.run_phase_panel(&problem, &artifacts, &mut scratch).await;
        self.record_stage(PipelineStage::PhaseEvaluation, id, started.elapsed(), &panel_outcome);
        panel_outcome?;
        for phase in Phase::ALL {
            if scratch.judgement(phase).is_none() {
                return Err(DriverError::MissingIntermediate { slot: phase.as_str() });
            }
            self.emit(
                &mut ordinal,
                id,
                event_status_for_phase(phase),
                format!("{phase} evaluated"),
                Some(phase),
                None,
            )
            .await?;
        }
        Self::check_cancelled(cancel_flag)?;

        let judgements = scratch.judgements();

        let started = Instant::now();
        let rubric_radar_outcome = self.rubric_radar.synthesize(&problem, &judgements).await;
        self.record_stage(PipelineStage::RubricRadar, id, started.elapsed(), &rubric_radar_outcome);
        let rubric_radar = rubric_radar_outcome
            .map_err(|_err| DriverError::AgentExecutionFailed { stage: PipelineStage::RubricRadar.as_str() })?;
        self.emit(&mut ordinal, id, EventStatus::Synthesizing, "synthesizing result", None, Some(0.85)).await?;

        let started = Instant::now();
        let plan_outline_outcome = self.plan_outline.generate(&problem, &judgements).await;
        self.record_stage(PipelineStage::PlanOutline, id, started.elapsed(), &plan_outline_outcome);
        let plan_outline = plan_outline_outcome
            .map_err(|_err| DriverError::AgentExecutionFailed { stage: PipelineStage::PlanOutline.as_str() })?;
        Self::check_cancelled(cancel_flag)?;

        let graded_at = self.clock.now();
        let assembly_started = Instant::now();
        let mut final_result = grading_agents::assemble(
            id.clone(),
            &problem,
            &judgements,
            rubric_radar,
            plan_outline,
            submission.created_at,
            graded_at,
        );
        self.metrics.record_stage_latency(PipelineStage::FinalAssembly, assembly_started.elapsed());
        self.metrics.record_event(&PipelineMetricEvent {
            submission_id: id.clone(),
            stage: PipelineStage::FinalAssembly,
            outcome: PipelineOutcome::Ok,
        });

        let guard_started = Instant::now();
        let guard_outcome = self.guard.check(&mut final_result);
        self.record_stage(PipelineStage::ContractGuard, id, guard_started.elapsed(), &guard_outcome);
        guard_outcome.map_err(|err| match err {
            GuardError::SchemaInvalid { field } | GuardError::Unrepairable { field } => {
                DriverError::ContractViolation { field }
            }
        })?;

        let cached = serde_json::to_value(&final_result)
            .map_err(|err| DriverError::PersistenceFailed(err.to_string()))?;
        self.store
            .transition(id, LifecycleState::Complete, Some(graded_at), Some(cached))
            .await
            .map_err(persistence_failed)?;
        self.emit(&mut ordinal, id, EventStatus::Complete, "grading complete", None, Some(1.0)).await?;

        Ok(())
    }

    /// Loads and validates that all four phase artifacts are present.
    async fn artifacts_by_phase(
        &self,
        id: &SubmissionId,
    ) -> Result<BTreeMap<Phase, PhaseArtifact>, DriverError> {
        let artifacts = self.store.artifacts(id).await.map_err(persistence_failed)?;
        let by_phase: BTreeMap<Phase, PhaseArtifact> =
            artifacts.into_iter().map(|artifact| (artifact.phase, artifact)).collect();
        for phase in Phase::ALL {
            if !by_phase.contains_key(&phase) {
                return Err(DriverError::InvalidInput(format!("missing captured artifact for phase {phase}")));
            }
        }
        Ok(by_phase)
    }

    /// Transcribes one phase's audio, or returns an empty transcript when
    /// no audio was captured for that phase.
    async fn transcribe_phase(
        &self,
        id: &SubmissionId,
        phase: Phase,
        artifact: &PhaseArtifact,
    ) -> Result<Vec<TranscriptSnippet>, DriverError> {
        let Some(audio_url) = artifact.audio_url.as_deref() else {
            return Ok(Vec::new());
        };
        match tokio::time::timeout(self.transcription_timeout, self.transcription.transcribe(id, phase, audio_url))
            .await
        {
            Ok(Ok(snippets)) => Ok(snippets),
            Ok(Err(_err)) | Err(_) => Err(DriverError::TranscriptionFailed(phase)),
        }
    }

    /// Transcribes all four phases concurrently; any single failure fails
    /// the whole stage (all-or-fail).
    async fn run_transcription(
        &self,
        id: &SubmissionId,
        artifacts: &BTreeMap<Phase, PhaseArtifact>,
        scratch: &mut ScratchSession,
    ) -> Result<(), DriverError> {
        let (clarify, estimate, design, explain) = tokio::join!(
            self.transcribe_phase(id, Phase::Clarify, &artifacts[&Phase::Clarify]),
            self.transcribe_phase(id, Phase::Estimate, &artifacts[&Phase::Estimate]),
            self.transcribe_phase(id, Phase::Design, &artifacts[&Phase::Design]),
            self.transcribe_phase(id, Phase::Explain, &artifacts[&Phase::Explain]),
        );
        for (phase, result) in Phase::ALL.into_iter().zip([clarify, estimate, design, explain]) {
            scratch.set_transcripts(phase, result?);
        }
        Ok(())
    }

    /// Evaluates one phase against its registered evaluator.
    async fn evaluate_phase(
        &self,
        problem: &Problem,
        phase: Phase,
        artifact: &PhaseArtifact,
        transcripts: &[TranscriptSnippet],
    ) -> Result<PhaseJudgement, DriverError> {
        let evaluator = self
            .evaluators
            .get(phase)
            .ok_or(DriverError::MissingIntermediate { slot: phase.as_str() })?;
        evaluator
            .evaluate(problem, artifact, transcripts)
            .await
            .map_err(|_err| DriverError::AgentExecutionFailed { stage: phase.as_str() })
    }

    /// Runs the four phase evaluators concurrently, writing each judgement
    /// to its scratch slot.
    async fn run_phase_panel(
        &self,
        problem: &Problem,
        artifacts: &BTreeMap<Phase, PhaseArtifact>,
        scratch: &mut ScratchSession,
    ) -> Result<(), DriverError> {
        let (clarify, estimate, design, explain) = tokio::join!(
            self.evaluate_phase(problem, Phase::Clarify, &artifacts[&Phase::Clarify], scratch.transcripts_for(Phase::Clarify)),
            self.evaluate_phase(problem, Phase::Estimate, &artifacts[&Phase::Estimate], scratch.transcripts_for(Phase::Estimate)),
            self.evaluate_phase(problem, Phase::Design, &artifacts[&Phase::Design], scratch.transcripts_for(Phase::Design)),
            self.evaluate_phase(problem, Phase::Explain, &artifacts[&Phase::Explain], scratch.transcripts_for(Phase::Explain)),
        );
        for result in [clarify, estimate, design, explain] {
            scratch.set_judgement(result?);
        }
        Ok(())
    }

    /// Records a stage's latency and outcome through the metrics seam.
    fn record_stage<T, E>(&self, stage: PipelineStage, id: &SubmissionId, elapsed: Duration, result: &Result<T, E>) {
        self.metrics.record_stage_latency(stage, elapsed);
        let outcome = if result.is_ok() { PipelineOutcome::Ok } else { PipelineOutcome::Err };
        self.metrics.record_event(&PipelineMetricEvent { submission_id: id.clone(), stage, outcome });
    }
}

/// Returns the event status reported when `phase`'s evaluator completes.
const fn event_status_for_phase(phase: Phase) -> EventStatus {
    match phase {
        Phase::Clarify => EventStatus::Clarify,
        Phase::Estimate => EventStatus::Estimate,
        Phase::Design => EventStatus::Design,
        Phase::Explain => EventStatus::Explain,
    }
}

/// Wraps a storage-layer [`BoxError`] as a [`DriverError::PersistenceFailed`].
fn persistence_failed(err: BoxError) -> DriverError {
    DriverError::PersistenceFailed(err.to_string())
}
