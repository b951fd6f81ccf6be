// crates/grading-driver/src/scratch.rs
// ============================================================================
// Module: Scratch Session
// Description: Single-owner, typed-slot state for one in-flight run.
// Purpose: Replace implicit shared mutable state with driver-owned slots.
// Dependencies: grading-core
// ============================================================================

//! ## Overview
//! A [`ScratchSession`] is created fresh for each call to
//! [`crate::driver::PipelineDriver::run`] and lives only on that call's
//! stack. Only the driver writes into it; the four phase evaluators, the
//! rubric/radar agent, and the plan/outline agent all return plain values
//! that the driver assigns to a slot, rather than mutating shared state
//! themselves. Because the session owns no external resource (no file
//! handle, no open transaction), Rust's ordinary scope-based `Drop` already
//! guarantees it is released on every exit path, including an early
//! `return` from a failed stage — there is no separate fallible "release"
//! step to forget.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use grading_core::domain::Phase;
use grading_core::domain::PhaseJudgement;
use grading_core::domain::PlanOutline;
use grading_core::domain::RubricRadar;
use grading_core::domain::TranscriptSnippet;

// ============================================================================
// SECTION: Scratch Session
// ============================================================================

/// Per-run scratch state, owned exclusively by the driver for the
/// duration of one [`crate::driver::PipelineDriver::run`] call.
#[derive(Debug, Default)]
pub struct ScratchSession {
    /// Transcript snippets gathered for each phase, keyed by phase.
    transcripts: BTreeMap<Phase, Vec<TranscriptSnippet>>,
    /// Phase Panel output slots, written once per phase.
    judgements: BTreeMap<Phase, PhaseJudgement>,
    /// Rubric/Radar Aggregator output slot.
    rubric_radar: Option<RubricRadar>,
    /// Plan/Outline Generator output slot.
    plan_outline: Option<PlanOutline>,
}

impl ScratchSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the transcript snippets gathered for `phase`.
    pub fn set_transcripts(&mut self, phase: Phase, snippets: Vec<TranscriptSnippet>) {
        self.transcripts.insert(phase, snippets);
    }

    /// Returns every transcript snippet gathered so far, across all phases.
    #[must_use]
    pub fn all_transcripts(&self) -> Vec<TranscriptSnippet> {
        self.transcripts.values().flat_map(|snippets| snippets.iter().cloned()).collect()
    }

    /// Returns the transcript snippets gathered for `phase`.
    #[must_use]
    pub fn transcripts_for(&self, phase: Phase) -> &[TranscriptSnippet] {
        self.transcripts.get(&phase).map_or(&[], Vec::as_slice)
    }

    /// Writes a phase evaluator's judgement into its slot.
    pub fn set_judgement(&mut self, judgement: PhaseJudgement) {
        self.judgements.insert(judgement.phase, judgement);
    }

    /// Returns the judgement slot for `phase`, if it has been written.
    #[must_use]
    pub fn judgement(&self, phase: Phase) -> Option<&PhaseJudgement> {
        self.judgements.get(&phase)
    }

    /// Returns all written judgements as a plain list, in canonical phase
    /// order (the map is keyed by [`Phase`], whose `Ord` is declaration
    /// order).
    #[must_use]
    pub fn judgements(&self) -> Vec<PhaseJudgement> {
        self.judgements.values().cloned().collect()
    }

    /// Returns true once every one of the four phase slots is populated.
    #[must_use]
    pub fn has_all_judgements(&self) -> bool {
        Phase::ALL.iter().all(|phase| self.judgements.contains_key(phase))
    }

    /// Writes the Rubric/Radar Aggregator's output.
    pub fn set_rubric_radar(&mut self, rubric_radar: RubricRadar) {
        self.rubric_radar = Some(rubric_radar);
    }

    /// Takes the Rubric/Radar Aggregator's output, if present.
    pub fn take_rubric_radar(&mut self) -> Option<RubricRadar> {
        self.rubric_radar.take()
    }

    /// Writes the Plan/Outline Generator's output.
    pub fn set_plan_outline(&mut self, plan_outline: PlanOutline) {
        self.plan_outline = Some(plan_outline);
    }

    /// Takes the Plan/Outline Generator's output, if present.
    pub fn take_plan_outline(&mut self) -> Option<PlanOutline> {
        self.plan_outline.take()
    }
}

#[cfg(test)]
mod tests {
    use grading_core::domain::Evidence;
    use grading_core::domain::Noticed;
    use grading_core::identifiers::SubmissionId;

    use super::*;

    fn judgement(phase: Phase) -> PhaseJudgement {
        PhaseJudgement {
            phase,
            score: 7.0,
            bullets: vec!["a".to_owned(), "b".to_owned(), "c".to_owned()],
            evidence: Evidence {
                snapshot_url: "https://cdn.example/canvas.png".to_owned(),
                transcripts: Vec::new(),
                noticed: Noticed { strength: "x".to_owned(), issue: "y".to_owned() },
            },
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            highlights: Vec::new(),
        }
    }

    #[test]
    fn has_all_judgements_is_false_until_all_four_phases_are_written() {
        let mut session = ScratchSession::new();
        assert!(!session.has_all_judgements());
        for phase in Phase::ALL {
            session.set_judgement(judgement(phase));
        }
        assert!(session.has_all_judgements());
    }

    #[test]
    fn judgements_are_returned_in_canonical_phase_order() {
        let mut session = ScratchSession::new();
        session.set_judgement(judgement(Phase::Explain));
        session.set_judgement(judgement(Phase::Clarify));
        session.set_judgement(judgement(Phase::Design));
        session.set_judgement(judgement(Phase::Estimate));
        let phases: Vec<Phase> = session.judgements().into_iter().map(|j| j.phase).collect();
        assert_eq!(phases, Phase::ALL.to_vec());
    }

    #[test]
    fn all_transcripts_flattens_every_phase() {
        let mut session = ScratchSession::new();
        let snippet = |phase: Phase, ts: u32| TranscriptSnippet {
            submission_id: SubmissionId::new("sub-1"),
            phase,
            timestamp_sec: ts,
            text: "ok".to_owned(),
            is_highlight: false,
        };
        session.set_transcripts(Phase::Clarify, vec![snippet(Phase::Clarify, 0)]);
        session.set_transcripts(Phase::Design, vec![snippet(Phase::Design, 0), snippet(Phase::Design, 5)]);
        assert_eq!(session.all_transcripts().len(), 3);
        assert_eq!(session.transcripts_for(Phase::Estimate).len(), 0);
    }
}
