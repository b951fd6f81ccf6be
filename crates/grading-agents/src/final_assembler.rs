// crates/grading-agents/src/final_assembler.rs
// ============================================================================
// Module: Final Assembler
// Description: Pure assembly of a FinalResult from the pipeline's stage outputs.
// Purpose: Shape the contract document the Contract Guard certifies.
// Dependencies: grading-core, grading-contract, chrono
// ============================================================================

//! ## Overview
//! Every upstream stage (phase evaluators, rubric/radar agent, plan/outline
//! agent) has already run by the time [`assemble`] is called. This module
//! makes no agent calls and has no fallible external dependency; it only
//! reshapes four judgements plus two synthesized documents into the exact
//! [`FinalResult`] shape the Contract Guard checks next.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::Utc;
use grading_contract::FinalResult;
use grading_contract::PhaseEvidence;
use grading_contract::PhaseScore;
use grading_contract::ProblemSummary;
use grading_contract::TaggedNote;
use grading_contract::RESULT_VERSION;
use grading_core::domain::Phase;
use grading_core::domain::PhaseJudgement;
use grading_core::domain::PlanOutline;
use grading_core::domain::Problem;
use grading_core::domain::RubricRadar;
use grading_core::identifiers::SubmissionId;

// ============================================================================
// SECTION: Assembly
// ============================================================================

/// Assembles a [`FinalResult`] from the four phase judgements and the
/// rubric/radar and plan/outline stages that were derived from them.
///
/// Per-phase `strengths`/`weaknesses` are concatenated in canonical phase
/// order into the result's overall lists, each tagged with the phase it
/// came from; duplicates are left as-is since they reflect independent
/// observations from independent evaluators.
#[must_use]
pub fn assemble(
    submission_id: SubmissionId,
    problem: &Problem,
    judgements: &[PhaseJudgement],
    rubric_radar: RubricRadar,
    plan_outline: PlanOutline,
    submitted_at: DateTime<Utc>,
    graded_at: DateTime<Utc>,
) -> FinalResult {
    let mut sorted = judgements.to_vec();
    sorted.sort_by_key(|judgement| judgement.phase);

    let mut phase_scores = BTreeMap::new();
    let mut evidence = BTreeMap::new();
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    for judgement in &sorted {
        phase_scores.insert(judgement.phase, PhaseScore { score: judgement.score, bullets: judgement.bullets.clone() });
        evidence.insert(
            judgement.phase,
            PhaseEvidence {
                snapshot_url: judgement.evidence.snapshot_url.clone(),
                transcripts: judgement.evidence.transcripts.clone(),
                noticed: judgement.evidence.noticed.clone(),
            },
        );
        strengths.extend(
            judgement
                .strengths
                .iter()
                .map(|text| TaggedNote { phase: judgement.phase, text: text.clone(), timestamp_sec: None }),
        );
        weaknesses.extend(
            judgement
                .weaknesses
                .iter()
                .map(|text| TaggedNote { phase: judgement.phase, text: text.clone(), timestamp_sec: None }),
        );
    }

    FinalResult {
        result_version: RESULT_VERSION,
        submission_id,
        problem: ProblemSummary {
            id: grading_core::identifiers::ProblemId::new(problem.id.clone()),
            name: problem.name.clone(),
            difficulty: problem.difficulty.clone(),
        },
        phase_scores,
        evidence,
        rubric: rubric_radar.rubric,
        radar: rubric_radar.radar,
        overall_score: rubric_radar.overall_score,
        verdict: rubric_radar.verdict,
        strengths,
        weaknesses,
        next_attempt_plan: plan_outline.next_attempt_plan,
        follow_up_questions: plan_outline.follow_up_questions,
        reference_outline: plan_outline.reference_outline,
        submitted_at,
        graded_at,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use grading_core::domain::Evidence;
    use grading_core::domain::NextAttemptItem;
    use grading_core::domain::Noticed;
    use grading_core::domain::OutlineSection;
    use grading_core::domain::Radar;
    use grading_core::domain::ReferenceOutline;
    use grading_core::domain::RubricItemScore;
    use grading_core::domain::RubricStatus;
    use grading_core::domain::TranscriptCitation;
    use grading_core::domain::Verdict;

    use super::*;

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

    fn judgement(phase: Phase, score: f64) -> PhaseJudgement {
        PhaseJudgement {
            phase,
            score,
            bullets: vec!["a".to_owned(), "b".to_owned(), "c".to_owned()],
            evidence: Evidence {
                snapshot_url: format!("https://cdn.example/{phase}.png"),
                transcripts: vec![TranscriptCitation { timestamp_sec: 12, text: format!("{phase} transcript") }],
                noticed: Noticed { strength: "good".to_owned(), issue: "bad".to_owned() },
            },
            strengths: vec![format!("{phase} strength")],
            weaknesses: vec![format!("{phase} weakness")],
            highlights: Vec::new(),
        }
    }

    fn rubric_radar() -> RubricRadar {
        RubricRadar {
            rubric: vec![RubricItemScore {
                label: "Requirements".to_owned(),
                description: "Clarifies scope".to_owned(),
                score: 8.0,
                status: RubricStatus::Pass,
                computed_from: vec![Phase::Clarify],
            }],
            radar: Radar { clarity: 8.0, structure: 7.0, power: 7.5, wisdom: 8.5 },
            overall_score: 7.8,
            verdict: Verdict::Hire,
            summary: "Strong overall.".to_owned(),
        }
    }

    fn plan_outline() -> PlanOutline {
        PlanOutline {
            next_attempt_plan: vec![
                NextAttemptItem { what_went_wrong: "a".to_owned(), do_next_time: vec!["x".to_owned()] },
                NextAttemptItem { what_went_wrong: "b".to_owned(), do_next_time: vec!["y".to_owned()] },
                NextAttemptItem { what_went_wrong: "c".to_owned(), do_next_time: vec!["z".to_owned()] },
            ],
            follow_up_questions: vec!["q1".to_owned(), "q2".to_owned(), "q3".to_owned()],
            reference_outline: ReferenceOutline {
                sections: vec![OutlineSection { section: "Requirements".to_owned(), bullets: vec!["x".to_owned()] }],
            },
        }
    }

    #[test]
    fn assembles_phase_scores_and_evidence_for_all_four_phases() {
        let judgements = vec![
            judgement(Phase::Explain, 9.0),
            judgement(Phase::Clarify, 8.0),
            judgement(Phase::Design, 6.0),
            judgement(Phase::Estimate, 7.0),
        ];
        let submitted_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("valid timestamp");
        let graded_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 5, 0).single().expect("valid timestamp");

        let result = assemble(
            SubmissionId::new("sub-1"),
            &problem(),
            &judgements,
            rubric_radar(),
            plan_outline(),
            submitted_at,
            graded_at,
        );

        assert_eq!(result.result_version, RESULT_VERSION);
        assert_eq!(result.problem.name, "Design a URL Shortener");
        assert_eq!(result.phase_scores.len(), 4);
        assert_eq!(result.evidence.len(), 4);
        assert!((result.phase_scores[&Phase::Design].score - 6.0).abs() < f64::EPSILON);
        assert_eq!(
            result.strengths.iter().map(|note| note.text.clone()).collect::<Vec<_>>(),
            vec![
                "clarify strength".to_owned(),
                "estimate strength".to_owned(),
                "design strength".to_owned(),
                "explain strength".to_owned(),
            ]
        );
        assert_eq!(result.strengths[0].phase, Phase::Clarify);
    }
}
