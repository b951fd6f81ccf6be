// crates/grading-contract/tests/contract_guard.rs
// ============================================================================
// Behavioral tests for ContractGuard: pass-through, repair, and failure.
// ============================================================================

use std::collections::BTreeMap;

use chrono::TimeZone;
use chrono::Utc;
use grading_contract::ContractGuard;
use grading_contract::FinalResult;
use grading_contract::GuardError;
use grading_contract::PhaseEvidence;
use grading_contract::PhaseScore;
use grading_contract::ProblemSummary;
use grading_contract::TaggedNote;
use grading_contract::RESULT_VERSION;
use grading_core::domain::NextAttemptItem;
use grading_core::domain::Noticed;
use grading_core::domain::Phase;
use grading_core::domain::RubricItemScore;
use grading_core::domain::RubricStatus;
use grading_core::domain::OutlineSection;
use grading_core::domain::ReferenceOutline;
use grading_core::domain::TranscriptCitation;
use grading_core::domain::Verdict;
use grading_core::identifiers::ProblemId;
use grading_core::identifiers::SubmissionId;
use grading_core::runtime::aggregator;

fn raw_scores() -> BTreeMap<Phase, f64> {
    [(Phase::Clarify, 9.0), (Phase::Estimate, 8.0), (Phase::Design, 8.5), (Phase::Explain, 9.5)]
        .into_iter()
        .collect()
}

fn phase_scores() -> BTreeMap<Phase, PhaseScore> {
    raw_scores()
        .into_iter()
        .map(|(phase, score)| {
            (
                phase,
                PhaseScore {
                    score,
                    bullets: vec!["clear reasoning".to_owned(), "covered edge cases".to_owned(), "good pacing".to_owned()],
                },
            )
        })
        .collect()
}

fn evidence() -> BTreeMap<Phase, PhaseEvidence> {
    Phase::ALL
        .into_iter()
        .map(|phase| {
            (
                phase,
                PhaseEvidence {
                    snapshot_url: format!("https://cdn.example/{phase}.png"),
                    transcripts: vec![TranscriptCitation { timestamp_sec: 12, text: "said something relevant".to_owned() }],
                    noticed: Noticed { strength: "clear scope".to_owned(), issue: "missed an edge case".to_owned() },
                },
            )
        })
        .collect()
}

fn valid_result() -> FinalResult {
    let scores = raw_scores();
    let radar = aggregator::compute_radar(&scores);
    let overall = aggregator::overall_score(&scores);
    let verdict = aggregator::verdict_for_score(overall);
    let submitted_at = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).single().expect("valid timestamp");
    let graded_at = Utc.with_ymd_and_hms(2026, 1, 1, 12, 5, 0).single().expect("valid timestamp");

    FinalResult {
        result_version: RESULT_VERSION,
        submission_id: SubmissionId::new("sub-1"),
        problem: ProblemSummary {
            id: ProblemId::new("url-shortener"),
            name: "Design a URL Shortener".to_owned(),
            difficulty: "medium".to_owned(),
        },
        phase_scores: phase_scores(),
        evidence: evidence(),
        rubric: vec![RubricItemScore {
            label: "Requirements".to_owned(),
            description: "Clarifies scope".to_owned(),
            score: 8.7,
            status: RubricStatus::Pass,
            computed_from: vec![Phase::Clarify, Phase::Estimate],
        }],
        radar,
        overall_score: overall,
        verdict,
        strengths: vec![TaggedNote { phase: Phase::Design, text: "clear tradeoffs".to_owned(), timestamp_sec: None }],
        weaknesses: vec![TaggedNote {
            phase: Phase::Estimate,
            text: "missed a failure mode".to_owned(),
            timestamp_sec: None,
        }],
        next_attempt_plan: vec![
            NextAttemptItem { what_went_wrong: "a".to_owned(), do_next_time: vec!["fix a".to_owned()] },
            NextAttemptItem { what_went_wrong: "b".to_owned(), do_next_time: vec!["fix b".to_owned()] },
            NextAttemptItem { what_went_wrong: "c".to_owned(), do_next_time: vec!["fix c".to_owned()] },
        ],
        follow_up_questions: vec!["q1".to_owned(), "q2".to_owned(), "q3".to_owned()],
        reference_outline: ReferenceOutline {
            sections: vec![
                OutlineSection { section: "Requirements".to_owned(), bullets: vec!["scope".to_owned()] },
                OutlineSection { section: "Data model".to_owned(), bullets: vec!["schema".to_owned()] },
                OutlineSection { section: "API".to_owned(), bullets: vec!["endpoints".to_owned()] },
                OutlineSection { section: "Scaling".to_owned(), bullets: vec!["sharding".to_owned()] },
            ],
        },
        submitted_at,
        graded_at,
    }
}

#[test]
fn valid_result_passes_unchanged() {
    let guard = ContractGuard::new().expect("guard schema compiles");
    let mut result = valid_result();
    let before = result.clone();
    guard.check(&mut result).expect("valid result passes");
    assert_eq!(result, before);
}

#[test]
fn repairs_drifted_result_version() {
    let guard = ContractGuard::new().expect("guard schema compiles");
    let mut result = valid_result();
    result.result_version = 1;
    guard.check(&mut result).expect("result_version is repairable");
    assert_eq!(result.result_version, RESULT_VERSION);
}

#[test]
fn repairs_wrong_overall_score_and_verdict() {
    let guard = ContractGuard::new().expect("guard schema compiles");
    let mut result = valid_result();
    result.overall_score = 0.0;
    result.verdict = Verdict::NoHire;
    guard.check(&mut result).expect("math is repairable");
    let expected_overall = aggregator::overall_score(&raw_scores());
    assert!((result.overall_score - expected_overall).abs() < 1e-9);
    assert_eq!(result.verdict, aggregator::verdict_for_score(expected_overall));
}

#[test]
fn truncates_over_long_next_attempt_plan() {
    let guard = ContractGuard::new().expect("guard schema compiles");
    let mut result = valid_result();
    result.next_attempt_plan.push(NextAttemptItem {
        what_went_wrong: "d".to_owned(),
        do_next_time: vec!["fix d".to_owned()],
    });
    guard.check(&mut result).expect("over-long plan is repairable");
    assert_eq!(result.next_attempt_plan.len(), 3);
}

#[test]
fn fails_on_missing_phase_score() {
    let guard = ContractGuard::new().expect("guard schema compiles");
    let mut result = valid_result();
    result.phase_scores.remove(&Phase::Explain);
    let err = guard.check(&mut result).expect_err("missing phase is unrepairable");
    assert_eq!(err, GuardError::Unrepairable { field: "phase_scores".to_owned() });
}

#[test]
fn fails_on_too_few_follow_up_questions() {
    let guard = ContractGuard::new().expect("guard schema compiles");
    let mut result = valid_result();
    result.follow_up_questions.truncate(2);
    let err = guard.check(&mut result).expect_err("too few questions is unrepairable");
    assert_eq!(err, GuardError::Unrepairable { field: "follow_up_questions".to_owned() });
}

#[test]
fn fails_when_graded_before_submitted() {
    let guard = ContractGuard::new().expect("guard schema compiles");
    let mut result = valid_result();
    result.graded_at = result.submitted_at - chrono::Duration::seconds(1);
    let err = guard.check(&mut result).expect_err("time travel is unrepairable");
    assert_eq!(err, GuardError::Unrepairable { field: "graded_at".to_owned() });
}
