// crates/grading-core/tests/aggregator_scenarios.rs
// ============================================================================
// Behavioral tests for the full aggregate() pipeline against a realistic
// problem catalog entry, rather than isolated formula unit tests.
// ============================================================================

use std::collections::BTreeMap;

use grading_core::domain::Phase;
use grading_core::domain::Problem;
use grading_core::domain::RubricItemDef;
use grading_core::domain::RubricStatus;
use grading_core::domain::Verdict;
use grading_core::runtime::aggregator::aggregate;

fn url_shortener_problem() -> Problem {
    let requirements = RubricItemDef::new(
        "Requirements gathering",
        "Did the candidate clarify scope, scale, and constraints?",
        [(Phase::Clarify, 0.7), (Phase::Estimate, 0.3)].into_iter().collect(),
    )
    .expect("weights sum to 1.0");
    let architecture = RubricItemDef::new(
        "System architecture",
        "Is the high-level design sound and does it scale?",
        [(Phase::Design, 0.8), (Phase::Estimate, 0.2)].into_iter().collect(),
    )
    .expect("weights sum to 1.0");
    let communication = RubricItemDef::new(
        "Communication",
        "Did the candidate reason clearly about tradeoffs?",
        [(Phase::Explain, 1.0)].into_iter().collect(),
    )
    .expect("weights sum to 1.0");

    Problem {
        id: "url-shortener".to_owned(),
        name: "Design a URL Shortener".to_owned(),
        difficulty: "medium".to_owned(),
        prompt: "Design a service that shortens long URLs.".to_owned(),
        constraints: Some("100M writes/day, reads dominate 100:1.".to_owned()),
        rubric: vec![requirements, architecture, communication],
    }
}

fn phase_scores(pairs: &[(Phase, f64)]) -> BTreeMap<Phase, f64> {
    pairs.iter().copied().collect()
}

#[test]
fn strong_attempt_yields_hire_verdict() {
    let problem = url_shortener_problem();
    let scores = phase_scores(&[
        (Phase::Clarify, 9.0),
        (Phase::Estimate, 8.5),
        (Phase::Design, 8.0),
        (Phase::Explain, 8.5),
    ]);
    let radar = aggregate(&problem, &scores);

    assert_eq!(radar.rubric.len(), 3);
    assert_eq!(radar.verdict, Verdict::Hire);
    assert!(radar.rubric.iter().any(|item| item.status == RubricStatus::Pass));
}

#[test]
fn weak_attempt_yields_no_hire_verdict() {
    let problem = url_shortener_problem();
    let scores = phase_scores(&[
        (Phase::Clarify, 2.0),
        (Phase::Estimate, 1.0),
        (Phase::Design, 2.5),
        (Phase::Explain, 3.0),
    ]);
    let radar = aggregate(&problem, &scores);

    assert_eq!(radar.verdict, Verdict::NoHire);
    assert!(radar.rubric.iter().all(|item| item.status != RubricStatus::Pass));
}

#[test]
fn rubric_items_report_their_contributing_phases() {
    let problem = url_shortener_problem();
    let scores = phase_scores(&[
        (Phase::Clarify, 7.0),
        (Phase::Estimate, 7.0),
        (Phase::Design, 7.0),
        (Phase::Explain, 7.0),
    ]);
    let radar = aggregate(&problem, &scores);

    let requirements = radar.rubric.iter().find(|item| item.label == "Requirements gathering").unwrap();
    assert_eq!(requirements.computed_from, vec![Phase::Clarify, Phase::Estimate]);

    let communication = radar.rubric.iter().find(|item| item.label == "Communication").unwrap();
    assert_eq!(communication.computed_from, vec![Phase::Explain]);
    assert_eq!(communication.description, "Did the candidate reason clearly about tradeoffs?");
}

#[test]
fn overall_score_is_the_mean_of_phase_scores_not_the_radar() {
    let problem = url_shortener_problem();
    let scores = phase_scores(&[
        (Phase::Clarify, 8.0),
        (Phase::Estimate, 7.5),
        (Phase::Design, 6.0),
        (Phase::Explain, 9.0),
    ]);
    let radar = aggregate(&problem, &scores);
    assert!((radar.overall_score - 7.6).abs() < 1e-9);
}
