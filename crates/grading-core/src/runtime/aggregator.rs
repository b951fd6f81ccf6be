// crates/grading-core/src/runtime/aggregator.rs
// ============================================================================
// Module: Aggregator
// Description: Deterministic rubric scoring and the four-axis skill radar.
// Purpose: Turn four phase judgements into a RubricRadar, pure and replayable.
// Dependencies: none (pure functions over grading_core::domain types)
// ============================================================================

//! ## Overview
//! Every function here is a pure, deterministic transform: given the same
//! phase scores, it always produces the same rubric scores, radar, overall
//! score, and verdict. This determinism is what lets a Contract Guard
//! re-derive and cross-check the Aggregator's own numbers before a result
//! is persisted, and what lets historical results be replayed exactly.
//!
//! The four radar weight formulas and the rubric/verdict thresholds below
//! are fixed points of the external contract: changing them changes the
//! meaning of every previously graded submission.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::domain::Phase;
use crate::domain::Problem;
use crate::domain::Radar;
use crate::domain::RubricItemScore;
use crate::domain::RubricRadar;
use crate::domain::RubricStatus;
use crate::domain::Verdict;

// ============================================================================
// SECTION: Thresholds
// ============================================================================

/// Minimum rubric item score classified as [`RubricStatus::Pass`].
const RUBRIC_PASS_THRESHOLD: f64 = 8.0;
/// Minimum rubric item score classified as [`RubricStatus::Partial`].
const RUBRIC_PARTIAL_THRESHOLD: f64 = 5.0;

/// Minimum overall score classified as [`Verdict::Hire`].
const VERDICT_HIRE_THRESHOLD: f64 = 7.5;
/// Minimum overall score classified as [`Verdict::Maybe`].
const VERDICT_MAYBE_THRESHOLD: f64 = 5.0;

// ============================================================================
// SECTION: Rubric Item Scoring
// ============================================================================

/// Scores one rubric item as the weighted sum of per-phase scores.
#[must_use]
pub fn score_rubric_item(
    item: &crate::domain::RubricItemDef,
    phase_scores: &BTreeMap<Phase, f64>,
) -> RubricItemScore {
    let score: f64 = item
        .phase_weights
        .iter()
        .map(|(phase, weight)| weight * phase_scores.get(phase).copied().unwrap_or(0.0))
        .sum();
    let computed_from = item
        .phase_weights
        .iter()
        .filter(|(_, weight)| **weight > 0.0)
        .map(|(phase, _)| *phase)
        .collect();
    RubricItemScore {
        label: item.label.clone(),
        description: item.description.clone(),
        score,
        status: status_for_rubric_score(score),
        computed_from,
    }
}

/// Classifies a rubric item's weighted score as pass, partial, or fail.
#[must_use]
pub fn status_for_rubric_score(score: f64) -> RubricStatus {
    if score >= RUBRIC_PASS_THRESHOLD {
        RubricStatus::Pass
    } else if score >= RUBRIC_PARTIAL_THRESHOLD {
        RubricStatus::Partial
    } else {
        RubricStatus::Fail
    }
}

// ============================================================================
// SECTION: Radar
// ============================================================================

/// Computes the four-axis skill radar from per-phase scores.
///
/// Weight formulas are fixed:
/// - `clarity` = 0.5*clarify + 0.2*estimate + 0.2*design + 0.1*explain
/// - `structure` = 0.6*design + 0.2*explain + 0.1*clarify + 0.1*estimate
/// - `power` = 0.4*estimate + 0.4*design + 0.2*explain
/// - `wisdom` = 0.6*explain + 0.3*design + 0.1*clarify
#[must_use]
pub fn compute_radar(phase_scores: &BTreeMap<Phase, f64>) -> Radar {
    let clarify = phase_scores.get(&Phase::Clarify).copied().unwrap_or(0.0);
    let estimate = phase_scores.get(&Phase::Estimate).copied().unwrap_or(0.0);
    let design = phase_scores.get(&Phase::Design).copied().unwrap_or(0.0);
    let explain = phase_scores.get(&Phase::Explain).copied().unwrap_or(0.0);

    Radar {
        clarity: 0.5 * clarify + 0.2 * estimate + 0.2 * design + 0.1 * explain,
        structure: 0.6 * design + 0.2 * explain + 0.1 * clarify + 0.1 * estimate,
        power: 0.4 * estimate + 0.4 * design + 0.2 * explain,
        wisdom: 0.6 * explain + 0.3 * design + 0.1 * clarify,
    }
}

/// Rounds `value` to one decimal place.
fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Computes the overall score as the arithmetic mean of the four phase
/// scores, rounded to one decimal place.
///
/// This is independent of the radar: the radar's dimensions are themselves
/// weighted blends of the phase scores, so averaging the radar instead of
/// the phase scores would double-weight whichever phase dominates the most
/// dimensions.
#[must_use]
pub fn overall_score(phase_scores: &BTreeMap<Phase, f64>) -> f64 {
    let mean = if phase_scores.is_empty() { 0.0 } else { phase_scores.values().sum::<f64>() / phase_scores.len() as f64 };
    round_to_one_decimal(mean)
}

/// Classifies an overall score as hire, maybe, or no-hire.
#[must_use]
pub fn verdict_for_score(score: f64) -> Verdict {
    if score >= VERDICT_HIRE_THRESHOLD {
        Verdict::Hire
    } else if score >= VERDICT_MAYBE_THRESHOLD {
        Verdict::Maybe
    } else {
        Verdict::NoHire
    }
}

/// Renders a short prose summary for a verdict and its overall score.
#[must_use]
pub fn summary_for(verdict: Verdict, overall: f64) -> String {
    match verdict {
        Verdict::Hire => format!("Strong performance overall (score {overall:.1}); recommend hire."),
        Verdict::Maybe => {
            format!("Mixed performance overall (score {overall:.1}); borderline, recommend further review.")
        }
        Verdict::NoHire => {
            format!("Performance fell short overall (score {overall:.1}); recommend no-hire.")
        }
    }
}

// ============================================================================
// SECTION: Full Aggregation
// ============================================================================

/// Aggregates per-phase scores and a problem's rubric into a full
/// [`RubricRadar`].
#[must_use]
pub fn aggregate(problem: &Problem, phase_scores: &BTreeMap<Phase, f64>) -> RubricRadar {
    let rubric: Vec<RubricItemScore> =
        problem.rubric.iter().map(|item| score_rubric_item(item, phase_scores)).collect();
    let radar = compute_radar(phase_scores);
    let overall = overall_score(phase_scores);
    let verdict = verdict_for_score(overall);
    let summary = summary_for(verdict, overall);
    RubricRadar {
        rubric,
        radar,
        overall_score: overall,
        verdict,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RubricItemDef;

    fn phase_scores(pairs: &[(Phase, f64)]) -> BTreeMap<Phase, f64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn rubric_item_weighted_sum_matches_worked_example() {
        let item = RubricItemDef::new(
            "Requirements",
            "Clarifies scope",
            [(Phase::Clarify, 0.7), (Phase::Estimate, 0.3)].into_iter().collect(),
        )
        .expect("weights sum to 1.0");
        let scores = phase_scores(&[
            (Phase::Clarify, 8.0),
            (Phase::Estimate, 7.5),
            (Phase::Design, 6.0),
            (Phase::Explain, 9.0),
        ]);
        let result = score_rubric_item(&item, &scores);
        assert!((result.score - 7.85).abs() < 1e-9);
        assert_eq!(result.status, RubricStatus::Partial);
    }

    #[test]
    fn rubric_status_boundary_at_five_is_partial() {
        assert_eq!(status_for_rubric_score(5.0), RubricStatus::Partial);
    }

    #[test]
    fn rubric_status_boundary_at_eight_is_pass() {
        assert_eq!(status_for_rubric_score(8.0), RubricStatus::Pass);
    }

    #[test]
    fn rubric_status_below_five_is_fail() {
        assert_eq!(status_for_rubric_score(4.99), RubricStatus::Fail);
    }

    #[test]
    fn verdict_boundary_at_seven_point_five_is_hire() {
        assert_eq!(verdict_for_score(7.5), Verdict::Hire);
    }

    #[test]
    fn verdict_boundary_at_five_is_maybe() {
        assert_eq!(verdict_for_score(5.0), Verdict::Maybe);
    }

    #[test]
    fn verdict_below_five_is_no_hire() {
        assert_eq!(verdict_for_score(4.99), Verdict::NoHire);
    }

    #[test]
    fn clarity_dimension_matches_formula() {
        let scores = phase_scores(&[(Phase::Clarify, 10.0)]);
        let radar = compute_radar(&scores);
        assert!((radar.clarity - 5.0).abs() < 1e-9);
    }

    #[test]
    fn structure_dimension_matches_formula() {
        let scores = phase_scores(&[(Phase::Design, 10.0)]);
        let radar = compute_radar(&scores);
        assert!((radar.structure - 6.0).abs() < 1e-9);
    }

    #[test]
    fn power_dimension_matches_formula() {
        let scores = phase_scores(&[(Phase::Estimate, 10.0)]);
        let radar = compute_radar(&scores);
        assert!((radar.power - 4.0).abs() < 1e-9);
    }

    #[test]
    fn wisdom_dimension_matches_formula() {
        let scores = phase_scores(&[(Phase::Explain, 10.0)]);
        let radar = compute_radar(&scores);
        assert!((radar.wisdom - 6.0).abs() < 1e-9);
    }

    #[test]
    fn overall_score_is_mean_of_phase_scores_rounded_to_one_decimal() {
        let scores =
            phase_scores(&[(Phase::Clarify, 8.0), (Phase::Estimate, 7.5), (Phase::Design, 6.0), (Phase::Explain, 9.0)]);
        assert!((overall_score(&scores) - 7.6).abs() < 1e-9);
    }

    #[test]
    fn overall_score_does_not_equal_mean_of_radar_dimensions() {
        let scores =
            phase_scores(&[(Phase::Clarify, 8.0), (Phase::Estimate, 7.5), (Phase::Design, 6.0), (Phase::Explain, 9.0)]);
        let radar = compute_radar(&scores);
        let radar_mean = round_to_one_decimal(radar.as_array().iter().sum::<f64>() / 4.0);
        assert!((overall_score(&scores) - radar_mean).abs() > 1e-9);
    }
}
