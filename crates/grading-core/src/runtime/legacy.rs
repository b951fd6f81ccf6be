// crates/grading-core/src/runtime/legacy.rs
// ============================================================================
// Module: Legacy Compatibility Transformer
// Description: Pure v1 (dimension-oriented) -> v2 (phase-oriented) uplift.
// Purpose: Let historical data display under today's phase-oriented model.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Before the pipeline was re-architected around the fixed four-phase
//! structure, submissions were scored against named "dimensions" that
//! happen to correspond one-to-one with today's phases, and event status
//! used different labels for the same four stages.
//!
//! This module is a historical-data compatibility layer only: it is called
//! when reading old rows for display, never from the live driver. The v1
//! shape is not a second runtime path through the pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::domain::EventStatus;
use crate::domain::Phase;

// ============================================================================
// SECTION: Legacy Phase Label
// ============================================================================

/// The v1 dimension label for one of today's four phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LegacyPhaseLabel {
    /// v1 name for [`Phase::Clarify`].
    Scoping,
    /// v1 name for [`Phase::Estimate`].
    Scale,
    /// v1 name for [`Phase::Design`], unchanged.
    Design,
    /// v1 name for [`Phase::Explain`].
    Tradeoff,
}

impl LegacyPhaseLabel {
    /// Maps a v1 dimension label to its v2 phase.
    #[must_use]
    pub const fn to_phase(self) -> Phase {
        match self {
            Self::Scoping => Phase::Clarify,
            Self::Scale => Phase::Estimate,
            Self::Design => Phase::Design,
            Self::Tradeoff => Phase::Explain,
        }
    }

    /// Maps a v2 phase to its v1 dimension label.
    #[must_use]
    pub const fn from_phase(phase: Phase) -> Self {
        match phase {
            Phase::Clarify => Self::Scoping,
            Phase::Estimate => Self::Scale,
            Phase::Design => Self::Design,
            Phase::Explain => Self::Tradeoff,
        }
    }
}

/// Uplifts a v1 dimension-keyed score map into a v2 phase-keyed score map.
#[must_use]
pub fn uplift_v1_to_v2(legacy_scores: &BTreeMap<LegacyPhaseLabel, f64>) -> BTreeMap<Phase, f64> {
    legacy_scores.iter().map(|(label, score)| (label.to_phase(), *score)).collect()
}

// ============================================================================
// SECTION: Legacy Event Status
// ============================================================================

/// The v1 event status label, where one exists for a v2 [`EventStatus`].
///
/// `Queued` and `Processing` have no v1 equivalent: those two statuses were
/// introduced with the re-architecture and never appear in historical data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyStatus {
    /// v1 name for [`EventStatus::Clarify`].
    Scoping,
    /// v1 name for [`EventStatus::Estimate`].
    Scale,
    /// v1 name for [`EventStatus::Design`], unchanged.
    Design,
    /// v1 name for [`EventStatus::Explain`].
    Tradeoff,
    /// Unchanged from v1.
    Synthesizing,
    /// Unchanged from v1.
    Complete,
    /// Unchanged from v1.
    Failed,
}

/// Maps a v2 [`EventStatus`] to its v1 label, where one exists.
#[must_use]
pub const fn legacy_status_for(status: EventStatus) -> Option<LegacyStatus> {
    match status {
        EventStatus::Clarify => Some(LegacyStatus::Scoping),
        EventStatus::Estimate => Some(LegacyStatus::Scale),
        EventStatus::Design => Some(LegacyStatus::Design),
        EventStatus::Explain => Some(LegacyStatus::Tradeoff),
        EventStatus::Synthesizing => Some(LegacyStatus::Synthesizing),
        EventStatus::Complete => Some(LegacyStatus::Complete),
        EventStatus::Failed => Some(LegacyStatus::Failed),
        EventStatus::Queued | EventStatus::Processing => None,
    }
}

/// Maps a v1 [`LegacyStatus`] to its v2 equivalent.
#[must_use]
pub const fn status_for_legacy(status: LegacyStatus) -> EventStatus {
    match status {
        LegacyStatus::Scoping => EventStatus::Clarify,
        LegacyStatus::Scale => EventStatus::Estimate,
        LegacyStatus::Design => EventStatus::Design,
        LegacyStatus::Tradeoff => EventStatus::Explain,
        LegacyStatus::Synthesizing => EventStatus::Synthesizing,
        LegacyStatus::Complete => EventStatus::Complete,
        LegacyStatus::Failed => EventStatus::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIJECTIVE: [EventStatus; 7] = [
        EventStatus::Clarify,
        EventStatus::Estimate,
        EventStatus::Design,
        EventStatus::Explain,
        EventStatus::Synthesizing,
        EventStatus::Complete,
        EventStatus::Failed,
    ];

    #[test]
    fn status_round_trips_through_legacy_for_bijective_subset() {
        for status in BIJECTIVE {
            let legacy = legacy_status_for(status).expect("bijective status has a legacy mapping");
            assert_eq!(status_for_legacy(legacy), status);
        }
    }

    #[test]
    fn queued_and_processing_have_no_legacy_equivalent() {
        assert_eq!(legacy_status_for(EventStatus::Queued), None);
        assert_eq!(legacy_status_for(EventStatus::Processing), None);
    }

    #[test]
    fn phase_label_round_trips() {
        for phase in Phase::ALL {
            assert_eq!(LegacyPhaseLabel::from_phase(phase).to_phase(), phase);
        }
    }

    #[test]
    fn uplift_preserves_scores_under_relabeling() {
        let legacy: BTreeMap<LegacyPhaseLabel, f64> =
            [(LegacyPhaseLabel::Scoping, 8.0), (LegacyPhaseLabel::Tradeoff, 9.0)].into_iter().collect();
        let uplifted = uplift_v1_to_v2(&legacy);
        assert_eq!(uplifted.get(&Phase::Clarify), Some(&8.0));
        assert_eq!(uplifted.get(&Phase::Explain), Some(&9.0));
    }
}
