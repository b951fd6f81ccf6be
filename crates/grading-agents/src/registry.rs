// crates/grading-agents/src/registry.rs
// ============================================================================
// Module: Phase Evaluator Registry
// Description: Keyed lookup from Phase to its configured evaluator agent.
// Purpose: Let the Phase Panel hold four evaluators behind one collection.
// Dependencies: grading-core
// ============================================================================

//! ## Overview
//! `PhaseEvaluatorRegistry` mirrors the `BTreeMap<key, Box<dyn Trait + Send
//! + Sync>>` registry shape used elsewhere in this workspace for scheme- or
//! name-keyed backends, specialized to the fixed four [`Phase`] keys.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use grading_core::domain::Phase;
use grading_core::interfaces::PhaseEvaluator;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Registry of phase evaluator agents, keyed by the phase each one grades.
///
/// # Invariants
/// - At most one evaluator is registered per phase; a later registration
///   for the same phase replaces the earlier one.
#[derive(Default)]
pub struct PhaseEvaluatorRegistry {
    /// Evaluators keyed by phase.
    evaluators: BTreeMap<Phase, Arc<dyn PhaseEvaluator>>,
}

impl PhaseEvaluatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an evaluator under the phase it reports from
    /// [`PhaseEvaluator::phase`].
    #[must_use]
    pub fn register(mut self, evaluator: impl PhaseEvaluator + 'static) -> Self {
        self.evaluators.insert(evaluator.phase(), Arc::new(evaluator));
        self
    }

    /// Looks up the evaluator configured for `phase`, if any.
    #[must_use]
    pub fn get(&self, phase: Phase) -> Option<Arc<dyn PhaseEvaluator>> {
        self.evaluators.get(&phase).cloned()
    }

    /// Returns true when all four phases have a registered evaluator.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        Phase::ALL.iter().all(|phase| self.evaluators.contains_key(phase))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use grading_core::domain::PhaseArtifact;
    use grading_core::domain::PhaseJudgement;
    use grading_core::domain::Problem;
    use grading_core::domain::TranscriptSnippet;
    use grading_core::interfaces::BoxError;

    use super::*;

    struct StubEvaluator(Phase);

    #[async_trait]
    impl PhaseEvaluator for StubEvaluator {
        fn phase(&self) -> Phase {
            self.0
        }

        async fn evaluate(
            &self,
            _problem: &Problem,
            _artifact: &PhaseArtifact,
            _transcripts: &[TranscriptSnippet],
        ) -> Result<PhaseJudgement, BoxError> {
            unreachable!("not exercised by registry tests")
        }
    }

    #[test]
    fn registry_is_incomplete_until_all_four_phases_registered() {
        let registry = PhaseEvaluatorRegistry::new().register(StubEvaluator(Phase::Clarify));
        assert!(!registry.is_complete());

        let registry = registry
            .register(StubEvaluator(Phase::Estimate))
            .register(StubEvaluator(Phase::Design))
            .register(StubEvaluator(Phase::Explain));
        assert!(registry.is_complete());
    }

    #[test]
    fn later_registration_replaces_earlier_one_for_same_phase() {
        let registry = PhaseEvaluatorRegistry::new()
            .register(StubEvaluator(Phase::Clarify))
            .register(StubEvaluator(Phase::Clarify));
        assert!(registry.get(Phase::Clarify).is_some());
        assert!(registry.get(Phase::Estimate).is_none());
    }
}
