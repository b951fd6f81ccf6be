// crates/grading-core/src/domain/phase.rs
// ============================================================================
// Module: Phase
// Description: The fixed four-phase interview structure.
// Purpose: Provide the single canonical enum and ordering for all stages.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! `Phase` is the fixed set {clarify, estimate, design, explain}. Its
//! `Ord` implementation follows the declaration order, which is the fixed
//! order used everywhere phases are enumerated: phase events,
//! `phase_scores`, `evidence`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Phase
// ============================================================================

/// One of the four fixed interview phases.
///
/// # Invariants
/// - Variant declaration order is the canonical ordering used throughout
///   the pipeline (events, `phase_scores`, `evidence`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Clarifying requirements and constraints.
    Clarify,
    /// Back-of-envelope capacity estimation.
    Estimate,
    /// High-level system design.
    Design,
    /// Explaining tradeoffs and deep dives.
    Explain,
}

impl Phase {
    /// All four phases in canonical order.
    pub const ALL: [Self; 4] = [Self::Clarify, Self::Estimate, Self::Design, Self::Explain];

    /// Returns a stable lowercase label matching the external contract.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clarify => "clarify",
            Self::Estimate => "estimate",
            Self::Design => "design",
            Self::Explain => "explain",
        }
    }

    /// Parses a phase from its stable lowercase label.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "clarify" => Some(Self::Clarify),
            "estimate" => Some(Self::Estimate),
            "design" => Some(Self::Design),
            "explain" => Some(Self::Explain),
            _ => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
