// crates/grading-core/src/time.rs
// ============================================================================
// Module: Clock
// Description: Host-supplied wall-clock access.
// Purpose: Keep the pipeline core free of direct wall-clock reads.
// Dependencies: chrono
// ============================================================================

//! ## Overview
//! The core never calls `Utc::now()` directly from a stage or the driver;
//! every timestamp flows in through a [`Clock`] supplied by the host. This
//! mirrors the discipline the rest of this workspace applies to run state:
//! time is an input, not an ambient effect.

// ============================================================================
// SECTION: Imports
// ============================================================================

use chrono::DateTime;
use chrono::Utc;

// ============================================================================
// SECTION: Clock Trait
// ============================================================================

/// Supplies wall-clock timestamps to the driver and stages.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed [`Clock`] for deterministic tests, reused by downstream crates'
/// own test suites.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
