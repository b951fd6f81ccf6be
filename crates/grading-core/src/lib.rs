// crates/grading-core/src/lib.rs
// ============================================================================
// Crate: grading-core
// Description: Domain model, deterministic scoring, and backend-agnostic
//   interfaces shared by every component of the grading pipeline.
// ============================================================================

//! ## Overview
//! `grading-core` has no knowledge of HTTP, SQLite, or any LLM provider. It
//! defines:
//! - [`domain`]: the data model (submissions, artifacts, transcripts,
//!   judgements, radar, plan, events).
//! - [`interfaces`]: the traits the driver depends on (`SubmissionStore`,
//!   `EventSink`, `ProblemCatalog`, `TranscriptionProvider`,
//!   `PhaseEvaluator`), each implemented by a downstream crate.
//! - [`runtime`]: pure, deterministic functions over the domain model (the
//!   rubric/radar aggregator, the v1 compatibility transformer).
//! - [`time`]: the [`time::Clock`] seam that keeps wall-clock reads out of
//!   the core.
//! - [`metrics`]: the dependency-free [`metrics::PipelineMetrics`] seam the
//!   driver reports stage transitions and latencies through.
//! - [`identifiers`]: newtype identifiers and the event log's ordinal type.
//! - [`error`]: `DomainError`, the validation error shared by domain
//!   constructors.

pub mod domain;
pub mod error;
pub mod identifiers;
pub mod interfaces;
pub mod metrics;
pub mod runtime;
pub mod time;

pub use error::DomainError;
pub use metrics::NoopMetrics;
pub use metrics::PipelineMetrics;
pub use time::Clock;
pub use time::FixedClock;
pub use time::SystemClock;
