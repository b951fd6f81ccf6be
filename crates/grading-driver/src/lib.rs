// crates/grading-driver/src/lib.rs
// ============================================================================
// Crate: grading-driver
// Description: Orchestrates one submission through the grading pipeline.
// Purpose: Own lifecycle transitions, event emission, and scratch state so
//          no other crate has to reimplement pipeline control flow.
// Dependencies: grading-core, grading-agents, grading-contract, tokio
// ============================================================================

//! ## Overview
//! `grading-driver` wires the Transcription Stage, Phase Panel, Rubric/Radar
//! Aggregator, Plan/Outline Generator, Final Assembler, and Contract Guard
//! into a single [`PipelineDriver::run`] call per submission. It assigns
//! event ordinals, records stage timings through
//! [`grading_core::metrics::PipelineMetrics`], and guarantees a submission
//! always ends in exactly one terminal state with exactly one terminal
//! event.

pub mod driver;
pub mod error;
pub mod scratch;

pub use driver::PipelineDriver;
pub use error::DriverError;
pub use scratch::ScratchSession;
