// crates/grading-config/src/lib.rs
// ============================================================================
// Crate: grading-config
// Description: The single process-wide configuration object for the
//   grading pipeline, its load path, and its fail-closed validation.
// ============================================================================

//! ## Overview
//! `grading-config` has no knowledge of the driver, the store, or any
//! agent backend; it only defines [`GradingConfig`] and the rules that
//! decide whether a given config file is safe to run with.

pub mod config;
pub mod error;

pub use config::GradingConfig;
pub use config::LlmClientConfig;
pub use config::TranscriptionConfig;
pub use error::ConfigError;
