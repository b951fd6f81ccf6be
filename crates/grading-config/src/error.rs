// crates/grading-config/src/error.rs
// ============================================================================
// Module: Config Errors
// Description: Error taxonomy for config loading and validation.
// Purpose: Give every misconfiguration a stable, matchable, human message.
// Dependencies: thiserror
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Config Error
// ============================================================================

/// Errors raised while loading or validating a [`crate::GradingConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The supplied config path is longer than the store will accept.
    #[error("config path exceeds max length")]
    PathTooLong,
    /// A single path component is longer than the store will accept.
    #[error("config path component too long")]
    PathComponentTooLong,
    /// The config file is present but larger than the read cap.
    #[error("config file exceeds size limit")]
    FileTooLarge,
    /// The config file's bytes are not valid UTF-8.
    #[error("config file must be utf-8")]
    NotUtf8,
    /// The config file could not be read from disk.
    #[error("failed to read config file: {0}")]
    Io(String),
    /// The config file's contents are not valid TOML.
    #[error("failed to parse config: {0}")]
    Parse(String),
    /// A field failed validation after the config was otherwise parsed.
    #[error("{0}")]
    Invalid(String),
}
