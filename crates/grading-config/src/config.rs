// crates/grading-config/src/config.rs
// ============================================================================
// Module: Grading Config
// Description: The single process-wide configuration object.
// Purpose: Load, validate, and hand out the pipeline's operator-tunable knobs.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! [`GradingConfig`] is loaded once at process start and threaded
//! explicitly into the driver, store, and agent clients — there is no
//! global/singleton lookup from inside a pipeline stage. Secrets are never
//! stored directly in the config file; [`LlmClientConfig`] and
//! [`TranscriptionConfig`] carry the *name* of an environment variable to
//! read at client-construction time instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::error::ConfigError;

/// Maximum accepted length of a config path, in bytes.
const MAX_PATH_LEN: usize = 4096;
/// Maximum accepted length of a single config path component, in bytes.
const MAX_PATH_COMPONENT_LEN: usize = 255;
/// Maximum accepted size of a config file, in bytes.
const MAX_FILE_BYTES: u64 = 1_048_576;

/// Parses a default URL literal, panicking only on a typo in this module.
fn default_url(literal: &str) -> Url {
    Url::parse(literal).unwrap_or_else(|err| unreachable!("default url {literal} must parse: {err}"))
}

// ============================================================================
// SECTION: LLM Client Config
// ============================================================================

/// Configuration for the LLM completion endpoint every grading agent calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmClientConfig {
    /// Completion endpoint.
    pub endpoint: Url,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout, in seconds.
    pub timeout_s: u64,
    /// Maximum accepted response body size, in bytes.
    pub max_response_bytes: u64,
    /// Hosts the client is permitted to call.
    pub allowed_hosts: Vec<String>,
}

impl Default for LlmClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_url("https://api.openai.com/v1/chat/completions"),
            api_key_env: "GRADING_LLM_API_KEY".to_owned(),
            timeout_s: 60,
            max_response_bytes: 2 * 1024 * 1024,
            allowed_hosts: vec!["api.openai.com".to_owned()],
        }
    }
}

// ============================================================================
// SECTION: Transcription Config
// ============================================================================

/// Configuration for the speech-to-text endpoint the Transcription Stage calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Transcription endpoint.
    pub endpoint: Url,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout, in seconds.
    pub timeout_s: u64,
    /// Hosts the client is permitted to call.
    pub allowed_hosts: Vec<String>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_url("https://api.openai.com/v1/audio/transcriptions"),
            api_key_env: "GRADING_TRANSCRIPTION_API_KEY".to_owned(),
            timeout_s: 90,
            allowed_hosts: vec!["api.openai.com".to_owned()],
        }
    }
}

// ============================================================================
// SECTION: Grading Config
// ============================================================================

/// The single process-wide configuration object for the grading pipeline.
///
/// # Invariants
/// - Every timeout, the worker pool size, and `max_upload_size_mib` are
///   strictly positive once [`GradingConfig::validate`] has passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    /// Base URL the frontend calls for the grading API.
    pub api_base_url: Url,
    /// Origin the API's CORS policy allows.
    pub frontend_origin: String,
    /// Directory canvas/audio uploads are written to.
    pub upload_dir: PathBuf,
    /// Maximum accepted upload size, in MiB.
    pub max_upload_size_mib: u32,
    /// Hard timeout for the transcription stage, in seconds.
    pub transcription_timeout_s: u64,
    /// Hard timeout for the whole pipeline run, in seconds.
    pub pipeline_timeout_s: u64,
    /// Polling interval a streaming client should use, in seconds.
    pub stream_poll_interval_s: f64,
    /// Maximum duration a streaming client should hold a connection open, in seconds.
    pub stream_max_duration_s: u64,
    /// Path to the `SQLite` store file.
    pub store_path: PathBuf,
    /// LLM completion endpoint configuration.
    pub llm: LlmClientConfig,
    /// Transcription endpoint configuration.
    pub transcription: TranscriptionConfig,
    /// Number of submissions the driver will run concurrently.
    pub worker_pool_size: usize,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_url("http://localhost:8000"),
            frontend_origin: "http://localhost:5173".to_owned(),
            upload_dir: PathBuf::from("./storage"),
            max_upload_size_mib: 10,
            transcription_timeout_s: 120,
            pipeline_timeout_s: 300,
            stream_poll_interval_s: 0.5,
            stream_max_duration_s: 600,
            store_path: PathBuf::from("./storage/grading.sqlite3"),
            llm: LlmClientConfig::default(),
            transcription: TranscriptionConfig::default(),
            worker_pool_size: 4,
        }
    }
}

impl GradingConfig {
    /// Loads a config from `path`, or the defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the path is too long, the file is
    /// missing, oversized, not UTF-8, fails to parse as TOML, or fails
    /// field-level validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if path.as_os_str().len() > MAX_PATH_LEN {
            return Err(ConfigError::PathTooLong);
        }
        if path.components().any(|component| component.as_os_str().len() > MAX_PATH_COMPONENT_LEN) {
            return Err(ConfigError::PathComponentTooLong);
        }
        let metadata = fs::metadata(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if metadata.len() > MAX_FILE_BYTES {
            return Err(ConfigError::FileTooLarge);
        }
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        let text = String::from_utf8(bytes).map_err(|_err| ConfigError::NotUtf8)?;
        let config: Self = toml::from_str(&text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates field-level invariants not expressible through types alone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violated
    /// invariant found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frontend_origin.trim().is_empty() {
            return Err(ConfigError::Invalid("frontend_origin must not be empty".to_owned()));
        }
        if self.max_upload_size_mib == 0 {
            return Err(ConfigError::Invalid("max_upload_size_mib must be greater than zero".to_owned()));
        }
        if self.transcription_timeout_s == 0 {
            return Err(ConfigError::Invalid("transcription_timeout_s must be greater than zero".to_owned()));
        }
        if self.pipeline_timeout_s == 0 {
            return Err(ConfigError::Invalid("pipeline_timeout_s must be greater than zero".to_owned()));
        }
        if !(self.stream_poll_interval_s > 0.0) {
            return Err(ConfigError::Invalid("stream_poll_interval_s must be greater than zero".to_owned()));
        }
        if self.stream_max_duration_s == 0 {
            return Err(ConfigError::Invalid("stream_max_duration_s must be greater than zero".to_owned()));
        }
        if self.worker_pool_size == 0 {
            return Err(ConfigError::Invalid("worker_pool_size must be greater than zero".to_owned()));
        }
        if self.llm.timeout_s == 0 {
            return Err(ConfigError::Invalid("llm.timeout_s must be greater than zero".to_owned()));
        }
        if self.llm.max_response_bytes == 0 {
            return Err(ConfigError::Invalid("llm.max_response_bytes must be greater than zero".to_owned()));
        }
        if self.llm.api_key_env.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.api_key_env must not be empty".to_owned()));
        }
        if self.transcription.timeout_s == 0 {
            return Err(ConfigError::Invalid("transcription.timeout_s must be greater than zero".to_owned()));
        }
        if self.transcription.api_key_env.trim().is_empty() {
            return Err(ConfigError::Invalid("transcription.api_key_env must not be empty".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        GradingConfig::default().validate().expect("defaults are valid");
    }

    #[test]
    fn load_with_no_path_returns_defaults() {
        let config = GradingConfig::load(None).expect("loads defaults");
        assert_eq!(config, GradingConfig::default());
    }

    #[test]
    fn validate_rejects_zero_max_upload_size() {
        let mut config = GradingConfig::default();
        config.max_upload_size_mib = 0;
        let err = config.validate().expect_err("zero upload size is invalid");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn validate_rejects_zero_worker_pool_size() {
        let mut config = GradingConfig::default();
        config.worker_pool_size = 0;
        let err = config.validate().expect_err("zero worker pool is invalid");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn validate_rejects_non_positive_stream_poll_interval() {
        let mut config = GradingConfig::default();
        config.stream_poll_interval_s = 0.0;
        assert!(config.validate().is_err());
        config.stream_poll_interval_s = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_api_key_env() {
        let mut config = GradingConfig::default();
        config.llm.api_key_env = "   ".to_owned();
        let err = config.validate().expect_err("blank api key env is invalid");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn validate_rejects_zero_transcription_timeout() {
        let mut config = GradingConfig::default();
        config.transcription.timeout_s = 0;
        assert!(config.validate().is_err());
    }
}
