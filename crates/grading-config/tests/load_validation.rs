// crates/grading-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding, parse).
// Purpose: Ensure config file handling is strict and fail-closed.
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use grading_config::ConfigError;
use grading_config::GradingConfig;
use tempfile::NamedTempFile;

fn assert_invalid(result: Result<GradingConfig, ConfigError>, matcher: impl Fn(&ConfigError) -> bool) {
    let error = result.expect_err("expected invalid config load");
    assert!(matcher(&error), "unexpected error variant: {error}");
}

#[test]
fn load_rejects_path_too_long() {
    let long_path = "a".repeat(5_000);
    assert_invalid(GradingConfig::load(Some(Path::new(&long_path))), |err| {
        matches!(err, ConfigError::PathTooLong)
    });
}

#[test]
fn load_rejects_path_component_too_long() {
    let long_component = "a".repeat(300);
    assert_invalid(GradingConfig::load(Some(Path::new(&long_component))), |err| {
        matches!(err, ConfigError::PathComponentTooLong)
    });
}

#[test]
fn load_rejects_oversized_file() {
    let mut file = NamedTempFile::new().expect("creates temp file");
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).expect("writes oversized payload");
    assert_invalid(GradingConfig::load(Some(file.path())), |err| matches!(err, ConfigError::FileTooLarge));
}

#[test]
fn load_rejects_non_utf8_file() {
    let mut file = NamedTempFile::new().expect("creates temp file");
    file.write_all(&[0xFF, 0xFE, 0xFF]).expect("writes invalid utf-8");
    assert_invalid(GradingConfig::load(Some(file.path())), |err| matches!(err, ConfigError::NotUtf8));
}

#[test]
fn load_rejects_malformed_toml() {
    let mut file = NamedTempFile::new().expect("creates temp file");
    file.write_all(b"this is not = [valid toml").expect("writes malformed toml");
    assert_invalid(GradingConfig::load(Some(file.path())), |err| matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_rejects_a_parsed_config_that_fails_validation() {
    let mut file = NamedTempFile::new().expect("creates temp file");
    file.write_all(b"worker_pool_size = 0\n").expect("writes config");
    assert_invalid(GradingConfig::load(Some(file.path())), |err| matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn load_accepts_a_partial_toml_overlay_over_defaults() {
    let mut file = NamedTempFile::new().expect("creates temp file");
    file.write_all(b"worker_pool_size = 8\nstore_path = \"/var/lib/grading/store.sqlite3\"\n")
        .expect("writes config");
    let config = GradingConfig::load(Some(file.path())).expect("loads overlay config");
    assert_eq!(config.worker_pool_size, 8);
    assert_eq!(config.store_path, PathBuf::from("/var/lib/grading/store.sqlite3"));
    assert_eq!(config.frontend_origin, GradingConfig::default().frontend_origin);
}

#[test]
fn load_accepts_an_overlay_of_a_nested_table() {
    let mut file = NamedTempFile::new().expect("creates temp file");
    file.write_all(b"[llm]\ntimeout_s = 30\n").expect("writes config");
    let config = GradingConfig::load(Some(file.path())).expect("loads overlay config");
    assert_eq!(config.llm.timeout_s, 30);
    assert_eq!(config.llm.api_key_env, GradingConfig::default().llm.api_key_env);
}
