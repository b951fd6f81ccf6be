// crates/grading-agents/src/transcription.rs
// ============================================================================
// Module: Transcription Client
// Description: Hardened HTTP-backed TranscriptionProvider for one phase's audio.
// Purpose: Turn one phase's audio capture into ordered transcript snippets.
// Dependencies: async-trait, grading-core, reqwest, serde, url
// ============================================================================

//! ## Overview
//! [`HttpTranscriptionClient`] makes one call per `(submission, phase)`
//! pair; fan-out across the four phases and the all-or-fail policy on
//! partial transcription failure are orchestration concerns that belong to
//! the driver, not to this client. The client itself only owns the
//! untrusted-endpoint hardening (allowlist, no redirects, size cap,
//! timeout) and the ordering check the domain layer already defines.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use grading_core::domain::validate_ordering;
use grading_core::domain::Phase;
use grading_core::domain::TranscriptSnippet;
use grading_core::identifiers::SubmissionId;
use grading_core::interfaces::BoxError;
use grading_core::interfaces::TranscriptionProvider;
use reqwest::redirect::Policy;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::TranscriptionError;
use crate::http::HostAllowlist;

/// Default cap on a transcription response body, in bytes.
const DEFAULT_MAX_RESPONSE_BYTES: u64 = 8 * 1024 * 1024;
/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Deserialize)]
struct RawSnippet {
    timestamp_sec: u32,
    text: String,
    #[serde(default)]
    is_highlight: bool,
}

// ============================================================================
// SECTION: HTTP Transcription Client
// ============================================================================

/// Async, hardened HTTP client for a transcription provider endpoint.
#[derive(Debug, Clone)]
pub struct HttpTranscriptionClient {
    client: Client,
    endpoint: Url,
    allowlist: HostAllowlist,
    max_response_bytes: u64,
}

impl HttpTranscriptionClient {
    /// Builds a client for `endpoint`, restricted to `allowlist`.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed or
    /// `endpoint`'s host is not in `allowlist`.
    pub fn new(endpoint: Url, allowlist: HostAllowlist) -> Result<Self, BoxError> {
        let host = endpoint.host_str().ok_or("transcription endpoint has no host")?.to_ascii_lowercase();
        if !allowlist.allows(&host) {
            return Err(format!("transcription host not in allowlist: {host}").into());
        }
        let client = Client::builder().redirect(Policy::none()).timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self { client, endpoint, allowlist, max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES })
    }
}

#[async_trait]
impl TranscriptionProvider for HttpTranscriptionClient {
    async fn transcribe(
        &self,
        submission_id: &SubmissionId,
        phase: Phase,
        audio_url: &str,
    ) -> Result<Vec<TranscriptSnippet>, BoxError> {
        let host = self.endpoint.host_str().unwrap_or_default().to_ascii_lowercase();
        if !self.allowlist.allows(&host) {
            return Err(Box::new(TranscriptionError::ProviderError { phase }));
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&serde_json::json!({ "audio_url": audio_url, "phase": phase.as_str() }))
            .send()
            .await
            .map_err(|_err| TranscriptionError::ProviderError { phase })?;

        if response.url() != &self.endpoint || !response.status().is_success() {
            return Err(Box::new(TranscriptionError::ProviderError { phase }));
        }
        if response.content_length().is_some_and(|length| length > self.max_response_bytes) {
            return Err(Box::new(TranscriptionError::ProviderError { phase }));
        }

        let body = response.text().await.map_err(|_err| TranscriptionError::ProviderError { phase })?;
        if body.len() as u64 > self.max_response_bytes {
            return Err(Box::new(TranscriptionError::ProviderError { phase }));
        }

        let raw: Vec<RawSnippet> =
            serde_json::from_str(&body).map_err(|_err| TranscriptionError::ProviderError { phase })?;
        let snippets: Vec<TranscriptSnippet> = raw
            .into_iter()
            .map(|r| TranscriptSnippet {
                submission_id: submission_id.clone(),
                phase,
                timestamp_sec: r.timestamp_sec,
                text: r.text,
                is_highlight: r.is_highlight,
            })
            .collect();

        validate_ordering(&snippets, phase).map_err(|_err| TranscriptionError::ProviderError { phase })?;
        Ok(snippets)
    }
}
