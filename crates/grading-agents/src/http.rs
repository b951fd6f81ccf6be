// crates/grading-agents/src/http.rs
// ============================================================================
// Module: HTTP LLM Client
// Description: Hardened async HTTP-backed implementation of LlmClient.
// Purpose: Talk to an LLM completion endpoint without trusting it.
// Dependencies: async-trait, reqwest, url
// ============================================================================

//! ## Overview
//! [`HttpLlmClient`] applies the same untrusted-endpoint posture the rest
//! of this workspace applies to external fetches: no redirects, a request
//! timeout, a response size cap, and an explicit host allowlist. The
//! original posture also pinned DNS per request; this client is called
//! against a small, operator-configured set of provider endpoints rather
//! than caller-supplied URIs, so host allowlisting plus `reqwest`'s own
//! connection handling is the right amount of hardening for this seam —
//! DNS pinning defends against a different threat (an attacker-supplied
//! URI), which does not apply here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use url::Url;

use crate::error::AgentError;
use crate::llm::LlmClient;

/// Default cap on response body size, in bytes.
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 2 * 1024 * 1024;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// ============================================================================
// SECTION: Host Policy
// ============================================================================

/// Allowlist of hosts an [`HttpLlmClient`] is permitted to call.
///
/// # Invariants
/// - An empty allowlist denies every host; there is no implicit default.
#[derive(Debug, Clone, Default)]
pub struct HostAllowlist {
    /// Allowed lowercase host labels.
    hosts: Vec<String>,
}

impl HostAllowlist {
    /// Builds an allowlist from an iterable of host strings.
    #[must_use]
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { hosts: hosts.into_iter().map(|h| h.as_ref().trim().to_ascii_lowercase()).collect() }
    }

    /// Returns true when `host` is present in the allowlist.
    #[must_use]
    pub(crate) fn allows(&self, host: &str) -> bool {
        self.hosts.iter().any(|allowed| allowed == host)
    }
}

// ============================================================================
// SECTION: HTTP LLM Client
// ============================================================================

/// Async, hardened HTTP client for an LLM completion endpoint.
///
/// # Invariants
/// - Redirects are rejected.
/// - Responses exceeding `max_response_bytes` are rejected.
/// - The endpoint's host must appear in `allowlist`.
#[derive(Debug, Clone)]
pub struct HttpLlmClient {
    /// Underlying HTTP client, configured with no redirects and a timeout.
    client: Client,
    /// Endpoint this client sends completion requests to.
    endpoint: Url,
    /// Allowed hosts for the endpoint.
    allowlist: HostAllowlist,
    /// Maximum accepted response body size, in bytes.
    max_response_bytes: u64,
    /// Bearer token sent with each request.
    api_key: String,
}

impl HttpLlmClient {
    /// Builds a client for `endpoint`, restricted to `allowlist`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Transport`] when the HTTP client cannot be
    /// constructed, or when `endpoint`'s host is not in `allowlist`.
    pub fn new(endpoint: Url, allowlist: HostAllowlist, api_key: impl Into<String>) -> Result<Self, AgentError> {
        let host = endpoint
            .host_str()
            .ok_or_else(|| AgentError::Transport("endpoint has no host".to_owned()))?
            .to_ascii_lowercase();
        if !allowlist.allows(&host) {
            return Err(AgentError::Transport(format!("host not in allowlist: {host}")));
        }
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| AgentError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            allowlist,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            api_key: api_key.into(),
        })
    }

    /// Overrides the default response size cap.
    #[must_use]
    pub const fn with_max_response_bytes(mut self, max_response_bytes: u64) -> Self {
        self.max_response_bytes = max_response_bytes;
        self
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, AgentError> {
        let host = self.endpoint.host_str().unwrap_or_default().to_ascii_lowercase();
        if !self.allowlist.allows(&host) {
            return Err(AgentError::Transport(format!("host not in allowlist: {host}")));
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "prompt": prompt }))
            .send()
            .await
            .map_err(|err| AgentError::Transport(err.to_string()))?;

        if response.url() != &self.endpoint {
            return Err(AgentError::Transport("unexpected redirect".to_owned()));
        }
        if !response.status().is_success() {
            return Err(AgentError::Transport(format!("http status {}", response.status())));
        }
        if let Some(length) = response.content_length() {
            if length > self.max_response_bytes {
                return Err(AgentError::Transport(format!(
                    "response too large: {length} bytes exceeds cap of {}",
                    self.max_response_bytes
                )));
            }
        }

        let body = response.text().await.map_err(|err| AgentError::Transport(err.to_string()))?;
        if body.len() as u64 > self.max_response_bytes {
            return Err(AgentError::Transport(format!(
                "response too large: {} bytes exceeds cap of {}",
                body.len(),
                self.max_response_bytes
            )));
        }
        Ok(body)
    }
}
