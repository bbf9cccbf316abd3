use std::time::Duration;

use serde::{Deserialize, Serialize};

/// HTTP transport policy owned by a [`Parser`](crate::Parser).
///
/// Certificate verification is disabled by default so that self-signed
/// endpoints are reachable. Set `accept_invalid_certs` to `false` wherever
/// transport security matters.
///
/// # Examples
///
/// ```
/// use fileaddr::TransportConfig;
/// use std::time::Duration;
///
/// let config = TransportConfig::default()
///     .accept_invalid_certs(false)
///     .timeout(Some(Duration::from_secs(30)));
/// assert!(!config.accepts_invalid_certs());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    accept_invalid_certs: bool,
    /// Whole-request timeout in milliseconds; `None` waits indefinitely.
    timeout_ms:           Option<u64>,
    user_agent:           Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            accept_invalid_certs: true,
            timeout_ms:           None,
            user_agent:           None,
        }
    }
}

impl TransportConfig {
    pub fn new() -> Self { Self::default() }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> { serde_json::from_str(json) }

    #[must_use]
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_ms = timeout.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn accepts_invalid_certs(&self) -> bool { self.accept_invalid_certs }

    pub fn get_timeout(&self) -> Option<Duration> { self.timeout_ms.map(Duration::from_millis) }

    pub fn get_user_agent(&self) -> Option<&str> { self.user_agent.as_deref() }
}
