//! Client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fallback fixed salt when none is configured.
///
/// Deployments are expected to override this via `KEYFOB_FIXED_SALT`; the
/// value must match what the backend uses to verify pre-hashed passwords.
const DEFAULT_FIXED_SALT: &str = "default_fixed_salt_123";

/// Connection settings for [`crate::ApiClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL (e.g., `http://localhost:1884/api`).
    pub base_url: String,
    /// Client-side fixed salt appended to passwords before hashing.
    pub fixed_salt: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Config with the given base URL and default salt/timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            fixed_salt: DEFAULT_FIXED_SALT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load from environment variables.
    ///
    /// `KEYFOB_BASE_URL` is required; `KEYFOB_FIXED_SALT` and
    /// `KEYFOB_TIMEOUT_SECS` fall back to defaults when unset.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("KEYFOB_BASE_URL").ok()?;
        if base_url.is_empty() {
            return None;
        }

        let fixed_salt = std::env::var("KEYFOB_FIXED_SALT")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_FIXED_SALT.to_string());

        let timeout_secs = std::env::var("KEYFOB_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Some(Self {
            base_url,
            fixed_salt,
            timeout_secs,
        })
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Join an endpoint path onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// ── Tests ────────────────────────────────────────────────────────
