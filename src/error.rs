//! Error types for API calls.
//!
//! Every variant's `Display` output is a message suitable for showing to
//! the user as-is; transport failures are classified into coarse kinds so
//! callers can distinguish "server said no" from "network is down".

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of an API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Well-formed response envelope carrying a non-success code.
    #[error("{message}")]
    Api {
        /// Business code from the envelope, when numeric.
        code: Option<i64>,
        /// Server-provided message (fallback: "Request failed").
        message: String,
    },

    /// Non-success HTTP status.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Display message for the status.
        message: String,
    },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Connection could not be established.
    #[error("network request failed, please check the connection")]
    Connection,

    /// Any other transport failure.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Response body could not be decoded.
    #[error("failed to decode response body")]
    Decode(#[source] reqwest::Error),

    /// Request rejected client-side before being sent.
    #[error("{0}")]
    Invalid(String),
}

impl ApiError {
    /// Classify a transport-level failure into a coarse kind.
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connection
        } else {
            Self::Transport(e)
        }
    }

    /// Map an HTTP error status to its display message.
    ///
    /// Statuses outside the fixed table use the server-provided message
    /// when one was present in the body.
    pub(crate) fn from_status(status: StatusCode, server_message: Option<String>) -> Self {
        let code = status.as_u16();
        let message = match code {
            400 => "Bad request parameters".to_string(),
            401 => "Unauthorized, please log in again".to_string(),
            403 => "Access forbidden, you do not have permission".to_string(),
            404 => "API endpoint not found".to_string(),
            500 => "Internal server error".to_string(),
            n => server_message.unwrap_or_else(|| format!("Request failed with status {n}")),
        };
        Self::Status {
            status: code,
            message,
        }
    }

    /// True when the stored token should be discarded and the user
    /// prompted to log in again.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Status { status: 401, .. } | Self::Api { code: Some(401), .. }
        )
    }
}

// ── Tests ────────────────────────────────────────────────────────
